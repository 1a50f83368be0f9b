use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.sdkops.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SdkopsConfig {
    pub input: String,
    pub output: String,
    /// Snake-case SDK name; also the generated module name.
    pub name: Option<String>,
    pub client: ClientConfig,
    pub compiler: CompilerConfig,
}

impl Default for SdkopsConfig {
    fn default() -> Self {
        Self {
            input: "openapi.json".to_string(),
            output: ".".to_string(),
            name: None,
            client: ClientConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

/// Generated client options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// Defaults to the SDK name.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub reference_policy: ReferencePolicy,
}

/// What to do when the same shared schema is referenced from several sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Emit a declaration at every reference site.
    #[default]
    Duplicate,
    /// Emit a declaration only for the first reference site of each resolved
    /// pointer. Distinct pointers are declared separately even when their
    /// names collide.
    Deduplicate,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".sdkops.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SdkopsConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SdkopsConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Whether the process runs in a local/dev environment, which lets the base
/// URL resolver pick a loopback server among several.
pub fn local_environment_from_env() -> bool {
    is_local_environment(
        env::var("SDKOPS_ENV").ok().as_deref(),
        env::var("DEBUG").ok().as_deref(),
    )
}

fn is_local_environment(sdkops_env: Option<&str>, debug: Option<&str>) -> bool {
    let env_is_dev = sdkops_env.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "dev" | "development" | "local"
        )
    });
    let debug_is_on = debug.is_some_and(|v| {
        let v = v.trim();
        !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
    });
    env_is_dev || debug_is_on
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# sdkops configuration
input: openapi.json
output: .
# name: my_sdk          # snake_case module and client name

client:
  # base_url: https://api.example.com   # overrides the document's servers
  timeout_secs: 10
  # user_agent: my_sdk                 # defaults to the sdk name

compiler:
  reference_policy: duplicate   # duplicate | deduplicate
"#
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = SdkopsConfig::default();
        assert_eq!(config.input, "openapi.json");
        assert_eq!(config.output, ".");
        assert!(config.name.is_none());
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.compiler.reference_policy, ReferencePolicy::Duplicate);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: spec.yaml
output: out
name: pets
client:
  base_url: https://api.example.com
  timeout_secs: 30
  user_agent: pets-sdk/1.0
compiler:
  reference_policy: deduplicate
"#;
        let config: SdkopsConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "spec.yaml");
        assert_eq!(config.name.as_deref(), Some("pets"));
        assert_eq!(
            config.client.base_url.as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.client.user_agent.as_deref(), Some("pets-sdk/1.0"));
        assert_eq!(
            config.compiler.reference_policy,
            ReferencePolicy::Deduplicate
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: SdkopsConfig = serde_yaml_ng::from_str("input: api.yaml\n").unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.client.timeout_secs, 10);
    }

    #[test]
    fn test_default_content_parses() {
        let config: SdkopsConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.compiler.reference_policy, ReferencePolicy::Duplicate);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: shop\ncompiler:\n  reference_policy: deduplicate").unwrap();
        let config = load_config(file.path()).unwrap().unwrap();
        assert_eq!(config.name.as_deref(), Some("shop"));
        assert_eq!(
            config.compiler.reference_policy,
            ReferencePolicy::Deduplicate
        );
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            load_config(&dir.path().join(CONFIG_FILE_NAME))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "client: [not, a, map]").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }

    #[test]
    fn test_local_environment_signal() {
        assert!(is_local_environment(Some("dev"), None));
        assert!(is_local_environment(Some("Development"), None));
        assert!(is_local_environment(None, Some("1")));
        assert!(!is_local_environment(None, Some("0")));
        assert!(!is_local_environment(None, Some("false")));
        assert!(!is_local_environment(Some("production"), Some("")));
        assert!(!is_local_environment(None, None));
    }
}
