use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use sdkops_core::config::{self, CONFIG_FILE_NAME, SdkopsConfig};
use sdkops_core::ir::SdkIr;
use sdkops_core::parse::{self, Document};
use sdkops_core::transform::name_normalizer::is_snake_identifier;
use sdkops_core::transform::{CompileOptions, compile, resolve_base_url};
use sdkops_core::{Emitter, GeneratedFile};
use sdkops_python_client::PythonClientEmitter;

/// SDK name used by `validate` and `inspect` when none is configured.
const FALLBACK_SDK_NAME: &str = "sdk";

#[derive(Parser)]
#[command(name = "sdkops", about = "Compile OpenAPI 3.x documents into typed API clients", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a client module from an OpenAPI document
    Generate {
        /// Path to the OpenAPI document (YAML or JSON); defaults to the configured input
        file: Option<PathBuf>,

        /// snake_case SDK name, used for the module and client names
        #[arg(short, long)]
        name: Option<String>,

        /// Existing directory to write the module into
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Base URL of the API; overrides config and the document's servers
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document
        file: PathBuf,
    },

    /// Print the compiled IR of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new sdkops configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            file,
            name,
            dest,
            url,
        } => cmd_generate(file, name, dest, url),

        Commands::Validate { file } => cmd_validate(file),

        Commands::Inspect { file, format } => cmd_inspect(file, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "sdkops", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SdkopsConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))?;
    if config.is_some() {
        debug!("loaded {}", config_path.display());
    }
    Ok(config)
}

/// Read and parse a document; `.json` files are JSON, anything else YAML.
fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let document = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(document)
}

fn compile_options(cfg: &SdkopsConfig, sdk_name: &str, base_url: Option<String>) -> CompileOptions {
    CompileOptions {
        sdk_name: sdk_name.to_string(),
        base_url,
        reference_policy: cfg.compiler.reference_policy,
        timeout_secs: cfg.client.timeout_secs,
        user_agent: cfg.client.user_agent.clone(),
    }
}

fn check_sdk_name(name: &str) -> Result<()> {
    if !is_snake_identifier(name) {
        anyhow::bail!("invalid sdk name '{name}': use only a-z, 0-9 and _");
    }
    Ok(())
}

fn check_destination(dest: &Path) -> Result<()> {
    if !dest.is_dir() {
        anyhow::bail!(
            "destination {} does not exist or is not a directory",
            dest.display()
        );
    }
    Ok(())
}

/// One line per path, with its operations indented beneath it.
fn operation_tree(document: &Document) -> String {
    let mut out = format!("{} {}\n", document.info.title, document.info.version);
    for path in &document.paths {
        out.push_str(&format!("  {}\n", path.pattern));
        for operation in &path.operations {
            out.push_str(&format!(
                "    {:<7} {}\n",
                operation.method.as_str(),
                operation.operation_id
            ));
        }
    }
    out
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(
    file: Option<PathBuf>,
    name: Option<String>,
    dest: Option<PathBuf>,
    url: Option<String>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();

    let sdk_name = name
        .or_else(|| cfg.name.clone())
        .context("missing sdk name: pass --name or set name in the config")?;
    check_sdk_name(&sdk_name)?;

    let dest = dest.unwrap_or_else(|| PathBuf::from(&cfg.output));
    check_destination(&dest)?;

    let input = file.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let document = load_document(&input)?;
    eprint!("{}", operation_tree(&document));

    let override_url = url.or_else(|| cfg.client.base_url.clone());
    let base_url = resolve_base_url(
        override_url.as_deref(),
        &document.servers,
        config::local_environment_from_env(),
    )?;
    eprintln!("Using base url {base_url}");

    let ir = compile(&document, &compile_options(&cfg, &sdk_name, Some(base_url)))
        .with_context(|| format!("failed to compile {}", input.display()))?;

    let emitter = PythonClientEmitter;
    eprintln!("Generating {} → {}", emitter.id(), dest.display());
    let files = emitter.emit(&ir)?;
    write_files(&dest, &files)?;

    eprintln!(
        "Generated {} declarations and {} methods",
        ir.declarations.len(),
        ir.methods.len()
    );
    Ok(())
}

fn cmd_validate(file: PathBuf) -> Result<()> {
    let document = load_document(&file)?;

    eprintln!(
        "Valid OpenAPI {} document: {}",
        document.openapi_version, document.info.title
    );
    eprintln!("  Version: {}", document.info.version);
    eprintln!("  Paths: {}", document.paths.len());
    eprintln!("  Servers: {}", document.servers.len());

    // Also validate that every schema and operation compiles
    let cfg = try_load_config()?.unwrap_or_default();
    let sdk_name = cfg.name.clone().unwrap_or_else(|| FALLBACK_SDK_NAME.to_string());
    let ir = compile(&document, &compile_options(&cfg, &sdk_name, None))?;
    eprintln!("  Methods: {}", ir.methods.len());
    eprintln!("  Declarations: {}", ir.declarations.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(file: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let sdk_name = cfg.name.clone().unwrap_or_else(|| FALLBACK_SDK_NAME.to_string());
    let document = load_document(&file)?;
    let ir: SdkIr = compile(&document, &compile_options(&cfg, &sdk_name, None))?;

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&ir)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&ir)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
