use crate::error::BaseUrlError;
use crate::parse::document::Server;

/// Pick the URL the generated client talks to.
///
/// An explicit override always wins, then a sole declared server. Among
/// several servers a loopback one is picked, but only when `local_env` is set.
pub fn resolve_base_url(
    override_url: Option<&str>,
    servers: &[Server],
    local_env: bool,
) -> Result<String, BaseUrlError> {
    if let Some(url) = override_url {
        return Ok(url.to_string());
    }

    match servers {
        [] => Err(BaseUrlError::NoServers),
        [only] => Ok(only.url.clone()),
        many => {
            if local_env && let Some(local) = many.iter().find(|s| is_loopback(&s.url)) {
                return Ok(local.url.clone());
            }
            Err(BaseUrlError::Ambiguous { count: many.len() })
        }
    }
}

fn is_loopback(url: &str) -> bool {
    let host = url.split_once("://").map_or(url, |(_, rest)| rest);
    url.contains("localhost") || host.starts_with("192.")
}
