mod types;

pub use types::*;

use crate::{Error, Result, serving::EndpointTarget};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "serving-client.yaml";

/// Loads the configuration file.
///
/// An explicitly given path must exist. Without one, the default path is
/// tried and a missing file yields the built-in defaults.
pub async fn load(path: Option<&Path>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };

    debug!("Loading configuration from: {}", config_path.display());

    let config_str = match tokio::fs::read_to_string(config_path).await {
        Ok(contents) => contents,
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };

    parse(&config_str)
}

pub fn parse(contents: &str) -> Result<Config> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    if config.client.timeout_secs == 0 {
        return Err(Error::config("client.timeout_secs must be at least 1"));
    }
    Ok(config)
}

/// Merges user-supplied values over the file configuration.
///
/// Overrides win over the file; blank values count as missing.
pub fn resolve_target(file: &EndpointConfig, overrides: &EndpointOverrides) -> Result<EndpointTarget> {
    let host = pick("host", &overrides.host, &file.host)?;
    let token = pick("token", &overrides.token, &file.token)?;
    let name = pick("endpoint name", &overrides.name, &file.name)?;
    Ok(EndpointTarget::new(host, name, token))
}

fn pick(field: &str, first: &Option<String>, second: &Option<String>) -> Result<String> {
    [first, second]
        .into_iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::input(format!("Missing required field: {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::NonFinitePolicy;
    use pretty_assertions::assert_eq;

    fn file_config() -> EndpointConfig {
        EndpointConfig {
            host: Some("https://file.example".to_string()),
            token: Some("file-token".to_string()),
            name: Some("file-endpoint".to_string()),
        }
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
endpoint:
  host: "https://dbc.example.com/"
  token: "dapi-test"
  name: "my-endpoint"
client:
  timeout_secs: 30
  non_finite: reject
logs:
  level: debug
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.endpoint.host.as_deref(), Some("https://dbc.example.com/"));
        assert_eq!(config.endpoint.name.as_deref(), Some("my-endpoint"));
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.client.non_finite, NonFinitePolicy::Reject);
        assert_eq!(config.logs.level, "debug");
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse("endpoint:\n  name: only-name\n").unwrap();
        assert_eq!(config.client.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.client.non_finite, NonFinitePolicy::Sentinel);
        assert_eq!(config.logs.level, "info");
        assert!(config.endpoint.host.is_none());

        let empty = parse("").unwrap();
        assert_eq!(empty.client.timeout_secs, 120);
    }

    #[test]
    fn test_parse_rejects_zero_timeout() {
        let result = parse("client:\n  timeout_secs: 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_prefers_overrides() {
        let overrides = EndpointOverrides {
            host: Some("https://flag.example".to_string()),
            token: None,
            name: Some("flag-endpoint".to_string()),
        };
        let target = resolve_target(&file_config(), &overrides).unwrap();
        assert_eq!(target.host(), "https://flag.example");
        assert_eq!(target.credential(), "file-token");
        assert_eq!(target.endpoint_name(), "flag-endpoint");
    }

    #[test]
    fn test_resolve_blank_override_falls_back() {
        let overrides = EndpointOverrides {
            host: Some("   ".to_string()),
            ..Default::default()
        };
        let target = resolve_target(&file_config(), &overrides).unwrap();
        assert_eq!(target.host(), "https://file.example");
    }

    #[test]
    fn test_resolve_missing_token() {
        let file = EndpointConfig {
            token: None,
            ..file_config()
        };
        let err = resolve_target(&file, &EndpointOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert!(err.to_string().contains("token"));
    }
}
