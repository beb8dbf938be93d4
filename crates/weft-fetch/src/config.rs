//! Gateway configuration.
//!
//! Resolution order: environment variables → defaults.
//!
//! | Variable             | Meaning                                   | Default                                   |
//! |----------------------|-------------------------------------------|-------------------------------------------|
//! | `ARWEAVE_NODES`      | JSON array of node endpoints              | `["http://lon-1.eu-west-1.arweave.net:1984"]` |
//! | `WEFT_BOOTSTRAP_URL` | host queried once for `/peers`            | `https://www.arweave.net`                 |
//! | `WEFT_CACHE_DIR`     | directory holding cached listings         | `cache`                                   |
//! | `WEFT_DISCOVERY`     | `0`/`false` disables peer discovery       | enabled                                   |

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const NODES_VAR: &str = "ARWEAVE_NODES";
pub const BOOTSTRAP_VAR: &str = "WEFT_BOOTSTRAP_URL";
pub const CACHE_DIR_VAR: &str = "WEFT_CACHE_DIR";
pub const DISCOVERY_VAR: &str = "WEFT_DISCOVERY";

pub const DEFAULT_NODE: &str = "http://lon-1.eu-west-1.arweave.net:1984";
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://www.arweave.net";
pub const DEFAULT_CACHE_DIR: &str = "cache";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Endpoints seeding the node registry.
    pub nodes: Vec<String>,

    /// Host whose `/peers` list extends the registry once.
    pub bootstrap_url: String,

    /// Directory for on-disk cache artifacts.
    pub cache_dir: PathBuf,

    /// Whether to run peer discovery at all.
    pub discovery: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            nodes:         vec![DEFAULT_NODE.to_string()],
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            cache_dir:     PathBuf::from(DEFAULT_CACHE_DIR),
            discovery:     true,
        }
    }
}

impl GatewayConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(NODES_VAR) {
            config.nodes = parse_nodes(&raw)?;
        }
        if let Some(url) = lookup(BOOTSTRAP_VAR) {
            config.bootstrap_url = url;
        }
        if let Some(dir) = lookup(CACHE_DIR_VAR) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(DISCOVERY_VAR) {
            config.discovery = parse_flag(DISCOVERY_VAR, &flag)?;
        }

        Ok(config)
    }

    #[must_use]
    pub fn nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes = nodes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn bootstrap_url(mut self, url: impl Into<String>) -> Self {
        self.bootstrap_url = url.into();
        self
    }

    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    #[must_use]
    pub fn discovery(mut self, enabled: bool) -> Self {
        self.discovery = enabled;
        self
    }
}

fn parse_nodes(raw: &str) -> Result<Vec<String>> {
    let nodes: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| Error::Config(format!("{NODES_VAR} must be a JSON array of strings: {e}")))?;

    let nodes: Vec<String> = nodes
        .iter()
        .map(|n| n.trim().trim_end_matches('/').to_string())
        .filter(|n| !n.is_empty())
        .collect();

    if nodes.is_empty() {
        return Err(Error::Config(format!("{NODES_VAR} lists no nodes")));
    }
    Ok(nodes)
}

fn parse_flag(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{var} must be a boolean, got {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = GatewayConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.nodes, vec![DEFAULT_NODE.to_string()]);
        assert!(config.discovery);
    }

    #[test]
    fn nodes_from_json_array() {
        let config = GatewayConfig::from_lookup(lookup(&[(
            NODES_VAR,
            r#"["http://a:1984/", " http://b:1984"]"#,
        )]))
        .unwrap();
        assert_eq!(config.nodes, vec!["http://a:1984", "http://b:1984"]);
    }

    #[test]
    fn malformed_nodes_is_config_error() {
        let err = GatewayConfig::from_lookup(lookup(&[(NODES_VAR, "http://a:1984")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn empty_nodes_is_config_error() {
        let err = GatewayConfig::from_lookup(lookup(&[(NODES_VAR, "[]")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn overrides_and_flags() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (BOOTSTRAP_VAR, "http://bootstrap"),
            (CACHE_DIR_VAR, "/tmp/weft"),
            (DISCOVERY_VAR, "off"),
        ]))
        .unwrap();
        assert_eq!(config.bootstrap_url, "http://bootstrap");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/weft"));
        assert!(!config.discovery);

        let err = GatewayConfig::from_lookup(lookup(&[(DISCOVERY_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
