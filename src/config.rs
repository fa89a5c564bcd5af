use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::catalog::DEFAULT_PAGE_SIZE;

pub const DEFAULT_SNAPSHOT_DIR: &str = "public/json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let snapshot_dir = get("CATALOG_SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_DIR));

        let bind_raw = get("CATALOG_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse()
            .with_context(|| format!("CATALOG_BIND_ADDR is not a socket address: {}", bind_raw))?;

        let page_size = match get("CATALOG_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("CATALOG_PAGE_SIZE is not a number: {}", raw))?,
            None => DEFAULT_PAGE_SIZE,
        };
        if page_size == 0 {
            bail!("CATALOG_PAGE_SIZE must be greater than zero");
        }

        Ok(Self {
            snapshot_dir,
            bind_addr,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.snapshot_dir, PathBuf::from("public/json"));
        assert_eq!(cfg.bind_addr.port(), 3146);
        assert_eq!(cfg.page_size, 24);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("CATALOG_SNAPSHOT_DIR", "/srv/json"),
            ("CATALOG_BIND_ADDR", "127.0.0.1:8080"),
            ("CATALOG_PAGE_SIZE", "10"),
        ])
        .unwrap();
        assert_eq!(cfg.snapshot_dir, PathBuf::from("/srv/json"));
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.page_size, 10);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("CATALOG_PAGE_SIZE", "0")]).is_err());
        assert!(config(&[("CATALOG_PAGE_SIZE", "many")]).is_err());
        assert!(config(&[("CATALOG_BIND_ADDR", "nowhere")]).is_err());
    }
}
