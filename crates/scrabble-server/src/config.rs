//! Server configuration from environment variables.

use anyhow::Context;
use scrabble_core::WordList;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `SERVER_ADDR`
    pub addr: SocketAddr,
    /// `RUST_LOG`
    pub log_filter: String,
    /// `SCRABBLE_WORDLIST`; the embedded list is used when unset
    pub wordlist: Option<PathBuf>,
    /// `SCRABBLE_AI_SEED`; makes deals and AI moves repeatable
    pub ai_seed: Option<u64>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr = get("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.into())
            .parse()
            .context("SERVER_ADDR is not a socket address")?;

        let ai_seed = get("SCRABBLE_AI_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("SCRABBLE_AI_SEED must be an unsigned integer")?;

        Ok(Self {
            addr,
            log_filter: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
            wordlist: get("SCRABBLE_WORDLIST").map(PathBuf::from),
            ai_seed,
        })
    }

    /// Load the configured word list, or the embedded one
    pub fn load_dictionary(&self) -> anyhow::Result<WordList> {
        match &self.wordlist {
            Some(path) => WordList::load(path)
                .with_context(|| format!("failed to load word list {}", path.display())),
            None => Ok(WordList::embedded().clone()),
        }
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
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.wordlist, None);
        assert_eq!(config.ai_seed, None);
        assert!(!config.load_dictionary().unwrap().is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("RUST_LOG", "debug"),
            ("SCRABBLE_AI_SEED", "42"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.ai_seed, Some(42));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("SERVER_ADDR", "nowhere")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("SCRABBLE_AI_SEED", "-1")])).is_err());
    }

    #[test]
    fn test_missing_wordlist_is_error() {
        let config = ServerConfig::from_lookup(lookup(&[(
            "SCRABBLE_WORDLIST",
            "/nonexistent/words.txt",
        )]))
        .unwrap();
        assert!(config.load_dictionary().is_err());
    }
}
