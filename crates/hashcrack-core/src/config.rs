//! Configuration types for hashcrack.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Server configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Cracking tool settings
    pub cracker: CrackerSettings,
    /// Hash catalog settings
    pub hashing: HashingSettings,
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ServerConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_running_sessions == 0 {
            return Err(Error::Config(
                "server.max_running_sessions must be > 0".to_string(),
            ));
        }

        if self.cracker.bin_path.trim().is_empty() {
            return Err(Error::Config(
                "cracker.bin_path cannot be empty".to_string(),
            ));
        }

        if self.cracker.attack_mode != 0 {
            return Err(Error::Config(format!(
                "cracker.attack_mode must be 0 (dictionary), got {}",
                self.cracker.attack_mode
            )));
        }

        if self.cracker.status_timer_secs == 0 {
            return Err(Error::Config(
                "cracker.status_timer_secs must be > 0".to_string(),
            ));
        }

        self.hashing.validate()
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Maximum number of sessions in `running` state at once
    pub max_running_sessions: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_running_sessions: 10,
        }
    }
}

/// Settings for the external cracking tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrackerSettings {
    /// hashcat executable
    pub bin_path: String,
    /// Directory for per-session `<id>.hash` and `<id>.out` files
    pub work_dir: PathBuf,
    /// Directory holding wordlists
    pub wordlists_path: PathBuf,
    /// Wordlist file name inside `wordlists_path`
    pub default_wordlist: String,
    /// Directory holding rule files
    pub rules_path: PathBuf,
    /// Rule file name inside `rules_path`
    pub default_rule: String,
    /// hashcat attack mode (0 = straight/dictionary)
    pub attack_mode: u32,
    /// Seconds between status reports
    pub status_timer_secs: u32,
    /// Additional arguments placed before the positional files
    pub extra_args: Vec<String>,
    /// How long the exit handler waits for remaining output to be parsed
    pub drain_timeout_ms: u64,
}

impl Default for CrackerSettings {
    fn default() -> Self {
        Self {
            bin_path: "hashcat".to_string(),
            work_dir: PathBuf::from("./sessions"),
            wordlists_path: PathBuf::from("./wordlists"),
            default_wordlist: "rockyou.txt".to_string(),
            rules_path: PathBuf::from("./rules"),
            default_rule: "best64.rule".to_string(),
            attack_mode: 0,
            status_timer_secs: 1,
            extra_args: vec![],
            drain_timeout_ms: 2000,
        }
    }
}

impl CrackerSettings {
    /// Input hash file for a session.
    pub fn hash_file(&self, stem: &str) -> PathBuf {
        self.work_dir.join(format!("{stem}.hash"))
    }

    /// Output (cracked) file for a session.
    pub fn output_file(&self, stem: &str) -> PathBuf {
        self.work_dir.join(format!("{stem}.out"))
    }

    /// Full wordlist path.
    pub fn wordlist(&self) -> PathBuf {
        self.wordlists_path.join(&self.default_wordlist)
    }

    /// Full rule file path.
    pub fn rule_file(&self) -> PathBuf {
        self.rules_path.join(&self.default_rule)
    }
}

/// Hash catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    /// Hash mode used when a request does not name one
    pub default_hash_type: u32,
    /// Hash modes offered to clients
    pub hash_types: Vec<HashTypeConfig>,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            default_hash_type: 0,
            hash_types: vec![
                HashTypeConfig::new(0, "MD5", "Raw MD5"),
                HashTypeConfig::new(100, "SHA1", "Raw SHA1"),
                HashTypeConfig::new(1400, "SHA2-256", "Raw SHA2-256"),
                HashTypeConfig::new(1700, "SHA2-512", "Raw SHA2-512"),
                HashTypeConfig::new(3200, "bcrypt", "bcrypt $2*$, Blowfish (Unix)"),
            ],
            bcrypt_cost: 10,
        }
    }
}

impl HashingSettings {
    /// Look up a catalog entry by hash mode.
    pub fn find(&self, id: u32) -> Option<&HashTypeConfig> {
        self.hash_types.iter().find(|h| h.id == id)
    }

    /// Validate the catalog.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for hash_type in &self.hash_types {
            if hash_type.name.trim().is_empty() {
                return Err(Error::Config(format!(
                    "hash type {} name cannot be empty",
                    hash_type.id
                )));
            }
            if !seen.insert(hash_type.id) {
                return Err(Error::Config(format!(
                    "duplicate hash type id {}",
                    hash_type.id
                )));
            }
        }

        if self.find(self.default_hash_type).is_none() {
            return Err(Error::Config(format!(
                "hashing.default_hash_type {} is not in hashing.hash_types",
                self.default_hash_type
            )));
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(Error::Config(format!(
                "hashing.bcrypt_cost must be within 4..=31, got {}",
                self.bcrypt_cost
            )));
        }

        Ok(())
    }
}

/// One entry of the hash catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HashTypeConfig {
    /// hashcat hash mode
    pub id: u32,
    /// Short name
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
}

impl HashTypeConfig {
    /// Create a catalog entry.
    pub fn new(id: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}
