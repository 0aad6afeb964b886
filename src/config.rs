//! TOML configuration files.
//!
//! Two kinds of file are read. The auth file has a `[github]` table with a
//! `token` and an optional webhook `secret`. The rules file has a
//! `[patterns]` table keyed by login and an optional `[fallback]` table:
//!
//! ```toml
//! [patterns]
//! alice = """
//! title:network
//! text:protocol
//! """
//! bob = ["label:^urgent$"]
//!
//! [fallback]
//! label = "Need assignment"
//! ```
//!
//! The webhook server reads both from a list of files merged into one
//! document (see [`load_merged`]).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::reconcile::FallbackConfig;
use crate::rules::{RuleError, RuleSet};

/// Errors loading configuration. All of them are fatal before any run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("no GitHub token configured in [github]")]
    MissingToken,

    #[error("missing [{0}] section")]
    MissingSection(&'static str),

    #[error("[fallback] section has no label")]
    MissingFallbackLabel,

    #[error("invalid rules: {0}")]
    Rules(#[from] RuleError),

    #[error("no configuration files given")]
    NoFiles,
}

/// GitHub credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub token: String,
    /// Shared secret for webhook signatures. Unsigned payloads are accepted
    /// when this is `None`.
    pub secret: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"<redacted>")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The parsed rule set and optional fallback label.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub rules: RuleSet,
    pub fallback: Option<FallbackConfig>,
}

/// Everything the webhook server needs from its configuration files.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    pub rules: RulesConfig,
}

// ─── Raw file layout ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    github: Option<RawGithub>,
    patterns: Option<BTreeMap<String, RawPatterns>>,
    fallback: Option<RawFallback>,
}

#[derive(Debug, Deserialize)]
struct RawGithub {
    token: Option<String>,
    secret: Option<String>,
}

/// A login's rules: one newline-separated string or a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPatterns {
    Text(String),
    Lines(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawFallback {
    label: Option<String>,
}

impl RawConfig {
    fn auth(&self) -> Result<AuthConfig, ConfigError> {
        let github = self
            .github
            .as_ref()
            .ok_or(ConfigError::MissingSection("github"))?;
        let token = github
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        Ok(AuthConfig {
            token: token.to_string(),
            secret: github.secret.clone().filter(|secret| !secret.is_empty()),
        })
    }

    fn rules(&self) -> Result<RulesConfig, ConfigError> {
        let patterns = self
            .patterns
            .as_ref()
            .ok_or(ConfigError::MissingSection("patterns"))?;
        let rules = RuleSet::parse_lines(patterns.iter().map(|(login, raw)| {
            let lines: Vec<&str> = match raw {
                RawPatterns::Text(text) => text.lines().collect(),
                RawPatterns::Lines(lines) => lines.iter().map(String::as_str).collect(),
            };
            (login.clone(), lines)
        }))?;

        let fallback = match &self.fallback {
            None => None,
            Some(RawFallback { label: Some(label) }) if !label.is_empty() => {
                Some(FallbackConfig::new(label.clone()))
            }
            Some(_) => return Err(ConfigError::MissingFallbackLabel),
        };

        Ok(RulesConfig { rules, fallback })
    }
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// Parses the contents of an auth file.
pub fn parse_auth(text: &str) -> Result<AuthConfig, ConfigError> {
    toml::from_str::<RawConfig>(text)?.auth()
}

/// Parses the contents of a rules file.
pub fn parse_rules(text: &str) -> Result<RulesConfig, ConfigError> {
    toml::from_str::<RawConfig>(text)?.rules()
}

pub fn load_auth(path: &Path) -> Result<AuthConfig, ConfigError> {
    in_file(path, read(path).and_then(|text| parse_auth(&text)))
}

pub fn load_rules(path: &Path) -> Result<RulesConfig, ConfigError> {
    in_file(path, read(path).and_then(|text| parse_rules(&text)))
}

/// Loads and merges several files into one configuration.
///
/// Tables are merged key by key; for any other value the later file wins.
/// The merged document must contain both the auth and the rules sections.
pub fn load_merged<P: AsRef<Path>>(paths: &[P]) -> Result<ServerConfig, ConfigError> {
    if paths.is_empty() {
        return Err(ConfigError::NoFiles);
    }

    let mut merged = toml::Table::new();
    for path in paths {
        let path = path.as_ref();
        let table = in_file(
            path,
            read(path).and_then(|text| Ok(text.parse::<toml::Table>()?)),
        )?;
        merge_tables(&mut merged, table);
    }

    let raw: RawConfig = toml::Value::Table(merged).try_into()?;
    Ok(ServerConfig {
        auth: raw.auth()?,
        rules: raw.rules()?,
    })
}

/// Splits a colon-separated list of paths, as found in `GHIA_CONFIG`.
pub fn split_config_paths(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn merge_tables(into: &mut toml::Table, from: toml::Table) {
    for (key, value) in from {
        match (into.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                into.insert(key, value);
            }
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn in_file<T>(path: &Path, result: Result<T, ConfigError>) -> Result<T, ConfigError> {
    result.map_err(|err| match err {
        ConfigError::Read { .. } => err,
        other => ConfigError::InFile {
            path: path.to_path_buf(),
            source: Box::new(other),
        },
    })
}
