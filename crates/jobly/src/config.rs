//! Runtime configuration.
//!
//! Configuration comes either from the environment (with `.env` support) or
//! from a TOML file whose string values may reference `${ENV_VARS}`:
//!
//! ```toml
//! env = "production"
//!
//! [database]
//! url = "${DATABASE_URL}"
//! pool_max_size = 16
//!
//! [auth]
//! bcrypt_cost = 12
//! ```

use crate::error::{JoblyError, JoblyResult};
use serde::Deserialize;
use std::path::Path;

/// Deployment environment. `Test` switches to the test database and the
/// cheapest bcrypt cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(s: &str) -> JoblyResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(JoblyError::Config(format!("unknown environment: {other}"))),
        }
    }

    fn default_database_url(self) -> &'static str {
        match self {
            Self::Test => "postgresql:///jobly_test",
            Self::Development | Self::Production => "postgresql:///jobly",
        }
    }

    fn default_bcrypt_cost(self) -> u32 {
        match self {
            Self::Test => bcrypt_min_cost(),
            Self::Development | Self::Production => 12,
        }
    }
}

const fn bcrypt_min_cost() -> u32 {
    4
}

const DEFAULT_POOL_MAX_SIZE: usize = 16;

/// Resolved configuration for the data layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoblyConfig {
    pub env: Environment,
    pub database_url: String,
    /// bcrypt work factor used when storing passwords.
    pub bcrypt_cost: u32,
    pub pool_max_size: usize,
}

impl JoblyConfig {
    /// Read configuration from the process environment, loading `.env` first.
    ///
    /// Recognized variables: `JOBLY_ENV`, `DATABASE_URL`,
    /// `BCRYPT_WORK_FACTOR`, `POOL_MAX_SIZE`.
    pub fn from_env() -> JoblyResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`JoblyConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let env = match lookup("JOBLY_ENV") {
            Some(v) => Environment::parse(&v)?,
            None => Environment::default(),
        };

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| env.default_database_url().to_string());

        let bcrypt_cost = match lookup("BCRYPT_WORK_FACTOR") {
            Some(v) => parse_number("BCRYPT_WORK_FACTOR", &v)?,
            None => env.default_bcrypt_cost(),
        };

        let pool_max_size = match lookup("POOL_MAX_SIZE") {
            Some(v) => parse_number("POOL_MAX_SIZE", &v)?,
            None => DEFAULT_POOL_MAX_SIZE,
        };

        let config = Self {
            env,
            database_url,
            bcrypt_cost,
            pool_max_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> JoblyResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JoblyError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw, |key| std::env::var(key).ok()).map_err(|e| match e {
            JoblyError::Config(msg) => {
                JoblyError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse TOML configuration, expanding `${VAR}` references through `lookup`.
    pub fn from_toml_str(
        raw: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> JoblyResult<Self> {
        let file: ConfigFile = toml::from_str(raw)
            .map_err(|e| JoblyError::Config(format!("failed to parse config: {e}")))?;

        let env = file.env.unwrap_or_default();
        let database_url = match file.database.url {
            Some(url) => expand_env_vars(&url, &lookup)?,
            None => env.default_database_url().to_string(),
        };

        let config = Self {
            env,
            database_url,
            bcrypt_cost: file
                .auth
                .bcrypt_cost
                .unwrap_or_else(|| env.default_bcrypt_cost()),
            pool_max_size: file.database.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> JoblyResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(JoblyError::Config("database url must not be empty".into()));
        }
        if !(bcrypt_min_cost()..=31).contains(&self.bcrypt_cost) {
            return Err(JoblyError::Config(format!(
                "bcrypt cost must be between {} and 31, got {}",
                bcrypt_min_cost(),
                self.bcrypt_cost
            )));
        }
        if self.pool_max_size == 0 {
            return Err(JoblyError::Config("pool_max_size must be > 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    env: Option<Environment>,
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    auth: AuthSection,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    url: Option<String>,
    pool_max_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    bcrypt_cost: Option<u32>,
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> JoblyResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| JoblyError::Config(format!("{key} must be a number, got {value:?}")))
}

fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> JoblyResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(JoblyError::Config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(JoblyError::Config("invalid env var reference: ${}".into()));
            }

            let v = lookup(&key).ok_or_else(|| {
                JoblyError::Config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_for_development() {
        let config = JoblyConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.database_url, "postgresql:///jobly");
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.pool_max_size, 16);
    }

    #[test]
    fn test_env_uses_test_database_and_cheap_hashing() {
        let config = JoblyConfig::from_lookup(vars(&[("JOBLY_ENV", "test")])).unwrap();
        assert_eq!(config.database_url, "postgresql:///jobly_test");
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn explicit_values_win() {
        let config = JoblyConfig::from_lookup(vars(&[
            ("DATABASE_URL", "postgres://u@h/db"),
            ("BCRYPT_WORK_FACTOR", "10"),
            ("POOL_MAX_SIZE", "4"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://u@h/db");
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.pool_max_size, 4);
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let err = JoblyConfig::from_lookup(vars(&[("BCRYPT_WORK_FACTOR", "1")])).unwrap_err();
        assert!(err.to_string().contains("bcrypt cost"));
    }

    #[test]
    fn rejects_non_numeric_pool_size() {
        assert!(JoblyConfig::from_lookup(vars(&[("POOL_MAX_SIZE", "many")])).is_err());
    }

    #[test]
    fn toml_with_env_expansion() {
        let raw = r#"
            env = "production"

            [database]
            url = "postgres://${DB_USER}@localhost/jobly"
            pool_max_size = 8

            [auth]
            bcrypt_cost = 11
        "#;
        let config = JoblyConfig::from_toml_str(raw, vars(&[("DB_USER", "app")])).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.database_url, "postgres://app@localhost/jobly");
        assert_eq!(config.pool_max_size, 8);
        assert_eq!(config.bcrypt_cost, 11);
    }

    #[test]
    fn toml_missing_env_var_is_an_error() {
        let raw = "[database]\nurl = \"${NOPE}\"\n";
        let err = JoblyConfig::from_toml_str(raw, vars(&[])).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn toml_sections_are_optional() {
        let config = JoblyConfig::from_toml_str("env = \"test\"\n", vars(&[])).unwrap();
        assert_eq!(config.database_url, "postgresql:///jobly_test");
    }
}
