use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Longest accepted session lifetime (ten years).
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_path: PathBuf,
    pub media_dir: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Feeds
    pub posts_per_page: usize,
    pub index_cache_ttl: Duration,

    // Sessions
    pub session_ttl: Duration,
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Storage
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/yatube.sqlite")),
            media_dir: PathBuf::from(env_or_default("MEDIA_DIR", "./data/media")),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Feeds
            posts_per_page: parse_env_usize("POSTS_PER_PAGE", 10)?,
            index_cache_ttl: Duration::from_secs(parse_env_u64("INDEX_CACHE_TTL_SECS", 20)?),

            // Sessions
            session_ttl: Duration::from_secs(parse_env_u64("SESSION_TTL_SECS", 1_209_600)?),
            cookie_secure: parse_env_bool("COOKIE_SECURE", false)?,
        })
    }

    /// Defaults rooted at `data_dir`, for tests and local tooling.
    #[must_use]
    pub fn with_data_dir(data_dir: &std::path::Path) -> Self {
        Self {
            database_path: data_dir.join("yatube.sqlite"),
            media_dir: data_dir.join("media"),
            web_host: "127.0.0.1".to_string(),
            web_port: 8080,
            posts_per_page: 10,
            index_cache_ttl: Duration::from_secs(20),
            session_ttl: Duration::from_secs(1_209_600),
            cookie_secure: false,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.posts_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                name: "POSTS_PER_PAGE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.session_ttl > MAX_SESSION_TTL {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_SECS".to_string(),
                message: format!("must be at most {}", MAX_SESSION_TTL.as_secs()),
            });
        }
        if self.web_host.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "WEB_HOST".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => parse_bool(name, &val),
        _ => Ok(default),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "ON").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_parse_env_defaults() {
        assert!(parse_env_bool("YATUBE_NONEXISTENT_VAR", true).unwrap());
        assert_eq!(parse_env_u64("YATUBE_NONEXISTENT_VAR", 20).unwrap(), 20);
        assert_eq!(parse_env_usize("YATUBE_NONEXISTENT_VAR", 10).unwrap(), 10);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::with_data_dir(std::path::Path::new("/tmp"));
        assert!(config.validate().is_ok());

        config.posts_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_session_ttl() {
        let mut config = Config::with_data_dir(std::path::Path::new("/tmp"));

        config.session_ttl = Duration::ZERO;
        assert!(config.validate().is_err());

        config.session_ttl = MAX_SESSION_TTL;
        assert!(config.validate().is_ok());

        config.session_ttl = Duration::from_secs(10_000_000_000_000);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_SECS"));
    }

    #[test]
    fn test_with_data_dir_defaults() {
        let config = Config::with_data_dir(std::path::Path::new("/srv/yatube"));
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.index_cache_ttl, Duration::from_secs(20));
        assert_eq!(
            config.database_path,
            PathBuf::from("/srv/yatube/yatube.sqlite")
        );
    }
}
