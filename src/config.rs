use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;

use thiserror::Error;

pub const CONFIG_FILE_VAR: &str = "CONFIG_FILE";
pub const TIMEZONE_KEY: &str = "TIMEZONE";
pub const LOG_LEVEL_KEY: &str = "LOG_LEVEL";
pub const LOG_FORMAT_KEY: &str = "LOG_FORMAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
}

/// `KEY=VALUE` settings, shell-env style. Lookups fall back to the process
/// environment for keys the file does not set.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            values.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
        Ok(Self { values })
    }

    /// Loads the file named by `explicit`, else by `CONFIG_FILE`, else an
    /// empty config.
    pub fn load(explicit: Option<&str>) -> Result<Self, ConfigError> {
        match explicit.map(str::to_string).or_else(|| env::var(CONFIG_FILE_VAR).ok()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let non_blank = |value: &String| !value.trim().is_empty();
        self.values
            .get(key)
            .filter(|value| non_blank(*value))
            .cloned()
            .or_else(|| env::var(key).ok().filter(non_blank))
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_env_style_lines() {
        let config = AppConfig::parse(
            "# session settings\n\
             TIMEZONE=\"America/New_York\"\n\
             export LOG_LEVEL = debug\n\
             \n\
             LOG_FORMAT='json'\n",
        )
        .unwrap();
        assert_eq!(config.get(TIMEZONE_KEY).as_deref(), Some("America/New_York"));
        assert_eq!(config.get(LOG_LEVEL_KEY).as_deref(), Some("debug"));
        assert_eq!(config.get(LOG_FORMAT_KEY).as_deref(), Some("json"));
    }

    #[test]
    fn rejects_lines_without_assignment() {
        let err = AppConfig::parse("TIMEZONE=UTC\nnonsense\n").unwrap_err();
        match err {
            ConfigError::InvalidLine { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "nonsense");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lone_quote_is_kept_verbatim() {
        let config = AppConfig::parse("APPT_TEST_ONLY_KEY=\"\n").unwrap();
        assert_eq!(config.get("APPT_TEST_ONLY_KEY").as_deref(), Some("\""));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = env::temp_dir().join("appointment_diary_missing.conf");
        let err = AppConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn blank_file_value_falls_back_to_env() {
        let key = "APPT_TEST_BLANK_FALLBACK_KEY";
        unsafe {
            env::set_var(key, "Europe/Berlin");
        }
        let config = AppConfig::parse(&format!("{key}=\n")).unwrap();
        assert_eq!(config.get(key).as_deref(), Some("Europe/Berlin"));
        unsafe {
            env::remove_var(key);
        }
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::parse("APPT_TEST_BLANK_KEY=\n").unwrap();
        assert_eq!(config.get("APPT_TEST_BLANK_KEY"), None);
    }
}
