//! INI file configuration adapter.
//!
//! Backs [`ConfigPort`] with a configparser INI file. Raw key lookup
//! stays private; callers only see the typed accessors and their
//! `ConfigMissing`/`ConfigInvalid` errors.

use crate::domain::error::ScreenError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use configparser::ini::Ini;
use std::path::{Path, PathBuf};

pub struct IniConfigAdapter {
    config: Ini,
}

impl IniConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn require(&self, section: &str, key: &str) -> Result<String, ScreenError> {
        self.get(section, key).ok_or_else(|| ScreenError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
    }
}

/// Parse an evaluation date in ISO form, from config or a CLI flag.
pub fn parse_screen_date(raw: &str) -> Result<NaiveDate, ScreenError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ScreenError::ConfigInvalid {
        section: "screen".into(),
        key: "date".into(),
        reason: format!("{}: {}", raw, e),
    })
}

impl ConfigPort for IniConfigAdapter {
    fn history_dir(&self) -> Result<PathBuf, ScreenError> {
        self.require("data", "history_dir").map(PathBuf::from)
    }

    fn watchlist_path(&self) -> Result<PathBuf, ScreenError> {
        self.require("screen", "watchlist").map(PathBuf::from)
    }

    fn exchange(&self) -> Option<String> {
        self.get("screen", "exchange").map(|e| e.to_uppercase())
    }

    fn date(&self) -> Result<Option<NaiveDate>, ScreenError> {
        match self.get("screen", "date") {
            None => Ok(None),
            Some(raw) => parse_screen_date(&raw).map(Some),
        }
    }

    fn output(&self) -> Option<String> {
        self.get("screen", "output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL: &str = r#"
[data]
history_dir = /var/data/prices

[screen]
watchlist = watchlist.csv
exchange = hose
date = 2024-05-06
output = out.csv
"#;

    #[test]
    fn typed_accessors_read_full_config() {
        let adapter = IniConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(
            adapter.history_dir().unwrap(),
            PathBuf::from("/var/data/prices")
        );
        assert_eq!(
            adapter.watchlist_path().unwrap(),
            PathBuf::from("watchlist.csv")
        );
        assert_eq!(adapter.output(), Some("out.csv".to_string()));
    }

    #[test]
    fn exchange_is_uppercased() {
        let adapter = IniConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(adapter.exchange(), Some("HOSE".to_string()));
    }

    #[test]
    fn missing_required_key_is_config_missing() {
        let adapter = IniConfigAdapter::from_string("[screen]\nexchange = HNX\n").unwrap();
        let err = adapter.history_dir().unwrap_err();
        assert!(matches!(
            err,
            ScreenError::ConfigMissing { ref section, ref key }
                if section == "data" && key == "history_dir"
        ));
        assert!(adapter.watchlist_path().is_err());
    }

    #[test]
    fn optional_keys_default_to_none() {
        let adapter = IniConfigAdapter::from_string("[data]\nhistory_dir = /p\n").unwrap();
        assert_eq!(adapter.exchange(), None);
        assert_eq!(adapter.output(), None);
        assert_eq!(adapter.date().unwrap(), None);
    }

    #[test]
    fn date_parses_iso() {
        let adapter = IniConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(
            adapter.date().unwrap(),
            Some(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap())
        );
    }

    #[test]
    fn bad_date_is_config_invalid() {
        let adapter = IniConfigAdapter::from_string("[screen]\ndate = 06/05/2024\n").unwrap();
        let err = adapter.date().unwrap_err();
        assert!(matches!(err, ScreenError::ConfigInvalid { ref key, .. } if key == "date"));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[data]\nhistory_dir = /prices\n").unwrap();
        let adapter = IniConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.history_dir().unwrap(), PathBuf::from("/prices"));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        assert!(IniConfigAdapter::from_file("/nonexistent/config.ini").is_err());
    }
}
