use std::env;
use std::path::PathBuf;

use hbnb_core::storage::Backend;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Selected backend (default: file)
    pub storage: Backend,
    /// Path to the JSON store (default: "file.json")
    pub file_path: PathBuf,
    /// Path to the SQLite database file (default: "hbnb.db")
    pub sqlite_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HBNB_TYPE_STORAGE` - `db` selects SQLite, anything else the file backend
    /// - `HBNB_FILE_PATH` - JSON store path (default: "file.json")
    /// - `HBNB_SQLITE_PATH` - SQLite database path (default: "hbnb.db")
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            storage: parse_backend(lookup("HBNB_TYPE_STORAGE").as_deref()),
            file_path: lookup("HBNB_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("file.json")),
            sqlite_path: lookup("HBNB_SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("hbnb.db")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `db` (any case, surrounding whitespace ignored) selects SQLite.
pub fn parse_backend(value: Option<&str>) -> Backend {
    match value {
        Some(v) if v.trim().eq_ignore_ascii_case("db") => Backend::Db,
        _ => Backend::File,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.storage, Backend::File);
        assert_eq!(config.file_path, PathBuf::from("file.json"));
        assert_eq!(config.sqlite_path, PathBuf::from("hbnb.db"));
    }

    #[test]
    fn test_db_selects_sqlite() {
        let config = config_from(&[
            ("HBNB_TYPE_STORAGE", "db"),
            ("HBNB_SQLITE_PATH", "/tmp/test.db"),
        ]);

        assert_eq!(config.storage, Backend::Db);
        assert_eq!(config.sqlite_path, PathBuf::from("/tmp/test.db"));
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend(Some("DB")), Backend::Db);
        assert_eq!(parse_backend(Some(" db ")), Backend::Db);
        assert_eq!(parse_backend(Some("file")), Backend::File);
        assert_eq!(parse_backend(Some("mysql")), Backend::File);
        assert_eq!(parse_backend(None), Backend::File);
    }
}
