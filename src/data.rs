// src/data.rs
use crate::error::DashboardError;
use crate::models::{Stock, UserRecord};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Raw JSON text for both collections, as supplied at startup.
#[derive(Debug, Clone, Default)]
pub struct DataSources {
    pub users: Option<String>,
    pub stocks: Option<String>,
}

impl DataSources {
    pub fn from_files(users: &Path, stocks: &Path) -> Self {
        DataSources {
            users: read_source(users),
            stocks: read_source(stocks),
        }
    }
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Data file {} not found.", path.display());
            None
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

pub fn parse_collection<T: DeserializeOwned>(
    source: &str,
    text: Option<&str>,
) -> Result<Vec<T>, DashboardError> {
    match text {
        None => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| DashboardError::MalformedData {
            source: source.to_string(),
            message: e.to_string(),
        }),
    }
}

/// The two collections the dashboard works on.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub users: Vec<UserRecord>,
    pub stocks: Vec<Stock>,
}

impl AppState {
    /// Parses both sources; a source that is absent or malformed yields an
    /// empty collection.
    pub fn load(sources: &DataSources) -> Self {
        let stocks = parse_collection("stocks", sources.stocks.as_deref()).unwrap_or_else(|e| {
            e.log("Loading stocks");
            Vec::new()
        });
        let users = parse_collection("users", sources.users.as_deref()).unwrap_or_else(|e| {
            e.log("Loading users");
            Vec::new()
        });
        info!("Loaded {} users and {} stocks.", users.len(), stocks.len());
        AppState { users, stocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn absent_sources_give_empty_collections() {
        let state = AppState::load(&DataSources::default());
        assert!(state.users.is_empty());
        assert!(state.stocks.is_empty());
    }

    #[test]
    fn malformed_source_is_reported_and_defaults_to_empty() {
        let err = parse_collection::<UserRecord>("users", Some("[{\"id\": 1,")).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedData { ref source, .. } if source == "users"));

        let state = AppState::load(&DataSources {
            users: Some("not json".to_string()),
            stocks: Some(r#"[{"symbol": "X", "name": "Xco"}]"#.to_string()),
        });
        assert!(state.users.is_empty());
        assert_eq!(state.stocks.len(), 1);
    }

    #[test]
    fn non_array_json_is_malformed() {
        assert!(parse_collection::<Stock>("stocks", Some("{}")).is_err());
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let sources = DataSources::from_files(
            &PathBuf::from("does/not/exist/users.json"),
            &PathBuf::from("does/not/exist/stocks.json"),
        );
        assert!(sources.users.is_none());
        assert!(sources.stocks.is_none());
    }

    #[test]
    fn bundled_data_files_parse() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
        let sources = DataSources::from_files(&root.join("users.json"), &root.join("stocks.json"));
        let state = AppState::load(&sources);
        assert!(!state.users.is_empty());
        assert!(!state.stocks.is_empty());
    }
}
