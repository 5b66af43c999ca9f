// src/config.rs
use log::warn;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3030);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub users_path: PathBuf,
    pub stocks_path: PathBuf,
    pub logo_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let addr = match lookup("DASHBOARD_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring DASHBOARD_ADDR {:?}: {}", raw, e);
                SocketAddr::from(DEFAULT_ADDR)
            }),
            None => SocketAddr::from(DEFAULT_ADDR),
        };
        let path = |key: &str, default: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Config {
            addr,
            users_path: path("DASHBOARD_USERS", "data/users.json"),
            stocks_path: path("DASHBOARD_STOCKS", "data/stocks.json"),
            logo_dir: path("DASHBOARD_LOGOS", "logos"),
        }
    }
}
