// src/error.rs
use log::{error, warn};
use std::fmt;
use warp::reject::Reject;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A required element is not present in the document.
    MissingElement(String),
    /// Save or delete was invoked with an empty user id field.
    NoSelection,
    UserNotFound(String),
    MalformedData { source: String, message: String },
    /// An incoming UI event named a selector that matched nothing.
    UnknownTarget(String),
    DashboardUnavailable,
}

impl DashboardError {
    /// Emits the diagnostic at the level matching the failure class.
    pub fn log(&self, context: &str) {
        match self {
            DashboardError::MissingElement(_)
            | DashboardError::NoSelection
            | DashboardError::UserNotFound(_)
            | DashboardError::UnknownTarget(_) => warn!("{}: {}", context, self),
            DashboardError::MalformedData { .. } | DashboardError::DashboardUnavailable => {
                error!("{}: {}", context, self)
            }
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::MissingElement(selector) => write!(f, "{} not found", selector),
            DashboardError::NoSelection => write!(f, "no user selected"),
            DashboardError::UserNotFound(id) => write!(f, "user {} not found", id),
            DashboardError::MalformedData { source, message } => {
                write!(f, "failed to parse {}: {}", source, message)
            }
            DashboardError::UnknownTarget(selector) => {
                write!(f, "no element matches {}", selector)
            }
            DashboardError::DashboardUnavailable => write!(f, "dashboard event loop is not running"),
        }
    }
}

impl std::error::Error for DashboardError {}

impl Reject for DashboardError {}
