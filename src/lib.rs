//! Mindgraph - a knowledge-graph visualization toolkit.
//!
//! This library provides the core functionality for the `mg` CLI tool:
//! a graph data model, named color themes, deterministic layouts, a
//! cancellable reveal animation, neighbor highlighting, and snapshot/bundle
//! export. Graph content is obtained through a pluggable [`source`] boundary
//! and cached on disk by [`storage`].

pub mod bundle;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod source;
pub mod storage;
pub mod view;


/// Library-level error type for Mindgraph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(Box<ureq::Error>),

    #[error("Capability unavailable: {0}")]
    MissingCapability(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::Http(Box::new(err))
    }
}

/// Result type alias for Mindgraph operations.
pub type Result<T> = std::result::Result<T, Error>;
