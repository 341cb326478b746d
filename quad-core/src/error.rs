use thiserror::Error;

use crate::config::{MAX_TARGET_COUNT, MIN_TARGET_COUNT};
use crate::types::Depth;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path {0:?} has odd length; each level is two characters")]
    OddLength(String),
    #[error("path {path:?} has an invalid quadrant {pair:?} at level {level}")]
    InvalidQuadrant {
        path: String,
        pair: String,
        level: usize,
    },
    #[error("path {0:?} is deeper than any representable depth")]
    TooDeep(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("no node at path {0:?}")]
    NotFound(String),
    #[error("node {path:?} at depth {depth} exceeds max depth {max_depth}")]
    TooDeep {
        path: String,
        depth: Depth,
        max_depth: Depth,
    },
    #[error("internal node {0:?} is missing one or more children")]
    IncompleteInternal(String),
    #[error("node {0:?} has no internal parent")]
    Orphan(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0:?} is not an integer")]
    NotAnInteger(String),
    #[error("target count {0} is outside {min}..={max}", min = MIN_TARGET_COUNT, max = MAX_TARGET_COUNT)]
    OutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read or write quadtree document: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse quadtree JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad node key: {0}")]
    Path(#[from] PathError),
    #[error("document does not form a valid quadtree: {0}")]
    Structure(#[from] TreeError),
    #[error("leaf {0:?} has no value")]
    MissingValue(String),
    #[error("internal node {0:?} carries a value")]
    UnexpectedValue(String),
}

pub type Result<T, E = DocumentError> = std::result::Result<T, E>;
