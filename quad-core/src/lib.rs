//! Synthetic quadtree generation library.
//!
//! Main components:
//! - [`generator`] — random growth of a tree toward a target node count.
//! - [`tree`] — the node arena and subdivision.
//! - [`document`] — reading and writing the JSON `"nodes"` document.
//! - [`path`] / [`quadrant`] — node addressing.
//! - [`config`] — generation parameters and input bounds.
//! - [`error`] — error types.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod path;
pub mod quadrant;
pub mod tree;
pub mod types;

pub use config::GeneratorConfig;
pub use generator::{GrowthReport, QuadTreeGenerator};
pub use path::QuadPath;
pub use quadrant::{Quad, Quadrant};
pub use tree::{QuadTree, Subdivision};
