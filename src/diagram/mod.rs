//! Class diagram generation
//!
//! Parses the Rust sources of a scenario and writes a PlantUML class
//! diagram. Rendering the diagram to an image is left to PlantUML itself.

mod generate;
pub mod model;
pub mod parse;
pub mod plantuml;

use std::path::PathBuf;

pub use generate::{DiagramOptions, collect, generate};
pub use model::DiagramModel;

/// Errors that can occur while generating a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    /// A file or directory could not be read or written
    Io { path: PathBuf, message: String },
    /// A source file is not valid Rust
    Parse { path: PathBuf, message: String },
}

impl std::fmt::Display for DiagramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "IO error on {}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "Failed to parse {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for DiagramError {}
