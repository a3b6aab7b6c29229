//! Walking a source tree and writing the diagram file

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::model::DiagramModel;
use super::{DiagramError, parse, plantuml};
use crate::core::Config;

/// Directories never scanned
const SKIPPED_DIRS: &[&str] = &["target", ".git"];

/// Where to read sources and where to write the diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOptions {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File name without the `.wsd` extension
    pub output_file: String,
    /// Directories whose name ends with one of these are skipped
    pub ignore: Vec<String>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("_structure"),
            output_file: String::from("diagram"),
            ignore: Vec::new(),
        }
    }
}

impl DiagramOptions {
    #[must_use]
    pub fn from_config(config: &Config, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: PathBuf::from(&config.diagram_output_dir),
            output_file: config.diagram_file.clone(),
            ignore: config.diagram_ignore.clone(),
        }
    }

    /// Full path of the written `.wsd` file
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.wsd", self.output_file))
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        SKIPPED_DIRS.contains(&name.as_ref())
            || self
                .ignore
                .iter()
                .filter(|suffix| !suffix.is_empty())
                .any(|suffix| name.ends_with(suffix.as_str()))
    }
}

/// Parse every `.rs` file under the source directory
///
/// # Errors
///
/// Returns an error naming the first file that cannot be read or parsed
pub fn collect(options: &DiagramOptions) -> Result<DiagramModel, DiagramError> {
    let mut model = DiagramModel::new();
    let walker = WalkDir::new(&options.source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !options.is_skipped(entry));

    for entry in walker {
        let entry = entry.map_err(|e| DiagramError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_default(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }

        log::info!("Parsing {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| DiagramError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        parse::parse_source(&source, &mut model).map_err(|e| DiagramError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    Ok(model)
}

/// Write the class diagram; returns the path of the written file
///
/// # Errors
///
/// Returns an error if a source file cannot be parsed or the output cannot
/// be written
pub fn generate(options: &DiagramOptions) -> Result<PathBuf, DiagramError> {
    let model = collect(options)?;
    let text = plantuml::render(&model);

    let io_error = |path: &Path, e: std::io::Error| DiagramError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    fs::create_dir_all(&options.output_dir).map_err(|e| io_error(&options.output_dir, e))?;
    let path = options.output_path();
    fs::write(&path, text).map_err(|e| io_error(&path, e))?;

    log::info!(
        "Wrote class diagram with {} classes to {}",
        model.len(),
        path.display()
    );
    Ok(path)
}
