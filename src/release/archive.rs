//! Zip archives of a directory tree

use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use super::ReleaseError;

/// Archive path of `relative` below `top_level`, always `/` separated
fn entry_name(top_level: &str, relative: &Path) -> String {
    let mut name = String::from(top_level.trim_matches('/'));
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

/// Zip every file under `dir` into `out`, below a single `top_level/`
/// directory; returns the number of files written
///
/// # Errors
///
/// Returns an error if `dir` cannot be read or `out` cannot be written
pub fn archive_directory(
    dir: impl AsRef<Path>,
    top_level: &str,
    out: impl AsRef<Path>,
) -> Result<usize, ReleaseError> {
    let dir = dir.as_ref();
    let out = out.as_ref();

    // List first so the archive never contains itself
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ReleaseError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    let file = File::create(out).map_err(|e| ReleaseError::io(out, &e))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.add_directory(format!("{}/", top_level.trim_matches('/')), options)
        .map_err(|e| ReleaseError::Zip(e.to_string()))?;
    for path in &files {
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let name = entry_name(top_level, relative);
        log::debug!("Adding {name}");
        let contents = fs::read(path).map_err(|e| ReleaseError::io(path, &e))?;
        zip.start_file(name, options)
            .map_err(|e| ReleaseError::Zip(e.to_string()))?;
        zip.write_all(&contents)
            .map_err(|e| ReleaseError::io(out, &e))?;
    }
    zip.finish().map_err(|e| ReleaseError::Zip(e.to_string()))?;
    Ok(files.len())
}
