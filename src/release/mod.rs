//! Release packaging
//!
//! A release is cut from a `v*.*.*` tag: the package directory is zipped as
//! `<name>Module-<tag>.zip` and published with the changelog as its notes.
//! [`ReleaseManifest`] describes the release for the publishing workflow.

mod archive;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use archive::archive_directory;

/// Tags that trigger a release
pub const TAG_PATTERN: &str = "v*.*.*";

/// Content type of the uploaded asset
pub const CONTENT_TYPE: &str = "application/zip";

/// Package name of published releases: `pygreenfootModule-<tag>.zip`
/// holding a top-level `pygreenfoot/` directory
pub const PACKAGE_NAME: &str = "pygreenfoot";

/// Match `text` against a glob where `*` matches any run of characters
/// except `/`
#[must_use]
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(pattern: &[char], text: &[char]) -> bool {
        match pattern.split_first() {
            None => text.is_empty(),
            Some(('*', rest)) => {
                for skip in 0..=text.len() {
                    if matches(rest, &text[skip..]) {
                        return true;
                    }
                    if text.get(skip) == Some(&'/') {
                        break;
                    }
                }
                false
            }
            Some((&c, rest)) => text.first() == Some(&c) && matches(rest, &text[1..]),
        }
    }
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    matches(&pattern, &text)
}

/// A git tag accepted for releases
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseTag(String);

impl ReleaseTag {
    /// Accept a tag matching [`TAG_PATTERN`]; a leading `refs/tags/` is
    /// stripped
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::InvalidTag`] for anything else
    pub fn parse(tag: &str) -> Result<Self, ReleaseError> {
        let tag = tag.trim();
        let tag = tag.strip_prefix("refs/tags/").unwrap_or(tag);
        if glob_match(TAG_PATTERN, tag) {
            Ok(Self(tag.to_string()))
        } else {
            Err(ReleaseError::InvalidTag(tag.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReleaseTag {
    type Error = ReleaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReleaseTag> for String {
    fn from(tag: ReleaseTag) -> Self {
        tag.0
    }
}

/// File name of the release asset
#[must_use]
pub fn asset_name(name: &str, tag: &ReleaseTag) -> String {
    format!("{name}Module-{tag}.zip")
}

/// Release notes: the whole changelog
///
/// # Errors
///
/// Returns [`ReleaseError::MissingChangelog`] if the file does not exist
pub fn release_notes(changelog: impl AsRef<Path>) -> Result<String, ReleaseError> {
    let changelog = changelog.as_ref();
    if !changelog.is_file() {
        return Err(ReleaseError::MissingChangelog(changelog.to_path_buf()));
    }
    fs::read_to_string(changelog).map_err(|e| ReleaseError::io(changelog, &e))
}

/// Everything the publishing step needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub tag: ReleaseTag,
    pub asset_name: String,
    pub content_type: String,
    /// Release notes
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseManifest {
    #[must_use]
    pub fn new(name: &str, tag: ReleaseTag, body: String) -> Self {
        Self {
            asset_name: asset_name(name, &tag),
            tag,
            content_type: String::from(CONTENT_TYPE),
            body,
            draft: false,
            prerelease: false,
        }
    }

    /// # Errors
    ///
    /// Returns [`ReleaseError::Serialize`] if serialization fails
    pub fn to_json(&self) -> Result<String, ReleaseError> {
        serde_json::to_string_pretty(self).map_err(|e| ReleaseError::Serialize(e.to_string()))
    }
}

/// Inputs of [`package`]
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Directory to archive
    pub source_dir: PathBuf,
    /// Package name, also the archive's top-level directory
    pub name: String,
    pub tag: ReleaseTag,
    pub changelog: PathBuf,
    /// Where the archive is written
    pub out_dir: PathBuf,
}

/// Archive the package and build its manifest
///
/// # Errors
///
/// Returns an error if the changelog is missing or the archive cannot be
/// written
pub fn package(options: &PackageOptions) -> Result<ReleaseManifest, ReleaseError> {
    let body = release_notes(&options.changelog)?;
    let manifest = ReleaseManifest::new(&options.name, options.tag.clone(), body);

    fs::create_dir_all(&options.out_dir).map_err(|e| ReleaseError::io(&options.out_dir, &e))?;
    let out = options.out_dir.join(&manifest.asset_name);
    let files = archive_directory(&options.source_dir, &options.name, &out)?;
    log::info!("Packed {files} files into {}", out.display());
    Ok(manifest)
}

/// Errors that can occur while packaging a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
    /// The tag does not match `v*.*.*`
    InvalidTag(String),
    MissingChangelog(PathBuf),
    Io { path: PathBuf, message: String },
    /// Writing the zip archive failed
    Zip(String),
    Serialize(String),
}

impl ReleaseError {
    fn io(path: &Path, e: &std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(tag) => write!(f, "tag {tag:?} does not match {TAG_PATTERN}"),
            Self::MissingChangelog(path) => write!(f, "changelog {} not found", path.display()),
            Self::Io { path, message } => write!(f, "IO error on {}: {message}", path.display()),
            Self::Zip(e) => write!(f, "Zip error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
        }
    }
}

impl std::error::Error for ReleaseError {}
