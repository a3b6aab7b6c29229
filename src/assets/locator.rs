//! Resource lookup
//!
//! Images and sounds are referred to by file name. A name is first looked up
//! in the configured folder for its kind, then taken as a path on its own.

use std::path::{Path, PathBuf};

use crate::core::Config;

/// What a resource is used for; decides the folder it is searched in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Sound,
    /// Any other kind, searched in a folder of that name
    Other(String),
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Sound => f.write_str("sound"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

/// Folders resources are looked up in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub image_folder: PathBuf,
    pub sound_folder: PathBuf,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            image_folder: PathBuf::from("images"),
            sound_folder: PathBuf::from("sounds"),
        }
    }
}

impl Resources {
    #[must_use]
    pub fn new(image_folder: impl Into<PathBuf>, sound_folder: impl Into<PathBuf>) -> Self {
        Self {
            image_folder: image_folder.into(),
            sound_folder: sound_folder.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.image_folder, &config.sound_folder)
    }

    /// Folder searched first for a kind
    #[must_use]
    pub fn folder(&self, kind: &ResourceKind) -> PathBuf {
        match kind {
            ResourceKind::Image => self.image_folder.clone(),
            ResourceKind::Sound => self.sound_folder.clone(),
            ResourceKind::Other(name) => PathBuf::from(name),
        }
    }

    /// Find a readable file for `file`
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if neither `folder/file` nor
    /// `file` can be read
    pub fn resolve(&self, file: impl AsRef<Path>, kind: ResourceKind) -> Result<PathBuf, ResourceError> {
        let file = file.as_ref();
        let in_folder = self.folder(&kind).join(file);
        if is_readable(&in_folder) {
            return Ok(in_folder);
        }
        if is_readable(file) {
            return Ok(file.to_path_buf());
        }
        Err(ResourceError::NotFound {
            file: file.to_path_buf(),
            kind,
        })
    }
}

fn is_readable(path: &Path) -> bool {
    std::fs::File::open(path).is_ok_and(|f| f.metadata().is_ok_and(|m| m.is_file()))
}

/// Errors that can occur while locating resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No readable file for the name
    NotFound { file: PathBuf, kind: ResourceKind },
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { file, kind } => {
                write!(f, "{kind} resource {} not found", file.display())
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_first_then_plain_path() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        std::fs::write(images.join("bug.png"), b"x").unwrap();
        std::fs::write(dir.path().join("loose.png"), b"x").unwrap();

        let resources = Resources::new(&images, dir.path().join("sounds"));
        assert_eq!(
            resources.resolve("bug.png", ResourceKind::Image).unwrap(),
            images.join("bug.png")
        );
        let loose = dir.path().join("loose.png");
        assert_eq!(resources.resolve(&loose, ResourceKind::Image).unwrap(), loose);
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resources = Resources::new(dir.path(), dir.path());
        let err = resources.resolve("missing.wav", ResourceKind::Sound).unwrap_err();
        assert_eq!(
            err,
            ResourceError::NotFound {
                file: PathBuf::from("missing.wav"),
                kind: ResourceKind::Sound
            }
        );
        assert_eq!(err.to_string(), "sound resource missing.wav not found");
    }

    #[test]
    fn test_directories_are_not_resources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let resources = Resources::new(dir.path(), dir.path());
        assert!(resources.resolve("sub", ResourceKind::Image).is_err());
    }

    #[test]
    fn test_other_kind_uses_its_name_as_folder() {
        let resources = Resources::default();
        assert_eq!(
            resources.folder(&ResourceKind::Other(String::from("levels"))),
            PathBuf::from("levels")
        );
    }
}
