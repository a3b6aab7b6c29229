//! Crate-wide error type

use crate::assets::ResourceError;
use crate::audio::AudioError;
use crate::core::ConfigError;
use crate::core::snapshot::SnapshotError;
use crate::diagram::DiagramError;
use crate::graphics::ImageError;
use crate::release::ReleaseError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Any error the framework can report
#[derive(Debug)]
pub enum Error {
    /// The operation needs a world but none is set
    NoWorld,
    /// Window or event loop failure
    Window(String),
    Config(ConfigError),
    Resource(ResourceError),
    Image(ImageError),
    Audio(AudioError),
    Snapshot(SnapshotError),
    Diagram(DiagramError),
    Release(ReleaseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWorld => write!(f, "no world has been set"),
            Self::Window(e) => write!(f, "window error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Resource(e) => write!(f, "resource error: {e}"),
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::Audio(e) => write!(f, "audio error: {e}"),
            Self::Snapshot(e) => write!(f, "snapshot error: {e}"),
            Self::Diagram(e) => write!(f, "diagram error: {e}"),
            Self::Release(e) => write!(f, "release error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoWorld | Self::Window(_) => None,
            Self::Config(e) => Some(e),
            Self::Resource(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::Audio(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::Diagram(e) => Some(e),
            Self::Release(e) => Some(e),
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Error {
                fn from(e: $source) -> Self {
                    Self::$variant(e)
                }
            }
        )*
    };
}

impl_from! {
    ConfigError => Config,
    ResourceError => Resource,
    ImageError => Image,
    AudioError => Audio,
    SnapshotError => Snapshot,
    DiagramError => Diagram,
    ReleaseError => Release,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_from_keeps_source() {
        let err: Error = ConfigError::Malformed { line: 4 }.into();
        assert!(matches!(err, Error::Config(ConfigError::Malformed { line: 4 })));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_no_world_message() {
        assert_eq!(Error::NoWorld.to_string(), "no world has been set");
        assert!(Error::NoWorld.source().is_none());
    }
}
