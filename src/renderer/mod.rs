//! Rendering module
//!
//! The world is drawn in software; wgpu only shows the finished frame.

mod context;
mod texture;

pub use context::Presenter;
pub use texture::FrameTexture;
