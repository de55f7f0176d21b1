//! Renderers that composite decoded content onto the computed canvas.

pub mod image;
pub mod video;
