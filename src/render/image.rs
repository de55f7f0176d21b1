//! Still-image letterboxing.
//!
//! The compositing core is pure pixel copy onto an opaque black canvas;
//! decode and JPEG encode wrap it at the I/O edges.

use std::path::Path;

use image::{ImageFormat, RgbImage, imageops};
use tracing::info;

use crate::error::{LetterboxError, LetterboxResult};
use crate::geometry::{Dimensions, Placement, ShapePolicy, compute_placement};

/// Composite `source` onto an opaque black canvas at the placement offset,
/// without scaling.
pub fn pad_image(source: &RgbImage, placement: Placement) -> RgbImage {
    // RgbImage::new zero-fills, which is already opaque black.
    let mut canvas = RgbImage::new(placement.canvas.width, placement.canvas.height);
    imageops::replace(
        &mut canvas,
        source,
        i64::from(placement.offset_x),
        i64::from(placement.offset_y),
    );
    canvas
}

/// Decode `input`, pad it to satisfy `policy`, and encode the result as
/// JPEG at `output`.
pub fn render_image(input: &Path, output: &Path, policy: ShapePolicy) -> LetterboxResult<()> {
    let decoded = image::open(input)
        .map_err(|e| LetterboxError::decode(format!("'{}': {e}", input.display())))?
        .to_rgb8();

    let source = Dimensions::new(decoded.width(), decoded.height())?;
    let placement = compute_placement(source, policy)?;
    let canvas = pad_image(&decoded, placement);

    canvas
        .save_with_format(output, ImageFormat::Jpeg)
        .map_err(|e| LetterboxError::encode(format!("'{}': {e}", output.display())))?;

    info!(
        path = %output.display(),
        canvas_width = placement.canvas.width,
        canvas_height = placement.canvas.height,
        "standardized image"
    );
    Ok(())
}
