//! Placement math for letterboxing media onto a target canvas.
//!
//! Everything here is pure: given source dimensions and a shape policy, we
//! compute the canvas size and where the content sits on it. Content is
//! never scaled or cropped, only padded, so the canvas is never smaller
//! than the source on either axis.

use crate::error::{LetterboxError, LetterboxResult};

/// Positive pixel dimensions of a decoded media asset or a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> LetterboxResult<Self> {
        if width == 0 || height == 0 {
            return Err(LetterboxError::validation(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Target shape rule, supplied once per run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapePolicy {
    /// Pad to a fixed width/height ratio.
    AspectRatio(f64),
    /// Pad the short axis until width == height.
    Square,
}

/// Canvas size plus the top-left offset of the content on it.
///
/// Invariant: `offset * 2 + source <= canvas` per axis, i.e. the content is
/// centered with at most one pixel of rounding slack on the trailing edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub canvas: Dimensions,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Independent margin widths for the four edges of a video frame.
///
/// Video padding takes one width per edge rather than a single centering
/// offset, so the trailing-edge slack is made explicit here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgePadding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl EdgePadding {
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }
}

impl Placement {
    /// Replay the centering rule as four edge margins for `source`.
    pub fn edge_padding(&self, source: Dimensions) -> EdgePadding {
        EdgePadding {
            top: self.offset_y,
            bottom: self.canvas.height - source.height - self.offset_y,
            left: self.offset_x,
            right: self.canvas.width - source.width - self.offset_x,
        }
    }
}

/// Compute the target canvas and content offset for `source` under `policy`.
///
/// For `AspectRatio(r)`: the axis that already satisfies the ratio keeps its
/// size and the other grows to `ceil` of the exact target, so the canvas
/// ratio matches `r` within integer rounding. A source already at the target
/// ratio comes back unchanged with zero offsets.
/// Round a computed pixel length up to a whole pixel, rejecting values a
/// `u32` cannot represent instead of silently saturating the cast.
fn ceil_to_pixels(value: f64) -> LetterboxResult<u32> {
    let rounded = value.ceil();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(u32::MAX) {
        return Err(LetterboxError::validation(format!(
            "canvas edge of {value} pixels is out of range"
        )));
    }
    Ok(rounded as u32)
}

pub fn compute_placement(source: Dimensions, policy: ShapePolicy) -> LetterboxResult<Placement> {
    Dimensions::new(source.width, source.height)?;

    match policy {
        ShapePolicy::AspectRatio(ratio) => {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(LetterboxError::validation(format!(
                    "target ratio must be a positive number, got {ratio}"
                )));
            }
            if source.ratio() > ratio {
                // Wider than target: keep width, grow height.
                let canvas_height = ceil_to_pixels(f64::from(source.width) / ratio)?;
                let canvas = Dimensions::new(source.width, canvas_height)?;
                Ok(Placement {
                    canvas,
                    offset_x: 0,
                    offset_y: (canvas_height - source.height) / 2,
                })
            } else {
                // Narrower than (or exactly at) target: keep height, grow width.
                let canvas_width = ceil_to_pixels(f64::from(source.height) * ratio)?;
                let canvas = Dimensions::new(canvas_width.max(source.width), source.height)?;
                Ok(Placement {
                    canvas,
                    offset_x: (canvas.width - source.width) / 2,
                    offset_y: 0,
                })
            }
        }
        ShapePolicy::Square => {
            let side = source.width.max(source.height);
            let canvas = Dimensions::new(side, side)?;
            if source.width > source.height {
                Ok(Placement {
                    canvas,
                    offset_x: 0,
                    offset_y: (side - source.height) / 2,
                })
            } else {
                Ok(Placement {
                    canvas,
                    offset_x: (side - source.width) / 2,
                    offset_y: 0,
                })
            }
        }
    }
}
