//! Video letterboxing via the system `ffmpeg` binary.
//!
//! Video compositing cannot be done by pure pixel copy, so the source is
//! re-encoded once with a pad filter sized from the same placement math the
//! image path uses. The audio track is stream-copied untouched and ffmpeg
//! keeps the source frame rate. All failures are terminal for the asset;
//! retries belong to the fetch layer, not here.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{LetterboxError, LetterboxResult};
use crate::geometry::{Dimensions, Placement, ShapePolicy, compute_placement};
use crate::probe::probe_dimensions;
use crate::tool::run_checked;

/// Fill semantics of the padded margins.
///
/// Aspect-ratio mode pads opaque black; square mode pads at zero opacity.
/// The asymmetry is specified behavior and selected by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    Opaque,
    Transparent,
}

impl FillMode {
    pub fn for_policy(policy: ShapePolicy) -> Self {
        match policy {
            ShapePolicy::AspectRatio(_) => FillMode::Opaque,
            ShapePolicy::Square => FillMode::Transparent,
        }
    }

    fn ffmpeg_color(&self) -> &'static str {
        match self {
            FillMode::Opaque => "black",
            FillMode::Transparent => "black@0.0",
        }
    }
}

/// Re-encode `input` (of known `source` dimensions) onto the placement
/// canvas with `fill` margins.
///
/// A zero-padding placement needs no re-encode at all and is satisfied by a
/// byte copy.
pub fn pad_video(
    input: &Path,
    output: &Path,
    source: Dimensions,
    placement: Placement,
    fill: FillMode,
) -> LetterboxResult<()> {
    let padding = placement.edge_padding(source);

    if padding.is_zero() {
        fs::copy(input, output).map_err(|e| {
            LetterboxError::encode(format!("copying to '{}': {e}", output.display()))
        })?;
        info!(path = %output.display(), "video already at target shape, copied");
        return Ok(());
    }

    let filter = format!(
        "pad={}:{}:{}:{}:color={}",
        placement.canvas.width,
        placement.canvas.height,
        placement.offset_x,
        placement.offset_y,
        fill.ffmpeg_color()
    );

    run_checked(
        "video pad",
        Command::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-vf", &filter, "-c:a", "copy"])
            .arg(output),
    )
    .map_err(classify_pad_failure)?;

    info!(
        path = %output.display(),
        canvas_width = placement.canvas.width,
        canvas_height = placement.canvas.height,
        "standardized video"
    );
    Ok(())
}

/// Probe, compute placement for `policy`, and pad with the policy's fill.
pub fn render_video(input: &Path, output: &Path, policy: ShapePolicy) -> LetterboxResult<()> {
    let source = probe_dimensions(input)?;
    let placement = compute_placement(source, policy)?;
    pad_video(input, output, source, placement, FillMode::for_policy(policy))
}

/// Pad failures are encode errors unless ffmpeg reports a codec it cannot
/// handle.
fn classify_pad_failure(err: LetterboxError) -> LetterboxError {
    let LetterboxError::ToolInvocation(msg) = err else {
        return err;
    };
    let lowered = msg.to_ascii_lowercase();
    if lowered.contains("unknown decoder")
        || lowered.contains("decoder not found")
        || lowered.contains("unsupported codec")
    {
        LetterboxError::unsupported_codec(msg)
    } else {
        LetterboxError::Encode(msg)
    }
}
