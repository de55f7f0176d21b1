//! Source video inspection via `ffprobe`.

use std::path::Path;
use std::process::Command;

use crate::error::{LetterboxError, LetterboxResult};
use crate::geometry::Dimensions;
use crate::tool::run_checked;

/// Probe a video file for its pixel dimensions.
pub fn probe_dimensions(source_path: &Path) -> LetterboxResult<Dimensions> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = run_checked(
        "video probe",
        Command::new("ffprobe")
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(source_path),
    )?;

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| LetterboxError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            LetterboxError::decode(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;

    let width = video_stream
        .width
        .ok_or_else(|| LetterboxError::decode("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| LetterboxError::decode("missing video height from ffprobe"))?;

    Dimensions::new(width, height)
}
