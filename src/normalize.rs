//! Folder normalization with per-file failure isolation.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{LetterboxError, LetterboxResult};
use crate::geometry::ShapePolicy;
use crate::render::{image::render_image, video::render_video};

/// Media classification, resolved once per file from its extension and then
/// matched exhaustively. Unsupported is a silent skip, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Unsupported,
}

impl MediaType {
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return MediaType::Unsupported;
        };
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" => MediaType::Image,
            "mp4" => MediaType::Video,
            _ => MediaType::Unsupported,
        }
    }
}

/// Counts for one normalization run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Normalize every regular file in `source_dir` into `dest_dir` under
/// `policy`, keeping input filenames.
///
/// Files are processed independently: a renderer failure is logged with the
/// offending path and the remaining files still run.
#[tracing::instrument(skip(policy))]
pub fn normalize_folder(
    source_dir: &Path,
    dest_dir: &Path,
    policy: ShapePolicy,
) -> LetterboxResult<NormalizeSummary> {
    let entries = fs::read_dir(source_dir).map_err(|e| {
        LetterboxError::validation(format!(
            "cannot read source folder '{}': {e}",
            source_dir.display()
        ))
    })?;

    // Sorted for deterministic processing order and logs.
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut summary = NormalizeSummary::default();
    for input in paths {
        let Some(name) = input.file_name() else {
            continue;
        };
        let output = dest_dir.join(name);

        let result = match MediaType::from_path(&input) {
            MediaType::Image => render_image(&input, &output, policy),
            MediaType::Video => render_video(&input, &output, policy),
            MediaType::Unsupported => {
                debug!(path = %input.display(), "skipping unsupported file type");
                summary.skipped += 1;
                continue;
            }
        };

        match result {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                warn!(path = %input.display(), error = %e, "normalization failed, skipping file");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
