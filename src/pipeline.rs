//! The end-to-end acquisition run.
//!
//! One asset at a time: enumerate each configured source, fetch every item
//! into the downloaded folder (writing a caption sidecar on success), then
//! hand the whole folder to the normalizer. A bad asset or an unreachable
//! listing never aborts the run; only configuration failure is fatal, and
//! that happens before a pipeline is ever constructed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::Options;
use crate::error::{LetterboxError, LetterboxResult};
use crate::fetch::{Fetcher, SystemVideoTool, VideoTool};
use crate::normalize::{NormalizeSummary, normalize_folder};
use crate::source::{Listing, MediaAsset, MediaKind, RedditListing, SourceItem, url_extension};

pub struct AcquisitionPipeline<L: Listing, T: VideoTool> {
    options: Options,
    listing: L,
    fetcher: Fetcher<T>,
}

impl AcquisitionPipeline<RedditListing, SystemVideoTool> {
    pub fn new(options: Options) -> LetterboxResult<Self> {
        let listing = RedditListing::new(&options.user_agent)?;
        let fetcher = Fetcher::new(&options.user_agent)?;
        Ok(Self::with_collaborators(options, listing, fetcher))
    }
}

impl<L: Listing, T: VideoTool> AcquisitionPipeline<L, T> {
    pub fn with_collaborators(options: Options, listing: L, fetcher: Fetcher<T>) -> Self {
        Self {
            options,
            listing,
            fetcher,
        }
    }

    /// Fetch everything under `data_root/downloaded`, then normalize into
    /// `data_root/standardized`. Both folders are created if absent.
    #[tracing::instrument(skip(self))]
    pub fn run(&self, data_root: &Path) -> LetterboxResult<NormalizeSummary> {
        let downloaded = data_root.join("downloaded");
        let standardized = data_root.join("standardized");
        for dir in [&downloaded, &standardized] {
            fs::create_dir_all(dir).map_err(|e| {
                LetterboxError::validation(format!("cannot create '{}': {e}", dir.display()))
            })?;
        }

        self.acquire(&downloaded);
        normalize_folder(
            &downloaded,
            &standardized,
            self.options.normalization.method.policy(),
        )
    }

    /// Enumerate all configured sources and fetch each discovered item.
    fn acquire(&self, downloaded: &Path) {
        for source in &self.options.sources {
            let items = match self.listing.list(
                source,
                self.options.timeframe,
                self.options.item_limit,
            ) {
                Ok(items) => items,
                Err(e) => {
                    error!(%source, error = %e, "listing failed, skipping source");
                    continue;
                }
            };
            info!(%source, items = items.len(), "enumerated source");

            for item in items {
                if let Some(asset) = self.fetch_item(&item, downloaded) {
                    if let Err(e) = write_caption(&item, &asset) {
                        warn!(asset = %asset.id, error = %e, "caption write failed");
                    }
                }
            }
        }
    }

    /// Fetch one item; returns the completed asset on success.
    fn fetch_item(&self, item: &SourceItem, downloaded: &Path) -> Option<MediaAsset> {
        let filename = match item.kind {
            MediaKind::Image => {
                let ext = url_extension(&item.url)?;
                format!("{}.{ext}", item.id)
            }
            MediaKind::Video => format!("{}.mp4", item.id),
        };
        let dest = downloaded.join(filename);

        let asset = MediaAsset {
            id: item.id.clone(),
            source_url: item.url.clone(),
            kind: item.kind,
            local_path: None,
        };

        let outcome = self.fetcher.fetch(&asset, &dest);
        outcome.success.then(|| MediaAsset {
            local_path: Some(dest),
            ..asset
        })
    }
}

/// Write the human-readable caption sidecar next to the fetched media file:
/// the item title, then a blank line and the body text when present.
fn write_caption(item: &SourceItem, asset: &MediaAsset) -> LetterboxResult<()> {
    let media_path = asset
        .local_path
        .as_deref()
        .ok_or_else(|| LetterboxError::validation("caption requires a fetched asset"))?;
    let caption_path: PathBuf = media_path.with_extension("txt");

    let mut text = item.title.clone();
    if let Some(body) = &item.body {
        text.push_str("\n\n");
        text.push_str(body);
    }
    fs::write(&caption_path, text).map_err(|e| {
        LetterboxError::encode(format!("writing caption '{}': {e}", caption_path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, kind: MediaKind, body: Option<&str>) -> SourceItem {
        SourceItem {
            id: id.into(),
            url: format!("https://i.example/{id}.jpg"),
            kind,
            title: "A scenic view".into(),
            body: body.map(Into::into),
        }
    }

    fn fetched_asset(id: &str, dir: &Path) -> MediaAsset {
        let path = dir.join(format!("{id}.jpg"));
        fs::write(&path, b"media").unwrap();
        MediaAsset {
            id: id.into(),
            source_url: format!("https://i.example/{id}.jpg"),
            kind: MediaKind::Image,
            local_path: Some(path),
        }
    }

    #[test]
    fn caption_contains_title_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let asset = fetched_asset("abc", dir.path());
        write_caption(&item("abc", MediaKind::Image, Some("from last summer")), &asset).unwrap();

        let text = fs::read_to_string(dir.path().join("abc.txt")).unwrap();
        assert_eq!(text, "A scenic view\n\nfrom last summer");
    }

    #[test]
    fn caption_without_body_is_title_only() {
        let dir = tempfile::tempdir().unwrap();
        let asset = fetched_asset("abc", dir.path());
        write_caption(&item("abc", MediaKind::Image, None), &asset).unwrap();

        let text = fs::read_to_string(dir.path().join("abc.txt")).unwrap();
        assert_eq!(text, "A scenic view");
    }

    #[test]
    fn unfetched_asset_cannot_have_a_caption() {
        let asset = MediaAsset {
            id: "abc".into(),
            source_url: "https://i.example/abc.jpg".into(),
            kind: MediaKind::Image,
            local_path: None,
        };
        assert!(write_caption(&item("abc", MediaKind::Image, None), &asset).is_err());
    }
}
