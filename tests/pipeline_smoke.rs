use std::path::Path;

use letterbox::{
    AcquisitionPipeline, Fetcher, LetterboxError, LetterboxResult, Listing, Options, SourceItem,
    Timeframe, VideoTool,
};

/// Listing where one source is unreachable and the rest are empty.
struct FlakyListing;

impl Listing for FlakyListing {
    fn list(
        &self,
        source: &str,
        _timeframe: Timeframe,
        _limit: u32,
    ) -> LetterboxResult<Vec<SourceItem>> {
        if source == "down" {
            Err(LetterboxError::network("listing endpoint unreachable"))
        } else {
            Ok(Vec::new())
        }
    }
}

/// Tooling that must never be reached when no items are listed.
struct UnreachableTool;

impl VideoTool for UnreachableTool {
    fn primary_download(&self, _url: &str, _dest: &Path) -> LetterboxResult<()> {
        unreachable!("no video items were listed")
    }
    fn fetch_segment(&self, _url: &str, _dest: &Path) -> LetterboxResult<()> {
        unreachable!("no video items were listed")
    }
    fn mux(&self, _video: &Path, _audio: &Path, _dest: &Path) -> LetterboxResult<()> {
        unreachable!("no video items were listed")
    }
}

fn options() -> Options {
    serde_json::from_str(
        r#"{
            "sources": ["down", "quiet"],
            "item_limit": 5,
            "timeframe": "day",
            "normalization": { "method": "square" },
            "user_agent": "letterbox/0.1 (integration test)"
        }"#,
    )
    .unwrap()
}

#[test]
fn unreachable_listing_does_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();

    let fetcher = Fetcher::with_tool("letterbox/0.1 (integration test)", UnreachableTool).unwrap();
    let pipeline = AcquisitionPipeline::with_collaborators(options(), FlakyListing, fetcher);

    let summary = pipeline.run(dir.path()).unwrap();
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 0);

    // Both trees were bootstrapped even though nothing was fetched.
    assert!(dir.path().join("downloaded").is_dir());
    assert!(dir.path().join("standardized").is_dir());
}
