//! Remote listing enumeration and asset classification.
//!
//! A [`Listing`] yields the ordered items of a community's top listing; the
//! bundled [`RedditListing`] talks to the public JSON endpoint with the
//! configured user agent. Classification by URL is done once here and the
//! resulting [`MediaKind`] is matched exhaustively downstream.

use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Timeframe;
use crate::error::{LetterboxError, LetterboxResult};

/// Extensions fetched by the direct static-download path.
pub const STATIC_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One discovered remote asset. `local_path` is populated on successful
/// fetch and never mutated afterward.
#[derive(Clone, Debug)]
pub struct MediaAsset {
    pub id: String,
    pub source_url: String,
    pub kind: MediaKind,
    pub local_path: Option<PathBuf>,
}

/// One item of a listing, as supplied by the enumeration collaborator.
#[derive(Clone, Debug)]
pub struct SourceItem {
    pub id: String,
    pub url: String,
    pub kind: MediaKind,
    pub title: String,
    pub body: Option<String>,
}

/// Enumeration collaborator: supplies the ordered items of one source.
pub trait Listing {
    fn list(
        &self,
        source: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> LetterboxResult<Vec<SourceItem>>;
}

/// The trailing extension of a URL's path segment, lowercased.
pub fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Classify a listing URL into a media kind, or `None` for anything this
/// pipeline does not handle (galleries, articles, external hosts).
pub fn classify_url(url: &str, is_video: bool) -> Option<MediaKind> {
    if let Some(ext) = url_extension(url) {
        if STATIC_EXTENSIONS.contains(&ext.as_str()) {
            return Some(MediaKind::Image);
        }
    }
    if is_video || url.contains("v.redd.it") {
        return Some(MediaKind::Video);
    }
    None
}

/// Listing over the public top-items JSON endpoint.
pub struct RedditListing {
    client: reqwest::blocking::Client,
}

impl RedditListing {
    pub fn new(user_agent: &str) -> LetterboxResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_owned())
            .build()
            .map_err(|e| LetterboxError::network(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[derive(Deserialize)]
struct ListingResponse {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: SubmissionData,
}

#[derive(Deserialize)]
struct SubmissionData {
    id: String,
    url: String,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    is_video: bool,
}

impl Listing for RedditListing {
    fn list(
        &self,
        source: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> LetterboxResult<Vec<SourceItem>> {
        let url = format!("https://www.reddit.com/r/{source}/top.json");
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("t", timeframe.as_str()), ("limit", limit.as_str())])
            .send()
            .map_err(|e| LetterboxError::network(format!("listing request for r/{source}: {e}")))?;

        if !response.status().is_success() {
            return Err(LetterboxError::network(format!(
                "listing request for r/{source} returned {}",
                response.status()
            )));
        }

        let listing: ListingResponse = response.json().map_err(|e| {
            LetterboxError::network(format!("malformed listing payload for r/{source}: {e}"))
        })?;

        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|child| item_from_submission(child.data))
            .collect())
    }
}

fn item_from_submission(post: SubmissionData) -> Option<SourceItem> {
    let kind = classify_url(&post.url, post.is_video)?;
    Some(SourceItem {
        id: post.id,
        url: post.url,
        kind,
        title: post.title,
        body: (!post.selftext.is_empty()).then_some(post.selftext),
    })
}
