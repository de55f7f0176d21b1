//! Letterbox pulls media assets from remote listings and normalizes their
//! geometry to a fixed publishing shape.
//!
//! # Pipeline overview
//!
//! 1. **Enumerate**: a [`source::Listing`] yields the ordered items of each
//!    configured source.
//! 2. **Fetch**: [`fetch::Fetcher`] acquires one asset at a time: a direct
//!    HTTP GET for static media, or a primary stream download with a single
//!    segment-stitching fallback for video.
//! 3. **Normalize**: [`normalize::normalize_folder`] dispatches each file to
//!    the image or video renderer, which pads it onto the canvas computed by
//!    [`geometry::compute_placement`]. Content is never scaled or cropped.
//!
//! The whole run is sequential and blocking; external tools (`yt-dlp`,
//! `ffmpeg`, `ffprobe`) are invoked as child processes and their diagnostics
//! surface in the error messages.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod normalize;
pub mod pipeline;
pub mod probe;
pub mod render;
pub mod source;
pub mod tool;

pub use config::{Method, Options, Timeframe};
pub use error::{LetterboxError, LetterboxResult};
pub use fetch::{FetchOutcome, FetchStrategy, Fetcher, SystemVideoTool, VideoTool};
pub use geometry::{Dimensions, EdgePadding, Placement, ShapePolicy, compute_placement};
pub use normalize::{MediaType, NormalizeSummary, normalize_folder};
pub use pipeline::AcquisitionPipeline;
pub use source::{Listing, MediaAsset, MediaKind, RedditListing, SourceItem};
