//! Run configuration, loaded once at startup.
//!
//! The schema is closed: unknown fields are rejected rather than ignored so
//! a typo in the options file surfaces as a configuration error instead of a
//! silently different run. Configuration failure is the only fatal error
//! class; nothing is fetched or rendered before load succeeds.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LetterboxError, LetterboxResult};
use crate::geometry::ShapePolicy;

/// Portrait publishing ratio targeted by the aspect-ratio method.
pub const PORTRAIT_RATIO: f64 = 4.0 / 5.0;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Community names to enumerate, in order.
    pub sources: Vec<String>,
    /// Maximum number of items fetched per source.
    pub item_limit: u32,
    /// Listing window for the top-items query.
    pub timeframe: Timeframe,
    pub normalization: Normalization,
    /// Identity sent with every listing/download request.
    pub user_agent: String,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Hour => "hour",
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
            Timeframe::All => "all",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Normalization {
    pub method: Method,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    AspectRatio,
    Square,
}

impl Method {
    pub fn policy(&self) -> ShapePolicy {
        match self {
            Method::AspectRatio => ShapePolicy::AspectRatio(PORTRAIT_RATIO),
            Method::Square => ShapePolicy::Square,
        }
    }
}

impl Options {
    pub fn load(path: &Path) -> LetterboxResult<Self> {
        let f = File::open(path).map_err(|e| {
            LetterboxError::config(format!("cannot open options file '{}': {e}", path.display()))
        })?;
        let options: Options = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            LetterboxError::config(format!("malformed options file '{}': {e}", path.display()))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> LetterboxResult<()> {
        if self.sources.is_empty() {
            return Err(LetterboxError::config("at least one source is required"));
        }
        if self.item_limit == 0 {
            return Err(LetterboxError::config("item_limit must be greater than zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(LetterboxError::config("user_agent must not be empty"));
        }
        Ok(())
    }
}
