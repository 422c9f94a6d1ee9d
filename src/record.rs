//! Match models for CSV parsing and internal representation.

use crate::error::{EloError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Date layouts accepted for `tourney_date`, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// Date-time layouts whose date part is kept.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Rating-relevant columns of one input row.
///
/// Other columns of the row are not deserialized; the pipeline copies them
/// through from the raw record.
#[derive(Debug, Deserialize)]
pub struct MatchRow {
    /// Tournament start date
    pub tourney_date: String,

    /// Surface tag (only needed when surface ratings are active)
    #[serde(default)]
    pub surface: Option<String>,

    /// Side A competitor
    pub player_a_name: String,

    /// Side B competitor
    pub player_b_name: String,

    /// `1` if side A won, `0` if side B won
    pub player_a_win: String,
}

impl MatchRow {
    /// Validates the raw row into a contest record.
    ///
    /// `row` is the 1-indexed line number used in error messages.
    /// `require_context` rejects rows without a surface tag.
    pub fn parse(&self, row: usize, require_context: bool) -> Result<ContestRecord> {
        let date = parse_date(&self.tourney_date).ok_or_else(|| EloError::InvalidRecord {
            row,
            message: format!("unrecognised tourney_date '{}'", self.tourney_date),
        })?;

        let player_a = non_empty(&self.player_a_name, "player_a_name", row)?;
        let player_b = non_empty(&self.player_b_name, "player_b_name", row)?;

        let outcome = Outcome::parse(&self.player_a_win).ok_or_else(|| EloError::InvalidRecord {
            row,
            message: format!("player_a_win must be 0 or 1, got '{}'", self.player_a_win),
        })?;

        let context = self
            .surface
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if require_context && context.is_none() {
            return Err(EloError::InvalidRecord {
                row,
                message: "missing surface".to_string(),
            });
        }

        Ok(ContestRecord {
            date,
            player_a,
            player_b,
            context,
            outcome,
        })
    }
}

fn non_empty(value: &str, column: &str, row: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EloError::InvalidRecord {
            row,
            message: format!("empty {}", column),
        });
    }
    Ok(trimmed.to_string())
}

/// Parses `YYYYMMDD`, `YYYY-MM-DD` or a date-time whose time is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Result of a match from side A's point of view. There are no draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AWon,
    BWon,
}

impl Outcome {
    /// Parses `1`/`0`, `1.0`/`0.0` or `true`/`false`.
    pub fn parse(value: &str) -> Option<Outcome> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "1" | "true" => Some(Outcome::AWon),
            "0" | "false" => Some(Outcome::BWon),
            other => match other.parse::<f64>().ok()? {
                x if x == 1.0 => Some(Outcome::AWon),
                x if x == 0.0 => Some(Outcome::BWon),
                _ => None,
            },
        }
    }

    /// Observed score of side A.
    pub fn score_a(self) -> f64 {
        match self {
            Outcome::AWon => 1.0,
            Outcome::BWon => 0.0,
        }
    }

    /// Observed score of side B.
    pub fn score_b(self) -> f64 {
        1.0 - self.score_a()
    }
}

/// A validated match ready for rating.
#[derive(Debug, Clone, PartialEq)]
pub struct ContestRecord {
    /// Match date; streams are non-decreasing in this field
    pub date: NaiveDate,

    /// Side A competitor
    pub player_a: String,

    /// Side B competitor
    pub player_b: String,

    /// Surface tag
    pub context: Option<String>,

    /// Who won
    pub outcome: Outcome,
}

impl ContestRecord {
    /// Builds a record directly, for callers that do not read CSV.
    pub fn new(
        date: NaiveDate,
        player_a: impl Into<String>,
        player_b: impl Into<String>,
        context: Option<&str>,
        outcome: Outcome,
    ) -> Self {
        ContestRecord {
            date,
            player_a: player_a.into(),
            player_b: player_b.into(),
            context: context.map(str::to_string),
            outcome,
        }
    }
}
