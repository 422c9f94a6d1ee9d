//! # Tennis Elo
//!
//! A streaming rating engine that turns a chronologically sorted match
//! history into pre-match Elo features for both players.
//!
//! ## Design Principles
//!
//! - **Pre-match snapshots**: each match's features are read before its
//!   outcome is applied, so a result never leaks into its own predictor
//! - **Single forward pass**: matches are rated strictly in order; dates that
//!   go backwards abort the run
//! - **Independent namespaces**: global and per-surface ratings are kept in
//!   separate stores and updated from the same outcomes
//! - **Deterministic output**: identical input yields byte-identical output
//!
//! ## Example
//!
//! ```no_run
//! use tennis_elo::{process_csv, InvalidRowPolicy, RatingConfig, RatingEngine};
//! use std::io::Cursor;
//!
//! let csv = "tourney_date,surface,player_a_name,player_b_name,player_a_win\n\
//!            20190107,HARD,Novak Djokovic,Andy Murray,1\n";
//! let mut engine = RatingEngine::new(RatingConfig::default()).unwrap();
//! process_csv(&mut engine, Cursor::new(csv), std::io::stdout(), InvalidRowPolicy::Fail).unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod namespace;
pub mod pipeline;
pub mod rating;
pub mod record;
pub mod store;
pub mod stream;

pub use engine::{RatingEngine, SidePair, Snapshot};
pub use error::{EloError, Result};
pub use namespace::{Namespace, RatingKey, Scope};
pub use pipeline::{process_csv, write_file_atomically, write_ratings, RunSummary};
pub use rating::{expected_score, update_rating, RatingConfig, DEFAULT_K_FACTOR, DEFAULT_START_RATING};
pub use record::{ContestRecord, MatchRow, Outcome};
pub use store::{InMemoryRatingStore, RatingStore};
pub use stream::{InvalidRowPolicy, MatchStream, StreamedMatch};
