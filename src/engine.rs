//! Core sequential rating engine.
//!
//! Processes matches in chronological order and records, for each match, the
//! ratings both sides held before it was played. The engine assumes its input
//! is already sorted; [`crate::stream::MatchStream`] enforces that for CSV
//! input.

use crate::error::{EloError, Result};
use crate::namespace::{Namespace, RatingKey, Scope};
use crate::rating::{expected_score, update_rating, RatingConfig};
use crate::record::ContestRecord;
use crate::store::{InMemoryRatingStore, RatingStore};
use log::trace;

/// Pre-match ratings of both sides in one namespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidePair {
    pub a: f64,
    pub b: f64,
}

impl SidePair {
    /// `a - b`.
    pub fn diff(&self) -> f64 {
        self.a - self.b
    }
}

/// Ratings read for one match before its outcome was applied, one pair per
/// namespace in configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub ratings: Vec<SidePair>,
}

impl Snapshot {
    /// Pair for the namespace at `index`.
    pub fn get(&self, index: usize) -> Option<SidePair> {
        self.ratings.get(index).copied()
    }
}

/// The rating engine.
///
/// Holds one store per active namespace. Every processed match reads each
/// namespace exactly once per side and then writes each side exactly once,
/// so the snapshot for match `i` reflects matches `0..i` and nothing else.
/// Matches must be fed in chronological order from a single thread.
pub struct RatingEngine<S = InMemoryRatingStore> {
    namespaces: Vec<Namespace<S>>,
    k_factor: f64,
    matches_processed: u64,
}

impl RatingEngine<InMemoryRatingStore> {
    /// Creates an engine with empty in-memory stores, one per configured
    /// scope.
    pub fn new(config: RatingConfig) -> Result<Self> {
        let stores = in_memory_stores(&config);
        Self::with_stores(config, stores)
    }
}

fn in_memory_stores(config: &RatingConfig) -> Vec<InMemoryRatingStore> {
    config
        .scopes
        .iter()
        .map(|_| InMemoryRatingStore::new(config.start_rating))
        .collect()
}

impl<S: RatingStore> RatingEngine<S> {
    /// Creates an engine over caller-provided stores, paired with
    /// `config.scopes` by position. The stores' own defaults decide what an
    /// unseen key reads as.
    pub fn with_stores(config: RatingConfig, stores: Vec<S>) -> Result<Self> {
        config.validate()?;
        if stores.len() != config.scopes.len() {
            return Err(EloError::InvalidConfig {
                message: format!(
                    "{} stores supplied for {} namespaces",
                    stores.len(),
                    config.scopes.len()
                ),
            });
        }
        Ok(Self::assemble(&config, stores))
    }

    /// Pairs scopes with stores. Callers validate `config` first.
    fn assemble(config: &RatingConfig, stores: Vec<S>) -> Self {
        let namespaces = config
            .scopes
            .iter()
            .zip(stores)
            .map(|(scope, store)| Namespace::new(*scope, store))
            .collect();

        RatingEngine {
            namespaces,
            k_factor: config.k_factor,
            matches_processed: 0,
        }
    }

    /// Rates one match and returns the pre-match snapshot.
    ///
    /// Namespaces are independent, so each is read, scored and written in
    /// turn. Both sides' expectations come from the same pre-match pair.
    pub fn process(&mut self, record: &ContestRecord) -> Snapshot {
        let score_a = record.outcome.score_a();
        let score_b = record.outcome.score_b();
        let context = record.context.as_deref();
        let k = self.k_factor;

        let ratings = self
            .namespaces
            .iter_mut()
            .map(|ns| {
                let scope = ns.scope();
                let key_a = scope.key(&record.player_a, context);
                let key_b = scope.key(&record.player_b, context);

                let store = ns.store_mut();
                let pair = SidePair {
                    a: store.get(&key_a),
                    b: store.get(&key_b),
                };

                let expected_a = expected_score(pair.a, pair.b);
                let expected_b = expected_score(pair.b, pair.a);

                store.set(key_a, update_rating(pair.a, expected_a, score_a, k));
                store.set(key_b, update_rating(pair.b, expected_b, score_b, k));

                pair
            })
            .collect();

        self.matches_processed += 1;
        let snapshot = Snapshot { ratings };
        trace!(
            "Match {}: {} vs {} on {}, pre-match {:?}",
            self.matches_processed, record.player_a, record.player_b, record.date, snapshot.ratings
        );
        snapshot
    }

    /// Rates every match in order and returns one snapshot per match.
    pub fn run<'a, I>(&mut self, records: I) -> Vec<Snapshot>
    where
        I: IntoIterator<Item = &'a ContestRecord>,
    {
        records
            .into_iter()
            .map(|record| self.process(record))
            .collect()
    }

    /// Current rating of `player` in the namespace with `scope`.
    ///
    /// Returns `None` if that namespace is not active.
    pub fn rating(&self, scope: Scope, player: &str, context: Option<&str>) -> Option<f64> {
        self.namespace(scope)
            .map(|ns| ns.store().get(&scope.key(player, context)))
    }

    /// Active namespaces in configured order.
    pub fn namespaces(&self) -> &[Namespace<S>] {
        &self.namespaces
    }

    fn namespace(&self, scope: Scope) -> Option<&Namespace<S>> {
        self.namespaces.iter().find(|ns| ns.scope() == scope)
    }

    /// Number of matches rated so far.
    pub fn matches_processed(&self) -> u64 {
        self.matches_processed
    }

    /// All materialized ratings, grouped by namespace in configured order and
    /// sorted by key within each.
    pub fn final_ratings(&self) -> Vec<(Scope, RatingKey, f64)> {
        self.namespaces
            .iter()
            .flat_map(|ns| {
                let mut entries = ns.store().entries();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                entries
                    .into_iter()
                    .map(move |(key, rating)| (ns.scope(), key, rating))
            })
            .collect()
    }
}

impl Default for RatingEngine<InMemoryRatingStore> {
    /// Global and surface namespaces, start rating 1500, k 32.
    fn default() -> Self {
        let config = RatingConfig::default();
        debug_assert!(config.validate().is_ok());
        let stores = in_memory_stores(&config);
        Self::assemble(&config, stores)
    }
}
