//! Rating storage.
//!
//! A store maps rating keys to ratings. Keys that were never written read
//! as the store's starting rating without being materialized.

use crate::namespace::RatingKey;
use std::collections::HashMap;

/// Read/overwrite access to the ratings of one namespace.
pub trait RatingStore {
    /// Current rating for `key`, or the starting rating if never written.
    fn get(&self, key: &RatingKey) -> f64;

    /// Overwrites the rating for `key`.
    fn set(&mut self, key: RatingKey, rating: f64);

    /// Number of materialized keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All materialized ratings, in no particular order.
    fn entries(&self) -> Vec<(RatingKey, f64)>;
}

/// `HashMap`-backed store used for normal runs.
#[derive(Debug, Clone)]
pub struct InMemoryRatingStore {
    start_rating: f64,
    ratings: HashMap<RatingKey, f64>,
}

impl InMemoryRatingStore {
    /// Creates an empty store whose unknown keys read as `start_rating`.
    pub fn new(start_rating: f64) -> Self {
        InMemoryRatingStore {
            start_rating,
            ratings: HashMap::new(),
        }
    }

    pub fn start_rating(&self) -> f64 {
        self.start_rating
    }
}

impl RatingStore for InMemoryRatingStore {
    fn get(&self, key: &RatingKey) -> f64 {
        self.ratings
            .get(key)
            .copied()
            .unwrap_or(self.start_rating)
    }

    fn set(&mut self, key: RatingKey, rating: f64) {
        self.ratings.insert(key, rating);
    }

    fn len(&self) -> usize {
        self.ratings.len()
    }

    fn entries(&self) -> Vec<(RatingKey, f64)> {
        self.ratings
            .iter()
            .map(|(key, rating)| (key.clone(), *rating))
            .collect()
    }
}
