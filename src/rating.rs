//! Elo expectation and update formulas, plus the rating configuration.
//!
//! Both formulas are pure functions over `f64`. Ratings are never clamped:
//! a long losing streak may push a rating arbitrarily low, which is accepted.

use crate::error::{EloError, Result};
use crate::namespace::Scope;

/// Rating every competitor holds before their first recorded match.
pub const DEFAULT_START_RATING: f64 = 1500.0;

/// Default sensitivity constant.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rating difference at which the favourite is expected to win ten times
/// as often as the underdog.
const LOGISTIC_SCALE: f64 = 400.0;

/// Probability that a side rated `rating_a` beats a side rated `rating_b`.
///
/// `expected_score(a, b) + expected_score(b, a)` is 1 within rounding, and
/// equal ratings give exactly 0.5.
///
/// # Examples
///
/// ```
/// use tennis_elo::expected_score;
///
/// assert_eq!(expected_score(1500.0, 1500.0), 0.5);
/// assert!(expected_score(1600.0, 1500.0) > 0.5);
/// ```
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / LOGISTIC_SCALE))
}

/// New rating after a match: `rating + k * (score - expected)`.
///
/// `score` is 1.0 for a win and 0.0 for a loss. `rating` and `expected`
/// must both be the values from before this match.
pub fn update_rating(rating: f64, expected: f64, score: f64, k_factor: f64) -> f64 {
    rating + k_factor * (score - expected)
}

/// Constants and active namespaces for one rating run.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingConfig {
    /// Rating read for any key that has never been written.
    pub start_rating: f64,

    /// Maximum rating swing per match.
    pub k_factor: f64,

    /// Active namespaces, in snapshot order.
    pub scopes: Vec<Scope>,
}

impl RatingConfig {
    /// Configuration with only the global namespace active.
    pub fn global_only() -> Self {
        RatingConfig {
            scopes: vec![Scope::Global],
            ..Self::default()
        }
    }

    /// Returns `true` if a namespace needs each record's surface tag.
    pub fn requires_context(&self) -> bool {
        self.scopes.iter().any(|s| s.requires_context())
    }

    /// Rejects non-finite constants, a non-positive `k` and empty or
    /// duplicated scope lists.
    pub fn validate(&self) -> Result<()> {
        if !self.start_rating.is_finite() {
            return Err(invalid_config(format!(
                "start rating must be finite, got {}",
                self.start_rating
            )));
        }
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(invalid_config(format!(
                "k-factor must be a positive finite number, got {}",
                self.k_factor
            )));
        }
        if self.scopes.is_empty() {
            return Err(invalid_config("at least one rating namespace is required".into()));
        }
        for (idx, scope) in self.scopes.iter().enumerate() {
            if self.scopes[..idx].contains(scope) {
                return Err(invalid_config(format!(
                    "namespace '{}' listed more than once",
                    scope
                )));
            }
        }
        Ok(())
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        RatingConfig {
            start_rating: DEFAULT_START_RATING,
            k_factor: DEFAULT_K_FACTOR,
            scopes: vec![Scope::Global, Scope::Surface],
        }
    }
}

fn invalid_config(message: String) -> EloError {
    EloError::InvalidConfig { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_equal_ratings_give_even_odds() {
        for r in [-250.0, 0.0, 1200.0, 1500.0, 2850.5] {
            assert_eq!(expected_score(r, r), 0.5);
        }
    }

    #[test]
    fn test_expectations_are_complementary() {
        let pairs = [
            (1500.0, 1500.0),
            (1516.0, 1500.0),
            (2100.0, 1350.0),
            (900.0, 2400.0),
            (-40.0, 12.5),
        ];
        for (a, b) in pairs {
            let sum = expected_score(a, b) + expected_score(b, a);
            assert!((sum - 1.0).abs() < EPS, "sum {} for ({}, {})", sum, a, b);
        }
    }

    #[test]
    fn test_expectation_is_monotonic() {
        let base = expected_score(1500.0, 1500.0);
        assert!(expected_score(1550.0, 1500.0) > base);
        assert!(expected_score(1500.0, 1550.0) < base);
        assert!(expected_score(1600.0, 1500.0) > expected_score(1550.0, 1500.0));
    }

    #[test]
    fn test_expectation_stays_inside_unit_interval() {
        let e = expected_score(2400.0, 800.0);
        assert!(e > 0.0 && e < 1.0);
        let e = expected_score(800.0, 2400.0);
        assert!(e > 0.0 && e < 1.0);
    }

    #[test]
    fn test_four_hundred_points_is_ten_to_one() {
        let e = expected_score(1900.0, 1500.0);
        assert!((e - 10.0 / 11.0).abs() < EPS);
    }

    #[test]
    fn test_update_moves_by_k_times_surprise() {
        assert_eq!(update_rating(1500.0, 0.5, 1.0, 32.0), 1516.0);
        assert_eq!(update_rating(1500.0, 0.5, 0.0, 32.0), 1484.0);
        assert_eq!(update_rating(1500.0, 0.25, 1.0, 10.0), 1507.5);
    }

    #[test]
    fn test_update_is_not_clamped() {
        let r = update_rating(-3000.0, 0.9, 0.0, 500.0);
        assert_eq!(r, -3450.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RatingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start_rating, 1500.0);
        assert_eq!(config.k_factor, 32.0);
        assert!(config.requires_context());
        assert!(!RatingConfig::global_only().requires_context());
    }

    #[test]
    fn test_validate_rejects_bad_constants() {
        let config = RatingConfig {
            k_factor: 0.0,
            ..RatingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EloError::InvalidConfig { .. })
        ));

        let config = RatingConfig {
            start_rating: f64::NAN,
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scopes() {
        let config = RatingConfig {
            scopes: vec![],
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RatingConfig {
            scopes: vec![Scope::Surface, Scope::Surface],
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
