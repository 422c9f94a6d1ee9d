//! Rating namespaces and the keys they store ratings under.

use crate::store::RatingStore;
use std::fmt;

/// Key of one stored rating.
///
/// Ordering sorts global keys before context keys, then by player name and
/// context, which is the order of the final ratings table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RatingKey {
    /// Competitor identity alone.
    Player(String),

    /// Competitor identity within one context, e.g. a surface.
    PlayerContext(String, String),
}

impl RatingKey {
    /// Competitor this key belongs to.
    pub fn player(&self) -> &str {
        match self {
            RatingKey::Player(name) => name,
            RatingKey::PlayerContext(name, _) => name,
        }
    }

    /// Context tag, if the key is context scoped.
    pub fn context(&self) -> Option<&str> {
        match self {
            RatingKey::Player(_) => None,
            RatingKey::PlayerContext(_, context) => Some(context),
        }
    }
}

/// How a namespace derives rating keys from a competitor and a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One rating per competitor across every match.
    Global,

    /// One rating per competitor per surface.
    Surface,
}

impl Scope {
    /// Builds the key for `player` in a match played in `context`.
    ///
    /// A surface key for a match without a surface tag uses the empty
    /// context; streams reject such rows before they reach the engine.
    pub fn key(&self, player: &str, context: Option<&str>) -> RatingKey {
        match self {
            Scope::Global => RatingKey::Player(player.to_string()),
            Scope::Surface => {
                RatingKey::PlayerContext(player.to_string(), context.unwrap_or("").to_string())
            }
        }
    }

    /// Returns `true` if keys depend on the match context.
    pub fn requires_context(&self) -> bool {
        matches!(self, Scope::Surface)
    }

    /// Output columns for side A, side B and their difference.
    pub fn feature_columns(&self) -> [&'static str; 3] {
        match self {
            Scope::Global => ["player_a_elo", "player_b_elo", "elo_diff"],
            Scope::Surface => [
                "player_a_elo_surface",
                "player_b_elo_surface",
                "elo_surface_diff",
            ],
        }
    }

    /// Short name used in logs and the ratings table.
    pub fn name(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Surface => "surface",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scope together with the store holding its ratings.
///
/// Namespaces share no state; the engine updates each one from the same
/// match outcomes.
#[derive(Debug)]
pub struct Namespace<S> {
    scope: Scope,
    store: S,
}

impl<S: RatingStore> Namespace<S> {
    pub fn new(scope: Scope, store: S) -> Self {
        Namespace { scope, store }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
