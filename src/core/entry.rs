use serde::{Deserialize, Serialize};

use crate::matching::normalize;

/// A named, fixed pool of guessable entries (e.g. a historic squad).
///
/// Owned by the seeding/admin process; read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceSet {
    pub id: i64,

    /// Human title, e.g. "Corinthians 2012 — Libertadores"
    pub title: String,

    #[serde(default)]
    pub season: Option<String>,

    #[serde(default)]
    pub competition: Option<String>,
}

impl ReferenceSet {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            season: None,
            competition: None,
        }
    }
}

/// One guessable item inside a [`ReferenceSet`].
///
/// The normalized name is precomputed at creation; aliases are normalized at
/// use-time by the matching engine. Immutable once attached to a set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceEntry {
    pub id: i64,

    pub set_id: i64,

    /// Name shown to the user once the entry is solved
    pub display_name: String,

    /// Canonical normalized form of `display_name`
    pub normalized_name: String,

    /// Alternate names the entry is also accepted under (nicknames, full names)
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Jersey number, when known
    #[serde(default)]
    pub shirt_number: Option<u8>,

    /// Stable ordering key within the set (roster position, then id)
    #[serde(default)]
    pub sort_key: i64,
}

impl ReferenceEntry {
    /// Create an entry, precomputing the canonical normalized name.
    pub fn new(id: i64, set_id: i64, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let normalized_name = normalize(&display_name);
        Self {
            id,
            set_id,
            display_name,
            normalized_name,
            aliases: Vec::new(),
            shirt_number: None,
            sort_key: id,
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_shirt_number(mut self, number: u8) -> Self {
        self.shirt_number = Some(number);
        self
    }

    /// Normalized forms of the alias list
    pub fn normalized_aliases(&self) -> Vec<String> {
        self.aliases.iter().map(|a| normalize(a)).collect()
    }

    /// Every name the entry answers to, normalized: canonical name first,
    /// then aliases in declared order.
    pub fn accepted_variants(&self) -> Vec<String> {
        let mut variants = vec![self.normalized_name.clone()];
        variants.extend(self.normalized_aliases());
        variants
    }
}
