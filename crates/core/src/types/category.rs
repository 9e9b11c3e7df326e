//! Catalog categories.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of product categories.
///
/// Serialized using the human-readable label (e.g. `"Gift Sets"`), which is
/// also the form used in URLs and search filters. Label matching is
/// case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Rings,
    Necklaces,
    Earrings,
    Bracelets,
    Gold,
    Silver,
    Watches,
    #[serde(rename = "Gift Sets")]
    GiftSets,
    Personalized,
    Flowers,
    Cakes,
    Plants,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 12] = [
        Self::Rings,
        Self::Necklaces,
        Self::Earrings,
        Self::Bracelets,
        Self::Gold,
        Self::Silver,
        Self::Watches,
        Self::GiftSets,
        Self::Personalized,
        Self::Flowers,
        Self::Cakes,
        Self::Plants,
    ];

    /// The display label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rings => "Rings",
            Self::Necklaces => "Necklaces",
            Self::Earrings => "Earrings",
            Self::Bracelets => "Bracelets",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Watches => "Watches",
            Self::GiftSets => "Gift Sets",
            Self::Personalized => "Personalized",
            Self::Flowers => "Flowers",
            Self::Cakes => "Cakes",
            Self::Plants => "Plants",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
