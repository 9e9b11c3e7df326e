//! Home page composition for the jewellery and gifts view modes.
//!
//! Which promotional sections appear is fixed data per mode; the product
//! grid is the catalog narrowed to the mode's categories.

use serde::{Deserialize, Serialize};

use lustre_core::{Category, Product};

/// Number of products shown in the home page grid.
pub const DISPLAY_COUNT: usize = 6;

const JEWELLERY_CATEGORIES: &[Category] = &[
    Category::Rings,
    Category::Necklaces,
    Category::Earrings,
    Category::Gold,
    Category::Silver,
    Category::Watches,
];

const GIFT_CATEGORIES: &[Category] = &[
    Category::GiftSets,
    Category::Personalized,
    Category::Flowers,
    Category::Cakes,
    Category::Plants,
];

const JEWELLERY_SECTIONS: &[Section] = &[
    Section::Hero,
    Section::Categories,
    Section::DealOfTheDay,
    Section::SpecialDeal,
    Section::CuratedGrid,
    Section::BestsellerBanner,
];

const GIFT_SECTIONS: &[Section] = &[
    Section::Hero,
    Section::Categories,
    Section::BuyingGuide,
    Section::MostLoved,
];

/// Which half of the store the home page shows.
///
/// Chosen per request; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Jewellery,
    Gifts,
}

impl ViewMode {
    /// Categories whose products appear in this mode.
    #[must_use]
    pub const fn categories(self) -> &'static [Category] {
        match self {
            Self::Jewellery => JEWELLERY_CATEGORIES,
            Self::Gifts => GIFT_CATEGORIES,
        }
    }

    /// Sections shown in this mode, in page order.
    #[must_use]
    pub const fn sections(self) -> &'static [Section] {
        match self {
            Self::Jewellery => JEWELLERY_SECTIONS,
            Self::Gifts => GIFT_SECTIONS,
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Jewellery => Self::Gifts,
            Self::Gifts => Self::Jewellery,
        }
    }

    /// Lowercase name, as used in `?mode=`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jewellery => "jewellery",
            Self::Gifts => "gifts",
        }
    }
}

/// A promotional block on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Hero,
    Categories,
    BuyingGuide,
    MostLoved,
    DealOfTheDay,
    SpecialDeal,
    CuratedGrid,
    BestsellerBanner,
}

/// What the home page shows for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeComposition {
    pub mode: ViewMode,
    /// Catalog products in the mode's categories, in catalog order.
    pub display_products: Vec<Product>,
    pub visible_sections: &'static [Section],
}

impl HomeComposition {
    /// The first [`DISPLAY_COUNT`] display products.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        self.display_products
            .get(..DISPLAY_COUNT)
            .unwrap_or(&self.display_products)
    }

    /// Returns `true` if `section` is shown.
    #[must_use]
    pub fn shows(&self, section: Section) -> bool {
        self.visible_sections.contains(&section)
    }
}

/// Compose the home page for `mode`.
#[must_use]
pub fn sections_for(mode: ViewMode, all_products: &[Product]) -> HomeComposition {
    let allowed = mode.categories();
    let display_products = all_products
        .iter()
        .filter(|p| allowed.contains(&p.category))
        .cloned()
        .collect();

    HomeComposition {
        mode,
        display_products,
        visible_sections: mode.sections(),
    }
}
