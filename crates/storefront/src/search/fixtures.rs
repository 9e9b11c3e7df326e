//! Fixed occasion and deal lists merged into search alongside the live catalog.

use std::sync::LazyLock;

use lustre_core::{Category, Price, Product, ProductId};

/// Occasion-themed picks, merged after the live catalog.
pub static OCCASION_PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        fixture(
            "occ-1",
            "Anniversary Couple Rings",
            Category::Rings,
            (24_999, Some(29_999)),
            "Matching sterling silver bands for the two of you",
            &["925 Sterling Silver", "Free engraving"],
        ),
        fixture(
            "occ-2",
            "Birthday Blooms Bouquet",
            Category::Flowers,
            (1_299, None),
            "Twelve fresh roses hand-tied with ribbon",
            &["Same-day delivery"],
        ),
        fixture(
            "occ-3",
            "Personalised Name Necklace",
            Category::Personalized,
            (3_499, None),
            "Gold-plated pendant with your name",
            &["18K gold plating", "Adjustable chain"],
        ),
        fixture(
            "occ-4",
            "Wedding Gift Hamper",
            Category::GiftSets,
            (5_999, None),
            "Curated hamper with a keepsake earring box",
            &["Includes greeting card"],
        ),
        fixture(
            "occ-5",
            "Mother's Day Orchid",
            Category::Plants,
            (1_899, None),
            "Purple orchid in a ceramic pot",
            &[],
        ),
        fixture(
            "occ-6",
            "Red Velvet Celebration Cake",
            Category::Cakes,
            (899, None),
            "Half kilo eggless red velvet",
            &[],
        ),
    ]
});

/// Limited-time deals, merged last so they override earlier entries by id.
pub static DEAL_PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        fixture(
            "deal-1",
            "Solitaire Diamond Ring",
            Category::Rings,
            (45_999, Some(59_999)),
            "Half carat solitaire in white gold",
            &["0.5 ct diamond", "BIS hallmarked"],
        ),
        fixture(
            "deal-2",
            "Silver Charm Bracelet",
            Category::Bracelets,
            (2_499, Some(3_999)),
            "Sterling silver with three charms",
            &[],
        ),
        fixture(
            "deal-3",
            "Heritage Bridal Necklace Set",
            Category::Necklaces,
            (125_000, Some(149_999)),
            "Kundan necklace with matching earrings",
            &["22K gold", "Handcrafted"],
        ),
        fixture(
            "deal-4",
            "Classic Steel Watch",
            Category::Watches,
            (7_999, Some(9_999)),
            "Analog steel watch with date display",
            &["Water resistant"],
        ),
        // Same id as the occasion bouquet: the deal price wins.
        fixture(
            "occ-2",
            "Birthday Blooms Bouquet",
            Category::Flowers,
            (999, Some(1_299)),
            "Twelve fresh roses hand-tied with ribbon",
            &["Same-day delivery"],
        ),
    ]
});

fn fixture(
    id: &str,
    name: &str,
    category: Category,
    (price, original): (u32, Option<u32>),
    description: &str,
    specs: &[&str],
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category,
        price: Price::from_rupees(price),
        original_price: original.map(Price::from_rupees),
        image: format!("/static/fixtures/{id}.jpg"),
        description: Some(description.to_string()),
        specs: specs.iter().map(|s| (*s).to_string()).collect(),
        in_stock: true,
        on_discount: original.is_some(),
    }
}
