//! Home page route handler.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::content::ContentStore;
use crate::error::Result;
use crate::i18n::LocalizationStore;
use crate::merchandising::{Section, ViewMode, sections_for};
use crate::middleware::ShopperLanguage;
use crate::routes::products::ProductCard;
use crate::schedule::{CAROUSEL_INTERVAL, COUNTDOWN_TICK, Carousel, Countdown, CountdownSnapshot};
use crate::state::AppState;

// =============================================================================
// Hero Configuration
// =============================================================================

/// Static description of a hero slide; the image comes from the asset map.
struct SlideContent {
    asset_key: &'static str,
    fallback_image: &'static str,
    title: &'static str,
    subtitle: Option<&'static str>,
    button_text: &'static str,
    button_url: &'static str,
}

const JEWELLERY_SLIDES: &[SlideContent] = &[
    SlideContent {
        asset_key: "hero_jewellery_1",
        fallback_image: "/static/images/hero/bridal.jpg",
        title: "The Bridal Edit",
        subtitle: Some("Heirloom gold and diamonds for the big day"),
        button_text: "Shop Bridal",
        button_url: "/search?category=Gold",
    },
    SlideContent {
        asset_key: "hero_jewellery_2",
        fallback_image: "/static/images/hero/everyday.jpg",
        title: "Everyday Sparkle",
        subtitle: None,
        button_text: "Shop Earrings",
        button_url: "/search?category=Earrings",
    },
    SlideContent {
        asset_key: "hero_jewellery_3",
        fallback_image: "/static/images/hero/watches.jpg",
        title: "Timeless Watches",
        subtitle: Some("Crafted to be worn for a lifetime"),
        button_text: "Shop Watches",
        button_url: "/search?category=Watches",
    },
];

const GIFT_SLIDES: &[SlideContent] = &[
    SlideContent {
        asset_key: "hero_gifts_1",
        fallback_image: "/static/images/hero/gift-hampers.jpg",
        title: "Gifts for Every Occasion",
        subtitle: Some("Hampers, flowers and cakes delivered with love"),
        button_text: "Shop Gift Sets",
        button_url: "/search?category=Gift%20Sets",
    },
    SlideContent {
        asset_key: "hero_gifts_2",
        fallback_image: "/static/images/hero/personalized.jpg",
        title: "Make It Personal",
        subtitle: None,
        button_text: "Shop Personalized",
        button_url: "/search?category=Personalized",
    },
];

/// A single slide in the hero carousel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub title: String,
    pub subtitle: Option<String>,
    pub button_text: String,
    pub button_url: String,
    pub image_url: String,
}

/// Hero carousel configuration.
///
/// `next_slide` wraps to the first slide after the last; clients request it
/// with `?slide=` once `autoplay_ms` has passed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroConfig {
    pub slides: Vec<HeroSlide>,
    pub active_slide: Option<usize>,
    pub next_slide: Option<usize>,
    pub autoplay_ms: u64,
}

impl HeroConfig {
    fn for_mode(mode: ViewMode, content: &ContentStore, slide: Option<usize>) -> Self {
        let content_for_mode = match mode {
            ViewMode::Jewellery => JEWELLERY_SLIDES,
            ViewMode::Gifts => GIFT_SLIDES,
        };
        let slides: Vec<HeroSlide> = content_for_mode
            .iter()
            .map(|slide| HeroSlide {
                title: slide.title.to_string(),
                subtitle: slide.subtitle.map(str::to_string),
                button_text: slide.button_text.to_string(),
                button_url: slide.button_url.to_string(),
                image_url: content.resolve_asset(slide.asset_key, slide.fallback_image),
            })
            .collect();

        let mut carousel = Carousel::new(slides.len());
        if let Some(index) = slide {
            carousel.go_to(index);
        }
        let active_slide = carousel.current();
        let next_slide = carousel.advance();

        Self {
            active_slide,
            next_slide,
            slides,
            autoplay_ms: duration_ms(CAROUSEL_INTERVAL),
        }
    }
}

// =============================================================================
// Page View
// =============================================================================

/// A visible section with its localized heading.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub id: Section,
    pub title: Option<String>,
}

/// Deal of the Day countdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealCountdown {
    pub ends_at: DateTime<Utc>,
    pub remaining: CountdownSnapshot,
    pub tick_ms: u64,
}

/// Home page view model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub mode: ViewMode,
    /// Mode the toggle switches to.
    pub toggle_mode: ViewMode,
    pub sections: Vec<SectionView>,
    pub hero: HeroConfig,
    pub featured: Vec<ProductCard>,
    pub deal_countdown: Option<DealCountdown>,
}

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub mode: ViewMode,
    /// Hero slide to show; out-of-range values keep the first.
    #[serde(default)]
    pub slide: Option<usize>,
}

/// Display the home page for the requested mode.
#[instrument(skip_all, fields(mode = tracing::field::Empty))]
pub async fn home(
    State(state): State<AppState>,
    ShopperLanguage(language): ShopperLanguage,
    query: std::result::Result<Query<HomeQuery>, QueryRejection>,
) -> Result<Json<HomePage>> {
    let Query(query) = query?;
    tracing::Span::current().record("mode", query.mode.as_str());
    let catalog = state.catalog().list();
    let composition = sections_for(query.mode, &catalog);
    let now = Utc::now();

    let sections = composition
        .visible_sections
        .iter()
        .map(|&section| SectionView {
            id: section,
            title: section_title(section, state.i18n(), language),
        })
        .collect();

    let deal_countdown = composition.shows(Section::DealOfTheDay).then(|| {
        let countdown = Countdown::until_end_of_day(now);
        DealCountdown {
            ends_at: countdown.deadline(),
            remaining: countdown.remaining_at(now),
            tick_ms: duration_ms(COUNTDOWN_TICK),
        }
    });

    Ok(Json(HomePage {
        mode: composition.mode,
        toggle_mode: composition.mode.toggled(),
        sections,
        hero: HeroConfig::for_mode(composition.mode, state.content(), query.slide),
        featured: composition.featured().iter().map(ProductCard::from).collect(),
        deal_countdown,
    }))
}

fn section_title(section: Section, i18n: &LocalizationStore, language: &str) -> Option<String> {
    let key = match section {
        Section::Hero => return None,
        Section::Categories => "home.categories",
        Section::BuyingGuide => "home.buying_guide",
        Section::MostLoved => "home.most_loved",
        Section::DealOfTheDay => "home.deal_of_the_day",
        Section::SpecialDeal => "home.special_deal",
        Section::CuratedGrid => "home.curated",
        Section::BestsellerBanner => "home.bestsellers",
    };
    Some(i18n.t(language, key))
}

fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use crate::backend::{AssetEntry, Backend, InMemoryBackend};

    use super::*;

    #[tokio::test]
    async fn test_hero_images_fall_back_when_asset_missing() {
        let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new().with_assets(vec![
            AssetEntry {
                key: "hero_jewellery_2".to_string(),
                value: "https://cdn.example/everyday.jpg".to_string(),
            },
        ]));
        let content = ContentStore::new(backend);
        content.refresh_assets().await.unwrap();

        let hero = HeroConfig::for_mode(ViewMode::Jewellery, &content, None);
        assert_eq!(hero.slides.len(), 3);
        assert_eq!(hero.slides[0].image_url, "/static/images/hero/bridal.jpg");
        assert_eq!(hero.slides[1].image_url, "https://cdn.example/everyday.jpg");
        assert_eq!(hero.active_slide, Some(0));
        assert_eq!(hero.next_slide, Some(1));
        assert_eq!(hero.autoplay_ms, 5_000);
    }

    #[test]
    fn test_hero_slide_rotation_wraps() {
        let content = ContentStore::new(Arc::new(InMemoryBackend::new()));

        let last = HeroConfig::for_mode(ViewMode::Gifts, &content, Some(1));
        assert_eq!((last.active_slide, last.next_slide), (Some(1), Some(0)));

        let out_of_range = HeroConfig::for_mode(ViewMode::Gifts, &content, Some(9));
        assert_eq!(
            (out_of_range.active_slide, out_of_range.next_slide),
            (Some(0), Some(1))
        );
    }

    #[test]
    fn test_hero_has_no_heading() {
        let dir = tempfile::tempdir().unwrap();
        let i18n = LocalizationStore::load(&dir.path().join("none"));
        assert_eq!(section_title(Section::Hero, &i18n, "en"), None);
        assert_eq!(
            section_title(Section::DealOfTheDay, &i18n, "en").as_deref(),
            Some("Deal of the Day")
        );
    }
}
