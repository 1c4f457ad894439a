//! Typed configuration records, one per block kind, with their defaults.
//!
//! Every record is `#[serde(default)]` so a stored config missing a key
//! picks up the default, and keeps keys it does not recognise in `extra`
//! so they survive a load/save round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full-width hero section at the top of the homepage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroBannerConfig {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_type: String,
    pub background_image: String,
    pub text_position: String,
    pub height: String,
    pub overlay: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeroBannerConfig {
    fn default() -> Self {
        Self {
            title: "Welcome to our store".into(),
            subtitle: "Discover products you'll love".into(),
            cta_text: "Shop Now".into(),
            cta_link: "/products".into(),
            background_type: "image".into(),
            background_image: String::new(),
            text_position: "center".into(),
            height: "large".into(),
            overlay: "dark".into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedProductsConfig {
    pub title: String,
    pub subtitle: String,
    pub source: String,
    pub product_count: i64,
    pub columns: i64,
    pub show_prices: bool,
    pub show_add_to_cart: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FeaturedProductsConfig {
    fn default() -> Self {
        Self {
            title: "Featured Products".into(),
            subtitle: String::new(),
            source: "best_sellers".into(),
            product_count: 8,
            columns: 4,
            show_prices: true,
            show_add_to_cart: true,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesGridConfig {
    pub title: String,
    pub columns: i64,
    pub max_categories: i64,
    pub show_product_count: bool,
    pub style: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CategoriesGridConfig {
    fn default() -> Self {
        Self {
            title: "Shop by Category".into(),
            columns: 3,
            max_categories: 6,
            show_product_count: true,
            style: "overlay".into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCarouselConfig {
    pub title: String,
    pub source: String,
    pub product_count: i64,
    pub autoplay: bool,
    /// Seconds between slides when `autoplay` is on.
    pub autoplay_interval: i64,
    pub show_arrows: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ProductCarouselConfig {
    fn default() -> Self {
        Self {
            title: "New Arrivals".into(),
            source: "newest".into(),
            product_count: 10,
            autoplay: true,
            autoplay_interval: 5,
            show_arrows: true,
            extra: Map::new(),
        }
    }
}

/// One customer quote inside a testimonials block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub quote: String,
    pub rating: i64,
    pub avatar_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Testimonial {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: String::new(),
            quote: String::new(),
            rating: 5,
            avatar_url: String::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialsConfig {
    pub title: String,
    pub layout: String,
    pub testimonials: Vec<Testimonial>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TestimonialsConfig {
    fn default() -> Self {
        let entry = |name: &str, role: &str, quote: &str| Testimonial {
            name: name.into(),
            role: role.into(),
            quote: quote.into(),
            ..Testimonial::default()
        };
        Self {
            title: "What Our Customers Say".into(),
            layout: "grid".into(),
            testimonials: vec![
                entry(
                    "Sarah M.",
                    "Verified Buyer",
                    "Fast shipping and the quality exceeded my expectations.",
                ),
                entry(
                    "James K.",
                    "Verified Buyer",
                    "Great prices and excellent customer support.",
                ),
                entry(
                    "Emily R.",
                    "Repeat Customer",
                    "My go-to shop. Ordering is always effortless.",
                ),
            ],
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownTimerConfig {
    pub title: String,
    pub subtitle: String,
    /// RFC 3339 end instant; empty means not scheduled yet.
    pub ends_at: String,
    pub cta_text: String,
    pub cta_link: String,
    pub style: String,
    pub hide_when_expired: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CountdownTimerConfig {
    fn default() -> Self {
        Self {
            title: "Limited Time Offer".into(),
            subtitle: "Sale ends soon".into(),
            ends_at: String::new(),
            cta_text: "Shop the Sale".into(),
            cta_link: "/collections/sale".into(),
            style: "banner".into(),
            hide_when_expired: true,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoBannerConfig {
    pub title: String,
    pub subtitle: String,
    pub video_url: String,
    pub poster_image: String,
    pub autoplay: bool,
    pub muted: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub overlay: String,
    pub height: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for VideoBannerConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            video_url: String::new(),
            poster_image: String::new(),
            autoplay: true,
            muted: true,
            looping: true,
            overlay: "dark".into(),
            height: "large".into(),
            extra: Map::new(),
        }
    }
}

/// One badge inside a trust badges block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustBadge {
    pub icon: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TrustBadge {
    fn default() -> Self {
        Self {
            icon: "check".into(),
            title: String::new(),
            description: String::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustBadgesConfig {
    pub title: String,
    pub columns: i64,
    pub badges: Vec<TrustBadge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TrustBadgesConfig {
    fn default() -> Self {
        let badge = |icon: &str, title: &str, description: &str| TrustBadge {
            icon: icon.into(),
            title: title.into(),
            description: description.into(),
            extra: Map::new(),
        };
        Self {
            title: String::new(),
            columns: 3,
            badges: vec![
                badge("truck", "Free Shipping", "On orders over $50"),
                badge("lock", "Secure Checkout", "256-bit SSL encryption"),
                badge("refresh", "Easy Returns", "30-day return policy"),
            ],
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsConfig {
    pub title: String,
    pub review_count: i64,
    pub min_rating: i64,
    pub show_photos: bool,
    pub layout: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            title: "Customer Reviews".into(),
            review_count: 6,
            min_rating: 4,
            show_photos: true,
            layout: "grid".into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub placeholder: String,
    pub background: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            title: "Join Our Newsletter".into(),
            subtitle: "Get exclusive offers and early access to new products".into(),
            button_text: "Subscribe".into(),
            placeholder: "Enter your email".into(),
            background: "surface".into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTextConfig {
    pub title: String,
    pub content: String,
    pub alignment: String,
    pub max_width: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CustomTextConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            alignment: "center".into(),
            max_width: "medium".into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBannerConfig {
    pub title: String,
    pub image_url: String,
    pub alt_text: String,
    pub link: String,
    pub height: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ImageBannerConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            image_url: String::new(),
            alt_text: String::new(),
            link: String::new(),
            height: "medium".into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerConfig {
    /// Height in pixels.
    pub height: i64,
    pub show_divider: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SpacerConfig {
    fn default() -> Self {
        Self {
            height: 48,
            show_divider: false,
            extra: Map::new(),
        }
    }
}
