//! Editable field schemas for each block kind and schema-driven validation.
//!
//! A schema is an ordered list of [`FieldDescriptor`]s. The dashboard renders
//! one form control per descriptor; the server validates submitted configs
//! against the same list.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;

use super::{BlockKind, BlockSettings};

/// Maximum length of a single-line text field.
pub const MAX_TEXT_LEN: usize = 500;

/// Maximum length of a multi-line text field.
pub const MAX_TEXT_AREA_LEN: usize = 10_000;

/// Maximum length of a URL field.
pub const MAX_URL_LEN: usize = 2048;

/// One editable field of a block config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Key into the config mapping.
    pub key: &'static str,
    /// Human-readable form label.
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// The form control a field renders as, with its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Url,
    Number {
        min: i64,
        max: i64,
    },
    Toggle,
    Select {
        options: &'static [&'static str],
    },
    /// Repeatable sub-objects (testimonial entries, trust badges).
    List {
        item_fields: &'static [FieldDescriptor],
        max_items: usize,
    },
}

impl FieldKind {
    /// Value used for this field in a freshly added list item.
    pub fn empty_value(&self) -> Value {
        match self {
            FieldKind::Text | FieldKind::TextArea | FieldKind::Url => Value::String(String::new()),
            FieldKind::Number { min, .. } => Value::from(*min),
            FieldKind::Toggle => Value::Bool(false),
            FieldKind::Select { options } => {
                Value::String(options.first().copied().unwrap_or_default().to_string())
            }
            FieldKind::List { .. } => Value::Array(Vec::new()),
        }
    }
}

const fn text(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Text,
    }
}

const fn text_area(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::TextArea,
    }
}

const fn url(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Url,
    }
}

const fn number(key: &'static str, label: &'static str, min: i64, max: i64) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Number { min, max },
    }
}

const fn toggle(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Toggle,
    }
}

const fn select(
    key: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Select { options },
    }
}

const fn list(
    key: &'static str,
    label: &'static str,
    item_fields: &'static [FieldDescriptor],
    max_items: usize,
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::List {
            item_fields,
            max_items,
        },
    }
}

/* --------------------------------------------------------------------------
   Shared option sets
   -------------------------------------------------------------------------- */

const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const HEIGHTS: &[&str] = &["small", "medium", "large", "full"];
const OVERLAYS: &[&str] = &["none", "light", "dark", "gradient"];
const PRODUCT_SOURCES: &[&str] = &["best_sellers", "newest", "on_sale", "manual"];
const LAYOUTS: &[&str] = &["grid", "carousel"];
const BADGE_ICONS: &[&str] = &[
    "truck", "lock", "refresh", "shield", "star", "headset", "gift", "check",
];

/* --------------------------------------------------------------------------
   Per-kind schemas
   -------------------------------------------------------------------------- */

static HERO_BANNER: &[FieldDescriptor] = &[
    text("title", "Title"),
    text("subtitle", "Subtitle"),
    text("cta_text", "Button Text"),
    url("cta_link", "Button Link"),
    select(
        "background_type",
        "Background Type",
        &["image", "gradient", "color"],
    ),
    url("background_image", "Background Image"),
    select("text_position", "Text Position", ALIGNMENTS),
    select("height", "Height", HEIGHTS),
    select("overlay", "Overlay", OVERLAYS),
];

static FEATURED_PRODUCTS: &[FieldDescriptor] = &[
    text("title", "Title"),
    text("subtitle", "Subtitle"),
    select("source", "Products", PRODUCT_SOURCES),
    number("product_count", "Number of Products", 1, 24),
    number("columns", "Columns", 2, 6),
    toggle("show_prices", "Show Prices"),
    toggle("show_add_to_cart", "Show Add to Cart"),
];

static CATEGORIES_GRID: &[FieldDescriptor] = &[
    text("title", "Title"),
    number("columns", "Columns", 2, 6),
    number("max_categories", "Max Categories", 1, 24),
    toggle("show_product_count", "Show Product Count"),
    select("style", "Style", &["card", "overlay", "minimal"]),
];

static PRODUCT_CAROUSEL: &[FieldDescriptor] = &[
    text("title", "Title"),
    select("source", "Products", PRODUCT_SOURCES),
    number("product_count", "Number of Products", 1, 24),
    toggle("autoplay", "Autoplay"),
    number("autoplay_interval", "Autoplay Interval (s)", 2, 30),
    toggle("show_arrows", "Show Arrows"),
];

const TESTIMONIAL_ITEM: &[FieldDescriptor] = &[
    text("name", "Name"),
    text("role", "Role"),
    text_area("quote", "Quote"),
    number("rating", "Rating", 1, 5),
    url("avatar_url", "Avatar"),
];

static TESTIMONIALS: &[FieldDescriptor] = &[
    text("title", "Title"),
    select("layout", "Layout", LAYOUTS),
    list("testimonials", "Testimonials", TESTIMONIAL_ITEM, 12),
];

static COUNTDOWN_TIMER: &[FieldDescriptor] = &[
    text("title", "Title"),
    text("subtitle", "Subtitle"),
    text("ends_at", "Ends At"),
    text("cta_text", "Button Text"),
    url("cta_link", "Button Link"),
    select("style", "Style", &["banner", "card", "minimal"]),
    toggle("hide_when_expired", "Hide When Expired"),
];

static VIDEO_BANNER: &[FieldDescriptor] = &[
    text("title", "Title"),
    text("subtitle", "Subtitle"),
    url("video_url", "Video URL"),
    url("poster_image", "Poster Image"),
    toggle("autoplay", "Autoplay"),
    toggle("muted", "Muted"),
    toggle("loop", "Loop"),
    select("overlay", "Overlay", OVERLAYS),
    select("height", "Height", HEIGHTS),
];

const TRUST_BADGE_ITEM: &[FieldDescriptor] = &[
    select("icon", "Icon", BADGE_ICONS),
    text("title", "Title"),
    text("description", "Description"),
];

static TRUST_BADGES: &[FieldDescriptor] = &[
    text("title", "Title"),
    number("columns", "Columns", 2, 6),
    list("badges", "Badges", TRUST_BADGE_ITEM, 8),
];

static REVIEWS: &[FieldDescriptor] = &[
    text("title", "Title"),
    number("review_count", "Number of Reviews", 1, 24),
    number("min_rating", "Minimum Rating", 1, 5),
    toggle("show_photos", "Show Photos"),
    select("layout", "Layout", &["grid", "carousel", "list"]),
];

static NEWSLETTER: &[FieldDescriptor] = &[
    text("title", "Title"),
    text("subtitle", "Subtitle"),
    text("button_text", "Button Text"),
    text("placeholder", "Placeholder"),
    select("background", "Background", &["surface", "primary", "accent"]),
];

static CUSTOM_TEXT: &[FieldDescriptor] = &[
    text("title", "Title"),
    text_area("content", "Content"),
    select("alignment", "Alignment", ALIGNMENTS),
    select("max_width", "Max Width", &["narrow", "medium", "wide"]),
];

static IMAGE_BANNER: &[FieldDescriptor] = &[
    text("title", "Title"),
    url("image_url", "Image"),
    text("alt_text", "Alt Text"),
    url("link", "Link"),
    select("height", "Height", &["small", "medium", "large"]),
];

static SPACER: &[FieldDescriptor] = &[
    number("height", "Height (px)", 0, 400),
    toggle("show_divider", "Show Divider"),
];

/// Ordered editable fields for `kind`.
pub(crate) fn schema_for(kind: BlockKind) -> &'static [FieldDescriptor] {
    match kind {
        BlockKind::HeroBanner => HERO_BANNER,
        BlockKind::FeaturedProducts => FEATURED_PRODUCTS,
        BlockKind::CategoriesGrid => CATEGORIES_GRID,
        BlockKind::ProductCarousel => PRODUCT_CAROUSEL,
        BlockKind::Testimonials => TESTIMONIALS,
        BlockKind::CountdownTimer => COUNTDOWN_TIMER,
        BlockKind::VideoBanner => VIDEO_BANNER,
        BlockKind::TrustBadges => TRUST_BADGES,
        BlockKind::Reviews => REVIEWS,
        BlockKind::Newsletter => NEWSLETTER,
        BlockKind::CustomText => CUSTOM_TEXT,
        BlockKind::ImageBanner => IMAGE_BANNER,
        BlockKind::Spacer => SPACER,
    }
}

/// Find the descriptor for `key` in `schema`.
pub fn find_field<'a>(schema: &'a [FieldDescriptor], key: &str) -> Option<&'a FieldDescriptor> {
    schema.iter().find(|f| f.key == key)
}

/* --------------------------------------------------------------------------
   Validation
   -------------------------------------------------------------------------- */

/// Validate a block's config against its field schema.
///
/// Keys outside the schema are not checked. Unrecognized block types have an
/// empty schema and always pass.
pub fn validate_settings(settings: &BlockSettings) -> Result<(), CoreError> {
    let schema = settings.field_schema();
    if schema.is_empty() {
        return Ok(());
    }
    let config = settings.to_config_map()?;
    validate_fields(settings.type_name(), schema, &config)
}

fn validate_fields(
    path: &str,
    schema: &[FieldDescriptor],
    config: &Map<String, Value>,
) -> Result<(), CoreError> {
    for field in schema {
        let field_path = format!("{path}.{}", field.key);
        let value = config
            .get(field.key)
            .ok_or_else(|| CoreError::Validation(format!("{field_path} is required")))?;
        validate_value(&field_path, &field.kind, value)?;
    }
    Ok(())
}

fn validate_value(path: &str, kind: &FieldKind, value: &Value) -> Result<(), CoreError> {
    match kind {
        FieldKind::Text => check_string(path, value, MAX_TEXT_LEN).map(|_| ()),
        FieldKind::TextArea => check_string(path, value, MAX_TEXT_AREA_LEN).map(|_| ()),
        FieldKind::Url => {
            let s = check_string(path, value, MAX_URL_LEN)?;
            if s.is_empty() || is_acceptable_link(s) {
                Ok(())
            } else {
                Err(CoreError::Validation(format!(
                    "{path} must be an http(s) URL or a site-relative path, got '{s}'"
                )))
            }
        }
        FieldKind::Number { min, max } => {
            let n = value.as_i64().ok_or_else(|| {
                CoreError::Validation(format!("{path} must be an integer"))
            })?;
            if n < *min || n > *max {
                return Err(CoreError::Validation(format!(
                    "{path} must be between {min} and {max}, got {n}"
                )));
            }
            Ok(())
        }
        FieldKind::Toggle => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(CoreError::Validation(format!("{path} must be a boolean")))
            }
        }
        FieldKind::Select { options } => {
            let s = check_string(path, value, MAX_TEXT_LEN)?;
            if options.contains(&s) {
                Ok(())
            } else {
                Err(CoreError::Validation(format!(
                    "{path}: '{s}' is not one of {}",
                    options.join(", ")
                )))
            }
        }
        FieldKind::List {
            item_fields,
            max_items,
        } => {
            let items = value
                .as_array()
                .ok_or_else(|| CoreError::Validation(format!("{path} must be a list")))?;
            if items.len() > *max_items {
                return Err(CoreError::Validation(format!(
                    "{path} has {} entries (max {max_items})",
                    items.len()
                )));
            }
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                let obj = item.as_object().ok_or_else(|| {
                    CoreError::Validation(format!("{item_path} must be an object"))
                })?;
                validate_fields(&item_path, item_fields, obj)?;
            }
            Ok(())
        }
    }
}

fn check_string<'a>(path: &str, value: &'a Value, max_len: usize) -> Result<&'a str, CoreError> {
    let s = value
        .as_str()
        .ok_or_else(|| CoreError::Validation(format!("{path} must be a string")))?;
    if s.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{path} is too long (max {max_len} chars)"
        )));
    }
    Ok(s)
}

/// Absolute http(s) URL, site-relative path, or in-page anchor.
pub(crate) fn is_acceptable_link(s: &str) -> bool {
    s.starts_with("https://")
        || s.starts_with("http://")
        || (s.starts_with('/') && !s.starts_with("//"))
        || s.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_kind_has_a_non_empty_schema() {
        for kind in BlockKind::ALL {
            assert!(!schema_for(kind).is_empty(), "{} has no fields", kind.as_str());
        }
    }

    #[test]
    fn schema_keys_are_unique_per_kind() {
        for kind in BlockKind::ALL {
            let schema = schema_for(kind);
            for (i, field) in schema.iter().enumerate() {
                assert!(
                    schema[i + 1..].iter().all(|other| other.key != field.key),
                    "{}.{} declared twice",
                    kind.as_str(),
                    field.key
                );
            }
        }
    }

    #[test]
    fn select_fields_list_at_least_one_option() {
        for kind in BlockKind::ALL {
            for field in schema_for(kind) {
                if let FieldKind::Select { options } = field.kind {
                    assert!(!options.is_empty(), "{}.{}", kind.as_str(), field.key);
                }
            }
        }
    }

    #[test]
    fn rejects_out_of_range_number() {
        let mut settings = BlockKind::Spacer.default_settings();
        settings.merge_field("height", json!(1000)).unwrap();
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("spacer.height must be between 0 and 400"));
    }

    #[test]
    fn rejects_unknown_select_option() {
        let mut settings = BlockKind::HeroBanner.default_settings();
        settings.merge_field("height", json!("huge")).unwrap();
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("'huge' is not one of"));
    }

    #[test]
    fn rejects_list_item_with_bad_field() {
        let mut settings = BlockKind::TrustBadges.default_settings();
        settings
            .update_list_item("badges", 1, "icon", json!("rocket"))
            .unwrap();
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("trust_badges.badges[1].icon"));
    }

    #[test]
    fn rejects_protocol_relative_and_script_links() {
        assert!(!is_acceptable_link("//evil.example"));
        assert!(!is_acceptable_link("javascript:alert(1)"));
        assert!(is_acceptable_link("/collections/all"));
        assert!(is_acceptable_link("https://cdn.example.com/a.png"));
    }

    #[test]
    fn unknown_keys_are_not_validated() {
        let mut settings = BlockKind::Newsletter.default_settings();
        settings
            .merge_field("experimental_layout", json!({"anything": [1, 2]}))
            .unwrap();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn field_descriptor_serializes_kind_inline() {
        let json = serde_json::to_value(number("height", "Height", 0, 400)).unwrap();
        assert_eq!(
            json,
            json!({"key": "height", "label": "Height", "kind": "number", "min": 0, "max": 400})
        );
    }
}
