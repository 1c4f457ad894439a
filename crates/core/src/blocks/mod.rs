//! Homepage block model and the block type registry.
//!
//! A theme's homepage is an ordered list of [`Block`]s. Each block carries a
//! stable [`BlockId`], an `enabled` flag, and [`BlockSettings`]: a tagged
//! union with one strongly typed config record per [`BlockKind`].
//!
//! On the wire a block is `{ "id", "type", "enabled", "config" }`. A `type`
//! this build does not know is kept as [`BlockSettings::Unrecognized`] with
//! its config preserved verbatim.

mod configs;
mod schema;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::CoreError;

pub use configs::*;
pub(crate) use schema::is_acceptable_link;
pub use schema::{
    find_field, validate_settings, FieldDescriptor, FieldKind, MAX_TEXT_AREA_LEN, MAX_TEXT_LEN,
    MAX_URL_LEN,
};

/// Stable identifier of a block within its theme.
pub type BlockId = Uuid;

/* --------------------------------------------------------------------------
   Block kinds
   -------------------------------------------------------------------------- */

/// Closed set of homepage block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    HeroBanner,
    FeaturedProducts,
    CategoriesGrid,
    ProductCarousel,
    Testimonials,
    CountdownTimer,
    VideoBanner,
    TrustBadges,
    Reviews,
    Newsletter,
    CustomText,
    ImageBanner,
    Spacer,
}

impl BlockKind {
    /// Every kind, in the order the "add block" menu lists them.
    pub const ALL: [BlockKind; 13] = [
        BlockKind::HeroBanner,
        BlockKind::FeaturedProducts,
        BlockKind::CategoriesGrid,
        BlockKind::ProductCarousel,
        BlockKind::Testimonials,
        BlockKind::CountdownTimer,
        BlockKind::VideoBanner,
        BlockKind::TrustBadges,
        BlockKind::Reviews,
        BlockKind::Newsletter,
        BlockKind::CustomText,
        BlockKind::ImageBanner,
        BlockKind::Spacer,
    ];

    /// Wire name (the `type` tag).
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::HeroBanner => "hero_banner",
            BlockKind::FeaturedProducts => "featured_products",
            BlockKind::CategoriesGrid => "categories_grid",
            BlockKind::ProductCarousel => "product_carousel",
            BlockKind::Testimonials => "testimonials",
            BlockKind::CountdownTimer => "countdown_timer",
            BlockKind::VideoBanner => "video_banner",
            BlockKind::TrustBadges => "trust_badges",
            BlockKind::Reviews => "reviews",
            BlockKind::Newsletter => "newsletter",
            BlockKind::CustomText => "custom_text",
            BlockKind::ImageBanner => "image_banner",
            BlockKind::Spacer => "spacer",
        }
    }

    /// Parse a wire name. Returns `None` for unknown tags.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Display label for the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::HeroBanner => "Hero Banner",
            BlockKind::FeaturedProducts => "Featured Products",
            BlockKind::CategoriesGrid => "Categories Grid",
            BlockKind::ProductCarousel => "Product Carousel",
            BlockKind::Testimonials => "Testimonials",
            BlockKind::CountdownTimer => "Countdown Timer",
            BlockKind::VideoBanner => "Video Banner",
            BlockKind::TrustBadges => "Trust Badges",
            BlockKind::Reviews => "Reviews",
            BlockKind::Newsletter => "Newsletter",
            BlockKind::CustomText => "Custom Text",
            BlockKind::ImageBanner => "Image Banner",
            BlockKind::Spacer => "Spacer",
        }
    }

    /// A fresh default config for a newly added block of this kind.
    ///
    /// Each call builds a new value; callers never share state.
    pub fn default_settings(self) -> BlockSettings {
        match self {
            BlockKind::HeroBanner => BlockSettings::HeroBanner(Default::default()),
            BlockKind::FeaturedProducts => BlockSettings::FeaturedProducts(Default::default()),
            BlockKind::CategoriesGrid => BlockSettings::CategoriesGrid(Default::default()),
            BlockKind::ProductCarousel => BlockSettings::ProductCarousel(Default::default()),
            BlockKind::Testimonials => BlockSettings::Testimonials(Default::default()),
            BlockKind::CountdownTimer => BlockSettings::CountdownTimer(Default::default()),
            BlockKind::VideoBanner => BlockSettings::VideoBanner(Default::default()),
            BlockKind::TrustBadges => BlockSettings::TrustBadges(Default::default()),
            BlockKind::Reviews => BlockSettings::Reviews(Default::default()),
            BlockKind::Newsletter => BlockSettings::Newsletter(Default::default()),
            BlockKind::CustomText => BlockSettings::CustomText(Default::default()),
            BlockKind::ImageBanner => BlockSettings::ImageBanner(Default::default()),
            BlockKind::Spacer => BlockSettings::Spacer(Default::default()),
        }
    }

    /// Ordered editable fields for the config form.
    pub fn field_schema(self) -> &'static [FieldDescriptor] {
        schema::schema_for(self)
    }
}

/* --------------------------------------------------------------------------
   Block settings
   -------------------------------------------------------------------------- */

/// Type-specific block configuration.
///
/// Serializes as the bare config object; the `type` tag lives on [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub enum BlockSettings {
    HeroBanner(HeroBannerConfig),
    FeaturedProducts(FeaturedProductsConfig),
    CategoriesGrid(CategoriesGridConfig),
    ProductCarousel(ProductCarouselConfig),
    Testimonials(TestimonialsConfig),
    CountdownTimer(CountdownTimerConfig),
    VideoBanner(VideoBannerConfig),
    TrustBadges(TrustBadgesConfig),
    Reviews(ReviewsConfig),
    Newsletter(NewsletterConfig),
    CustomText(CustomTextConfig),
    ImageBanner(ImageBannerConfig),
    Spacer(SpacerConfig),
    /// A `type` tag outside [`BlockKind`]; stored config kept as-is.
    Unrecognized { type_name: String, config: Value },
}

fn decode<T: DeserializeOwned>(kind: BlockKind, config: Value) -> Result<T, CoreError> {
    serde_json::from_value(config)
        .map_err(|e| CoreError::Validation(format!("Invalid {} config: {e}", kind.as_str())))
}

impl BlockSettings {
    /// Build settings from a `type` tag and its raw config object.
    ///
    /// A missing (`null`) config means "all defaults". Unknown tags produce
    /// [`BlockSettings::Unrecognized`].
    pub fn from_parts(type_name: &str, config: Value) -> Result<Self, CoreError> {
        let Some(kind) = BlockKind::from_name(type_name) else {
            return Ok(Self::Unrecognized {
                type_name: type_name.to_string(),
                config,
            });
        };

        let config = match config {
            Value::Null => Value::Object(Map::new()),
            obj @ Value::Object(_) => obj,
            _ => {
                return Err(CoreError::Validation(format!(
                    "{} config must be an object",
                    kind.as_str()
                )))
            }
        };

        Ok(match kind {
            BlockKind::HeroBanner => Self::HeroBanner(decode(kind, config)?),
            BlockKind::FeaturedProducts => Self::FeaturedProducts(decode(kind, config)?),
            BlockKind::CategoriesGrid => Self::CategoriesGrid(decode(kind, config)?),
            BlockKind::ProductCarousel => Self::ProductCarousel(decode(kind, config)?),
            BlockKind::Testimonials => Self::Testimonials(decode(kind, config)?),
            BlockKind::CountdownTimer => Self::CountdownTimer(decode(kind, config)?),
            BlockKind::VideoBanner => Self::VideoBanner(decode(kind, config)?),
            BlockKind::TrustBadges => Self::TrustBadges(decode(kind, config)?),
            BlockKind::Reviews => Self::Reviews(decode(kind, config)?),
            BlockKind::Newsletter => Self::Newsletter(decode(kind, config)?),
            BlockKind::CustomText => Self::CustomText(decode(kind, config)?),
            BlockKind::ImageBanner => Self::ImageBanner(decode(kind, config)?),
            BlockKind::Spacer => Self::Spacer(decode(kind, config)?),
        })
    }

    /// The block kind, or `None` for unrecognized tags.
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            Self::HeroBanner(_) => BlockKind::HeroBanner,
            Self::FeaturedProducts(_) => BlockKind::FeaturedProducts,
            Self::CategoriesGrid(_) => BlockKind::CategoriesGrid,
            Self::ProductCarousel(_) => BlockKind::ProductCarousel,
            Self::Testimonials(_) => BlockKind::Testimonials,
            Self::CountdownTimer(_) => BlockKind::CountdownTimer,
            Self::VideoBanner(_) => BlockKind::VideoBanner,
            Self::TrustBadges(_) => BlockKind::TrustBadges,
            Self::Reviews(_) => BlockKind::Reviews,
            Self::Newsletter(_) => BlockKind::Newsletter,
            Self::CustomText(_) => BlockKind::CustomText,
            Self::ImageBanner(_) => BlockKind::ImageBanner,
            Self::Spacer(_) => BlockKind::Spacer,
            Self::Unrecognized { .. } => return None,
        })
    }

    /// The wire `type` tag.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unrecognized { type_name, .. } => type_name.as_str(),
            known => known.kind().map(BlockKind::as_str).unwrap_or_default(),
        }
    }

    /// Editable fields; empty for unrecognized tags.
    pub fn field_schema(&self) -> &'static [FieldDescriptor] {
        self.kind().map(BlockKind::field_schema).unwrap_or(&[])
    }

    /// The config as a JSON object.
    pub fn to_config_map(&self) -> Result<Map<String, Value>, CoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Validation(format!(
                "{} config is not an object",
                self.type_name()
            ))),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to serialize {} config: {e}",
                self.type_name()
            ))),
        }
    }

    /// Merge `{key: value}` into the config, keeping every other key.
    ///
    /// Idempotent. A value of the wrong type for a known key is rejected and
    /// leaves the settings unchanged. Range and option checks happen in
    /// [`BlockSettings::validate`].
    pub fn merge_field(&mut self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut map = self.to_config_map()?;
        map.insert(key.to_string(), value);
        self.replace_config(map)
    }

    /// Append a new entry to the list field `key`, built from the list's
    /// item schema. Returns the new entry's index.
    pub fn add_list_item(&mut self, key: &str) -> Result<usize, CoreError> {
        let (item_fields, max_items) = self.list_field(key)?;
        let mut map = self.to_config_map()?;
        let items = list_entries(&mut map, self.type_name(), key)?;
        if items.len() >= max_items {
            return Err(CoreError::Validation(format!(
                "{}.{key} already has the maximum of {max_items} entries",
                self.type_name()
            )));
        }
        let item: Map<String, Value> = item_fields
            .iter()
            .map(|f| (f.key.to_string(), f.kind.empty_value()))
            .collect();
        items.push(Value::Object(item));
        let index = items.len() - 1;
        self.replace_config(map)?;
        Ok(index)
    }

    /// Set `field` on the entry at `index` of the list field `key`.
    ///
    /// Sibling entries are not touched.
    pub fn update_list_item(
        &mut self,
        key: &str,
        index: usize,
        field: &str,
        value: Value,
    ) -> Result<(), CoreError> {
        self.list_field(key)?;
        let type_name = self.type_name().to_string();
        let mut map = self.to_config_map()?;
        let items = list_entries(&mut map, &type_name, key)?;
        let len = items.len();
        let entry = items
            .get_mut(index)
            .ok_or_else(|| index_out_of_range(&type_name, key, index, len))?;
        let obj = entry.as_object_mut().ok_or_else(|| {
            CoreError::Validation(format!("{type_name}.{key}[{index}] is not an object"))
        })?;
        obj.insert(field.to_string(), value);
        self.replace_config(map)
    }

    /// Remove the entry at `index` of the list field `key`, returning it.
    pub fn remove_list_item(&mut self, key: &str, index: usize) -> Result<Value, CoreError> {
        self.list_field(key)?;
        let type_name = self.type_name().to_string();
        let mut map = self.to_config_map()?;
        let items = list_entries(&mut map, &type_name, key)?;
        if index >= items.len() {
            return Err(index_out_of_range(&type_name, key, index, items.len()));
        }
        let removed = items.remove(index);
        self.replace_config(map)?;
        Ok(removed)
    }

    /// Schema validation plus checks that do not fit a field descriptor.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_settings(self)?;
        if let Self::CountdownTimer(c) = self {
            if !c.ends_at.is_empty() && chrono::DateTime::parse_from_rfc3339(&c.ends_at).is_err()
            {
                return Err(CoreError::Validation(format!(
                    "countdown_timer.ends_at must be an RFC 3339 timestamp, got '{}'",
                    c.ends_at
                )));
            }
        }
        Ok(())
    }

    fn replace_config(&mut self, map: Map<String, Value>) -> Result<(), CoreError> {
        let type_name = self.type_name().to_string();
        *self = Self::from_parts(&type_name, Value::Object(map))?;
        Ok(())
    }

    fn list_field(&self, key: &str) -> Result<(&'static [FieldDescriptor], usize), CoreError> {
        match find_field(self.field_schema(), key).map(|f| f.kind) {
            Some(FieldKind::List {
                item_fields,
                max_items,
            }) => Ok((item_fields, max_items)),
            _ => Err(CoreError::Validation(format!(
                "'{key}' is not a list field of {}",
                self.type_name()
            ))),
        }
    }
}

fn list_entries<'a>(
    map: &'a mut Map<String, Value>,
    type_name: &str,
    key: &str,
) -> Result<&'a mut Vec<Value>, CoreError> {
    map.entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| CoreError::Validation(format!("{type_name}.{key} is not a list")))
}

fn index_out_of_range(type_name: &str, key: &str, index: usize, len: usize) -> CoreError {
    CoreError::Validation(format!(
        "{type_name}.{key} has {len} entries, index {index} is out of range"
    ))
}

impl Serialize for BlockSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::HeroBanner(c) => c.serialize(serializer),
            Self::FeaturedProducts(c) => c.serialize(serializer),
            Self::CategoriesGrid(c) => c.serialize(serializer),
            Self::ProductCarousel(c) => c.serialize(serializer),
            Self::Testimonials(c) => c.serialize(serializer),
            Self::CountdownTimer(c) => c.serialize(serializer),
            Self::VideoBanner(c) => c.serialize(serializer),
            Self::TrustBadges(c) => c.serialize(serializer),
            Self::Reviews(c) => c.serialize(serializer),
            Self::Newsletter(c) => c.serialize(serializer),
            Self::CustomText(c) => c.serialize(serializer),
            Self::ImageBanner(c) => c.serialize(serializer),
            Self::Spacer(c) => c.serialize(serializer),
            Self::Unrecognized { config, .. } => config.serialize(serializer),
        }
    }
}

/* --------------------------------------------------------------------------
   Block
   -------------------------------------------------------------------------- */

/// One entry of a theme's homepage layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    /// Disabled blocks stay in the list but are skipped at render time.
    pub enabled: bool,
    pub settings: BlockSettings,
}

impl Block {
    /// A new enabled block of `kind` with default settings and a fresh id.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            enabled: true,
            settings: kind.default_settings(),
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.settings.kind()
    }
}

#[derive(Serialize)]
struct BlockWire<'a> {
    id: BlockId,
    #[serde(rename = "type")]
    type_name: &'a str,
    enabled: bool,
    config: &'a BlockSettings,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<BlockId>,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    config: Value,
}

fn enabled_by_default() -> bool {
    true
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlockWire {
            id: self.id,
            type_name: self.settings.type_name(),
            enabled: self.enabled,
            config: &self.settings,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBlock::deserialize(deserializer)?;
        let settings = BlockSettings::from_parts(&raw.type_name, raw.config)
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            id: raw.id.unwrap_or_else(Uuid::new_v4),
            enabled: raw.enabled,
            settings,
        })
    }
}

/* --------------------------------------------------------------------------
   Registry catalog
   -------------------------------------------------------------------------- */

/// One registry entry as served to the dashboard's "add block" menu.
#[derive(Debug, Clone, Serialize)]
pub struct BlockCatalogEntry {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: &'static str,
    pub fields: &'static [FieldDescriptor],
    pub defaults: BlockSettings,
}

/// The full block registry: every kind with its schema and defaults.
pub fn block_catalog() -> Vec<BlockCatalogEntry> {
    BlockKind::ALL
        .into_iter()
        .map(|kind| BlockCatalogEntry {
            kind,
            label: kind.label(),
            fields: kind.field_schema(),
            defaults: kind.default_settings(),
        })
        .collect()
}
