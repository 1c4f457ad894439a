//! Theme document model (colors, typography, styles, blocks, branding) and
//! its validation rules.
//!
//! Color, typography, and style records keep keys they do not recognise in
//! an `extra` map so older or newer dashboards never lose data on save.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::blocks::{is_acceptable_link, Block, BlockKind, MAX_URL_LEN};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a theme name.
pub const MAX_THEME_NAME_LEN: usize = 100;

/// Maximum length for a font family name.
pub const MAX_FONT_NAME_LEN: usize = 100;

/// Maximum length of the custom CSS override.
pub const MAX_CUSTOM_CSS_LEN: usize = 50_000;

/// Maximum number of homepage blocks in one theme.
pub const MAX_BLOCKS: usize = 50;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex")
});

/// Validate a `#rgb` / `#rrggbb` hex color string.
pub fn validate_hex_color(label: &str, value: &str) -> Result<(), CoreError> {
    if HEX_COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{label} must be a hex color like #1a2b3c, got '{value}'"
        )))
    }
}

/// Validate a theme name: non-blank and within length limit.
pub fn validate_theme_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Theme name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_THEME_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Theme name too long: {} chars (max {MAX_THEME_NAME_LEN})",
            name.chars().count()
        )));
    }
    Ok(())
}

fn validate_font_name(label: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{label} must not be empty")));
    }
    if name.chars().count() > MAX_FONT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{label} too long (max {MAX_FONT_NAME_LEN} chars)"
        )));
    }
    Ok(())
}

/// Font weights are CSS numeric weights: 100..=900 in steps of 100.
fn validate_font_weight(label: &str, weight: u16) -> Result<(), CoreError> {
    if (100..=900).contains(&weight) && weight % 100 == 0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{label} must be one of 100, 200, ..., 900, got {weight}"
        )))
    }
}

fn validate_branding_url(label: &str, value: Option<&str>) -> Result<(), CoreError> {
    let Some(url) = value else {
        return Ok(());
    };
    if url.chars().count() > MAX_URL_LEN {
        return Err(CoreError::Validation(format!(
            "{label} too long (max {MAX_URL_LEN} chars)"
        )));
    }
    if !url.is_empty() && !is_acceptable_link(url) {
        return Err(CoreError::Validation(format!(
            "{label} must be an http(s) URL or a site-relative path"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Closed option sets
   -------------------------------------------------------------------------- */

/// Declares a closed string-valued option set with its wire names.
macro_rules! option_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == name)
            }

            fn parse(label: &str, name: &str) -> Result<Self, CoreError> {
                Self::from_name(name).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "{label}: '{name}' is not one of {}",
                        Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                    ))
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                Self::parse(stringify!($name), &name).map_err(serde::de::Error::custom)
            }
        }
    };
}

option_set!(
    /// Fixed set of color roles a theme defines.
    ColorRole {
        Primary => "primary",
        Accent => "accent",
        Background => "background",
        Surface => "surface",
        Text => "text",
        Muted => "muted",
        Border => "border",
    }
);

option_set!(
    LetterSpacing {
        Tighter => "tighter",
        Tight => "tight",
        Normal => "normal",
        Wide => "wide",
        Wider => "wider",
    }
);

option_set!(
    LineHeight {
        Tight => "tight",
        Snug => "snug",
        Normal => "normal",
        Relaxed => "relaxed",
        Loose => "loose",
    }
);

option_set!(
    BorderRadius {
        None => "none",
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
        Full => "full",
    }
);

option_set!(
    CardStyle {
        Flat => "flat",
        Bordered => "bordered",
        Shadow => "shadow",
        Elevated => "elevated",
    }
);

option_set!(
    ButtonStyle {
        Solid => "solid",
        Outline => "outline",
        Soft => "soft",
        Pill => "pill",
    }
);

/* --------------------------------------------------------------------------
   Colors
   -------------------------------------------------------------------------- */

/// Hex color per [`ColorRole`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub muted: String,
    pub border: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#2563eb".into(),
            accent: "#f59e0b".into(),
            background: "#ffffff".into(),
            surface: "#f8fafc".into(),
            text: "#0f172a".into(),
            muted: "#64748b".into(),
            border: "#e2e8f0".into(),
            extra: Map::new(),
        }
    }
}

impl ThemeColors {
    pub fn get(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Primary => &self.primary,
            ColorRole::Accent => &self.accent,
            ColorRole::Background => &self.background,
            ColorRole::Surface => &self.surface,
            ColorRole::Text => &self.text,
            ColorRole::Muted => &self.muted,
            ColorRole::Border => &self.border,
        }
    }

    /// Replace the color for `role`. The value must be a hex color.
    pub fn set(&mut self, role: ColorRole, hex: &str) -> Result<(), CoreError> {
        validate_hex_color(&format!("colors.{}", role.as_str()), hex)?;
        let slot = match role {
            ColorRole::Primary => &mut self.primary,
            ColorRole::Accent => &mut self.accent,
            ColorRole::Background => &mut self.background,
            ColorRole::Surface => &mut self.surface,
            ColorRole::Text => &mut self.text,
            ColorRole::Muted => &mut self.muted,
            ColorRole::Border => &mut self.border,
        };
        *slot = hex.to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for role in ColorRole::ALL {
            validate_hex_color(&format!("colors.{}", role.as_str()), self.get(*role))?;
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Typography
   -------------------------------------------------------------------------- */

/// Editable typography settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypographyKey {
    HeadingFont,
    BodyFont,
    HeadingWeight,
    BodyWeight,
    LetterSpacing,
    LineHeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTypography {
    pub heading_font: String,
    pub body_font: String,
    pub heading_weight: u16,
    pub body_weight: u16,
    pub letter_spacing: LetterSpacing,
    pub line_height: LineHeight,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ThemeTypography {
    fn default() -> Self {
        Self {
            heading_font: "Inter".into(),
            body_font: "Inter".into(),
            heading_weight: 700,
            body_weight: 400,
            letter_spacing: LetterSpacing::Normal,
            line_height: LineHeight::Normal,
            extra: Map::new(),
        }
    }
}

impl ThemeTypography {
    /// Replace one setting from its form value.
    pub fn set(&mut self, key: TypographyKey, value: &str) -> Result<(), CoreError> {
        match key {
            TypographyKey::HeadingFont => {
                validate_font_name("typography.heading_font", value)?;
                self.heading_font = value.to_string();
            }
            TypographyKey::BodyFont => {
                validate_font_name("typography.body_font", value)?;
                self.body_font = value.to_string();
            }
            TypographyKey::HeadingWeight => {
                self.heading_weight = parse_weight("typography.heading_weight", value)?;
            }
            TypographyKey::BodyWeight => {
                self.body_weight = parse_weight("typography.body_weight", value)?;
            }
            TypographyKey::LetterSpacing => {
                self.letter_spacing = LetterSpacing::parse("typography.letter_spacing", value)?;
            }
            TypographyKey::LineHeight => {
                self.line_height = LineHeight::parse("typography.line_height", value)?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_font_name("typography.heading_font", &self.heading_font)?;
        validate_font_name("typography.body_font", &self.body_font)?;
        validate_font_weight("typography.heading_weight", self.heading_weight)?;
        validate_font_weight("typography.body_weight", self.body_weight)?;
        Ok(())
    }
}

fn parse_weight(label: &str, value: &str) -> Result<u16, CoreError> {
    let weight = value
        .trim()
        .parse::<u16>()
        .map_err(|_| CoreError::Validation(format!("{label} must be a number, got '{value}'")))?;
    validate_font_weight(label, weight)?;
    Ok(weight)
}

/* --------------------------------------------------------------------------
   Styles
   -------------------------------------------------------------------------- */

/// Editable style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKey {
    BorderRadius,
    CardStyle,
    ButtonStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeStyles {
    pub border_radius: BorderRadius,
    pub card_style: CardStyle,
    pub button_style: ButtonStyle,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ThemeStyles {
    fn default() -> Self {
        Self {
            border_radius: BorderRadius::Md,
            card_style: CardStyle::Shadow,
            button_style: ButtonStyle::Solid,
            extra: Map::new(),
        }
    }
}

impl ThemeStyles {
    /// Replace one option from its form value.
    pub fn set(&mut self, key: StyleKey, value: &str) -> Result<(), CoreError> {
        match key {
            StyleKey::BorderRadius => {
                self.border_radius = BorderRadius::parse("styles.border_radius", value)?;
            }
            StyleKey::CardStyle => {
                self.card_style = CardStyle::parse("styles.card_style", value)?;
            }
            StyleKey::ButtonStyle => {
                self.button_style = ButtonStyle::parse("styles.button_style", value)?;
            }
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Theme document
   -------------------------------------------------------------------------- */

/// Everything the editor changes; the body of a full-replace save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDocument {
    pub name: String,
    pub colors: ThemeColors,
    pub typography: ThemeTypography,
    pub styles: ThemeStyles,
    /// Homepage layout; order is render order.
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub custom_css: Option<String>,
}

impl Default for ThemeDocument {
    fn default() -> Self {
        Self {
            name: "Untitled Theme".into(),
            colors: ThemeColors::default(),
            typography: ThemeTypography::default(),
            styles: ThemeStyles::default(),
            blocks: [
                BlockKind::HeroBanner,
                BlockKind::FeaturedProducts,
                BlockKind::TrustBadges,
                BlockKind::Newsletter,
            ]
            .into_iter()
            .map(Block::new)
            .collect(),
            logo_url: None,
            favicon_url: None,
            custom_css: None,
        }
    }
}

impl ThemeDocument {
    /// Validate the whole document before it is persisted.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_theme_name(&self.name)?;
        self.colors.validate()?;
        self.typography.validate()?;

        if self.blocks.len() > MAX_BLOCKS {
            return Err(CoreError::Validation(format!(
                "Too many blocks: {} (max {MAX_BLOCKS})",
                self.blocks.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.blocks.len());
        for (i, block) in self.blocks.iter().enumerate() {
            if !seen.insert(block.id) {
                return Err(CoreError::Validation(format!(
                    "blocks[{i}]: duplicate block id {}",
                    block.id
                )));
            }
            block.settings.validate().map_err(|e| match e {
                CoreError::Validation(msg) => CoreError::Validation(format!("blocks[{i}]: {msg}")),
                other => other,
            })?;
        }

        validate_branding_url("logo_url", self.logo_url.as_deref())?;
        validate_branding_url("favicon_url", self.favicon_url.as_deref())?;

        if let Some(css) = &self.custom_css {
            let chars = css.chars().count();
            if chars > MAX_CUSTOM_CSS_LEN {
                return Err(CoreError::Validation(format!(
                    "custom_css too long: {chars} chars (max {MAX_CUSTOM_CSS_LEN})"
                )));
            }
            if css.to_ascii_lowercase().contains("</style") {
                return Err(CoreError::Validation(
                    "custom_css must not close the style element".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Blocks the storefront renders, in order.
    pub fn enabled_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.enabled)
    }
}

/// A persisted theme: identity, lifecycle flags, and its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: DbId,
    /// Owning store; `None` for platform presets.
    pub store_id: Option<DbId>,
    pub is_active: bool,
    /// Read-only platform template.
    pub is_preset: bool,
    /// Incremented on every successful save.
    pub version: i32,
    #[serde(flatten)]
    pub document: ThemeDocument,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `PATCH /stores/{store_id}/themes/{theme_id}`.
///
/// Full replace of the document. When `expected_version` is present the save
/// only applies if the stored version still matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceTheme {
    #[serde(flatten)]
    pub document: ThemeDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i32>,
}

/* --------------------------------------------------------------------------
   Font catalog
   -------------------------------------------------------------------------- */

/// Heading font families offered by the editor.
pub const HEADING_FONTS: &[&str] = &[
    "Inter",
    "Poppins",
    "Montserrat",
    "Playfair Display",
    "Merriweather",
    "Oswald",
    "Raleway",
    "DM Serif Display",
    "Space Grotesk",
    "Bebas Neue",
];

/// Body font families offered by the editor.
pub const BODY_FONTS: &[&str] = &[
    "Inter",
    "Roboto",
    "Open Sans",
    "Lato",
    "Source Sans 3",
    "Nunito",
    "Work Sans",
    "DM Sans",
    "Karla",
    "IBM Plex Sans",
];

/// Response of `GET /themes/meta/fonts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontCatalog {
    pub heading_fonts: Vec<String>,
    pub body_fonts: Vec<String>,
}

pub fn font_catalog() -> FontCatalog {
    FontCatalog {
        heading_fonts: HEADING_FONTS.iter().map(|f| f.to_string()).collect(),
        body_fonts: BODY_FONTS.iter().map(|f| f.to_string()).collect(),
    }
}
