//! Style tokens and the fixed lookup tables tying them to vendor assets.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Public style token accepted in subset requests.
///
/// These are the short names the vendor has always exposed to users, even
/// after its metadata moved to the family/style taxonomy of the current
/// schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    Solid,
    Light,
    Regular,
    Thin,
    Brands,
    Duotone,
    DuotoneLight,
    DuotoneRegular,
    DuotoneThin,
    SharpSolid,
    SharpLight,
    SharpRegular,
    SharpThin,
    SharpDuotoneSolid,
    SharpDuotoneLight,
    SharpDuotoneRegular,
    SharpDuotoneThin,
}

impl Style {
    pub const ALL: [Style; 17] = [
        Style::Solid,
        Style::Light,
        Style::Regular,
        Style::Thin,
        Style::Brands,
        Style::Duotone,
        Style::DuotoneLight,
        Style::DuotoneRegular,
        Style::DuotoneThin,
        Style::SharpSolid,
        Style::SharpLight,
        Style::SharpRegular,
        Style::SharpThin,
        Style::SharpDuotoneSolid,
        Style::SharpDuotoneLight,
        Style::SharpDuotoneRegular,
        Style::SharpDuotoneThin,
    ];

    /// The short token used in requests and metadata (e.g. `sharp-solid`).
    pub fn token(self) -> &'static str {
        match self {
            Style::Solid => "solid",
            Style::Light => "light",
            Style::Regular => "regular",
            Style::Thin => "thin",
            Style::Brands => "brands",
            Style::Duotone => "duotone",
            Style::DuotoneLight => "duotone-light",
            Style::DuotoneRegular => "duotone-regular",
            Style::DuotoneThin => "duotone-thin",
            Style::SharpSolid => "sharp-solid",
            Style::SharpLight => "sharp-light",
            Style::SharpRegular => "sharp-regular",
            Style::SharpThin => "sharp-thin",
            Style::SharpDuotoneSolid => "sharp-duotone-solid",
            Style::SharpDuotoneLight => "sharp-duotone-light",
            Style::SharpDuotoneRegular => "sharp-duotone-regular",
            Style::SharpDuotoneThin => "sharp-duotone-thin",
        }
    }

    /// Lenient lookup used for request keys; unknown tokens return `None`
    /// so the planner can skip them silently.
    pub fn parse_token(token: &str) -> Option<Style> {
        Style::ALL.iter().copied().find(|s| s.token() == token)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::parse_token(s).ok_or_else(|| anyhow!("unknown style token: {s}"))
    }
}

/// Current-schema rendering family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    Classic,
    Duotone,
    Sharp,
    SharpDuotone,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Classic => "classic",
            Family::Duotone => "duotone",
            Family::Sharp => "sharp",
            Family::SharpDuotone => "sharp-duotone",
        }
    }

    /// Duotone-class families render two glyph layers per icon and need a
    /// secondary code point in every subset.
    pub fn is_duotone(self) -> bool {
        matches!(self, Family::Duotone | Family::SharpDuotone)
    }
}

/// Current-schema underlying style (the weight axis of the taxonomy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    Solid,
    Regular,
    Light,
    Thin,
    Brands,
}

impl Weight {
    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Solid => "solid",
            Weight::Regular => "regular",
            Weight::Light => "light",
            Weight::Thin => "thin",
            Weight::Brands => "brands",
        }
    }
}

/// Licensing package tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    /// Name of the installable vendor package for this tier.
    pub fn package_name(self) -> &'static str {
        match self {
            Tier::Free => "fontawesome-free",
            Tier::Pro => "fontawesome-pro",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => f.write_str("free"),
            Tier::Pro => f.write_str("pro"),
        }
    }
}

/// Output container format for subsetted fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Woff,
    Woff2,
    Sfnt,
}

impl TargetFormat {
    /// File extension for output files in this format.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Woff => "woff",
            TargetFormat::Woff2 => "woff2",
            TargetFormat::Sfnt => "ttf",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFormat::Woff => f.write_str("woff"),
            TargetFormat::Woff2 => f.write_str("woff2"),
            TargetFormat::Sfnt => f.write_str("sfnt"),
        }
    }
}

impl FromStr for TargetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "woff" => Ok(TargetFormat::Woff),
            "woff2" => Ok(TargetFormat::Woff2),
            "sfnt" | "ttf" => Ok(TargetFormat::Sfnt),
            other => Err(anyhow!("unknown target format: {other}")),
        }
    }
}

/// One row of the style lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleEntry {
    pub style: Style,
    pub family: Family,
    pub weight: Weight,
    /// Base name of the pre-built font file shipped by the vendor.
    pub basename: &'static str,
}

/// The fixed style→filename and style→{family, weight} tables.
///
/// Carried as a value (rather than a module-level singleton) so tests and
/// future style additions can substitute alternate tables without touching
/// the planning algorithm.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    entries: Vec<StyleEntry>,
}

impl StyleCatalog {
    /// The 17 styles of the current vendor distribution.
    pub fn builtin() -> Self {
        use Family::*;
        use Weight as W;

        let entries = vec![
            StyleEntry { style: Style::Solid, family: Classic, weight: W::Solid, basename: "fa-solid-900" },
            StyleEntry { style: Style::Light, family: Classic, weight: W::Light, basename: "fa-light-300" },
            StyleEntry { style: Style::Regular, family: Classic, weight: W::Regular, basename: "fa-regular-400" },
            StyleEntry { style: Style::Thin, family: Classic, weight: W::Thin, basename: "fa-thin-100" },
            StyleEntry { style: Style::Brands, family: Classic, weight: W::Brands, basename: "fa-brands-400" },
            StyleEntry { style: Style::Duotone, family: Duotone, weight: W::Solid, basename: "fa-duotone-900" },
            StyleEntry { style: Style::DuotoneLight, family: Duotone, weight: W::Light, basename: "fa-duotone-light-300" },
            StyleEntry { style: Style::DuotoneRegular, family: Duotone, weight: W::Regular, basename: "fa-duotone-regular-400" },
            StyleEntry { style: Style::DuotoneThin, family: Duotone, weight: W::Thin, basename: "fa-duotone-thin-100" },
            StyleEntry { style: Style::SharpSolid, family: Sharp, weight: W::Solid, basename: "fa-sharp-solid-900" },
            StyleEntry { style: Style::SharpLight, family: Sharp, weight: W::Light, basename: "fa-sharp-light-300" },
            StyleEntry { style: Style::SharpRegular, family: Sharp, weight: W::Regular, basename: "fa-sharp-regular-400" },
            StyleEntry { style: Style::SharpThin, family: Sharp, weight: W::Thin, basename: "fa-sharp-thin-100" },
            StyleEntry { style: Style::SharpDuotoneSolid, family: SharpDuotone, weight: W::Solid, basename: "fa-sharp-duotone-solid-900" },
            StyleEntry { style: Style::SharpDuotoneLight, family: SharpDuotone, weight: W::Light, basename: "fa-sharp-duotone-light-300" },
            StyleEntry { style: Style::SharpDuotoneRegular, family: SharpDuotone, weight: W::Regular, basename: "fa-sharp-duotone-regular-400" },
            StyleEntry { style: Style::SharpDuotoneThin, family: SharpDuotone, weight: W::Thin, basename: "fa-sharp-duotone-thin-100" },
        ];

        Self { entries }
    }

    /// Build a catalog from explicit entries (test/extension hook).
    pub fn from_entries(entries: Vec<StyleEntry>) -> Self {
        Self { entries }
    }

    pub fn entry(&self, style: Style) -> Option<&StyleEntry> {
        self.entries.iter().find(|e| e.style == style)
    }

    /// Base name of the pre-built font file for a style (e.g. `fa-solid-900`).
    pub fn font_basename(&self, style: Style) -> Option<&'static str> {
        self.entry(style).map(|e| e.basename)
    }

    /// Translate a public style token to the current-schema {family, weight}
    /// pair (e.g. `duotone` → {duotone, solid}).
    pub fn family_weight(&self, style: Style) -> Option<(Family, Weight)> {
        self.entry(style).map(|e| (e.family, e.weight))
    }

    /// Whether subsets for this style need the secondary duotone layer.
    pub fn is_duotone_class(&self, style: Style) -> bool {
        self.entry(style).is_some_and(|e| e.family.is_duotone())
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
