//! Loading and modelling of the vendor icon metadata files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::styles::Tier;

/// The whole metadata file: canonical icon name → record, in file order.
///
/// Iteration order matters: alias resolution is specified as first match
/// wins, deterministically by index order.
pub type IconIndex = IndexMap<String, IconRecord>;

/// One icon entry from `icons.yml` or `icon-families.yml`.
///
/// The two metadata schema generations are kept as-is; no normalization is
/// performed on load. Consumers branch on [`Availability`].
#[derive(Debug, Clone, Deserialize)]
pub struct IconRecord {
    /// Display name, informational only.
    #[serde(default)]
    pub label: String,
    /// Primary code point as a hex string (e.g. `f067`).
    pub unicode: String,
    #[serde(flatten)]
    pub availability: Availability,
    #[serde(default)]
    pub aliases: Option<Aliases>,
}

/// Which style/family combinations an icon ships glyphs for.
///
/// Explicit tagged variant over the two vendor schema generations, so the
/// availability branching stays exhaustive and testable.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Availability {
    /// Current schema (`icon-families.yml`): package tier → ordered list of
    /// {family, style} pairs.
    Current {
        #[serde(rename = "familyStylesByLicense")]
        family_styles_by_license: BTreeMap<Tier, Vec<FamilyStyle>>,
    },
    /// Legacy schema (`icons.yml`): flat list of style tokens.
    Legacy { styles: Vec<String> },
}

/// A {family, style} pair from the current schema.
///
/// Kept as plain strings so that families the vendor adds later cannot fail
/// deserialization of the whole index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyStyle {
    pub family: String,
    pub style: String,
}

/// Alternate ways of identifying an icon.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Aliases {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub unicodes: AliasUnicodes,
}

/// Alternate Unicode values (hex strings) that resolve to the owning icon.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AliasUnicodes {
    #[serde(default)]
    pub composite: Vec<String>,
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

/// Parse a metadata YAML file into an ordered icon index.
///
/// Either schema generation is accepted. A missing or malformed file is an
/// error; without metadata nothing can be resolved.
pub fn load_index(path: &Path) -> Result<IconIndex> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("icon metadata unavailable: {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("malformed icon metadata: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_YAML: &str = r#"
plus:
  changes:
    - "1.0.0"
  label: plus
  search:
    terms:
      - add
  styles:
    - solid
  unicode: "2b"
  aliases:
    names:
      - add
    unicodes:
      composite:
        - f067
      secondary:
        - 10f067
minus:
  label: minus
  styles:
    - solid
    - regular
  unicode: "f068"
"#;

    const CURRENT_YAML: &str = r#"
plus:
  label: plus
  unicode: "2b"
  familyStylesByLicense:
    free:
      - family: classic
        style: solid
    pro:
      - family: classic
        style: solid
      - family: duotone
        style: solid
"#;

    #[test]
    fn parses_legacy_schema() {
        let index: IconIndex = serde_yaml::from_str(LEGACY_YAML).expect("parse legacy yaml");
        let plus = &index["plus"];

        assert_eq!(plus.unicode, "2b");
        assert_eq!(plus.label, "plus");
        let Availability::Legacy { styles } = &plus.availability else {
            panic!("expected legacy availability");
        };
        assert_eq!(styles, &["solid"]);

        let aliases = plus.aliases.as_ref().expect("plus has aliases");
        assert_eq!(aliases.names, ["add"]);
        assert_eq!(aliases.unicodes.composite, ["f067"]);
        assert_eq!(aliases.unicodes.secondary, ["10f067"]);
    }

    #[test]
    fn parses_current_schema() {
        let index: IconIndex = serde_yaml::from_str(CURRENT_YAML).expect("parse current yaml");
        let plus = &index["plus"];

        let Availability::Current {
            family_styles_by_license,
        } = &plus.availability
        else {
            panic!("expected current availability");
        };

        let free = &family_styles_by_license[&Tier::Free];
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].family, "classic");
        assert_eq!(free[0].style, "solid");
        assert_eq!(family_styles_by_license[&Tier::Pro].len(), 2);
    }

    #[test]
    fn unknown_future_families_do_not_break_parsing() {
        let yaml = r#"
sparkle:
  label: sparkle
  unicode: "e001"
  familyStylesByLicense:
    pro:
      - family: chisel
        style: regular
"#;
        let index: IconIndex = serde_yaml::from_str(yaml).expect("parse yaml");
        let Availability::Current {
            family_styles_by_license,
        } = &index["sparkle"].availability
        else {
            panic!("expected current availability");
        };
        assert_eq!(family_styles_by_license[&Tier::Pro][0].family, "chisel");
    }

    #[test]
    fn index_preserves_file_order() {
        let index: IconIndex = serde_yaml::from_str(LEGACY_YAML).expect("parse legacy yaml");
        let names: Vec<&str> = index.keys().map(String::as_str).collect();
        assert_eq!(names, ["plus", "minus"]);
    }

    #[test]
    fn load_index_reports_missing_file() {
        let err = load_index(Path::new("/nonexistent/icons.yml")).unwrap_err();
        assert!(err.to_string().contains("icon metadata unavailable"));
    }

    #[test]
    fn load_index_reports_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("icons.yml");
        fs::write(&path, "plus: [not, a, record]").expect("write yaml");

        let err = load_index(&path).unwrap_err();
        assert!(err.to_string().contains("malformed icon metadata"));
    }
}
