//! Icon name resolution and style availability checks.

use crate::metadata::{Availability, IconIndex, IconRecord};
use crate::styles::{Style, StyleCatalog, Tier};

/// Find an icon by canonical name, alias, or raw hex Unicode value.
///
/// Exact key matches win outright. Otherwise the index is scanned in file
/// order for the first record whose own unicode, alias names, or composite /
/// secondary alias unicodes equal the identifier. Returns the canonical name
/// together with the record, or `None`.
pub fn find_icon<'a>(index: &'a IconIndex, identifier: &str) -> Option<(&'a str, &'a IconRecord)> {
    if let Some((name, record)) = index.get_key_value(identifier) {
        return Some((name.as_str(), record));
    }

    index
        .iter()
        .find(|(_, record)| matches_alias(record, identifier))
        .map(|(name, record)| (name.as_str(), record))
}

fn matches_alias(record: &IconRecord, identifier: &str) -> bool {
    if record.unicode == identifier {
        return true;
    }
    let Some(aliases) = &record.aliases else {
        return false;
    };
    aliases.names.iter().any(|n| n == identifier)
        || aliases.unicodes.composite.iter().any(|u| u == identifier)
        || aliases.unicodes.secondary.iter().any(|u| u == identifier)
}

/// Whether a resolved icon actually ships a glyph for the requested style
/// under the given package tier.
///
/// Legacy records carry the public style token directly. Current records
/// need the token translated to a {family, weight} pair first, because the
/// vendor restructured its taxonomy while keeping the old tokens as the
/// public API.
pub fn has_style(record: &IconRecord, style: Style, tier: Tier, catalog: &StyleCatalog) -> bool {
    match &record.availability {
        Availability::Legacy { styles } => styles.iter().any(|s| s == style.token()),
        Availability::Current {
            family_styles_by_license,
        } => {
            let Some((family, weight)) = catalog.family_weight(style) else {
                return false;
            };
            family_styles_by_license
                .get(&tier)
                .is_some_and(|pairs| {
                    pairs
                        .iter()
                        .any(|p| p.family == family.as_str() && p.style == weight.as_str())
                })
        }
    }
}
