//! Turning a subset request into per-style work items.

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::locate::PackageAssets;
use crate::metadata::IconIndex;
use crate::resolve::{find_icon, has_style};
use crate::styles::{Style, StyleCatalog, Tier};

/// User input: a flat icon list (implicitly `solid`) or a style→icons map.
///
/// Style keys stay strings here on purpose: an unrecognized key must be
/// ignored silently, not rejected at parse time.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubsetRequest {
    Icons(Vec<String>),
    Styles(IndexMap<String, Vec<String>>),
}

impl SubsetRequest {
    fn entries(&self) -> IndexMap<String, Vec<String>> {
        match self {
            SubsetRequest::Icons(icons) => {
                IndexMap::from([("solid".to_string(), icons.clone())])
            }
            SubsetRequest::Styles(map) => map.clone(),
        }
    }
}

/// The per-style unit of planned subsetting work.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub style: Style,
    /// Source font file (the full pre-built font for this style).
    pub font_path: PathBuf,
    /// Destination base name; the executor appends one extension per format.
    pub basename: String,
    /// Retained code points, in resolution order, deduplicated.
    pub codepoints: IndexSet<char>,
}

impl WorkItem {
    /// The character string handed to the subsetting primitive: resolved
    /// characters joined by single spaces.
    pub fn subset_text(&self) -> String {
        let mut text = String::new();
        for (i, ch) in self.codepoints.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push(*ch);
        }
        text
    }
}

/// Icons that could not be resolved or matched, grouped by requested style.
#[derive(Debug, Clone, Default)]
pub struct ErrorReport {
    missing: IndexMap<Style, Vec<String>>,
}

/// One rendered row of the report.
#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    pub style: Style,
    pub missing_icons: &'a [String],
}

impl ErrorReport {
    /// Record a single unresolved icon under a style (append semantics).
    pub fn add(&mut self, style: Style, icon: impl Into<String>) {
        self.missing.entry(style).or_default().push(icon.into());
    }

    /// Record every icon of a list under a style.
    pub fn add_all<I, S>(&mut self, style: Style, icons: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.missing.entry(style).or_default();
        entry.extend(icons.into_iter().map(Into::into));
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ReportRow<'_>> {
        self.missing.iter().map(|(style, icons)| ReportRow {
            style: *style,
            missing_icons: icons.as_slice(),
        })
    }

    /// Missing icons recorded under one style, if any.
    pub fn missing_for(&self, style: Style) -> Option<&[String]> {
        self.missing.get(&style).map(Vec::as_slice)
    }
}

/// Everything the planner produced for one invocation.
#[derive(Debug, Default)]
pub struct Plan {
    pub items: Vec<WorkItem>,
    pub report: ErrorReport,
    /// Styles skipped wholesale because their source font file is absent.
    pub missing_fonts: Vec<(Style, PathBuf)>,
}

/// Build the work items for a request.
///
/// Planning never fails: per-icon and per-style problems are folded into
/// the report rather than aborting, so every producible font is still
/// produced.
pub fn plan_subsets(
    request: &SubsetRequest,
    assets: &PackageAssets,
    index: &IconIndex,
    catalog: &StyleCatalog,
    tier: Tier,
) -> Plan {
    let mut plan = Plan::default();

    for (key, icons) in request.entries() {
        // Unknown style keys and empty icon lists are no-ops, not errors.
        let Some(style) = Style::parse_token(&key) else {
            continue;
        };
        if icons.is_empty() {
            continue;
        }
        let Some(basename) = catalog.font_basename(style) else {
            continue;
        };

        let font_path = assets.font_dir.join(format!("{basename}.ttf"));
        if !font_path.is_file() {
            // A missing source font makes the whole style unplannable.
            plan.report.add_all(style, icons.iter().cloned());
            plan.missing_fonts.push((style, font_path));
            continue;
        }

        let duotone = catalog.is_duotone_class(style);
        let mut codepoints = IndexSet::new();

        for icon in &icons {
            let resolved = find_icon(index, icon)
                .filter(|(_, record)| has_style(record, style, tier, catalog))
                .and_then(|(_, record)| icon_codepoints(&record.unicode, duotone));

            match resolved {
                Some((primary, secondary)) => {
                    codepoints.insert(primary);
                    if let Some(secondary) = secondary {
                        codepoints.insert(secondary);
                    }
                }
                None => plan.report.add(style, icon.clone()),
            }
        }

        if !codepoints.is_empty() {
            plan.items.push(WorkItem {
                style,
                font_path,
                basename: basename.to_string(),
                codepoints,
            });
        }
    }

    plan
}

/// Parse an icon's hex code point, deriving the secondary duotone layer
/// code point when asked.
///
/// The secondary layer lives at the code point obtained by prefixing the
/// hex string with the digits `10` (`f067` → `10f067`), the vendor's
/// convention for two-layer glyphs.
fn icon_codepoints(unicode: &str, duotone: bool) -> Option<(char, Option<char>)> {
    let primary = parse_hex_char(unicode)?;
    if !duotone {
        return Some((primary, None));
    }
    let secondary = parse_hex_char(&format!("10{unicode}"));
    Some((primary, secondary))
}

fn parse_hex_char(hex: &str) -> Option<char> {
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
