//! fa-subset-core: webfont subsetting for icon font distributions
//!
//! Given a set of icon names grouped by style ("solid", "duotone", ...),
//! this library locates the matching full font file inside an installed
//! FontAwesome-compatible package, resolves each name to a Unicode code
//! point through the bundled metadata, strips every other glyph and writes
//! the result in one or more webfont container formats.
//!
//! The pipeline runs in three phases:
//!
//! **Locate**: find the vendor package (free or pro tier) and its
//! `metadata/` + `webfonts/` layout, either through `node_modules`
//! resolution or an explicit override path.
//!
//! **Plan**: resolve every requested icon (by canonical name, alias or raw
//! hex Unicode value) against the metadata index, check that the icon
//! actually ships a glyph for the requested style and tier, and collect the
//! surviving code points into one work item per style. Resolution failures
//! never abort the run; they are accumulated for the end-of-run report.
//!
//! **Execute**: for every (style, format) pair, subset the source font down
//! to the planned character set and write `<basename>.<ext>` into the
//! output directory. All subsetting operations run in parallel and the run
//! only completes once every output file is on disk.
//!
//! ```rust,no_run
//! use fa_subset_core::{subset_fonts, SubsetOptions, SubsetRequest};
//!
//! let request = SubsetRequest::Icons(vec!["plus".into(), "minus".into()]);
//! let ok = subset_fonts(&request, "webfonts/".as_ref(), &SubsetOptions::default())?;
//! assert!(ok, "all icons resolved");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod engine;
pub mod locate;
pub mod metadata;
pub mod output;
pub mod plan;
pub mod resolve;
pub mod run;
pub mod styles;

pub use crate::plan::{ErrorReport, SubsetRequest};
pub use crate::run::{subset_fonts, subset_fonts_with, RunSummary, SubsetOptions};
pub use crate::styles::{Family, Style, StyleCatalog, TargetFormat, Tier, Weight};
