//! The full subsetting run: locate, plan, execute.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::engine::SubsetFont;
use crate::locate::{AssetLocator, NodePackageLocator};
use crate::metadata;
use crate::output::write_error_table;
use crate::plan::{plan_subsets, ErrorReport, SubsetRequest, WorkItem};
use crate::styles::{StyleCatalog, TargetFormat, Tier};

/// Knobs for one subsetting run.
#[derive(Debug, Clone)]
pub struct SubsetOptions {
    pub tier: Tier,
    /// Explicit package root, bypassing locator search.
    pub package_path: Option<PathBuf>,
    pub target_formats: Vec<TargetFormat>,
    /// Worker thread cap; `None` leaves the pool at its default size.
    pub jobs: Option<usize>,
}

impl Default for SubsetOptions {
    fn default() -> Self {
        Self {
            tier: Tier::Free,
            package_path: None,
            target_formats: vec![TargetFormat::Woff2, TargetFormat::Sfnt],
            jobs: None,
        }
    }
}

/// Outcome of a run that got past I/O failures.
///
/// `success` is false whenever anything could not be honored in full, even
/// though every resolvable font was still written.
#[derive(Debug)]
pub struct RunSummary {
    pub success: bool,
    pub report: ErrorReport,
    /// Paths of every font file written, in plan order.
    pub written: Vec<PathBuf>,
    /// Human-readable notes about non-fatal problems, for the caller to
    /// surface however it sees fit.
    pub warnings: Vec<String>,
}

/// Run a subset request against assets found by `locator`.
///
/// Fatal errors (unreadable metadata, I/O failures while reading or
/// writing fonts) come back as `Err`. Everything else lands in the
/// summary: unresolved icons in the report, an unusable package or an
/// empty format list as warnings with `success == false`.
pub fn subset_fonts_with(
    locator: &dyn AssetLocator,
    request: &SubsetRequest,
    output_dir: &Path,
    options: &SubsetOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary {
        success: true,
        report: ErrorReport::default(),
        written: Vec::new(),
        warnings: Vec::new(),
    };

    if options.target_formats.is_empty() {
        summary.success = false;
        summary
            .warnings
            .push("no target formats requested, nothing to write".to_string());
        return Ok(summary);
    }

    let assets = match locator.locate(options.tier, options.package_path.as_deref()) {
        Ok(assets) => assets,
        Err(err) => {
            summary.success = false;
            summary.warnings.push(format!("{err:#}"));
            return Ok(summary);
        }
    };

    let index = metadata::load_index(assets.metadata_path())?;
    let catalog = StyleCatalog::builtin();
    let plan = plan_subsets(request, &assets, &index, &catalog, options.tier);

    for (style, path) in &plan.missing_fonts {
        summary.warnings.push(format!(
            "font file for style '{style}' not found at {}",
            path.display()
        ));
    }

    if !plan.items.is_empty() {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;

        let run_items = || -> Result<Vec<Vec<PathBuf>>> {
            plan.items
                .par_iter()
                .map(|item| write_item(item, output_dir, &options.target_formats))
                .collect()
        };
        let written = if let Some(jobs) = options.jobs {
            let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
            pool.install(run_items)?
        } else {
            run_items()?
        };
        summary.written = written.into_iter().flatten().collect();
    }

    summary.report = plan.report;
    summary.success = summary.success && summary.report.is_empty();
    Ok(summary)
}

/// Subset one style's font into every requested format.
fn write_item(
    item: &WorkItem,
    output_dir: &Path,
    formats: &[TargetFormat],
) -> Result<Vec<PathBuf>> {
    let data = fs::read(&item.font_path)
        .with_context(|| format!("reading font {}", item.font_path.display()))?;
    let subset = SubsetFont::build(&data, &item.codepoints)
        .with_context(|| format!("subsetting {}", item.font_path.display()))?;

    formats
        .par_iter()
        .map(|&format| {
            let path = output_dir.join(format!("{}.{}", item.basename, format.extension()));
            fs::write(&path, subset.to_bytes(format))
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// Convenience entry point: locate the vendor package near the current
/// directory, run the request, and render any problems to stderr.
///
/// Returns `Ok(false)` when the run completed but could not honor the
/// request in full.
pub fn subset_fonts(
    request: &SubsetRequest,
    output_dir: &Path,
    options: &SubsetOptions,
) -> Result<bool> {
    let locator = NodePackageLocator::new();
    let summary = subset_fonts_with(&locator, request, output_dir, options)?;

    for warning in &summary.warnings {
        eprintln!("{warning}");
    }
    if !summary.report.is_empty() {
        let mut stderr = std::io::stderr().lock();
        write_error_table(&summary.report, &mut stderr).context("rendering error report")?;
    }

    Ok(summary.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::PackageAssets;
    use anyhow::anyhow;

    struct FailingLocator;

    impl AssetLocator for FailingLocator {
        fn locate(&self, _: Tier, _: Option<&Path>) -> Result<PackageAssets> {
            Err(anyhow!("no package anywhere"))
        }
    }

    #[test]
    fn empty_format_list_short_circuits() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let options = SubsetOptions {
            target_formats: Vec::new(),
            ..SubsetOptions::default()
        };
        let request = SubsetRequest::Icons(vec!["plus".to_string()]);

        let summary = subset_fonts_with(&FailingLocator, &request, tmp.path(), &options)
            .expect("no fatal error");

        assert!(!summary.success);
        assert!(summary.written.is_empty());
        assert_eq!(summary.warnings.len(), 1, "{:?}", summary.warnings);
    }

    #[test]
    fn unusable_package_is_a_soft_failure() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let request = SubsetRequest::Icons(vec!["plus".to_string()]);

        let summary = subset_fonts_with(
            &FailingLocator,
            &request,
            tmp.path(),
            &SubsetOptions::default(),
        )
        .expect("no fatal error");

        assert!(!summary.success);
        assert!(summary.warnings[0].contains("no package anywhere"));
    }

    #[test]
    fn default_options_target_woff2_and_sfnt() {
        let options = SubsetOptions::default();
        assert_eq!(
            options.target_formats,
            [TargetFormat::Woff2, TargetFormat::Sfnt]
        );
        assert_eq!(options.tier, Tier::Free);
    }
}
