//! fa-subset CLI

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use indexmap::IndexMap;

use fa_subset_core::locate::NodePackageLocator;
use fa_subset_core::output::{write_error_json, write_error_table};
use fa_subset_core::{
    subset_fonts_with, SubsetOptions, SubsetRequest, TargetFormat, Tier,
};

/// CLI entrypoint for fa-subset.
#[derive(Debug, Parser)]
#[command(
    name = "fa-subset",
    about = "Subset icon webfonts down to the icons you actually use"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Produce subsetted fonts for the requested icons
    Build(BuildArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Icons to keep, as `name` (solid style) or `style:name`
    #[arg(value_hint = ValueHint::Other, required_unless_present = "file")]
    icons: Vec<String>,

    /// YAML request file: a flat icon list or a style-to-icons map
    #[arg(short = 'f', long = "file", value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Directory the subsetted fonts are written to
    #[arg(short = 'o', long = "output", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// Icon package tier to subset from
    #[arg(long = "package", default_value_t = PackageArg::Free, value_enum)]
    package: PackageArg,

    /// Explicit package root, skipping node_modules discovery
    #[arg(long = "package-path", value_hint = ValueHint::DirPath)]
    package_path: Option<PathBuf>,

    /// Output formats to produce
    #[arg(
        short = 'F',
        long = "formats",
        value_delimiter = ',',
        value_enum,
        default_values_t = [FormatArg::Woff2, FormatArg::Ttf]
    )]
    formats: Vec<FormatArg>,

    /// Cap the number of worker threads
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Emit the unresolved-icon report as JSON on stdout
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PackageArg {
    Free,
    Pro,
}

impl From<PackageArg> for Tier {
    fn from(package: PackageArg) -> Self {
        match package {
            PackageArg::Free => Tier::Free,
            PackageArg::Pro => Tier::Pro,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum FormatArg {
    Woff,
    Woff2,
    Ttf,
}

impl From<FormatArg> for TargetFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Woff => TargetFormat::Woff,
            FormatArg::Woff2 => TargetFormat::Woff2,
            FormatArg::Ttf => TargetFormat::Sfnt,
        }
    }
}

/// Parse CLI args and execute the selected command.
///
/// `Ok(false)` means the run finished but could not honor the request in
/// full; the binary turns that into exit code 1.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => run_build(args),
    }
}

fn run_build(args: BuildArgs) -> Result<bool> {
    let request = build_request(&args)?;
    let options = SubsetOptions {
        tier: args.package.into(),
        package_path: args.package_path.clone(),
        target_formats: args.formats.iter().map(|&f| f.into()).collect(),
        jobs: args.jobs,
    };

    let locator = NodePackageLocator::new();
    let summary = subset_fonts_with(&locator, &request, &args.output, &options)?;

    for warning in &summary.warnings {
        eprintln!("{warning}");
    }
    if args.json {
        let mut stdout = io::stdout().lock();
        write_error_json(&summary.report, &mut stdout).context("rendering report")?;
    } else if !summary.report.is_empty() {
        let mut stderr = io::stderr().lock();
        write_error_table(&summary.report, &mut stderr).context("rendering report")?;
    }

    Ok(summary.success)
}

/// Merge the request file (if any) with positional icon arguments.
fn build_request(args: &BuildArgs) -> Result<SubsetRequest> {
    let mut by_style: IndexMap<String, Vec<String>> = IndexMap::new();

    if let Some(path) = &args.file {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading request file {}", path.display()))?;
        let parsed: SubsetRequest = serde_yaml::from_str(&raw)
            .with_context(|| format!("malformed request file {}", path.display()))?;
        match parsed {
            SubsetRequest::Icons(icons) => {
                by_style.entry("solid".to_string()).or_default().extend(icons);
            }
            SubsetRequest::Styles(map) => {
                for (style, icons) in map {
                    by_style.entry(style).or_default().extend(icons);
                }
            }
        }
    }

    for spec in &args.icons {
        let (style, icon) = match spec.split_once(':') {
            Some((style, icon)) => (style, icon),
            None => ("solid", spec.as_str()),
        };
        if style.is_empty() || icon.is_empty() {
            return Err(anyhow!("malformed icon argument: {spec}"));
        }
        by_style
            .entry(style.to_string())
            .or_default()
            .push(icon.to_string());
    }

    if by_style.values().all(Vec::is_empty) {
        return Err(anyhow!("no icons requested"));
    }

    Ok(SubsetRequest::Styles(by_style))
}

#[cfg(test)]
mod tests;
