//! Locating the installed vendor package and its asset layout.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::styles::Tier;

/// Environment variable overriding package resolution entirely.
pub const PACKAGE_DIR_ENV: &str = "FA_SUBSET_PACKAGE_DIR";

/// Resolved locations of the vendor metadata and font files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageAssets {
    /// Legacy-schema metadata (`metadata/icons.yml`), always present.
    pub icons_path: PathBuf,
    /// Current-schema metadata (`metadata/icon-families.yml`), shipped by
    /// newer package versions only.
    pub families_path: Option<PathBuf>,
    /// Directory holding the pre-built full fonts (`webfonts/`).
    pub font_dir: PathBuf,
}

impl PackageAssets {
    /// Validate a package root and derive the asset layout from it.
    pub fn from_package_root(root: &Path) -> Result<Self> {
        let metadata_dir = root.join("metadata");
        let icons_path = metadata_dir.join("icons.yml");
        let font_dir = root.join("webfonts");

        if !icons_path.is_file() {
            return Err(anyhow!(
                "no icon metadata at {}; this does not look like an icon font package",
                icons_path.display()
            ));
        }
        if !font_dir.is_dir() {
            return Err(anyhow!(
                "no webfonts directory at {}",
                font_dir.display()
            ));
        }

        let families_path = Some(metadata_dir.join("icon-families.yml")).filter(|p| p.is_file());

        Ok(Self {
            icons_path,
            families_path,
            font_dir,
        })
    }

    /// The metadata file the loader should read: the current-schema family
    /// file when the package ships one, the legacy file otherwise.
    pub fn metadata_path(&self) -> &Path {
        self.families_path.as_deref().unwrap_or(&self.icons_path)
    }
}

/// Strategy for finding the installed vendor package.
///
/// The pipeline never needs to know how the platform resolves installed
/// packages; swapping this out is enough to support other layouts.
pub trait AssetLocator {
    fn locate(&self, tier: Tier, override_path: Option<&Path>) -> Result<PackageAssets>;
}

/// Locator mirroring Node.js module resolution: walk up from a start
/// directory looking for `node_modules/@fortawesome/fontawesome-<tier>`.
///
/// An explicit override path or the `FA_SUBSET_PACKAGE_DIR` environment
/// variable bypasses the walk.
#[derive(Debug, Clone, Default)]
pub struct NodePackageLocator {
    start_dir: Option<PathBuf>,
}

impl NodePackageLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit directory instead of the current working directory as
    /// the starting point of the `node_modules` walk.
    pub fn starting_at(dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: Some(dir.into()),
        }
    }

    fn walk_start(&self) -> Result<PathBuf> {
        match &self.start_dir {
            Some(dir) => Ok(dir.clone()),
            None => env::current_dir().map_err(|err| anyhow!("cannot resolve cwd: {err}")),
        }
    }
}

impl AssetLocator for NodePackageLocator {
    fn locate(&self, tier: Tier, override_path: Option<&Path>) -> Result<PackageAssets> {
        if let Some(root) = override_path {
            return PackageAssets::from_package_root(root);
        }
        if let Ok(raw) = env::var(PACKAGE_DIR_ENV) {
            return PackageAssets::from_package_root(Path::new(&raw));
        }

        let start = self.walk_start()?;
        for dir in start.ancestors() {
            let candidate = dir
                .join("node_modules")
                .join("@fortawesome")
                .join(tier.package_name());
            if candidate.is_dir() {
                return PackageAssets::from_package_root(&candidate);
            }
        }

        Err(anyhow!(
            "unable to resolve the '@fortawesome/{}' package; check that your preferred \
             icon package is installed as a dependency, or pass an explicit package path \
             (options.package_path) when using pro features",
            tier.package_name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scaffold_package(root: &Path, with_families: bool) {
        fs::create_dir_all(root.join("metadata")).expect("mkdir metadata");
        fs::create_dir_all(root.join("webfonts")).expect("mkdir webfonts");
        fs::write(root.join("metadata/icons.yml"), "{}").expect("write icons.yml");
        if with_families {
            fs::write(root.join("metadata/icon-families.yml"), "{}")
                .expect("write icon-families.yml");
        }
    }

    #[test]
    fn validates_package_layout() {
        let tmp = tempfile::tempdir().expect("tempdir");
        scaffold_package(tmp.path(), false);

        let assets = PackageAssets::from_package_root(tmp.path()).expect("valid package");
        assert_eq!(assets.metadata_path(), tmp.path().join("metadata/icons.yml"));
        assert!(assets.families_path.is_none());
    }

    #[test]
    fn prefers_family_metadata_when_present() {
        let tmp = tempfile::tempdir().expect("tempdir");
        scaffold_package(tmp.path(), true);

        let assets = PackageAssets::from_package_root(tmp.path()).expect("valid package");
        assert_eq!(
            assets.metadata_path(),
            tmp.path().join("metadata/icon-families.yml")
        );
    }

    #[test]
    fn rejects_directories_without_metadata() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = PackageAssets::from_package_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("no icon metadata"));
    }

    #[test]
    fn walks_up_to_find_node_modules() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let package_root = tmp
            .path()
            .join("node_modules/@fortawesome/fontawesome-free");
        scaffold_package(&package_root, false);

        let nested = tmp.path().join("src/deeply/nested");
        fs::create_dir_all(&nested).expect("mkdir nested");

        let locator = NodePackageLocator::starting_at(&nested);
        let assets = locator.locate(Tier::Free, None).expect("locate");
        assert_eq!(assets.font_dir, package_root.join("webfonts"));
    }

    #[test]
    fn missing_package_reports_tier_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let locator = NodePackageLocator::starting_at(tmp.path());

        let err = locator.locate(Tier::Pro, None).unwrap_err();
        assert!(err.to_string().contains("fontawesome-pro"));
    }

    #[test]
    fn override_path_bypasses_resolution() {
        let tmp = tempfile::tempdir().expect("tempdir");
        scaffold_package(tmp.path(), true);

        let locator = NodePackageLocator::new();
        let assets = locator.locate(Tier::Free, Some(tmp.path())).expect("locate");
        assert!(assets.families_path.is_some());
    }
}
