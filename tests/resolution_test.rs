use anyhow::{Result, bail};
use async_trait::async_trait;
use futures_util::future::join_all;
use pkgmeta::{
    CacheableIcon, Capabilities, DetailsResolver, FallbackLookup, IconDatabase, IconEntry,
    Package, PackageDetails, PackageManager, RealRuntime, normalize_icon_id,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;
use url::Url;

/// A manager with configurable capabilities that counts its native calls.
struct FakeManager {
    caps: Capabilities,
    install_dir: Option<PathBuf>,
    versions: Vec<String>,
    icon: Option<String>,
    screenshots: Vec<String>,
    native_calls: AtomicUsize,
}

impl FakeManager {
    fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            install_dir: None,
            versions: vec![],
            icon: None,
            screenshots: vec![],
            native_calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.native_calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PackageManager for FakeManager {
    fn name(&self) -> &str {
        "fake"
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn icon_id(&self, package: &Package) -> String {
        normalize_icon_id(package.id().trim_start_matches("vendor."))
    }

    async fn fetch_details_native(&self, details: &mut PackageDetails) -> Result<()> {
        self.record();
        details.description = Some("fake package".into());
        details.tags = vec!["cli".into()];
        Ok(())
    }

    async fn fetch_versions_native(&self, _package: &Package) -> Result<Vec<String>> {
        self.record();
        Ok(self.versions.clone())
    }

    async fn fetch_icon_native(&self, package: &Package) -> Result<Option<CacheableIcon>> {
        self.record();
        Ok(self
            .icon
            .as_deref()
            .map(|u| CacheableIcon::with_version(Url::parse(u).unwrap(), package.version())))
    }

    async fn fetch_screenshots_native(&self, _package: &Package) -> Result<Vec<Url>> {
        self.record();
        Ok(self
            .screenshots
            .iter()
            .map(|u| Url::parse(u).unwrap())
            .collect())
    }

    async fn fetch_install_location_native(&self, package: &Package) -> Result<Option<PathBuf>> {
        self.record();
        if package.id() == "broken" {
            bail!("could not query install location");
        }
        Ok(self.install_dir.clone())
    }
}

fn database() -> IconDatabase {
    IconDatabase::from_entries([
        (
            "ripgrep",
            IconEntry::new("https://icons.example/ripgrep.png")
                .with_images(["", "https://shots.example/rg-1.png"]),
        ),
        (
            "vendor.ripgrep",
            IconEntry::new("").with_images(["https://shots.example/rg-vendor.png", " "]),
        ),
    ])
}

#[tokio::test]
async fn test_no_capabilities_uses_icon_database_only() {
    let manager = FakeManager::new(Capabilities::NONE);
    let db = database();
    let resolver = DetailsResolver::new(&manager, &db, &RealRuntime);
    let pkg = Package::new("vendor.ripgrep", "14.1.0", "fake");

    let icon = resolver.fetch_icon(&pkg).await.unwrap().unwrap();
    assert_eq!(icon.url.as_str(), "https://icons.example/ripgrep.png");
    assert_eq!(icon.version(), Some("14.1.0"));

    let shots = resolver.fetch_screenshots(&pkg).await.unwrap();
    assert_eq!(
        shots,
        vec![Url::parse("https://shots.example/rg-vendor.png").unwrap()]
    );

    let versions = resolver.fetch_versions(&pkg).await.unwrap();
    assert!(versions.is_empty());

    assert_eq!(manager.calls(), 0);
}

#[tokio::test]
async fn test_full_capabilities_prefer_native_answers() {
    let mut manager = FakeManager::new(Capabilities::ALL);
    manager.versions = vec!["14.1.0".into(), "13.0.0".into()];
    manager.icon = Some("https://native.example/rg.png".into());
    manager.screenshots = vec!["https://native.example/rg-shot.png".into()];
    let db = database();
    let resolver = DetailsResolver::new(&manager, &db, &RealRuntime);
    let pkg = Package::new("ripgrep", "14.1.0", "fake");

    assert_eq!(
        resolver.fetch_versions(&pkg).await.unwrap(),
        vec!["14.1.0", "13.0.0"]
    );

    let icon = resolver.fetch_icon(&pkg).await.unwrap().unwrap();
    assert_eq!(icon.url.as_str(), "https://native.example/rg.png");

    let shots = resolver.fetch_screenshots(&pkg).await.unwrap();
    assert_eq!(
        shots,
        vec![Url::parse("https://native.example/rg-shot.png").unwrap()]
    );
}

#[tokio::test]
async fn test_fetch_details_through_dyn_manager() {
    let manager: Arc<dyn PackageManager> = Arc::new(FakeManager::new(Capabilities::NONE));
    let lookup: Arc<dyn FallbackLookup> = Arc::new(IconDatabase::new());
    let resolver = DetailsResolver::new(manager.as_ref(), lookup.as_ref(), &RealRuntime);

    let mut details = PackageDetails::new(Package::new("jq", "1.7.1", "fake"));
    resolver.fetch_details(&mut details).await.unwrap();

    assert!(details.is_populated);
    assert_eq!(details.description.as_deref(), Some("fake package"));
    assert_eq!(details.tags, vec!["cli"]);
}

#[tokio::test]
async fn test_install_location_checks_real_filesystem() {
    let dir = tempdir().unwrap();
    let db = IconDatabase::new();

    let mut manager = FakeManager::new(Capabilities::NONE);
    manager.install_dir = Some(dir.path().to_path_buf());
    let resolver = DetailsResolver::new(&manager, &db, &RealRuntime);
    let pkg = Package::new("jq", "1.7.1", "fake");
    assert_eq!(
        resolver.fetch_install_location(&pkg).await,
        Some(dir.path().to_path_buf())
    );

    let mut stale = FakeManager::new(Capabilities::NONE);
    stale.install_dir = Some(dir.path().join("uninstalled"));
    let resolver = DetailsResolver::new(&stale, &db, &RealRuntime);
    assert_eq!(resolver.fetch_install_location(&pkg).await, None);

    let broken = Package::new("broken", "0.1.0", "fake");
    assert_eq!(resolver.fetch_install_location(&broken).await, None);
}

#[tokio::test]
async fn test_concurrent_queries_share_one_resolver() {
    let manager = FakeManager::new(Capabilities::NONE);
    let db = database();
    let resolver = DetailsResolver::new(&manager, &db, &RealRuntime);

    let packages: Vec<Package> = (0..16)
        .map(|i| {
            if i % 2 == 0 {
                Package::new("ripgrep", format!("14.{}", i), "fake")
            } else {
                Package::new("unknown", "1.0", "fake")
            }
        })
        .collect();

    let icons = join_all(packages.iter().map(|p| resolver.fetch_icon(p))).await;

    for (pkg, icon) in packages.iter().zip(icons) {
        let icon = icon.unwrap();
        if pkg.id() == "ripgrep" {
            assert_eq!(icon.unwrap().version(), Some(pkg.version()));
        } else {
            assert!(icon.is_none());
        }
    }
}
