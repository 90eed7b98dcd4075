//! `rescheck download` – save a file resource locally.

use anyhow::{Context, Result};
use rescheck_core::report::file_size_found;
use rescheck_core::{catalog, CheckerConfig, CheckerFactory, Resource, ResourceChecker};
use std::path::Path;

pub fn run_download(cfg: &CheckerConfig, catalog_path: &Path, name: &str, dest: &Path) -> Result<()> {
    let resources = catalog::load(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let resource = find_resource(resources, name)?;

    let factory = CheckerFactory::live(cfg).context("initializing transports")?;
    let checker = factory.select(resource)?;
    let file = checker.as_file_checker().with_context(|| {
        format!(
            "{} is a {} resource, not a file",
            name,
            checker.resource().resource_type()
        )
    })?;

    let bytes = file
        .save_file_contents(dest)
        .with_context(|| format!("downloading {} to {}", checker.resource(), dest.display()))?;
    println!("Saved {} to {} ({})", name, dest.display(), file_size_found(Some(bytes)));
    Ok(())
}

fn find_resource(resources: Vec<Resource>, name: &str) -> Result<Resource> {
    resources
        .into_iter()
        .find(|r| r.name() == name)
        .with_context(|| format!("no resource named '{name}' in catalog"))
}
