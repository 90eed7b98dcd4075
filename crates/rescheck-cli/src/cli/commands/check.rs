//! `rescheck check` – check every resource of a catalog.

use anyhow::{Context, Result};
use rayon::prelude::*;
use rescheck_core::report::resource_with_report;
use rescheck_core::{catalog, CheckerConfig, CheckerFactory, Resource, ResourceChecker};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub jobs: usize,
    pub output: Option<PathBuf>,
    pub strict: bool,
}

/// Result of checking one catalog entry.
struct Outcome {
    name: String,
    kind: &'static str,
    verdict: Verdict,
}

enum Verdict {
    Checked {
        exists: bool,
        passed: bool,
        entry: Value,
    },
    /// No checker exists for the entry.
    Unchecked(String),
}

impl Outcome {
    fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Checked { passed: true, .. })
    }

    fn entry(&self) -> Option<&Value> {
        match &self.verdict {
            Verdict::Checked { entry, .. } => Some(entry),
            Verdict::Unchecked(_) => None,
        }
    }
}

pub fn run_check(cfg: &CheckerConfig, catalog_path: &Path, opts: &CheckOptions) -> Result<()> {
    let resources = catalog::load(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let factory = CheckerFactory::live(cfg).context("initializing transports")?;

    let outcomes = check_all(&factory, resources, opts.jobs)?;
    eprint!("{}", render_summary(&outcomes));

    let json = serde_json::to_string_pretty(&entries(&outcomes))?;
    match &opts.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing reports to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote reports");
        }
        None => println!("{json}"),
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if opts.strict && failed > 0 {
        anyhow::bail!("{failed} of {} resources did not pass their checks", outcomes.len());
    }
    Ok(())
}

/// Checks `resources` on a pool of `jobs` threads, keeping catalog order.
fn check_all(factory: &CheckerFactory, resources: Vec<Resource>, jobs: usize) -> Result<Vec<Outcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("building worker pool")?;
    Ok(pool.install(|| {
        resources
            .into_par_iter()
            .map(|resource| check_one(factory, resource))
            .collect()
    }))
}

fn check_one(factory: &CheckerFactory, resource: Resource) -> Outcome {
    let name = resource.name().to_string();
    match factory.select(resource) {
        Ok(checker) => {
            let report = checker.build_report();
            tracing::info!(
                resource = %name,
                exists = report.resource_exists,
                passed = report.passed_checks,
                "checked resource"
            );
            Outcome {
                name,
                kind: checker.kind(),
                verdict: Verdict::Checked {
                    exists: report.resource_exists,
                    passed: report.passed_checks,
                    entry: resource_with_report(checker.resource(), &report),
                },
            }
        }
        Err(e) => {
            tracing::error!(resource = %name, "cannot check resource: {e}");
            Outcome {
                name,
                kind: "-",
                verdict: Verdict::Unchecked(e.to_string()),
            }
        }
    }
}

fn entries(outcomes: &[Outcome]) -> Vec<&Value> {
    outcomes.iter().filter_map(Outcome::entry).collect()
}

fn render_summary(outcomes: &[Outcome]) -> String {
    let mut out = format!("{:<32} {:<14} {:<7} {}\n", "RESOURCE", "KIND", "EXISTS", "RESULT");
    for o in outcomes {
        let (exists, result) = match &o.verdict {
            Verdict::Checked { exists, passed, .. } => (
                if *exists { "yes" } else { "no" }.to_string(),
                if *passed { "pass" } else { "FAIL" }.to_string(),
            ),
            Verdict::Unchecked(reason) => ("-".to_string(), format!("error: {reason}")),
        };
        out.push_str(&format!("{:<32} {:<14} {:<7} {}\n", o.name, o.kind, exists, result));
    }

    let passed = outcomes.iter().filter(|o| o.passed()).count();
    let unchecked = outcomes.len() - entries(outcomes).len();
    out.push_str(&format!(
        "{} resources: {} passed, {} failed, {} not checked\n",
        outcomes.len(),
        passed,
        outcomes.len() - passed - unchecked,
        unchecked
    ));
    out
}
