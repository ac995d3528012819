//! Subcommand bodies. Each returns the text to print.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context as _;
use subst_overrides::{AnyType, Bootstrap, Overrides, Settings, TypeCatalog, bootstrap};
use tracing::debug;

pub fn check(config: &Path, types: Option<&[String]>) -> anyhow::Result<String> {
	let settings = load(config)?;
	let started = match types {
		Some(types) => {
			let known: HashSet<String> = types.iter().cloned().collect();
			start(settings, &known)?
		}
		None => start(settings, &AnyType)?,
	};

	Ok(format!(
		"{}: {} rule(s) ok (registry `{}`, environment `{}`)\n",
		config.display(),
		started.rule_count,
		started.settings.registry,
		started.settings.environment(),
	))
}

pub fn lookup(config: &Path, urls: &[String]) -> anyhow::Result<String> {
	let started = start(load(config)?, &AnyType)?;

	let mut out = String::new();
	for url in urls {
		out.push_str(&render(url, &started.registry.overrides_for(url)));
	}
	debug!(stats = ?started.stats.snapshot(), "lookups done");
	Ok(out)
}

/// One block per URL, entries sorted by original type.
pub fn render(url: &str, overrides: &Overrides) -> String {
	let mut out = format!("{url}\n");
	if overrides.is_empty() {
		out.push_str("  (no overrides)\n");
		return out;
	}

	let mut entries: Vec<_> = overrides.iter().collect();
	entries.sort_unstable();
	for (original, replacement) in entries {
		let _ = writeln!(out, "  {original} -> {replacement}");
	}
	out
}

fn load(config: &Path) -> anyhow::Result<Settings> {
	Settings::load(config).with_context(|| format!("loading {}", config.display()))
}

fn start(settings: Settings, catalog: &dyn TypeCatalog) -> anyhow::Result<Bootstrap> {
	Ok(bootstrap(settings, catalog)?)
}
