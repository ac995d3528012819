//! Default registry with atomic snapshot publication.
//!
//! # Mental model
//!
//! * Readers pin an `Arc<RuleSet>` and evaluate the URL against that immutable view.
//! * Reload builds a complete replacement [`RuleSet`] and publishes it with a single
//!   swap. There is no in-place mutation, so a reader sees either the old or the
//!   new rule set in full.
//!
//! # Concurrency & ordering
//!
//! * Readers are wait-free (`ArcSwap` load + immutable data reads).
//! * Reloads are last-writer-wins; old snapshots stay alive while pinned.

use std::sync::Arc;

use arc_swap::ArcSwap;
use subst_pattern::MatchUrl;
use tracing::{debug, warn};

use super::{FromContext, Overrides, OverridesRegistry, RegistryContext, RuleSet};
use crate::{ConfigError, OverrideRule, RegistryStats};

pub struct RuleRegistry {
	snap: ArcSwap<RuleSet>,
	stats: Option<Arc<RegistryStats>>,
}

impl RuleRegistry {
	/// Freezes `rules` (in registration order) into the initial snapshot.
	pub fn new(rules: Vec<OverrideRule>) -> Self {
		log_rules(&rules);
		Self {
			snap: ArcSwap::from_pointee(RuleSet::new(rules)),
			stats: None,
		}
	}

	pub fn with_stats(mut self, stats: Arc<RegistryStats>) -> Self {
		self.stats = Some(stats);
		self
	}

	/// Pins the current snapshot.
	pub fn snapshot(&self) -> Arc<RuleSet> {
		self.snap.load_full()
	}

	/// Atomically replaces the whole rule set. Returns the previous snapshot.
	pub fn reload(&self, rules: Vec<OverrideRule>) -> Arc<RuleSet> {
		log_rules(&rules);
		let previous = self.snap.swap(Arc::new(RuleSet::new(rules)));
		debug!(previous = previous.len(), current = self.snap.load().len(), "reloaded override rules");
		previous
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Lookup against an already parsed URL.
	pub fn overrides_for_url(&self, url: &MatchUrl) -> Overrides {
		if let Some(stats) = &self.stats {
			stats.record_lookup();
		}
		self.snap.load().overrides_for(url)
	}
}

impl OverridesRegistry for RuleRegistry {
	fn overrides_for(&self, url: &str) -> Overrides {
		match MatchUrl::parse(url) {
			Ok(url) => self.overrides_for_url(&url),
			Err(err) => {
				warn!(%err, "no overrides for unparseable url");
				if let Some(stats) = &self.stats {
					stats.record_url_error();
				}
				Overrides::default()
			}
		}
	}
}

impl FromContext for RuleRegistry {
	fn from_context(ctx: &RegistryContext) -> Result<Self, ConfigError> {
		Ok(Self::new(ctx.rules().to_vec()).with_stats(Arc::clone(ctx.stats())))
	}
}

impl std::fmt::Debug for RuleRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RuleRegistry").field("rules", &self.len()).finish()
	}
}

fn log_rules(rules: &[OverrideRule]) {
	for (index, rule) in rules.iter().enumerate() {
		debug!(index, %rule, "override rule");
	}
}
