//! Per-URL memoization in front of another registry.
//!
//! Entries are tagged with the cache generation they were computed under.
//! Reload bumps the generation under the cache lock after the inner swap, so a
//! lookup that raced with a reload never stores a mapping from the old rules.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::{FromContext, Overrides, OverridesRegistry, RegistryContext, RuleRegistry};
use crate::{ConfigError, OverrideRule, RegistryStats, RuleSet};

pub struct CachedRegistry<R> {
	inner: R,
	cache: Mutex<CacheState>,
	stats: Arc<RegistryStats>,
}

struct CacheState {
	entries: LruCache<String, Overrides>,
	generation: u64,
}

impl<R: OverridesRegistry> CachedRegistry<R> {
	pub fn new(inner: R, capacity: NonZeroUsize) -> Self {
		Self {
			inner,
			cache: Mutex::new(CacheState {
				entries: LruCache::new(capacity),
				generation: 0,
			}),
			stats: Arc::new(RegistryStats::new()),
		}
	}

	pub fn with_stats(mut self, stats: Arc<RegistryStats>) -> Self {
		self.stats = stats;
		self
	}

	pub fn inner(&self) -> &R {
		&self.inner
	}

	pub fn stats(&self) -> &Arc<RegistryStats> {
		&self.stats
	}

	/// Number of cached URLs.
	pub fn cached_len(&self) -> usize {
		self.cache.lock().entries.len()
	}

	/// Drops every cached entry and invalidates in-flight lookups.
	pub fn clear(&self) {
		let mut state = self.cache.lock();
		state.entries.clear();
		state.generation += 1;
	}
}

impl CachedRegistry<RuleRegistry> {
	/// Reloads the inner rule set, then invalidates the cache.
	pub fn reload(&self, rules: Vec<OverrideRule>) -> Arc<RuleSet> {
		let previous = self.inner.reload(rules);
		self.clear();
		previous
	}
}

impl<R: OverridesRegistry> OverridesRegistry for CachedRegistry<R> {
	fn overrides_for(&self, url: &str) -> Overrides {
		let generation = {
			let mut state = self.cache.lock();
			if let Some(hit) = state.entries.get(url) {
				self.stats.record_cache_hit();
				return hit.clone();
			}
			state.generation
		};

		self.stats.record_cache_miss();
		let overrides = self.inner.overrides_for(url);

		let mut state = self.cache.lock();
		if state.generation == generation {
			state.entries.put(url.to_owned(), overrides.clone());
		}
		overrides
	}
}

impl<R: OverridesRegistry + FromContext> FromContext for CachedRegistry<R> {
	fn from_context(ctx: &RegistryContext) -> Result<Self, ConfigError> {
		let inner = R::from_context(ctx)?;
		Ok(Self::new(inner, ctx.settings().cache_capacity).with_stats(Arc::clone(ctx.stats())))
	}
}
