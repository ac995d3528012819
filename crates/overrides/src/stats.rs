use std::sync::atomic::{AtomicU64, Ordering};

/// Lookup counters shared between a registry and whoever reports on it.
#[derive(Debug, Default)]
pub struct RegistryStats {
	lookups: AtomicU64,
	cache_hits: AtomicU64,
	cache_misses: AtomicU64,
	url_errors: AtomicU64,
}

/// Point-in-time copy of [`RegistryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
	pub lookups: u64,
	pub cache_hits: u64,
	pub cache_misses: u64,
	pub url_errors: u64,
}

impl RegistryStats {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record_lookup(&self) {
		self.lookups.fetch_add(1, Ordering::Relaxed);
	}

	pub fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub fn record_cache_miss(&self) {
		self.cache_misses.fetch_add(1, Ordering::Relaxed);
	}

	pub fn record_url_error(&self) {
		self.url_errors.fetch_add(1, Ordering::Relaxed);
	}

	pub fn snapshot(&self) -> StatsSnapshot {
		StatsSnapshot {
			lookups: self.lookups.load(Ordering::Relaxed),
			cache_hits: self.cache_hits.load(Ordering::Relaxed),
			cache_misses: self.cache_misses.load(Ordering::Relaxed),
			url_errors: self.url_errors.load(Ordering::Relaxed),
		}
	}
}
