//! Overrides registries.
//!
//! # Purpose
//!
//! Answer "which type substitutions apply to this URL" as an original → replacement
//! map. The capability is the [`OverridesRegistry`] trait; concrete implementations
//! are picked by name at startup through [`RegistryFactory`].
//!
//! # Key types
//!
//! | Type | Meaning | Constraints |
//! |---|---|---|
//! | [`OverridesRegistry`] | Per-request lookup capability | Pure, non-blocking, `Send + Sync` |
//! | [`FromContext`] | Startup initializer for context-aware registries | Runs once, may block |
//! | [`RuleRegistry`] | Default snapshot-backed implementation | Reload swaps the whole [`RuleSet`] |
//! | [`CachedRegistry`] | Per-URL LRU in front of another registry | Cache cleared on reload |
//! | [`EmptyRegistry`] | Never overrides | |
//!
//! # Invariants
//!
//! * At most one entry per original type; the winner is chosen by [`precedence`].
//! * Readers never observe a partially reloaded rule set.
//! * Unparseable URLs yield an empty map, never an error.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{ConfigError, OverrideRule, RegistryStats, Settings, TypeRef};

mod cached;
mod factory;
pub mod precedence;
mod rules;
mod snapshot;

pub use cached::CachedRegistry;
pub use factory::{RegistryFactory, build_registry, factory_names};
pub use rules::RuleRegistry;
pub use snapshot::RuleSet;


/// Original type → replacement type.
pub type Overrides = FxHashMap<TypeRef, TypeRef>;

/// Capability consumed by the injection container.
pub trait OverridesRegistry: Send + Sync {
	/// Overrides active for `url`. Must be deterministic for a fixed rule set.
	fn overrides_for(&self, url: &str) -> Overrides;
}

impl<R: OverridesRegistry + ?Sized> OverridesRegistry for Arc<R> {
	fn overrides_for(&self, url: &str) -> Overrides {
		(**self).overrides_for(url)
	}
}

impl<R: OverridesRegistry + ?Sized> OverridesRegistry for Box<R> {
	fn overrides_for(&self, url: &str) -> Overrides {
		(**self).overrides_for(url)
	}
}

/// Ambient state handed to registry initializers.
pub struct RegistryContext {
	settings: Arc<Settings>,
	rules: Vec<OverrideRule>,
	stats: Arc<RegistryStats>,
}

impl RegistryContext {
	pub fn new(settings: Arc<Settings>, rules: Vec<OverrideRule>) -> Self {
		Self {
			settings,
			rules,
			stats: Arc::new(RegistryStats::new()),
		}
	}

	pub fn with_stats(mut self, stats: Arc<RegistryStats>) -> Self {
		self.stats = stats;
		self
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Validated rules in registration order.
	pub fn rules(&self) -> &[OverrideRule] {
		&self.rules
	}

	pub fn stats(&self) -> &Arc<RegistryStats> {
		&self.stats
	}

	pub fn environment(&self) -> &str {
		self.settings.environment()
	}
}

/// Registries that need ambient context to start.
pub trait FromContext: Sized {
	fn from_context(ctx: &RegistryContext) -> Result<Self, ConfigError>;
}

/// Registry that never overrides anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl OverridesRegistry for EmptyRegistry {
	fn overrides_for(&self, _url: &str) -> Overrides {
		Overrides::default()
	}
}

impl FromContext for EmptyRegistry {
	fn from_context(_ctx: &RegistryContext) -> Result<Self, ConfigError> {
		Ok(Self)
	}
}
