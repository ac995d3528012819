//! URL-scoped type overrides.
//!
//! A rule says "for URLs matching these patterns, use type `R` instead of `T`".
//! Rules are validated once at startup, frozen into a [`RuleSet`] snapshot and
//! queried per request through the [`OverridesRegistry`] capability.
//!
//! # Startup
//!
//! 1. Load [`Settings`] (TOML).
//! 2. [`bootstrap`] consults the named rule [`sources`], converts every
//!    [`RuleSpec`] into an [`OverrideRule`] (checking type names against a
//!    [`TypeCatalog`]), then builds the registry implementation selected by
//!    `Settings::registry`.
//! 3. Hand the resulting `Arc<dyn OverridesRegistry>` to the injection container.
//!
//! Any configuration problem aborts step 2 with a [`ConfigError`] naming the rule
//! and field at fault.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod rule;
pub mod sources;
pub mod stats;
pub mod type_ref;

#[doc(hidden)]
pub use inventory;

pub use bootstrap::{Bootstrap, assemble_rules, bootstrap};
pub use catalog::{AnyType, TypeCatalog};
pub use config::{PatternSpec, RuleRecord, RuleSpec, Settings};
pub use error::{ConfigError, RuleError, RuleOrigin};
pub use registry::{
	CachedRegistry, EmptyRegistry, FromContext, Overrides, OverridesRegistry, RegistryContext, RegistryFactory,
	RuleRegistry, RuleSet,
};
pub use rule::OverrideRule;
pub use stats::{RegistryStats, StatsSnapshot};
pub use subst_pattern::{MatchUrl, Patterns};
pub use type_ref::TypeRef;
