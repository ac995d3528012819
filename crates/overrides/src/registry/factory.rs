//! Name → registry implementation table.
//!
//! Built-in entries: `rules` ([`RuleRegistry`]), `cached`
//! ([`CachedRegistry`] over [`RuleRegistry`]) and `empty` ([`EmptyRegistry`]).
//! Hosts add their own with `inventory::submit!(RegistryFactory::of::<MyRegistry>("mine"))`.

use std::sync::Arc;

use tracing::debug;

use super::{CachedRegistry, EmptyRegistry, FromContext, OverridesRegistry, RegistryContext, RuleRegistry};
use crate::ConfigError;

/// Constructor for one named registry implementation.
pub struct RegistryFactory {
	pub name: &'static str,
	pub build: fn(&RegistryContext) -> Result<Arc<dyn OverridesRegistry>, ConfigError>,
}

inventory::collect!(RegistryFactory);

impl RegistryFactory {
	pub const fn new(
		name: &'static str,
		build: fn(&RegistryContext) -> Result<Arc<dyn OverridesRegistry>, ConfigError>,
	) -> Self {
		Self { name, build }
	}

	/// Factory that builds `R` through its [`FromContext`] initializer.
	pub const fn of<R>(name: &'static str) -> Self
	where
		R: OverridesRegistry + FromContext + 'static,
	{
		Self::new(name, build_from_context::<R>)
	}
}

fn build_from_context<R>(ctx: &RegistryContext) -> Result<Arc<dyn OverridesRegistry>, ConfigError>
where
	R: OverridesRegistry + FromContext + 'static,
{
	Ok(Arc::new(R::from_context(ctx)?))
}

inventory::submit!(RegistryFactory::of::<RuleRegistry>("rules"));
inventory::submit!(RegistryFactory::of::<CachedRegistry<RuleRegistry>>("cached"));
inventory::submit!(RegistryFactory::of::<EmptyRegistry>("empty"));

/// Names of every registered implementation, sorted.
pub fn factory_names() -> Vec<&'static str> {
	let mut names: Vec<_> = inventory::iter::<RegistryFactory>().map(|factory| factory.name).collect();
	names.sort_unstable();
	names
}

/// Instantiates the implementation named by `Settings::registry`.
pub fn build_registry(ctx: &RegistryContext) -> Result<Arc<dyn OverridesRegistry>, ConfigError> {
	let name = ctx.settings().registry.as_str();
	let mut found = inventory::iter::<RegistryFactory>().filter(|factory| factory.name == name);
	let factory = match (found.next(), found.next()) {
		(Some(factory), None) => factory,
		(Some(_), Some(_)) => return Err(ConfigError::Ambiguous { name: name.to_owned() }),
		(None, _) => {
			return Err(ConfigError::UnknownRegistry {
				name: name.to_owned(),
				known: factory_names().join(", "),
			});
		}
	};

	debug!(registry = name, environment = ctx.environment(), rules = ctx.rules().len(), "building overrides registry");
	(factory.build)(ctx)
}
