//! Provider table and session factory.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use subst_overrides::config::DEFAULT_MAX_DEPTH;
use subst_overrides::{Bootstrap, OverridesRegistry, TypeCatalog, TypeRef};
use tracing::{debug, warn};

use crate::{BuildError, Dependencies, Provider, ResolutionSession};

/// Collects providers before the registry exists.
///
/// Implements [`TypeCatalog`], so rule configuration can be validated against
/// the registered type names before the container is built.
pub struct ContainerBuilder<I> {
	providers: FxHashMap<TypeRef, Provider<I>>,
	max_depth: usize,
}

impl<I> ContainerBuilder<I> {
	pub fn new() -> Self {
		Self {
			providers: FxHashMap::default(),
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Registers how to build `ty`. A later registration for the same type replaces the earlier one.
	pub fn provide<F>(&mut self, ty: impl Into<TypeRef>, deps: &[&str], build: F) -> &mut Self
	where
		F: Fn(Dependencies<I>) -> Result<I, BuildError> + Send + Sync + 'static,
	{
		let ty = ty.into();
		let provider = Provider::new(ty.clone(), deps.iter().copied().map(TypeRef::from), build);
		if self.providers.insert(ty.clone(), provider).is_some() {
			warn!(%ty, "provider replaced");
		}
		self
	}

	/// Nesting allowed before a resolution fails with `DepthExceeded`.
	pub fn max_depth(&mut self, max_depth: usize) -> &mut Self {
		self.max_depth = max_depth;
		self
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}

	/// Builds around a started registry; the depth limit comes from `Settings::max_depth`.
	pub fn build_from(mut self, started: &Bootstrap) -> Container<I> {
		self.max_depth = started.settings.max_depth;
		self.build(Arc::clone(&started.registry))
	}

	pub fn build(self, registry: Arc<dyn OverridesRegistry>) -> Container<I> {
		debug!(providers = self.providers.len(), max_depth = self.max_depth, "container ready");
		Container {
			providers: self.providers,
			registry,
			max_depth: self.max_depth,
		}
	}
}

impl<I> Default for ContainerBuilder<I> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I> TypeCatalog for ContainerBuilder<I> {
	fn contains(&self, name: &str) -> bool {
		self.providers.contains_key(name)
	}
}

/// Immutable provider table plus the registry sessions consult.
///
/// Shared freely across threads; each request gets its own [`ResolutionSession`].
pub struct Container<I> {
	providers: FxHashMap<TypeRef, Provider<I>>,
	registry: Arc<dyn OverridesRegistry>,
	max_depth: usize,
}

impl<I: Clone> Container<I> {
	/// Starts resolving the object graph for one request.
	pub fn session(&self, url: impl Into<String>) -> ResolutionSession<'_, I> {
		ResolutionSession::new(self, url.into())
	}
}

impl<I> Container<I> {
	pub fn registry(&self) -> &Arc<dyn OverridesRegistry> {
		&self.registry
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	pub fn provider(&self, ty: &str) -> Option<&Provider<I>> {
		self.providers.get(ty)
	}
}

impl<I> TypeCatalog for Container<I> {
	fn contains(&self, name: &str) -> bool {
		self.providers.contains_key(name)
	}
}

impl<I> std::fmt::Debug for Container<I> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Container")
			.field("providers", &self.providers.len())
			.field("max_depth", &self.max_depth)
			.finish_non_exhaustive()
	}
}
