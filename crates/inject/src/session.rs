//! One request's object graph.

use rustc_hash::FxHashMap;
use subst_overrides::TypeRef;
use tracing::trace;

use crate::{Container, Dependencies, ResolutionGuard, ResolveError, Selection};

/// Resolves types for a single URL.
///
/// Every request goes through the [`ResolutionGuard`], so each type is
/// substituted at most once. Built values are memoized by the type that was
/// actually constructed; a later request that resolves to the same type gets a
/// clone of the first value.
pub struct ResolutionSession<'c, I> {
	container: &'c Container<I>,
	guard: ResolutionGuard<'c>,
	built: FxHashMap<TypeRef, I>,
}

impl<'c, I: Clone> ResolutionSession<'c, I> {
	pub(crate) fn new(container: &'c Container<I>, url: String) -> Self {
		Self {
			container,
			guard: ResolutionGuard::new(container.registry().as_ref(), url),
			built: FxHashMap::default(),
		}
	}

	pub fn url(&self) -> &str {
		self.guard.url()
	}

	pub fn guard(&self) -> &ResolutionGuard<'c> {
		&self.guard
	}

	/// Value for `ty`, or for its replacement when an override is active.
	pub fn resolve(&mut self, ty: &TypeRef) -> Result<I, ResolveError> {
		self.resolve_nested(ty, None, 0)
	}

	/// Resolves `types` in order within this session.
	pub fn resolve_all(&mut self, types: &[TypeRef]) -> Result<Vec<I>, ResolveError> {
		types.iter().map(|ty| self.resolve(ty)).collect()
	}

	fn resolve_nested(
		&mut self,
		requested: &TypeRef,
		requested_by: Option<&TypeRef>,
		depth: usize,
	) -> Result<I, ResolveError> {
		let max = self.container.max_depth();
		if depth >= max {
			return Err(ResolveError::DepthExceeded {
				ty: requested.clone(),
				max,
			});
		}

		let target = match self.guard.select(requested) {
			Selection::Original(ty) => ty,
			Selection::Substituted { replacement, .. } => replacement,
		};
		self.construct(&target, requested_by, depth)
	}

	fn construct(&mut self, ty: &TypeRef, requested_by: Option<&TypeRef>, depth: usize) -> Result<I, ResolveError> {
		if let Some(value) = self.built.get(ty) {
			trace!(%ty, "reusing value built earlier in this session");
			return Ok(value.clone());
		}

		let container = self.container;
		let provider = container.provider(ty.as_str()).ok_or_else(|| ResolveError::MissingProvider {
			ty: ty.clone(),
			requested_by: requested_by.cloned(),
		})?;

		let mut values = Vec::with_capacity(provider.deps().len());
		for dep in provider.deps() {
			let value = self.resolve_nested(dep, Some(ty), depth + 1)?;
			values.push((dep.clone(), value));
		}

		// Already built by a nested request, e.g. a replacement requested directly
		// whose dependency is the type it replaces.
		if let Some(value) = self.built.get(ty) {
			trace!(%ty, "built while resolving its own dependencies");
			return Ok(value.clone());
		}

		let value = provider
			.build(Dependencies::new(ty.clone(), values))
			.map_err(|source| ResolveError::Build { ty: ty.clone(), source })?;
		self.built.insert(ty.clone(), value.clone());
		Ok(value)
	}
}

impl<I> std::fmt::Debug for ResolutionSession<'_, I> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolutionSession")
			.field("guard", &self.guard)
			.field("built", &self.built.keys().collect::<Vec<_>>())
			.finish()
	}
}
