//! Providers and the dependency values handed to them.

use subst_overrides::TypeRef;

use crate::{BuildError, ResolveError};

type BuildFn<I> = dyn Fn(Dependencies<I>) -> Result<I, BuildError> + Send + Sync;

/// How to construct one type: its declared dependencies, in order, and a build closure.
pub struct Provider<I> {
	ty: TypeRef,
	deps: Box<[TypeRef]>,
	build: Box<BuildFn<I>>,
}

impl<I> Provider<I> {
	pub fn new<F>(ty: TypeRef, deps: impl IntoIterator<Item = TypeRef>, build: F) -> Self
	where
		F: Fn(Dependencies<I>) -> Result<I, BuildError> + Send + Sync + 'static,
	{
		Self {
			ty,
			deps: deps.into_iter().collect(),
			build: Box::new(build),
		}
	}

	pub fn ty(&self) -> &TypeRef {
		&self.ty
	}

	/// Declared dependencies, as requested (before any override applies).
	pub fn deps(&self) -> &[TypeRef] {
		&self.deps
	}

	pub(crate) fn build(&self, deps: Dependencies<I>) -> Result<I, BuildError> {
		(self.build)(deps)
	}
}

impl<I> std::fmt::Debug for Provider<I> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Provider").field("ty", &self.ty).field("deps", &self.deps).finish_non_exhaustive()
	}
}

/// Resolved dependency values for one build, keyed by the requested type.
///
/// A value may come from a replacement provider: asking for `BookPage` yields
/// whatever the session resolved `BookPage` to.
pub struct Dependencies<I> {
	owner: TypeRef,
	values: Vec<(TypeRef, I)>,
}

impl<I> Dependencies<I> {
	pub(crate) fn new(owner: TypeRef, values: Vec<(TypeRef, I)>) -> Self {
		Self { owner, values }
	}

	/// Type being built.
	pub fn owner(&self) -> &TypeRef {
		&self.owner
	}

	pub fn get(&self, ty: &str) -> Option<&I> {
		self.values.iter().find(|(requested, _)| requested.as_str() == ty).map(|(_, value)| value)
	}

	/// Like [`get`](Self::get), but an undeclared dependency is an error.
	pub fn require(&self, ty: &str) -> Result<&I, ResolveError> {
		self.get(ty).ok_or_else(|| ResolveError::Undeclared {
			ty: self.owner.clone(),
			dependency: TypeRef::new(ty),
		})
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Values in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &I)> {
		self.values.iter().map(|(ty, value)| (ty, value))
	}

	pub fn into_values(self) -> impl Iterator<Item = I> {
		self.values.into_iter().map(|(_, value)| value)
	}
}
