//! Known type names, consulted when configuration is turned into rules.

use std::collections::HashSet;
use std::hash::BuildHasher;

use crate::TypeRef;

/// Answers whether a type name can be constructed by the host container.
pub trait TypeCatalog {
	fn contains(&self, name: &str) -> bool;
}

/// Accepts every type name. Useful for validating rule syntax without a container.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

impl TypeCatalog for AnyType {
	fn contains(&self, _name: &str) -> bool {
		true
	}
}

impl<T: TypeCatalog + ?Sized> TypeCatalog for &T {
	fn contains(&self, name: &str) -> bool {
		(**self).contains(name)
	}
}

impl TypeCatalog for [&str] {
	fn contains(&self, name: &str) -> bool {
		self.iter().any(|known| *known == name)
	}
}

impl<S: BuildHasher> TypeCatalog for HashSet<String, S> {
	fn contains(&self, name: &str) -> bool {
		HashSet::contains(self, name)
	}
}

impl<S: BuildHasher> TypeCatalog for HashSet<TypeRef, S> {
	fn contains(&self, name: &str) -> bool {
		HashSet::contains(self, name)
	}
}
