use std::borrow::Borrow;
use std::sync::Arc;

/// Name of an injectable type.
///
/// Cheap to clone; hashes and compares like the underlying `str`, so maps keyed
/// by `TypeRef` can be queried with plain `&str`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(Arc<str>);

impl TypeRef {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for TypeRef {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for TypeRef {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for TypeRef {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for TypeRef {
	fn from(name: String) -> Self {
		Self::new(name)
	}
}

impl From<&TypeRef> for TypeRef {
	fn from(ty: &TypeRef) -> Self {
		ty.clone()
	}
}

impl std::fmt::Debug for TypeRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "TypeRef({})", self.0)
	}
}

impl std::fmt::Display for TypeRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}
