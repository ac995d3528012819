//! Per-session override selection.
//!
//! # Purpose
//!
//! Decide, for each type a session requests, whether to build the type itself or
//! the replacement the registry names for the session URL. A type is substituted
//! at most once per session, so a replacement that depends on the type it
//! replaces receives the original instead of looping back into itself.
//!
//! # Protocol
//!
//! | Requested `T` | Outcome | Side effect |
//! |---|---|---|
//! | `T` already in `excluded` | [`Selection::Original`] | none, registry not consulted |
//! | overrides map `T → R` | [`Selection::Substituted`] | `T` added to `excluded` |
//! | no mapping for `T` | [`Selection::Original`] | none |
//!
//! The override map is fetched from the registry on the first non-excluded
//! request and reused for the rest of the session.

use rustc_hash::FxHashSet;
use subst_overrides::{Overrides, OverridesRegistry, TypeRef};
use tracing::{debug, trace};

/// Which provider to run for a requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	Original(TypeRef),
	Substituted { original: TypeRef, replacement: TypeRef },
}

impl Selection {
	/// Type whose provider should run.
	pub fn target(&self) -> &TypeRef {
		match self {
			Self::Original(ty) => ty,
			Self::Substituted { replacement, .. } => replacement,
		}
	}
}

/// Excluded set plus the lazily fetched override map of one session.
pub struct ResolutionGuard<'r> {
	registry: &'r dyn OverridesRegistry,
	url: String,
	overrides: Option<Overrides>,
	excluded: FxHashSet<TypeRef>,
}

impl<'r> ResolutionGuard<'r> {
	pub fn new(registry: &'r dyn OverridesRegistry, url: impl Into<String>) -> Self {
		Self {
			registry,
			url: url.into(),
			overrides: None,
			excluded: FxHashSet::default(),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Override map for the session URL, fetched on first use.
	pub fn overrides(&mut self) -> &Overrides {
		let (registry, url) = (self.registry, self.url.as_str());
		self.overrides.get_or_insert_with(|| registry.overrides_for(url))
	}

	/// Types already substituted in this session.
	pub fn is_excluded(&self, ty: &str) -> bool {
		self.excluded.contains(ty)
	}

	pub fn excluded(&self) -> impl Iterator<Item = &TypeRef> {
		self.excluded.iter()
	}

	pub fn select(&mut self, requested: &TypeRef) -> Selection {
		if self.excluded.contains(requested) {
			trace!(ty = %requested, "already substituted in this session; using original");
			return Selection::Original(requested.clone());
		}

		let Some(replacement) = self.overrides().get(requested).cloned() else {
			return Selection::Original(requested.clone());
		};

		debug!(original = %requested, %replacement, url = %self.url, "type overridden");
		self.excluded.insert(requested.clone());
		Selection::Substituted {
			original: requested.clone(),
			replacement,
		}
	}
}

impl std::fmt::Debug for ResolutionGuard<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolutionGuard")
			.field("url", &self.url)
			.field("overrides", &self.overrides)
			.field("excluded", &self.excluded)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
