use subst_overrides::TypeRef;

/// Failure reported by a provider's build closure.
pub type BuildError = Box<dyn std::error::Error + Send + Sync>;

/// Resolution failure for one requested type.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
	/// No provider registered for a type the graph needs.
	#[error("no provider for `{ty}`{}", requested_by.as_ref().map(|by| format!(" (required by `{by}`)")).unwrap_or_default())]
	MissingProvider { ty: TypeRef, requested_by: Option<TypeRef> },

	/// The dependency chain nested deeper than the container allows.
	#[error("resolving `{ty}` exceeded the maximum depth of {max}")]
	DepthExceeded { ty: TypeRef, max: usize },

	#[error("failed to build `{ty}`: {source}")]
	Build {
		ty: TypeRef,
		#[source]
		source: BuildError,
	},

	/// A build closure asked for a dependency it did not declare.
	#[error("`{ty}` did not declare a dependency on `{dependency}`")]
	Undeclared { ty: TypeRef, dependency: TypeRef },
}
