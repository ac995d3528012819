use std::path::PathBuf;

use subst_pattern::PatternError;

use crate::TypeRef;

/// Where a rule specification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
	/// `rules[index]` in the settings file.
	Config { index: usize },
	/// Entry `index` of a discovered rule source.
	Source { name: &'static str, index: usize },
}

impl std::fmt::Display for RuleOrigin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Config { index } => write!(f, "rules[{index}]"),
			Self::Source { name, index } => write!(f, "source `{name}` rule {index}"),
		}
	}
}

/// Invalid override rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
	/// `use` and `instead_of` name the same type.
	#[error("rule uses `{ty}` instead of itself")]
	SelfOverride { ty: TypeRef },

	/// No include expressions, so the rule could never apply.
	#[error("`patterns.include` is empty; the rule would never apply")]
	EmptyInclude,

	#[error("`{field}` is empty")]
	EmptyType { field: &'static str },

	#[error("invalid pattern in `{field}`: {source}")]
	Pattern {
		/// `patterns.include[i]` or `patterns.exclude[i]`.
		field: String,
		#[source]
		source: PatternError,
	},
}

/// Startup-fatal configuration problem.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io { path: PathBuf, source: std::io::Error },

	#[error("failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("{origin}: triplet rules need exactly 3 elements (pattern, use, instead_of), got {len}")]
	Triplet { origin: RuleOrigin, len: usize },

	#[error("{origin}: {source}")]
	Rule { origin: RuleOrigin, source: RuleError },

	#[error("{origin}: unknown type `{name}` in `{field}`")]
	UnknownType {
		origin: RuleOrigin,
		field: &'static str,
		name: String,
	},

	#[error("unknown registry `{name}` (known: {known})")]
	UnknownRegistry { name: String, known: String },

	#[error("unknown rule source `{name}` (known: {known})")]
	UnknownSource { name: String, known: String },

	#[error("`{name}` is registered more than once")]
	Ambiguous { name: String },

	#[error("registry `{name}` failed to initialize: {message}")]
	Init { name: String, message: String },
}
