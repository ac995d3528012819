//! Settings surface: which registry to build, which rule sources to consult, and
//! the rules themselves.
//!
//! ```toml
//! registry = "rules"
//! discover = ["bookstore"]
//!
//! rules = [
//!   ["example.com", "ISBNBookPage", "BookPage"],
//!   { patterns = { include = ["site.com/catalog/*index.html"], exclude = ["/catalog/category/"] }, use = "CatalogPage", instead_of = "BookListPage" },
//! ]
//! ```

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::{ConfigError, OverrideRule, RuleOrigin, TypeCatalog};

mod load;


/// Registry implementation used when settings do not name one.
pub const DEFAULT_REGISTRY: &str = "rules";
/// Entries kept by the `cached` registry when settings do not say otherwise.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;
/// Nested resolution depth allowed before a session gives up.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Top-level settings, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
	/// Name of the [`crate::RegistryFactory`] to instantiate.
	#[serde(default = "default_registry")]
	pub registry: String,
	/// Free-form label handed to registry initializers.
	#[serde(default)]
	pub environment: Option<String>,
	/// Rule sources to consult, in order, before `rules`.
	#[serde(default)]
	pub discover: Vec<String>,
	#[serde(default)]
	pub rules: Vec<RuleSpec>,
	#[serde(default = "default_cache_capacity")]
	pub cache_capacity: NonZeroUsize,
	#[serde(default = "default_max_depth")]
	pub max_depth: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			registry: default_registry(),
			environment: None,
			discover: Vec::new(),
			rules: Vec::new(),
			cache_capacity: default_cache_capacity(),
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

fn default_registry() -> String {
	DEFAULT_REGISTRY.to_owned()
}

fn default_cache_capacity() -> NonZeroUsize {
	NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

fn default_max_depth() -> usize {
	DEFAULT_MAX_DEPTH
}

/// One rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
	/// `[pattern, use, instead_of]`.
	Triplet(Vec<String>),
	Record(RuleRecord),
}

/// Long form of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleRecord {
	pub patterns: PatternSpec,
	#[serde(rename = "use")]
	pub uses: String,
	pub instead_of: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
	#[serde(default)]
	pub include: Vec<String>,
	#[serde(default)]
	pub exclude: Vec<String>,
	#[serde(default)]
	pub priority: Option<i32>,
}

impl RuleSpec {
	pub fn triplet(pattern: impl Into<String>, uses: impl Into<String>, instead_of: impl Into<String>) -> Self {
		Self::Triplet(vec![pattern.into(), uses.into(), instead_of.into()])
	}

	pub fn record(patterns: PatternSpec, uses: impl Into<String>, instead_of: impl Into<String>) -> Self {
		Self::Record(RuleRecord {
			patterns,
			uses: uses.into(),
			instead_of: instead_of.into(),
		})
	}

	/// Validates this entry into a rule. Type names must be known to `catalog`.
	pub fn to_rule(&self, origin: RuleOrigin, catalog: &dyn TypeCatalog) -> Result<OverrideRule, ConfigError> {
		let (include, exclude, priority, uses, instead_of) = match self {
			Self::Triplet(parts) => {
				let [pattern, uses, instead_of] = parts.as_slice() else {
					return Err(ConfigError::Triplet {
						origin,
						len: parts.len(),
					});
				};
				(std::slice::from_ref(pattern), &[][..], None, uses, instead_of)
			}
			Self::Record(record) => (
				record.patterns.include.as_slice(),
				record.patterns.exclude.as_slice(),
				record.patterns.priority,
				&record.uses,
				&record.instead_of,
			),
		};

		for (field, name) in [("use", uses), ("instead_of", instead_of)] {
			if !name.is_empty() && !catalog.contains(name) {
				return Err(ConfigError::UnknownType {
					origin,
					field,
					name: name.clone(),
				});
			}
		}

		OverrideRule::from_parts(include, exclude, priority, uses.as_str(), instead_of.as_str())
			.map_err(|source| ConfigError::Rule { origin, source })
	}
}

impl PatternSpec {
	pub fn include<S: Into<String>>(exprs: impl IntoIterator<Item = S>) -> Self {
		Self {
			include: exprs.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	pub fn exclude<S: Into<String>>(mut self, exprs: impl IntoIterator<Item = S>) -> Self {
		self.exclude = exprs.into_iter().map(Into::into).collect();
		self
	}

	pub fn priority(mut self, priority: i32) -> Self {
		self.priority = Some(priority);
		self
	}
}
