//! Statically registered rule sources.
//!
//! Libraries that ship page types can publish override rules with
//! [`rule_source!`](crate::rule_source) (or a hand-written
//! `inventory::submit!`). Nothing is consulted implicitly: startup only reads
//! the sources the operator lists in `Settings::discover`, in that order.

use tracing::debug;

use crate::{ConfigError, RuleSpec};

/// A named producer of rule specifications.
pub struct RuleSource {
	pub name: &'static str,
	pub rules: fn() -> Vec<RuleSpec>,
}

inventory::collect!(RuleSource);

/// Declares a rule source made of triplet rules.
///
/// ```ignore
/// subst_overrides::rule_source!("bookstore" => [
///     ("books.toscrape.com", "BTSBookPage", "BookPage"),
///     ("bookpage.com", "BPBookPage", "BookPage"),
/// ]);
/// ```
#[macro_export]
macro_rules! rule_source {
	($name:literal => [$(($pattern:expr, $uses:expr, $instead_of:expr)),* $(,)?]) => {
		$crate::inventory::submit! {
			$crate::sources::RuleSource {
				name: $name,
				rules: || vec![$($crate::RuleSpec::triplet($pattern, $uses, $instead_of)),*],
			}
		}
	};
}

/// Names of every registered source, sorted.
pub fn available() -> Vec<&'static str> {
	let mut names: Vec<_> = inventory::iter::<RuleSource>().map(|source| source.name).collect();
	names.sort_unstable();
	names
}

/// Looks up `name` in the registration table.
pub fn find(name: &str) -> Result<&'static RuleSource, ConfigError> {
	let mut found = inventory::iter::<RuleSource>().filter(|source| source.name == name);
	match (found.next(), found.next()) {
		(Some(source), None) => Ok(source),
		(Some(_), Some(_)) => Err(ConfigError::Ambiguous { name: name.to_owned() }),
		(None, _) => Err(ConfigError::UnknownSource {
			name: name.to_owned(),
			known: available().join(", "),
		}),
	}
}

/// Collects rule specs from the named sources, preserving the requested order.
pub fn discover(names: &[String]) -> Result<Vec<(&'static str, Vec<RuleSpec>)>, ConfigError> {
	names
		.iter()
		.map(|name| {
			let source = find(name)?;
			let rules = (source.rules)();
			debug!(source = source.name, rules = rules.len(), "discovered rules");
			Ok((source.name, rules))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	crate::rule_source!("sources-test-books" => [
		("books.toscrape.com", "BTSBookPage", "BookPage"),
		("bookpage.com", "BPBookPage", "BookPage"),
	]);

	crate::rule_source!("sources-test-dup" => []);
	crate::rule_source!("sources-test-dup" => []);

	#[test]
	fn discover_returns_rules_in_declaration_order() {
		let found = discover(&["sources-test-books".to_owned()]).expect("source should exist");
		assert_eq!(found.len(), 1);
		let (name, rules) = &found[0];
		assert_eq!(*name, "sources-test-books");
		assert_eq!(
			rules,
			&vec![
				RuleSpec::triplet("books.toscrape.com", "BTSBookPage", "BookPage"),
				RuleSpec::triplet("bookpage.com", "BPBookPage", "BookPage"),
			]
		);
	}

	#[test]
	fn unknown_source_lists_known_names() {
		let err = discover(&["nope".to_owned()]).unwrap_err();
		let ConfigError::UnknownSource { name, known } = err else {
			panic!("expected UnknownSource, got {err:?}");
		};
		assert_eq!(name, "nope");
		assert!(known.contains("sources-test-books"));
	}

	#[test]
	fn duplicate_source_names_are_ambiguous() {
		assert!(matches!(find("sources-test-dup"), Err(ConfigError::Ambiguous { .. })));
	}
}
