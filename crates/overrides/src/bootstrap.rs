//! Startup assembly: sources + settings → validated rules → selected registry.

use std::sync::Arc;

use tracing::{debug, info};

use crate::registry::build_registry;
use crate::{ConfigError, OverrideRule, OverridesRegistry, RegistryContext, RegistryStats, RuleOrigin, Settings, TypeCatalog, sources};

/// Result of a successful startup.
pub struct Bootstrap {
	pub registry: Arc<dyn OverridesRegistry>,
	pub stats: Arc<RegistryStats>,
	pub settings: Arc<Settings>,
	/// Number of validated rules handed to the registry.
	pub rule_count: usize,
}

/// Converts discovered and configured rule specs into rules.
///
/// Discovered sources come first, in `settings.discover` order, followed by
/// `settings.rules`. Later rules win precedence ties, so configuration
/// overrides what libraries ship.
pub fn assemble_rules(settings: &Settings, catalog: &dyn TypeCatalog) -> Result<Vec<OverrideRule>, ConfigError> {
	let mut rules = Vec::new();

	for (name, specs) in sources::discover(&settings.discover)? {
		for (index, spec) in specs.iter().enumerate() {
			rules.push(spec.to_rule(RuleOrigin::Source { name, index }, catalog)?);
		}
	}
	let discovered = rules.len();

	for (index, spec) in settings.rules.iter().enumerate() {
		rules.push(spec.to_rule(RuleOrigin::Config { index }, catalog)?);
	}

	debug!(discovered, configured = rules.len() - discovered, "assembled override rules");
	Ok(rules)
}

/// Validates `settings` and builds the configured registry.
pub fn bootstrap(settings: Settings, catalog: &dyn TypeCatalog) -> Result<Bootstrap, ConfigError> {
	let rules = assemble_rules(&settings, catalog)?;
	let rule_count = rules.len();
	let settings = Arc::new(settings);
	let stats = Arc::new(RegistryStats::new());

	let ctx = RegistryContext::new(Arc::clone(&settings), rules).with_stats(Arc::clone(&stats));
	let registry = build_registry(&ctx)?;

	info!(registry = %settings.registry, rules = rule_count, "overrides registry ready");
	Ok(Bootstrap {
		registry,
		stats,
		settings,
		rule_count,
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{AnyType, Overrides, RuleError, RuleSpec, TypeRef};

	crate::rule_source!("bootstrap-test-books" => [
		("example.com", "SourceBookPage", "BookPage"),
		("example.com", "SourceListPage", "BookListPage"),
	]);

	crate::rule_source!("bootstrap-test-broken" => [
		("example.com", "ListPage", "BookListPage"),
		("example.com", "BookPage", "BookPage"),
	]);

	fn settings(discover: &[&str], rules: Vec<RuleSpec>) -> Settings {
		Settings {
			discover: discover.iter().map(|name| (*name).to_owned()).collect(),
			rules,
			..Settings::default()
		}
	}

	#[test]
	fn discovered_rules_precede_configured_rules() {
		let settings = settings(
			&["bootstrap-test-books"],
			vec![RuleSpec::triplet("example.com", "ConfigBookPage", "BookPage")],
		);
		let rules = assemble_rules(&settings, &AnyType).expect("rules should assemble");
		let uses: Vec<_> = rules.iter().map(|rule| rule.uses().as_str()).collect();
		assert_eq!(uses, vec!["SourceBookPage", "SourceListPage", "ConfigBookPage"]);
	}

	#[test]
	fn configured_rule_wins_tie_with_discovered_rule() {
		let settings = settings(
			&["bootstrap-test-books"],
			vec![RuleSpec::triplet("example.com", "ConfigBookPage", "BookPage")],
		);
		let started = bootstrap(settings, &AnyType).expect("bootstrap should succeed");
		assert_eq!(started.rule_count, 3);

		let expected: Overrides = [("BookPage", "ConfigBookPage"), ("BookListPage", "SourceListPage")]
			.into_iter()
			.map(|(from, to)| (TypeRef::from(from), TypeRef::from(to)))
			.collect();
		assert_eq!(started.registry.overrides_for("http://example.com/"), expected);
	}

	#[test]
	fn bad_source_rule_names_its_source() {
		let err = bootstrap(settings(&["bootstrap-test-broken"], Vec::new()), &AnyType)
			.err()
			.expect("self override should be rejected");
		let ConfigError::Rule { origin, source } = &err else {
			panic!("expected Rule, got {err:?}");
		};
		assert_eq!(
			*origin,
			RuleOrigin::Source {
				name: "bootstrap-test-broken",
				index: 1,
			}
		);
		assert_eq!(*source, RuleError::SelfOverride { ty: "BookPage".into() });
	}

	#[test]
	fn unknown_source_fails_bootstrap() {
		let err = bootstrap(settings(&["bootstrap-test-missing"], Vec::new()), &AnyType)
			.err()
			.expect("unknown source should be rejected");
		assert!(
			matches!(&err, ConfigError::UnknownSource { name, .. } if name == "bootstrap-test-missing"),
			"got {err:?}"
		);
	}
}
