//! Immutable rule snapshot.
//!
//! # Role
//!
//! Pure view type: built once from an ordered rule list, never mutated. Rules are
//! grouped by the type they replace so a lookup evaluates each group and keeps
//! one winner per original type.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use subst_pattern::MatchUrl;

use super::Overrides;
use super::precedence::{Candidate, cmp_candidate};
use crate::{OverrideRule, TypeRef};

/// Frozen, ordered rule set.
#[derive(Debug, Clone)]
pub struct RuleSet {
	rules: Arc<[OverrideRule]>,
	/// Original types in first-registration order, each with the ordinals of the
	/// rules replacing it.
	targets: Arc<[(TypeRef, Vec<u32>)]>,
}

impl RuleSet {
	pub fn new(rules: Vec<OverrideRule>) -> Self {
		let mut targets: Vec<(TypeRef, Vec<u32>)> = Vec::new();
		let mut slot: FxHashMap<TypeRef, usize> = FxHashMap::default();

		for (ordinal, rule) in rules.iter().enumerate() {
			let idx = *slot.entry(rule.instead_of().clone()).or_insert_with(|| {
				targets.push((rule.instead_of().clone(), Vec::new()));
				targets.len() - 1
			});
			targets[idx].1.push(ordinal as u32);
		}

		Self {
			rules: Arc::from(rules),
			targets: Arc::from(targets),
		}
	}

	pub fn empty() -> Self {
		Self::new(Vec::new())
	}

	/// Rules in registration order.
	pub fn rules(&self) -> &[OverrideRule] {
		&self.rules
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Original types that at least one rule replaces, in first-registration order.
	pub fn targets(&self) -> impl Iterator<Item = &TypeRef> {
		self.targets.iter().map(|(target, _)| target)
	}

	/// Active overrides for `url`, one winner per original type.
	pub fn overrides_for(&self, url: &MatchUrl) -> Overrides {
		let mut out = Overrides::default();
		for (target, ordinals) in self.targets.iter() {
			if let Some(rule) = self.pick(ordinals, url) {
				out.insert(target.clone(), rule.uses().clone());
			}
		}
		out
	}

	/// The rule that replaces `instead_of` for `url`, if any is active.
	pub fn winner_for(&self, instead_of: &str, url: &MatchUrl) -> Option<&OverrideRule> {
		let (_, ordinals) = self.targets.iter().find(|(target, _)| target.as_str() == instead_of)?;
		self.pick(ordinals, url)
	}

	fn pick(&self, ordinals: &[u32], url: &MatchUrl) -> Option<&OverrideRule> {
		let winner = ordinals
			.iter()
			.filter_map(|&ordinal| {
				let patterns = self.rules[ordinal as usize].patterns();
				patterns.specificity_for(url).map(|specificity| Candidate {
					priority: patterns.priority(),
					specificity,
					ordinal,
				})
			})
			.max_by(cmp_candidate)?;
		Some(&self.rules[winner.ordinal as usize])
	}
}

impl Default for RuleSet {
	fn default() -> Self {
		Self::empty()
	}
}
