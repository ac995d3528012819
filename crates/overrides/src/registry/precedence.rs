//! Winner selection among active rules that replace the same type.
//!
//! Precedence hierarchy:
//! 1. Priority (higher wins)
//! 2. Specificity: longest literal prefix of the matched include expression
//! 3. Registration ordinal (higher/later wins)
//!
//! Ordinals are unique within a rule set, so the comparison is total and exactly
//! one rule wins.

use std::cmp::Ordering;

use subst_pattern::Specificity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
	pub priority: i32,
	pub specificity: Specificity,
	/// Position in the rule set.
	pub ordinal: u32,
}

/// Compares two candidates; `Greater` means `a` beats `b`.
pub fn cmp_candidate(a: &Candidate, b: &Candidate) -> Ordering {
	a.priority
		.cmp(&b.priority)
		.then_with(|| a.specificity.cmp(&b.specificity))
		.then_with(|| a.ordinal.cmp(&b.ordinal))
}
