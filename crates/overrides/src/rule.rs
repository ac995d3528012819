use subst_pattern::{Expression, Patterns};

use crate::{RuleError, TypeRef};

/// Immutable binding of a pattern set to a (replacement, original) type pair.
///
/// Construction is the only validation point: once built, a rule always has at
/// least one include expression and distinct types.
#[derive(Debug, Clone)]
pub struct OverrideRule {
	patterns: Patterns,
	uses: TypeRef,
	instead_of: TypeRef,
}

impl OverrideRule {
	/// For URLs matching `patterns`, supply `uses` wherever `instead_of` is required.
	pub fn new(patterns: Patterns, uses: impl Into<TypeRef>, instead_of: impl Into<TypeRef>) -> Result<Self, RuleError> {
		let uses = uses.into();
		let instead_of = instead_of.into();

		if uses.as_str().is_empty() {
			return Err(RuleError::EmptyType { field: "use" });
		}
		if instead_of.as_str().is_empty() {
			return Err(RuleError::EmptyType { field: "instead_of" });
		}
		if uses == instead_of {
			return Err(RuleError::SelfOverride { ty: uses });
		}
		if patterns.include().is_empty() {
			return Err(RuleError::EmptyInclude);
		}

		Ok(Self {
			patterns,
			uses,
			instead_of,
		})
	}

	/// Triplet form: a single include expression, nothing excluded.
	pub fn for_domain(expr: &str, uses: impl Into<TypeRef>, instead_of: impl Into<TypeRef>) -> Result<Self, RuleError> {
		Self::from_parts(&[expr], &[] as &[&str], None, uses, instead_of)
	}

	/// Compiles raw expressions, reporting the index of the first bad one.
	pub fn from_parts<S: AsRef<str>>(
		include: &[S],
		exclude: &[S],
		priority: Option<i32>,
		uses: impl Into<TypeRef>,
		instead_of: impl Into<TypeRef>,
	) -> Result<Self, RuleError> {
		let include = compile_all("patterns.include", include)?;
		let exclude = compile_all("patterns.exclude", exclude)?;
		let mut patterns = Patterns::from_expressions(include, exclude);
		if let Some(priority) = priority {
			patterns = patterns.with_priority(priority);
		}
		Self::new(patterns, uses, instead_of)
	}

	pub fn patterns(&self) -> &Patterns {
		&self.patterns
	}

	/// Replacement type.
	pub fn uses(&self) -> &TypeRef {
		&self.uses
	}

	/// Original type.
	pub fn instead_of(&self) -> &TypeRef {
		&self.instead_of
	}
}

impl std::fmt::Display for OverrideRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "use {} instead of {} for {}", self.uses, self.instead_of, self.patterns)
	}
}

fn compile_all<S: AsRef<str>>(field: &str, exprs: &[S]) -> Result<Vec<Expression>, RuleError> {
	exprs
		.iter()
		.enumerate()
		.map(|(idx, expr)| {
			Expression::parse(expr.as_ref()).map_err(|source| RuleError::Pattern {
				field: format!("{field}[{idx}]"),
				source,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use subst_pattern::PatternError;

	use super::*;

	#[test]
	fn self_override_is_rejected() {
		let err = OverrideRule::for_domain("example.com", "BookPage", "BookPage").unwrap_err();
		assert_eq!(err, RuleError::SelfOverride { ty: "BookPage".into() });
	}

	#[test]
	fn empty_include_is_rejected() {
		let err = OverrideRule::from_parts::<&str>(&[], &["/x"], None, "A", "B").unwrap_err();
		assert_eq!(err, RuleError::EmptyInclude);
	}

	#[test]
	fn empty_type_names_are_rejected() {
		let err = OverrideRule::for_domain("example.com", "", "B").unwrap_err();
		assert_eq!(err, RuleError::EmptyType { field: "use" });
		let err = OverrideRule::for_domain("example.com", "A", "").unwrap_err();
		assert_eq!(err, RuleError::EmptyType { field: "instead_of" });
	}

	#[test]
	fn bad_expression_reports_its_index() {
		let err = OverrideRule::from_parts(&["example.com"], &["/ok", "/a|"], None, "A", "B").unwrap_err();
		assert_eq!(
			err,
			RuleError::Pattern {
				field: "patterns.exclude[1]".into(),
				source: PatternError::EmptyBranch { expr: "/a|".into() },
			}
		);
	}

	#[test]
	fn priority_is_carried() {
		let rule = OverrideRule::from_parts(&["example.com"], &[], Some(900), "A", "B").expect("rule should build");
		assert_eq!(rule.patterns().priority(), 900);
		assert_eq!(rule.uses().as_str(), "A");
		assert_eq!(rule.instead_of().as_str(), "B");
	}
}
