use tracing::warn;

use crate::{Expression, MatchUrl, PatternError, Specificity};

/// Priority assigned to pattern sets that do not set one.
pub const DEFAULT_PRIORITY: i32 = 500;

/// Include/exclude expression sets plus a precedence priority.
///
/// A URL matches when at least one include expression matches and no exclude
/// expression does. An empty include set matches nothing.
#[derive(Debug, Clone)]
pub struct Patterns {
	include: Vec<Expression>,
	exclude: Vec<Expression>,
	priority: i32,
}

impl Patterns {
	/// Compiles `include` and `exclude` with [`DEFAULT_PRIORITY`].
	pub fn new<I, E>(include: I, exclude: E) -> Result<Self, PatternError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
		E: IntoIterator,
		E::Item: AsRef<str>,
	{
		let include = include
			.into_iter()
			.map(|expr| Expression::parse(expr.as_ref()))
			.collect::<Result<_, _>>()?;
		let exclude = exclude
			.into_iter()
			.map(|expr| Expression::parse(expr.as_ref()))
			.collect::<Result<_, _>>()?;
		Ok(Self::from_expressions(include, exclude))
	}

	/// Single include expression, nothing excluded.
	pub fn domain(expr: &str) -> Result<Self, PatternError> {
		Ok(Self::from_expressions(vec![Expression::parse(expr)?], Vec::new()))
	}

	/// Builds a pattern set from already compiled expressions.
	pub fn from_expressions(include: Vec<Expression>, exclude: Vec<Expression>) -> Self {
		Self {
			include,
			exclude,
			priority: DEFAULT_PRIORITY,
		}
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	pub fn include(&self) -> &[Expression] {
		&self.include
	}

	pub fn exclude(&self) -> &[Expression] {
		&self.exclude
	}

	pub fn priority(&self) -> i32 {
		self.priority
	}

	/// Parses `url` and matches it. Unparseable URLs never match.
	pub fn matches(&self, url: &str) -> bool {
		match MatchUrl::parse(url) {
			Ok(url) => self.matches_url(&url),
			Err(err) => {
				warn!(%err, "treating unparseable url as no match");
				false
			}
		}
	}

	pub fn matches_url(&self, url: &MatchUrl) -> bool {
		self.specificity_for(url).is_some()
	}

	/// Specificity of the best matching include expression, or `None` when the
	/// set does not match `url`. Excludes are only evaluated once an include hit.
	pub fn specificity_for(&self, url: &MatchUrl) -> Option<Specificity> {
		let best = self.include.iter().filter_map(|expr| expr.specificity_for(url)).max()?;
		if self.exclude.iter().any(|expr| expr.is_match(url)) {
			return None;
		}
		Some(best)
	}
}

impl std::fmt::Display for Patterns {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let join = |exprs: &[Expression]| exprs.iter().map(Expression::as_str).collect::<Vec<_>>().join(", ");
		write!(
			f,
			"include=[{}] exclude=[{}] priority={}",
			join(&self.include),
			join(&self.exclude),
			self.priority
		)
	}
}

/// Returns whether `url` satisfies `patterns`.
pub fn matches(url: &str, patterns: &Patterns) -> bool {
	patterns.matches(url)
}
