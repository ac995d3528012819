/// Rejection of a malformed pattern expression.
///
/// Every variant carries the full source expression so configuration errors
/// can point at the offending text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
	#[error("empty pattern expression")]
	Empty,

	#[error("unbalanced parentheses in {expr:?}")]
	Unbalanced { expr: String },

	#[error("empty alternation branch in {expr:?}")]
	EmptyBranch { expr: String },

	#[error("{expr:?} expands to more than {limit} branches")]
	TooManyBranches { expr: String, limit: usize },

	#[error("whitespace is not allowed in {expr:?}")]
	Whitespace { expr: String },

	#[error("fragments are not supported in {expr:?}")]
	Fragment { expr: String },

	#[error("invalid scheme {scheme:?} in {expr:?}")]
	InvalidScheme { expr: String, scheme: String },

	#[error("invalid host {host:?} in {expr:?}")]
	InvalidHost { expr: String, host: String },

	#[error("invalid port {port:?} in {expr:?}")]
	InvalidPort { expr: String, port: String },

	#[error("invalid path {path:?} in {expr:?}")]
	InvalidPath { expr: String, path: String },

	#[error("invalid query {query:?} in {expr:?}")]
	InvalidQuery { expr: String, query: String },

	#[error("invalid glob in {expr:?}: {message}")]
	Glob { expr: String, message: String },
}
