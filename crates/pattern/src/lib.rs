//! URL pattern sets: include/exclude expressions compiled once, matched many times.
//!
//! An expression names a host and optionally a scheme, port, path prefix and
//! required query parameters:
//!
//! ```text
//! [scheme://][host[:port]][/path][?key=value&key]
//! ```
//!
//! * Hosts compare case-insensitively and also match subdomains, so
//!   `example.com` matches `www.example.com`.
//! * Paths compare case-sensitively as prefixes.
//! * `*` matches any run of characters (including `/`).
//! * `(a|b)` alternation expands into independent branches; a bare `a|b` at the
//!   top level does the same for whole expressions.
//!
//! Expressions are validated when a [`Patterns`] is built. Matching never fails:
//! a URL that cannot be parsed is logged and treated as "no match".

mod error;
mod expr;
mod patterns;
mod target;

pub use error::PatternError;
pub use expr::{Expression, MAX_BRANCHES, Specificity};
pub use patterns::{DEFAULT_PRIORITY, Patterns, matches};
pub use target::{MatchUrl, UrlError};
