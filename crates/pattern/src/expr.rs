//! Expression parsing and compilation.
//!
//! # Pipeline
//!
//! 1. Alternation expansion: `(a|b)` groups and top-level `|` are multiplied out
//!    into plain branch strings (at most [`MAX_BRANCHES`]).
//! 2. Each branch is split into scheme, host, port, path and query parts.
//! 3. Host, path and query values are compiled into `globset` matchers: hosts
//!    case-insensitively (plus a `*.host` variant for subdomains), paths
//!    case-sensitively with an implicit trailing `*` for prefix semantics.
//!    Paths are percent-encoded first, the same way request URLs arrive, so
//!    `/café` matches a request for `/caf%C3%A9`.
//!
//! Specificity is fixed at compile time per branch: the number of characters
//! before the first `*`, not counting the scheme.

use std::str::FromStr;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use url::Url;

use crate::{MatchUrl, PatternError};

/// Upper bound on branches produced by alternation expansion of one expression.
pub const MAX_BRANCHES: usize = 64;

/// Length of the literal (wildcard-free) prefix of a matched branch.
///
/// Longer literal prefixes are more specific. Ordering is the plain numeric one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(usize);

impl Specificity {
	pub fn new(literal_prefix_len: usize) -> Self {
		Self(literal_prefix_len)
	}

	pub fn literal_prefix_len(self) -> usize {
		self.0
	}
}

impl std::fmt::Display for Specificity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// One compiled match expression.
#[derive(Debug, Clone)]
pub struct Expression {
	source: String,
	branches: Vec<Branch>,
}

#[derive(Debug, Clone)]
struct Branch {
	scheme: Option<String>,
	host: Option<GlobSet>,
	port: Option<u16>,
	path: Option<GlobMatcher>,
	query: Vec<QueryParam>,
	specificity: Specificity,
}

#[derive(Debug, Clone)]
struct QueryParam {
	key: String,
	value: Option<GlobMatcher>,
}

impl Expression {
	/// Parses and compiles `source`.
	pub fn parse(source: &str) -> Result<Self, PatternError> {
		if source.is_empty() {
			return Err(PatternError::Empty);
		}
		if source.chars().any(char::is_whitespace) {
			return Err(PatternError::Whitespace { expr: source.to_owned() });
		}
		if source.contains('#') {
			return Err(PatternError::Fragment { expr: source.to_owned() });
		}

		let branches = Expander::new(source)
			.expand()?
			.iter()
			.map(|text| Branch::compile(source, text))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			source: source.to_owned(),
			branches,
		})
	}

	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Number of branches after alternation expansion.
	pub fn branch_count(&self) -> usize {
		self.branches.len()
	}

	pub fn is_match(&self, url: &MatchUrl) -> bool {
		self.branches.iter().any(|branch| branch.is_match(url))
	}

	/// Specificity of the most specific branch matching `url`, or `None` when no
	/// branch matches.
	pub fn specificity_for(&self, url: &MatchUrl) -> Option<Specificity> {
		self.branches
			.iter()
			.filter(|branch| branch.is_match(url))
			.map(|branch| branch.specificity)
			.max()
	}
}

impl FromStr for Expression {
	type Err = PatternError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.source)
	}
}

impl Branch {
	fn compile(expr: &str, text: &str) -> Result<Self, PatternError> {
		let (scheme, body) = match text.split_once("://") {
			Some((scheme, body)) => (Some(parse_scheme(expr, scheme)?), body),
			None => (None, text),
		};

		let specificity = Specificity::new(body.find('*').map_or(body, |idx| &body[..idx]).chars().count());

		let (location, query) = match body.split_once('?') {
			Some((location, query)) => (location, Some(query)),
			None => (body, None),
		};
		let (authority, path) = match location.find('/') {
			Some(idx) => location.split_at(idx),
			None => (location, ""),
		};
		let (host, port) = split_port(expr, authority)?;

		let host = if host.is_empty() {
			None
		} else {
			validate_host(expr, host)?;
			let host = host.to_ascii_lowercase();
			let mut set = GlobSetBuilder::new();
			set.add(build_glob(expr, &glob_literal(&host), true)?);
			set.add(build_glob(expr, &glob_literal(&format!("*.{host}")), true)?);
			Some(set.build().map_err(|err| glob_error(expr, err))?)
		};

		let path = if path.is_empty() {
			None
		} else {
			let mut glob = glob_literal(&normalize_path(expr, path)?);
			if !glob.ends_with('*') {
				glob.push('*');
			}
			Some(build_glob(expr, &glob, false)?.compile_matcher())
		};

		let query = match query {
			Some(query) => parse_query(expr, query)?,
			None => Vec::new(),
		};

		Ok(Self {
			scheme,
			host,
			port,
			path,
			query,
			specificity,
		})
	}

	fn is_match(&self, url: &MatchUrl) -> bool {
		if let Some(scheme) = &self.scheme
			&& scheme.as_str() != url.scheme()
		{
			return false;
		}
		if let Some(hosts) = &self.host {
			let Some(host) = url.host() else {
				return false;
			};
			if !hosts.is_match(host) {
				return false;
			}
		}
		if let Some(port) = self.port
			&& url.port() != Some(port)
		{
			return false;
		}
		if let Some(path) = &self.path
			&& !path.is_match(url.path())
		{
			return false;
		}
		self.query.iter().all(|param| param.is_match(url))
	}
}

impl QueryParam {
	fn is_match(&self, url: &MatchUrl) -> bool {
		let mut values = url.query_values(&self.key);
		match &self.value {
			Some(glob) => values.any(|value| glob.is_match(value)),
			None => values.next().is_some(),
		}
	}
}

fn parse_scheme(expr: &str, scheme: &str) -> Result<String, PatternError> {
	let valid = scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
		&& scheme
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
	if !valid {
		return Err(PatternError::InvalidScheme {
			expr: expr.to_owned(),
			scheme: scheme.to_owned(),
		});
	}
	Ok(scheme.to_ascii_lowercase())
}

fn split_port<'a>(expr: &str, authority: &'a str) -> Result<(&'a str, Option<u16>), PatternError> {
	// Bracketed IPv6 literals contain colons of their own.
	let (host, port) = if let Some(end) = authority.find(']') {
		let (host, rest) = authority.split_at(end + 1);
		match rest.strip_prefix(':') {
			Some(port) => (host, Some(port)),
			None if rest.is_empty() => (host, None),
			None => {
				return Err(PatternError::InvalidHost {
					expr: expr.to_owned(),
					host: authority.to_owned(),
				});
			}
		}
	} else {
		match authority.rsplit_once(':') {
			Some((host, port)) => (host, Some(port)),
			None => (authority, None),
		}
	};

	let port = port
		.map(|port| {
			port.parse::<u16>().map_err(|_| PatternError::InvalidPort {
				expr: expr.to_owned(),
				port: port.to_owned(),
			})
		})
		.transpose()?;
	Ok((host, port))
}

fn validate_host(expr: &str, host: &str) -> Result<(), PatternError> {
	let bracketed = host.starts_with('[') && host.ends_with(']');
	let valid = host.chars().all(|c| {
		c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '*') || (bracketed && matches!(c, '[' | ']' | ':'))
	});
	if valid {
		Ok(())
	} else {
		Err(PatternError::InvalidHost {
			expr: expr.to_owned(),
			host: host.to_owned(),
		})
	}
}

fn parse_query(expr: &str, query: &str) -> Result<Vec<QueryParam>, PatternError> {
	let invalid = || PatternError::InvalidQuery {
		expr: expr.to_owned(),
		query: query.to_owned(),
	};
	if query.is_empty() {
		return Err(invalid());
	}

	query
		.split('&')
		.map(|pair| {
			let (key, value) = match pair.split_once('=') {
				Some((key, value)) => (key, Some(value)),
				None => (pair, None),
			};
			if key.is_empty() || key.contains('*') {
				return Err(invalid());
			}
			let value = value
				.map(|value| build_glob(expr, &glob_literal(value), false).map(|glob| glob.compile_matcher()))
				.transpose()?;
			Ok(QueryParam {
				key: key.to_owned(),
				value,
			})
		})
		.collect()
}

/// Path as a parsed request URL would report it: percent-encoded, dot segments resolved.
fn normalize_path(expr: &str, path: &str) -> Result<String, PatternError> {
	Url::parse(&format!("http://path.invalid{path}"))
		.map(|url| url.path().to_owned())
		.map_err(|_| PatternError::InvalidPath {
			expr: expr.to_owned(),
			path: path.to_owned(),
		})
}

/// Escapes glob metacharacters other than `*` and collapses `**` runs, which
/// would otherwise take on globset's recursive-directory meaning.
fn glob_literal(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut prev_star = false;
	for c in text.chars() {
		if c == '*' && prev_star {
			continue;
		}
		if matches!(c, '?' | '[' | ']' | '{' | '}' | '\\') {
			out.push('\\');
		}
		out.push(c);
		prev_star = c == '*';
	}
	out
}

fn build_glob(expr: &str, glob: &str, case_insensitive: bool) -> Result<Glob, PatternError> {
	GlobBuilder::new(glob)
		.case_insensitive(case_insensitive)
		.literal_separator(false)
		.backslash_escape(true)
		.build()
		.map_err(|err| glob_error(expr, err))
}

fn glob_error(expr: &str, err: globset::Error) -> PatternError {
	PatternError::Glob {
		expr: expr.to_owned(),
		message: err.to_string(),
	}
}

/// Multiplies out `(a|b)` groups and top-level `|` into plain branch texts.
struct Expander<'a> {
	src: &'a str,
	pos: usize,
}

impl<'a> Expander<'a> {
	fn new(src: &'a str) -> Self {
		Self { src, pos: 0 }
	}

	fn expand(mut self) -> Result<Vec<String>, PatternError> {
		let branches = self.alternatives(false)?;
		debug_assert_eq!(self.pos, self.src.len());
		Ok(branches)
	}

	fn peek(&self) -> Option<char> {
		self.src[self.pos..].chars().next()
	}

	fn alternatives(&mut self, nested: bool) -> Result<Vec<String>, PatternError> {
		let mut out = Vec::new();
		loop {
			out.extend(self.sequence()?);
			self.check_limit(out.len())?;
			match self.peek() {
				Some('|') => self.pos += 1,
				Some(')') if nested => return Ok(out),
				Some(')') => return Err(self.unbalanced()),
				None if nested => return Err(self.unbalanced()),
				None => return Ok(out),
				Some(_) => unreachable!("sequence stops only at '|', ')' or end of input"),
			}
		}
	}

	fn sequence(&mut self) -> Result<Vec<String>, PatternError> {
		let mut acc = vec![String::new()];
		let mut empty = true;

		while let Some(c) = self.peek() {
			match c {
				'|' | ')' => break,
				'(' => {
					self.pos += 1;
					let group = self.alternatives(true)?;
					// alternatives(true) only returns Ok when positioned on ')'.
					self.pos += 1;
					self.check_limit(acc.len() * group.len())?;
					acc = acc
						.iter()
						.flat_map(|prefix| group.iter().map(move |alt| format!("{prefix}{alt}")))
						.collect();
				}
				c => {
					for branch in &mut acc {
						branch.push(c);
					}
					self.pos += c.len_utf8();
				}
			}
			empty = false;
		}

		if empty {
			return Err(PatternError::EmptyBranch { expr: self.src.to_owned() });
		}
		Ok(acc)
	}

	fn check_limit(&self, count: usize) -> Result<(), PatternError> {
		if count > MAX_BRANCHES {
			return Err(PatternError::TooManyBranches {
				expr: self.src.to_owned(),
				limit: MAX_BRANCHES,
			});
		}
		Ok(())
	}

	fn unbalanced(&self) -> PatternError {
		PatternError::Unbalanced { expr: self.src.to_owned() }
	}
}
