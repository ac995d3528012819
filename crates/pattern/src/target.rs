use std::str::FromStr;

use url::Url;

/// A request URL that could not be split into comparable components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse url {url:?}: {reason}")]
pub struct UrlError {
	pub url: String,
	pub reason: String,
}

impl UrlError {
	fn new(url: &str, reason: impl std::fmt::Display) -> Self {
		Self {
			url: url.to_owned(),
			reason: reason.to_string(),
		}
	}
}

/// Request URL decomposed into the parts expressions compare against.
///
/// Parse once per request and reuse it across every rule; [`crate::Patterns::matches`]
/// does the parse itself for one-off checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchUrl {
	raw: String,
	scheme: String,
	host: Option<String>,
	port: Option<u16>,
	path: String,
	query: Vec<(String, String)>,
}

impl MatchUrl {
	/// Parses an absolute URL. Input without a `scheme://` prefix is read as
	/// `http://`, so `example.com/book/1` is accepted.
	pub fn parse(raw: &str) -> Result<Self, UrlError> {
		let raw = raw.trim();
		if raw.is_empty() {
			return Err(UrlError::new(raw, "empty url"));
		}

		let parsed = if has_scheme(raw) {
			Url::parse(raw)
		} else {
			Url::parse(&format!("http://{raw}"))
		}
		.map_err(|err| UrlError::new(raw, err))?;

		Ok(Self {
			raw: raw.to_owned(),
			scheme: parsed.scheme().to_ascii_lowercase(),
			host: parsed.host_str().map(str::to_ascii_lowercase),
			port: parsed.port_or_known_default(),
			path: parsed.path().to_owned(),
			query: parsed
				.query_pairs()
				.map(|(key, value)| (key.into_owned(), value.into_owned()))
				.collect(),
		})
	}

	/// The URL text as given by the caller.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	pub fn scheme(&self) -> &str {
		&self.scheme
	}

	/// Lowercased host, if the URL has one.
	pub fn host(&self) -> Option<&str> {
		self.host.as_deref()
	}

	/// Explicit port, or the scheme default.
	pub fn port(&self) -> Option<u16> {
		self.port
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Values of query parameter `key`, in URL order.
	pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.query.iter().filter(move |(k, _)| k == key).map(|(_, v)| v.as_str())
	}
}

/// Whether `raw` starts with `scheme://`. A `://` after the first `/`, `?` or `#`
/// belongs to the path or query (`example.com/login?next=http://x.org/`).
fn has_scheme(raw: &str) -> bool {
	raw.find("://")
		.is_some_and(|idx| !raw[..idx].contains(['/', '?', '#']))
}

impl FromStr for MatchUrl {
	type Err = UrlError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl std::fmt::Display for MatchUrl {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.raw)
	}
}
