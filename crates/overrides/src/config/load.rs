//! Settings file loading.

use std::path::Path;

use tracing::debug;

use super::Settings;
use crate::ConfigError;

impl Settings {
	/// Parses settings from TOML text. Unknown keys are rejected.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a settings file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let settings = Self::from_toml_str(&text)?;
		debug!(
			path = %path.display(),
			registry = %settings.registry,
			rules = settings.rules.len(),
			discover = ?settings.discover,
			"loaded settings"
		);
		Ok(settings)
	}

	/// Label passed to registry initializers; `"default"` when unset.
	pub fn environment(&self) -> &str {
		self.environment.as_deref().unwrap_or("default")
	}
}
