//! Wizard settings
//!
//! Settings control where wizard records live in the session, which query
//! parameter overrides the current step, and how navigation buttons are
//! labelled. Every key is optional when loading from TOML:
//!
//! ```toml
//! session_key = "myapp.wizards"
//! step_param = "page"
//!
//! [labels]
//! previous = "Back"
//! next = "Continue"
//! done = "Finish"
//! ```

use crate::error::{WizardError, WizardResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default session key holding all wizard records
pub const DEFAULT_SESSION_KEY: &str = "reinhardt_formwizard.wizards";

/// Default query parameter used for direct step navigation
pub const DEFAULT_STEP_PARAM: &str = "step";

/// Titles of the wizard navigation buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLabels {
	pub previous: String,
	pub next: String,
	/// Title of the `next` button on the last step
	pub done: String,
}

impl Default for ButtonLabels {
	fn default() -> Self {
		Self {
			previous: "Previous".to_string(),
			next: "Next".to_string(),
			done: "Done".to_string(),
		}
	}
}

/// Settings shared by every step of a wizard
///
/// # Examples
///
/// ```
/// use reinhardt_formwizard::WizardSettings;
///
/// let settings = WizardSettings::default();
/// assert_eq!(settings.step_param, "step");
/// assert_eq!(settings.labels.done, "Done");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardSettings {
	/// Session key under which wizard records are stored, keyed by wizard name
	pub session_key: String,
	/// Query parameter that overrides the persisted step
	pub step_param: String,
	pub labels: ButtonLabels,
}

impl Default for WizardSettings {
	fn default() -> Self {
		Self {
			session_key: DEFAULT_SESSION_KEY.to_string(),
			step_param: DEFAULT_STEP_PARAM.to_string(),
			labels: ButtonLabels::default(),
		}
	}
}

impl WizardSettings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
		self.session_key = key.into();
		self
	}

	pub fn with_step_param(mut self, param: impl Into<String>) -> Self {
		self.step_param = param.into();
		self
	}

	pub fn with_labels(mut self, labels: ButtonLabels) -> Self {
		self.labels = labels;
		self
	}

	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns error if file cannot be read or parsed.
	pub fn from_file(path: impl AsRef<Path>) -> WizardResult<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| WizardError::Config {
			message: format!("failed to read {}: {}", path.display(), e),
		})?;

		Self::from_toml(&content)
	}

	/// Parse settings from a TOML string.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::WizardSettings;
	///
	/// let settings = WizardSettings::from_toml("step_param = \"page\"").unwrap();
	/// assert_eq!(settings.step_param, "page");
	/// assert_eq!(settings.session_key, "reinhardt_formwizard.wizards");
	/// ```
	pub fn from_toml(content: &str) -> WizardResult<Self> {
		toml::from_str(content).map_err(|e| WizardError::Config {
			message: e.to_string(),
		})
	}
}
