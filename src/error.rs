//! Error types for form views and wizards

use std::num::ParseIntError;

/// Errors raised while dispatching a form view or wizard step.
///
/// Validation failures are not errors: they are routed to failure handlers
/// as [`ValidationFailure`](crate::form::ValidationFailure) values.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
	/// A submitted button has no success handler registered
	#[error("No success handler registered for button '{0}'")]
	MissingHandler(String),

	/// The step override in the query string is not a step number
	#[error("Invalid step parameter '{value}': {source}")]
	InvalidStep {
		value: String,
		#[source]
		source: ParseIntError,
	},

	/// Advancing would move past the largest representable step
	#[error("Step {step} cannot be advanced")]
	StepOutOfRange { step: usize },

	/// A request could not be built from its parts
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	/// A user-supplied handler or finalize callback failed
	#[error("Handler error: {0}")]
	Handler(String),

	/// Wizard settings could not be loaded
	#[error("Configuration error: {message}")]
	Config { message: String },
}

impl WizardError {
	/// Shorthand for reporting a failure from a handler closure
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::WizardError;
	///
	/// let err = WizardError::handler("order could not be saved");
	/// assert_eq!(err.to_string(), "Handler error: order could not be saved");
	/// ```
	pub fn handler(message: impl Into<String>) -> Self {
		Self::Handler(message.into())
	}
}

pub type WizardResult<T> = Result<T, WizardError>;
