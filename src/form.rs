//! Contract with the form-processing library
//!
//! Field definitions, validation rules and widget rendering live in the form
//! library. Views only need to bind a schema to the request, build a form with
//! submit buttons, validate submitted fields and render markup; these traits
//! describe exactly that much.

use crate::request::Request;
use crate::resources::Resources;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Validated form data, field name to typed value
pub type FieldValues = serde_json::Map<String, Value>;

/// A named submit control
///
/// # Examples
///
/// ```
/// use reinhardt_formwizard::Button;
///
/// let button = Button::new("next", "Next");
/// assert_eq!(button.name, "next");
/// assert_eq!(button.title, "Next");
/// assert!(!button.disabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
	/// Field name submitted when the button is pressed
	pub name: String,
	pub title: String,
	pub disabled: bool,
}

impl Button {
	pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: title.into(),
			disabled: false,
		}
	}
}

/// Transport options forwarded to the form library when building a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOptions {
	/// Submit the form asynchronously and replace it in place
	pub use_ajax: bool,
	/// Raw options handed to the asynchronous submission script
	pub ajax_options: String,
}

impl FormOptions {
	pub fn ajax(options: impl Into<String>) -> Self {
		Self {
			use_ajax: true,
			ajax_options: options.into(),
		}
	}
}

/// Declarative description of a form
pub trait Schema: Send + Sync {
	/// Identifier, also used as a step key in wizard state
	fn name(&self) -> &str;

	fn title(&self) -> &str {
		""
	}

	fn description(&self) -> &str {
		""
	}

	/// Associate the schema with the current request
	fn bind(&self, request: &Request) -> Box<dyn BoundSchema>;
}

/// A schema bound to a request context
pub trait BoundSchema {
	/// Build a form with the given submit buttons
	fn into_form(self: Box<Self>, buttons: Vec<Button>, options: &FormOptions) -> Box<dyn Form>;
}

/// A form instance ready to render or validate
pub trait Form {
	/// Submit buttons, in display order
	fn buttons(&self) -> &[Button];

	/// Validate submitted fields
	fn validate(&mut self, controls: &[(String, String)]) -> Result<FieldValues, ValidationFailure>;

	/// Render the form, optionally pre-populated with `initial` values
	fn render(&self, initial: Option<&FieldValues>) -> String;

	/// Script and stylesheet links the form's widgets need
	fn resources(&self) -> Resources {
		Resources::default()
	}
}

/// Failed validation, carrying the re-rendered form with error annotations
///
/// # Examples
///
/// ```
/// use reinhardt_formwizard::ValidationFailure;
///
/// let failure = ValidationFailure::new("<form class=\"error\"></form>")
///     .with_error("email", "This field is required.");
///
/// assert_eq!(failure.render(), "<form class=\"error\"></form>");
/// assert_eq!(failure.field_errors("email"), ["This field is required."]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
	errors: HashMap<String, Vec<String>>,
	rendered: String,
}

impl ValidationFailure {
	pub fn new(rendered: impl Into<String>) -> Self {
		Self {
			errors: HashMap::new(),
			rendered: rendered.into(),
		}
	}

	pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
		self.errors
			.entry(field.into())
			.or_default()
			.push(message.into());
		self
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	pub fn field_errors(&self, field: &str) -> &[String] {
		self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
	}

	/// Markup of the form annotated with its errors
	pub fn render(&self) -> &str {
		&self.rendered
	}
}

impl std::fmt::Display for ValidationFailure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut fields: Vec<&String> = self.errors.keys().collect();
		fields.sort();
		write!(f, "validation failed for fields: ")?;
		for (i, field) in fields.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{}", field)?;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationFailure {}
