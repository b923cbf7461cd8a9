//! Minimal form library used by the integration tests
//!
//! A schema is a list of required text fields. Rendering produces a compact,
//! predictable string so tests can assert on button titles and initial values.

#![allow(dead_code)]

use hyper::Method;
use reinhardt_formwizard::{
	BoundSchema, Button, FieldValues, Form, FormOptions, Request, Resources, Schema, Session,
	SessionBackend, ValidationFailure,
};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct TextSchema {
	pub name: String,
	pub title: String,
	pub description: String,
	pub fields: Vec<String>,
}

impl TextSchema {
	pub fn new(name: &str, fields: &[&str]) -> Self {
		Self {
			name: name.to_string(),
			title: format!("{} step", name),
			description: format!("Collects {}", fields.join(", ")),
			fields: fields.iter().map(|f| f.to_string()).collect(),
		}
	}

	pub fn shared(name: &str, fields: &[&str]) -> Arc<dyn Schema> {
		Arc::new(Self::new(name, fields))
	}
}

impl Schema for TextSchema {
	fn name(&self) -> &str {
		&self.name
	}

	fn title(&self) -> &str {
		&self.title
	}

	fn description(&self) -> &str {
		&self.description
	}

	fn bind(&self, _request: &Request) -> Box<dyn BoundSchema> {
		Box::new(BoundText {
			name: self.name.clone(),
			fields: self.fields.clone(),
		})
	}
}

struct BoundText {
	name: String,
	fields: Vec<String>,
}

impl BoundSchema for BoundText {
	fn into_form(self: Box<Self>, buttons: Vec<Button>, options: &FormOptions) -> Box<dyn Form> {
		Box::new(TextForm {
			name: self.name,
			fields: self.fields,
			buttons,
			use_ajax: options.use_ajax,
		})
	}
}

pub struct TextForm {
	name: String,
	fields: Vec<String>,
	buttons: Vec<Button>,
	use_ajax: bool,
}

impl Form for TextForm {
	fn buttons(&self) -> &[Button] {
		&self.buttons
	}

	fn validate(&mut self, controls: &[(String, String)]) -> Result<FieldValues, ValidationFailure> {
		let mut data = FieldValues::new();
		let mut failure = ValidationFailure::new(format!("{} with errors", self.name));
		let mut failed = false;

		for field in &self.fields {
			match controls.iter().find(|(k, _)| k == field) {
				Some((_, value)) if !value.is_empty() => {
					data.insert(field.clone(), json!(value));
				}
				_ => {
					failure = failure.with_error(field.clone(), "Required.");
					failed = true;
				}
			}
		}

		if failed { Err(failure) } else { Ok(data) }
	}

	/// Renders `name[Button titles]{field=value,...}`
	fn render(&self, initial: Option<&FieldValues>) -> String {
		let titles: Vec<&str> = self.buttons.iter().map(|b| b.title.as_str()).collect();
		let values: Vec<String> = self
			.fields
			.iter()
			.map(|field| {
				let value = initial
					.and_then(|i| i.get(field))
					.and_then(Value::as_str)
					.unwrap_or("");
				format!("{}={}", field, value)
			})
			.collect();
		let ajax = if self.use_ajax { " ajax" } else { "" };
		format!("{}[{}]{{{}}}{}", self.name, titles.join(","), values.join(","), ajax)
	}

	fn resources(&self) -> Resources {
		Resources::new()
			.with_js("/static/forms.js")
			.with_css("/static/forms.css")
	}
}

pub fn get(uri: &str, session: Box<dyn SessionBackend>) -> Request {
	Request::builder()
		.uri(uri)
		.boxed_session(session)
		.build()
		.unwrap()
}

pub fn post(uri: &str, fields: &[(&str, &str)], session: Box<dyn SessionBackend>) -> Request {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.form(fields.iter().copied())
		.boxed_session(session)
		.build()
		.unwrap()
}

pub fn new_session() -> Box<dyn SessionBackend> {
	Box::new(Session::new())
}

/// The stored record of `wizard` in a session using default settings
pub fn wizard_record<'s>(session: &'s dyn SessionBackend, wizard: &str) -> Option<&'s Value> {
	session
		.get(reinhardt_formwizard::settings::DEFAULT_SESSION_KEY)
		.and_then(|wizards| wizards.get(wizard))
}
