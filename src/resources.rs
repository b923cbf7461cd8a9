//! Client-side resources declared by forms
//!
//! Widgets may need script and stylesheet links on the page that renders
//! them. Forms report these through [`Form::resources`](crate::form::Form::resources)
//! and form views merge them into context payloads as `js_links` and
//! `css_links`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Context key for script links
pub const JS_LINKS_KEY: &str = "js_links";

/// Context key for stylesheet links
pub const CSS_LINKS_KEY: &str = "css_links";

/// Script and stylesheet links required by a form
///
/// # Examples
///
/// ```
/// use reinhardt_formwizard::Resources;
///
/// let mut resources = Resources::new();
/// resources.add_js("/static/js/datepicker.js");
/// resources.add_css("/static/css/datepicker.css");
/// resources.add_js("/static/js/datepicker.js");
///
/// assert_eq!(resources.js(), ["/static/js/datepicker.js"]);
/// assert_eq!(resources.css(), ["/static/css/datepicker.css"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
	js: Vec<String>,
	css: Vec<String>,
}

impl Resources {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a script link, skipping duplicates
	pub fn add_js(&mut self, path: impl Into<String>) {
		let path = path.into();
		if !self.js.contains(&path) {
			self.js.push(path);
		}
	}

	/// Add a stylesheet link, skipping duplicates
	pub fn add_css(&mut self, path: impl Into<String>) {
		let path = path.into();
		if !self.css.contains(&path) {
			self.css.push(path);
		}
	}

	pub fn with_js(mut self, path: impl Into<String>) -> Self {
		self.add_js(path);
		self
	}

	pub fn with_css(mut self, path: impl Into<String>) -> Self {
		self.add_css(path);
		self
	}

	pub fn js(&self) -> &[String] {
		&self.js
	}

	pub fn css(&self) -> &[String] {
		&self.css
	}

	/// Write the links into a context payload, replacing existing entries
	pub(crate) fn insert_into(&self, context: &mut crate::response::Context) {
		context.insert(JS_LINKS_KEY.to_string(), links_value(&self.js));
		context.insert(CSS_LINKS_KEY.to_string(), links_value(&self.css));
	}
}

fn links_value(links: &[String]) -> Value {
	Value::Array(links.iter().cloned().map(Value::String).collect())
}
