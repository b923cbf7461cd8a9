//! Results produced by form views
//!
//! A view either hands a [`Context`] payload back to the caller for template
//! rendering, or returns a finished [`Response`] (for example a redirect after
//! a successful wizard step).

use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde_json::Value;

/// Template payload returned by form views
pub type Context = serde_json::Map<String, Value>;

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 302 Found (temporary redirect)
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::temporary_redirect("/wizard/");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.location(), Some("/wizard/"));
	/// ```
	pub fn temporary_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	/// Add a custom header to the response
	///
	/// Invalid header names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Add a Location header to the response
	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(hyper::header::LOCATION, value);
		}
		self
	}

	/// Value of the Location header, if any
	pub fn location(&self) -> Option<&str> {
		self.headers
			.get(hyper::header::LOCATION)
			.and_then(|v| v.to_str().ok())
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}
}

/// Outcome of a form view or wizard invocation
#[derive(Debug, Clone)]
pub enum ViewResult {
	/// Structured payload for rendering; resource links are merged into it
	Context(Context),
	/// Opaque response passed through untouched
	Response(Response),
}

impl ViewResult {
	/// Payload with a single `form` entry holding rendered markup
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::ViewResult;
	/// use serde_json::json;
	///
	/// let result = ViewResult::form("<form></form>");
	/// assert_eq!(result.context().unwrap()["form"], json!("<form></form>"));
	/// ```
	pub fn form(markup: impl Into<String>) -> Self {
		let mut context = Context::new();
		context.insert("form".to_string(), Value::String(markup.into()));
		Self::Context(context)
	}

	pub fn context(&self) -> Option<&Context> {
		match self {
			Self::Context(context) => Some(context),
			Self::Response(_) => None,
		}
	}

	pub fn response(&self) -> Option<&Response> {
		match self {
			Self::Context(_) => None,
			Self::Response(response) => Some(response),
		}
	}

	pub fn into_context(self) -> Option<Context> {
		match self {
			Self::Context(context) => Some(context),
			Self::Response(_) => None,
		}
	}

	pub fn into_response(self) -> Option<Response> {
		match self {
			Self::Context(_) => None,
			Self::Response(response) => Some(response),
		}
	}
}

impl From<Context> for ViewResult {
	fn from(context: Context) -> Self {
		Self::Context(context)
	}
}

impl From<Response> for ViewResult {
	fn from(response: Response) -> Self {
		Self::Response(response)
	}
}
