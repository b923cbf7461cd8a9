//! Request view used by form views and wizards
//!
//! Carries what the form layer needs from an inbound request: method, URI,
//! headers, submitted form fields, decoded query parameters and the session.

use crate::error::{WizardError, WizardResult};
use crate::session::{Session, SessionBackend};
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// An inbound request bound to its session
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	is_secure: bool,
	post: Vec<(String, String)>,
	query_params: HashMap<String, String>,
	session: Box<dyn SessionBackend>,
}

impl Request {
	/// Create a new request builder
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/signup?step=1")
	///     .form_field("email", "a@example.com")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/signup");
	/// assert_eq!(request.query_param("step"), Some("1"));
	/// assert!(request.has_post_field("email"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Parse query parameters from URI, URL-decoding keys and values
	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter(|pair| !pair.is_empty())
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						let key = parts.next()?;
						let value = parts.next().unwrap_or("");
						Some((decode(key), decode(value)))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Returns the scheme of the request (http or https)
	pub fn scheme(&self) -> &str {
		if let Some(scheme) = self.uri.scheme_str() {
			return scheme;
		}
		if self.is_secure { "https" } else { "http" }
	}

	/// URL of the request without its query string
	///
	/// Uses the URI authority when present, then the `Host` header, and falls
	/// back to the bare path.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::Request;
	///
	/// let request = Request::builder()
	///     .uri("/wizard/?step=2")
	///     .header("host", "example.com")
	///     .secure(true)
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.path_url(), "https://example.com/wizard/");
	///
	/// let request = Request::builder().uri("/wizard/?step=2").build().unwrap();
	/// assert_eq!(request.path_url(), "/wizard/");
	/// ```
	pub fn path_url(&self) -> String {
		if let Some(authority) = self.uri.authority() {
			return format!("{}://{}{}", self.scheme(), authority, self.path());
		}

		match self.host() {
			Some(host) => format!("{}://{}{}", self.scheme(), host, self.path()),
			None => self.path().to_string(),
		}
	}

	fn host(&self) -> Option<&str> {
		self.headers
			.get(hyper::header::HOST)
			.and_then(|h| h.to_str().ok())
	}

	/// Decoded query parameters
	pub fn query_params(&self) -> &HashMap<String, String> {
		&self.query_params
	}

	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Submitted form fields, in submission order
	pub fn post(&self) -> &[(String, String)] {
		&self.post
	}

	/// Whether a field with this name was submitted
	pub fn has_post_field(&self, name: &str) -> bool {
		self.post.iter().any(|(key, _)| key == name)
	}

	pub fn session(&self) -> &dyn SessionBackend {
		self.session.as_ref()
	}

	pub fn session_mut(&mut self) -> &mut dyn SessionBackend {
		self.session.as_mut()
	}

	/// Take the session back out of the request, e.g. to persist it
	pub fn into_session(self) -> Box<dyn SessionBackend> {
		self.session
	}
}

fn decode(raw: &str) -> String {
	percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Builder for [`Request`]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	headers: Vec<(String, String)>,
	is_secure: bool,
	post: Vec<(String, String)>,
	session: Option<Box<dyn SessionBackend>>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			headers: Vec::new(),
			is_secure: false,
			post: Vec::new(),
			session: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn secure(mut self, is_secure: bool) -> Self {
		self.is_secure = is_secure;
		self
	}

	/// Add one submitted form field
	pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.post.push((name.into(), value.into()));
		self
	}

	/// Add submitted form fields
	pub fn form<I, K, V>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.post
			.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Attach a session; an empty [`Session`] is used otherwise
	pub fn session(mut self, session: impl SessionBackend + 'static) -> Self {
		self.session = Some(Box::new(session));
		self
	}

	pub fn boxed_session(mut self, session: Box<dyn SessionBackend>) -> Self {
		self.session = Some(session);
		self
	}

	pub fn build(self) -> WizardResult<Request> {
		let uri = self
			.uri
			.parse::<Uri>()
			.map_err(|e| {
				WizardError::InvalidRequest(format!("invalid URI '{}': {}", self.uri, e))
			})?;

		let mut headers = HeaderMap::new();
		for (name, value) in &self.headers {
			let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
				WizardError::InvalidRequest(format!("invalid header name '{}': {}", name, e))
			})?;
			let header_value = HeaderValue::from_str(value).map_err(|e| {
				WizardError::InvalidRequest(format!("invalid value for header '{}': {}", name, e))
			})?;
			headers.append(header_name, header_value);
		}

		let query_params = Request::parse_query_params(&uri);
		let session: Box<dyn SessionBackend> = match self.session {
			Some(session) => session,
			None => Box::new(Session::new()),
		};

		Ok(Request {
			method: self.method,
			uri,
			headers,
			is_secure: self.is_secure,
			post: self.post,
			query_params,
			session,
		})
	}
}
