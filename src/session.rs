//! Session access for wizard state
//!
//! Wizards never persist sessions themselves. They read and write a nested
//! JSON structure through [`SessionBackend`] and call
//! [`SessionBackend::mark_changed`] after every mutation so the surrounding
//! session middleware knows the session must be saved.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Mapping-style session contract
///
/// Implementations are not expected to track mutations made through
/// [`get_mut`](SessionBackend::get_mut) or [`setdefault`](SessionBackend::setdefault);
/// callers report them with [`mark_changed`](SessionBackend::mark_changed).
pub trait SessionBackend: Send + Sync {
	/// Get a value from the session
	fn get(&self, key: &str) -> Option<&Value>;

	/// Get a mutable reference to a value in the session
	fn get_mut(&mut self, key: &str) -> Option<&mut Value>;

	/// Set a value in the session
	fn set(&mut self, key: &str, value: Value);

	/// Remove a value from the session
	fn remove(&mut self, key: &str) -> Option<Value>;

	/// Return the value under `key`, inserting `default` first if absent
	fn setdefault(&mut self, key: &str, default: Value) -> &mut Value;

	/// Flag the session as modified
	fn mark_changed(&mut self);

	/// Whether the session has been flagged as modified
	fn is_changed(&self) -> bool;
}

/// In-memory session data
///
/// # Examples
///
/// ```
/// use reinhardt_formwizard::session::{Session, SessionBackend};
/// use serde_json::json;
///
/// let mut session = Session::new();
/// session.set("user_id", json!("123"));
/// assert_eq!(session.get("user_id"), Some(&json!("123")));
/// assert!(session.is_changed());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	/// Session data as key-value pairs
	pub data: HashMap<String, Value>,
	#[serde(skip)]
	modified: bool,
}

impl Session {
	/// Create a new empty session
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a session from previously stored data, not flagged as modified
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formwizard::session::{Session, SessionBackend};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut data = HashMap::new();
	/// data.insert("theme".to_string(), json!("dark"));
	///
	/// let session = Session::from_data(data);
	/// assert_eq!(session.get("theme"), Some(&json!("dark")));
	/// assert!(!session.is_changed());
	/// ```
	pub fn from_data(data: HashMap<String, Value>) -> Self {
		Self {
			data,
			modified: false,
		}
	}

	/// Check if session is empty
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Reset the modified flag, typically after the session was saved
	pub fn reset_changed(&mut self) {
		self.modified = false;
	}
}

impl SessionBackend for Session {
	fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.data.get_mut(key)
	}

	fn set(&mut self, key: &str, value: Value) {
		self.data.insert(key.to_string(), value);
		self.modified = true;
	}

	fn remove(&mut self, key: &str) -> Option<Value> {
		let removed = self.data.remove(key);
		if removed.is_some() {
			self.modified = true;
		}
		removed
	}

	fn setdefault(&mut self, key: &str, default: Value) -> &mut Value {
		self.data.entry(key.to_string()).or_insert(default)
	}

	fn mark_changed(&mut self) {
		self.modified = true;
	}

	fn is_changed(&self) -> bool {
		self.modified
	}
}
