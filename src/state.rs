//! Session-backed wizard state
//!
//! Each wizard keeps one record in the session, nested under
//! [`WizardSettings::session_key`] and keyed by wizard name:
//!
//! ```json
//! {
//!     "reinhardt_formwizard.wizards": {
//!         "signup": {
//!             "step": 1,
//!             "states": {
//!                 "0": {"username": "alice"},
//!                 "account": {"username": "alice"}
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! Step data is written under both the step ordinal and the schema name, so
//! it can be looked up either way.

use crate::error::{WizardError, WizardResult};
use crate::form::FieldValues;
use crate::request::Request;
use crate::settings::WizardSettings;
use serde_json::{Map, Value};

const STEP_KEY: &str = "step";
const STATES_KEY: &str = "states";

/// Captured data of every completed step, keyed by ordinal and by name
pub type StepStates = Map<String, Value>;

/// Reads and writes one wizard's record in the request session
///
/// A `WizardState` borrows the request for as long as it is used; handlers
/// create one per operation.
pub struct WizardState<'a> {
	request: &'a mut Request,
	wizard_name: &'a str,
	settings: &'a WizardSettings,
}

impl<'a> WizardState<'a> {
	pub fn new(request: &'a mut Request, wizard_name: &'a str, settings: &'a WizardSettings) -> Self {
		Self {
			request,
			wizard_name,
			settings,
		}
	}

	/// This wizard's record, created empty if absent
	pub fn get_wizard_data(&mut self) -> &mut Map<String, Value> {
		let session = self.request.session_mut();
		let exists = session
			.get(&self.settings.session_key)
			.and_then(|wizards| wizards.get(self.wizard_name))
			.is_some_and(Value::is_object);
		if !exists {
			tracing::debug!(wizard = %self.wizard_name, "initializing wizard session record");
			session.mark_changed();
		}

		let wizards = as_object_mut(session.setdefault(&self.settings.session_key, empty_object()));
		as_object_mut(
			wizards
				.entry(self.wizard_name.to_string())
				.or_insert_with(empty_object),
		)
	}

	/// Current step, honoring a step override in the query string
	///
	/// An override is persisted as the new current step.
	///
	/// # Errors
	///
	/// Returns [`WizardError::InvalidStep`] if the override is not a
	/// non-negative integer.
	pub fn get_step_num(&mut self) -> WizardResult<usize> {
		if let Some(raw) = self.request.query_param(&self.settings.step_param) {
			let raw = raw.to_string();
			let step = raw
				.trim()
				.parse::<usize>()
				.map_err(|source| WizardError::InvalidStep { value: raw, source })?;
			self.set_step_num(step);
			return Ok(step);
		}

		Ok(self.stored_step_num())
	}

	fn stored_step_num(&mut self) -> usize {
		let wizard_name = self.wizard_name;
		match self.get_wizard_data().get(STEP_KEY) {
			None => 0,
			Some(value) => match value.as_u64().and_then(|n| usize::try_from(n).ok()) {
				Some(step) => step,
				None => {
					tracing::warn!(wizard = %wizard_name, step = %value, "ignoring malformed stored step");
					0
				}
			},
		}
	}

	pub fn set_step_num(&mut self, num: usize) {
		self.get_wizard_data()
			.insert(STEP_KEY.to_string(), Value::from(num));
		self.request.session_mut().mark_changed();
	}

	/// Captured data of all steps, created empty if absent
	pub fn get_step_states(&mut self) -> &mut StepStates {
		let wizard = self.get_wizard_data();
		as_object_mut(
			wizard
				.entry(STATES_KEY.to_string())
				.or_insert_with(empty_object),
		)
	}

	/// Captured data of the current step, empty if the step was not completed
	pub fn get_step_state(&mut self) -> WizardResult<FieldValues> {
		let step = self.get_step_num()?;
		Ok(self
			.get_step_states()
			.get(&step.to_string())
			.and_then(Value::as_object)
			.cloned()
			.unwrap_or_default())
	}

	/// Record step data under both the ordinal `num` and the schema `name`
	pub fn set_step_state(&mut self, num: usize, name: &str, state: FieldValues) {
		let states = self.get_step_states();
		states.insert(num.to_string(), Value::Object(state.clone()));
		states.insert(name.to_string(), Value::Object(state));
		self.request.session_mut().mark_changed();
	}

	/// Record step data for the current step
	pub fn set_state(&mut self, name: &str, state: FieldValues) -> WizardResult<()> {
		let step = self.get_step_num()?;
		self.set_step_state(step, name, state);
		Ok(())
	}

	/// Move one step forward
	///
	/// # Errors
	///
	/// Returns [`WizardError::StepOutOfRange`] if the current step is
	/// `usize::MAX`; the stored step is left unchanged.
	pub fn increment_step(&mut self) -> WizardResult<()> {
		let step = self.get_step_num()?;
		let next = step
			.checked_add(1)
			.ok_or(WizardError::StepOutOfRange { step })?;
		self.set_step_num(next);
		Ok(())
	}

	/// Move one step back; a no-op on the first step
	pub fn decrement_step(&mut self) -> WizardResult<()> {
		let step = self.get_step_num()?;
		if step > 0 {
			self.set_step_num(step - 1);
		}
		Ok(())
	}

	/// Forget everything recorded for this wizard
	///
	/// The session is only flagged as changed when the record held data.
	pub fn clear(&mut self) {
		let session = self.request.session_mut();
		let cleared = match session
			.get_mut(&self.settings.session_key)
			.and_then(|wizards| wizards.get_mut(self.wizard_name))
		{
			Some(Value::Object(record)) if record.is_empty() => false,
			Some(record) => {
				*record = empty_object();
				true
			}
			None => false,
		};

		if cleared {
			tracing::debug!(wizard = %self.wizard_name, "cleared wizard session record");
			session.mark_changed();
		}
	}
}

fn empty_object() -> Value {
	Value::Object(Map::new())
}

/// View `value` as an object, replacing anything else with an empty object
fn as_object_mut(value: &mut Value) -> &mut Map<String, Value> {
	match value {
		Value::Object(map) => map,
		other => {
			*other = empty_object();
			as_object_mut(other)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{Session, SessionBackend};
	use proptest::prelude::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	const WIZARD: &str = "signup";

	#[fixture]
	fn settings() -> WizardSettings {
		WizardSettings::default()
	}

	fn make_request(uri: &str, session: Session) -> Request {
		Request::builder().uri(uri).session(session).build().unwrap()
	}

	fn session_with_record(record: Value) -> Session {
		let mut session = Session::new();
		let mut wizards = Map::new();
		wizards.insert(WIZARD.to_string(), record);
		session.set(crate::settings::DEFAULT_SESSION_KEY, Value::Object(wizards));
		session.reset_changed();
		session
	}

	fn record(request: &Request) -> Option<&Value> {
		request
			.session()
			.get(crate::settings::DEFAULT_SESSION_KEY)
			.and_then(|w| w.get(WIZARD))
	}

	fn values(value: Value) -> FieldValues {
		value.as_object().cloned().unwrap()
	}

	#[rstest]
	fn test_get_wizard_data_creates_record(settings: WizardSettings) {
		let mut request = make_request("/", Session::new());

		let mut state = WizardState::new(&mut request, WIZARD, &settings);
		assert!(state.get_wizard_data().is_empty());

		assert_eq!(record(&request), Some(&json!({})));
		assert!(request.session().is_changed());
	}

	#[rstest]
	fn test_get_wizard_data_existing_record_is_not_a_change(settings: WizardSettings) {
		let mut request = make_request("/", session_with_record(json!({"step": 1})));

		let mut state = WizardState::new(&mut request, WIZARD, &settings);
		assert_eq!(state.get_wizard_data().get("step"), Some(&json!(1)));
		assert!(!request.session().is_changed());
	}

	#[rstest]
	fn test_get_wizard_data_replaces_malformed_record(settings: WizardSettings) {
		let mut request = make_request("/", session_with_record(json!("garbage")));

		WizardState::new(&mut request, WIZARD, &settings).get_wizard_data();

		assert_eq!(record(&request), Some(&json!({})));
		assert!(request.session().is_changed());
	}

	#[rstest]
	fn test_step_defaults_to_zero(settings: WizardSettings) {
		let mut request = make_request("/", Session::new());
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		assert_eq!(state.get_step_num().unwrap(), 0);
	}

	#[rstest]
	fn test_stored_step(settings: WizardSettings) {
		let mut request = make_request("/", session_with_record(json!({"step": 2})));
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		assert_eq!(state.get_step_num().unwrap(), 2);
	}

	#[rstest]
	fn test_query_override_wins_and_persists(settings: WizardSettings) {
		let mut request = make_request("/?step=3", session_with_record(json!({"step": 1})));

		let step = WizardState::new(&mut request, WIZARD, &settings)
			.get_step_num()
			.unwrap();

		assert_eq!(step, 3);
		assert_eq!(record(&request).unwrap()["step"], json!(3));
		assert!(request.session().is_changed());
	}

	#[rstest]
	fn test_custom_step_param(settings: WizardSettings) {
		let settings = settings.with_step_param("page");
		let mut request = make_request("/?page=1&step=5", Session::new());

		let step = WizardState::new(&mut request, WIZARD, &settings)
			.get_step_num()
			.unwrap();
		assert_eq!(step, 1);
	}

	#[rstest]
	#[case("abc")]
	#[case("-1")]
	#[case("")]
	fn test_malformed_override_is_an_error(settings: WizardSettings, #[case] raw: &str) {
		let uri = format!("/?step={}", raw);
		let mut request = make_request(&uri, session_with_record(json!({"step": 1})));

		let result = WizardState::new(&mut request, WIZARD, &settings).get_step_num();

		assert!(matches!(result, Err(WizardError::InvalidStep { .. })));
		assert_eq!(record(&request).unwrap()["step"], json!(1));
	}

	#[rstest]
	fn test_malformed_stored_step_falls_back_to_zero(settings: WizardSettings) {
		let mut request = make_request("/", session_with_record(json!({"step": "two"})));
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		assert_eq!(state.get_step_num().unwrap(), 0);
	}

	#[rstest]
	fn test_set_step_state_writes_both_keys(settings: WizardSettings) {
		let mut request = make_request("/", Session::new());
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		state.set_step_state(0, "account", values(json!({"username": "alice"})));

		let states = state.get_step_states();
		assert_eq!(states["0"], json!({"username": "alice"}));
		assert_eq!(states["account"], json!({"username": "alice"}));
		assert!(request.session().is_changed());
	}

	#[rstest]
	fn test_set_state_uses_current_step(settings: WizardSettings) {
		let mut request = make_request("/?step=1", Session::new());
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		state
			.set_state("contact", values(json!({"email": "a@example.com"})))
			.unwrap();

		let states = state.get_step_states();
		assert_eq!(states["1"], json!({"email": "a@example.com"}));
		assert_eq!(states["contact"], json!({"email": "a@example.com"}));
	}

	#[rstest]
	fn test_get_step_state(settings: WizardSettings) {
		let mut request = make_request(
			"/",
			session_with_record(json!({
				"step": 0,
				"states": {"0": {"username": "alice"}, "account": {"username": "alice"}}
			})),
		);
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		assert_eq!(state.get_step_state().unwrap(), values(json!({"username": "alice"})));

		state.set_step_num(1);
		assert!(state.get_step_state().unwrap().is_empty());
	}

	#[rstest]
	fn test_increment_and_decrement(settings: WizardSettings) {
		let mut request = make_request("/", Session::new());
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		state.increment_step().unwrap();
		state.increment_step().unwrap();
		assert_eq!(state.get_step_num().unwrap(), 2);

		state.decrement_step().unwrap();
		assert_eq!(state.get_step_num().unwrap(), 1);
	}

	#[rstest]
	fn test_decrement_at_zero_is_noop(settings: WizardSettings) {
		let mut request = make_request("/", session_with_record(json!({"step": 0})));
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		state.decrement_step().unwrap();

		assert_eq!(state.get_step_num().unwrap(), 0);
		assert!(!request.session().is_changed());
	}

	#[rstest]
	fn test_increment_from_override(settings: WizardSettings) {
		let mut request = make_request("/?step=4", Session::new());
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		state.increment_step().unwrap();

		drop(state);
		assert_eq!(record(&request).unwrap()["step"], json!(5));
	}

	#[rstest]
	fn test_increment_at_largest_step_is_an_error(settings: WizardSettings) {
		let mut request = make_request(&format!("/?step={}", usize::MAX), Session::new());
		let mut state = WizardState::new(&mut request, WIZARD, &settings);

		let result = state.increment_step();

		assert!(matches!(
			result,
			Err(WizardError::StepOutOfRange { step }) if step == usize::MAX
		));
		drop(state);
		assert_eq!(record(&request).unwrap()["step"], json!(usize::MAX));
	}

	#[rstest]
	fn test_clear_removes_data(settings: WizardSettings) {
		let mut request = make_request(
			"/",
			session_with_record(json!({"step": 1, "states": {"0": {}}})),
		);

		WizardState::new(&mut request, WIZARD, &settings).clear();

		assert_eq!(record(&request), Some(&json!({})));
		assert!(request.session().is_changed());
	}

	#[rstest]
	fn test_clear_empty_record_is_not_a_change(settings: WizardSettings) {
		let mut request = make_request("/", session_with_record(json!({})));
		WizardState::new(&mut request, WIZARD, &settings).clear();
		assert!(!request.session().is_changed());

		let mut request = make_request("/", Session::new());
		WizardState::new(&mut request, WIZARD, &settings).clear();
		assert!(!request.session().is_changed());
		assert!(
			WizardState::new(&mut request, WIZARD, &settings)
				.get_wizard_data()
				.is_empty()
		);
	}

	#[rstest]
	fn test_wizards_are_isolated(settings: WizardSettings) {
		let mut request = make_request("/", Session::new());

		WizardState::new(&mut request, "signup", &settings).set_step_num(2);
		WizardState::new(&mut request, "checkout", &settings).set_step_num(1);
		WizardState::new(&mut request, "checkout", &settings).clear();

		assert_eq!(
			WizardState::new(&mut request, "signup", &settings)
				.get_step_num()
				.unwrap(),
			2
		);
		assert_eq!(
			WizardState::new(&mut request, "checkout", &settings)
				.get_step_num()
				.unwrap(),
			0
		);
	}

	proptest! {
		#[test]
		fn prop_step_never_below_zero(moves in proptest::collection::vec(any::<bool>(), 0..40)) {
			let settings = WizardSettings::default();
			let mut request = make_request("/", Session::new());
			let mut state = WizardState::new(&mut request, WIZARD, &settings);
			let mut expected: usize = 0;

			for forward in moves {
				if forward {
					state.increment_step().unwrap();
					expected += 1;
				} else {
					state.decrement_step().unwrap();
					expected = expected.saturating_sub(1);
				}
				prop_assert_eq!(state.get_step_num().unwrap(), expected);
			}
		}
	}
}
