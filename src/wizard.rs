//! Multi-step form wizards
//!
//! A [`FormWizard`] is an ordered list of schemas. Each request shows or
//! validates the schema of the current step; completed steps are kept in the
//! session through [`WizardState`] until the last step is submitted, at which
//! point the finalize callback receives everything collected.
//!
//! Navigation:
//!
//! - `next` with valid data records the step and advances;
//! - `next` with invalid data redisplays the step with errors;
//! - `previous` records valid data and goes back one step;
//! - `previous` with invalid data goes back anyway, dropping the input;
//! - a `step` query parameter jumps directly to a step.
//!
//! Successful transitions answer with a 302 redirect to the same URL so the
//! next request resolves the new step.

use crate::error::WizardResult;
use crate::form::{Button, FieldValues, Form, FormOptions, Schema, ValidationFailure};
use crate::request::Request;
use crate::response::{Response, ViewResult};
use crate::settings::WizardSettings;
use crate::state::{StepStates, WizardState};
use crate::view::FormView;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Name of the button moving back one step
pub const PREVIOUS: &str = "previous";

/// Name of the button moving forward, or finishing on the last step
pub const NEXT: &str = "next";

/// Called once every step is complete
pub type DoneCallback =
	Box<dyn Fn(&mut Request, &StepStates) -> WizardResult<ViewResult> + Send + Sync>;

/// Definition of a multi-step wizard
pub struct FormWizard {
	name: String,
	schemas: Vec<Arc<dyn Schema>>,
	done: DoneCallback,
	settings: WizardSettings,
	form_options: FormOptions,
}

impl FormWizard {
	/// Create a wizard
	///
	/// `name` must be unique among the wizards sharing a session.
	pub fn new<F>(name: impl Into<String>, done: F, schemas: Vec<Arc<dyn Schema>>) -> Self
	where
		F: Fn(&mut Request, &StepStates) -> WizardResult<ViewResult> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			schemas,
			done: Box::new(done),
			settings: WizardSettings::default(),
			form_options: FormOptions::default(),
		}
	}

	pub fn with_settings(mut self, settings: WizardSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Options used when building every step's form
	pub fn with_form_options(mut self, options: FormOptions) -> Self {
		self.form_options = options;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn schemas(&self) -> &[Arc<dyn Schema>] {
		&self.schemas
	}

	pub fn len(&self) -> usize {
		self.schemas.len()
	}

	pub fn is_empty(&self) -> bool {
		self.schemas.is_empty()
	}

	pub fn settings(&self) -> &WizardSettings {
		&self.settings
	}

	pub fn form_options(&self) -> &FormOptions {
		&self.form_options
	}

	/// Handle one request with a fresh [`FormWizardView`]
	pub fn call(&self, request: &mut Request) -> WizardResult<ViewResult> {
		FormWizardView::new(self).dispatch(request)
	}

	/// Step metadata with direct-navigation URLs, for progress indicators
	pub fn get_summary(&self, request: &Request) -> Vec<StepSummary> {
		let path_url = request.path_url();
		self.schemas
			.iter()
			.enumerate()
			.map(|(num, schema)| StepSummary {
				num,
				name: schema.name().to_string(),
				title: schema.title().to_string(),
				desc: schema.description().to_string(),
				url: format!("{}?{}={}", path_url, self.settings.step_param, num),
			})
			.collect()
	}
}

/// One entry of [`FormWizard::get_summary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
	pub num: usize,
	pub name: String,
	pub title: String,
	pub desc: String,
	pub url: String,
}

/// Drives one request through a wizard
pub struct FormWizardView<'w> {
	wizard: &'w FormWizard,
}

impl<'w> FormWizardView<'w> {
	pub fn new(wizard: &'w FormWizard) -> Self {
		Self { wizard }
	}

	fn state<'r>(&'r self, request: &'r mut Request) -> WizardState<'r> {
		WizardState::new(request, &self.wizard.name, &self.wizard.settings)
	}

	/// Resolve the current step and handle the request for it
	///
	/// Once the step is past the last schema, the finalize callback runs with
	/// all collected step data and the wizard's session record is cleared.
	pub fn dispatch(&self, request: &mut Request) -> WizardResult<ViewResult> {
		let step = self.state(request).get_step_num()?;
		let schemas = &self.wizard.schemas;

		let Some(schema) = schemas.get(step) else {
			return self.finish(request);
		};

		tracing::debug!(wizard = %self.wizard.name, step, schema = %schema.name(), "dispatching wizard step");

		let labels = &self.wizard.settings.labels;
		let mut buttons = Vec::with_capacity(2);
		if step > 0 {
			buttons.push(Button::new(PREVIOUS, labels.previous.as_str()));
		}
		if step + 1 < schemas.len() {
			buttons.push(Button::new(NEXT, labels.next.as_str()));
		} else {
			buttons.push(Button::new(NEXT, labels.done.as_str()));
		}

		let schema_name = schema.name();
		FormView::builder(&**schema)
			.buttons(buttons)
			.options(self.wizard.form_options.clone())
			.on_success(NEXT, |request, validated| {
				self.next_success(request, schema_name, validated)
			})
			.on_success(PREVIOUS, |request, validated| {
				self.previous_success(request, schema_name, validated)
			})
			.on_failure(PREVIOUS, |request, failure| {
				self.previous_failure(request, failure)
			})
			.show(|request, form| self.show(request, form))
			.build()
			.call(request)
	}

	fn finish(&self, request: &mut Request) -> WizardResult<ViewResult> {
		let states = self.state(request).get_step_states().clone();
		tracing::info!(wizard = %self.wizard.name, steps = self.wizard.len(), "wizard complete");

		let result = (self.wizard.done)(request, &states)?;
		self.state(request).clear();
		Ok(result)
	}

	/// Display the step pre-populated with previously captured data
	fn show(&self, request: &mut Request, form: &dyn Form) -> WizardResult<ViewResult> {
		let state = self.state(request).get_step_state()?;
		Ok(ViewResult::form(form.render(Some(&state))))
	}

	fn next_success(
		&self,
		request: &mut Request,
		schema_name: &str,
		validated: FieldValues,
	) -> WizardResult<ViewResult> {
		let mut state = self.state(request);
		state.set_state(schema_name, validated)?;
		state.increment_step()?;
		tracing::debug!(wizard = %self.wizard.name, schema = %schema_name, "advanced wizard step");
		Ok(self.redirect(request))
	}

	fn previous_success(
		&self,
		request: &mut Request,
		schema_name: &str,
		validated: FieldValues,
	) -> WizardResult<ViewResult> {
		let mut state = self.state(request);
		state.set_state(schema_name, validated)?;
		state.decrement_step()?;
		tracing::debug!(wizard = %self.wizard.name, schema = %schema_name, "went back one wizard step");
		Ok(self.redirect(request))
	}

	/// Going back is not gated on validity; the invalid input is discarded
	fn previous_failure(
		&self,
		request: &mut Request,
		failure: ValidationFailure,
	) -> WizardResult<ViewResult> {
		tracing::debug!(wizard = %self.wizard.name, %failure, "went back one wizard step, discarding invalid input");
		self.state(request).decrement_step()?;
		Ok(self.redirect(request))
	}

	fn redirect(&self, request: &Request) -> ViewResult {
		ViewResult::Response(Response::temporary_redirect(request.path_url()))
	}
}

impl std::fmt::Debug for FormWizard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormWizard")
			.field("name", &self.name)
			.field(
				"schemas",
				&self.schemas.iter().map(|s| s.name()).collect::<Vec<_>>(),
			)
			.field("settings", &self.settings)
			.field("form_options", &self.form_options)
			.finish()
	}
}

/// Field values of a captured step, if it was completed
pub fn step_values<'s>(states: &'s StepStates, key: &str) -> Option<&'s FieldValues> {
	states.get(key).and_then(Value::as_object)
}
