//! Single form view
//!
//! [`FormView`] binds a schema to the request, builds a form, and either
//! shows it or validates the submitted fields, depending on which submit
//! button (if any) was pressed. Handlers are registered per button name when
//! the view is built.
//!
//! ```
//! use reinhardt_formwizard::{Button, FormView, Response, ViewResult};
//! # use reinhardt_formwizard::{BoundSchema, FieldValues, Form, FormOptions, Request, Schema, ValidationFailure};
//! # struct Contact;
//! # struct Bound;
//! # struct ContactForm(Vec<Button>);
//! # impl Schema for Contact {
//! #     fn name(&self) -> &str { "contact" }
//! #     fn bind(&self, _: &Request) -> Box<dyn BoundSchema> { Box::new(Bound) }
//! # }
//! # impl BoundSchema for Bound {
//! #     fn into_form(self: Box<Self>, buttons: Vec<Button>, _: &FormOptions) -> Box<dyn Form> {
//! #         Box::new(ContactForm(buttons))
//! #     }
//! # }
//! # impl Form for ContactForm {
//! #     fn buttons(&self) -> &[Button] { &self.0 }
//! #     fn validate(&mut self, _: &[(String, String)]) -> Result<FieldValues, ValidationFailure> {
//! #         Ok(FieldValues::new())
//! #     }
//! #     fn render(&self, _: Option<&FieldValues>) -> String { "<form></form>".to_string() }
//! # }
//!
//! let view = FormView::builder(&Contact)
//!     .button(Button::new("send", "Send"))
//!     .on_success("send", |_request, _data| {
//!         Ok(ViewResult::Response(Response::temporary_redirect("/thanks/")))
//!     })
//!     .build();
//!
//! let mut request = Request::builder().uri("/contact/").build().unwrap();
//! let result = view.call(&mut request).unwrap();
//! assert!(result.context().unwrap().contains_key("form"));
//! ```

use crate::error::{WizardError, WizardResult};
use crate::form::{Button, FieldValues, Form, FormOptions, Schema, ValidationFailure};
use crate::request::Request;
use crate::response::ViewResult;
use std::collections::HashMap;

/// Called with validated data when a button's submission validates
pub type SuccessHandler<'a> = Box<dyn Fn(&mut Request, FieldValues) -> WizardResult<ViewResult> + 'a>;

/// Called when a button's submission fails validation
pub type FailureHandler<'a> =
	Box<dyn Fn(&mut Request, ValidationFailure) -> WizardResult<ViewResult> + 'a>;

/// Called when no button was submitted
pub type ShowHandler<'a> = Box<dyn Fn(&mut Request, &dyn Form) -> WizardResult<ViewResult> + 'a>;

/// Customizes the form before it is used
pub type BeforeHook<'a> = Box<dyn Fn(&mut dyn Form) + 'a>;

#[derive(Default)]
struct ButtonHandlers<'a> {
	success: Option<SuccessHandler<'a>>,
	failure: Option<FailureHandler<'a>>,
}

/// Renders or validates one form
pub struct FormView<'a> {
	schema: &'a dyn Schema,
	buttons: Vec<Button>,
	options: FormOptions,
	handlers: HashMap<String, ButtonHandlers<'a>>,
	failure: FailureHandler<'a>,
	show: ShowHandler<'a>,
	before: Option<BeforeHook<'a>>,
}

impl<'a> FormView<'a> {
	pub fn builder(schema: &'a dyn Schema) -> FormViewBuilder<'a> {
		FormViewBuilder::new(schema)
	}

	/// Handle one request
	///
	/// The first form button whose name appears among the submitted fields
	/// selects the handlers. Context results are extended with the form's
	/// `js_links` and `css_links`.
	///
	/// # Errors
	///
	/// Returns [`WizardError::MissingHandler`] when the pressed button has no
	/// success handler, and propagates handler errors.
	pub fn call(&self, request: &mut Request) -> WizardResult<ViewResult> {
		let bound = self.schema.bind(request);
		let mut form = bound.into_form(self.buttons.clone(), &self.options);
		if let Some(before) = &self.before {
			before(&mut *form);
		}
		let resources = form.resources();

		let pressed = form
			.buttons()
			.iter()
			.find(|button| request.has_post_field(&button.name))
			.map(|button| button.name.clone());

		let result = match pressed {
			Some(name) => self.submit(request, &mut *form, &name)?,
			None => (self.show)(request, &*form)?,
		};

		Ok(match result {
			ViewResult::Context(mut context) => {
				resources.insert_into(&mut context);
				ViewResult::Context(context)
			}
			response => response,
		})
	}

	fn submit(&self, request: &mut Request, form: &mut dyn Form, button: &str) -> WizardResult<ViewResult> {
		let handlers = self.handlers.get(button);
		let success = handlers
			.and_then(|h| h.success.as_ref())
			.ok_or_else(|| WizardError::MissingHandler(button.to_string()))?;

		match form.validate(request.post()) {
			Ok(validated) => {
				tracing::debug!(schema = %self.schema.name(), button, "form validated");
				success(request, validated)
			}
			Err(failure) => {
				tracing::debug!(schema = %self.schema.name(), button, %failure, "form validation failed");
				let fail = handlers
					.and_then(|h| h.failure.as_ref())
					.unwrap_or(&self.failure);
				fail(request, failure)
			}
		}
	}
}

/// Builder for [`FormView`]
pub struct FormViewBuilder<'a> {
	view: FormView<'a>,
}

impl<'a> FormViewBuilder<'a> {
	fn new(schema: &'a dyn Schema) -> Self {
		Self {
			view: FormView {
				schema,
				buttons: Vec::new(),
				options: FormOptions::default(),
				handlers: HashMap::new(),
				failure: Box::new(|_: &mut Request, failure: ValidationFailure| {
					Ok(ViewResult::form(failure.render()))
				}),
				show: Box::new(|_: &mut Request, form: &dyn Form| {
					Ok(ViewResult::form(form.render(None)))
				}),
				before: None,
			},
		}
	}

	pub fn button(mut self, button: Button) -> Self {
		self.view.buttons.push(button);
		self
	}

	pub fn buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
		self.view.buttons.extend(buttons);
		self
	}

	pub fn options(mut self, options: FormOptions) -> Self {
		self.view.options = options;
		self
	}

	/// Register the success handler of a button
	pub fn on_success<F>(mut self, button: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&mut Request, FieldValues) -> WizardResult<ViewResult> + 'a,
	{
		self.view.handlers.entry(button.into()).or_default().success = Some(Box::new(handler));
		self
	}

	/// Register the failure handler of a button
	pub fn on_failure<F>(mut self, button: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&mut Request, ValidationFailure) -> WizardResult<ViewResult> + 'a,
	{
		self.view.handlers.entry(button.into()).or_default().failure = Some(Box::new(handler));
		self
	}

	/// Replace the failure handler used by buttons without their own
	pub fn failure<F>(mut self, handler: F) -> Self
	where
		F: Fn(&mut Request, ValidationFailure) -> WizardResult<ViewResult> + 'a,
	{
		self.view.failure = Box::new(handler);
		self
	}

	/// Replace the handler used when no button was submitted
	pub fn show<F>(mut self, handler: F) -> Self
	where
		F: Fn(&mut Request, &dyn Form) -> WizardResult<ViewResult> + 'a,
	{
		self.view.show = Box::new(handler);
		self
	}

	pub fn before<F>(mut self, hook: F) -> Self
	where
		F: Fn(&mut dyn Form) + 'a,
	{
		self.view.before = Some(Box::new(hook));
		self
	}

	pub fn build(self) -> FormView<'a> {
		self.view
	}
}
