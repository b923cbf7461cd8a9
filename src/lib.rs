//! # Reinhardt Form Wizard
//!
//! Form views and session-backed multi-step form wizards.
//!
//! This crate sits between the request layer and a form library. It does not
//! define fields, validate values or render widgets; the form library does
//! that behind the [`Schema`], [`BoundSchema`] and [`Form`] traits. What it
//! adds is the flow around forms:
//!
//! - [`FormView`] shows a form, or validates it when one of its submit
//!   buttons was pressed and dispatches to that button's handlers
//! - [`FormWizard`] chains several forms into steps, keeping each step's
//!   answers in the session until the last step is submitted
//! - [`FormWizard::get_summary`] lists the steps with direct-navigation URLs
//!
//! ## Wizard state
//!
//! Wizard progress lives in the session under
//! [`WizardSettings::session_key`], one record per wizard name. Sessions are
//! accessed through [`SessionBackend`], so any store that can expose its data
//! as JSON values can back a wizard. See [`state`] for the record layout.
//!
//! ## Example
//!
//! ```
//! use reinhardt_formwizard::{FormWizard, Request, Response, Schema, ViewResult};
//! # use reinhardt_formwizard::{BoundSchema, Button, FieldValues, Form, FormOptions, ValidationFailure};
//! # use std::sync::Arc;
//! # struct Account;
//! # struct Bound;
//! # struct AccountForm(Vec<Button>);
//! # impl Schema for Account {
//! #     fn name(&self) -> &str { "account" }
//! #     fn bind(&self, _: &Request) -> Box<dyn BoundSchema> { Box::new(Bound) }
//! # }
//! # impl BoundSchema for Bound {
//! #     fn into_form(self: Box<Self>, buttons: Vec<Button>, _: &FormOptions) -> Box<dyn Form> {
//! #         Box::new(AccountForm(buttons))
//! #     }
//! # }
//! # impl Form for AccountForm {
//! #     fn buttons(&self) -> &[Button] { &self.0 }
//! #     fn validate(&mut self, _: &[(String, String)]) -> Result<FieldValues, ValidationFailure> {
//! #         Ok(FieldValues::new())
//! #     }
//! #     fn render(&self, _: Option<&FieldValues>) -> String { "<form></form>".to_string() }
//! # }
//!
//! let wizard = FormWizard::new(
//!     "signup",
//!     |_request, states| {
//!         assert!(states.contains_key("account"));
//!         Ok(ViewResult::Response(Response::temporary_redirect("/welcome/")))
//!     },
//!     vec![Arc::new(Account) as Arc<dyn Schema>],
//! );
//!
//! let mut request = Request::builder().uri("/signup/").build().unwrap();
//! let first_visit = wizard.call(&mut request).unwrap();
//! assert!(first_visit.context().is_some());
//! ```

pub mod error;
pub mod form;
pub mod request;
pub mod resources;
pub mod response;
pub mod session;
pub mod settings;
pub mod state;
pub mod view;
pub mod wizard;

pub use error::{WizardError, WizardResult};
pub use form::{Button, BoundSchema, FieldValues, Form, FormOptions, Schema, ValidationFailure};
pub use request::{Request, RequestBuilder};
pub use resources::Resources;
pub use response::{Context, Response, ViewResult};
pub use session::{Session, SessionBackend};
pub use settings::{ButtonLabels, WizardSettings};
pub use state::{StepStates, WizardState};
pub use view::{FormView, FormViewBuilder};
pub use wizard::{FormWizard, FormWizardView, NEXT, PREVIOUS, StepSummary, step_values};
