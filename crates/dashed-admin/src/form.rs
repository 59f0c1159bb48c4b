//! Form collaborator of the create and edit screens
//!
//! Forms are opaque to the admin: it binds submitted data, asks whether the
//! data is valid, copies it into the object and hands a render context to
//! the template.

use dashed_core::Params;
use indexmap::IndexMap;
use serde_json::Value;

/// Validation messages keyed by field name
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// A form bound to one object
pub trait ObjectForm<T>: Send {
	/// Replace the form data with submitted values
	fn bind(&mut self, data: &Params);

	/// Validate the bound data, recording field errors
	fn validate(&mut self) -> bool;

	fn errors(&self) -> &FieldErrors;

	/// Copy validated data into `object`
	fn populate(&self, object: &mut T);

	/// Field values for rendering
	fn context(&self) -> Value;
}

/// Produces a form initially filled from an object
///
/// Any `Fn(&T) -> impl ObjectForm<T>` is a factory.
pub trait FormFactory<T>: Send + Sync {
	fn form_for(&self, object: &T) -> Box<dyn ObjectForm<T>>;
}

impl<T, F, Form> FormFactory<T> for F
where
	F: Fn(&T) -> Form + Send + Sync,
	Form: ObjectForm<T> + 'static,
{
	fn form_for(&self, object: &T) -> Box<dyn ObjectForm<T>> {
		Box::new(self(object))
	}
}
