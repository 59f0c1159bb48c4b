//! # dashed-admin
//!
//! Generic object admin for the dashed admin panel.
//!
//! An [`ObjectAdmin`] turns a collection behind an [`ObjectStore`] into the
//! usual four screens: a searchable, sortable and paginated list, a create
//! form, an edit form and a delete action. Forms are supplied by a
//! [`FormFactory`]; the admin only binds, validates and populates them.
//!
//! Default routes of an object admin mounted at `/books`:
//!
//! | pattern              | action   |
//! |----------------------|----------|
//! | `/books/`            | `list`   |
//! | `/books/page/<page>` | `list`   |
//! | `/books/new`         | `new`    |
//! | `/books/<pk>/edit`   | `edit`   |
//! | `/books/<pk>/delete` | `delete` |
//!
//! List screens read the `search`, `orderby` and `orderdir` query parameters.
//! Create, edit and delete redirect to the `next` query parameter when
//! present, otherwise to the list.

pub mod admin;
pub mod config;
pub mod crud;
pub mod field;
pub mod form;
pub mod pagination;
pub mod query;
pub mod store;
pub mod views;

pub use admin::ObjectAdmin;
pub use config::{
	EDIT_TEMPLATE, LIST_TEMPLATE, ListField, ObjectAdminConfig, ObjectAdminConfigBuilder, OrderBy,
	OrderDirection,
};
pub use crud::{CrudBackable, ObjectAction};
pub use field::{AdminObject, FieldPath, FieldValue};
pub use form::{FieldErrors, FormFactory, ObjectForm};
pub use pagination::{PageWindow, Pager};
pub use query::{ListQuery, QueryOrder, SearchFilter};
pub use store::ObjectStore;
pub use views::{DeleteView, FormView, ListView};
