//! List, form and delete screens of an object admin

use crate::admin::ObjectAdmin;
use crate::config::OrderDirection;
use crate::crud::CrudBackable;
use crate::field::{AdminObject, FieldValue};
use crate::pagination::Pager;
use crate::store::ObjectStore;
use dashed_core::{
	AdminError, AdminModule, AdminRequest, AdminResponse, AdminResult, Handler, Notice, Params,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Query parameter holding the search text
pub const SEARCH_PARAM: &str = "search";
/// Query parameter holding the list field to order by
pub const ORDER_FIELD_PARAM: &str = "orderby";
/// Query parameter holding the order direction
pub const ORDER_DIR_PARAM: &str = "orderdir";
/// Route parameter holding the page number
pub const PAGE_PARAM: &str = "page";
/// Route parameter holding the primary key
pub const PK_PARAM: &str = "pk";

fn list_url(module: &AdminModule, args: Params) -> AdminResult<String> {
	module.url_for("list", args)
}

/// Object list with search, ordering and pagination
pub struct ListView<S: ObjectStore> {
	admin: Arc<ObjectAdmin<S>>,
}

impl<S: ObjectStore> ListView<S> {
	pub fn new(admin: Arc<ObjectAdmin<S>>) -> Self {
		Self { admin }
	}

	fn page(request: &AdminRequest) -> AdminResult<u64> {
		match request.param(PAGE_PARAM) {
			None => Ok(1),
			Some(raw) => raw
				.parse::<u64>()
				.ok()
				.filter(|page| *page >= 1)
				.ok_or_else(|| AdminError::BadRequest(format!("invalid page '{raw}'"))),
		}
	}

	fn ordering(&self, request: &AdminRequest) -> AdminResult<(Option<String>, Option<OrderDirection>)> {
		let field = request.query_param(ORDER_FIELD_PARAM);
		if let Some(field) = field
			&& self.admin.config().list_field(field).is_none()
		{
			return Err(AdminError::BadRequest(format!("cannot order by '{field}'")));
		}
		let direction = match request.query_param(ORDER_DIR_PARAM) {
			Some(raw) => Some(raw.parse::<OrderDirection>().map_err(AdminError::BadRequest)?),
			None => field.map(|_| OrderDirection::Asc),
		};
		Ok((field.map(str::to_string), direction))
	}
}

impl<S: ObjectStore> Handler for ListView<S> {
	fn handle(&self, module: &AdminModule, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let admin = &self.admin;
		let config = admin.config();

		let page = Self::page(request)?;
		let (order_field, order_direction) = self.ordering(request)?;
		let search = request.query_param(SEARCH_PARAM);

		let count = admin.count(search)?;
		let pager = Pager::new(count, config.per_page(), page);
		if page > 1 && page > pager.total_pages() {
			return Err(AdminError::NotFound(format!("page {page}")));
		}

		let objects = admin.list(
			search,
			order_field.as_deref(),
			order_direction,
			usize::try_from(pager.offset()).unwrap_or(usize::MAX),
			Some(config.per_page()),
		)?;

		let mut rows = Vec::with_capacity(objects.len());
		for object in &objects {
			let values: Vec<FieldValue> = config
				.list_fields()
				.values()
				.map(|field| field.column.resolve(object).unwrap_or(FieldValue::Null))
				.collect();
			rows.push(json!({
				"pk": object.pk(),
				"values": values,
				"actions": admin.actions_for(module, object)?,
			}));
		}

		let mut columns = Vec::with_capacity(config.list_fields().len());
		for (name, field) in config.list_fields() {
			let sorted = (order_field.as_deref() == Some(name.as_str()))
				.then_some(order_direction)
				.flatten();
			let next_direction = sorted.map(OrderDirection::reversed).unwrap_or_default();
			let mut args = request.compute_args([
				(ORDER_FIELD_PARAM, name.as_str()),
				(ORDER_DIR_PARAM, next_direction.as_str()),
			]);
			args.shift_remove(PAGE_PARAM);
			columns.push(json!({
				"name": name,
				"label": field.label,
				"sorted": sorted,
				"sort_url": list_url(module, args)?,
			}));
		}

		let mut pages = Vec::new();
		for entry in pager.iter_pages(admin.page_window()) {
			pages.push(match entry {
				Some(number) => {
					let number = number.to_string();
					json!({
						"number": number,
						"current": number == page.to_string(),
						"url": list_url(module, request.compute_args([(PAGE_PARAM, number.as_str())]))?,
					})
				}
				None => Value::Null,
			});
		}
		let neighbour_url = |target: u64| {
			let target = target.to_string();
			list_url(module, request.compute_args([(PAGE_PARAM, target.as_str())]))
		};
		let previous_url = if pager.has_previous() { Some(neighbour_url(page - 1)?) } else { None };
		let next_url = if pager.has_next() { Some(neighbour_url(page + 1)?) } else { None };

		Ok(AdminResponse::render(
			config.list_template(),
			json!({
				"module": module.context(),
				"title": config.list_title(),
				"columns": columns,
				"rows": rows,
				"count": count,
				"page": page,
				"total_pages": pager.total_pages(),
				"pages": pages,
				"previous_url": previous_url,
				"next_url": next_url,
				"search": search,
				"orderby": order_field,
				"orderdir": order_direction,
				"new_url": module.action_url("new").ok(),
			}),
		))
	}
}

/// Create and edit screen
///
/// Without a `pk` route parameter the object comes from `create`; with one it
/// is fetched and a missing object is a 404. A valid POST saves once and
/// redirects; an invalid POST re-renders with the errors and never saves.
pub struct FormView<S: ObjectStore> {
	admin: Arc<ObjectAdmin<S>>,
}

impl<S: ObjectStore> FormView<S> {
	pub fn new(admin: Arc<ObjectAdmin<S>>) -> Self {
		Self { admin }
	}
}

impl<S: ObjectStore> Handler for FormView<S> {
	fn handle(&self, module: &AdminModule, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let admin = &self.admin;
		let pk = request.param(PK_PARAM).map(str::to_string);
		let mut object = match &pk {
			Some(pk) => admin
				.get(pk)?
				.ok_or_else(|| AdminError::NotFound(format!("object '{pk}'")))?,
			None => admin.create(),
		};
		let is_new = pk.is_none();

		let mut form = admin.form_for(&object);
		if request.is_post() {
			form.bind(&request.form);
			if form.validate() {
				form.populate(&mut object);
				admin.save(&mut object)?;
				request
					.messages
					.notify(if is_new { Notice::Created } else { Notice::Updated });
				let target = request.next_or(module.action_url("list")?);
				return Ok(AdminResponse::redirect(target));
			}
			tracing::debug!(pk = ?pk, errors = form.errors().len(), "form validation failed");
			request.messages.notify(Notice::ValidationFailed);
		}

		let config = admin.config();
		Ok(AdminResponse::render(
			config.edit_template(),
			json!({
				"module": module.context(),
				"title": if is_new { config.new_title() } else { config.edit_title() },
				"is_new": is_new,
				"pk": pk,
				"form": form.context(),
				"errors": form.errors(),
			}),
		))
	}
}

/// Single-step delete
pub struct DeleteView<S: ObjectStore> {
	admin: Arc<ObjectAdmin<S>>,
}

impl<S: ObjectStore> DeleteView<S> {
	pub fn new(admin: Arc<ObjectAdmin<S>>) -> Self {
		Self { admin }
	}
}

impl<S: ObjectStore> Handler for DeleteView<S> {
	fn handle(&self, module: &AdminModule, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let pk = request
			.param(PK_PARAM)
			.ok_or_else(|| AdminError::NotFound("object without key".to_string()))?;
		let object = self
			.admin
			.get(pk)?
			.ok_or_else(|| AdminError::NotFound(format!("object '{pk}'")))?;

		self.admin.delete(&object)?;
		request.messages.notify(Notice::Deleted);
		let target = request.next_or(module.action_url("list")?);
		Ok(AdminResponse::redirect(target))
	}
}
