//! One-shot flash messages
//!
//! Views push messages onto the request; the host drains them into the next
//! rendered page (usually after a redirect) and they are gone afterwards.

use serde::Serialize;

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Debug,
	Info,
	Success,
	Warning,
	Error,
}

/// Outcome of an object workflow, reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
	Created,
	Updated,
	Deleted,
	ValidationFailed,
}

impl Notice {
	/// Severity the notice is shown with
	pub fn level(self) -> Level {
		match self {
			Notice::Created | Notice::Updated | Notice::Deleted => Level::Success,
			Notice::ValidationFailed => Level::Error,
		}
	}

	/// Default user-facing text
	pub fn text(self) -> &'static str {
		match self {
			Notice::Created => "Object successfully created",
			Notice::Updated => "Object successfully updated",
			Notice::Deleted => "Object successfully deleted",
			Notice::ValidationFailed => "Can't save object due to errors",
		}
	}
}

/// A flash message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
	pub level: Level,
	pub text: String,
	/// Workflow outcome this message reports, if any
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notice: Option<Notice>,
}

impl Message {
	/// Create a message with the given level
	pub fn new(level: Level, text: impl Into<String>) -> Self {
		Self {
			level,
			text: text.into(),
			notice: None,
		}
	}

	/// Create a success message
	pub fn success(text: impl Into<String>) -> Self {
		Self::new(Level::Success, text)
	}

	/// Create an error message
	pub fn error(text: impl Into<String>) -> Self {
		Self::new(Level::Error, text)
	}

	/// Create the message for a workflow outcome
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::messages::{Level, Message, Notice};
	///
	/// let message = Message::from_notice(Notice::Deleted);
	/// assert_eq!(message.level, Level::Success);
	/// assert_eq!(message.text, "Object successfully deleted");
	/// assert_eq!(message.notice, Some(Notice::Deleted));
	/// ```
	pub fn from_notice(notice: Notice) -> Self {
		Self {
			level: notice.level(),
			text: notice.text().to_string(),
			notice: Some(notice),
		}
	}
}

/// Messages queued during one request
#[derive(Debug, Clone, Default)]
pub struct Messages {
	queue: Vec<Message>,
}

impl Messages {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue a message
	pub fn add(&mut self, message: Message) {
		self.queue.push(message);
	}

	/// Queue the message for a workflow outcome
	pub fn notify(&mut self, notice: Notice) {
		self.add(Message::from_notice(notice));
	}

	/// Queued messages, oldest first, without consuming them
	pub fn iter(&self) -> impl Iterator<Item = &Message> {
		self.queue.iter()
	}

	/// Take every queued message; the container is empty afterwards
	pub fn drain(&mut self) -> Vec<Message> {
		std::mem::take(&mut self.queue)
	}

	/// Notices reported so far, in order
	pub fn notices(&self) -> Vec<Notice> {
		self.queue.iter().filter_map(|m| m.notice).collect()
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}
