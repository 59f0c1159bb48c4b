//! # dashed-conf
//!
//! Settings for the dashed admin panel.
//!
//! Settings are layered: built-in defaults, then TOML files or strings, then
//! environment variables prefixed with `DASHED_`. Nested tables are addressed
//! in the environment with a double underscore (`DASHED_PAGINATION__LEFT_EDGE`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use dashed_conf::AdminSettings;
//!
//! let settings = AdminSettings::builder()
//!     .add_toml_file("dashed.toml")
//!     .add_env()
//!     .build()
//!     .expect("invalid admin settings");
//! ```

pub mod settings;
pub mod sources;

pub use settings::{AdminSettings, ENV_PREFIX, PageWindowSettings, SettingsBuilder, SettingsError};
pub use sources::{ConfigSource, SourceError};
