//! # lens_core - Comparative View Engine
//!
//! `lens_core` is the state engine behind Factlens. It takes search results
//! grouped by attribute ("pro", "con", ...) and turns them into paged slides
//! whose summaries and articles are ranked and tinted by relevance, with one
//! summary at a time pinnable for comparison across attributes.
//!
//! ## Design Philosophy
//!
//! - **Explicit messages**: every change goes through [`viewer::Viewer::update`]
//! - **Injected time**: the page transition lock reads the `Instant` it is given
//! - **Serializable views**: render models implement `Serialize`, so any shell
//!   (terminal, web, tests) can consume them
//! - **Rich Errors**: fallible boundaries return [`LensError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Instant;
//! use lens_core::file_io::parse_result_document;
//! use lens_core::viewer::{Message, Viewer};
//! use lens_core::ViewerSettings;
//!
//! let results = parse_result_document(r#"{
//!     "pro": { "summary": [{ "id": 1, "text": "Cheaper" }], "articles": [] },
//!     "con": { "summary": [{ "id": 2, "text": "Riskier" }] }
//! }"#).unwrap();
//!
//! let mut viewer = Viewer::new(ViewerSettings::default());
//! viewer.load_results(results);
//! viewer.update(
//!     Message::SummaryClicked { attribute: "pro".into(), summary_id: 1u64.into() },
//!     Instant::now(),
//! );
//!
//! let json = serde_json::to_string_pretty(&viewer.view()).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`results`] - Result set data model
//! - [`normalize`] - Result set to ordered slide records
//! - [`scoring`] - Relevance sorting and color mapping
//! - [`carousel`] - Paging with the transition lock
//! - [`fullscreen`] - Single-slot fullscreen overlay
//! - [`comparison`] - Cross-attribute comparison coordinator
//! - [`slide`] - Per-slide selection state and render model
//! - [`viewer`] - The state container tying them together
//! - [`settings`] / [`config`] - Typed viewer and search settings, TOML config
//! - [`request`] - Search request payload and response envelope
//! - [`errors`] - Structured error types
//! - [`file_io`] - Result documents and atomic config saves

pub mod carousel;
pub mod comparison;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod fullscreen;
pub mod normalize;
pub mod request;
pub mod results;
pub mod scoring;
pub mod settings;
pub mod slide;
pub mod viewer;

// Re-export commonly used types at crate root for convenience
pub use config::LensConfig;
pub use errors::{LensError, LensResult};
pub use file_io::{load_config, load_result_file, save_config};
pub use results::{Article, ItemId, ResultSet, Summary};
pub use settings::{SearchSettings, ViewerSettings};
pub use viewer::{Message, Viewer, ViewerView};
