// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Route log records to a caller-owned text sink.
//!
//! # Overview
//!
//! A [`TextWriter`](append::TextWriter) target renders each record with a layout and writes the
//! text to a sink the caller keeps owning: an in-memory buffer, a test harness capture, a
//! wrapper around a remote stream. A routing [`Rule`](config::Rule) selects the records by
//! level range and logger name pattern.
//!
//! The binding functions validate their arguments, then register exactly one target and one
//! rule in a [`Configuration`](config::Configuration), either one you already have or a new
//! one. A failed call changes nothing.
//!
//! # Examples
//!
//! Bind an in-memory buffer and make it the active configuration:
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::Mutex;
//!
//! use logforth_textwriter::BindOptions;
//! use logforth_textwriter::record::Level;
//!
//! let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
//! logforth_textwriter::attach_and_activate(
//!     Some(sink.clone()),
//!     BindOptions::default()
//!         .min_level(Level::Debug)
//!         .max_level(Level::Error)
//!         .pattern("App.*"),
//! )
//! .unwrap();
//! ```
//!
//! Route the `log` crate macros through the active configuration:
//!
//! ```
//! logforth_textwriter::bridge::log::setup_log_crate();
//!
//! log::info!(target: "App.Worker", "started");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod config;
pub mod filter;
pub mod layout;
pub mod record;
pub mod trap;

pub use append::Append;
pub use layout::Layout;
pub use trap::Trap;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod logger;
pub use logger::active_configuration;
pub use logger::clear_active_configuration;
pub use logger::dispatch;
pub use logger::set_active_configuration;

mod binding;
pub use binding::BindOptions;
pub use binding::BindSettings;
pub use binding::DEFAULT_MIN_LEVEL;
pub use binding::DEFAULT_PATTERN;
pub use binding::TARGET_NAME;
pub use binding::attach_and_activate;
pub use binding::attach_to_existing_configuration;
pub use binding::attach_to_new_configuration;
