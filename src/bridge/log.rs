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

use std::borrow::Cow;

use crate::logger::active_configuration;
use crate::record::Level;
use crate::record::RecordBuilder;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let Some(config) = active_configuration() else {
            return false;
        };

        config.enabled(metadata.level().into(), metadata.target())
    }

    fn log(&self, record: &log::Record) {
        let payload = match record.args().as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(record.args().to_string()),
        };

        let record = RecordBuilder::default()
            .level(record.level().into())
            .logger(record.target())
            .payload(payload)
            .build();

        crate::logger::dispatch(&record);
    }

    fn flush(&self) {
        if let Some(config) = active_configuration() {
            if let Err(err) = config.flush() {
                config.trap().trap(&err);
            }
        }
    }
}

/// Set up the log crate global logger to dispatch through the active configuration.
///
/// The forwarder follows [`set_active_configuration`] swaps: each record is routed by whichever
/// configuration is active when it is logged.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// [`set_active_configuration`]: crate::set_active_configuration
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger to dispatch through the active configuration.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logforth_textwriter::bridge::log::setup_log_crate must be called before the log crate global logger initialized",
    )
}
