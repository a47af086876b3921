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

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::config::Configuration;
use crate::record::Record;

static ACTIVE: ArcSwapOption<Configuration> = ArcSwapOption::const_empty();

/// Install the process-wide active configuration.
///
/// The installation is a single atomic swap. Records dispatched concurrently see either the
/// previous or the new configuration, never a mix of both.
///
/// Return the previously active configuration, if any.
///
/// # Examples
///
/// ```
/// use logforth_textwriter::config::Configuration;
///
/// let previous = logforth_textwriter::set_active_configuration(Configuration::default());
/// # let _ = previous;
/// ```
pub fn set_active_configuration(
    config: impl Into<Arc<Configuration>>,
) -> Option<Arc<Configuration>> {
    ACTIVE.swap(Some(config.into()))
}

/// Remove the process-wide active configuration and return it.
pub fn clear_active_configuration() -> Option<Arc<Configuration>> {
    ACTIVE.swap(None)
}

/// Get the process-wide active configuration.
pub fn active_configuration() -> Option<Arc<Configuration>> {
    ACTIVE.load_full()
}

/// Dispatch a record through the active configuration.
///
/// Records are dropped if no configuration is active. Errors raised by targets are handed to
/// the configuration's trap.
pub fn dispatch(record: &Record) {
    if let Some(config) = active_configuration() {
        if let Err(err) = config.dispatch(record) {
            config.trap().trap(&err);
        }
    }
}
