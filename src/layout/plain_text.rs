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

use std::fmt::Write;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::layout::Layout;
use crate::record::Record;

/// A layout that renders a log record as a single delimited line.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00|ERROR|App.Worker|Hello error!
/// 2024-08-11T22:44:57.172219+08:00|WARN|App.Worker|Hello warn!|connection reset
/// ```
///
/// The trailing line ending is part of the rendered text. Writers forward it verbatim.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logforth_textwriter::layout::PlainTextLayout;
///
/// let layout = PlainTextLayout::default().timezone(TimeZone::UTC);
/// ```
#[derive(Debug, Clone)]
pub struct PlainTextLayout {
    timezone: TimeZone,
    line_ending: &'static str,
}

impl Default for PlainTextLayout {
    fn default() -> Self {
        Self {
            timezone: TimeZone::system(),
            line_ending: "\n",
        }
    }
}

impl PlainTextLayout {
    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Set the text appended after each rendered record.
    ///
    /// Default to `"\n"`. Pass `""` to render records without a line ending.
    pub fn line_ending(mut self, line_ending: &'static str) -> Self {
        self.line_ending = line_ending;
        self
    }
}

impl Layout for PlainTextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let ts = Timestamp::try_from(record.time()).map_err(|err| {
            Error::new("record time is out of range")
                .with_source(err)
                .with_context("logger", record.logger())
        })?;
        let offset = self.timezone.to_offset(ts);

        let mut text = String::new();
        write!(
            &mut text,
            "{:.6}|{}|{}|{}",
            ts.display_with_offset(offset),
            record.level(),
            record.logger(),
            record.payload()
        )
        .map_err(Error::from_fmt_error)?;
        if let Some(err) = record.error() {
            write!(&mut text, "|{err}").map_err(Error::from_fmt_error)?;
        }
        text.push_str(self.line_ending);

        Ok(text.into_bytes())
    }
}
