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
use std::fmt;

use globset::GlobBuilder;
use globset::GlobMatcher;

use crate::Error;

/// A wildcard pattern matched against logger names.
///
/// `*` matches any run of characters (including none and including `.` or `/`), `?` matches
/// exactly one character, and every other character matches itself. The pattern is compiled
/// once with [`globset`], so character classes such as `[0-9]` and alternations such as
/// `{Db,Http}.*` are accepted as well.
///
/// # Examples
///
/// ```
/// use logforth_textwriter::filter::NamePattern;
///
/// let pattern = NamePattern::new("App.*").unwrap();
/// assert!(pattern.matches("App.Worker"));
/// assert!(!pattern.matches("Db.Pool"));
/// ```
#[derive(Clone)]
pub struct NamePattern {
    source: Cow<'static, str>,
    // `None` is the catch-all default
    matcher: Option<GlobMatcher>,
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.source, f)
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl Default for NamePattern {
    /// The pattern `*`, matching every logger.
    fn default() -> Self {
        NamePattern {
            source: Cow::Borrowed("*"),
            matcher: None,
        }
    }
}

impl NamePattern {
    /// Compile a logger name pattern.
    ///
    /// # Errors
    ///
    /// Return an invalid-argument error naming `pattern` if it is empty or whitespace-only, or
    /// if it is not a valid glob (for example an unclosed `[`).
    pub fn new(pattern: impl Into<Cow<'static, str>>) -> Result<Self, Error> {
        let source = pattern.into();
        if source.trim().is_empty() {
            return Err(Error::invalid_argument("pattern"));
        }

        let glob = GlobBuilder::new(&source)
            .literal_separator(false)
            .build()
            .map_err(|err| Error::invalid_argument("pattern").with_source(err))?;
        Ok(NamePattern {
            source,
            matcher: Some(glob.compile_matcher()),
        })
    }

    /// The pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Checks whether the logger name matches this pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(name),
            None => true,
        }
    }
}
