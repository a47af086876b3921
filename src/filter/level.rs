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

use crate::record::Level;

/// An inclusive band of levels.
///
/// Without a maximum, the range accepts the minimum and everything more severe.
///
/// # Examples
///
/// ```
/// use logforth_textwriter::filter::LevelRange;
/// use logforth_textwriter::record::Level;
///
/// let range = LevelRange::between(Level::Debug, Level::Error);
/// assert!(range.contains(Level::Warn));
/// assert!(!range.contains(Level::Fatal));
///
/// let range = LevelRange::at_least(Level::Info);
/// assert!(range.contains(Level::Fatal));
/// assert!(!range.contains(Level::Debug));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelRange {
    min: Level,
    max: Option<Level>,
}

impl LevelRange {
    /// Accept `min` and every more severe level.
    pub fn at_least(min: Level) -> Self {
        LevelRange { min, max: None }
    }

    /// Accept every level from `min` up to and including `max`.
    pub fn between(min: Level, max: Level) -> Self {
        LevelRange {
            min,
            max: Some(max),
        }
    }

    /// The least severe accepted level.
    pub fn min(&self) -> Level {
        self.min
    }

    /// The most severe accepted level, or `None` if unbounded.
    pub fn max(&self) -> Option<Level> {
        self.max
    }

    /// Checks whether the given level falls in this range.
    pub fn contains(&self, level: Level) -> bool {
        level >= self.min && self.max.is_none_or(|max| level <= max)
    }
}
