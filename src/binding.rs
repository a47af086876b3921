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

//! Bind a caller-owned text sink to a logging configuration.
//!
//! Each successful call registers exactly one [`TextWriter`] target under [`TARGET_NAME`] and
//! appends exactly one [`Rule`] routing to it. A failed call leaves every configuration
//! untouched.

use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;

use crate::Append;
use crate::Error;
use crate::Layout;
use crate::append::SharedSink;
use crate::append::TextWriter;
use crate::config::Configuration;
use crate::config::Rule;
use crate::filter::LevelRange;
use crate::filter::NamePattern;
use crate::logger::set_active_configuration;
use crate::record::Level;

/// The name text writer targets are registered under.
///
/// Binding twice into the same configuration replaces the named entry with the latest target.
/// The earlier rule keeps routing to the earlier target.
pub const TARGET_NAME: &str = "TextWriter";

/// The logger name pattern used when none is given; matches every logger.
pub const DEFAULT_PATTERN: &str = "*";

/// The minimum level used when none is given.
pub const DEFAULT_MIN_LEVEL: Level = Level::Info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaxLevel {
    Unbounded,
    Missing,
    Level(Level),
}

/// Filter and rendering options for binding a text sink.
///
/// Default to accepting [`DEFAULT_MIN_LEVEL`] and above from every logger
/// ([`DEFAULT_PATTERN`]), rendered with [`PlainTextLayout`](crate::layout::PlainTextLayout).
///
/// # Examples
///
/// ```
/// use logforth_textwriter::BindOptions;
/// use logforth_textwriter::record::Level;
///
/// let options = BindOptions::default()
///     .min_level(Level::Debug)
///     .max_level(Level::Error)
///     .pattern("App.*");
/// ```
#[derive(Debug)]
pub struct BindOptions {
    min_level: Option<Level>,
    max_level: MaxLevel,
    pattern: Cow<'static, str>,
    layout: Option<Box<dyn Layout>>,
}

impl Default for BindOptions {
    fn default() -> Self {
        BindOptions {
            min_level: Some(DEFAULT_MIN_LEVEL),
            max_level: MaxLevel::Unbounded,
            pattern: Cow::Borrowed(DEFAULT_PATTERN),
            layout: None,
        }
    }
}

impl BindOptions {
    /// Set the least severe level routed to the sink.
    ///
    /// Passing `None` is rejected when binding, naming `min_level`.
    pub fn min_level(mut self, level: impl Into<Option<Level>>) -> Self {
        self.min_level = level.into();
        self
    }

    /// Set the most severe level routed to the sink.
    ///
    /// Leave unset for no upper bound. Passing `None` is rejected when binding, naming
    /// `max_level`.
    pub fn max_level(mut self, level: impl Into<Option<Level>>) -> Self {
        self.max_level = match level.into() {
            Some(level) => MaxLevel::Level(level),
            None => MaxLevel::Missing,
        };
        self
    }

    /// Set the logger name pattern. See [`NamePattern`] for the syntax.
    ///
    /// Empty or whitespace-only patterns are rejected when binding, naming `pattern`.
    pub fn pattern(mut self, pattern: impl Into<Cow<'static, str>>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set the layout the sink target renders records with.
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = Some(layout.into());
        self
    }
}

/// Plain binding settings, for loading from configuration files.
///
/// # Examples
///
/// ```
/// use logforth_textwriter::BindOptions;
/// use logforth_textwriter::BindSettings;
/// use logforth_textwriter::record::Level;
///
/// let settings = BindSettings {
///     min_level: Level::Debug,
///     max_level: Some(Level::Error),
///     pattern: "App.*".to_string(),
/// };
/// let options = BindOptions::from(settings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BindSettings {
    /// The least severe level routed to the sink.
    pub min_level: Level,
    /// The most severe level routed to the sink, unbounded if `None`.
    pub max_level: Option<Level>,
    /// The logger name pattern.
    pub pattern: String,
}

impl Default for BindSettings {
    fn default() -> Self {
        BindSettings {
            min_level: DEFAULT_MIN_LEVEL,
            max_level: None,
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl From<BindSettings> for BindOptions {
    fn from(settings: BindSettings) -> Self {
        let options = BindOptions::default()
            .min_level(settings.min_level)
            .pattern(settings.pattern);
        match settings.max_level {
            Some(max) => options.max_level(max),
            None => options,
        }
    }
}

/// Attach a text sink to an existing configuration.
///
/// Register a [`TextWriter`] for `sink` under [`TARGET_NAME`] and append a rule routing the
/// records selected by `options` to it. Existing rules are kept in place.
///
/// # Errors
///
/// Return an invalid-argument error naming the first missing argument, checked in the order
/// `configuration`, `sink`, `min_level`, `max_level`, `pattern`. On error the configuration
/// is not modified.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::Mutex;
///
/// use logforth_textwriter::BindOptions;
/// use logforth_textwriter::config::Configuration;
///
/// let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
/// let mut config = Configuration::default();
/// logforth_textwriter::attach_to_existing_configuration(
///     Some(&mut config),
///     Some(sink.clone()),
///     BindOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(config.rules().len(), 1);
/// ```
pub fn attach_to_existing_configuration<W>(
    configuration: Option<&mut Configuration>,
    sink: Option<SharedSink<W>>,
    options: BindOptions,
) -> Result<(), Error>
where
    W: Write + Send + 'static,
{
    let configuration = configuration.ok_or_else(|| Error::invalid_argument("configuration"))?;
    let binding = Binding::new(sink, options)?;
    binding.install(configuration);
    log_hooked();
    Ok(())
}

/// Build a new configuration holding only a text sink target and its rule.
///
/// The configuration is returned to the caller, who decides whether and when to install it
/// with [`set_active_configuration`]. See [`attach_and_activate`] to do both at once.
///
/// # Errors
///
/// Return an invalid-argument error naming the first missing argument, checked in the order
/// `sink`, `min_level`, `max_level`, `pattern`.
pub fn attach_to_new_configuration<W>(
    sink: Option<SharedSink<W>>,
    options: BindOptions,
) -> Result<Configuration, Error>
where
    W: Write + Send + 'static,
{
    let configuration = Binding::new(sink, options)?.into_configuration();
    log_hooked();
    Ok(configuration)
}

/// Build a new configuration holding only a text sink target and its rule, and install it as
/// the process-wide active configuration.
///
/// Return the previously active configuration, if any.
///
/// # Errors
///
/// Same as [`attach_to_new_configuration`]; on error the active configuration is left as is.
pub fn attach_and_activate<W>(
    sink: Option<SharedSink<W>>,
    options: BindOptions,
) -> Result<Option<Arc<Configuration>>, Error>
where
    W: Write + Send + 'static,
{
    let configuration = Binding::new(sink, options)?.into_configuration();
    let previous = set_active_configuration(configuration);
    log_hooked();
    Ok(previous)
}

/// The logger name the confirmation line is logged under.
const DIAGNOSTIC_LOGGER: &str = "logforth_textwriter";

fn log_hooked() {
    log::debug!(target: DIAGNOSTIC_LOGGER, "hooked logging to text writer sink");
}

/// A validated target and the rule routing to it, not yet part of any configuration.
struct Binding {
    target: Arc<dyn Append>,
    rule: Rule,
}

impl Binding {
    // Every argument is checked before the target is built.
    fn new<W>(sink: Option<SharedSink<W>>, options: BindOptions) -> Result<Self, Error>
    where
        W: Write + Send + 'static,
    {
        let sink = sink.ok_or_else(|| Error::invalid_argument("sink"))?;
        let min = options
            .min_level
            .ok_or_else(|| Error::invalid_argument("min_level"))?;
        let levels = match options.max_level {
            MaxLevel::Unbounded => LevelRange::at_least(min),
            MaxLevel::Missing => return Err(Error::invalid_argument("max_level")),
            MaxLevel::Level(max) => LevelRange::between(min, max),
        };
        let pattern = NamePattern::new(options.pattern)?;

        let mut writer = TextWriter::new(sink);
        if let Some(layout) = options.layout {
            writer = writer.with_layout(layout);
        }
        let target: Arc<dyn Append> = Arc::new(writer);
        let rule = Rule::new(pattern, levels, target.clone());
        Ok(Binding { target, rule })
    }

    fn install(self, configuration: &mut Configuration) {
        configuration.add_target(TARGET_NAME, self.target);
        configuration.add_rule(self.rule);
    }

    fn into_configuration(self) -> Configuration {
        let mut configuration = Configuration::default();
        self.install(&mut configuration);
        configuration
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ErrorKind;

    fn sink() -> Option<SharedSink<Vec<u8>>> {
        Some(Arc::new(Mutex::new(Vec::new())))
    }

    fn assert_invalid(err: Error, parameter: &str) {
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.parameter(), Some(parameter));
    }

    #[test]
    fn configuration_is_checked_first() {
        let err = attach_to_existing_configuration(
            None,
            None::<SharedSink<Vec<u8>>>,
            BindOptions::default().min_level(None).pattern(""),
        )
        .unwrap_err();
        assert_invalid(err, "configuration");
    }

    #[test]
    fn validation_order_is_fixed() {
        let mut config = Configuration::default();

        let err = attach_to_existing_configuration(
            Some(&mut config),
            None::<SharedSink<Vec<u8>>>,
            BindOptions::default().min_level(None).max_level(None).pattern(" "),
        )
        .unwrap_err();
        assert_invalid(err, "sink");

        let err = attach_to_existing_configuration(
            Some(&mut config),
            sink(),
            BindOptions::default().min_level(None).max_level(None).pattern(" "),
        )
        .unwrap_err();
        assert_invalid(err, "min_level");

        let err = attach_to_existing_configuration(
            Some(&mut config),
            sink(),
            BindOptions::default().max_level(None).pattern(" "),
        )
        .unwrap_err();
        assert_invalid(err, "max_level");

        let err = attach_to_existing_configuration(
            Some(&mut config),
            sink(),
            BindOptions::default().pattern(" "),
        )
        .unwrap_err();
        assert_invalid(err, "pattern");

        assert!(config.rules().is_empty());
        assert_eq!(config.targets().len(), 0);
    }

    #[test]
    fn defaults_bind_info_and_above_for_every_logger() {
        let config = attach_to_new_configuration(sink(), BindOptions::default()).unwrap();

        assert_eq!(config.targets().len(), 1);
        assert!(config.target(TARGET_NAME).is_some());
        assert_eq!(config.rules().len(), 1);

        let rule = &config.rules()[0];
        assert_eq!(rule.levels().min(), Level::Info);
        assert_eq!(rule.levels().max(), None);
        assert_eq!(rule.pattern().as_str(), "*");
        assert!(Arc::ptr_eq(
            rule.target(),
            config.target(TARGET_NAME).unwrap()
        ));
    }

    #[test]
    fn explicit_range_and_pattern() {
        let options = BindOptions::default()
            .min_level(Level::Debug)
            .max_level(Level::Error)
            .pattern("App.*");
        let config = attach_to_new_configuration(sink(), options).unwrap();

        let rule = &config.rules()[0];
        assert_eq!(rule.levels(), LevelRange::between(Level::Debug, Level::Error));
        assert_eq!(rule.pattern().as_str(), "App.*");
    }

    #[test]
    fn settings_convert_to_options() {
        let options = BindOptions::from(BindSettings {
            min_level: Level::Warn,
            max_level: Some(Level::Fatal),
            pattern: "Db.*".to_string(),
        });
        let config = attach_to_new_configuration(sink(), options).unwrap();
        let rule = &config.rules()[0];
        assert_eq!(rule.levels(), LevelRange::between(Level::Warn, Level::Fatal));
        assert_eq!(rule.pattern().as_str(), "Db.*");

        let options = BindOptions::from(BindSettings::default());
        let config = attach_to_new_configuration(sink(), options).unwrap();
        assert_eq!(config.rules()[0].levels(), LevelRange::at_least(Level::Info));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn settings_deserialize() {
        let settings: BindSettings =
            serde_json::from_str(r#"{"min_level": "debug", "max_level": "ERROR"}"#).unwrap();
        assert_eq!(
            settings,
            BindSettings {
                min_level: Level::Debug,
                max_level: Some(Level::Error),
                pattern: "*".to_string(),
            }
        );

        assert!(serde_json::from_str::<BindSettings>(r#"{"min_level": "loud"}"#).is_err());
    }
}
