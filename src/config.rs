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

//! Logging configurations: named targets plus an ordered list of routing rules.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Append;
use crate::Error;
use crate::filter::LevelRange;
use crate::filter::NamePattern;
use crate::record::Level;
use crate::record::Record;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A routing rule: records whose logger name matches the pattern and whose level falls in the
/// range are sent to the target.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: NamePattern,
    levels: LevelRange,
    target: Arc<dyn Append>,
}

impl Rule {
    /// Create a new [`Rule`].
    pub fn new(pattern: NamePattern, levels: LevelRange, target: Arc<dyn Append>) -> Self {
        Rule {
            pattern,
            levels,
            target,
        }
    }

    /// The logger name pattern.
    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    /// The accepted levels.
    pub fn levels(&self) -> LevelRange {
        self.levels
    }

    /// The target records are sent to.
    pub fn target(&self) -> &Arc<dyn Append> {
        &self.target
    }

    /// Checks whether a record with the given level and logger name is routed by this rule.
    pub fn matches(&self, level: Level, logger: &str) -> bool {
        self.levels.contains(level) && self.pattern.matches(logger)
    }
}

/// A logging configuration.
///
/// Every rule matching a record receives it, in rule order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::Mutex;
///
/// use logforth_textwriter::append::TextWriter;
/// use logforth_textwriter::config::Configuration;
/// use logforth_textwriter::config::Rule;
/// use logforth_textwriter::filter::LevelRange;
/// use logforth_textwriter::filter::NamePattern;
/// use logforth_textwriter::record::Level;
///
/// let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
/// let target = Arc::new(TextWriter::new(sink));
///
/// let mut config = Configuration::default();
/// config.add_target("memory", target.clone());
/// config.add_rule(Rule::new(
///     NamePattern::default(),
///     LevelRange::at_least(Level::Info),
///     target,
/// ));
/// assert_eq!(config.rules().len(), 1);
/// ```
#[derive(Debug)]
pub struct Configuration {
    targets: BTreeMap<String, Arc<dyn Append>>,
    rules: Vec<Rule>,
    trap: Box<dyn Trap>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            targets: BTreeMap::new(),
            rules: vec![],
            trap: Box::new(DefaultTrap::default()),
        }
    }
}

impl Configuration {
    /// Set the trap for errors that cannot be returned to the caller.
    ///
    /// Default to [`DefaultTrap`].
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Register a target under the given name.
    ///
    /// A target already registered under the same name is replaced and returned. Rules that
    /// reference the replaced target keep sending records to it.
    pub fn add_target(
        &mut self,
        name: impl Into<String>,
        target: Arc<dyn Append>,
    ) -> Option<Arc<dyn Append>> {
        self.targets.insert(name.into(), target)
    }

    /// Look up a registered target by name.
    pub fn target(&self, name: &str) -> Option<&Arc<dyn Append>> {
        self.targets.get(name)
    }

    /// Iterate the registered targets, ordered by name.
    pub fn targets(&self) -> impl ExactSizeIterator<Item = (&str, &Arc<dyn Append>)> {
        self.targets.iter().map(|(name, target)| (name.as_str(), target))
    }

    /// Append a rule after all existing rules.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// The rules, in dispatch order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Checks whether any rule accepts a record with the given level and logger name.
    pub fn enabled(&self, level: Level, logger: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(level, logger))
    }

    /// Send the record to the target of every matching rule.
    ///
    /// # Errors
    ///
    /// Return the first error raised by a target, unchanged. Rules after the failing one are
    /// not visited.
    pub fn dispatch(&self, record: &Record) -> Result<(), Error> {
        for rule in &self.rules {
            if rule.matches(record.level(), record.logger()) {
                rule.target.append(record)?;
            }
        }
        Ok(())
    }

    /// Flush the target of every rule.
    pub fn flush(&self) -> Result<(), Error> {
        for rule in &self.rules {
            rule.target.flush()?;
        }
        Ok(())
    }

    pub(crate) fn trap(&self) -> &dyn Trap {
        self.trap.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::record::RecordBuilder;

    #[derive(Debug, Default)]
    struct Collect(Mutex<Vec<String>>);

    impl Append for Collect {
        fn append(&self, record: &Record) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.payload().to_string());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Append for Failing {
        fn append(&self, _: &Record) -> Result<(), Error> {
            Err(Error::new("sink is gone"))
        }
    }

    fn rule(pattern: &'static str, levels: LevelRange, target: Arc<dyn Append>) -> Rule {
        Rule::new(NamePattern::new(pattern).unwrap(), levels, target)
    }

    #[test]
    fn same_name_replaces_latest() {
        let first: Arc<dyn Append> = Arc::new(Collect::default());
        let second: Arc<dyn Append> = Arc::new(Collect::default());

        let mut config = Configuration::default();
        assert!(config.add_target("TextWriter", first.clone()).is_none());
        let replaced = config.add_target("TextWriter", second.clone()).unwrap();

        assert!(Arc::ptr_eq(&replaced, &first));
        assert!(Arc::ptr_eq(config.target("TextWriter").unwrap(), &second));
        assert_eq!(config.targets().len(), 1);
    }

    #[test]
    fn dispatch_visits_every_matching_rule() {
        let app = Arc::new(Collect::default());
        let all = Arc::new(Collect::default());

        let mut config = Configuration::default();
        config.add_rule(rule(
            "App.*",
            LevelRange::between(Level::Debug, Level::Error),
            app.clone(),
        ));
        config.add_rule(rule("*", LevelRange::at_least(Level::Error), all.clone()));

        for (level, logger, payload) in [
            (Level::Warn, "App.Worker", "warn"),
            (Level::Fatal, "App.Worker", "fatal"),
            (Level::Trace, "App.Worker", "trace"),
            (Level::Error, "Db", "error"),
        ] {
            let record = RecordBuilder::default()
                .level(level)
                .logger(logger)
                .payload(payload)
                .build();
            config.dispatch(&record).unwrap();
        }

        assert_eq!(*app.0.lock().unwrap(), ["warn"]);
        assert_eq!(*all.0.lock().unwrap(), ["fatal", "error"]);
        assert!(config.enabled(Level::Info, "App.Job"));
        assert!(!config.enabled(Level::Info, "Db"));
    }

    #[test]
    fn dispatch_propagates_target_error() {
        let mut config = Configuration::default();
        config.add_rule(rule("*", LevelRange::at_least(Level::Trace), Arc::new(Failing)));

        let record = RecordBuilder::default().payload("lost").build();
        let err = config.dispatch(&record).unwrap_err();
        assert_eq!(err.message(), "sink is gone");
    }
}
