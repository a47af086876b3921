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

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::Layout;
use crate::TARGET_NAME;
use crate::append::Append;
use crate::layout::PlainTextLayout;
use crate::record::Record;

/// A caller-owned text sink.
///
/// The caller keeps its own clone of the [`Arc`] and stays responsible for the sink's lifecycle.
/// Appenders only ever write to and flush it.
pub type SharedSink<W> = Arc<Mutex<W>>;

/// An appender that renders each record with its layout and writes the text to a shared sink.
///
/// There is no buffering and no level filtering; routing rules decide which records arrive
/// here. Each record is written with a single `write_all` while the sink lock is held, so
/// concurrent dispatchers never interleave partial records.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::Mutex;
///
/// use logforth_textwriter::append::TextWriter;
///
/// let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
/// let writer = TextWriter::new(sink.clone());
/// ```
pub struct TextWriter<W> {
    sink: SharedSink<W>,
    layout: Box<dyn Layout>,
}

impl<W> fmt::Debug for TextWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextWriter")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<W> TextWriter<W>
where
    W: Write + Send + 'static,
{
    /// Create a new [`TextWriter`] writing to the given sink with the default
    /// [`PlainTextLayout`].
    pub fn new(sink: SharedSink<W>) -> Self {
        Self {
            sink,
            layout: Box::new(PlainTextLayout::default()),
        }
    }

    /// Create a new [`TextWriter`] from a sink that may be absent.
    ///
    /// # Errors
    ///
    /// Return an invalid-argument error naming `sink` if no sink is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_textwriter::append::SharedSink;
    /// use logforth_textwriter::append::TextWriter;
    ///
    /// let err = TextWriter::try_new(None::<SharedSink<Vec<u8>>>).unwrap_err();
    /// assert_eq!(err.parameter(), Some("sink"));
    /// ```
    pub fn try_new(sink: Option<SharedSink<W>>) -> Result<Self, Error> {
        let sink = sink.ok_or_else(|| Error::invalid_argument("sink"))?;
        Ok(Self::new(sink))
    }

    /// Set the layout for the [`TextWriter`].
    ///
    /// Default to [`PlainTextLayout`].
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, W>, Error> {
        self.sink.lock().map_err(|_| {
            Error::new("text writer sink lock is poisoned").with_context("target", TARGET_NAME)
        })
    }
}

impl<W> Append for TextWriter<W>
where
    W: Write + Send + 'static,
{
    fn append(&self, record: &Record) -> Result<(), Error> {
        let bytes = self.layout.format(record)?;
        let mut sink = self.lock()?;
        sink.write_all(&bytes).map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        let mut sink = self.lock()?;
        sink.flush().map_err(Error::from_io_error)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::thread;

    use super::*;
    use crate::ErrorKind;
    use crate::config::Configuration;
    use crate::config::Rule;
    use crate::filter::LevelRange;
    use crate::filter::NamePattern;
    use crate::layout::CustomLayout;
    use crate::record::Level;
    use crate::record::RecordBuilder;

    fn message_layout() -> CustomLayout {
        CustomLayout::new(|record| {
            Ok(format!("{} {}\n", record.level(), record.payload()).into_bytes())
        })
    }

    #[derive(Debug, Default)]
    struct ClosedSink {
        writes: usize,
    }

    impl Write for ClosedSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink is closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink is closed"))
        }
    }

    #[derive(Debug, Default)]
    struct CountingSink {
        text: Vec<u8>,
        writes: usize,
        flushes: usize,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.text.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn missing_sink_is_rejected() {
        let err = TextWriter::try_new(None::<SharedSink<Vec<u8>>>).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.parameter(), Some("sink"));
    }

    #[test]
    fn writes_rendered_text_verbatim() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let writer = TextWriter::try_new(Some(sink.clone()))
            .unwrap()
            .with_layout(CustomLayout::new(|record| {
                Ok(record.payload().as_bytes().to_vec())
            }));

        let first = RecordBuilder::default().payload("MESSAGE").build();
        let second = RecordBuilder::default().payload("AGAIN").build();
        writer.append(&first).unwrap();
        writer.append(&second).unwrap();

        assert_eq!(sink.lock().unwrap().as_slice(), b"MESSAGEAGAIN");
    }

    #[test]
    fn write_failure_propagates() {
        let sink = Arc::new(Mutex::new(ClosedSink::default()));
        let writer = TextWriter::new(sink.clone()).with_layout(message_layout());

        let record = RecordBuilder::default()
            .level(Level::Debug)
            .logger("UNITTEST")
            .payload("MESSAGE")
            .build();
        let err = writer.append(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.sources().len(), 1);
        assert_eq!(sink.lock().unwrap().writes, 1);

        assert!(writer.flush().is_err());
    }

    #[test]
    fn flush_reaches_sink() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let writer = TextWriter::new(sink.clone()).with_layout(message_layout());

        let record = RecordBuilder::default().payload("MESSAGE").build();
        writer.append(&record).unwrap();
        writer.flush().unwrap();

        let sink = sink.lock().unwrap();
        assert_eq!(sink.text, b"INFO MESSAGE\n");
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn each_record_is_one_write() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let writer = TextWriter::new(sink.clone()).with_layout(message_layout());

        for payload in ["first", "second", "third"] {
            let record = RecordBuilder::default().payload(payload).build();
            writer.append(&record).unwrap();
        }

        let sink = sink.lock().unwrap();
        assert_eq!(sink.writes, 3);
        assert_eq!(sink.text, b"INFO first\nINFO second\nINFO third\n");
    }

    #[test]
    fn filtered_records_are_never_written() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let target: Arc<dyn Append> =
            Arc::new(TextWriter::new(sink.clone()).with_layout(message_layout()));
        let mut config = Configuration::default();
        config.add_rule(Rule::new(
            NamePattern::new("App.*").unwrap(),
            LevelRange::between(Level::Info, Level::Error),
            target,
        ));

        let routed = RecordBuilder::default()
            .level(Level::Warn)
            .logger("App.Worker")
            .payload("routed")
            .build();
        let too_verbose = RecordBuilder::default()
            .level(Level::Debug)
            .logger("App.Worker")
            .payload("too verbose")
            .build();
        let elsewhere = RecordBuilder::default()
            .level(Level::Warn)
            .logger("Db.Pool")
            .payload("elsewhere")
            .build();
        config.dispatch(&too_verbose).unwrap();
        config.dispatch(&elsewhere).unwrap();
        assert_eq!(sink.lock().unwrap().writes, 0);

        config.dispatch(&routed).unwrap();
        assert_eq!(sink.lock().unwrap().writes, 1);
    }

    #[test]
    fn poisoned_sink_names_the_target() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let writer = TextWriter::new(sink.clone()).with_layout(message_layout());

        let poison = sink.clone();
        thread::spawn(move || {
            let _guard = poison.lock().unwrap();
            panic!("poison the sink lock");
        })
        .join()
        .unwrap_err();

        let record = RecordBuilder::default().payload("MESSAGE").build();
        let err = writer.append(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("target: TextWriter"), "{err}");
    }

    #[test]
    fn concurrent_appends_do_not_interleave() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::new(TextWriter::new(sink.clone()).with_layout(message_layout()));

        let handles = (0..4)
            .map(|i| {
                let writer = writer.clone();
                thread::spawn(move || {
                    let payload = format!("worker-{i}");
                    for _ in 0..50 {
                        let record = RecordBuilder::default().payload(payload.as_str()).build();
                        writer.append(&record).unwrap();
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        let text = String::from_utf8(sink.lock().unwrap().clone()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|line| line.starts_with("INFO worker-")));
    }
}
