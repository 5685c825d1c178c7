//! Sensor frame scanner
//!
//! ANT+ sensors announce each new measurement interval with a raw data line,
//! after which the device logs the derived value for that interval several
//! times over (the radio protocol keeps retransmitting the same page). The
//! scanner pairs each announcement with its broadcast value and collapses the
//! retransmissions into one record per interval.

use crate::error::Result;
use crate::parser::stream::LogLineStream;
use std::io::BufRead;
use std::iter::FusedIterator;

/// Which broadcast copy of an interval's value becomes the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// First broadcast after the announcement; later copies are skipped
    First,
    /// Last broadcast before the next announcement
    Last,
}

/// Outcome of matching a line against a channel's announcement pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Announce<I> {
    /// A new measurement interval
    Interval(I),
    /// Announcement shape, but the interval carries no measurement
    Idle,
}

/// Line shapes and record construction for one sensor channel
pub trait SensorChannel {
    /// Fields captured from an announcement line
    type Interval;
    type Record;

    fn name(&self) -> &'static str;

    fn policy(&self) -> DedupPolicy;

    /// `None` when the line is not an announcement for this sensor
    fn match_announce(&self, line: &str) -> Option<Announce<Self::Interval>>;

    /// Build a record when the line is a broadcast value for this sensor
    fn match_value(&self, line: &str, interval: &Self::Interval) -> Option<Self::Record>;
}

enum ScanState<I, R> {
    SeekAnnounce,
    SeekValue(I),
    SeekNextAnnounce { interval: I, record: R },
    Finished,
}

/// Lazy, single-pass sequence of records for one sensor channel.
///
/// Every record comes from an announcement followed by a broadcast value.
/// An interval whose value never shows up before the next interval or the
/// end of file is dropped. Idle copies in between are ignored.
pub struct SensorFrameScanner<R, C: SensorChannel> {
    stream: LogLineStream<R>,
    channel: C,
    state: ScanState<C::Interval, C::Record>,
    replay: Option<String>,
    emitted: usize,
    dropped: usize,
    debug: bool,
}

impl<R: BufRead, C: SensorChannel> SensorFrameScanner<R, C> {
    pub fn new(reader: R, channel: C) -> Self {
        Self {
            stream: LogLineStream::new(reader),
            channel,
            state: ScanState::SeekAnnounce,
            replay: None,
            emitted: 0,
            dropped: 0,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Records produced so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Intervals abandoned because no broadcast value followed them
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn step(&mut self, line: String) -> Option<C::Record> {
        let state = std::mem::replace(&mut self.state, ScanState::SeekAnnounce);

        let (next, record) = match state {
            ScanState::SeekAnnounce => match self.channel.match_announce(&line) {
                Some(Announce::Interval(interval)) => (ScanState::SeekValue(interval), None),
                Some(Announce::Idle) => {
                    if self.debug {
                        eprintln!(
                            "{}: idle announcement at line {}",
                            self.channel.name(),
                            self.stream.line_number
                        );
                    }
                    (ScanState::SeekAnnounce, None)
                }
                None => (ScanState::SeekAnnounce, None),
            },
            ScanState::SeekValue(interval) => match self.channel.match_announce(&line) {
                Some(Announce::Interval(next)) => {
                    self.dropped += 1;
                    if self.debug {
                        eprintln!(
                            "{}: interval without value superseded at line {}",
                            self.channel.name(),
                            self.stream.line_number
                        );
                    }
                    (ScanState::SeekValue(next), None)
                }
                // Idle copies carry no measurement; keep waiting for the value
                Some(Announce::Idle) => (ScanState::SeekValue(interval), None),
                None => match self.channel.match_value(&line, &interval) {
                    Some(record) => (ScanState::SeekNextAnnounce { interval, record }, None),
                    None => (ScanState::SeekValue(interval), None),
                },
            },
            ScanState::SeekNextAnnounce { interval, record } => {
                if self.channel.match_announce(&line).is_some() {
                    // The announcement opens the next interval
                    self.replay = Some(line);
                    (ScanState::SeekAnnounce, Some(record))
                } else if self.channel.policy() == DedupPolicy::Last {
                    let record = self
                        .channel
                        .match_value(&line, &interval)
                        .unwrap_or(record);
                    (ScanState::SeekNextAnnounce { interval, record }, None)
                } else {
                    (ScanState::SeekNextAnnounce { interval, record }, None)
                }
            }
            ScanState::Finished => (ScanState::Finished, None),
        };

        self.state = next;
        record
    }

    fn finish(&mut self) -> Option<C::Record> {
        let record = match std::mem::replace(&mut self.state, ScanState::Finished) {
            ScanState::SeekNextAnnounce { record, .. } => Some(record),
            ScanState::SeekValue(_) => {
                self.dropped += 1;
                None
            }
            _ => None,
        };

        if record.is_some() {
            self.emitted += 1;
        }
        if self.debug {
            eprintln!(
                "{}: {} records from {} lines ({} intervals without value)",
                self.channel.name(),
                self.emitted,
                self.stream.line_number,
                self.dropped
            );
        }
        record
    }
}

impl<R: BufRead, C: SensorChannel> Iterator for SensorFrameScanner<R, C> {
    type Item = Result<C::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if matches!(self.state, ScanState::Finished) {
                return None;
            }

            let line = match self.replay.take() {
                Some(line) => line,
                None => match self.stream.next_line() {
                    Ok(Some(line)) => line,
                    Ok(None) => return self.finish().map(Ok),
                    Err(err) => {
                        self.state = ScanState::Finished;
                        return Some(Err(err.into()));
                    }
                },
            };

            if let Some(record) = self.step(line) {
                self.emitted += 1;
                return Some(Ok(record));
            }
        }
    }
}

impl<R: BufRead, C: SensorChannel> FusedIterator for SensorFrameScanner<R, C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// `A <ticks>` announces an interval, `V <value>` broadcasts its value
    struct TestChannel(DedupPolicy);

    impl SensorChannel for TestChannel {
        type Interval = u32;
        type Record = (u32, u32);

        fn name(&self) -> &'static str {
            "test"
        }

        fn policy(&self) -> DedupPolicy {
            self.0
        }

        fn match_announce(&self, line: &str) -> Option<Announce<u32>> {
            let ticks: u32 = line.strip_prefix("A ")?.parse().ok()?;
            Some(if ticks == 0 {
                Announce::Idle
            } else {
                Announce::Interval(ticks)
            })
        }

        fn match_value(&self, line: &str, interval: &u32) -> Option<(u32, u32)> {
            let value = line.strip_prefix("V ")?.parse().ok()?;
            Some((*interval, value))
        }
    }

    fn scan(policy: DedupPolicy, text: &str) -> Vec<(u32, u32)> {
        SensorFrameScanner::new(Cursor::new(text.to_string()), TestChannel(policy))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_first_value_per_interval() {
        let text = "A 10\nx\nV 1\nV 1\nV 2\nA 20\nV 3\nV 3\n";
        assert_eq!(scan(DedupPolicy::First, text), vec![(10, 1), (20, 3)]);
    }

    #[test]
    fn test_last_value_per_interval() {
        let text = "A 10\nV 1\nV 2\nV 5\nA 20\nV 3\nnoise\nV 4\n";
        assert_eq!(scan(DedupPolicy::Last, text), vec![(10, 5), (20, 4)]);
    }

    #[test]
    fn test_consecutive_announcements_are_each_used() {
        let text = "A 10\nV 1\nA 20\nV 2\nA 30\nV 3\n";
        assert_eq!(
            scan(DedupPolicy::First, text),
            vec![(10, 1), (20, 2), (30, 3)]
        );
    }

    #[test]
    fn test_idle_announcement_yields_nothing() {
        let text = "A 0\nV 1\nA 10\nV 2\nA 0\nV 9\n";
        assert_eq!(scan(DedupPolicy::First, text), vec![(10, 2)]);
    }

    #[test]
    fn test_idle_announcement_keeps_open_interval() {
        assert_eq!(scan(DedupPolicy::First, "A 10\nA 0\nV 1\n"), vec![(10, 1)]);
        assert_eq!(
            scan(DedupPolicy::Last, "A 10\nA 0\nV 1\nV 2\nA 0\nA 20\nA 0\nV 3\n"),
            vec![(10, 2), (20, 3)]
        );

        let mut scanner = SensorFrameScanner::new(
            Cursor::new("A 10\nA 0\nA 0\nV 1\n".to_string()),
            TestChannel(DedupPolicy::First),
        );
        assert_eq!(scanner.channel().policy(), DedupPolicy::First);
        assert_eq!(scanner.next().unwrap().unwrap(), (10, 1));
        assert!(scanner.next().is_none());
        assert_eq!(scanner.dropped(), 0);
    }

    #[test]
    fn test_interval_without_value_is_dropped() {
        let text = "A 10\nnoise\nA 20\nV 7\n";
        assert_eq!(scan(DedupPolicy::First, text), vec![(20, 7)]);

        let mut scanner = SensorFrameScanner::new(
            Cursor::new("V 1\nA 10\nnoise\n".to_string()),
            TestChannel(DedupPolicy::Last),
        );
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
        assert_eq!(scanner.emitted(), 0);
        assert_eq!(scanner.dropped(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(scan(DedupPolicy::First, "").is_empty());
        assert!(scan(DedupPolicy::Last, "noise\nV 3\n").is_empty());
    }

    #[test]
    fn test_is_lazy() {
        let mut scanner = SensorFrameScanner::new(
            Cursor::new("A 10\nV 1\nA 20\nV 2\n".to_string()),
            TestChannel(DedupPolicy::First),
        );
        assert_eq!(scanner.next().unwrap().unwrap(), (10, 1));
        assert_eq!(scanner.emitted(), 1);
        assert_eq!(scanner.next().unwrap().unwrap(), (20, 2));
        assert!(scanner.next().is_none());
        assert_eq!(scanner.emitted(), 2);
    }
}
