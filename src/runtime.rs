use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, info_span, warn};

use crate::recorder::ResultLog;
use crate::session::SessionResult;

/// Source of time for a session
pub trait Clock {
    /// Monotonic instant used to measure elapsed typing time
    fn now(&self) -> Instant;

    /// Wall-clock time stamped onto the recorded result
    fn local_time(&self) -> DateTime<Local>;
}

/// Production clock backed by the OS
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Test clock: every call to `now` moves forward by a fixed step, and the
/// local time never changes.
#[derive(Debug)]
pub struct SteppingClock {
    origin: Instant,
    step: Duration,
    calls: Cell<u32>,
    local_time: DateTime<Local>,
}

impl SteppingClock {
    pub fn new(step: Duration, local_time: DateTime<Local>) -> Self {
        Self {
            origin: Instant::now(),
            step,
            calls: Cell::new(0),
            local_time,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Instant {
        let n = self.calls.get();
        self.calls.set(n + 1);
        self.origin + self.step * n
    }

    fn local_time(&self) -> DateTime<Local> {
        self.local_time
    }
}

/// Read one line, dropping its terminator. End of input yields an empty
/// string and invalid UTF-8 is replaced rather than rejected.
pub fn read_submission<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut buf = Vec::new();
    input.read_until(b'\n', &mut buf)?;

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Drives one session from showing the paragraph to recording the result
pub struct SessionRunner<C: Clock, L: ResultLog> {
    clock: C,
    log: L,
}

impl<C: Clock, L: ResultLog> SessionRunner<C, L> {
    pub fn new(clock: C, log: L) -> Self {
        Self { clock, log }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Runs a full session against `target`. Failing to persist the result
    /// is reported on `err` and does not fail the session; only console I/O
    /// errors are returned.
    pub fn run<R, W, E>(
        &self,
        target: &str,
        input: &mut R,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<SessionResult>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let span = info_span!("session");
        let _guard = span.enter();

        writeln!(out, "=== Typing Speed Test ===\n")?;
        writeln!(out, "Type the following paragraph exactly as shown:\n")?;
        writeln!(out, "{target}\n")?;

        write!(out, "Press Enter when you're ready to start...")?;
        out.flush()?;
        // any line, or none at all, counts as ready
        read_submission(input)?;

        writeln!(out, "\nStart typing below, then press Enter when done:")?;
        out.flush()?;
        let started = self.clock.now();
        let typed = read_submission(input)?;
        let elapsed = self.clock.now().saturating_duration_since(started);

        let result =
            SessionResult::from_measurement(target, &typed, elapsed, self.clock.local_time());
        debug!(
            words = result.words_typed(),
            seconds = result.seconds_taken(),
            wpm = result.wpm(),
            accuracy = result.accuracy(),
            rating = %result.rating(),
            "scored submission"
        );

        let saved = self.log.append(&result);

        write_summary(out, &result)?;

        match saved {
            Ok(()) => writeln!(
                out,
                "\nYour result has been saved to {}",
                self.log.location()
            )?,
            Err(e) => {
                warn!(location = %self.log.location(), error = %e, "failed to save result");
                writeln!(err, "Error saving results to {}: {}", self.log.location(), e)?;
            }
        }
        writeln!(out, "Thank you for using the program!")?;
        out.flush()?;

        Ok(result)
    }
}

/// Results block shown after every session
pub fn write_summary<W: Write>(out: &mut W, result: &SessionResult) -> io::Result<()> {
    writeln!(out, "\n--- Results ---")?;
    writeln!(out, "Time taken: {:.2} seconds", result.seconds_taken())?;
    writeln!(out, "Words typed: {}", result.words_typed())?;
    writeln!(out, "Words per minute (WPM): {:.2}", result.wpm())?;
    writeln!(out, "Accuracy: {:.2} %", result.accuracy())?;
    writeln!(out, "Rating: {}", result.rating())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::Rating;
    use crate::recorder::RecordError;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::io::Cursor;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap()
    }

    /// In-memory log that can be told to fail
    #[derive(Default)]
    struct MemoryLog {
        saved: RefCell<Vec<SessionResult>>,
        fail: bool,
    }

    impl ResultLog for MemoryLog {
        fn append(&self, result: &SessionResult) -> Result<(), RecordError> {
            if self.fail {
                return Err(RecordError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.saved.borrow_mut().push(result.clone());
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    #[test]
    fn stepping_clock_advances_per_call() {
        let clock = SteppingClock::new(Duration::from_secs(6), at());
        let a = clock.now();
        let b = clock.now();
        let c = clock.now();
        assert_eq!(b - a, Duration::from_secs(6));
        assert_eq!(c - b, Duration::from_secs(6));
        assert_eq!(clock.local_time(), at());
    }

    #[test]
    fn read_submission_strips_line_endings() {
        assert_eq!(read_submission(&mut Cursor::new("abc\n")).unwrap(), "abc");
        assert_eq!(read_submission(&mut Cursor::new("abc\r\n")).unwrap(), "abc");
        assert_eq!(read_submission(&mut Cursor::new("abc")).unwrap(), "abc");
        assert_eq!(read_submission(&mut Cursor::new("")).unwrap(), "");
        assert_eq!(read_submission(&mut Cursor::new(" a b \n")).unwrap(), " a b ");
    }

    #[test]
    fn read_submission_reads_one_line_at_a_time() {
        let mut input = Cursor::new("\ncat dog\nleftover\n");
        assert_eq!(read_submission(&mut input).unwrap(), "");
        assert_eq!(read_submission(&mut input).unwrap(), "cat dog");
        assert_eq!(read_submission(&mut input).unwrap(), "leftover");
        assert_eq!(read_submission(&mut input).unwrap(), "");
    }

    #[test]
    fn read_submission_replaces_invalid_utf8() {
        let mut input = Cursor::new(vec![b'a', 0xFF, b'b', b'\n']);
        assert_eq!(read_submission(&mut input).unwrap(), "a\u{FFFD}b");
    }

    fn runner(step: Duration, log: MemoryLog) -> SessionRunner<SteppingClock, MemoryLog> {
        SessionRunner::new(SteppingClock::new(step, at()), log)
    }

    #[test]
    fn run_scores_and_records() {
        let runner = runner(Duration::from_secs(6), MemoryLog::default());
        let mut input = Cursor::new("\ncat dog\n");
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        let result = runner.run("cat dog", &mut input, &mut out, &mut err).unwrap();

        assert_eq!(result.words_typed(), 2);
        assert_eq!(result.rating(), Rating::Beginner);
        assert_eq!(*runner.log().saved.borrow(), vec![result]);

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("=== Typing Speed Test ===\n"));
        assert!(out.contains("\ncat dog\n"));
        assert!(out.contains("Time taken: 6.00 seconds\n"));
        assert!(out.contains("Words typed: 2\n"));
        assert!(out.contains("Words per minute (WPM): 20.00\n"));
        assert!(out.contains("Accuracy: 100.00 %\n"));
        assert!(out.contains("Rating: Beginner\n"));
        assert!(out.contains("Your result has been saved to memory\n"));
        assert!(out.ends_with("Thank you for using the program!\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn run_with_no_input_scores_empty_submission() {
        let runner = runner(Duration::from_secs(1), MemoryLog::default());
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        let result = runner
            .run("cat dog", &mut Cursor::new(""), &mut out, &mut err)
            .unwrap();

        assert_eq!(result.words_typed(), 0);
        assert_eq!(result.wpm(), 0.0);
        assert_eq!(result.accuracy(), 0.0);
        assert_eq!(result.rating(), Rating::Poor);
        assert_eq!(runner.log().saved.borrow().len(), 1);
    }

    #[test]
    fn run_reports_log_failure_and_still_shows_results() {
        let log = MemoryLog {
            fail: true,
            ..Default::default()
        };
        let runner = runner(Duration::from_secs(6), log);
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        let result = runner
            .run("cat dog", &mut Cursor::new("\ncat dog\n"), &mut out, &mut err)
            .unwrap();

        assert_eq!(result.words_typed(), 2);
        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert!(out.contains("--- Results ---"));
        assert!(out.contains("Rating: Beginner"));
        assert!(!out.contains("has been saved"));
        assert!(out.ends_with("Thank you for using the program!\n"));
        assert!(err.starts_with("Error saving results to memory:"));
        assert!(err.contains("read-only"));
    }

    #[test]
    fn summary_formats_two_decimals() {
        let result =
            SessionResult::from_measurement("abc", "abd", Duration::from_millis(2500), at());
        let mut out: Vec<u8> = Vec::new();
        write_summary(&mut out, &result).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "\n--- Results ---\n\
             Time taken: 2.50 seconds\n\
             Words typed: 1\n\
             Words per minute (WPM): 24.00\n\
             Accuracy: 66.67 %\n\
             Rating: Beginner\n"
        );
    }
}
