use crate::rating::Rating;
use crate::stats::{calculate_accuracy, count_words, words_per_minute};
use chrono::{DateTime, Local};
use std::time::Duration;

/// Outcome of one typing session. Only built through
/// [`SessionResult::from_measurement`] so the rating always agrees with the
/// wpm and accuracy it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    timestamp: DateTime<Local>,
    wpm: f64,
    accuracy: f64,
    rating: Rating,
    words_typed: usize,
    seconds_taken: f64,
}

impl SessionResult {
    pub fn from_measurement(
        target: &str,
        typed: &str,
        elapsed: Duration,
        timestamp: DateTime<Local>,
    ) -> Self {
        let seconds_taken = elapsed.as_secs_f64();
        let words_typed = count_words(typed);
        let wpm = words_per_minute(words_typed, seconds_taken);
        let accuracy = calculate_accuracy(target, typed);

        Self {
            timestamp,
            wpm,
            accuracy,
            rating: Rating::classify(wpm, accuracy),
            words_typed,
            seconds_taken,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn wpm(&self) -> f64 {
        self.wpm
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn words_typed(&self) -> usize {
        self.words_typed
    }

    pub fn seconds_taken(&self) -> f64 {
        self.seconds_taken
    }
}
