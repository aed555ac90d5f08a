/// Qualitative label for a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Rating {
    Poor,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Rating {
    /// Threshold cascade over wpm and accuracy percent; the first rule that
    /// matches wins. Inputs are not validated.
    pub fn classify(wpm: f64, accuracy: f64) -> Self {
        if accuracy < 50.0 {
            Rating::Poor
        } else if wpm >= 80.0 && accuracy >= 95.0 {
            Rating::Expert
        } else if wpm >= 60.0 && accuracy >= 90.0 {
            Rating::Advanced
        } else if wpm >= 40.0 && accuracy >= 80.0 {
            Rating::Intermediate
        } else {
            Rating::Beginner
        }
    }
}
