/// Whitespace as the C locale sees it: space, tab, newline, vertical tab,
/// form feed and carriage return.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Count maximal runs of non-whitespace characters.
pub fn count_words(text: &str) -> usize {
    let mut in_word = false;
    let mut words = 0;

    for c in text.chars() {
        if is_space(c) {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
        }
    }

    words
}

/// Percentage of positions where `input` matches `target`, measured over the
/// longer of the two. Positions are compared as-is with no realignment, so a
/// dropped or extra character counts against every position after it.
pub fn calculate_accuracy(target: &str, input: &str) -> f64 {
    let target_len = target.chars().count();
    let input_len = input.chars().count();

    let total = target_len.max(input_len);
    if total == 0 {
        return 100.0;
    }

    let correct = target
        .chars()
        .zip(input.chars())
        .filter(|(expected, typed)| expected == typed)
        .count();

    100.0 * correct as f64 / total as f64
}

/// Words per minute over `seconds` of typing; zero when no time elapsed.
pub fn words_per_minute(words: usize, seconds: f64) -> f64 {
    let minutes = seconds / 60.0;
    if minutes > 0.0 {
        words as f64 / minutes
    } else {
        0.0
    }
}
