//! Quote-aware splitting of a resolved command into argument words
//!
//! Words are separated by spaces outside of quotes. Both `'` and `"` open
//! a quoted region, and a quote of the other kind inside an open region
//! nests instead of being literal. A closing quote that matches an outer
//! region also closes any inner regions left unterminated. Unbalanced
//! input is never an error; whatever was collected is emitted.
//!
//! Closing an outer region through dangling inner ones is intentional: a
//! strict "pop only on top match" stack would keep `a "b's" c` as one word.
//!
//! There is no backslash escaping and no expansion of any kind.

/// Returns true for the characters that delimit quoted regions
fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"')
}

/// Pending quote characters, innermost last
#[derive(Debug, Default)]
struct QuoteStack(Vec<char>);

impl QuoteStack {
    fn is_open(&self) -> bool {
        !self.0.is_empty()
    }

    fn feed(&mut self, quote: char) {
        match self.0.iter().rposition(|&q| q == quote) {
            Some(depth) => self.0.truncate(depth),
            None => self.0.push(quote),
        }
    }
}

/// Split `resolved` into argument words.
///
/// Each emitted word has one surrounding pair of matching quotes removed
/// (see [`unquote`]). Runs of unquoted spaces never produce empty words,
/// but an explicit `''` or `""` yields an empty argument.
pub fn tokenize(resolved: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut quotes = QuoteStack::default();
    let mut word = String::new();

    for c in resolved.chars() {
        if is_quote(c) {
            word.push(c);
            quotes.feed(c);
        } else if c == ' ' && !quotes.is_open() {
            flush(&mut words, &mut word);
        } else {
            word.push(c);
        }
    }
    flush(&mut words, &mut word);

    if quotes.is_open() {
        tracing::debug!("Unterminated quote in command: {}", resolved);
    }
    words
}

fn flush(words: &mut Vec<String>, word: &mut String) {
    if !word.is_empty() {
        words.push(unquote(word).to_string());
        word.clear();
    }
}

/// Strip one pair of identical surrounding quote characters.
///
/// Words shorter than two characters, or whose ends differ, are returned
/// unchanged. Only the outermost pair is removed.
pub fn unquote(word: &str) -> &str {
    let mut chars = word.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && first == last => {
            &word[1..word.len() - 1]
        }
        _ => word,
    }
}
