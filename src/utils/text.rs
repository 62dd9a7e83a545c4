//! # Text Layout
//!
//! Word wrapping for console text.

/// Splits `text` into lines no wider than `width` characters, breaking on
/// whitespace. Words longer than a line are split.
///
/// # Examples
///
/// ```
/// use rogue::wrap_text;
///
/// assert_eq!(wrap_text("the quick brown fox", 10), vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("Hello", 20), vec!["Hello"]);
        assert!(wrap_text("", 20).is_empty());
    }

    #[test]
    fn test_wraps_on_words() {
        let lines = wrap_text("Orc attacks Player for 1 hit points.", 16);
        assert_eq!(lines, vec!["Orc attacks", "Player for 1 hit", "points."]);
        assert!(lines.iter().all(|line| line.len() <= 16));
    }

    #[test]
    fn test_long_words_are_split() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }
}
