//! Text measurement and wrapping for legend and label layout.

/// Average glyph advance as a fraction of the font size (DejaVu Sans, mixed-case text).
const AVG_ADVANCE: f64 = 0.6;

/// Estimated pixel width of `text` at `font_px`.
///
/// Plotters can measure text only through a live backend, and layout runs
/// before a backend exists, so this uses a per-character average.
pub fn text_width_px(text: &str, font_px: u32) -> u32 {
    (text.chars().count() as f64 * font_px as f64 * AVG_ADVANCE).ceil() as u32
}

/// Break `text` into lines no wider than `max_px`, splitting on whitespace.
/// A single word longer than the limit is split between characters.
pub fn wrap_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let fits = |s: &str| text_width_px(s, font_px) <= max_px;
    let mut lines = Vec::new();
    let mut cur = String::new();

    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if fits(&candidate) {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if fits(word) {
            cur = word.to_string();
            continue;
        }
        for ch in word.chars() {
            cur.push(ch);
            if !fits(&cur) && cur.chars().count() > 1 {
                cur.pop();
                lines.push(std::mem::replace(&mut cur, ch.to_string()));
            }
        }
    }
    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_grows_with_length_and_size() {
        assert_eq!(text_width_px("", 14), 0);
        assert!(text_width_px("Safe-Rate", 14) < text_width_px("Front-Attacked-Rate", 14));
        assert!(text_width_px("HS1000", 10) < text_width_px("HS1000", 20));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_to_width("timestamp-based reordered rate", 10, 120);
        assert_eq!(lines, vec!["timestamp-based", "reordered rate"]);
    }

    #[test]
    fn long_words_are_split() {
        let lines = wrap_to_width("Front-Attacked-Rate(Risk)", 10, 60);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "Front-Attacked-Rate(Risk)");
        assert!(lines.iter().all(|l| text_width_px(l, 10) <= 60));
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_to_width("", 10, 100), vec![String::new()]);
    }
}
