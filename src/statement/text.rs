//! Text measurement for the standard Helvetica font, used to align and wrap statement text.

/// Millimetres per PostScript point.
pub(super) const MM_PER_PT: f32 = 25.4 / 72.0;

/// Advance widths of the printable ASCII characters (32 through 126) in Helvetica, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' - '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' - 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' - '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' - 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' - '~'
];

/// Width used for anything outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c as u32 {
        n @ 32..=126 => HELVETICA_WIDTHS[(n - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// The width of `text` in millimetres when set at `font_size` points.
pub(super) fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * font_size * MM_PER_PT
}

/// Wraps `text` into lines no wider than `max_width` millimetres at `font_size` points.
///
/// Lines break at spaces. A word that is wider than a whole line is broken between characters.
/// Explicit newlines always start a new line. The result always has at least one element.
pub(super) fn split_to_size(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let fits = |s: &str| text_width(s, font_size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if fits(&candidate) {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if fits(word) {
                line = word.to_string();
                continue;
            }
            // Hard-break the word.
            for c in word.chars() {
                line.push(c);
                if !fits(&line) && line.chars().count() > 1 {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(c);
                }
            }
        }
        lines.push(line);
    }
    lines
}

/// The first wrapped line of `text`, which is all a table cell shows.
pub(super) fn first_line(text: &str, max_width: f32, font_size: f32) -> String {
    split_to_size(text, max_width, font_size)
        .into_iter()
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(char_width(' '), 278);
        assert_eq!(char_width('0'), 556);
        assert_eq!(char_width('@'), 1015);
        assert_eq!(char_width('W'), 944);
        assert_eq!(char_width('i'), 222);
        assert_eq!(char_width('~'), 584);
        assert_eq!(char_width('é'), FALLBACK_WIDTH);
    }

    #[test]
    fn test_text_width() {
        // Ten digits at 10pt: 5560 units -> 55.6pt.
        let w = text_width("0123456789", 10.0);
        assert!((w - 55.6 * MM_PER_PT).abs() < 1e-4);
        assert_eq!(text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(split_to_size("Groceries", 50.0, 10.0), vec!["Groceries"]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(split_to_size("", 50.0, 10.0), vec![""]);
        assert_eq!(first_line("", 50.0, 10.0), "");
    }

    #[test]
    fn test_wraps_at_spaces() {
        let text = "Monthly subscription for the streaming service and extras";
        let lines = split_to_size(text, 50.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 50.0);
        }
        assert_eq!(lines.join(" "), text);
        assert!(text.starts_with(&first_line(text, 50.0, 10.0)));
    }

    #[test]
    fn test_breaks_long_words() {
        let text = "x".repeat(100);
        let lines = split_to_size(&text, 50.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), text);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 50.0);
        }
    }

    #[test]
    fn test_newlines_split() {
        assert_eq!(split_to_size("a\nb", 50.0, 10.0), vec!["a", "b"]);
    }
}
