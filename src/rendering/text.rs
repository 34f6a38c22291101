/// Quote block wrapping and measurement

use crate::quote::Quote;
use crate::rendering::font::{FontMetric, TextSize};

/// Gap added under every quote line.
pub const LINE_GAP: u32 = 10;
/// Gap between the last quote line and the attribution.
pub const BLOCK_GAP: u32 = 10;

/// Wrap widths (characters per line) per variant.
pub const LINEAR_WRAP_WIDTH: usize = 30;
pub const CALENDAR_WRAP_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub size: TextSize,
}

/// A quote wrapped into lines plus its attribution, with measured sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedTextBlock {
    pub lines: Vec<TextLine>,
    pub attribution: TextLine,
    pub total_height: u32,
}

/// Greedy word wrap on whitespace. Lines never exceed `width` characters
/// unless a single word is longer, in which case it gets a line to itself.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if cur_len > 0 && cur_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut cur));
            cur_len = 0;
        }
        if cur_len > 0 {
            cur.push(' ');
            cur_len += 1;
        }
        cur.push_str(word);
        cur_len += word_len;
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Wrap and measure a quote block.
///
/// Height is the sum of `line height + LINE_GAP` over the quote lines, then
/// `BLOCK_GAP`, then the attribution height.
pub fn measure(
    quote: &Quote,
    wrap_width: usize,
    quote_font: &dyn FontMetric,
    author_font: &dyn FontMetric,
) -> WrappedTextBlock {
    let lines: Vec<TextLine> = wrap(&quote.text, wrap_width)
        .into_iter()
        .map(|text| {
            let size = quote_font.measure(&text);
            TextLine { text, size }
        })
        .collect();

    let attribution_text = quote.attribution();
    let attribution = TextLine {
        size: author_font.measure(&attribution_text),
        text: attribution_text,
    };

    let total_height = lines.iter().map(|l| l.size.height + LINE_GAP).sum::<u32>()
        + BLOCK_GAP
        + attribution.size.height;

    WrappedTextBlock {
        lines,
        attribution,
        total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10px per character, fixed line height.
    struct FixedMetric(u32);

    impl FontMetric for FixedMetric {
        fn measure(&self, text: &str) -> TextSize {
            TextSize {
                width: text.chars().count() as u32 * 10,
                height: self.0,
            }
        }
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap("The obstacle is the way and the way is long", 15);
        assert_eq!(lines, vec!["The obstacle is", "the way and the", "way is long"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 15));
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        let lines = wrap("a incomprehensibilities b", 5);
        assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
    }

    #[test]
    fn wrap_collapses_whitespace_and_handles_empty() {
        assert_eq!(wrap("  one   two  ", 30), vec!["one two"]);
        assert!(wrap("   ", 30).is_empty());
    }

    #[test]
    fn measure_accumulates_gaps_and_attribution() {
        let quote = Quote::new("We suffer more in imagination than in reality", "Seneca");
        let block = measure(&quote, 30, &FixedMetric(20), &FixedMetric(15));
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.attribution.text, "- Seneca");
        // 2 * (20 + 10) + 10 + 15
        assert_eq!(block.total_height, 85);
    }
}
