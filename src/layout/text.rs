use super::{Jitter, LayoutConfig};

/// Width oracle used by layout: how far the pen moves after drawing a character
pub trait Measure {
    /// Horizontal advance of `ch` at `size` pixels
    fn advance(&self, ch: char, size: f32) -> f32;
}

impl<F: Fn(char, f32) -> f32> Measure for F {
    fn advance(&self, ch: char, size: f32) -> f32 {
        self(ch, size)
    }
}

/// Full-width glyph whose advance sizes the space character
pub const SPACE_REFERENCE: char = '字';

/// Punctuation that only takes up half of its measured width, so it hugs the
/// preceding character the way it does in handwritten CJK text
pub const COMPACT_PUNCTUATION: &str = "，。！？、；：\"（）《》【】…—";

pub fn is_compact_punctuation(ch: char) -> bool {
    COMPACT_PUNCTUATION.contains(ch)
}

/// The region text is laid out in, plus the height of one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextArea {
    pub available_width: f32,
    pub available_height: f32,
    pub line_height: f32,
}

/// A character ready to be painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub ch: char,
    /// Cursor position the character was laid out at
    pub base: (f32, f32),
    /// Where it is drawn: `base` plus jitter
    pub coords: (f32, f32),
    /// Zero-based visual line, counting wrapped and blank lines
    pub line: usize,
}

/// Width of a space at the given size: a quarter of a full-width character
pub fn space_width<M: Measure + ?Sized>(measure: &M, size: f32) -> f32 {
    measure.advance(SPACE_REFERENCE, size) * 0.25
}

/// Lays out text character by character, wrapping at the exact character that would
/// cross the right margin. `\n` starts a new line; blank lines and lines holding only
/// spaces still take up a full line.
///
/// Spaces move the cursor without producing a [Placement]. Punctuation from
/// [COMPACT_PUNCTUATION] advances by half its width. Every placed character is drawn at
/// its cursor position offset by `jitter` on each axis; the cursor itself never jitters,
/// so two layouts of the same input differ only in their `coords`.
///
/// NOTE: there is exactly one page. Once the cursor passes `available_height` all
/// remaining text is dropped without an error.
///
/// ```
/// use handwrite::layout::{layout_text, LayoutConfig, NoJitter, TextArea};
///
/// let config = LayoutConfig::default();
/// let area = TextArea { available_width: 900.0, available_height: 900.0, line_height: 36.0 };
/// let monospace = |_: char, size: f32| size;
///
/// let placed = layout_text("hi\nthere", &config, area, &monospace, &mut NoJitter);
/// assert_eq!(placed.len(), 7);
/// assert_eq!(placed[2].base, (50.0, 50.0 + 36.0 + 10.0));
/// ```
pub fn layout_text<M, J>(
    text: &str,
    config: &LayoutConfig,
    area: TextArea,
    measure: &M,
    jitter: &mut J,
) -> Vec<Placement>
where
    M: Measure + ?Sized,
    J: Jitter + ?Sized,
{
    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let size = config.font_size as f32;
    let left = config.margins.left as f32;
    let right_edge = area.available_width - config.margins.right as f32;
    let line_advance = config.line_advance(area.line_height);
    let horizontal = config.spacing.horizontal as f32;
    let space = space_width(measure, size);

    let mut placements: Vec<Placement> = Vec::with_capacity(text.len());
    let mut y = config.margins.top as f32;
    let mut line = 0usize;

    for source_line in text.split('\n') {
        if y > area.available_height {
            break;
        }

        let mut x = left;
        for ch in source_line.chars() {
            if ch == ' ' {
                x += space + horizontal;
                continue;
            }

            let mut width = measure.advance(ch, size);
            if is_compact_punctuation(ch) {
                width *= 0.5;
            }

            if x + width > right_edge {
                x = left;
                y += line_advance;
                line += 1;

                if y > area.available_height {
                    tracing::debug!(placed = placements.len(), "page full, dropping remaining text");
                    return placements;
                }
            }

            let dx = jitter.offset(config.chaos_level) as f32;
            let dy = jitter.offset(config.chaos_level) as f32;
            placements.push(Placement {
                ch,
                base: (x, y),
                coords: (x + dx, y + dy),
                line,
            });

            x += width + horizontal;
        }

        y += line_advance;
        line += 1;
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{jitter, Margins, NoJitter, RandomJitter, Spacing};

    /// Full-width characters are one em, everything else half an em
    fn measure(ch: char, size: f32) -> f32 {
        if ch.is_ascii() {
            size * 0.5
        } else {
            size
        }
    }

    fn config() -> LayoutConfig {
        LayoutConfig {
            margins: Margins::all(50),
            spacing: Spacing {
                horizontal: 2,
                vertical: 10,
            },
            chaos_level: 5,
            font_size: 20,
            ..LayoutConfig::default()
        }
    }

    fn area() -> TextArea {
        TextArea {
            available_width: 900.0,
            available_height: 900.0,
            line_height: 20.0,
        }
    }

    fn lines(placements: &[Placement]) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for p in placements {
            while lines.len() <= p.line {
                lines.push(String::new());
            }
            lines[p.line].push(p.ch);
        }
        lines
    }

    #[test]
    fn spaces_advance_without_placements() {
        let config = config();
        let placed = layout_text("a b", &config, area(), &measure, &mut NoJitter);

        assert_eq!(placed.iter().map(|p| p.ch).collect::<String>(), "ab");
        let a_end = placed[0].base.0 + measure('a', 20.0) + 2.0;
        let gap = placed[1].base.0 - a_end;
        assert_eq!(gap, space_width(&measure, 20.0) + 2.0);
        assert_eq!(space_width(&measure, 20.0), 5.0);
    }

    #[test]
    fn punctuation_advances_by_half() {
        let config = config();
        let placed = layout_text("测试，好", &config, area(), &measure, &mut NoJitter);

        let advances: Vec<f32> = placed.windows(2).map(|w| w[1].base.0 - w[0].base.0).collect();
        // 测 -> 试, 试 -> ，, ， -> 好
        assert_eq!(advances, vec![22.0, 22.0, 12.0]);
        assert!(advances[2] < advances[1]);
    }

    #[test]
    fn apostrophes_and_curly_quotes_keep_their_width() {
        let config = config();
        let placed = layout_text("n't", &config, area(), &measure, &mut NoJitter);
        assert_eq!(placed[2].base.0 - placed[1].base.0, 12.0);

        let placed = layout_text("“好”\"a", &config, area(), &measure, &mut NoJitter);
        let advances: Vec<f32> = placed.windows(2).map(|w| w[1].base.0 - w[0].base.0).collect();
        // only the ASCII double quote is compact
        assert_eq!(advances, vec![22.0, 22.0, 22.0, 7.0]);
        assert!(!is_compact_punctuation('\''));
        assert!(!is_compact_punctuation('‘'));
    }

    #[test]
    fn wraps_at_the_right_margin() {
        let config = LayoutConfig {
            spacing: Spacing::default(),
            ..config()
        };
        // usable line: from 50 up to 250 - 50 = 200, ten 10px glyphs = 100px per line
        let area = TextArea {
            available_width: 250.0,
            ..area()
        };
        let text = "abcdefghijklmnopqrstuvwxyz";
        let placed = layout_text(text, &config, area, &measure, &mut NoJitter);

        assert_eq!(placed.len(), text.len());
        let lines = lines(&placed);
        assert_eq!(lines, vec!["abcdefghijklmno", "pqrstuvwxyz"]);
        assert!(placed
            .iter()
            .filter(|p| p.ch == 'p')
            .all(|p| p.base == (50.0, 50.0 + 20.0)));
    }

    #[test]
    fn every_line_starts_at_the_left_margin() {
        let config = config();
        let area = TextArea {
            available_width: 300.0,
            ..area()
        };
        let text = "第一行文字很长很长很长很长很长\n  indented\n\nlast";
        let placed = layout_text(text, &config, area, &measure, &mut RandomJitter::seeded(1));

        let mut seen = std::collections::HashSet::new();
        for p in placed.iter().filter(|p| seen.insert(p.line)) {
            if p.ch == 'i' {
                // leading spaces push the first glyph right
                assert_eq!(p.base.0, 50.0 + 2.0 * (5.0 + 2.0));
            } else {
                assert_eq!(p.base.0, 50.0);
            }
        }
    }

    #[test]
    fn base_y_never_decreases() {
        let config = config();
        let area = TextArea {
            available_width: 400.0,
            ..area()
        };
        let text = lipsum::lipsum(300);
        let placed = layout_text(&text, &config, area, &measure, &mut RandomJitter::seeded(3));

        assert!(!placed.is_empty());
        assert!(placed.windows(2).all(|w| w[0].base.1 <= w[1].base.1));
        assert!(placed.iter().all(|p| p.base.1 <= area.available_height));
    }

    #[test]
    fn blank_and_space_only_lines_take_a_full_line() {
        let config = config();
        let placed = layout_text("a\n\n   \nb", &config, area(), &measure, &mut NoJitter);

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1].line, 3);
        assert_eq!(placed[1].base.1 - placed[0].base.1, 3.0 * 30.0);
    }

    #[test]
    fn crlf_is_a_single_newline() {
        let config = config();
        let placed = layout_text("a\r\nb\rc", &config, area(), &measure, &mut NoJitter);
        assert_eq!(placed.iter().map(|p| p.line).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    // Text past the bottom of the single page is dropped on purpose: there is no
    // pagination, and callers get no error.
    #[test]
    fn overflowing_lines_are_dropped() {
        let config = LayoutConfig {
            margins: Margins::all(0),
            ..config()
        };
        // lines sit at y = 0 and y = 30; the third would start at 60
        let area = TextArea {
            available_height: 59.0,
            ..area()
        };
        let placed = layout_text("one\ntwo\nthree\nfour\nfive", &config, area, &measure, &mut NoJitter);

        assert_eq!(lines(&placed), vec!["one", "two"]);
    }

    #[test]
    fn overflow_while_wrapping_stops_mid_line() {
        let config = LayoutConfig {
            margins: Margins::all(0),
            spacing: Spacing::default(),
            ..config()
        };
        let area = TextArea {
            available_width: 50.0,
            available_height: 25.0,
            line_height: 20.0,
        };
        // five 10px glyphs per line, two lines fit
        let placed = layout_text("abcdefghijklmnop\nqrs", &config, area, &measure, &mut NoJitter);
        assert_eq!(lines(&placed), vec!["abcde", "fghij"]);
    }

    #[test]
    fn jitter_only_moves_coords() {
        let config = LayoutConfig {
            chaos_level: 10,
            ..config()
        };
        let text = "落霞与孤鹜齐飞，秋水共长天一色。\nThe quick brown fox";
        let a = layout_text(text, &config, area(), &measure, &mut RandomJitter::seeded(1));
        let b = layout_text(text, &config, area(), &measure, &mut RandomJitter::seeded(2));

        assert_eq!(a.len(), b.len());
        for (a, b) in a.iter().zip(b.iter()) {
            assert_eq!((a.ch, a.base, a.line), (b.ch, b.base, b.line));
        }
        assert!(a.iter().zip(b.iter()).any(|(a, b)| a.coords != b.coords));

        let bound = jitter::bound(10) as f32;
        for p in a.iter() {
            assert!((p.coords.0 - p.base.0).abs() <= bound);
            assert!((p.coords.1 - p.base.1).abs() <= bound);
        }
    }

    #[test]
    fn no_jitter_draws_at_the_cursor() {
        let config = config();
        let placed = layout_text("abc", &config, area(), &measure, &mut NoJitter);
        assert!(placed.iter().all(|p| p.coords == p.base));
    }
}
