//! Text measurement and word wrapping.
//!
//! Several flowables need the height of their text before they draw anything: a callout box sizes
//! its background from it, and a table has to know whether a whole row still fits on the page.
//! `genpdf` only wraps text while rendering, so this module does its own greedy wrapping on top of
//! the font metrics exposed through [`TextMeasure`].

use genpdf::fonts::FontCache;
use genpdf::render::Area;
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Position};

use crate::brand::{pt, to_pt};
use crate::markup::{Markup, Span};
use crate::styles::StyleDescriptor;

/// Font metrics in points.
pub trait TextMeasure {
    /// Advance width of `text` set in `style`.
    fn text_width(&self, style: Style, text: &str) -> f64;

    /// Natural line height of `style`.
    fn line_height(&self, style: Style) -> f64;
}

impl TextMeasure for FontCache {
    fn text_width(&self, style: Style, text: &str) -> f64 {
        to_pt(StyledString::new(text.to_owned(), style).width(self))
    }

    fn line_height(&self, style: Style) -> f64 {
        to_pt(style.line_height(self))
    }
}

/// One wrapped output line.
#[derive(Clone, Debug)]
pub struct TextLine {
    fragments: Vec<StyledString>,
    width: f64,
    height: f64,
}

impl TextLine {
    /// Styled fragments in reading order.
    pub fn fragments(&self) -> &[StyledString] {
        &self.fragments
    }

    /// Measured width of the line.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height the line occupies, including leading.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Concatenated text of the line.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.s.as_str()).collect()
    }
}

struct Word<'a> {
    span: &'a Span,
    text: &'a str,
    leading_space: bool,
}

fn split_words(line: &[Span]) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut pending_space = false;
    for span in line {
        let text = span.text();
        let mut rest = text;
        while !rest.is_empty() {
            let trimmed = rest.trim_start_matches(' ');
            if trimmed.len() != rest.len() {
                pending_space = true;
            }
            if trimmed.is_empty() {
                break;
            }
            let end = trimmed.find(' ').unwrap_or(trimmed.len());
            words.push(Word {
                span,
                text: &trimmed[..end],
                leading_space: pending_space && !words.is_empty(),
            });
            pending_space = false;
            rest = &trimmed[end..];
        }
    }
    words
}

struct LineBuilder<'m, M: ?Sized> {
    measure: &'m M,
    base: Style,
    min_height: f64,
    fragments: Vec<StyledString>,
    width: f64,
    height: f64,
}

impl<'m, M: TextMeasure + ?Sized> LineBuilder<'m, M> {
    fn new(measure: &'m M, base: Style, min_height: f64) -> Self {
        Self {
            measure,
            base,
            min_height,
            fragments: Vec::new(),
            width: 0.0,
            height: min_height.max(measure.line_height(base)),
        }
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, text: String, style: Style, width: f64) {
        self.height = self.height.max(self.measure.line_height(style));
        self.width += width;
        self.fragments.push(StyledString::new(text, style));
    }

    fn finish(&mut self) -> TextLine {
        let line = TextLine {
            fragments: std::mem::take(&mut self.fragments),
            width: self.width,
            height: self.height,
        };
        self.width = 0.0;
        self.height = self.min_height.max(self.measure.line_height(self.base));
        line
    }
}

/// Wrapped, measured text ready to be drawn.
#[derive(Clone, Debug)]
pub struct TextBlock {
    lines: Vec<TextLine>,
    alignment: Alignment,
    base: Style,
}

impl TextBlock {
    /// Wraps `markup` to `max_width` points using the attributes of `descriptor`.
    pub fn layout<M>(
        measure: &M,
        markup: &Markup,
        descriptor: &StyleDescriptor,
        max_width: f64,
    ) -> Self
    where
        M: TextMeasure + ?Sized,
    {
        let base = descriptor.text_style();
        let mut builder = LineBuilder::new(measure, base, descriptor.leading);
        let mut lines = Vec::new();

        for hard_line in markup.lines() {
            for word in split_words(hard_line) {
                let style = word.span.style_over(base);
                let word_width = measure.text_width(style, word.text);
                let space_width = if word.leading_space {
                    measure.text_width(style, " ")
                } else {
                    0.0
                };

                if !builder.is_empty() && builder.width + space_width + word_width > max_width {
                    lines.push(builder.finish());
                    builder.push(word.text.to_owned(), style, word_width);
                } else if word.leading_space && !builder.is_empty() {
                    builder.push(format!(" {}", word.text), style, space_width + word_width);
                } else {
                    builder.push(word.text.to_owned(), style, word_width);
                }
            }
            lines.push(builder.finish());
        }

        Self {
            lines,
            alignment: descriptor.alignment,
            base,
        }
    }

    /// The wrapped lines.
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Total height of all lines.
    pub fn height(&self) -> f64 {
        self.lines.iter().map(TextLine::height).sum()
    }

    /// Height of the first `count` lines.
    pub fn height_of(&self, count: usize) -> f64 {
        self.lines.iter().take(count).map(TextLine::height).sum()
    }

    /// Number of lines, starting at `first`, that fit in `available` points.
    pub fn lines_fitting(&self, first: usize, available: f64) -> usize {
        let mut used = 0.0;
        let mut count = 0;
        for line in self.lines.iter().skip(first) {
            if used + line.height > available + f64::EPSILON {
                break;
            }
            used += line.height;
            count += 1;
        }
        count
    }

    /// Draws every line with its top-left corner at (`x`, `y`) inside a column `width` wide.
    pub fn draw(
        &self,
        font_cache: &FontCache,
        area: &Area<'_>,
        x: f64,
        y: f64,
        width: f64,
    ) -> Result<(), genpdf::error::Error> {
        self.draw_range(font_cache, area, x, y, width, 0..self.lines.len())
    }

    /// Draws the lines in `range` starting at (`x`, `y`).
    pub fn draw_range(
        &self,
        font_cache: &FontCache,
        area: &Area<'_>,
        x: f64,
        y: f64,
        width: f64,
        range: std::ops::Range<usize>,
    ) -> Result<(), genpdf::error::Error> {
        let mut cursor = y;
        for line in &self.lines[range] {
            let natural = TextMeasure::line_height(font_cache, self.base);
            let top = cursor + ((line.height - natural) / 2.0).max(0.0);
            let offset = match self.alignment {
                Alignment::Left => 0.0,
                Alignment::Center => ((width - line.width) / 2.0).max(0.0),
                Alignment::Right => (width - line.width).max(0.0),
            };
            if let Some(mut section) =
                area.text_section(font_cache, Position::new(pt(x + offset), pt(top)), self.base)
            {
                for fragment in &line.fragments {
                    section.print_str(&fragment.s, fragment.style)?;
                }
            }
            cursor += line.height;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixedAdvance;
    use super::*;
    use crate::markup::parse_markup;
    use crate::styles::{Role, StyleRegistry};

    fn body() -> StyleDescriptor {
        StyleRegistry::brand().get(Role::Body)
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let markup = parse_markup("Sign in").expect("parse");
        let block = TextBlock::layout(&FixedAdvance, &markup, &body(), 200.0);
        assert_eq!(block.lines().len(), 1);
        assert_eq!(block.lines()[0].text(), "Sign in");
        assert_eq!(block.lines()[0].width(), 35.0);
        assert_eq!(block.height(), 14.0);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // 5pt per glyph: "alpha beta" = 50pt, "gamma" would push it to 80pt.
        let markup = parse_markup("alpha beta gamma").expect("parse");
        let block = TextBlock::layout(&FixedAdvance, &markup, &body(), 60.0);
        let texts: Vec<_> = block.lines().iter().map(TextLine::text).collect();
        assert_eq!(texts, vec!["alpha beta", "gamma"]);
        assert!(block.lines().iter().all(|line| line.width() <= 60.0));
    }

    #[test]
    fn forced_breaks_start_new_lines() {
        let markup = parse_markup("<b>Login:</b> x<br/><b>Email:</b> y").expect("parse");
        let block = TextBlock::layout(&FixedAdvance, &markup, &body(), 500.0);
        assert_eq!(block.lines().len(), 2);
        assert_eq!(block.lines()[1].text(), "Email: y");
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let markup = parse_markup("a supercalifragilistic b").expect("parse");
        let block = TextBlock::layout(&FixedAdvance, &markup, &body(), 40.0);
        let texts: Vec<_> = block.lines().iter().map(TextLine::text).collect();
        assert_eq!(texts, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn space_between_spans_is_kept() {
        let markup = parse_markup("<b>Plan:</b> Teams").expect("parse");
        let block = TextBlock::layout(&FixedAdvance, &markup, &body(), 500.0);
        let line = &block.lines()[0];
        assert_eq!(line.text(), "Plan: Teams");
        assert!(line.fragments()[0].style.is_bold());
        assert_eq!(line.width(), 60.0);
    }

    #[test]
    fn lines_fitting_counts_from_offset() {
        let markup = parse_markup("a<br/>b<br/>c<br/>d").expect("parse");
        let block = TextBlock::layout(&FixedAdvance, &markup, &body(), 100.0);
        assert_eq!(block.lines_fitting(0, 30.0), 2);
        assert_eq!(block.lines_fitting(3, 30.0), 1);
        assert_eq!(block.height_of(3), 42.0);
    }
}
