//! Inline markup used by the brief's paragraphs and table cells.
//!
//! Text in the report carries a handful of HTML-like tags so emphasis can be written inline with
//! the content:
//!
//! - `<b>bold</b>` and `<i>italic</i>`, freely nested
//! - `<font color="#RRGGBB">colored</font>`
//! - `<br/>` to force a line break
//! - the entities `&amp;`, `&lt;` and `&gt;`
//!
//! [`parse_markup`] turns such a string into hard lines of [`Span`]s.  Wrapping those lines to a
//! column width is the job of [`crate::text`].

use std::fmt;

use genpdf::style::{Color, Style};

/// A run of text that shares one set of inline attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    /// Creates an unstyled span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the color override for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Layers the span attributes over `base`.
    pub fn style_over(&self, base: Style) -> Style {
        let mut style = base;
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

/// Parsed markup: one entry per hard line, each a sequence of spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
    lines: Vec<Vec<Span>>,
}

impl Markup {
    /// Wraps plain text without interpreting any tags.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            lines: vec![vec![Span::new(text)]],
        }
    }

    /// Returns the hard lines.
    pub fn lines(&self) -> &[Vec<Span>] {
        &self.lines
    }

    /// Concatenated text without any markup, lines joined by `\n`.
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(Span::text).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the original input string where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the parsing error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl StyleState {
    fn to_span(self, text: String) -> Span {
        Span {
            text,
            bold: self.bold,
            italic: self.italic,
            color: self.color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Font,
}

impl Tag {
    fn closing(self) -> &'static str {
        match self {
            Tag::Bold => "</b>",
            Tag::Italic => "</i>",
            Tag::Font => "</font>",
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    index: usize,
    lines: Vec<Vec<Span>>,
    buffer: String,
}

/// Parses inline markup into hard lines of spans.
pub fn parse_markup(input: &str) -> Result<Markup, ParseError> {
    let mut parser = Parser {
        input,
        index: 0,
        lines: vec![Vec::new()],
        buffer: String::new(),
    };
    parser.parse(StyleState::default(), None)?;
    Ok(Markup {
        lines: parser.lines,
    })
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    fn flush(&mut self, state: StyleState) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        if let Some(line) = self.lines.last_mut() {
            line.push(state.to_span(text));
        }
    }

    fn parse(&mut self, state: StyleState, open: Option<(Tag, usize)>) -> Result<(), ParseError> {
        while self.index < self.input.len() {
            if let Some((tag, _)) = open {
                if self.rest().starts_with(tag.closing()) {
                    self.flush(state);
                    self.index += tag.closing().len();
                    return Ok(());
                }
            }

            let rest = self.rest();
            if rest.starts_with("<br/>") || rest.starts_with("<br />") {
                self.flush(state);
                self.index += if rest.starts_with("<br/>") { 5 } else { 6 };
                self.lines.push(Vec::new());
            } else if rest.starts_with("<b>") {
                self.nested(state, Tag::Bold, 3, |s| s.bold = true)?;
            } else if rest.starts_with("<i>") {
                self.nested(state, Tag::Italic, 3, |s| s.italic = true)?;
            } else if rest.starts_with("<font ") {
                let (color, consumed) = parse_font_tag(self.input, self.index)?;
                self.nested(state, Tag::Font, consumed, |s| s.color = Some(color))?;
            } else if rest.starts_with("</") {
                return Err(ParseError::new(
                    self.index,
                    "unexpected closing tag without matching opening tag",
                ));
            } else if rest.starts_with('<') {
                return Err(ParseError::new(
                    self.index,
                    "unsupported tag; expected <b>, <i>, <font color=...> or <br/>",
                ));
            } else if rest.starts_with('&') {
                let (ch, consumed) = parse_entity(self.input, self.index)?;
                self.buffer.push(ch);
                self.index += consumed;
            } else if let Some(ch) = rest.chars().next() {
                self.buffer.push(ch);
                self.index += ch.len_utf8();
            }
        }

        match open {
            Some((tag, start)) => Err(ParseError::new(
                start,
                format!("unterminated tag; expected {}", tag.closing()),
            )),
            None => {
                self.flush(state);
                Ok(())
            }
        }
    }

    fn nested(
        &mut self,
        state: StyleState,
        tag: Tag,
        opening_len: usize,
        apply: impl FnOnce(&mut StyleState),
    ) -> Result<(), ParseError> {
        self.flush(state);
        let start = self.index;
        self.index += opening_len;
        let mut inner = state;
        apply(&mut inner);
        self.parse(inner, Some((tag, start)))
    }
}

fn parse_entity(input: &str, index: usize) -> Result<(char, usize), ParseError> {
    const ENTITIES: &[(&str, char)] = &[("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>')];
    ENTITIES
        .iter()
        .find(|(entity, _)| input[index..].starts_with(entity))
        .map(|(entity, ch)| (*ch, entity.len()))
        .ok_or_else(|| ParseError::new(index, "unknown entity; use &amp;, &lt; or &gt;"))
}

fn parse_font_tag(input: &str, index: usize) -> Result<(Color, usize), ParseError> {
    const PREFIX: &str = "<font color=\"#";
    if !input[index..].starts_with(PREFIX) {
        return Err(ParseError::new(
            index,
            "expected <font color=\"#RRGGBB\">",
        ));
    }

    let hex_start = index + PREFIX.len();
    let hex_end = hex_start + 6;
    let hex = input
        .get(hex_start..hex_end)
        .ok_or_else(|| ParseError::new(hex_start, "incomplete color; expected 6 hex digits"))?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::new(
            hex_start,
            "invalid RGB specification; use hexadecimal digits only",
        ));
    }

    if !input[hex_end..].starts_with("\">") {
        return Err(ParseError::new(hex_end, "expected `\">` to close the font tag"));
    }

    let channel = |offset: usize| {
        u8::from_str_radix(&hex[offset..offset + 2], 16)
            .map_err(|_| ParseError::new(hex_start + offset, "invalid RGB channel"))
    };
    let color = Color::Rgb(channel(0)?, channel(2)?, channel(4)?);
    Ok((color, hex_end + 2 - index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_span() {
        let markup = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(markup.lines().len(), 1);
        assert_eq!(markup.lines()[0], vec![Span::new("Hello world")]);
    }

    #[test]
    fn bold_label_followed_by_text() {
        let markup = parse_markup("<b>Email:</b> jgravelle@propwell.co").expect("parse succeeds");
        let line = &markup.lines()[0];
        assert_eq!(line.len(), 2);
        assert!(line[0].is_bold());
        assert_eq!(line[0].text(), "Email:");
        assert!(!line[1].is_bold());
        assert_eq!(line[1].text(), " jgravelle@propwell.co");
    }

    #[test]
    fn breaks_split_lines() {
        let markup = parse_markup("<b>Login:</b> a<br/><b>Email:</b> b<br />c").expect("parse");
        assert_eq!(markup.lines().len(), 3);
        assert_eq!(markup.to_plain_text(), "Login: a\nEmail: b\nc");
    }

    #[test]
    fn nested_tags_accumulate() {
        let markup = parse_markup("x <b>very <i>cool</i></b>!").expect("parse");
        let line = &markup.lines()[0];
        assert_eq!(line.len(), 4);
        assert!(line[2].is_bold() && line[2].is_italic());
        assert_eq!(line[3].text(), "!");
        assert!(!line[3].is_bold());
    }

    #[test]
    fn font_color_and_entities() {
        let markup = parse_markup("<font color=\"#1a4141\">HC &amp; Rentometer</font>").expect("parse");
        let span = &markup.lines()[0][0];
        assert_eq!(span.text(), "HC & Rentometer");
        assert_eq!(span.color(), Some(Color::Rgb(0x1a, 0x41, 0x41)));
    }

    #[test]
    fn unterminated_tag_reports_opening_index() {
        let err = parse_markup("ok <b>oops").unwrap_err();
        assert_eq!(err.index(), 3);
        assert!(err.message().contains("</b>"));
    }

    #[test]
    fn stray_closing_tag_is_rejected() {
        let err = parse_markup("oops</i>").unwrap_err();
        assert_eq!(err.index(), 4);
    }

    #[test]
    fn invalid_color_is_rejected() {
        let err = parse_markup("<font color=\"#12FG34\">x</font>").unwrap_err();
        assert!(err.message().contains("invalid RGB"));
    }
}
