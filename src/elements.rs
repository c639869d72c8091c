//! Brand flowables built on top of `genpdf` primitives.
//!
//! `genpdf` only strokes 1pt lines and has no filled shapes, so the helpers at the top of this
//! module paint rectangles as stacks of overlapping hairlines.  Everything else in the brief
//! (bars, callouts, table rows, the footer band) is drawn with them.

use std::ops::Range;

use genpdf::error::Error;
use genpdf::render::Area;
use genpdf::style::{Color, Style};
use genpdf::{Context, Element, Position, RenderResult, Size};

use crate::brand::{pt, to_pt, CREAM, GREENERY, GREENERY_DARK, TEAL};
use crate::markup::Markup;
use crate::styles::StyleDescriptor;
use crate::text::{TextBlock, TextMeasure};
use crate::tracking::{Outline, PageTracker};

const ROUNDING_STEPS: usize = 4;
const STRIP_OVERLAP: f64 = 0.05;
/// Widest gap between the hairlines that fill a shape, in points.
const HAIRLINE_SPACING: f64 = 0.75;

/// Which corners of a filled box are rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corners {
    pub top: bool,
    pub bottom: bool,
}

impl Corners {
    pub const ALL: Corners = Corners {
        top: true,
        bottom: true,
    };
    pub const TOP: Corners = Corners {
        top: true,
        bottom: false,
    };
}

fn stroke(color: Color) -> Style {
    Style::new().with_color(color)
}

/// Vertical offsets of the 1pt hairlines that cover a band `height` points tall.
///
/// The first and last hairline sit half a point inside the band edges.  Bands thinner than a
/// point get a single centred hairline.
pub(crate) fn hairline_offsets(height: f64) -> Vec<f64> {
    if height <= 0.0 {
        return Vec::new();
    }
    if height <= 1.0 {
        return vec![height / 2.0];
    }
    let span = height - 1.0;
    let gaps = (span / HAIRLINE_SPACING).ceil().max(1.0);
    let step = span / gaps;
    (0..=gaps as usize).map(|i| 0.5 + i as f64 * step).collect()
}

/// Draws a 1pt line between two points.
pub(crate) fn line(area: &Area<'_>, from: (f64, f64), to: (f64, f64), color: Color) {
    area.draw_line(
        vec![
            Position::new(pt(from.0), pt(from.1)),
            Position::new(pt(to.0), pt(to.1)),
        ],
        stroke(color),
    );
}

/// Paints a filled rectangle with its top-left corner at (`x`, `y`).
pub(crate) fn fill_rect(area: &Area<'_>, x: f64, y: f64, width: f64, height: f64, color: Color) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    for offset in hairline_offsets(height) {
        line(area, (x, y + offset), (x + width, y + offset), color);
    }
}

/// Paints a filled rectangle whose selected corners follow a quarter circle of `radius`.
pub(crate) fn fill_rounded_rect(
    area: &Area<'_>,
    (x, y, width, height): (f64, f64, f64, f64),
    radius: f64,
    corners: Corners,
    color: Color,
) {
    let radius = radius.min(width / 2.0).min(height / 2.0);
    if radius <= 0.0 {
        fill_rect(area, x, y, width, height, color);
        return;
    }

    let top = if corners.top { radius } else { 0.0 };
    let bottom = if corners.bottom { radius } else { 0.0 };
    fill_rect(area, x, y + top, width, height - top - bottom, color);

    let strip = radius / ROUNDING_STEPS as f64;
    for step in 0..ROUNDING_STEPS {
        let from_centre = radius - (step as f64 + 0.5) * strip;
        let inset = radius - (radius * radius - from_centre * from_centre).max(0.0).sqrt();
        let strip_width = width - 2.0 * inset;
        if corners.top {
            let strip_y = y + step as f64 * strip;
            fill_rect(area, x + inset, strip_y, strip_width, strip + STRIP_OVERLAP, color);
        }
        if corners.bottom {
            let strip_y = y + height - (step as f64 + 1.0) * strip - STRIP_OVERLAP;
            fill_rect(area, x + inset, strip_y, strip_width, strip + STRIP_OVERLAP, color);
        }
    }
}

/// Strokes the outline of a rectangle with a 1pt line.
pub(crate) fn stroke_rect(area: &Area<'_>, (x, y, width, height): (f64, f64, f64, f64), color: Color) {
    area.draw_line(
        vec![
            Position::new(pt(x), pt(y)),
            Position::new(pt(x + width), pt(y)),
            Position::new(pt(x + width), pt(y + height)),
            Position::new(pt(x), pt(y + height)),
            Position::new(pt(x), pt(y)),
        ],
        stroke(color),
    );
}

fn area_width(area: &Area<'_>) -> f64 {
    to_pt(area.size().width)
}

fn area_height(area: &Area<'_>) -> f64 {
    to_pt(area.size().height)
}

fn rendered(width: f64, height: f64, has_more: bool) -> RenderResult {
    let mut result = RenderResult::default();
    result.size = Size::new(pt(width), pt(height));
    result.has_more = has_more;
    result
}

fn deferred() -> RenderResult {
    let mut result = RenderResult::default();
    result.has_more = true;
    result
}

/// Fixed vertical gap.  Truncated when it reaches the bottom of the frame.
pub struct Spacer {
    height: f64,
}

impl Spacer {
    /// Creates a gap of `height` points.
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        Ok(rendered(0.0, self.height.min(area_height(&area)), false))
    }
}

/// Full-width teal bar with a greenery accent stripe along its bottom edge.
pub struct BrandBar {
    width: Option<f64>,
    height: f64,
}

impl BrandBar {
    const ACCENT: f64 = 1.5;

    /// Creates a 4pt bar spanning `width` points, or the full frame when `None`.
    pub fn new(width: impl Into<Option<f64>>) -> Self {
        Self {
            width: width.into(),
            height: 4.0,
        }
    }
}

impl Element for BrandBar {
    fn render(
        &mut self,
        _context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        if self.height > area_height(&area) {
            return Ok(deferred());
        }
        let width = self.width.unwrap_or_else(|| area_width(&area));
        fill_rect(&area, 0.0, 0.0, width, self.height - 1.0, TEAL);
        fill_rect(&area, 0.0, self.height - Self::ACCENT, width, Self::ACCENT, GREENERY);
        Ok(rendered(width, self.height, false))
    }
}

/// Rounded cream box with a green stripe on the left, used for credentials and recommendations.
///
/// The box measures its wrapped text before drawing so the background can be sized up front and
/// the whole box moved to the next page when it does not fit.
pub struct CalloutBox {
    markup: Markup,
    descriptor: StyleDescriptor,
    width: Option<f64>,
}

impl CalloutBox {
    const PADDING_LEFT: f64 = 16.0;
    const PADDING_HORIZONTAL: f64 = 28.0;
    const PADDING_TOP: f64 = 8.0;
    const PADDING_VERTICAL: f64 = 16.0;
    const STRIPE: f64 = 4.0;
    const RADIUS: f64 = 4.0;

    /// Creates a callout spanning `width` points, or the full frame when `None`.
    pub fn new(width: impl Into<Option<f64>>, markup: Markup, descriptor: StyleDescriptor) -> Self {
        Self {
            markup,
            descriptor,
            width: width.into(),
        }
    }

    fn layout<M: TextMeasure + ?Sized>(&self, measure: &M, width: f64) -> TextBlock {
        TextBlock::layout(
            measure,
            &self.markup,
            &self.descriptor,
            width - Self::PADDING_HORIZONTAL,
        )
    }

    /// Height of the box when it is `width` points wide.
    pub fn measure<M: TextMeasure + ?Sized>(&self, measure: &M, width: f64) -> f64 {
        self.layout(measure, width).height() + Self::PADDING_VERTICAL
    }
}

impl Element for CalloutBox {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = self
            .width
            .map_or_else(|| area_width(&area), |w| w.min(area_width(&area)));
        let block = self.layout(&context.font_cache, width);
        let height = block.height() + Self::PADDING_VERTICAL;
        if height > area_height(&area) {
            return Ok(deferred());
        }

        fill_rounded_rect(&area, (0.0, 0.0, width, height), Self::RADIUS, Corners::ALL, CREAM);
        fill_rect(&area, 0.0, 0.0, Self::STRIPE, height, GREENERY_DARK);
        block.draw(
            &context.font_cache,
            &area,
            Self::PADDING_LEFT,
            Self::PADDING_TOP,
            width - Self::PADDING_HORIZONTAL,
        )?;
        Ok(rendered(width, height, false))
    }
}

/// Glyph drawn in front of the first line of a [`TextFlow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// An empty square check box.
    CheckBox,
}

impl Marker {
    const GAP: f64 = 6.0;

    fn size(self, descriptor: &StyleDescriptor) -> f64 {
        match self {
            Marker::CheckBox => f64::from(descriptor.font_size) * 0.8,
        }
    }

    fn indent(self, descriptor: &StyleDescriptor) -> f64 {
        self.size(descriptor) + Self::GAP
    }
}

/// The part of a [`TextFlow`] placed on one page.
#[derive(Clone, Debug, PartialEq)]
struct FlowPiece {
    top: f64,
    lines: Range<usize>,
    height: f64,
    has_more: bool,
}

/// A styled paragraph that flows across pages line by line.
pub struct TextFlow {
    markup: Markup,
    descriptor: StyleDescriptor,
    marker: Option<Marker>,
    cache: Option<(f64, TextBlock)>,
    next_line: usize,
}

impl TextFlow {
    /// Creates a paragraph with the attributes of `descriptor`.
    pub fn new(markup: Markup, descriptor: StyleDescriptor) -> Self {
        Self {
            markup,
            descriptor,
            marker: None,
            cache: None,
            next_line: 0,
        }
    }

    /// Prefixes the first line with `marker`.
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Plain text of the paragraph.
    pub fn plain_text(&self) -> String {
        self.markup.to_plain_text()
    }

    fn text_offset(&self) -> f64 {
        self.descriptor.left_indent
            + self.marker.map_or(0.0, |marker| marker.indent(&self.descriptor))
    }

    fn block<M: TextMeasure + ?Sized>(&mut self, measure: &M, frame_width: f64) -> &TextBlock {
        let width = frame_width - self.text_offset();
        let stale = !matches!(&self.cache, Some((cached, _)) if (*cached - width).abs() < f64::EPSILON);
        if stale {
            self.cache = None;
        }
        let (_, block) = self.cache.get_or_insert_with(|| {
            (width, TextBlock::layout(measure, &self.markup, &self.descriptor, width))
        });
        block
    }

    /// Full height including space before and after, at `frame_width`.
    pub fn measure<M: TextMeasure + ?Sized>(&mut self, measure: &M, frame_width: f64) -> f64 {
        let before = self.descriptor.space_before;
        let after = self.descriptor.space_after;
        before + self.block(measure, frame_width).height() + after
    }

    /// Claims the lines that fit in `available` points, starting after the last drawn line.
    ///
    /// Returns `None` when the next line does not fit.  Space before is only added above the
    /// first line and space after only below the last one.
    fn take_piece<M: TextMeasure + ?Sized>(
        &mut self,
        measure: &M,
        frame_width: f64,
        available: f64,
    ) -> Option<FlowPiece> {
        let start = self.next_line;
        let top = if start == 0 {
            self.descriptor.space_before.min(available)
        } else {
            0.0
        };
        let space_after = self.descriptor.space_after;

        let block = self.block(measure, frame_width);
        let total = block.lines().len();
        let end = start + block.lines_fitting(start, available - top);
        if end == start && start < total {
            return None;
        }
        let drawn: f64 = block.lines()[start..end].iter().map(|line| line.height()).sum();

        let has_more = end < total;
        let mut height = top + drawn;
        if !has_more {
            height = (height + space_after).min(available);
        }
        self.next_line = end;
        Some(FlowPiece {
            top,
            lines: start..end,
            height,
            has_more,
        })
    }

    fn draw_marker(&self, area: &Area<'_>, top: f64, line_height: f64) {
        if let Some(marker @ Marker::CheckBox) = self.marker {
            let side = marker.size(&self.descriptor);
            let y = top + (line_height - side) / 2.0;
            let rect = (self.descriptor.left_indent, y, side, side);
            stroke_rect(area, rect, self.descriptor.color);
        }
    }
}

impl Element for TextFlow {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = area_width(&area);
        let Some(piece) = self.take_piece(&context.font_cache, width, area_height(&area)) else {
            return Ok(deferred());
        };

        let offset = self.text_offset();
        let block = self.block(&context.font_cache, width).clone();
        block.draw_range(
            &context.font_cache,
            &area,
            offset,
            piece.top,
            width - offset,
            piece.lines.clone(),
        )?;
        if piece.lines.start == 0 {
            if let Some(line) = block.lines().first() {
                self.draw_marker(&area, piece.top, line.height());
            }
        }
        Ok(rendered(width, piece.height, piece.has_more))
    }
}

/// Links a heading to the outline so bookmarks can point at its page.
#[derive(Clone, Debug)]
pub struct Anchor {
    outline: Outline,
    tracker: PageTracker,
}

impl Anchor {
    /// Records into `outline` using the page numbers counted by `tracker`.
    pub fn new(outline: Outline, tracker: PageTracker) -> Self {
        Self { outline, tracker }
    }
}

/// A section heading.  Records its page in the outline the first time it is drawn.
pub struct Heading {
    flow: TextFlow,
    anchor: Option<Anchor>,
    recorded: bool,
}

impl Heading {
    /// Creates a heading with the attributes of `descriptor`.
    pub fn new(markup: Markup, descriptor: StyleDescriptor) -> Self {
        Self {
            flow: TextFlow::new(markup, descriptor),
            anchor: None,
            recorded: false,
        }
    }

    /// Attaches the heading to an outline.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

impl Element for Heading {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let result = self.flow.render(context, area, style)?;
        if !self.recorded && to_pt(result.size.height) > 0.0 {
            if let Some(anchor) = &self.anchor {
                anchor
                    .outline
                    .record(self.flow.plain_text(), anchor.tracker.current());
            }
            self.recorded = true;
        }
        Ok(result)
    }
}

/// Keeps a run of paragraphs on one page when they fit on an empty one.
///
/// If the group does not fit in the space left on the current page it moves, once, to the next
/// page.  A group taller than `frame_height` is flowed normally.
pub struct KeepTogether {
    items: Vec<TextFlow>,
    frame_height: f64,
    current: usize,
    checked: bool,
    moved: bool,
}

impl KeepTogether {
    /// Groups `items`, given the height of an empty frame.
    pub fn new(items: Vec<TextFlow>, frame_height: f64) -> Self {
        Self {
            items,
            frame_height,
            current: 0,
            checked: false,
            moved: false,
        }
    }

    /// Number of grouped paragraphs.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the group is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decides, before anything is drawn, whether the group starts on the next page instead.
    fn defers<M: TextMeasure + ?Sized>(&mut self, measure: &M, width: f64, available: f64) -> bool {
        if self.checked {
            return false;
        }
        self.checked = true;
        let total: f64 = self
            .items
            .iter_mut()
            .map(|item| item.measure(measure, width))
            .sum();
        self.moved = total > available && total <= self.frame_height;
        self.moved
    }
}

impl Element for KeepTogether {
    fn render(
        &mut self,
        context: &Context,
        mut area: Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let width = area_width(&area);
        if self.defers(&context.font_cache, width, area_height(&area)) {
            return Ok(deferred());
        }

        let mut height = 0.0;
        while let Some(item) = self.items.get_mut(self.current) {
            let result = item.render(context, area.clone(), style)?;
            let item_height = to_pt(result.size.height);
            height += item_height;
            if result.has_more {
                return Ok(rendered(width, height, true));
            }
            area.add_offset(Position::new(0, pt(item_height)));
            self.current += 1;
        }
        Ok(rendered(width, height, false))
    }
}

/// The lightning bolt mark, as a closed outline in a 48 unit box.
const BOLT_OUTLINE: [(f64, f64); 7] = [
    (28.0, 5.0),
    (16.0, 23.0),
    (24.0, 23.0),
    (14.0, 43.0),
    (36.0, 21.0),
    (26.0, 21.0),
    (28.0, 5.0),
];

/// Teal title band: title, subtitle and date over rounded top corners, with the bolt mark.
pub struct Banner {
    lines: Vec<(Markup, StyleDescriptor, f64)>,
    width: Option<f64>,
}

impl Banner {
    const PADDING_HORIZONTAL: f64 = 20.0;
    const PADDING_TOP: f64 = 20.0;
    const PADDING_BOTTOM: f64 = 16.0;
    const LINE_GAP: f64 = 2.0;
    const RADIUS: f64 = 6.0;
    const MARK_SIZE: f64 = 36.0;

    /// Creates a banner spanning `width` points, or the full frame when `None`.
    pub fn new(width: impl Into<Option<f64>>) -> Self {
        Self {
            lines: Vec::new(),
            width: width.into(),
        }
    }

    /// Appends a line of text.
    pub fn with_line(mut self, markup: Markup, descriptor: StyleDescriptor) -> Self {
        self.lines.push((markup, descriptor, Self::LINE_GAP));
        self
    }

    fn text_width(width: f64) -> f64 {
        width - 2.0 * Self::PADDING_HORIZONTAL - Self::MARK_SIZE - 8.0
    }

    fn blocks<M: TextMeasure + ?Sized>(&self, measure: &M, width: f64) -> Vec<(TextBlock, f64)> {
        let text_width = Self::text_width(width);
        let last = self.lines.len().saturating_sub(1);
        self.lines
            .iter()
            .enumerate()
            .map(|(index, (markup, descriptor, gap))| {
                let block = TextBlock::layout(measure, markup, descriptor, text_width);
                (block, if index == last { 0.0 } else { *gap })
            })
            .collect()
    }

    /// Height of the banner when it is `width` points wide.
    pub fn measure<M: TextMeasure + ?Sized>(&self, measure: &M, width: f64) -> f64 {
        let text: f64 = self
            .blocks(measure, width)
            .iter()
            .map(|(block, gap)| block.height() + gap)
            .sum();
        Self::PADDING_TOP + text + Self::PADDING_BOTTOM
    }

    fn draw_mark(area: &Area<'_>, x: f64, y: f64) {
        let scale = Self::MARK_SIZE / 48.0;
        let points = BOLT_OUTLINE
            .iter()
            .map(|(px, py)| Position::new(pt(x + px * scale), pt(y + py * scale)))
            .collect();
        area.draw_line(points, stroke(GREENERY));
    }
}

impl Element for Banner {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = self
            .width
            .map_or_else(|| area_width(&area), |w| w.min(area_width(&area)));
        let height = self.measure(&context.font_cache, width);
        if height > area_height(&area) {
            return Ok(deferred());
        }

        fill_rounded_rect(&area, (0.0, 0.0, width, height), Self::RADIUS, Corners::TOP, TEAL);
        Self::draw_mark(
            &area,
            width - Self::PADDING_HORIZONTAL - Self::MARK_SIZE,
            Self::PADDING_TOP,
        );

        let text_width = Self::text_width(width);
        let mut y = Self::PADDING_TOP;
        for (block, gap) in self.blocks(&context.font_cache, width) {
            block.draw(&context.font_cache, &area, Self::PADDING_HORIZONTAL, y, text_width)?;
            y += block.height() + gap;
        }
        Ok(rendered(width, height, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::styles::{Role, StyleRegistry};
    use crate::text::testing::FixedAdvance;

    fn callout(text: &str) -> CalloutBox {
        let registry = StyleRegistry::brand();
        CalloutBox::new(None, parse_markup(text).expect("parse"), registry.get(Role::Callout))
    }

    #[test]
    fn callout_height_covers_text_and_padding() {
        let registry = StyleRegistry::brand();
        let text = "<b>Recommendation:</b> Start with HC + Rentometer ($182/mo). Evaluate \
                    RentCast after live data is running.";
        let callout = callout(text);
        let markup = parse_markup(text).expect("parse");
        for width in [150.0, 300.0, 512.0] {
            let block =
                TextBlock::layout(&FixedAdvance, &markup, &registry.get(Role::Callout), width - 28.0);
            assert!(callout.measure(&FixedAdvance, width) >= block.height() + 16.0);
        }
    }

    #[test]
    fn callout_height_is_reproducible() {
        let callout = callout("<b>Login URL:</b> a<br/><b>Email:</b> b<br/><b>Password:</b> c");
        let first = callout.measure(&FixedAdvance, 512.0);
        let second = callout.measure(&FixedAdvance, 512.0);
        assert_eq!(first, second);
        assert_eq!(first, 3.0 * 14.0 + 16.0);
    }

    #[test]
    fn narrower_callouts_grow_taller() {
        let callout = callout("one two three four five six seven eight nine ten");
        assert!(callout.measure(&FixedAdvance, 80.0) > callout.measure(&FixedAdvance, 512.0));
    }

    #[test]
    fn text_flow_measure_includes_spacing() {
        let registry = StyleRegistry::brand();
        let h1 = registry.get(Role::Heading1);
        let mut flow = TextFlow::new(Markup::plain("1. Platform Status"), h1);
        assert_eq!(flow.measure(&FixedAdvance, 512.0), 18.0 + 22.0 + 8.0);
    }

    #[test]
    fn check_box_marker_shifts_text() {
        let registry = StyleRegistry::brand();
        let check = registry.get(Role::Check);
        let flow = TextFlow::new(Markup::plain("Sign in"), check).with_marker(Marker::CheckBox);
        assert_eq!(flow.text_offset(), 12.0 + 8.0 + 6.0);
    }

    #[test]
    fn hairlines_cover_the_band() {
        for height in [1.5, 3.0, 4.0, 28.0, 61.25] {
            let offsets = hairline_offsets(height);
            assert_eq!(offsets.first().copied(), Some(0.5));
            let last = offsets.last().copied().expect("offsets");
            assert!((last - (height - 0.5)).abs() < 1e-9, "{height}: {last}");
            for pair in offsets.windows(2) {
                assert!(pair[1] - pair[0] <= HAIRLINE_SPACING + 1e-9);
                assert!(pair[1] > pair[0]);
            }
        }
        assert_eq!(hairline_offsets(0.5), vec![0.25]);
        assert!(hairline_offsets(0.0).is_empty());
    }

    fn four_line_body() -> TextFlow {
        let registry = StyleRegistry::brand();
        let markup = parse_markup("one<br/>two<br/>three<br/>four").expect("parse");
        TextFlow::new(markup, registry.get(Role::Body))
    }

    #[test]
    fn text_flow_continues_on_next_page() {
        let mut flow = four_line_body();
        // 14pt lines, 6pt space after
        let first = flow.take_piece(&FixedAdvance, 512.0, 30.0).expect("first piece");
        assert_eq!(first.lines, 0..2);
        assert_eq!(first.height, 28.0);
        assert!(first.has_more);
        assert_eq!(flow.next_line, 2);

        let second = flow.take_piece(&FixedAdvance, 512.0, 700.0).expect("second piece");
        assert_eq!(second.top, 0.0);
        assert_eq!(second.lines, 2..4);
        assert_eq!(second.height, 28.0 + 6.0);
        assert!(!second.has_more);
    }

    #[test]
    fn text_flow_without_room_for_a_line_is_deferred() {
        let mut flow = four_line_body();
        assert_eq!(flow.take_piece(&FixedAdvance, 512.0, 13.0), None);
        assert_eq!(flow.next_line, 0);
    }

    fn group(frame_height: f64) -> KeepTogether {
        KeepTogether::new(vec![four_line_body(), four_line_body()], frame_height)
    }

    #[test]
    fn keep_together_moves_once_when_short_of_room() {
        // each paragraph is 4 * 14 + 6 = 62pt
        let mut keep = group(700.0);
        assert!(keep.defers(&FixedAdvance, 512.0, 100.0));
        assert!(keep.moved);
        assert!(!keep.defers(&FixedAdvance, 512.0, 100.0));
    }

    #[test]
    fn keep_together_stays_when_it_fits() {
        let mut keep = group(700.0);
        assert!(!keep.defers(&FixedAdvance, 512.0, 124.0));
        assert!(!keep.moved);
    }

    #[test]
    fn keep_together_taller_than_a_frame_flows() {
        let mut keep = group(120.0);
        assert!(!keep.defers(&FixedAdvance, 512.0, 100.0));
        assert!(!keep.moved);
    }

    #[test]
    fn banner_height_stacks_lines() {
        let registry = StyleRegistry::brand();
        let banner = Banner::new(488.0)
            .with_line(Markup::plain("PROPWELL AMP"), registry.get(Role::Title))
            .with_line(Markup::plain("Weekly Platform Brief"), registry.get(Role::Subtitle))
            .with_line(Markup::plain("Week of February 23, 2026"), registry.get(Role::Date));
        // 34 + 2 + 18 + 2 + 14 between 20pt top and 16pt bottom padding.
        assert_eq!(banner.measure(&FixedAdvance, 488.0), 20.0 + 70.0 + 16.0);
    }
}
