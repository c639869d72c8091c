//! Branded tables and KPI metric cards.
//!
//! [`BrandTable`] is a `genpdf` element of its own rather than a configured
//! [`genpdf::elements::TableLayout`]: the brief needs a header row that repeats on every page a
//! table spans and alternating row tints, neither of which the stock layout offers.

use std::ops::Range;

use genpdf::error::Error;
use genpdf::render::Area;
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Context, Element, RenderResult, Size};

use crate::brand::{pt, to_pt, BEIGE, CREAM, LIGHT_GRAY, TEAL, WHITE};
use crate::elements::{fill_rect, line, stroke_rect};
use crate::error::BriefError;
use crate::markup::{parse_markup, Markup};
use crate::styles::{Role, StyleDescriptor, StyleRegistry};
use crate::text::{TextBlock, TextMeasure};

const CELL_PADDING_X: f64 = 8.0;
const HEADER_PADDING_Y: f64 = 8.0;
const BODY_PADDING_Y: f64 = 6.0;

/// Background tint of data row `index`, counted from 1 below the header.
pub fn row_tint(index: usize) -> Color {
    if index % 2 == 0 {
        CREAM
    } else {
        WHITE
    }
}

/// How the first column of each data row is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirstColumn {
    /// Same style as every other cell.
    Regular,
    /// Bold row labels.
    Bold,
}

struct Cell {
    markup: Markup,
    descriptor: StyleDescriptor,
}

struct Row {
    cells: Vec<Cell>,
    background: Color,
    padding_y: f64,
}

impl Row {
    fn layout<M: TextMeasure + ?Sized>(&self, measure: &M, widths: &[f64]) -> (Vec<TextBlock>, f64) {
        let blocks: Vec<TextBlock> = self
            .cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                TextBlock::layout(
                    measure,
                    &cell.markup,
                    &cell.descriptor,
                    (width - 2.0 * CELL_PADDING_X).max(0.0),
                )
            })
            .collect();
        let content = blocks.iter().map(TextBlock::height).fold(0.0, f64::max);
        (blocks, content + 2.0 * self.padding_y)
    }

    fn draw(
        &self,
        context: &Context,
        area: &Area<'_>,
        widths: &[f64],
        y: f64,
    ) -> Result<f64, Error> {
        let (blocks, height) = self.layout(&context.font_cache, widths);
        let total: f64 = widths.iter().sum();
        fill_rect(area, 0.0, y, total, height, self.background);

        let mut x = 0.0;
        for (block, width) in blocks.iter().zip(widths) {
            block.draw(
                &context.font_cache,
                area,
                x + CELL_PADDING_X,
                y + self.padding_y,
                width - 2.0 * CELL_PADDING_X,
            )?;
            x += width;
        }
        Ok(height)
    }
}

/// A striped table whose header row repeats on every page it spans.
pub struct BrandTable {
    header: Row,
    rows: Vec<Row>,
    fractions: Vec<f64>,
    next_row: usize,
}

impl BrandTable {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.fractions.len()
    }

    /// Rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Header labels as plain text.
    pub fn header_labels(&self) -> Vec<String> {
        self.header
            .cells
            .iter()
            .map(|cell| cell.markup.to_plain_text())
            .collect()
    }

    /// Background of every row, header first.
    pub fn row_backgrounds(&self) -> Vec<Color> {
        std::iter::once(self.header.background)
            .chain(self.rows.iter().map(|row| row.background))
            .collect()
    }

    /// Whether data cells in `column` are bold.
    pub fn is_bold_column(&self, column: usize) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.get(column).is_some_and(|cell| cell.descriptor.bold))
    }

    fn widths(&self, frame_width: f64) -> Vec<f64> {
        self.fractions
            .iter()
            .map(|fraction| fraction * frame_width)
            .collect()
    }

    /// Claims the body rows that fit below the header in `available` points.
    ///
    /// Returns `None` when not even the header and the next row fit.  Rows are never split.
    fn take_page<M: TextMeasure + ?Sized>(
        &mut self,
        measure: &M,
        widths: &[f64],
        available: f64,
    ) -> Option<Range<usize>> {
        let (_, header_height) = self.header.layout(measure, widths);
        let start = self.next_row;
        let mut end = start;
        let mut y = header_height;
        for row in &self.rows[start..] {
            let (_, height) = row.layout(measure, widths);
            if y + height > available {
                break;
            }
            y += height;
            end += 1;
        }
        if header_height > available || (end == start && start < self.rows.len()) {
            return None;
        }
        self.next_row = end;
        Some(start..end)
    }

    fn draw_grid(area: &Area<'_>, widths: &[f64], boundaries: &[f64]) {
        let total: f64 = widths.iter().sum();
        let (Some(&top), Some(&bottom)) = (boundaries.first(), boundaries.last()) else {
            return;
        };
        for &y in boundaries {
            line(area, (0.0, y), (total, y), BEIGE);
        }
        let mut x = 0.0;
        line(area, (x, top), (x, bottom), BEIGE);
        for width in widths {
            x += width;
            line(area, (x, top), (x, bottom), BEIGE);
        }
    }
}

impl Element for BrandTable {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let frame_width = to_pt(area.size().width);
        let available = to_pt(area.size().height);
        let widths = self.widths(frame_width);

        let Some(page) = self.take_page(&context.font_cache, &widths, available) else {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        };

        let mut boundaries = vec![0.0];
        let mut y = self.header.draw(context, &area, &widths, 0.0)?;
        boundaries.push(y);
        for row in &self.rows[page] {
            y += row.draw(context, &area, &widths, y)?;
            boundaries.push(y);
        }

        Self::draw_grid(&area, &widths, &boundaries);

        let mut result = RenderResult::default();
        result.size = Size::new(pt(widths.iter().sum::<f64>()), pt(y));
        result.has_more = self.next_row < self.rows.len();
        Ok(result)
    }
}

fn collect_rows<R, C, S>(rows: R) -> Vec<Vec<String>>
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

fn build_table(
    styles: &StyleRegistry,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    fractions: &[f64],
    first_column: FirstColumn,
) -> Result<BrandTable, BriefError> {
    if fractions.len() != headers.len() {
        return Err(BriefError::ColumnWidths {
            headers: headers.len(),
            widths: fractions.len(),
        });
    }
    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != headers.len())
    {
        return Err(BriefError::TableShape {
            headers: headers.len(),
            row: index + 1,
            cells: row.len(),
        });
    }

    let header_style = styles.get(Role::TableHeader);
    let cell_style = styles.get(Role::TableCell);
    let label_style = match first_column {
        FirstColumn::Regular => cell_style,
        FirstColumn::Bold => styles.get(Role::TableCellBold),
    };

    let header = Row {
        cells: headers
            .iter()
            .map(|label| {
                Ok(Cell {
                    markup: parse_markup(label)?,
                    descriptor: header_style,
                })
            })
            .collect::<Result<_, BriefError>>()?,
        background: TEAL,
        padding_y: HEADER_PADDING_Y,
    };

    let body = rows
        .iter()
        .enumerate()
        .map(|(index, values)| {
            let cells = values
                .iter()
                .enumerate()
                .map(|(column, value)| {
                    Ok(Cell {
                        markup: parse_markup(value)?,
                        descriptor: if column == 0 { label_style } else { cell_style },
                    })
                })
                .collect::<Result<_, BriefError>>()?;
            Ok(Row {
                cells,
                background: row_tint(index + 1),
                padding_y: BODY_PADDING_Y,
            })
        })
        .collect::<Result<_, BriefError>>()?;

    log::trace!(
        "built {}x{} table ({:?} first column)",
        rows.len() + 1,
        headers.len(),
        first_column
    );

    Ok(BrandTable {
        header,
        rows: body,
        fractions: fractions.to_vec(),
        next_row: 0,
    })
}

/// Builds a striped table.  `fractions` are column widths as fractions of the frame width.
pub fn make_table<R, C, S>(
    styles: &StyleRegistry,
    headers: &[&str],
    rows: R,
    fractions: &[f64],
) -> Result<BrandTable, BriefError>
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    build_table(styles, headers, collect_rows(rows), fractions, FirstColumn::Regular)
}

/// Builds a striped table whose first column is set in bold.
pub fn make_bold_first_col_table<R, C, S>(
    styles: &StyleRegistry,
    headers: &[&str],
    rows: R,
    fractions: &[f64],
) -> Result<BrandTable, BriefError>
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    build_table(styles, headers, collect_rows(rows), fractions, FirstColumn::Bold)
}

/// A KPI card: a large value over a small label.
pub struct MetricCard {
    value: Markup,
    label: Markup,
    value_style: StyleDescriptor,
    label_style: StyleDescriptor,
}

impl MetricCard {
    const VALUE_PADDING: (f64, f64) = (12.0, 4.0);
    const LABEL_PADDING: (f64, f64) = (4.0, 8.0);

    fn blocks<M: TextMeasure + ?Sized>(&self, measure: &M, width: f64) -> (TextBlock, TextBlock) {
        let text_width = (width - 2.0 * CELL_PADDING_X).max(0.0);
        (
            TextBlock::layout(measure, &self.value, &self.value_style, text_width),
            TextBlock::layout(measure, &self.label, &self.label_style, text_width),
        )
    }

    fn row_heights(value: &TextBlock, label: &TextBlock) -> (f64, f64) {
        (
            Self::VALUE_PADDING.0 + value.height() + Self::VALUE_PADDING.1,
            Self::LABEL_PADDING.0 + label.height() + Self::LABEL_PADDING.1,
        )
    }

    /// Height of the card when it is `width` points wide.
    pub fn measure<M: TextMeasure + ?Sized>(&self, measure: &M, width: f64) -> f64 {
        let (value, label) = self.blocks(measure, width);
        let (top, bottom) = Self::row_heights(&value, &label);
        top + bottom
    }

    /// Plain text of the value and label.
    pub fn texts(&self) -> (String, String) {
        (self.value.to_plain_text(), self.label.to_plain_text())
    }

    fn draw(&self, context: &Context, area: &Area<'_>, x: f64, width: f64) -> Result<f64, Error> {
        let (value, label) = self.blocks(&context.font_cache, width);
        let (top, bottom) = Self::row_heights(&value, &label);
        let text_width = width - 2.0 * CELL_PADDING_X;

        fill_rect(area, x, 0.0, width, top, CREAM);
        fill_rect(area, x, top, width, bottom, LIGHT_GRAY);
        stroke_rect(area, (x, 0.0, width, top + bottom), BEIGE);

        value.draw(
            &context.font_cache,
            area,
            x + CELL_PADDING_X,
            Self::VALUE_PADDING.0,
            text_width,
        )?;
        label.draw(
            &context.font_cache,
            area,
            x + CELL_PADDING_X,
            top + Self::LABEL_PADDING.0,
            text_width,
        )?;
        Ok(top + bottom)
    }
}

/// Builds a KPI card with the registry's metric styles.
pub fn make_metric_card(
    styles: &StyleRegistry,
    label: &str,
    value: &str,
) -> Result<MetricCard, BriefError> {
    Ok(MetricCard {
        value: parse_markup(value)?,
        label: parse_markup(label)?,
        value_style: styles.get(Role::MetricValue).with_alignment(Alignment::Center),
        label_style: styles.get(Role::MetricLabel).with_alignment(Alignment::Center),
    })
}

/// Metric cards laid out side by side in equal slots.
pub struct MetricCardRow {
    cards: Vec<MetricCard>,
    gap: f64,
}

impl MetricCardRow {
    /// Places `cards` in equal slots separated by `gap` points.
    pub fn new(cards: Vec<MetricCard>, gap: f64) -> Self {
        Self { cards, gap }
    }

    /// Width of each card in a frame `frame_width` points wide.
    pub fn card_width(&self, frame_width: f64) -> f64 {
        let count = self.cards.len().max(1) as f64;
        (frame_width - self.gap * (count - 1.0)) / count
    }
}

impl Element for MetricCardRow {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let frame_width = to_pt(area.size().width);
        let card_width = self.card_width(frame_width);
        let height = self
            .cards
            .iter()
            .map(|card| card.measure(&context.font_cache, card_width))
            .fold(0.0, f64::max);

        let mut result = RenderResult::default();
        if height > to_pt(area.size().height) {
            result.has_more = true;
            return Ok(result);
        }

        let mut x = 0.0;
        for card in &self.cards {
            card.draw(context, &area, x, card_width)?;
            x += card_width + self.gap;
        }
        result.size = Size::new(pt(frame_width), pt(height));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::FixedAdvance;

    fn registry() -> StyleRegistry {
        StyleRegistry::brand()
    }

    #[test]
    fn table_counts_header_plus_rows() {
        let table = make_table(
            &registry(),
            &["Component", "Status"],
            [
                ["Web App", "Live"],
                ["Comp Analysis Tool", "Complete"],
                ["Portfolio Summary", "Complete"],
            ],
            &[0.4, 0.6],
        )
        .expect("table");
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header_labels(), vec!["Component", "Status"]);
    }

    #[test]
    fn rows_alternate_by_parity() {
        let rows: Vec<[&str; 1]> = (0..6).map(|_| ["x"]).collect();
        let table = make_table(&registry(), &["Only"], rows, &[1.0]).expect("table");
        let backgrounds = table.row_backgrounds();
        assert_eq!(backgrounds[0], TEAL);
        for (index, background) in backgrounds.iter().enumerate().skip(1) {
            assert_eq!(*background, row_tint(index));
            assert_eq!(*background, if index % 2 == 0 { CREAM } else { WHITE });
        }
    }

    #[test]
    fn bold_variant_only_emboldens_first_column() {
        let table = make_bold_first_col_table(
            &registry(),
            &["", "Detail"],
            [["Plan Required", "Teams (Annual)"], ["Annual Cost", "$1,990/yr"]],
            &[0.28, 0.72],
        )
        .expect("table");
        assert!(table.is_bold_column(0));
        assert!(!table.is_bold_column(1));

        let regular =
            make_table(&registry(), &["a", "b"], [["x", "y"]], &[0.5, 0.5]).expect("table");
        assert!(!regular.is_bold_column(0));
    }

    #[test]
    fn mismatched_row_is_rejected() {
        let err = make_table(
            &registry(),
            &["a", "b"],
            vec![vec!["1", "2"], vec!["3"]],
            &[0.5, 0.5],
        )
        .err()
        .expect("shape error");
        assert!(matches!(
            err,
            BriefError::TableShape {
                headers: 2,
                row: 2,
                cells: 1
            }
        ));
    }

    #[test]
    fn mismatched_widths_are_rejected() {
        let err = make_table(&registry(), &["a", "b"], [["1", "2"]], &[1.0])
            .err()
            .expect("width error");
        assert!(matches!(err, BriefError::ColumnWidths { headers: 2, widths: 1 }));
    }

    #[test]
    fn header_row_is_taller_than_single_line_body_row() {
        let table = make_table(&registry(), &["Metric"], [["Value"]], &[1.0]).expect("table");
        let widths = table.widths(512.0);
        let (_, header) = table.header.layout(&FixedAdvance, &widths);
        let (_, body) = table.rows[0].layout(&FixedAdvance, &widths);
        assert_eq!(header, 12.0 + 16.0);
        assert_eq!(body, 12.0 + 12.0);
    }

    #[test]
    fn metric_card_stacks_value_over_label() {
        let card = make_metric_card(&registry(), "Data Cost / Report", "~$1.32").expect("card");
        assert_eq!(card.texts(), ("~$1.32".to_string(), "Data Cost / Report".to_string()));
        // value row 12 + 26 + 4, label row 4 + 12 + 8
        assert_eq!(card.measure(&FixedAdvance, 120.0), 42.0 + 24.0);
    }

    #[test]
    fn card_row_splits_frame_evenly() {
        let styles = registry();
        let cards = (0..4)
            .map(|_| make_metric_card(&styles, "label", "1").expect("card"))
            .collect();
        let row = MetricCardRow::new(cards, 8.0);
        assert_eq!(row.card_width(512.0), (512.0 - 24.0) / 4.0);
    }

    fn long_table(rows: usize) -> BrandTable {
        let body: Vec<[String; 2]> = (0..rows)
            .map(|i| [format!("Item {}", i + 1), "Complete".to_string()])
            .collect();
        make_table(&registry(), &["Component", "Status"], body, &[0.4, 0.6]).expect("table")
    }

    #[test]
    fn long_table_continues_with_whole_rows() {
        let mut table = long_table(10);
        let widths = table.widths(512.0);
        // header 28 plus three 24pt rows, with a point to spare
        let available = 28.0 + 3.0 * 24.0 + 1.0;

        let mut pages = Vec::new();
        while let Some(page) = table.take_page(&FixedAdvance, &widths, available) {
            pages.push(page);
            if table.next_row == table.rows.len() {
                break;
            }
        }
        assert_eq!(pages, vec![0..3, 3..6, 6..9, 9..10]);
        assert_eq!(table.next_row, 10);
    }

    #[test]
    fn header_is_counted_on_every_page() {
        let mut table = long_table(4);
        let widths = table.widths(512.0);
        // two rows alone would fit in 52pt, but not below the 28pt header
        assert_eq!(table.take_page(&FixedAdvance, &widths, 52.0 + 28.0), Some(0..2));
        assert_eq!(table.take_page(&FixedAdvance, &widths, 52.0), Some(2..3));
        assert_eq!(table.take_page(&FixedAdvance, &widths, 52.0), Some(3..4));
    }

    #[test]
    fn table_without_room_for_header_and_row_is_deferred() {
        let mut table = long_table(2);
        let widths = table.widths(512.0);
        assert_eq!(table.take_page(&FixedAdvance, &widths, 28.0 + 23.0), None);
        assert_eq!(table.next_row, 0);
        assert_eq!(table.take_page(&FixedAdvance, &widths, 28.0 + 48.0), Some(0..2));
    }
}
