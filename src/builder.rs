//! Document assembly: the branded page decorator, the flow sequence and the render call.

use std::fs;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::render::Area;
use genpdf::style::{Color, Style};
use genpdf::{Context, Element, PageDecorator, Position, RenderResult};
use log::{debug, info};

use crate::brand::{pt, to_pt, PageGeometry, BEIGE, FOOTER_BRANDING, GREENERY, TEAL};
use crate::elements::fill_rect;
use crate::error::BriefError;
use crate::fonts;
use crate::text::TextMeasure;
use crate::tracking::{Outline, OutlineEntry, PageTracker};

const FOOTER_BAND_HEIGHT: f64 = 28.0;
const FOOTER_ACCENT: f64 = 2.0;
const FOOTER_FONT_SIZE: u8 = 8;
const PAGE_LABEL_INSET: f64 = 40.0;

/// Draws the footer band on every page and applies the frame margins.
pub struct BrandPageDecorator {
    geometry: PageGeometry,
    footer_text: String,
    tracker: PageTracker,
}

impl BrandPageDecorator {
    /// Creates a decorator that numbers pages through `tracker`.
    pub fn new(geometry: PageGeometry, footer_text: impl Into<String>, tracker: PageTracker) -> Self {
        Self {
            geometry,
            footer_text: footer_text.into(),
            tracker,
        }
    }

    fn draw_footer(&self, context: &Context, area: &Area<'_>, page: usize) {
        let width = to_pt(area.size().width);
        let height = to_pt(area.size().height);
        let band_top = height - FOOTER_BAND_HEIGHT;

        for ((x, y, w, h), color) in footer_fills(width, height) {
            fill_rect(area, x, y, w, h, color);
        }

        let style = Style::new()
            .with_font_size(FOOTER_FONT_SIZE)
            .with_color(BEIGE);
        let font_cache = &context.font_cache;
        let text_top =
            band_top + (FOOTER_BAND_HEIGHT - TextMeasure::line_height(font_cache, style)) / 2.0;

        let branding_width = font_cache.text_width(style, &self.footer_text);
        print_at(
            area,
            context,
            ((width - branding_width) / 2.0, text_top),
            &self.footer_text,
            style,
        );

        let label = format!("Page {}", page);
        let label_width = font_cache.text_width(style, &label);
        print_at(
            area,
            context,
            (width - PAGE_LABEL_INSET - label_width, text_top),
            &label,
            style,
        );
    }
}

/// The teal footer band and the greenery accent along its top edge, inside the band.
fn footer_fills(width: f64, page_height: f64) -> [((f64, f64, f64, f64), Color); 2] {
    let band_top = page_height - FOOTER_BAND_HEIGHT;
    [
        ((0.0, band_top, width, FOOTER_BAND_HEIGHT), TEAL),
        ((0.0, band_top, width, FOOTER_ACCENT), GREENERY),
    ]
}

fn print_at(area: &Area<'_>, context: &Context, (x, y): (f64, f64), text: &str, style: Style) {
    if let Some(mut section) =
        area.text_section(&context.font_cache, Position::new(pt(x), pt(y)), style)
    {
        if let Err(err) = section.print_str(text, style) {
            log::warn!("failed to print footer text {:?}: {}", text, err);
        }
    }
}

impl PageDecorator for BrandPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: Area<'a>,
        _style: Style,
    ) -> Result<Area<'a>, Error> {
        let page = self.tracker.advance();
        debug!("decorating page {}", page);
        self.draw_footer(context, &area, page);
        area.add_margins(self.geometry.margins());
        Ok(area)
    }
}

/// Adapts a boxed element for `genpdf::Document::push`.
struct Flowable(Box<dyn Element>);

impl Element for Flowable {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.0.render(context, area, style)
    }
}

/// The ordered flow sequence handed to the layout engine.
#[derive(Default)]
pub struct Story {
    elements: Vec<Box<dyn Element>>,
}

impl Story {
    /// Creates an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element.
    pub fn push<E: Element + 'static>(&mut self, element: E) {
        self.elements.push(Box::new(element));
    }

    /// Appends an element, builder style.
    pub fn with<E: Element + 'static>(mut self, element: E) -> Self {
        self.push(element);
        self
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` when nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A rendered document.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// Serialised PDF.
    pub bytes: Vec<u8>,
    /// Number of pages the decorator saw.
    pub page_count: usize,
    /// Section headings with the pages they landed on.
    pub outline: Vec<OutlineEntry>,
}

impl RenderedPdf {
    /// Adds a bookmark tree built from the recorded outline.
    #[cfg(feature = "bookmarks")]
    pub fn with_bookmarks(mut self) -> Result<Self, BriefError> {
        self.bytes = crate::bookmarks::apply_outline(&self.bytes, &self.outline)?;
        Ok(self)
    }

    /// Writes the bytes to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<(), BriefError> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| BriefError::io(parent, err))?;
        }
        fs::write(path, &self.bytes).map_err(|err| BriefError::io(path, err))?;
        info!("wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

/// Configures and runs a render.
pub struct DocumentBuilder {
    geometry: PageGeometry,
    title: String,
    footer_text: String,
    fonts_dir: Option<PathBuf>,
    tracker: PageTracker,
    outline: Outline,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::letter(),
            title: "Propwell AMP Weekly Platform Brief".to_owned(),
            footer_text: FOOTER_BRANDING.to_owned(),
            fonts_dir: None,
            tracker: PageTracker::new(),
            outline: Outline::new(),
        }
    }
}

impl DocumentBuilder {
    /// Creates a builder for a Letter page with the brand footer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the PDF document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the centred footer text.
    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = text.into();
        self
    }

    /// Searches `dir` for fonts before the default candidates.
    pub fn with_fonts_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.fonts_dir = dir;
        self
    }

    /// Page geometry used for the render.
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Page counter shared with the decorator.  Headings anchor to it.
    pub fn tracker(&self) -> PageTracker {
        self.tracker.clone()
    }

    /// Outline the headings record into.
    pub fn outline(&self) -> Outline {
        self.outline.clone()
    }

    /// Paginates `story` and serialises the document.
    pub fn render(self, story: Story) -> Result<RenderedPdf, BriefError> {
        let (family, source) =
            fonts::resolve_font_family(self.fonts_dir.as_deref()).map_err(BriefError::FontLoad)?;
        debug!(
            "rendering {} elements with {} (builtin: {})",
            story.len(),
            source.family,
            source.builtin
        );

        let mut document = genpdf::Document::new(family);
        document.set_title(self.title.as_str());
        document.set_paper_size(self.geometry.paper_size());
        document.set_page_decorator(BrandPageDecorator::new(
            self.geometry,
            self.footer_text.as_str(),
            self.tracker.clone(),
        ));
        for element in story.elements {
            document.push(Flowable(element));
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(BriefError::Render)?;

        let page_count = self.tracker.current();
        info!("rendered {} pages", page_count);
        Ok(RenderedPdf {
            bytes,
            page_count,
            outline: self.outline.entries(),
        })
    }

    /// Renders `story` and writes it to `path`.
    pub fn render_to_file(self, story: Story, path: &Path) -> Result<RenderedPdf, BriefError> {
        let rendered = self.render(story)?;
        rendered.write_to(path)?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Spacer;

    #[test]
    fn story_keeps_push_order_count() {
        let mut story = Story::new();
        assert!(story.is_empty());
        story.push(Spacer::new(4.0));
        let story = story.with(Spacer::new(8.0));
        assert_eq!(story.len(), 2);
    }

    #[test]
    fn builder_shares_tracker_and_outline() {
        let builder = DocumentBuilder::new();
        builder.tracker().advance();
        assert_eq!(builder.tracker().current(), 1);
        builder.outline().record("1. Platform Status", 1);
        assert_eq!(builder.outline().entries().len(), 1);
        assert_eq!(builder.geometry(), PageGeometry::letter());
    }

    #[test]
    fn footer_accent_sits_inside_the_band() {
        let [(band, band_color), (accent, accent_color)] = footer_fills(612.0, 792.0);
        assert_eq!(band_color, TEAL);
        assert_eq!(accent_color, GREENERY);
        assert_eq!(band, (0.0, 764.0, 612.0, 28.0));
        assert_eq!(accent.1, band.1);
        assert!(accent.1 + accent.3 <= band.1 + band.3);
        assert_eq!(accent.3, FOOTER_ACCENT);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("propwell-brief-write-{}", std::process::id()));
        let path = dir.join("nested/brief.pdf");
        let rendered = RenderedPdf {
            bytes: b"%PDF-1.3\n".to_vec(),
            page_count: 1,
            outline: Vec::new(),
        };
        rendered.write_to(&path).expect("write");
        assert_eq!(fs::read(&path).expect("read back"), b"%PDF-1.3\n");
        fs::remove_dir_all(&dir).ok();
    }
}
