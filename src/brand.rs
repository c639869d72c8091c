//! Brand palette, page geometry and unit helpers.
//!
//! Every brand measurement in this crate is written in PostScript points (1/72 inch) because that
//! is how the layout was designed.  `genpdf` works in millimetres, so values cross over through
//! [`pt`] and [`to_pt`] right before they reach the renderer.

use genpdf::style::Color;
use genpdf::{Margins, Mm, Size};

const MM_PER_PT: f64 = 25.4 / 72.0;

/// Converts points into `genpdf` millimetres.
pub fn pt(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value * MM_PER_PT))
}

/// Converts `genpdf` millimetres back into points.
pub fn to_pt(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0 / MM_PER_PT
}

/// Primary brand teal, used for bands and table headers.
pub const TEAL: Color = Color::Rgb(0x1A, 0x41, 0x41);
/// Lighter teal used for second level headings.
pub const TEAL_LIGHT: Color = Color::Rgb(0x24, 0x58, 0x58);
/// Body text color.
pub const TEAL_DARK: Color = Color::Rgb(0x12, 0x2E, 0x2E);
/// Accent green.
pub const GREENERY: Color = Color::Rgb(0xD3, 0xFF, 0x01);
/// Darker accent green used for callout stripes.
pub const GREENERY_DARK: Color = Color::Rgb(0xB8, 0xE0, 0x00);
/// Warm neutral used for grid lines and footer text.
pub const BEIGE: Color = Color::Rgb(0xCC, 0xC4, 0xB1);
/// Light neutral background tint.
pub const CREAM: Color = Color::Rgb(0xEA, 0xE8, 0xE3);
/// Soft mint, reserved for positive highlights.
pub const MINT: Color = Color::Rgb(0xB4, 0xE0, 0xBA);
/// Metric card label background.
pub const LIGHT_GRAY: Color = Color::Rgb(0xF5, 0xF4, 0xF2);
/// Secondary text.
pub const MID_GRAY: Color = Color::Rgb(0x88, 0x88, 0x88);
/// Plain white.
pub const WHITE: Color = Color::Rgb(0xFF, 0xFF, 0xFF);

/// Text printed in the centre of every footer band.
pub const FOOTER_BRANDING: &str = "Propwell AMP  |  propwell.co  |  Confidential";

/// Page size and frame margins, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl PageGeometry {
    /// US Letter with the brief's fixed margins.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            top: 40.0,
            right: 50.0,
            bottom: 50.0,
            left: 50.0,
        }
    }

    /// Width of the single content frame.
    pub fn usable_width(&self) -> f64 {
        self.width - self.left - self.right
    }

    /// Height of the single content frame.
    pub fn frame_height(&self) -> f64 {
        self.height - self.top - self.bottom
    }

    /// Paper size in `genpdf` units.
    pub fn paper_size(&self) -> Size {
        Size::new(pt(self.width), pt(self.height))
    }

    /// Frame margins in `genpdf` units.
    pub fn margins(&self) -> Margins {
        Margins::trbl(pt(self.top), pt(self.right), pt(self.bottom), pt(self.left))
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_conversion_round_trips() {
        for value in [0.0, 0.5, 28.0, 612.0] {
            assert!((to_pt(pt(value)) - value).abs() < 1e-9);
        }
    }

    #[test]
    fn letter_frame_dimensions() {
        let geometry = PageGeometry::letter();
        assert_eq!(geometry.usable_width(), 512.0);
        assert_eq!(geometry.frame_height(), 702.0);
    }
}
