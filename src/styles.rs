//! The brand style registry.
//!
//! Each semantic [`Role`] maps to one immutable [`StyleDescriptor`].  The registry is built once
//! by [`StyleRegistry::brand`] and then borrowed by every flowable and table builder.

use std::collections::BTreeMap;

use genpdf::style::{Color, Style};
use genpdf::Alignment;

use crate::brand::{BEIGE, GREENERY, MID_GRAY, TEAL, TEAL_DARK, TEAL_LIGHT, WHITE};

/// Semantic text roles used in the brief.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Title,
    Subtitle,
    Date,
    Heading1,
    Heading2,
    Body,
    BodyBold,
    Callout,
    MetricLabel,
    MetricValue,
    Footer,
    TableHeader,
    TableCell,
    TableCellBold,
    Check,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 15] = [
        Role::Title,
        Role::Subtitle,
        Role::Date,
        Role::Heading1,
        Role::Heading2,
        Role::Body,
        Role::BodyBold,
        Role::Callout,
        Role::MetricLabel,
        Role::MetricValue,
        Role::Footer,
        Role::TableHeader,
        Role::TableCell,
        Role::TableCellBold,
        Role::Check,
    ];
}

/// Visual attributes for one role.  Distances are in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleDescriptor {
    pub font_size: u8,
    pub bold: bool,
    pub leading: f64,
    pub color: Color,
    pub alignment: Alignment,
    pub space_before: f64,
    pub space_after: f64,
    pub left_indent: f64,
}

impl StyleDescriptor {
    fn new(font_size: u8, leading: f64, color: Color) -> Self {
        Self {
            font_size,
            bold: false,
            leading,
            color,
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn spaced(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn indented(mut self, left: f64) -> Self {
        self.left_indent = left;
        self
    }

    /// Returns a copy with a different color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Returns a copy with a different alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// The base `genpdf` style for text in this role.
    pub fn text_style(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.font_size)
            .with_color(self.color);
        if self.bold {
            style.set_bold();
        }
        style
    }
}

/// Fixed mapping from role to descriptor.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
    styles: BTreeMap<Role, StyleDescriptor>,
}

impl StyleRegistry {
    /// Builds the brand registry.
    pub fn brand() -> Self {
        let body = StyleDescriptor::new(10, 14.0, TEAL_DARK).spaced(0.0, 6.0);
        let cell = StyleDescriptor::new(9, 12.0, TEAL_DARK);

        let styles = BTreeMap::from([
            (Role::Title, StyleDescriptor::new(28, 34.0, WHITE).bold().spaced(0.0, 2.0)),
            (Role::Subtitle, StyleDescriptor::new(13, 18.0, BEIGE)),
            (Role::Date, StyleDescriptor::new(11, 14.0, GREENERY)),
            (Role::Heading1, StyleDescriptor::new(16, 22.0, TEAL).bold().spaced(18.0, 8.0)),
            (
                Role::Heading2,
                StyleDescriptor::new(12, 16.0, TEAL_LIGHT).bold().spaced(12.0, 6.0),
            ),
            (Role::Body, body),
            (Role::BodyBold, body.bold()),
            (Role::Callout, StyleDescriptor::new(10, 14.0, TEAL_DARK)),
            (
                Role::MetricLabel,
                StyleDescriptor::new(9, 12.0, MID_GRAY).aligned(Alignment::Center),
            ),
            (
                Role::MetricValue,
                StyleDescriptor::new(20, 26.0, TEAL).bold().aligned(Alignment::Center),
            ),
            (
                Role::Footer,
                StyleDescriptor::new(8, 10.0, BEIGE).aligned(Alignment::Center),
            ),
            (Role::TableHeader, StyleDescriptor::new(9, 12.0, WHITE).bold()),
            (Role::TableCell, cell),
            (Role::TableCellBold, cell.bold()),
            (
                Role::Check,
                StyleDescriptor::new(10, 15.0, TEAL_DARK).indented(12.0).spaced(0.0, 3.0),
            ),
        ]);

        Self { styles }
    }

    /// Looks up the descriptor for `role`.
    pub fn get(&self, role: Role) -> StyleDescriptor {
        // Every role is inserted by `brand`, which is the only constructor.
        self.styles[&role]
    }

    /// Number of registered roles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns `true` when no roles are registered.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::brand()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_role() {
        let registry = StyleRegistry::brand();
        assert_eq!(registry.len(), Role::ALL.len());
        for role in Role::ALL {
            let descriptor = registry.get(role);
            assert!(descriptor.leading >= f64::from(descriptor.font_size));
        }
    }

    #[test]
    fn registry_is_deterministic() {
        let a = StyleRegistry::brand();
        let b = StyleRegistry::brand();
        for role in Role::ALL {
            assert_eq!(a.get(role), b.get(role));
        }
    }

    #[test]
    fn bold_variants_only_change_weight() {
        let registry = StyleRegistry::brand();
        let cell = registry.get(Role::TableCell);
        let bold = registry.get(Role::TableCellBold);
        assert!(bold.bold && !cell.bold);
        assert_eq!(StyleDescriptor { bold: false, ..bold }, cell);
    }

    #[test]
    fn headings_are_teal_and_bold() {
        let registry = StyleRegistry::brand();
        let h1 = registry.get(Role::Heading1);
        assert!(h1.bold);
        assert_eq!(h1.color, TEAL);
        assert_eq!(h1.space_before, 18.0);
    }
}
