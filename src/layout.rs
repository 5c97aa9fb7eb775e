//! Page layout: size, orientation and margins of the rendered PDF

use std::fmt;

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrientation {
    Portrait,
    #[default]
    Landscape,
}

impl PageOrientation {
    /// Keyword used in the CSS `size` descriptor
    pub fn css_keyword(self) -> &'static str {
        match self {
            PageOrientation::Portrait => "portrait",
            PageOrientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_keyword())
    }
}

/// Paper size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Name used in the CSS `size` descriptor and by wkhtmltopdf
    pub fn css_name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
        }
    }

    /// Portrait dimensions of this paper size
    pub fn dimensions(self) -> PageDimensions {
        match self {
            PageSize::A4 => PageDimensions::a4(),
            PageSize::Letter => PageDimensions::letter(),
        }
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_mm(215.9),
            height: Length::from_mm(279.4),
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }

    /// Swap width and height for landscape
    pub fn oriented(self, orientation: PageOrientation) -> Self {
        match orientation {
            PageOrientation::Portrait => self,
            PageOrientation::Landscape => Self {
                width: self.height,
                height: self.width,
            },
        }
    }
}

/// Everything that goes into the `@page` rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub size: PageSize,
    pub orientation: PageOrientation,
    /// Uniform margin on all four sides
    pub margin: Length,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            orientation: PageOrientation::Landscape,
            margin: Length::from_mm(10.0),
        }
    }
}

impl PageSetup {
    pub fn new(size: PageSize, orientation: PageOrientation) -> Self {
        Self {
            size,
            orientation,
            ..Self::default()
        }
    }

    /// Page dimensions after applying the orientation
    pub fn dimensions(&self) -> PageDimensions {
        self.size.dimensions().oriented(self.orientation)
    }

    /// CSS `@page` rule, e.g. `@page { size: A4 landscape; margin: 10mm; }`
    pub fn css_rule(&self) -> String {
        format!(
            "@page {{ size: {} {}; margin: {}mm; }}",
            self.size.css_name(),
            self.orientation.css_keyword(),
            self.margin.mm()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let len = Length::from_inches(1.0);
        assert!((len.mm() - 25.4).abs() < 0.01);
        assert!((len.pt() - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_default_is_a4_landscape() {
        let setup = PageSetup::default();
        assert_eq!(setup.css_rule(), "@page { size: A4 landscape; margin: 10mm; }");
    }

    #[test]
    fn test_portrait_letter_rule() {
        let setup = PageSetup::new(PageSize::Letter, PageOrientation::Portrait);
        assert_eq!(setup.css_rule(), "@page { size: Letter portrait; margin: 10mm; }");
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let dims = PageSetup::default().dimensions();
        assert_eq!(dims.width.mm(), 297.0);
        assert_eq!(dims.height.mm(), 210.0);

        let portrait = PageSetup::new(PageSize::A4, PageOrientation::Portrait).dimensions();
        assert_eq!(portrait, PageDimensions::a4());
    }
}
