//! Shared stylesheet injected into every combined document

use crate::layout::PageSetup;

/// Class of the `<section>` that wraps each source file
pub const SECTION_CLASS: &str = "source-document";

/// Rules that keep tables, figures and headings from being split across pages
pub const BREAK_AVOIDANCE_CSS: &str = "\
section.source-document + section.source-document {
  page-break-before: always;
  break-before: page;
}
table, figure, img, svg, pre, blockquote, ul, ol {
  page-break-inside: avoid;
  break-inside: avoid;
}
tr, td, th, li {
  page-break-inside: avoid;
  break-inside: avoid;
}
thead {
  display: table-header-group;
}
h1, h2, h3, h4, h5, h6 {
  page-break-after: avoid;
  break-after: avoid;
  page-break-inside: avoid;
  break-inside: avoid;
}
p {
  orphans: 3;
  widows: 3;
}
img {
  max-width: 100%;
}
";

/// Full shared stylesheet: the `@page` rule followed by the break rules
pub fn shared_stylesheet(setup: &PageSetup) -> String {
    let mut css = setup.css_rule();
    css.push('\n');
    css.push_str(BREAK_AVOIDANCE_CSS);
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PageOrientation, PageSize};

    #[test]
    fn test_page_rule_comes_first() {
        let css = shared_stylesheet(&PageSetup::new(PageSize::A4, PageOrientation::Portrait));
        assert!(css.starts_with("@page { size: A4 portrait;"));
    }

    #[test]
    fn test_break_rules_present() {
        let css = shared_stylesheet(&PageSetup::default());
        assert!(css.contains("page-break-inside: avoid"));
        assert!(css.contains("page-break-after: avoid"));
        assert!(css.contains(&format!("section.{SECTION_CLASS} + section.{SECTION_CLASS}")));
    }
}
