//! Aggregation of many HTML files into one document

use std::fs;
use std::path::{Path, PathBuf};
use scraper::{Html, Selector};
use url::Url;
use crate::error::{Error, Result};
use crate::html::style::{shared_stylesheet, SECTION_CLASS};
use crate::layout::PageSetup;

/// The parts of one source file that end up in the combined document
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFragment {
    /// File the fragment was read from
    pub path: PathBuf,
    /// Inner HTML of the source `<body>`
    pub body: String,
    /// Text of each `<style>` element in the source `<head>`
    pub head_styles: Vec<String>,
    /// Stylesheet `<link>` tags from the source `<head>`, serialized
    pub stylesheet_links: Vec<String>,
}

impl SourceFragment {
    /// Read and parse `path`
    ///
    /// Fails with [`Error::FileRead`] when the file cannot be read or is not
    /// valid UTF-8.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(path, text.trim_start_matches('\u{feff}'))
    }

    /// Parse already decoded HTML text
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let parsed = Html::parse_document(text);

        let body = match parsed.select(&selector("body")?).next() {
            Some(body) => body.inner_html(),
            None => parsed.root_element().inner_html(),
        };

        let head_styles = parsed
            .select(&selector("head style")?)
            .map(|style| style.text().collect::<String>())
            .filter(|css| !css.trim().is_empty())
            .collect();

        let stylesheet_links = parsed
            .select(&selector(r#"head link[rel~="stylesheet"]"#)?)
            .map(|link| link.html())
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            body,
            head_styles,
            stylesheet_links,
        })
    }

    /// File name shown in the `data-source` attribute
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::General(format!("Invalid selector {}: {}", css, e)))
}

/// Combined HTML document built from several source files, in order
#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    base_url: Option<Url>,
    setup: PageSetup,
    fragments: Vec<SourceFragment>,
}

impl Document {
    /// Create an empty document
    pub fn new(setup: PageSetup) -> Self {
        Self {
            title: String::new(),
            base_url: None,
            setup,
            fragments: Vec::new(),
        }
    }

    /// Read every file in `paths`, in the given order
    ///
    /// The first file that cannot be read or decoded aborts the whole
    /// document; no file is skipped silently.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use html_pdf_merge::html::Document;
    /// use html_pdf_merge::layout::PageSetup;
    /// use std::path::PathBuf;
    ///
    /// let paths = vec![PathBuf::from("sesion1.html"), PathBuf::from("sesion2.html")];
    /// let doc = Document::from_files(&paths, PageSetup::default()).expect("Failed to read");
    /// println!("{}", doc.html());
    /// ```
    pub fn from_files(paths: &[PathBuf], setup: PageSetup) -> Result<Self> {
        let mut doc = Self::new(setup);
        for path in paths {
            tracing::debug!("Reading {}", path.display());
            doc.push(SourceFragment::read(path)?);
        }
        Ok(doc)
    }

    /// Append a fragment after the existing ones
    pub fn push(&mut self, fragment: SourceFragment) {
        self.fragments.push(fragment);
    }

    /// Set the `<title>` of the combined document
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Resolve relative links (images, stylesheets) against `dir`
    ///
    /// `dir` must be absolute; otherwise no `<base>` element is emitted.
    pub fn with_base_dir(mut self, dir: &Path) -> Self {
        self.base_url = Url::from_directory_path(dir).ok();
        if self.base_url.is_none() {
            tracing::warn!("Cannot build a base URL from {}; relative links may not resolve", dir.display());
        }
        self
    }

    pub fn fragments(&self) -> &[SourceFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Shared CSS: page size and break avoidance
    pub fn stylesheet(&self) -> String {
        shared_stylesheet(&self.setup)
    }

    /// The combined HTML without the shared stylesheet
    ///
    /// Source `<style>` blocks are kept in the head so they apply before
    /// the shared stylesheet supplied by the renderer.
    pub fn html(&self) -> String {
        self.build(None)
    }

    /// The combined HTML with the shared stylesheet inlined as the last
    /// `<style>` element, for engines that cannot take a separate stylesheet
    pub fn standalone_html(&self) -> String {
        self.build(Some(&self.stylesheet()))
    }

    fn build(&self, inline_css: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");

        if !self.title.is_empty() {
            out.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        }
        if let Some(base) = &self.base_url {
            out.push_str(&format!("<base href=\"{}\">\n", escape_html(base.as_str())));
        }

        let mut links: Vec<&str> = Vec::new();
        for link in self.fragments.iter().flat_map(|f| f.stylesheet_links.iter()) {
            if !links.contains(&link.as_str()) {
                links.push(link);
            }
        }
        for link in links {
            out.push_str(link);
            out.push('\n');
        }

        for css in self.fragments.iter().flat_map(|f| f.head_styles.iter()) {
            out.push_str("<style>\n");
            out.push_str(css);
            out.push_str("\n</style>\n");
        }

        if let Some(css) = inline_css {
            out.push_str("<style>\n");
            out.push_str(css);
            out.push_str("</style>\n");
        }

        out.push_str("</head>\n<body>\n");

        for fragment in &self.fragments {
            out.push_str(&format!(
                "<section class=\"{}\" data-source=\"{}\">\n",
                SECTION_CLASS,
                escape_html(&fragment.name())
            ));
            out.push_str(&fragment.body);
            out.push_str("\n</section>\n");
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Escape text for use in HTML text or a double-quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_extracts_body_and_head_styles() {
        let html = r#"<html><head>
            <title>Ignored</title>
            <style>table { color: red; }</style>
            <link rel="stylesheet" href="common.css">
            <link rel="icon" href="favicon.ico">
            </head><body><h1>Hola</h1><p>uno</p></body></html>"#;

        let fragment = SourceFragment::parse(Path::new("dir/a.html"), html).unwrap();
        assert_eq!(fragment.body, "<h1>Hola</h1><p>uno</p>");
        assert_eq!(fragment.head_styles, vec!["table { color: red; }"]);
        assert_eq!(fragment.stylesheet_links.len(), 1);
        assert!(fragment.stylesheet_links[0].contains("common.css"));
        assert_eq!(fragment.name(), "a.html");
    }

    #[test]
    fn test_parse_bare_fragment() {
        let fragment = SourceFragment::parse(Path::new("b.html"), "<p>solo</p>").unwrap();
        assert_eq!(fragment.body, "<p>solo</p>");
        assert!(fragment.head_styles.is_empty());
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.html");
        fs::write(&path, [b'<', b'p', b'>', 0xE9, 0xFF, b'<']).unwrap();

        match SourceFragment::read(&path) {
            Err(Error::FileRead { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected FileRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.html");
        fs::write(&path, "\u{feff}<body><p>x</p></body>").unwrap();

        let fragment = SourceFragment::read(&path).unwrap();
        assert_eq!(fragment.body, "<p>x</p>");
    }

    #[test]
    fn test_document_keeps_order_and_wraps_sections() {
        let mut doc = Document::new(PageSetup::default()).with_title("Plan <2024>");
        doc.push(SourceFragment::parse(Path::new("s1.html"), "<p>first</p>").unwrap());
        doc.push(SourceFragment::parse(Path::new("s2.html"), "<p>second</p>").unwrap());

        let html = doc.html();
        let first = html.find("<p>first</p>").unwrap();
        let second = html.find("<p>second</p>").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("<p>first</p>").count(), 1);
        assert_eq!(html.matches("<section class=\"source-document\"").count(), 2);
        assert!(html.contains("data-source=\"s1.html\""));
        assert!(html.contains("<title>Plan &lt;2024&gt;</title>"));
        assert!(!html.contains("@page"));
    }

    #[test]
    fn test_standalone_inlines_shared_css_last() {
        let mut doc = Document::new(PageSetup::default());
        doc.push(SourceFragment::parse(Path::new("a.html"), "<style>p{}</style><p>a</p>").unwrap());

        let html = doc.standalone_html();
        let source_css = html.find("p{}").unwrap();
        let page_rule = html.find("@page").unwrap();
        assert!(source_css < page_rule);
        assert!(page_rule < html.find("</head>").unwrap());
    }

    #[test]
    fn test_shared_links_emitted_once() {
        let page = r#"<head><link rel="stylesheet" href="site.css"></head><body>x</body>"#;
        let mut doc = Document::new(PageSetup::default());
        doc.push(SourceFragment::parse(Path::new("a.html"), page).unwrap());
        doc.push(SourceFragment::parse(Path::new("b.html"), page).unwrap());

        assert_eq!(doc.html().matches("site.css").count(), 1);
    }

    #[test]
    fn test_base_dir() {
        let dir = TempDir::new().unwrap();
        let doc = Document::new(PageSetup::default()).with_base_dir(dir.path());
        let base = doc.base_url().unwrap();
        assert!(base.as_str().starts_with("file://"));
        assert!(base.as_str().ends_with('/'));
        assert!(doc.html().contains("<base href=\"file://"));

        let relative = Document::new(PageSetup::default()).with_base_dir(Path::new("relative"));
        assert!(relative.base_url().is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b "c" <d>"#), "a&amp;b &quot;c&quot; &lt;d&gt;");
    }
}
