//! Template rendering.
//!
//! Content documents carry only page-specific head metadata; the site
//! template supplies the global chrome. Rendering lifts the metadata out
//! of the source document, decorates the source body (formatted date,
//! tag links, request path) and splices title, head remainder and body
//! into a fresh copy of the template.
//!
//! Container contract: the source body may carry `div.date`, `span.tags`
//! and `div.uri` elements (each optional); the template must carry a
//! `title` and a `div` inside `main` to receive the page body. The
//! template is re-read from disk on every render; nothing is cached
//! between requests.

use crate::error::RenderError;
use crate::markup;
use chrono::DateTime;
use lt_common::escape_html;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Format accepted in a source document's `date` meta value.
const META_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Human-readable form injected into the date container.
const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

/// Renders content documents through the site template.
pub struct PageRenderer {
    public_dir: PathBuf,
}

impl PageRenderer {
    /// Create a renderer over the public directory holding `template.html`.
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        PageRenderer {
            public_dir: public_dir.into(),
        }
    }

    /// Path of the site template document.
    pub fn template_path(&self) -> PathBuf {
        self.public_dir.join("template.html")
    }

    /// Merge `source_html` into the site template.
    pub fn render(&self, source_html: &str, request_path: &str) -> Result<String, RenderError> {
        let mut source = source_html.to_string();

        // Lift page metadata out of the source head so it is not
        // duplicated once the head remainder is appended to the template.
        let (next, description) = markup::extract_meta(&source, "description");
        source = next;
        let (next, keywords) = markup::extract_meta(&source, "keywords");
        source = next;
        let (next, author) = markup::extract_meta(&source, "author");
        source = next;
        let (next, date_raw) = markup::extract_meta(&source, "date");
        source = next;

        if let Some(display) = parse_display_date(date_raw.as_deref()) {
            source = set_container(&source, "div", "date", &escape_html(&display));
        }

        if let Some(keywords) = keywords.as_deref() {
            source = set_container(&source, "span", "tags", &tag_links(keywords));
        }

        source = set_container(&source, "div", "uri", &escape_html(request_path));

        let (next, title) = markup::extract_title(&source);
        source = next;
        let title = title.unwrap_or_default();

        let head_extra = markup::first_inner(&source, "head").ok_or_else(|| RenderError::Parse {
            doc: "source",
            reason: "no head element".to_string(),
        })?;
        let body = markup::first_inner(&source, "body").ok_or_else(|| RenderError::Parse {
            doc: "source",
            reason: "no body element".to_string(),
        })?;

        let mut template = fs::read_to_string(self.template_path())?;

        let site_title =
            markup::first_inner(&template, "title").ok_or(RenderError::MissingContainer("title"))?;
        template = markup::set_first_inner(
            &template,
            "title",
            &format!("{} - {}", title, site_title.trim()),
        )
        .ok_or(RenderError::MissingContainer("title"))?;

        if let Some(description) = description.as_deref() {
            template = markup::set_meta_content(&template, "description", description);
        }
        if let Some(author) = author.as_deref() {
            if !author.is_empty() {
                template = markup::set_meta_content(&template, "author", author);
            }
        }

        template =
            markup::append_to_head(&template, &head_extra).ok_or_else(|| RenderError::Parse {
                doc: "template",
                reason: "no head element".to_string(),
            })?;

        template = markup::set_main_content(&template, &body)
            .ok_or(RenderError::MissingContainer("main content container"))?;

        debug!(
            title = %title,
            bytes = template.len(),
            "page rendered through template"
        );
        Ok(finalize(template))
    }
}

/// Parse the meta date and reformat it for display. Unparseable values
/// are a soft failure: logged, and the date simply is not shown.
fn parse_display_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match DateTime::parse_from_str(raw, META_DATE_FORMAT) {
        Ok(date) => Some(date.format(DISPLAY_DATE_FORMAT).to_string()),
        Err(err) => {
            warn!(value = raw, error = %err, "unparseable date metadata");
            None
        }
    }
}

/// One inline link per whitespace-separated keyword token.
fn tag_links(keywords: &str) -> String {
    let mut links = String::new();
    for token in keywords.split_whitespace() {
        links.push_str(&format!(r#"<a href="/tags/{token}">{token}</a>"#));
    }
    links
}

/// Inject into an optional container; documents without it pass through.
fn set_container(html: &str, tag: &str, class: &str, inner: &str) -> String {
    match markup::set_class_inner(html, tag, class, inner) {
        Some(out) => out,
        None => {
            debug!(tag, class, "container absent, injection skipped");
            html.to_string()
        }
    }
}

fn finalize(html: String) -> String {
    if cfg!(debug_assertions) {
        html
    } else {
        let cfg = minify_html::Cfg {
            minify_js: true,
            minify_css: true,
            ..Default::default()
        };
        String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
    }
}
