//! Tag-level HTML scanning and splicing.
//!
//! The renderer needs a handful of structural operations on documents it
//! controls: lift a meta tag out of the head, read a title, replace the
//! content of a class-addressed container, splice one body into another.
//! A byte-offset tag scanner covers all of that without constructing a
//! DOM; open/close pairs of the same tag name are depth-counted so
//! nested containers splice correctly.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z][a-zA-Z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// One matched open tag: `[start, end)` spans `<tag ...>` in the source.
#[derive(Debug, Clone)]
pub struct OpenTag {
    pub start: usize,
    pub end: usize,
    attrs: String,
}

impl OpenTag {
    /// Value of an attribute on this tag, if present.
    pub fn attr(&self, name: &str) -> Option<String> {
        for caps in RE_ATTR.captures_iter(&self.attrs) {
            if caps[1].eq_ignore_ascii_case(name) {
                let value = caps.get(2).or_else(|| caps.get(3));
                return Some(value.map(|m| m.as_str().to_string()).unwrap_or_default());
            }
        }
        None
    }

    /// Whether the class attribute contains `class` as a token.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|value| value.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }
}

fn tag_boundary(byte: Option<&u8>) -> bool {
    matches!(
        byte,
        None | Some(b'>') | Some(b'/') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
    )
}

fn starts_with_tag(bytes: &[u8], tag: &str) -> bool {
    let t = tag.as_bytes();
    bytes.len() >= t.len()
        && bytes[..t.len()].eq_ignore_ascii_case(t)
        && tag_boundary(bytes.get(t.len()))
}

/// Find the next open tag named `tag` at or after `from`.
pub fn find_open_tag(html: &str, tag: &str, mut from: usize) -> Option<OpenTag> {
    let bytes = html.as_bytes();
    while from < html.len() {
        let at = from + html[from..].find('<')?;
        let rest = &bytes[at + 1..];
        if starts_with_tag(rest, tag) {
            let end = at + html[at..].find('>')? + 1;
            let attrs = html[at + 1 + tag.len()..end - 1]
                .trim_end_matches('/')
                .to_string();
            return Some(OpenTag {
                start: at,
                end,
                attrs,
            });
        }
        from = at + 1;
    }
    None
}

/// Find the first open tag named `tag` carrying `class` as a class token.
pub fn find_tag_with_class(html: &str, tag: &str, class: &str) -> Option<OpenTag> {
    let mut from = 0;
    while let Some(open) = find_open_tag(html, tag, from) {
        if open.has_class(class) {
            return Some(open);
        }
        from = open.end;
    }
    None
}

/// Offset of the matching `</tag>` for an element whose content starts
/// at `from`, counting nested same-name elements.
fn inner_end(html: &str, tag: &str, from: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut depth = 1usize;
    let mut pos = from;
    while pos < html.len() {
        let at = pos + html[pos..].find('<')?;
        let rest = &bytes[at + 1..];
        if rest.first() == Some(&b'/') && starts_with_tag(&rest[1..], tag) {
            depth -= 1;
            if depth == 0 {
                return Some(at);
            }
        } else if starts_with_tag(rest, tag) {
            let close = at + html[at..].find('>')?;
            if !html[at..close].trim_end().ends_with('/') {
                depth += 1;
            }
            pos = close + 1;
            continue;
        }
        pos = at + 1;
    }
    None
}

fn element_inner(html: &str, tag: &str, open: &OpenTag) -> Option<(usize, usize)> {
    let end = inner_end(html, tag, open.end)?;
    Some((open.end, end))
}

/// Read the inner markup of the first `tag` element.
pub fn first_inner(html: &str, tag: &str) -> Option<String> {
    let open = find_open_tag(html, tag, 0)?;
    let (start, end) = element_inner(html, tag, &open)?;
    Some(html[start..end].to_string())
}

/// Replace the inner markup of the first `tag` element.
pub fn set_first_inner(html: &str, tag: &str, inner: &str) -> Option<String> {
    let open = find_open_tag(html, tag, 0)?;
    let (start, end) = element_inner(html, tag, &open)?;
    Some(format!("{}{}{}", &html[..start], inner, &html[end..]))
}

/// Replace the inner markup of the first `tag.class` element. Returns
/// `None` when no such container exists.
pub fn set_class_inner(html: &str, tag: &str, class: &str, inner: &str) -> Option<String> {
    let open = find_tag_with_class(html, tag, class)?;
    let (start, end) = element_inner(html, tag, &open)?;
    Some(format!("{}{}{}", &html[..start], inner, &html[end..]))
}

/// Extract the first `<meta name="...">` tag with the given name:
/// returns the document with every such tag removed, plus the content
/// attribute of the first one found.
pub fn extract_meta(html: &str, name: &str) -> (String, Option<String>) {
    let mut out = String::with_capacity(html.len());
    let mut content = None;
    let mut pos = 0;
    while let Some(open) = find_open_tag(html, "meta", pos) {
        out.push_str(&html[pos..open.start]);
        pos = open.end;
        if open.attr("name").as_deref() == Some(name) {
            if content.is_none() {
                content = Some(open.attr("content").unwrap_or_default());
            }
            // dropped from the output
        } else {
            out.push_str(&html[open.start..open.end]);
        }
    }
    out.push_str(&html[pos..]);
    (out, content)
}

/// Overwrite the content attribute of the first matching meta tag.
/// Documents without that meta are returned unchanged.
pub fn set_meta_content(html: &str, name: &str, content: &str) -> String {
    let mut pos = 0;
    while let Some(open) = find_open_tag(html, "meta", pos) {
        if open.attr("name").as_deref() == Some(name) {
            let replacement = format!(r#"<meta name="{}" content="{}">"#, name, content);
            return format!("{}{}{}", &html[..open.start], replacement, &html[open.end..]);
        }
        pos = open.end;
    }
    html.to_string()
}

/// Extract the title text and remove the whole title element.
pub fn extract_title(html: &str) -> (String, Option<String>) {
    let Some(open) = find_open_tag(html, "title", 0) else {
        return (html.to_string(), None);
    };
    let Some((start, end)) = element_inner(html, "title", &open) else {
        return (html.to_string(), None);
    };
    let text = html[start..end].trim().to_string();
    let close_end = end + html[end..].find('>').map(|i| i + 1).unwrap_or(0);
    let out = format!("{}{}", &html[..open.start], &html[close_end..]);
    (out, Some(text))
}

/// Append raw markup to the end of the head element.
pub fn append_to_head(html: &str, extra: &str) -> Option<String> {
    let open = find_open_tag(html, "head", 0)?;
    let (_, end) = element_inner(html, "head", &open)?;
    Some(format!("{}{}{}", &html[..end], extra, &html[end..]))
}

/// Replace the content of the first `div` inside the `main` element,
/// the designated page content container.
pub fn set_main_content(html: &str, inner: &str) -> Option<String> {
    let main = find_open_tag(html, "main", 0)?;
    let (main_start, main_end) = element_inner(html, "main", &main)?;
    let div = find_open_tag(html, "div", main_start)?;
    if div.start >= main_end {
        return None;
    }
    let (start, end) = element_inner(html, "div", &div)?;
    Some(format!("{}{}{}", &html[..start], inner, &html[end..]))
}
