//! Request routing.
//!
//! All routes are GET. The two JSON routes sit in front of the store
//! and the generator; everything else resolves against the public
//! directory: exact files are served with a MIME type from the
//! extension table, `<path>.html` documents are rendered through the
//! site template, and the rest falls through to the custom 404 page.

use lt_common::ArtifactKey;
use lt_config::Config;
use lt_report::{BackendClient, PageRenderer, ReportGenerator};
use lt_store::{assemble, ArtifactStore, ContentIndex, HostIndex};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A fully materialized response, ready for the transport layer.
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpReply {
    fn json(value: serde_json::Value) -> Self {
        HttpReply {
            status: 200,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    fn html(body: String) -> Self {
        HttpReply {
            status: 200,
            content_type: "text/html",
            body: body.into_bytes(),
        }
    }

    fn internal_error(message: &str) -> Self {
        HttpReply {
            status: 500,
            content_type: "text/plain",
            body: message.as_bytes().to_vec(),
        }
    }
}

/// Application state shared by every request.
pub struct App {
    store: ArtifactStore,
    generator: ReportGenerator,
    renderer: PageRenderer,
    public_dir: PathBuf,
}

impl App {
    /// Wire up the components from a resolved configuration.
    pub fn new(config: Config) -> Self {
        let store = ArtifactStore::new(&config.ingest_root);
        let client = BackendClient::new(config.backend_url.clone(), config.model.clone());
        let generator = ReportGenerator::new(store.clone(), client);
        let renderer = PageRenderer::new(&config.public_dir);
        App {
            store,
            generator,
            renderer,
            public_dir: config.public_dir,
        }
    }

    /// Dispatch one GET request by its raw URL (path plus query string).
    pub fn handle(&self, raw_url: &str) -> HttpReply {
        let path = split_path(raw_url);
        match path {
            "/report-data" => self.report_data(raw_url),
            "/report-generate" => self.report_generate(raw_url),
            "/" | "" => self.index_page(raw_url),
            _ => self.serve_public(raw_url, path),
        }
    }

    fn key_from_query(raw_url: &str) -> ArtifactKey {
        let host = query_param(raw_url, "host").unwrap_or_default();
        let date = query_param(raw_url, "date").unwrap_or_default();
        ArtifactKey::from_params(&host, &date)
    }

    fn report_data(&self, raw_url: &str) -> HttpReply {
        let key = Self::key_from_query(raw_url);
        debug!(key = %key, "report data requested");
        let payload = assemble(&self.store, &key);
        match serde_json::to_value(&payload) {
            Ok(value) => HttpReply::json(value),
            Err(err) => HttpReply::internal_error(&format!("encode payload: {err}")),
        }
    }

    fn report_generate(&self, raw_url: &str) -> HttpReply {
        let key = Self::key_from_query(raw_url);
        match self.generator.generate(&key) {
            Ok(generated) => {
                HttpReply::json(json!({ "success": "1", "report": generated.report }))
            }
            Err(err) => {
                warn!(key = %key, error = %err, "report generation request failed");
                HttpReply::json(json!({ "success": "0" }))
            }
        }
    }

    fn index_page(&self, raw_url: &str) -> HttpReply {
        let index = match ContentIndex::new(&self.store).build() {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "content index scan failed");
                return HttpReply::internal_error("error walking the artifact roots");
            }
        };
        let source = match index_source(&index) {
            Ok(source) => source,
            Err(err) => return HttpReply::internal_error(&format!("encode host map: {err}")),
        };
        match self.renderer.render(&source, raw_url) {
            Ok(html) => HttpReply::html(html),
            Err(err) => {
                warn!(error = %err, "index page render failed");
                HttpReply::internal_error("error rendering the index page")
            }
        }
    }

    fn serve_public(&self, raw_url: &str, path: &str) -> HttpReply {
        let Some(resolved) = resolve_public_path(&self.public_dir, path) else {
            return self.not_found();
        };

        if resolved.is_file() {
            return match fs::read(&resolved) {
                Ok(body) => HttpReply {
                    status: 200,
                    content_type: mime_for_path(&resolved),
                    body,
                },
                Err(err) => {
                    warn!(path = %resolved.display(), error = %err, "static file read failed");
                    self.not_found()
                }
            };
        }

        // Not an asset: a sibling `.html` document is a renderable page.
        let page = resolved.with_file_name(format!(
            "{}.html",
            resolved.file_name().unwrap_or_default().to_string_lossy()
        ));
        if page.is_file() {
            match fs::read_to_string(&page).map_err(lt_report::RenderError::from).and_then(
                |source| self.renderer.render(&source, raw_url),
            ) {
                Ok(html) => return HttpReply::html(html),
                Err(err) => {
                    warn!(path = %page.display(), error = %err, "page render failed");
                    return self.not_found();
                }
            }
        }

        self.not_found()
    }

    fn not_found(&self) -> HttpReply {
        let body = fs::read(self.public_dir.join("404.html"))
            .unwrap_or_else(|_| b"not found".to_vec());
        HttpReply {
            status: 404,
            content_type: "text/html",
            body,
        }
    }
}

/// Compose the browse index document: host/date selection controls plus
/// the host map embedded as a JSON script value for the browser script.
fn index_source(index: &HostIndex) -> Result<String, serde_json::Error> {
    let hostmap = serde_json::to_string(index)?;
    Ok(format!(
        concat!(
            "<!doctype html><html><head>",
            "<script src=\"/hostmap_ui.js\"></script>",
            "<title>Browse</title>",
            "</head><body>",
            "<div><label for=\"select-host\">Host:</label> ",
            "<select id=\"select-host\" onchange=\"hostmap_ui_update()\"></select>&nbsp;",
            "<label for=\"select-date\">Date:</label> ",
            "<select id=\"select-date\" onchange=\"hostmap_ui_update()\"></select></div>",
            "<div id=\"log_content\"></div>",
            "<script>var hostMap={};hostmap_ui(hostMap);</script>",
            "</body></html>"
        ),
        hostmap
    ))
}

/// Path portion of a raw request URL.
fn split_path(raw_url: &str) -> &str {
    raw_url.split(['?', '#']).next().unwrap_or(raw_url)
}

/// Value of one query parameter, percent-decoded.
pub fn query_param(raw_url: &str, name: &str) -> Option<String> {
    let query = raw_url.split_once('?')?.1;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            return Some(percent_decode(value));
        }
    }
    None
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3).and_then(|pair| {
                    std::str::from_utf8(pair)
                        .ok()
                        .and_then(|s| u8::from_str_radix(s, 16).ok())
                });
                match hex {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Resolve a request path inside the public directory. Rejects any
/// component that would escape it.
fn resolve_public_path(public_dir: &std::path::Path, path: &str) -> Option<PathBuf> {
    let mut resolved = public_dir.to_path_buf();
    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => return None,
            part => resolved.push(part),
        }
    }
    Some(resolved)
}

/// MIME type from the file extension, octet-stream as the fallback.
fn mime_for_path(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
