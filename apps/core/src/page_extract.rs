//! Page text extraction.
//! Supports: HTML (visible text only), TXT, MD, and extension-less plain text.

use async_trait::async_trait;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::actors::traits::PageSource;
use crate::error::AppError;

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template", "svg"];

/// Elements that start a new line in rendered text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Binary content is not supported (detected {0})")]
    Binary(String),

    #[error("Unsupported page type: {0}")]
    Unsupported(String),

    #[error("HTML page is not valid UTF-8: {0}")]
    InvalidHtmlEncoding(#[from] std::str::Utf8Error),
}

/// Text captured from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Identifier of the page the text came from
    pub target: String,
    /// Visible text. Plain-text pages are passed through untouched, so this
    /// may hold bytes that are not UTF-8.
    pub text: Vec<u8>,
}

/// Extract the visible text of a page from its raw bytes.
pub fn extract_visible_text(page_name: &str, data: &[u8]) -> Result<Vec<u8>, ExtractError> {
    // Magic numbers are a few bytes long, so valid UTF-8 starting with "BM"
    // or "ID3" is still text
    if let Some(kind) = infer::get(data) {
        if kind.matcher_type() != infer::MatcherType::Text && std::str::from_utf8(data).is_err() {
            return Err(ExtractError::Binary(kind.mime_type().to_string()));
        }
    }
    if data.contains(&0) {
        return Err(ExtractError::Binary("NUL bytes".to_string()));
    }

    let extension = Path::new(page_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    info!("Extracting text from page: {} (type: {})", page_name, extension);

    match extension.as_str() {
        "html" | "htm" | "xhtml" => {
            let source = std::str::from_utf8(data)?;
            Ok(html_visible_text(source).into_bytes())
        }
        "" | "txt" | "md" | "text" => Ok(data.to_vec()),
        other => Err(ExtractError::Unsupported(other.to_string())),
    }
}

/// Visible text of an HTML document, one block per line
pub fn html_visible_text(source: &str) -> String {
    let document = Html::parse_document(source);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    clean_extracted_text(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }
    let is_block = BLOCK_ELEMENTS.contains(&name);
    if is_block {
        out.push('\n');
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }

    if is_block {
        out.push('\n');
    }
}

/// Collapse whitespace inside lines and drop blank lines
fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads pages from files on disk; the target is the file path.
#[derive(Debug, Clone, Default)]
pub struct FilePageSource {
    base_dir: Option<PathBuf>,
}

impl FilePageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative targets against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, target: &str) -> PathBuf {
        let path = PathBuf::from(target);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn capture(&self, target: &str) -> Result<PageSnapshot, AppError> {
        if target.trim().is_empty() {
            return Err(AppError::PageUnavailable("No active page found".to_string()));
        }

        let path = self.resolve(target);
        let data = tokio::fs::read(&path).await.map_err(|e| {
            warn!("Failed to read page {:?}: {}", path, e);
            AppError::PageUnavailable(format!("Could not read page {}: {}", path.display(), e))
        })?;

        let text = extract_visible_text(target, &data)
            .map_err(|e| AppError::PageUnavailable(format!("Could not extract text: {}", e)))?;

        Ok(PageSnapshot {
            target: target.to_string(),
            text,
        })
    }
}

/// In-memory pages keyed by target, for composition without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: HashMap<String, Vec<u8>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, target: &str, text: impl Into<Vec<u8>>) -> Self {
        self.pages.insert(target.to_string(), text.into());
        self
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn capture(&self, target: &str) -> Result<PageSnapshot, AppError> {
        self.pages
            .get(target)
            .map(|text| PageSnapshot {
                target: target.to_string(),
                text: text.clone(),
            })
            .ok_or_else(|| AppError::PageUnavailable("No active page found".to_string()))
    }
}
