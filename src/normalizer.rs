//! Markup-to-text normalization
//!
//! Converts raw page markup into a clean, markdown-flavoured text
//! representation for the extraction model: navigation chrome, scripts and
//! styling noise are stripped, while headings, lists and emphasis markers
//! survive so the model can locate fields in the page structure.

use scraper::{ElementRef, Html, Node};
use tracing::debug;

/// Clean text derived from one page's markup. Transient within a single
/// extraction call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedText {
    content: String,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }
}

/// Elements removed wholesale before text extraction.
const REMOVE_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "object", "embed",
    "form", "input", "button", "select", "textarea", "option",
    "nav", "header", "footer", "aside", "menu", "menuitem",
    "audio", "video", "source", "track", "canvas", "svg",
    "meta", "link", "base", "title",
];

#[derive(Clone, Debug)]
pub struct Normalizer {
    /// Maximum length of the normalized text in characters. Longer pages
    /// are cut on a char boundary; the head of the page carries the fields
    /// worth extracting far more often than the tail.
    max_content_length: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            max_content_length: 50_000,
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    /// Converts raw markup into [`NormalizedText`].
    ///
    /// Total over arbitrary input: malformed markup is repaired by the
    /// underlying html5ever parser, and anything it cannot make sense of
    /// degrades to a best-effort text approximation. Deterministic for
    /// identical input.
    pub fn normalize(&self, raw_markup: &str) -> NormalizedText {
        let document = Html::parse_document(raw_markup);

        let mut text = String::new();
        if let Some(body) = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
        {
            text = render_block(body);
        }

        // No body, or nothing survived the chrome stripping: fall back to
        // the document's raw text content.
        if text.trim().is_empty() {
            text = document
                .root_element()
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
        }

        let mut content = collapse_blank_lines(&text);
        if content.chars().count() > self.max_content_length {
            debug!(
                limit = self.max_content_length,
                "Normalized text exceeds limit, truncating"
            );
            content = content.chars().take(self.max_content_length).collect();
        }

        NormalizedText { content }
    }
}

/// Recursively renders an element's subtree as markdown-flavoured text.
fn render_block(element: ElementRef) -> String {
    let mut content = String::new();
    let tag_name = element.value().name();

    if REMOVE_TAGS.contains(&tag_name) {
        return content;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text_content = text.text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text_content.is_empty() {
                    content.push_str(&text_content);
                    content.push(' ');
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    let child_tag = child_element.value().name();
                    match child_tag {
                        "br" => content.push('\n'),
                        "hr" => content.push_str("\n---\n"),
                        _ => {
                            let child_content = render_block(child_element);
                            if child_content.trim().is_empty() {
                                continue;
                            }
                            let inner = child_content.trim();
                            match child_tag {
                                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                                    let level = child_tag[1..].parse::<usize>().unwrap_or(1);
                                    content.push_str(&format!(
                                        "\n\n{} {}\n\n",
                                        "#".repeat(level),
                                        inner
                                    ));
                                }
                                "p" | "div" | "section" | "article" | "main" | "table" | "tr" => {
                                    content.push_str(&format!("\n{}\n", inner));
                                }
                                "li" => {
                                    content.push_str(&format!("- {}\n", inner));
                                }
                                "blockquote" => {
                                    content.push_str(&format!("\n> {}\n", inner));
                                }
                                "pre" => {
                                    content.push_str(&format!("\n```\n{}\n```\n", inner));
                                }
                                "code" => {
                                    content.push_str(&format!("`{}` ", inner));
                                }
                                "strong" | "b" => {
                                    content.push_str(&format!("**{}** ", inner));
                                }
                                "em" | "i" => {
                                    content.push_str(&format!("*{}* ", inner));
                                }
                                "a" => {
                                    match child_element.value().attr("href") {
                                        Some(href) if href.starts_with("http") => {
                                            content.push_str(&format!("[{}]({}) ", inner, href));
                                        }
                                        _ => {
                                            content.push_str(inner);
                                            content.push(' ');
                                        }
                                    }
                                }
                                _ => {
                                    content.push_str(&child_content);
                                }
                            }
                        }
                    }
                }
            }
            _ => {} // Ignore comments and other node types
        }
    }

    content
}

/// Trims trailing space per line and limits runs of blank lines to one.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim_matches('\n').to_string()
}
