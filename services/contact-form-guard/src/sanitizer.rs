// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Free-text sanitization for contact form fields.
//!
//! Two strategies implement [`Sanitizer`]:
//! - [`RichSanitizer`]: element aware. Script and style elements are removed
//!   together with their bodies, comments are dropped, then every tag.
//! - [`BasicSanitizer`]: the `<[^>]*>` stripper used when nothing better
//!   is available.
//!
//! Both return trimmed plain text that never contains `<` or `>`, and both
//! are idempotent.

use crate::config::{SanitizerConfig, SanitizerMode};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static RAW_TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid regex")
});

// An opening script/style tag with no closing tag swallows the rest of the input.
static UNCLOSED_RAW_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:script|style)\b.*\z").expect("valid regex"));

static TAG_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)(.*?)/?\s*>$").expect("valid regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid regex")
});

const ALLOWED_TAGS: &[&str] = &["b", "i", "em", "strong", "a", "p", "br"];
const ALLOWED_HREF_SCHEMES: &[&str] = &["http", "https", "mailto"];
const ALLOWED_TARGETS: &[&str] = &["_blank", "_self", "_parent", "_top"];

/// Turns untrusted free text into plain text.
pub trait Sanitizer: Send + Sync {
    /// Strip all markup and surrounding whitespace.
    fn sanitize(&self, raw: &str) -> String;

    /// Short strategy name for logs.
    fn name(&self) -> &'static str;
}

/// Construct the sanitizer selected in configuration.
pub fn from_config(config: &SanitizerConfig) -> Box<dyn Sanitizer> {
    match config.mode {
        SanitizerMode::Rich => Box::new(RichSanitizer),
        SanitizerMode::Basic => Box::new(BasicSanitizer),
    }
}

/// Element-aware sanitizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichSanitizer;

/// Regex tag stripper.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSanitizer;

impl Sanitizer for RichSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        let without_bodies = strip_raw_text_elements(raw);
        let without_tags = TAG.replace_all(&without_bodies, "");
        let text = finish_plain_text(&without_tags);
        if text.len() != raw.trim().len() {
            debug!(sanitizer = self.name(), "Stripped markup from input");
        }
        text
    }

    fn name(&self) -> &'static str {
        "rich"
    }
}

impl Sanitizer for BasicSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        let without_tags = TAG.replace_all(raw, "");
        finish_plain_text(&without_tags)
    }

    fn name(&self) -> &'static str {
        "basic"
    }
}

impl RichSanitizer {
    /// Clean an HTML fragment down to a small formatting allow-list.
    ///
    /// Keeps `b i em strong a p br` with the attributes `href`, `target` and
    /// `rel`. An `href` survives only when it parses as an absolute
    /// `http`, `https` or `mailto` URL. Stray angle brackets in text are
    /// escaped.
    pub fn sanitize_html(&self, html: &str) -> String {
        let cleaned = strip_raw_text_elements(html);

        let mut out = String::with_capacity(cleaned.len());
        let mut last = 0;
        for tag in TAG.find_iter(&cleaned) {
            escape_text_into(&cleaned[last..tag.start()], &mut out);
            if let Some(kept) = rebuild_allowed_tag(tag.as_str()) {
                out.push_str(&kept);
            }
            last = tag.end();
        }
        escape_text_into(&cleaned[last..], &mut out);
        out
    }
}

fn strip_raw_text_elements(input: &str) -> String {
    let no_comments = COMMENT.replace_all(input, "");
    let no_bodies = RAW_TEXT_ELEMENT.replace_all(&no_comments, "");
    UNCLOSED_RAW_TEXT.replace_all(&no_bodies, "").into_owned()
}

fn finish_plain_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

fn escape_text_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn rebuild_allowed_tag(tag: &str) -> Option<String> {
    let parts = TAG_PARTS.captures(tag)?;
    let closing = !parts[1].is_empty();
    let name = parts[2].to_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }

    if closing {
        return if name == "br" {
            None
        } else {
            Some(format!("</{name}>"))
        };
    }

    let mut rebuilt = format!("<{name}");
    for attr in ATTRIBUTE.captures_iter(&parts[3]) {
        if let Some((key, value)) = allowed_attribute(&attr) {
            rebuilt.push_str(&format!(" {key}=\"{}\"", value.replace('"', "&quot;")));
        }
    }
    rebuilt.push('>');
    Some(rebuilt)
}

fn allowed_attribute(attr: &Captures<'_>) -> Option<(String, String)> {
    let key = attr[1].to_lowercase();
    let value = attr
        .get(2)
        .or_else(|| attr.get(3))
        .or_else(|| attr.get(4))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    let keep = match key.as_str() {
        "href" => Url::parse(value)
            .map(|url| ALLOWED_HREF_SCHEMES.contains(&url.scheme()))
            .unwrap_or(false),
        "target" => ALLOWED_TARGETS.contains(&value.to_lowercase().as_str()),
        "rel" => value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-'),
        _ => false,
    };

    keep.then(|| (key, value.to_string()))
}
