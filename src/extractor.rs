use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;

static BODY_SELECTOR: OnceLock<Selector> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static SYMBOL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Turns a fetched document into plain text ready for segmentation.
pub trait MarkupStripper {
    fn strip(&self, raw: &str) -> String;
}

/// HTML stripper: visible body text, without scripts, styles, tags or symbols.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlStripper;

impl MarkupStripper for HtmlStripper {
    fn strip(&self, raw: &str) -> String {
        match extract_body_text(raw) {
            Some(text) => clean_text(&text),
            None => String::new(),
        }
    }
}

/// Collects the trimmed text nodes of `<body>`, skipping `<script>` and
/// `<style>` subtrees. Returns `None` when the document has no body.
pub fn extract_body_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = BODY_SELECTOR.get_or_init(|| Selector::parse("body").unwrap());
    let body = document.select(selector).next()?;

    let mut pieces = Vec::new();
    collect_visible_text(body, &mut pieces);
    // space-joined so words from adjacent elements stay apart
    Some(pieces.join(" "))
}

fn collect_visible_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pieces.push(trimmed);
                }
            }
            Node::Element(el) if matches!(el.name(), "script" | "style") => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_visible_text(child_element, pieces);
                }
            }
            _ => {}
        }
    }
}

/// Drops leftover tag-like substrings, then every character that is not a
/// letter, digit, underscore or whitespace.
pub fn clean_text(text: &str) -> String {
    let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    let symbol_regex = SYMBOL_REGEX.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_\s]").unwrap());

    let without_tags = tag_regex.replace_all(text, "");
    symbol_regex.replace_all(&without_tags, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_scripts_and_styles() {
        let html = r#"
            <html>
              <head><title>Ignored title</title><style>p { color: red; }</style></head>
              <body>
                <h1>Hello</h1>
                <script>var tracking = "nope";</script>
                <p>visible <b>text</b></p>
                <style>.x { display: none; }</style>
              </body>
            </html>
        "#;

        assert_eq!(extract_body_text(html).unwrap(), "Hello visible text");
    }

    #[test]
    fn nested_script_subtrees_are_dropped() {
        let html = "<body><div>keep<div><script>drop()</script>also</div></div></body>";
        assert_eq!(extract_body_text(html).unwrap(), "keep also");
    }

    #[test]
    fn strip_removes_punctuation_but_keeps_cjk() {
        let stripper = HtmlStripper;
        let text = stripper.strip("<body><p>你好，世界！ Hello, world_1.</p></body>");
        assert_eq!(text, "你好世界 Hello world_1");
    }

    #[test]
    fn clean_text_keeps_only_letters_digits_underscore() {
        // combining acute, undertie (Pc) and superscript two (No)
        assert_eq!(clean_text("e\u{301} a\u{203F}b x\u{B2}"), "e ab x\u{B2}");
        assert_eq!(clean_text("snake_case 3½"), "snake_case 3½");
    }

    #[test]
    fn clean_text_drops_residual_tags() {
        assert_eq!(clean_text("a &lt;b&gt; <i>c</i> d"), "a ltbgt c d");
        assert_eq!(clean_text("x <not closed"), "x not closed");
    }

    #[test]
    fn empty_body_yields_empty_text() {
        assert_eq!(HtmlStripper.strip("<html><body></body></html>"), "");
        assert_eq!(HtmlStripper.strip(""), "");
    }

    #[test]
    fn malformed_markup_is_recovered() {
        let text = HtmlStripper.strip("<body><p>unclosed <div>still here");
        assert_eq!(text, "unclosed still here");
    }
}
