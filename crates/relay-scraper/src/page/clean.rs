//! Content cleaning: removes page chrome and reduces markup to what the
//! translator and the block formatter need.
//!
//! The cleaner never mutates the parsed DOM. It re-serializes the tree and
//! skips whatever should not survive, so cleaning already-cleaned HTML yields
//! the same bytes.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::RegexSet;
use scraper::{ElementRef, Html, Node};

/// Tags dropped together with their whole subtree.
///
/// Raw-text elements the parser reads literally (`xmp`, `noembed`,
/// `noframes`, `plaintext`) are on the list because their escaped text would
/// not parse back to the same bytes.
const REMOVED_TAGS: [&str; 18] = [
    "script", "style", "noscript", "iframe", "nav", "footer", "aside", "form", "button", "input",
    "select", "textarea", "comment", "header", "xmp", "noembed", "noframes", "plaintext",
];

/// Class fragments that mark ads, share bars, widgets and similar noise.
const NOISE_CLASS_PATTERNS: [&str; 15] = [
    "share",
    "social",
    "comment",
    "related",
    "sidebar",
    "widget",
    "advertisement",
    "ad-",
    "newsletter",
    "subscribe",
    "popup",
    "author-box",
    "post-navigation",
    "breadcrumb",
    "menu",
];

/// Elements kept even when they carry no text.
const KEEP_WHEN_EMPTY: [&str; 5] = ["br", "hr", "img", "source", "picture"];

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

static NOISE_CLASSES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(NOISE_CLASS_PATTERNS.iter().map(|p| format!("(?i){p}")))
        .expect("valid noise class patterns")
});

struct Rendered {
    html: String,
    /// Subtree contains non-whitespace text or an image.
    meaningful: bool,
}

/// Cleans article HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlCleaner;

impl HtmlCleaner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Clean an HTML fragment and return the cleaned markup.
    #[must_use]
    pub fn clean_fragment(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        self.render_children(fragment.root_element()).html
    }

    /// Clean an element that was located as the content container.
    ///
    /// The container itself is kept even when its class would mark it as
    /// noise; that class is dropped so a second pass keeps it too. A
    /// container with nothing meaningful left yields an empty string.
    #[must_use]
    pub fn clean_container(&self, container: ElementRef<'_>) -> String {
        let name = container.value().name();
        let children = self.render_children(container);
        if !children.meaningful {
            return String::new();
        }
        let mut html = open_tag(container, is_noise(container));
        html.push_str(&children.html);
        let _ = write!(html, "</{name}>");
        html
    }

    /// Clean a sequence of elements and wrap them in a bare `<div>`.
    #[must_use]
    pub fn clean_into_wrapper<'a, I>(&self, elements: I) -> String
    where
        I: IntoIterator<Item = ElementRef<'a>>,
    {
        let mut html = String::from("<div>");
        let mut meaningful = false;
        for element in elements {
            if let Some(rendered) = self.render_element(element) {
                meaningful |= rendered.meaningful;
                html.push_str(&rendered.html);
            }
        }
        if !meaningful {
            return String::new();
        }
        html.push_str("</div>");
        html
    }

    fn render_children(&self, parent: ElementRef<'_>) -> Rendered {
        let mut out = Rendered {
            html: String::new(),
            meaningful: false,
        };

        let preserves_leading_newline =
            matches!(parent.value().name(), "pre" | "textarea" | "listing");

        for (index, child) in parent.children().enumerate() {
            match child.value() {
                Node::Text(text) => {
                    if index == 0 && preserves_leading_newline && text.starts_with('\n') {
                        out.html.push('\n');
                    }
                    if !text.trim().is_empty() {
                        out.meaningful = true;
                    }
                    escape_text(text, &mut out.html);
                }
                Node::Element(_) => {
                    let Some(element) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if let Some(rendered) = self.render_element(element) {
                        out.meaningful |= rendered.meaningful;
                        out.html.push_str(&rendered.html);
                    }
                }
                _ => {}
            }
        }

        out
    }

    fn render_element(&self, element: ElementRef<'_>) -> Option<Rendered> {
        let value = element.value();
        let name = value.name();

        if REMOVED_TAGS.contains(&name) {
            return None;
        }
        if is_noise(element) {
            return None;
        }

        if name == "img" {
            return Some(Rendered {
                html: image_tag(element),
                meaningful: true,
            });
        }

        let open = open_tag(element, false);
        if VOID_ELEMENTS.contains(&name) {
            return Some(Rendered {
                html: open,
                meaningful: false,
            });
        }

        let children = self.render_children(element);
        if !children.meaningful && !KEEP_WHEN_EMPTY.contains(&name) {
            return None;
        }

        let mut html = open;
        html.push_str(&children.html);
        let _ = write!(html, "</{name}>");
        Some(Rendered {
            html,
            meaningful: children.meaningful,
        })
    }
}

fn is_noise(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| NOISE_CLASSES.is_match(class))
}

/// `<img>` reduced to `src`, `alt` and `loading="lazy"`.
fn image_tag(element: ElementRef<'_>) -> String {
    let value = element.value();
    let src = ["src", "data-src", "data-lazy-src"]
        .iter()
        .filter_map(|attr| value.attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .unwrap_or_default();

    let mut html = String::from("<img src=\"");
    escape_attr(src, &mut html);
    html.push('"');
    if let Some(alt) = value.attr("alt").filter(|alt| !alt.is_empty()) {
        html.push_str(" alt=\"");
        escape_attr(alt, &mut html);
        html.push('"');
    }
    html.push_str(" loading=\"lazy\">");
    html
}

/// Opening tag. Links keep only `href`; everything else drops `style`, and
/// `class` too when `drop_class` is set.
fn open_tag(element: ElementRef<'_>, drop_class: bool) -> String {
    let value = element.value();
    let name = value.name();
    let mut html = format!("<{name}");

    if name == "a" {
        if let Some(href) = value.attr("href").filter(|href| !href.trim().is_empty()) {
            html.push_str(" href=\"");
            escape_attr(href, &mut html);
            html.push('"');
        }
    } else {
        let mut attrs: Vec<(&str, &str)> = value
            .attrs()
            .filter(|(attr, _)| !attr.eq_ignore_ascii_case("style"))
            .filter(|(attr, _)| !(drop_class && attr.eq_ignore_ascii_case("class")))
            .collect();
        attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (attr, attr_value) in attrs {
            let _ = write!(html, " {attr}=\"");
            escape_attr(attr_value, &mut html);
            html.push('"');
        }
    }

    html.push('>');
    html
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
