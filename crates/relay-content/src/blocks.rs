//! Conversion of flat HTML into CMS block markup.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static ENTRY_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.entry-content").expect("valid CSS selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid CSS selector"));
static FIGCAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption").expect("valid CSS selector"));

const SEPARATOR_BLOCK: &str =
    "<!-- wp:separator -->\n<hr class=\"wp-block-separator\"/>\n<!-- /wp:separator -->";

/// Element children of `parent`, skipping text and comments.
pub(crate) fn child_elements<'a>(parent: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    parent.children().filter_map(ElementRef::wrap)
}

/// Convert each top-level element of an HTML fragment to a block, joined by
/// blank lines. Bare text between elements is dropped.
#[must_use]
pub fn html_to_blocks(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    blocks_for(child_elements(fragment.root_element())).join("\n\n")
}

fn blocks_for<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .map(element_to_block)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Block markup for one element; empty when the element produces nothing.
pub(crate) fn element_to_block(element: ElementRef<'_>) -> String {
    let name = element.value().name();
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = &name[1..];
            format!(
                "<!-- wp:heading {{\"level\":{level}}} -->\n{}\n<!-- /wp:heading -->",
                element.html()
            )
        }
        "p" => wrap("paragraph", &element.html()),
        "ul" => wrap("list", &element.html()),
        "ol" => format!(
            "<!-- wp:list {{\"ordered\":true}} -->\n{}\n<!-- /wp:list -->",
            element.html()
        ),
        "blockquote" => wrap("quote", &element.html()),
        "table" => wrap(
            "table",
            &format!("<figure class=\"wp-block-table\">{}</figure>", element.html()),
        ),
        "img" => image_block(element, None),
        "figure" => match element.select(&IMG).next() {
            Some(img) => image_block(img, element.select(&FIGCAPTION).next()),
            None => String::new(),
        },
        "div" => blocks_for(child_elements(element)).join("\n\n"),
        "hr" => SEPARATOR_BLOCK.to_string(),
        _ => {
            let html = element.html();
            if html.trim().is_empty() {
                String::new()
            } else {
                wrap("html", &html)
            }
        }
    }
}

fn wrap(block: &str, inner: &str) -> String {
    format!("<!-- wp:{block} -->\n{inner}\n<!-- /wp:{block} -->")
}

fn image_block(img: ElementRef<'_>, caption: Option<ElementRef<'_>>) -> String {
    let src = escape_attr(img.value().attr("src").unwrap_or_default());
    let alt = escape_attr(img.value().attr("alt").unwrap_or_default());
    let caption = caption.map(|c| c.html()).unwrap_or_default();
    wrap(
        "image",
        &format!("<figure class=\"wp-block-image\"><img src=\"{src}\" alt=\"{alt}\"/>{caption}</figure>"),
    )
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Convert article HTML to blocks for publishing.
///
/// When the HTML carries a `div.entry-content` wrapper its children are
/// converted; otherwise the fragment's top-level elements are. If nothing
/// converts, the whole input becomes a single HTML block.
#[must_use]
pub fn format_for_wordpress(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let blocks = match fragment.select(&ENTRY_CONTENT).next() {
        Some(container) => blocks_for(child_elements(container)),
        None => blocks_for(child_elements(fragment.root_element())),
    };

    if blocks.is_empty() {
        tracing::debug!("no convertible elements; emitting a single html block");
        return wrap("html", html);
    }
    blocks.join("\n\n")
}

/// Empty image block marking where an editor should add a picture.
#[must_use]
pub fn create_placeholder_image_block(position: usize) -> String {
    format!(
        "<!-- wp:image -->\n<figure class=\"wp-block-image\">\n\
         <!-- ADD YOUR IMAGE HERE - Position {position} -->\n\
         </figure>\n<!-- /wp:image -->"
    )
}
