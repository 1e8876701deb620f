//! Section splitting and image-placeholder insertion.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::blocks::{child_elements, create_placeholder_image_block, element_to_block, format_for_wordpress};

static ENTRY_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.entry-content").expect("valid CSS selector"));

/// Partition elements into roughly `total / num_sections` sized groups.
///
/// An `h2`/`h3` opens a new group once the current one holds body content,
/// and a group is only closed at the size target on a non-heading element,
/// so a heading always stays with what follows it. Every element lands in
/// exactly one group and no group is empty.
fn partition<'a>(elements: &[ElementRef<'a>], num_sections: usize) -> Vec<Vec<ElementRef<'a>>> {
    let total = elements.len();
    let per_section = (total / num_sections.max(1)).max(1);

    let mut sections = Vec::new();
    let mut current: Vec<ElementRef<'a>> = Vec::new();

    for (i, &element) in elements.iter().enumerate() {
        let heading = is_section_heading(element);
        if heading && current.iter().any(|e| !is_section_heading(*e)) {
            sections.push(std::mem::take(&mut current));
        }
        current.push(element);

        if !heading && current.len() >= per_section && i + 1 < total {
            sections.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

fn is_section_heading(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "h2" | "h3")
}

/// Split HTML into sections of top-level elements, each serialised and
/// joined by newlines. Input without elements comes back as one section.
#[must_use]
pub fn split_into_sections(html: &str, num_sections: usize) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let elements: Vec<_> = child_elements(fragment.root_element()).collect();
    if elements.is_empty() {
        return vec![html.to_string()];
    }

    partition(&elements, num_sections)
        .into_iter()
        .map(|section| {
            section
                .iter()
                .map(ElementRef::html)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

/// Interleave `parts` with numbered placeholder blocks after each of the
/// first `num_placeholders` parts, never after the last.
fn interleave(parts: &[String], num_placeholders: usize) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        out.push_str(part);
        if i + 1 < parts.len() && i < num_placeholders {
            out.push_str("\n\n");
            out.push_str(&create_placeholder_image_block(i + 1));
            out.push_str("\n\n");
        }
    }
    out
}

/// Split `content` into `num_placeholders + 1` sections and insert a
/// placeholder image block between them.
#[must_use]
pub fn add_image_placeholders(content: &str, num_placeholders: usize) -> String {
    let sections = split_into_sections(content, num_placeholders + 1);
    interleave(&sections, num_placeholders)
}

/// Convert article HTML to blocks with placeholder image blocks spread
/// through it.
///
/// A `div.entry-content` wrapper is looked through first so its children are
/// what get split. Each section is converted to blocks on its own, then the
/// placeholders go between sections.
#[must_use]
pub fn format_with_placeholders(html: &str, num_placeholders: usize) -> String {
    if num_placeholders == 0 {
        return format_for_wordpress(html);
    }

    let fragment = Html::parse_fragment(html);
    let parent = fragment
        .select(&ENTRY_CONTENT)
        .next()
        .unwrap_or_else(|| fragment.root_element());
    let elements: Vec<_> = child_elements(parent).collect();
    if elements.is_empty() {
        return format_for_wordpress(html);
    }

    let sections: Vec<String> = partition(&elements, num_placeholders + 1)
        .into_iter()
        .map(|section| {
            section
                .into_iter()
                .map(element_to_block)
                .filter(|block| !block.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .filter(|blocks| !blocks.is_empty())
        .collect();

    tracing::debug!(
        sections = sections.len(),
        placeholders = num_placeholders,
        "formatted content with image placeholders"
    );
    interleave(&sections, num_placeholders)
}
