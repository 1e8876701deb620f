//! Parser for the labelled-section reply format requested by the prompt.
//!
//! Each section value starts after its header and ends at the first of a
//! fixed set of terminators (a blank line or one of the following headers),
//! or at the end of the reply. The content section always runs to the end.

use relay_core::slugify;

use crate::types::{ResponseField, TranslationResult};

const UNTITLED: &str = "Untitled";

const TITLE_STOPS: &[&str] = &["\n\n", "\nTRANSLATED_SLUG:", "\nFOCUS_KEYWORD:"];
const SLUG_STOPS: &[&str] = &[
    "\n\n",
    "\nFOCUS_KEYWORD:",
    "\nSEO_TITLE:",
    "\nTRANSLATED_CONTENT:",
];
const KEYWORD_STOPS: &[&str] = &[
    "\n\n",
    "\nSEO_TITLE:",
    "\nSEO_DESCRIPTION:",
    "\nTRANSLATED_CONTENT:",
];
const SEO_TITLE_STOPS: &[&str] = &["\n\n", "\nSEO_DESCRIPTION:", "\nTRANSLATED_CONTENT:"];
const SEO_DESCRIPTION_STOPS: &[&str] = &["\n\n", "\nTRANSLATED_CONTENT:"];

/// Text following `header`, cut at the earliest terminator. Empty values
/// count as absent.
fn section<'a>(reply: &'a str, field: ResponseField, stops: &[&str]) -> Option<&'a str> {
    let header = field.header();
    let start = reply.find(header)? + header.len();
    let rest = reply[start..].trim_start();
    let end = stops
        .iter()
        .filter_map(|stop| {
            // A following header right after the skipped whitespace ends an
            // empty section.
            let bare = stop.trim_start_matches('\n');
            if !bare.is_empty() && rest.starts_with(bare) {
                Some(0)
            } else {
                rest.find(stop)
            }
        })
        .min()
        .unwrap_or(rest.len());
    let value = rest[..end].trim();
    (!value.is_empty()).then_some(value)
}

fn strip_bold(value: &str) -> String {
    value.replace("**", "").trim().to_string()
}

/// Turn a raw model reply into a [`TranslationResult`].
///
/// Never fails: each absent section gets its default and is recorded in
/// `missing_fields`.
pub(crate) fn parse_translation_response(reply: &str, target_lang: &str) -> TranslationResult {
    let mut missing = Vec::new();
    let mut take = |field: ResponseField, stops: &[&str]| {
        let value = section(reply, field, stops).map(strip_bold);
        if value.is_none() {
            missing.push(field);
        }
        value
    };

    let title = take(ResponseField::Title, TITLE_STOPS);
    let slug = take(ResponseField::Slug, SLUG_STOPS);
    let focus_keyword = take(ResponseField::FocusKeyword, KEYWORD_STOPS);
    let seo_title = take(ResponseField::SeoTitle, SEO_TITLE_STOPS);
    let seo_description = take(ResponseField::SeoDescription, SEO_DESCRIPTION_STOPS);
    let content = take(ResponseField::Content, &[]);

    let title = title.unwrap_or_else(|| UNTITLED.to_string());
    let slug = slug
        .map(|candidate| slugify(&candidate))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&title));
    let content_html = content.unwrap_or_else(|| reply.trim().to_string());

    TranslationResult {
        word_count: content_html.split_whitespace().count(),
        seo_title: seo_title.unwrap_or_else(|| title.clone()),
        title,
        slug,
        content_html,
        target_lang: target_lang.to_string(),
        focus_keyword: focus_keyword.unwrap_or_default(),
        seo_description: seo_description.unwrap_or_default(),
        missing_fields: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = "TRANSLATED_TITLE:
Muffins au Chocolat Faciles

TRANSLATED_SLUG:
muffins-au-chocolat-faciles

FOCUS_KEYWORD:
muffins au chocolat

SEO_TITLE:
Muffins au Chocolat : 7 Secrets Incroyables

SEO_DESCRIPTION:
Découvrez nos muffins au chocolat moelleux, prêts en 30 minutes.

TRANSLATED_CONTENT:
<h2>Ingrédients</h2>

<ul><li>200 g de farine</li></ul>
";

    #[test]
    fn parses_every_section() {
        let result = parse_translation_response(FULL_REPLY, "fr");
        assert_eq!(result.title, "Muffins au Chocolat Faciles");
        assert_eq!(result.slug, "muffins-au-chocolat-faciles");
        assert_eq!(result.focus_keyword, "muffins au chocolat");
        assert_eq!(result.seo_title, "Muffins au Chocolat : 7 Secrets Incroyables");
        assert_eq!(
            result.seo_description,
            "Découvrez nos muffins au chocolat moelleux, prêts en 30 minutes."
        );
        assert_eq!(
            result.content_html,
            "<h2>Ingrédients</h2>\n\n<ul><li>200 g de farine</li></ul>"
        );
        assert_eq!(result.word_count, 5);
        assert_eq!(result.target_lang, "fr");
        assert!(result.is_complete());
    }

    #[test]
    fn slug_is_regenerated_from_model_output() {
        let reply = "TRANSLATED_TITLE:\nMagdalenas\nTRANSLATED_SLUG:\n**Magdalenas de Plátano**\nFOCUS_KEYWORD:\nx";
        let result = parse_translation_response(reply, "es");
        assert_eq!(result.title, "Magdalenas");
        assert_eq!(result.slug, "magdalenas-de-platano");
    }

    #[test]
    fn bold_markers_are_stripped() {
        let reply = "TRANSLATED_TITLE: **Süße Muffins**\n\nSEO_TITLE: **Süße Muffins: 5 Tipps**\n\nTRANSLATED_CONTENT:\n<p>Hallo</p>";
        let result = parse_translation_response(reply, "de");
        assert_eq!(result.title, "Süße Muffins");
        assert_eq!(result.seo_title, "Süße Muffins: 5 Tipps");
        assert_eq!(result.slug, "susse-muffins");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults_and_are_reported() {
        let reply = "<p>Just some translated text</p>";
        let result = parse_translation_response(reply, "sv");
        assert_eq!(result.title, "Untitled");
        assert_eq!(result.slug, "untitled");
        assert_eq!(result.seo_title, "Untitled");
        assert_eq!(result.focus_keyword, "");
        assert_eq!(result.seo_description, "");
        assert_eq!(result.content_html, reply);
        assert!(!result.is_complete());
        assert_eq!(result.missing_fields.len(), 6);
    }

    #[test]
    fn seo_title_defaults_to_title_and_slug_to_title_slug() {
        let reply = "TRANSLATED_TITLE:\nMuffins à la Crème\n\nTRANSLATED_CONTENT:\n<p>x</p>";
        let result = parse_translation_response(reply, "fr");
        assert_eq!(result.seo_title, "Muffins à la Crème");
        assert_eq!(result.slug, "muffins-a-la-creme");
        assert_eq!(
            result.missing_fields,
            vec![
                ResponseField::Slug,
                ResponseField::FocusKeyword,
                ResponseField::SeoTitle,
                ResponseField::SeoDescription,
            ]
        );
    }

    #[test]
    fn value_running_to_end_of_reply_is_accepted() {
        let reply = "TRANSLATED_TITLE:\nMuffins";
        let result = parse_translation_response(reply, "fr");
        assert_eq!(result.title, "Muffins");
        assert!(!result.missing_fields.contains(&ResponseField::Title));
    }

    #[test]
    fn terminators_bound_each_section() {
        let reply = "FOCUS_KEYWORD:\nmuffins sains\nSEO_TITLE:\nMuffins Sains : 10 Astuces\nSEO_DESCRIPTION:\nDes muffins.\nTRANSLATED_CONTENT:\n<p>x</p>";
        let result = parse_translation_response(reply, "fr");
        assert_eq!(result.focus_keyword, "muffins sains");
        assert_eq!(result.seo_title, "Muffins Sains : 10 Astuces");
        assert_eq!(result.seo_description, "Des muffins.");
        assert_eq!(result.content_html, "<p>x</p>");
    }

    #[test]
    fn empty_section_counts_as_missing() {
        let reply = "TRANSLATED_TITLE:\n\nTRANSLATED_SLUG:\nabc";
        let result = parse_translation_response(reply, "fr");
        assert!(result.missing_fields.contains(&ResponseField::Title));
        assert_eq!(result.slug, "abc");
    }
}
