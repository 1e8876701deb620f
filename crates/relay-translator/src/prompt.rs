//! The instruction prompt sent with every translation request.

use relay_core::Language;

use crate::types::ResponseField;

/// Build the translation prompt for one recipe and one target language.
///
/// The title and HTML are embedded verbatim. The reply format the model is
/// asked for is exactly the one `parse_translation_response` reads.
pub(crate) fn build_translation_prompt(
    title: &str,
    content_html: &str,
    source_language: &str,
    target: &Language,
) -> String {
    let lang = target.name.as_str();
    let title_header = ResponseField::Title.header();
    let slug_header = ResponseField::Slug.header();
    let keyword_header = ResponseField::FocusKeyword.header();
    let seo_title_header = ResponseField::SeoTitle.header();
    let seo_description_header = ResponseField::SeoDescription.header();
    let content_header = ResponseField::Content.header();

    format!(
        "You are a professional recipe translator specializing in culinary content.

Translate the following recipe from {source_language} to {lang}.

HTML RULES (CRITICAL):
1. Keep every HTML tag exactly as given: <h2>, <h3>, <p>, <ul>, <ol>, <li>, <table>, <tr>, <td>, <th>, <strong>, <em>, <a href=\"...\">, <img src=\"...\" alt=\"...\">
2. Do not remove, reorder or restructure any element
3. Translate only the text between tags
4. Leave every attribute (href, src, alt, class) unchanged
5. Keep line breaks and spacing

TRANSLATION GUIDELINES:
1. Keep the same friendly, informative tone
2. Adapt cooking terms naturally (cups to metric outside the US)
3. Use accurate ingredient names in {lang}
4. Write for a {lang}-speaking search audience
5. Keep the recipe authentic while adapting it culturally

ORIGINAL TITLE:
{title}

ORIGINAL CONTENT (HTML):
{content_html}

SEO RULES (every field entirely in {lang}, no English words):
1. FOCUS KEYWORD: 2-4 words in {lang}
2. SLUG: in {lang}, lowercase, hyphens only, no accents
3. SEO TITLE: starts with the focus keyword, contains a number, a power word and a sentiment word in {lang}, at most 60 characters
4. META DESCRIPTION: contains the focus keyword, 150-160 characters

Reply in exactly this format:

{title_header}
[title in {lang}, containing the focus keyword]

{slug_header}
[slug in {lang}, lowercase, hyphens only, no accents]

{keyword_header}
[focus keyword in {lang}, 2-4 words]

{seo_title_header}
[focus keyword first, then a number and a power word, max 60 characters]

{seo_description_header}
[150-160 characters in {lang}, containing the focus keyword]

{content_header}
[the full translated content with all HTML tags preserved]

Begin the translation now:"
    )
}
