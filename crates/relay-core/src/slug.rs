//! URL slug generation shared by the translator and the publisher.

/// Fold a lowercase accented character into its ASCII spelling.
///
/// Covers the Latin accents found in French, Spanish, German and Swedish
/// recipe titles.
fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'é' | 'è' | 'ê' | 'ë' => "e",
        'à' | 'â' | 'ä' | 'á' | 'å' => "a",
        'ô' | 'ö' | 'ó' => "o",
        'û' | 'ü' | 'ú' => "u",
        'î' | 'ï' | 'í' => "i",
        'ç' => "c",
        'ñ' => "n",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

/// Generate a URL-safe slug: lowercase, accents folded, punctuation removed,
/// whitespace runs collapsed to single hyphens, no leading/trailing hyphen.
///
/// ```
/// assert_eq!(relay_core::slugify("Café à la Crème!"), "cafe-a-la-creme");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut raw = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if let Some(folded) = fold_accent(c) {
            raw.push_str(folded);
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            raw.push(c);
        } else if c == '-' || c.is_whitespace() {
            raw.push('-');
        }
    }

    raw.split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
