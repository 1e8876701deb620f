use super::*;

fn domains() -> Vec<String> {
    vec![
        "allmuffins.com".to_string(),
        "jelorec.com".to_string(),
        "dietaypeso.com".to_string(),
    ]
}

fn page(head: &str, body: &str) -> String {
    format!("<!DOCTYPE html><html><head>{head}</head><body>{body}</body></html>")
}

// -----------------------------------------------------------------------
// title
// -----------------------------------------------------------------------

#[test]
fn title_prefers_h1() {
    let doc = Html::parse_document(&page(
        "<title>Site | Other</title>",
        "<h1>  Best   <em>Blueberry</em> Muffins </h1>",
    ));
    assert_eq!(extract_title(&doc), "Best Blueberry Muffins");
}

#[test]
fn title_falls_back_to_title_tag_before_pipe() {
    let doc = Html::parse_document(&page(
        "<title>Lemon Muffins | All Muffins</title>",
        "<p>x</p>",
    ));
    assert_eq!(extract_title(&doc), "Lemon Muffins");
}

#[test]
fn title_placeholder_when_nothing_found() {
    let doc = Html::parse_document(&page("", "<p>x</p>"));
    assert_eq!(extract_title(&doc), "Untitled Recipe");
}

// -----------------------------------------------------------------------
// content container
// -----------------------------------------------------------------------

#[test]
fn content_uses_entry_content_before_article() {
    let doc = Html::parse_document(&page(
        "",
        "<article><div class=\"entry-content\"><p>Body</p>\
         <div class=\"share-buttons\">Share</div></div><p>Outside</p></article>",
    ));
    let html = extract_content_html(&doc, &HtmlCleaner::new());
    assert_eq!(html, "<div class=\"entry-content\"><p>Body</p></div>");
}

#[test]
fn content_falls_back_to_main() {
    let doc = Html::parse_document(&page("", "<main><h2>Steps</h2><p>Mix</p></main>"));
    let html = extract_content_html(&doc, &HtmlCleaner::new());
    assert_eq!(html, "<main><h2>Steps</h2><p>Mix</p></main>");
}

#[test]
fn content_from_a_category_classed_article_survives_recleaning() {
    let doc = Html::parse_document(&page(
        "",
        "<article class=\"post-7 post type-post category-bread-recipes\">\
         <h2>Intro</h2><p>Soft banana bread muffins.</p></article>",
    ));
    let cleaner = HtmlCleaner::new();
    let once = extract_content_html(&doc, &cleaner);
    assert_eq!(
        once,
        "<article><h2>Intro</h2><p>Soft banana bread muffins.</p></article>"
    );
    assert_eq!(cleaner.clean_fragment(&once), once);
}

#[test]
fn content_wraps_loose_blocks_when_no_container_matches() {
    let doc = Html::parse_document(&page(
        "",
        "<div class=\"x\"><h2>Intro</h2><p>One</p></div><ul><li>flour</li></ul><span>skip</span>",
    ));
    let html = extract_content_html(&doc, &HtmlCleaner::new());
    assert_eq!(html, "<div><h2>Intro</h2><p>One</p><ul><li>flour</li></ul></div>");
}

// -----------------------------------------------------------------------
// meta + featured image
// -----------------------------------------------------------------------

#[test]
fn meta_description_prefers_named_meta_then_og() {
    let doc = Html::parse_document(&page(
        r#"<meta property="og:description" content="OG text"><meta name="description" content="Named">"#,
        "",
    ));
    assert_eq!(extract_meta_description(&doc), "Named");

    let doc = Html::parse_document(&page(
        r#"<meta property="og:description" content="OG text">"#,
        "",
    ));
    assert_eq!(extract_meta_description(&doc), "OG text");

    let doc = Html::parse_document(&page("", ""));
    assert_eq!(extract_meta_description(&doc), "");
}

#[test]
fn featured_image_resolution_order() {
    let og = Html::parse_document(&page(
        r#"<meta property="og:image" content="https://a/og.jpg"><meta name="twitter:image" content="https://a/tw.jpg">"#,
        "",
    ));
    assert_eq!(extract_featured_image(&og).as_deref(), Some("https://a/og.jpg"));

    let twitter = Html::parse_document(&page(
        r#"<meta name="twitter:image" content="https://a/tw.jpg">"#,
        "",
    ));
    assert_eq!(
        extract_featured_image(&twitter).as_deref(),
        Some("https://a/tw.jpg")
    );

    let hero = Html::parse_document(&page(
        "",
        r#"<div class="entry-content"><img src="https://a/first.jpg"></div><img class="Hero-Image" src="https://a/hero.jpg">"#,
    ));
    assert_eq!(extract_featured_image(&hero).as_deref(), Some("https://a/hero.jpg"));

    let first = Html::parse_document(&page(
        "",
        r#"<div class="entry-content"><p><img src="https://a/first.jpg"></p></div>"#,
    ));
    assert_eq!(
        extract_featured_image(&first).as_deref(),
        Some("https://a/first.jpg")
    );

    assert!(extract_featured_image(&Html::parse_document(&page("", "<p>no</p>"))).is_none());
}

// -----------------------------------------------------------------------
// images
// -----------------------------------------------------------------------

#[test]
fn images_skip_decorative_and_tiny_and_duplicates() {
    let doc = Html::parse_document(&page(
        "",
        r#"<img src="https://a/outside.jpg">
           <div class="entry-content">
             <img src="https://a/one.jpg" width="800" height="600">
             <img src="https://a/site-LOGO.png">
             <img src="https://a/pixel.gif" width="1" height="1">
             <img src="https://a/narrow.jpg" width="50">
             <img src="https://a/auto.jpg" width="auto" height="80">
             <img data-lazy-src="https://a/lazy.jpg">
             <img src="https://a/one.jpg">
           </div>"#,
    ));
    assert_eq!(
        extract_images(&doc),
        vec![
            "https://a/one.jpg",
            "https://a/narrow.jpg",
            "https://a/auto.jpg",
            "https://a/lazy.jpg",
        ]
    );
}

#[test]
fn images_fall_back_to_article_scope() {
    let doc = Html::parse_document(&page(
        "",
        r#"<header><img src="https://a/banner.jpg"></header><article><img src="https://a/in.jpg"></article>"#,
    ));
    assert_eq!(extract_images(&doc), vec!["https://a/in.jpg"]);
}

// -----------------------------------------------------------------------
// internal links
// -----------------------------------------------------------------------

#[test]
fn internal_links_match_source_domains_in_order() {
    let doc = Html::parse_document(&page(
        "",
        r#"<div class="entry-content">
             <a href="https://allmuffins.com/b/">b</a>
             <a href="https://youtube.com/watch">yt</a>
             <a href="https://www.jelorec.com/recette/">fr</a>
             <a href="https://allmuffins.com/b/">again</a>
           </div>"#,
    ));
    assert_eq!(
        extract_internal_links(&doc, &domains()),
        vec!["https://allmuffins.com/b/", "https://www.jelorec.com/recette/"]
    );
}

// -----------------------------------------------------------------------
// full page
// -----------------------------------------------------------------------

#[test]
fn extract_page_assembles_all_fields() {
    let html = page(
        r#"<title>Chocolate Muffins | All Muffins</title>
           <meta name="description" content="Rich chocolate muffins.">
           <script type="application/ld+json">{"@type":"Recipe","name":"Chocolate Muffins","recipeIngredient":["flour"]}</script>"#,
        r#"<h1>Chocolate Muffins</h1>
           <div class="entry-content">
             <p>These <strong>chocolate</strong> muffins are great.</p>
             <script>track()</script>
             <p><a href="https://allmuffins.com/vanilla-muffins/" class="x">Vanilla</a></p>
           </div>"#,
    );
    let content = extract_page(
        "https://allmuffins.com/chocolate-muffins/",
        &html,
        &domains(),
        &HtmlCleaner::new(),
    );

    assert_eq!(content.title, "Chocolate Muffins");
    assert_eq!(content.meta_description, "Rich chocolate muffins.");
    assert!(!content.content_html.contains("track()"));
    assert!(content
        .content_html
        .contains("<a href=\"https://allmuffins.com/vanilla-muffins/\">Vanilla</a>"));
    assert_eq!(content.word_count, 6);
    assert_eq!(
        content.internal_links,
        vec!["https://allmuffins.com/vanilla-muffins/"]
    );
    let schema = content.recipe_schema.expect("schema");
    assert_eq!(schema.name.as_deref(), Some("Chocolate Muffins"));
    assert_eq!(schema.ingredients, vec!["flour"]);
}
