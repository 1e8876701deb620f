//! Integration tests for `RecipeScraper::scrape` against a `wiremock` server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay_core::default_locales;
use relay_scraper::RecipeScraper;

const USER_AGENT: &str = "Mozilla/5.0 (relay-test)";

fn test_scraper() -> RecipeScraper {
    RecipeScraper::new(5, USER_AGENT, default_locales()).expect("failed to build RecipeScraper")
}

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Blueberry Muffins | All Muffins</title>
  <meta name="description" content="Bakery-style blueberry muffins.">
  <meta property="og:image" content="https://allmuffins.com/wp-content/uploads/blueberry.jpg">
  <script type="application/ld+json">
  {"@context":"https://schema.org","@graph":[{"@type":"Recipe","name":"Blueberry Muffins","recipeYield":"12","recipeInstructions":[{"@type":"HowToStep","text":"Bake."}]}]}
  </script>
</head>
<body>
  <nav><a href="https://allmuffins.com/">Home</a></nav>
  <h1>Blueberry Muffins</h1>
  <div class="entry-content">
    <p>Juicy muffins with <a href="https://allmuffins.com/lemon-muffins/" rel="noopener">lemon</a> zest.</p>
    <figure><img src="https://allmuffins.com/wp-content/uploads/step1.jpg" alt="Batter" width="800" height="600"></figure>
    <div class="social-share">Pin it</div>
  </div>
</body>
</html>"#;

#[tokio::test]
async fn scrape_extracts_cleaned_article() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blueberry-muffins/"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/blueberry-muffins/", server.uri());
    let content = test_scraper().scrape(&url).await.expect("page should scrape");

    assert_eq!(content.url, url);
    assert_eq!(content.title, "Blueberry Muffins");
    assert_eq!(content.meta_description, "Bakery-style blueberry muffins.");
    assert_eq!(
        content.featured_image_url.as_deref(),
        Some("https://allmuffins.com/wp-content/uploads/blueberry.jpg")
    );
    assert_eq!(
        content.image_urls,
        vec!["https://allmuffins.com/wp-content/uploads/step1.jpg"]
    );
    assert_eq!(
        content.internal_links,
        vec!["https://allmuffins.com/lemon-muffins/"]
    );
    assert!(content.content_html.starts_with("<div class=\"entry-content\">"));
    assert!(!content.content_html.contains("Pin it"));
    assert!(!content.content_html.contains("rel="));
    assert_eq!(content.word_count, 5);

    let schema = content.recipe_schema.expect("schema present");
    assert_eq!(schema.recipe_yield.as_deref(), Some("12"));
    assert_eq!(schema.instructions, vec!["Bake."]);
}

#[tokio::test]
async fn scrape_returns_none_on_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/gone/", server.uri());
    assert!(test_scraper().scrape(&url).await.is_none());
}

#[tokio::test]
async fn scrape_returns_none_when_unreachable() {
    // Port 9 (discard) on localhost is not served by the test.
    assert!(test_scraper()
        .scrape("http://127.0.0.1:9/never")
        .await
        .is_none());
}
