//! Integration tests for `TranslatorClient::translate` against a `wiremock`
//! chat-completion endpoint.

use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay_core::default_locales;
use relay_translator::{ResponseField, TranslatorClient, TranslatorConfig, TranslatorError};

fn test_config(server: &MockServer) -> TranslatorConfig {
    TranslatorConfig {
        endpoint: format!("{}/api/v1/chat/completions", server.uri()),
        api_key: "sk-test".to_string(),
        model: "anthropic/claude-sonnet-4".to_string(),
        max_tokens: 8000,
        temperature: 0.2,
        timeout_secs: 5,
        referer: "https://allmuffins.com".to_string(),
        app_title: "RecipeRelay Translator".to_string(),
    }
}

fn test_client(server: &MockServer) -> TranslatorClient {
    TranslatorClient::new(test_config(server), default_locales())
        .expect("failed to build TranslatorClient")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

const REPLY: &str = "TRANSLATED_TITLE:\nMuffins aux Myrtilles\n\n\
TRANSLATED_SLUG:\nmuffins-aux-myrtilles\n\n\
FOCUS_KEYWORD:\nmuffins aux myrtilles\n\n\
SEO_TITLE:\nMuffins aux Myrtilles : 7 Secrets Délicieux\n\n\
SEO_DESCRIPTION:\nDes muffins aux myrtilles moelleux et faciles.\n\n\
TRANSLATED_CONTENT:\n<p>Des muffins <strong>délicieux</strong>.</p>";

#[tokio::test]
async fn translate_sends_authenticated_request_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(header("HTTP-Referer", "https://allmuffins.com"))
        .and(header("X-Title", "RecipeRelay Translator"))
        .and(body_partial_json(json!({
            "model": "anthropic/claude-sonnet-4",
            "max_tokens": 8000,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(REPLY)))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .translate("Blueberry Muffins", "<p>Delicious muffins.</p>", "fr")
        .await
        .expect("translation should succeed");

    assert_eq!(result.title, "Muffins aux Myrtilles");
    assert_eq!(result.slug, "muffins-aux-myrtilles");
    assert_eq!(result.focus_keyword, "muffins aux myrtilles");
    assert_eq!(result.target_lang, "fr");
    assert_eq!(
        result.content_html,
        "<p>Des muffins <strong>délicieux</strong>.</p>"
    );
    assert!(result.is_complete());
}

#[tokio::test]
async fn prompt_embeds_source_html_and_target_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(REPLY)))
        .mount(&server)
        .await;

    test_client(&server)
        .translate("Banana Bread", "<h2>Steps</h2><p>Mash bananas.</p>", "de")
        .await
        .expect("translation should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("request body is JSON");
    let prompt = body["messages"][0]["content"].as_str().expect("prompt");
    assert_eq!(body["messages"][0]["role"], "user");
    assert!(prompt.contains("from English to German"));
    assert!(prompt.contains("<h2>Steps</h2><p>Mash bananas.</p>"));
    assert!(prompt.contains("Banana Bread"));
}

#[tokio::test]
async fn unsupported_language_fails_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(REPLY)))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .translate("t", "<p>c</p>", "it")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslatorError::UnsupportedLanguage(ref code) if code == "it"));
}

#[tokio::test]
async fn non_success_status_is_returned_to_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credits"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .translate("t", "<p>c</p>", "es")
        .await
        .unwrap_err();
    match err {
        TranslatorError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 402);
            assert_eq!(body, "insufficient credits");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .translate("t", "<p>c</p>", "sv")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslatorError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .translate("t", "<p>c</p>", "fr")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslatorError::Deserialize(_)));
}

#[tokio::test]
async fn partial_reply_is_accepted_and_flagged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("TRANSLATED_TITLE:\nMuffins\n\nTRANSLATED_CONTENT:\n<p>x</p>")),
        )
        .mount(&server)
        .await;

    let result = test_client(&server)
        .translate("t", "<p>c</p>", "fr")
        .await
        .expect("partial replies still parse");
    assert!(!result.is_complete());
    assert!(result.missing_fields.contains(&ResponseField::SeoDescription));
    assert_eq!(result.seo_title, "Muffins");
    assert_eq!(result.slug, "muffins");
}

fn app_config(vars: &[(&str, &str)]) -> relay_core::AppConfig {
    let vars: std::collections::HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    relay_core::build_app_config(|key| vars.get(key).cloned().ok_or(std::env::VarError::NotPresent))
        .expect("valid config")
}

#[test]
fn config_from_app_config_requires_api_key() {
    let err = TranslatorConfig::from_app_config(&app_config(&[]), default_locales()).unwrap_err();
    assert!(matches!(err, TranslatorError::MissingApiKey));

    let app = app_config(&[("OPENROUTER_API_KEY", "sk-live")]);
    let config = TranslatorConfig::from_app_config(&app, default_locales()).expect("config");
    assert_eq!(config.api_key, "sk-live");
    assert_eq!(config.max_tokens, 8000);
    assert_eq!(config.referer, "https://allmuffins.com");
    assert!(!format!("{config:?}").contains("sk-live"));
}
