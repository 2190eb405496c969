use chomptron::config::GeminiConfig;
use chomptron::providers::GeminiProvider;
use chomptron::{generate_recipe, LlmProvider, ProviderFactory};
use mockito::Matcher;
use serde_json::json;

fn config_for(server: &mockito::Server) -> GeminiConfig {
    GeminiConfig {
        api_key: Some("test_key".to_string()),
        base_url: server.url(),
        ..GeminiConfig::default()
    }
}

#[tokio::test]
async fn test_generate_posts_prompt_and_reads_candidate_text() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_header("x-goog-api-key", "test_key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "parts": [{ "text": "say hi" }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "hi" }], "role": "model" },
                    "finishReason": "STOP"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config_for(&server)).unwrap();
    let text = provider.generate("say hi").await.unwrap();
    assert_eq!(text, "hi");
}

#[tokio::test]
async fn test_generation_config_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("POST", Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "maxOutputTokens": 256 }
        })))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.max_tokens = Some(256);
    let provider = GeminiProvider::new(&config).unwrap();
    assert_eq!(provider.generate("prompt").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("POST", Matcher::Any)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config_for(&server)).unwrap();
    let err = provider.generate("prompt").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn test_blocked_prompt_is_an_error() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config_for(&server)).unwrap();
    let err = provider.generate("prompt").await.unwrap_err();
    assert!(err.to_string().contains("blocked"));
}

#[tokio::test]
async fn test_generate_recipe_uses_recipe_prompt() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("POST", Matcher::Any)
        .match_body(Matcher::Regex(
            "using these ingredients: tofu, rice".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Crispy Tofu Bowl"}]}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = ProviderFactory::create(&config_for(&server)).unwrap();
    let recipe = generate_recipe(provider.as_ref(), "tofu, rice").await.unwrap();
    assert_eq!(recipe, "Crispy Tofu Bowl");
    _m.assert_async().await;
}

#[tokio::test]
async fn test_retries_configured_attempts() {
    let mut server = mockito::Server::new_async().await;

    let failing = server
        .mock("POST", Matcher::Any)
        .with_status(503)
        .with_body(r#"{"error":{"message":"The model is overloaded."}}"#)
        .expect(2)
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.retry_attempts = 2;
    config.retry_delay_ms = 1;

    let provider = ProviderFactory::create(&config).unwrap();
    let err = provider.generate("prompt").await.unwrap_err();
    assert_eq!(err.to_string(), "The model is overloaded.");
    failing.assert_async().await;
}

#[tokio::test]
async fn test_transport_error_does_not_leak_api_key() {
    let config = GeminiConfig {
        api_key: Some("SUPER_SECRET_KEY".to_string()),
        base_url: "http://127.0.0.1:1".to_string(),
        ..GeminiConfig::default()
    };

    let provider = GeminiProvider::new(&config).unwrap();
    let err = provider.generate("prompt").await.unwrap_err();
    assert!(!err.to_string().contains("SUPER_SECRET_KEY"), "{err}");
}
