use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use menu_chat::api_connection::{
    connection::{ChatModel, OpenRouterChat, ProviderError},
    endpoints::{ChatCompletionRequest, ChatMessage, Provider, OPENROUTER_MODELS},
};
use menu_chat::conversation::ConversationDriver;
use menu_chat::prompts::GREETING;

const TEST_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

fn get_default_test_model() -> String {
    OPENROUTER_MODELS
        .first()
        .map(|m| m.model_name.to_string())
        .expect("OPENROUTER_MODELS is empty")
}

fn setup_test_environment() {
    dotenv().ok();
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = Provider::openrouter("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let request = ChatCompletionRequest {
        model: get_default_test_model(),
        messages: vec![ChatMessage::user("Hello")],
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(&Client::new(), request).await;
    assert!(matches!(result, Err(ProviderError::MissingApiKey(_))));
    if let Err(ProviderError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
async fn test_missing_api_key_through_chat_model() {
    let provider = Provider::openrouter("ANOTHER_KEY_THAT_DOES_NOT_EXIST_QWERTY");
    let model = OpenRouterChat::new(provider, &get_default_test_model(), Duration::from_secs(5)).unwrap();
    let result = model.complete(vec![ChatMessage::user("Hello")]).await;
    assert!(matches!(result, Err(ProviderError::MissingApiKey(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    const KEY_ENV_NAME: &str = "MENU_CHAT_TEST_UNREACHABLE_KEY";
    env::set_var(KEY_ENV_NAME, "dummy");

    let provider = Provider::openrouter(KEY_ENV_NAME).with_base_url("http://127.0.0.1:1/api/v1/");
    let model = OpenRouterChat::new(provider, &get_default_test_model(), Duration::from_secs(5)).unwrap();
    let result = model.complete(vec![ChatMessage::user("Hello")]).await;
    assert!(matches!(result, Err(ProviderError::Network(_))), "got {:?}", result);

    env::remove_var(KEY_ENV_NAME);
}

#[test]
fn test_available_models_listed() {
    let models = Provider::openrouter(TEST_API_KEY_ENV_VAR).get_available_models();
    assert!(models.iter().any(|m| m.model_name == "google/gemini-flash-1.5"));
}

#[test]
fn test_request_never_asks_for_schema_enforcement() {
    let request = ChatCompletionRequest {
        model: get_default_test_model(),
        messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
        temperature: Some(0.7),
        max_tokens: None,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("response_format").is_none());
    assert!(value.get("max_tokens").is_none());
    assert_eq!(value["messages"][0]["role"], "system");
}

#[tokio::test]
#[ignore]
async fn test_live_start_turn() {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!("Skipping test_live_start_turn: {} not set.", TEST_API_KEY_ENV_VAR);
        return;
    }

    let provider = Provider::openrouter(TEST_API_KEY_ENV_VAR);
    let model = OpenRouterChat::new(provider, &get_default_test_model(), Duration::from_secs(60))
        .unwrap()
        .with_temperature(0.7);
    let driver = ConversationDriver::new(Arc::new(model));

    let result = driver.converse(GREETING, &[]).await;
    assert!(result.is_ok(), "API call failed: {:?}", result.err());
    assert!(result.unwrap().question().is_some());
}

#[tokio::test]
#[ignore]
async fn test_api_error_with_invalid_key() {
    setup_test_environment();

    const INVALID_KEY_ENV_NAME_FOR_THIS_TEST: &str = "ENV_VAR_WITH_BAD_KEY_VALUE";
    env::set_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST, "this_is_a_deliberately_bad_api_key_string_for_testing");

    let provider = Provider::openrouter(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    let model = OpenRouterChat::new(provider, &get_default_test_model(), Duration::from_secs(30)).unwrap();
    let result = model.complete(vec![ChatMessage::user("This call should fail due to invalid key.")]).await;

    assert!(matches!(result, Err(ProviderError::Api { .. })), "Expected Api error, got {:?}", result);
    if let Err(ProviderError::Api { status, .. }) = result {
        assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
    }

    env::remove_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
}
