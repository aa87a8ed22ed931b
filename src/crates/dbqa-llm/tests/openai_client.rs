use dbqa_core::{ChatModel, QueryOutput};
use dbqa_llm::{OpenAiClient, ProviderConfig};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(ProviderConfig::new("test-key", server.url(""), "gpt-4o-mini"))
        .expect("client")
}

#[tokio::test]
async fn generate_returns_first_choice_content() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("authorization", "Bearer test-key");
        then.status(200).json_body(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "There are 42 orders."}
            }]
        }));
    });

    let client = client_for(&server);
    let answer = client.generate("How many orders?").await.expect("generate");

    assert_eq!(answer, "There are 42 orders.");
    mock.assert();
}

#[tokio::test]
async fn generate_structured_sends_json_schema_format() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .json_body_partial(
                json!({
                    "response_format": {"type": "json_schema"}
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"query\": \"SELECT count(*) FROM orders;\"}"
                }
            }]
        }));
    });

    let client = client_for(&server);
    let payload = client
        .generate_structured("question", &QueryOutput::schema())
        .await
        .expect("structured");

    let output: QueryOutput = serde_json::from_value(payload).unwrap();
    assert_eq!(output.query, "SELECT count(*) FROM orders;");
    mock.assert();
}

#[tokio::test]
async fn rate_limit_maps_to_model_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(429).body("slow down");
    });

    let client = client_for(&server);
    let err = client.generate("question").await.unwrap_err();

    assert!(err.to_string().contains("Rate limit exceeded"));
}

#[tokio::test]
async fn empty_choices_is_an_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({"choices": []}));
    });

    let client = client_for(&server);
    let err = client.generate("question").await.unwrap_err();

    assert!(err.to_string().contains("no choices"));
}
