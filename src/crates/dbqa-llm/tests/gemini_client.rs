use dbqa_core::{ChatModel, QueryOutput};
use dbqa_llm::{GeminiClient, ProviderConfig};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(ProviderConfig::new(
        "test-key",
        server.url(""),
        "gemini-2.5-flash",
    ))
    .expect("client")
}

#[tokio::test]
async fn generate_joins_candidate_parts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-2.5-flash:generateContent")
            .query_param("key", "test-key");
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "There are "}, {"text": "42 orders."}]
                },
                "finishReason": "STOP"
            }]
        }));
    });

    let client = client_for(&server);
    let answer = client.generate("How many orders?").await.expect("generate");

    assert_eq!(answer, "There are 42 orders.");
    mock.assert();
}

#[tokio::test]
async fn generate_structured_parses_json_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-2.5-flash:generateContent")
            .json_body_partial(
                json!({
                    "generationConfig": {"responseMimeType": "application/json"}
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"query\": \"SELECT count(*) FROM orders;\"}"}]
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
async fn structured_output_that_is_not_json_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "SELECT 1"}]}
            }]
        }));
    });

    let client = client_for(&server);
    let err = client
        .generate_structured("question", &QueryOutput::schema())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not valid JSON"));
}

#[tokio::test]
async fn auth_failure_maps_to_model_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(403).body("API key not valid");
    });

    let client = client_for(&server);
    let err = client.generate("question").await.unwrap_err();

    assert!(err.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn empty_candidates_is_an_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({"candidates": []}));
    });

    let client = client_for(&server);
    let err = client.generate("question").await.unwrap_err();

    assert!(err.to_string().contains("no candidates"));
}
