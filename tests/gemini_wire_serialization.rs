//! Wire-shape tests for the generation request and response types.

use serde_json::json;
use sigsweep::llm::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ToolSpec,
};

#[test]
fn serializes_full_generation_request() {
    let request = GenerateContentRequest {
        contents: vec![Content::user("find the groups")],
        system_instruction: Some(Content::system("you are an analyst")),
        tools: vec![ToolSpec::web_search()],
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: json!({ "type": "OBJECT" }),
        }),
    };

    let value = serde_json::to_value(request).unwrap();
    assert_eq!(
        value,
        json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "find the groups" }] }
            ],
            "systemInstruction": { "parts": [{ "text": "you are an analyst" }] },
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })
    );
}

#[test]
fn request_omits_absent_optional_fields() {
    let request = GenerateContentRequest {
        contents: vec![Content::user("q")],
        system_instruction: None,
        tools: vec![],
        generation_config: None,
    };

    let value = serde_json::to_value(request).unwrap();
    assert_eq!(
        value,
        json!({ "contents": [{ "role": "user", "parts": [{ "text": "q" }] }] })
    );
}

#[test]
fn response_text_concatenates_first_candidate_parts() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "{\"analysis\":" },
                    { "text": "\"ok\"}" }
                ]
            }
        }]
    }))
    .unwrap();

    assert_eq!(response.text(), "{\"analysis\":\"ok\"}");
}

#[test]
fn response_without_candidates_yields_empty_text_and_grounding() {
    let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(response.text(), "");
    assert!(response.grounding_chunks().is_empty());
}

#[test]
fn grounding_chunks_deserialize_with_partial_web_payloads() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": { "parts": [{ "text": "{}" }] },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "title": "Report", "uri": "https://example.org" } },
                    { "web": { "uri": "https://example.org/untitled" } },
                    { "retrievedContext": { "uri": "ignored" } }
                ]
            }
        }]
    }))
    .unwrap();

    let chunks = response.grounding_chunks();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].web.as_ref().unwrap().title.as_deref(), Some("Report"));
    assert!(chunks[1].web.as_ref().unwrap().title.is_none());
    assert!(chunks[2].web.is_none());
}
