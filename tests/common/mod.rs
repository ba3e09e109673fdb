//! Common fixtures for scan pipeline tests

use serde_json::json;
use sigsweep::llm::types::{GroundingChunk, WebSource};

/// The canonical two-group payload: one high-confidence Telegram link found
/// on X, one low-confidence WhatsApp link found on Telegram.
pub fn two_group_payload() -> String {
    json!({
        "analysis": "found 2 groups",
        "groups": [
            {
                "title": "A",
                "description": "d",
                "url": "https://t.me/a",
                "linkType": "Telegram",
                "confidenceScore": 90,
                "platformSource": "X",
                "sourcePostUrl": "https://x.com/1"
            },
            {
                "title": "B",
                "description": "d2",
                "url": "https://wa.me/b",
                "linkType": "WhatsApp",
                "confidenceScore": 40,
                "platformSource": "Telegram",
                "sourcePostUrl": "https://x.com/2"
            }
        ],
        "riskLevel": "Medium"
    })
    .to_string()
}

#[allow(dead_code)]
pub fn web_chunk(title: Option<&str>, uri: Option<&str>) -> GroundingChunk {
    GroundingChunk {
        web: Some(WebSource {
            title: title.map(String::from),
            uri: uri.map(String::from),
        }),
    }
}

#[allow(dead_code)]
pub fn bare_chunk() -> GroundingChunk {
    GroundingChunk { web: None }
}
