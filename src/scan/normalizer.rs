use crate::llm::types::GroundingChunk;
use crate::scan::model::{
    GeneratedLink, LinkKind, LinkLocation, MessageEcho, Platform, RiskLevel, ScanSummary,
    SearchResult, Source,
};
use crate::scan::ScanError;
use serde::Deserialize;
use uuid::Uuid;

/// Shown when the backend returns no analysis narrative.
const FALLBACK_ANALYSIS: &str = "Scan complete. No analysis narrative was returned.";
/// Shown for a citation chunk that carries a web payload but no title.
const FALLBACK_SOURCE_TITLE: &str = "Untitled source";
/// Non-navigable anchor for a citation chunk without a URI.
const FALLBACK_SOURCE_URI: &str = "#";

/// Convert an untrusted backend reply into a well-formed [`SearchResult`].
///
/// Tolerant of ugly-but-parseable input; fatal only when the payload as a
/// whole cannot be interpreted. Individual malformed link records are
/// dropped, never defaulted.
pub fn normalize(
    raw_text: &str,
    grounding: &[GroundingChunk],
) -> Result<SearchResult, ScanError> {
    let value = extract_json(raw_text)?;

    let payload: RawPayload = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "payload parsed as JSON but not as a scan payload");
        ScanError::Parse {
            raw: raw_text.to_string(),
        }
    })?;

    let links: Vec<GeneratedLink> = payload
        .groups
        .into_iter()
        .filter_map(build_link)
        .collect();

    let messages: Vec<MessageEcho> = payload
        .messages
        .into_iter()
        .map(build_message)
        .collect();

    let sources = reconcile_sources(grounding);

    // Summary statistics come from the post-drop list, never from the
    // backend, even if it volunteered its own counts.
    let private = links.iter().filter(|l| l.is_private).count();
    let summary = ScanSummary {
        total_detected: links.len(),
        private_ratio: format!("{}/{}", private, links.len()),
        risk_level: RiskLevel::parse_or_low(payload.risk_level.as_deref()),
    };

    Ok(SearchResult {
        analysis: payload
            .analysis
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ANALYSIS.to_string()),
        links,
        messages,
        sources,
        summary,
    })
}

/// Defensive JSON extraction.
///
/// If the trimmed text is not already valid JSON, takes the greedy slice
/// from the first `{` or `[` to the last matching `}` or `]` across the
/// whole text. This is deliberately not balanced-bracket matching: it
/// tolerates leading and trailing prose at the cost of being fooled by
/// nested unrelated brackets in that prose.
pub fn extract_json(raw: &str) -> Result<serde_json::Value, ScanError> {
    let parse_failure = || ScanError::Parse {
        raw: raw.to_string(),
    };

    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let (start, open) = trimmed
        .char_indices()
        .find(|(_, c)| *c == '{' || *c == '[')
        .ok_or_else(parse_failure)?;
    let close = if open == '{' { '}' } else { ']' };
    let end = trimmed.rfind(close).filter(|e| *e > start).ok_or_else(parse_failure)?;

    serde_json::from_str(&trimmed[start..=end]).map_err(|e| {
        tracing::warn!(error = %e, "embedded slice did not parse as JSON");
        parse_failure()
    })
}

/// Validate one raw group into a link, or drop it.
///
/// url, linkType, confidenceScore and platformSource drive trust decisions:
/// a record missing any of them (or naming a platform outside the catalog)
/// is excluded rather than patched with placeholder data.
fn build_link(raw: RawGroup) -> Option<GeneratedLink> {
    let url = match raw.url {
        Some(u) if !u.trim().is_empty() => u,
        _ => return drop_group("url"),
    };
    let kind: LinkKind = match raw.link_type.as_deref().map(str::parse) {
        Some(Ok(kind)) => kind,
        _ => return drop_group("linkType"),
    };
    let confidence = match raw.confidence_score {
        Some(score) => clamp_score(score),
        None => return drop_group("confidenceScore"),
    };
    let platform_source: Platform = match raw.platform_source.as_deref().map(str::parse) {
        Some(Ok(platform)) => platform,
        _ => return drop_group("platformSource"),
    };

    Some(GeneratedLink {
        id: Uuid::new_v4().to_string(),
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        url,
        kind,
        platform_source,
        source_post_url: raw.source_post_url.filter(|u| !u.trim().is_empty()),
        is_private: raw.is_private,
        confidence,
        location: LinkLocation {
            country: raw.country.unwrap_or_default(),
            town: raw.town.filter(|t| !t.is_empty()),
            facility: raw.facility.filter(|f| !f.is_empty()),
        },
        high_confidence: confidence > 80,
        detected_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

fn drop_group(missing: &str) -> Option<GeneratedLink> {
    tracing::debug!(missing_field = %missing, "dropping incomplete link record");
    None
}

/// Message echoes carry no trust decision; missing fields degrade to
/// neutral defaults instead of dropping the record.
fn build_message(raw: RawMessage) -> MessageEcho {
    MessageEcho {
        sender: raw
            .sender
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "U".to_string()),
        platform: raw.platform.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        relevance: raw.relevance_score.map(clamp_score).unwrap_or(0),
    }
}

/// Citation reconciliation. Chunks without a web payload carry no evidence
/// and are excluded; title and uri of surviving chunks default
/// independently. Sources are never matched against link URLs.
fn reconcile_sources(grounding: &[GroundingChunk]) -> Vec<Source> {
    grounding
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| Source {
            title: web
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_SOURCE_TITLE.to_string()),
            uri: web
                .uri
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_SOURCE_URI.to_string()),
        })
        .collect()
}

fn clamp_score(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

/// Wire shape of the payload the backend was asked to produce. Everything
/// is optional here; completeness is enforced per record in [`build_link`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    analysis: Option<String>,
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    messages: Vec<RawMessage>,
    risk_level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGroup {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    link_type: Option<String>,
    confidence_score: Option<f64>,
    platform_source: Option<String>,
    source_post_url: Option<String>,
    #[serde(default)]
    is_private: bool,
    country: Option<String>,
    town: Option<String>,
    facility: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    sender: Option<String>,
    platform: Option<String>,
    content: Option<String>,
    relevance_score: Option<f64>,
}
