use crate::scan::model::{Platform, SearchRequest};
use serde_json::json;

/// Operation identity embedded into the persona string.
///
/// Carried explicitly by the caller instead of living in ambient state.
#[derive(Debug, Clone)]
pub struct ScanScope {
    /// Operation scope label, e.g. "communication-network discovery".
    pub label: String,
    /// Registered requesting agent, if any.
    pub agent_identity: Option<String>,
}

impl Default for ScanScope {
    fn default() -> Self {
        Self {
            label: "communication-network discovery".to_string(),
            agent_identity: None,
        }
    }
}

/// The three backend-facing artifacts compiled from one request.
#[derive(Debug, Clone)]
pub struct CompiledRequest {
    /// Natural-language instruction prompt.
    pub prompt: String,
    /// Persona / system instruction string.
    pub system_instruction: String,
    /// Declarative output-shape descriptor handed to the backend as a
    /// generation constraint. Never used for local validation.
    pub schema: serde_json::Value,
}

/// Compile a request into prompt, persona and schema descriptor.
///
/// Pure function of its inputs; no error conditions. Missing-field problems
/// surface later during normalization, not here.
pub fn compile(request: &SearchRequest, scope: &ScanScope) -> CompiledRequest {
    CompiledRequest {
        prompt: build_prompt(request),
        system_instruction: build_system_instruction(request, scope),
        schema: output_schema(),
    }
}

fn build_prompt(request: &SearchRequest) -> String {
    let platforms = platform_clause(&request.platforms);

    let mut prompt = if request.kind.is_identity_probe() {
        format!(
            "Trace the identifier \"{}\" across {platforms}. For every account, \
             group or channel tied to this identifier, return the originating \
             post where the connection was observed.",
            request.query
        )
    } else {
        let subject = if request.query.is_empty() {
            format!("the facility \"{}\"", request.facility)
        } else {
            format!("\"{}\"", request.query)
        };
        format!(
            "Enumerate active communication-group links (Telegram or WhatsApp) \
             related to {subject}, searching {platforms}. Include the \
             originating post where each link was discovered."
        )
    };

    if let Some(region) = region_clause(request) {
        prompt.push_str(&format!(" Restrict findings to {region}."));
    }

    let filters = &request.filters;
    if filters.min_confidence > 0 {
        prompt.push_str(&format!(
            " Only report findings with a confidence score of at least {}.",
            filters.min_confidence
        ));
    }
    if filters.private_only {
        prompt.push_str(" Only report private or invitation-only groups.");
    }
    if filters.active_only {
        prompt.push_str(" Only report groups with recent activity.");
    }

    prompt.push_str(
        " Every result must carry its originating-post URL. Respond with a \
         single JSON object in the required shape and nothing else - no prose \
         before or after it.",
    );

    prompt
}

fn build_system_instruction(request: &SearchRequest, scope: &ScanScope) -> String {
    let agent = scope
        .agent_identity
        .as_deref()
        .unwrap_or("anonymous requester");

    // The geographic constraint is restated here to reinforce the prompt.
    let geo = region_clause(request)
        .map(|r| format!(" All findings must fall within {r}."))
        .unwrap_or_default();

    format!(
        "You are a web-grounded reconnaissance analyst. Operation scope: {}. \
         Requesting agent: {agent}.{geo}",
        scope.label
    )
}

fn region_clause(request: &SearchRequest) -> Option<String> {
    let mut parts = Vec::new();
    if !request.facility.is_empty() {
        parts.push(format!("the facility \"{}\"", request.facility));
    }
    if !request.town.is_empty() {
        parts.push(format!("the area of {}", request.town));
    }
    if !request.country.is_empty() {
        parts.push(request.country.clone());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn platform_clause(platforms: &[Platform]) -> String {
    if platforms.is_empty() {
        "all known platforms".to_string()
    } else {
        platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Output-shape descriptor in the backend's schema dialect.
fn output_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": { "type": "STRING" },
            "riskLevel": { "type": "STRING", "enum": ["Low", "Medium", "High"] },
            "groups": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "linkType": { "type": "STRING", "enum": ["Telegram", "WhatsApp"] },
                        "confidenceScore": { "type": "NUMBER" },
                        "platformSource": { "type": "STRING" },
                        "sourcePostUrl": { "type": "STRING" }
                    },
                    "required": [
                        "title", "description", "url", "linkType",
                        "confidenceScore", "platformSource", "sourcePostUrl"
                    ]
                }
            }
        },
        "required": ["analysis", "riskLevel", "groups"]
    })
}
