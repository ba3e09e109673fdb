use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed catalog of platforms a scan can target or attribute results to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Platform {
    Telegram,
    WhatsApp,
    X,
    Facebook,
    Instagram,
    TikTok,
}

impl Platform {
    /// Every catalog entry, in display order.
    pub const ALL: [Platform; 6] = [
        Platform::Telegram,
        Platform::WhatsApp,
        Platform::X,
        Platform::Facebook,
        Platform::Instagram,
        Platform::TikTok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Telegram => "Telegram",
            Platform::WhatsApp => "WhatsApp",
            Platform::X => "X",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ();

    /// Case-normalizing parse; anything outside the catalog is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(Platform::Telegram),
            "whatsapp" => Ok(Platform::WhatsApp),
            "x" | "twitter" => Ok(Platform::X),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            _ => Err(()),
        }
    }
}

/// Kind of communication-group link a result points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LinkKind {
    Telegram,
    WhatsApp,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Telegram => "Telegram",
            LinkKind::WhatsApp => "WhatsApp",
        }
    }
}

impl FromStr for LinkKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(LinkKind::Telegram),
            "whatsapp" => Ok(LinkKind::WhatsApp),
            _ => Err(()),
        }
    }
}

/// What the operator is probing for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    TopicSearch,
    HandleProbe,
    PhoneProbe,
    FacilityScan,
    MessageScan,
}

impl SearchKind {
    /// Identity probes trace a specific handle or number rather than a topic.
    pub fn is_identity_probe(&self) -> bool {
        matches!(self, SearchKind::HandleProbe | SearchKind::PhoneProbe)
    }
}

/// Result-shaping hints folded into the instruction prompt.
///
/// The backend is trusted to honor these; nothing is re-checked locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultFilters {
    pub min_confidence: u8,
    pub private_only: bool,
    pub active_only: bool,
}

impl Default for ResultFilters {
    fn default() -> Self {
        Self {
            min_confidence: 0,
            private_only: false,
            active_only: false,
        }
    }
}

/// A single scan request as assembled by the caller.
///
/// Location fields use the empty string for "unconstrained". The caller
/// guarantees that at least one of `query` or `facility` is non-empty
/// before compiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub kind: SearchKind,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub facility: String,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub filters: ResultFilters,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, kind: SearchKind) -> Self {
        Self {
            query: query.into(),
            kind,
            country: String::new(),
            town: String::new(),
            facility: String::new(),
            platforms: Platform::ALL.to_vec(),
            filters: ResultFilters::default(),
        }
    }
}

/// Geographic attribution of a discovered link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkLocation {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
}

/// One discovered communication-group link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedLink {
    /// Client-generated id, unique within one result batch.
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub kind: LinkKind,
    pub platform_source: Platform,
    /// Post the link was allegedly discovered in, distinct from the link itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_post_url: Option<String>,
    pub is_private: bool,
    /// Clamped to 0..=100.
    pub confidence: u8,
    pub location: LinkLocation,
    /// Derived: confidence strictly greater than 80.
    pub high_confidence: bool,
    /// Human-readable capture time, stamped at normalization.
    pub detected_at: String,
}

/// An intercepted message excerpt attributed to a platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageEcho {
    pub sender: String,
    pub platform: String,
    pub content: String,
    /// Clamped to 0..=100.
    pub relevance: u8,
}

/// A grounding citation. Built only from backend citation metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Overall risk classification of a scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Tolerant parse: absence or anything outside the catalog reads as `Low`.
    pub fn parse_or_low(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "medium" => RiskLevel::Medium,
            Some(s) if s == "high" => RiskLevel::High,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Counts derived locally from the post-drop link list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSummary {
    pub total_detected: usize,
    /// Private links over total, formatted "N/M".
    pub private_ratio: String,
    pub risk_level: RiskLevel,
}

/// The normalized output of one scan. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub analysis: String,
    pub links: Vec<GeneratedLink>,
    pub messages: Vec<MessageEcho>,
    pub sources: Vec<Source>,
    pub summary: ScanSummary,
}
