use crate::config;
use crate::history::ScanHistory;
use crate::llm::gemini::GeminiClient;
use crate::scan::compiler::ScanScope;
use crate::scan::model::{
    Platform, ResultFilters, SearchKind, SearchRequest, SearchResult,
};
use crate::scan::{run_scan, ScanError};
use anyhow::{bail, Context, Result};

const USAGE: &str = "\
sigsweep - web-grounded reconnaissance scanner

USAGE:
    sigsweep --query <text> [OPTIONS]
    sigsweep --history

OPTIONS:
    --query <text>            Free-text topic, handle or number to probe
    --kind <kind>             topic | handle | phone | facility | messages (default: topic)
    --country <name>          Restrict findings to a country
    --town <name>             Restrict findings to a town or sector
    --facility <name>         Restrict findings to a named facility
    --platform <name>         Platform to search; repeatable (default: all)
    --min-confidence <n>      Only report findings scored at least n (0-100)
    --private-only            Only report private / invitation-only groups
    --active-only             Only report recently active groups
    --history                 Print the recorded scan log and exit
    --help                    Print this message

The backend credential is read from the GEMINI_API_KEY environment variable.
";

#[derive(Debug, PartialEq)]
enum Command {
    Scan(SearchRequest),
    History,
    Help,
}

/// CLI entry point.
pub async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match parse_args(&args)? {
        Command::Help => {
            print!("{USAGE}");
            Ok(())
        }
        Command::History => print_history(),
        Command::Scan(request) => scan(request).await,
    }
}

async fn scan(request: SearchRequest) -> Result<()> {
    let config = config::load_or_create_config()?;
    let _log_guard = crate::logging::init(&config)?;

    // Explicit credential injection; never stored in the config file.
    let api_key = std::env::var("GEMINI_API_KEY")
        .context("GEMINI_API_KEY environment variable is not set")?;

    let backend = GeminiClient::new(config.profile.clone(), api_key);
    let scope = ScanScope {
        label: config.profile.scope.clone(),
        agent_identity: config.profile.agent_identity.clone(),
    };

    let result = match run_scan(&backend, &request, &scope).await {
        Ok(result) => result,
        Err(err) => {
            if let ScanError::Parse { raw } = &err {
                tracing::warn!(raw = %truncate(raw, 400), "unparseable scan payload");
            }
            return Err(err.into());
        }
    };

    print!("{}", render(&result));

    // One sequential scan per process run, so superseded-response races
    // cannot occur here; the history append is plain bookkeeping.
    let history_path = config::history_path()?;
    let mut history = ScanHistory::load(&history_path)?;
    history.record(&request.query, result);
    history.save(&history_path)?;

    Ok(())
}

fn print_history() -> Result<()> {
    let history = ScanHistory::load(&config::history_path()?)?;
    if history.entries().is_empty() {
        println!("No recorded scans.");
        return Ok(());
    }
    for entry in history.entries() {
        println!(
            "{}  \"{}\"  ({} links, risk {})",
            entry.recorded_at,
            entry.query,
            entry.result.summary.total_detected,
            entry.result.summary.risk_level.as_str()
        );
    }
    Ok(())
}

fn render(result: &SearchResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("Analysis: {}\n\n", result.analysis));

    if result.links.is_empty() {
        out.push_str("No communication-group links detected.\n");
    } else {
        for (idx, link) in result.links.iter().enumerate() {
            out.push_str(&format!(
                "{}. [{}] {}\n   {}\n   source: {} | confidence: {}{}{}\n",
                idx + 1,
                link.kind.as_str(),
                if link.title.is_empty() { &link.url } else { &link.title },
                link.url,
                link.platform_source,
                link.confidence,
                if link.high_confidence { " (high)" } else { "" },
                if link.is_private { " | private" } else { "" },
            ));
            if let Some(post) = &link.source_post_url {
                out.push_str(&format!("   found in: {post}\n"));
            }
            out.push('\n');
        }
    }

    if !result.messages.is_empty() {
        out.push_str("Intercepted messages:\n");
        for msg in &result.messages {
            out.push_str(&format!(
                "  {} @ {}: {} (relevance {})\n",
                msg.sender, msg.platform, msg.content, msg.relevance
            ));
        }
        out.push('\n');
    }

    if !result.sources.is_empty() {
        out.push_str("Sources:\n");
        for source in &result.sources {
            out.push_str(&format!("  - {} <{}>\n", source.title, source.uri));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Detected: {} | Private: {} | Risk: {}\n",
        result.summary.total_detected,
        result.summary.private_ratio,
        result.summary.risk_level.as_str()
    ));

    out
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut query = String::new();
    let mut kind = SearchKind::TopicSearch;
    let mut country = String::new();
    let mut town = String::new();
    let mut facility = String::new();
    let mut platforms: Vec<Platform> = Vec::new();
    let mut filters = ResultFilters::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--history" => return Ok(Command::History),
            "--query" => query = expect_value(&mut iter, "--query")?,
            "--kind" => {
                kind = match expect_value(&mut iter, "--kind")?.as_str() {
                    "topic" => SearchKind::TopicSearch,
                    "handle" => SearchKind::HandleProbe,
                    "phone" => SearchKind::PhoneProbe,
                    "facility" => SearchKind::FacilityScan,
                    "messages" => SearchKind::MessageScan,
                    other => bail!("Unknown search kind: {other}"),
                }
            }
            "--country" => country = expect_value(&mut iter, "--country")?,
            "--town" => town = expect_value(&mut iter, "--town")?,
            "--facility" => facility = expect_value(&mut iter, "--facility")?,
            "--platform" => {
                let raw = expect_value(&mut iter, "--platform")?;
                let platform = raw
                    .parse::<Platform>()
                    .ok()
                    .with_context(|| format!("Unknown platform: {raw}"))?;
                if !platforms.contains(&platform) {
                    platforms.push(platform);
                }
            }
            "--min-confidence" => {
                filters.min_confidence = expect_value(&mut iter, "--min-confidence")?
                    .parse()
                    .context("--min-confidence expects a number between 0 and 100")?;
            }
            "--private-only" => filters.private_only = true,
            "--active-only" => filters.active_only = true,
            other => bail!("Unknown argument: {other}\n\n{USAGE}"),
        }
    }

    // Caller-side invariant: a scan needs a query or a facility.
    if query.trim().is_empty() && facility.trim().is_empty() {
        bail!("Nothing to scan: provide --query or --facility\n\n{USAGE}");
    }

    if platforms.is_empty() {
        platforms = Platform::ALL.to_vec();
    }

    Ok(Command::Scan(SearchRequest {
        query,
        kind,
        country,
        town,
        facility,
        platforms,
        filters,
    }))
}

fn expect_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String> {
    iter.next()
        .map(|s| s.to_string())
        .with_context(|| format!("{flag} expects a value"))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_full_scan_invocation() {
        let parsed = parse_args(&args(&[
            "--query",
            "aid-distribution",
            "--kind",
            "handle",
            "--country",
            "Jordan",
            "--platform",
            "telegram",
            "--platform",
            "x",
            "--min-confidence",
            "70",
            "--private-only",
        ]))
        .unwrap();

        let Command::Scan(request) = parsed else {
            panic!("expected scan command");
        };
        assert_eq!(request.query, "aid-distribution");
        assert_eq!(request.kind, SearchKind::HandleProbe);
        assert_eq!(request.country, "Jordan");
        assert_eq!(request.platforms, vec![Platform::Telegram, Platform::X]);
        assert_eq!(request.filters.min_confidence, 70);
        assert!(request.filters.private_only);
        assert!(!request.filters.active_only);
    }

    #[test]
    fn rejects_scan_without_query_or_facility() {
        let err = parse_args(&args(&["--country", "Jordan"])).unwrap_err();
        assert!(err.to_string().contains("Nothing to scan"));
    }

    #[test]
    fn facility_alone_satisfies_the_invariant() {
        let parsed = parse_args(&args(&[
            "--facility",
            "Central Clinic",
            "--kind",
            "facility",
        ]))
        .unwrap();
        assert!(matches!(parsed, Command::Scan(_)));
    }

    #[test]
    fn defaults_to_whole_platform_catalog() {
        let Command::Scan(request) = parse_args(&args(&["--query", "q"])).unwrap() else {
            panic!("expected scan command");
        };
        assert_eq!(request.platforms, Platform::ALL.to_vec());
    }

    #[test]
    fn rejects_unknown_platform_and_kind() {
        assert!(parse_args(&args(&["--query", "q", "--platform", "myspace"])).is_err());
        assert!(parse_args(&args(&["--query", "q", "--kind", "vibes"])).is_err());
    }

    #[test]
    fn render_includes_summary_and_sources() {
        use crate::scan::model::*;

        let result = SearchResult {
            analysis: "found one group".to_string(),
            links: vec![GeneratedLink {
                id: "id-1".to_string(),
                title: "Relief Net".to_string(),
                description: String::new(),
                url: "https://t.me/relief".to_string(),
                kind: LinkKind::Telegram,
                platform_source: Platform::X,
                source_post_url: Some("https://x.com/1".to_string()),
                is_private: true,
                confidence: 90,
                location: LinkLocation {
                    country: String::new(),
                    town: None,
                    facility: None,
                },
                high_confidence: true,
                detected_at: "2026-01-01 00:00:00".to_string(),
            }],
            messages: vec![],
            sources: vec![Source {
                title: "Report".to_string(),
                uri: "#".to_string(),
            }],
            summary: ScanSummary {
                total_detected: 1,
                private_ratio: "1/1".to_string(),
                risk_level: RiskLevel::Medium,
            },
        };

        let text = render(&result);
        assert!(text.contains("found one group"));
        assert!(text.contains("Relief Net"));
        assert!(text.contains("(high)"));
        assert!(text.contains("private"));
        assert!(text.contains("Report"));
        assert!(text.contains("Detected: 1 | Private: 1/1 | Risk: Medium"));
    }
}
