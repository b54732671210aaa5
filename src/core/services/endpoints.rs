//! URLs of the server API.

/// Base URL of the server, fixed at build time. Empty means same origin.
pub const API_BASE: &str = match option_env!("PIPELINE_TRACE_API_BASE") {
    Some(base) => base,
    None => "",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFetchMode {
    /// Periodic poll; the server may answer from its cache.
    Routine,
    /// Explicit recheck; the server re-evaluates every provider.
    Refresh,
}

/// URL of the message listing, or `None` when there is no run to ask about.
pub fn messages_url(run_id: &str, agent: Option<&str>) -> Option<String> {
    let run_id = run_id.trim();
    if run_id.is_empty() {
        return None;
    }
    let mut url = format!("{API_BASE}/api/messages?pipelineRunId={}", urlencoding::encode(run_id));
    if let Some(agent) = agent.filter(|a| !a.is_empty()) {
        url.push_str("&agent=");
        url.push_str(&urlencoding::encode(agent));
    }
    Some(url)
}

pub fn runs_url() -> String {
    format!("{API_BASE}/api/pipeline-runs")
}

pub fn providers_url(mode: ProviderFetchMode) -> String {
    match mode {
        ProviderFetchMode::Routine => format!("{API_BASE}/api/providers"),
        ProviderFetchMode::Refresh => format!("{API_BASE}/api/providers?refresh=true"),
    }
}
