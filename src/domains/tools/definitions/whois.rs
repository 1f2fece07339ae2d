//! WHOIS lookup tool definition.

use std::time::Duration;

use crate::core::config::Config;
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::ToolError;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A validated WHOIS request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisPlan {
    pub domain: String,
    pub timeout: Duration,
}

/// WHOIS lookup tool.
pub struct WhoisTool;

impl WhoisTool {
    /// Tool name as listed by the registry.
    pub const NAME: &'static str = "whois";

    /// Route the tool is served on.
    pub const PATH: &'static str = "/api/v1/tools/whois";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up domain registration data. Body: {domain}. \
         Returns the raw WHOIS text and its non-blank lines.";

    /// Validate and normalize the requested domain.
    pub fn plan(domain: &str, config: &Config) -> Result<WhoisPlan, ToolError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(ToolError::validation("domain is required."));
        }

        let domain = domain.trim_end_matches('.').to_ascii_lowercase();
        if !is_domain_name(&domain) {
            return Err(ToolError::validation(
                "domain must be a valid domain name such as example.com.",
            ));
        }

        Ok(WhoisPlan {
            domain,
            timeout: Duration::from_millis(config.tools.whois.timeout_ms),
        })
    }

    /// Envelope returned with the registry text.
    pub fn success(domain: &str, raw: &str) -> ResponseEnvelope {
        let formatted: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();

        ResponseEnvelope::success("WHOIS lookup completed.")
            .with("query_domain", domain)
            .with("raw_data", raw)
            .with("formatted_data", formatted)
    }
}

/// ASCII host name with at least two labels.
fn is_domain_name(domain: &str) -> bool {
    if domain.len() > MAX_DOMAIN_LEN || !domain.contains('.') {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
