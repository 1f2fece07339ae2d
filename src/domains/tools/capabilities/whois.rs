//! WHOIS lookup over TCP (RFC 3912).
//!
//! The query starts at a root server and follows referral lines to the
//! registry or registrar server that holds the actual record. Referrals come
//! from remote text, so they are only followed to named hosts on the WHOIS
//! port that resolve to public addresses.

use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};
use tracing::{debug, instrument, warn};

use super::{DomainLookup, LookupError};
use crate::core::config::WhoisConfig;

/// Upper bound on a single server response.
const MAX_RESPONSE_BYTES: u64 = 1024 * 1024;

/// Keys WHOIS servers use to point at a more specific server.
const REFERRAL_KEYS: &[&str] = &["refer", "whois", "registrar whois server", "referralserver"];

/// Domain lookup speaking the WHOIS protocol directly.
pub struct TcpWhoisLookup {
    config: WhoisConfig,
}

impl TcpWhoisLookup {
    pub fn new(config: WhoisConfig) -> Self {
        Self { config }
    }

    async fn follow_referrals(&self, domain: &str) -> Result<String, LookupError> {
        let mut server = self.config.server.clone();
        let mut visited: Vec<String> = Vec::new();
        let mut last: Option<String> = None;

        for hop in 0..=self.config.max_referrals {
            // The configured server is trusted; referrals are not
            let text = match self.query(&server, domain, hop == 0).await {
                Ok(text) => text,
                // A failing referral still leaves the previous answer usable
                Err(e) if last.is_some() => {
                    warn!("Referral to {} failed, keeping previous answer: {}", server, e);
                    break;
                }
                Err(e) => return Err(e),
            };

            visited.push(server.to_lowercase());
            let referral = find_referral(&text);
            last = Some(text);

            match referral {
                Some(next) if !visited.contains(&next.to_lowercase()) => {
                    debug!("Following referral to {}", next);
                    server = next;
                }
                _ => break,
            }
        }

        match last {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LookupError::NotRegistered(domain.to_string())),
        }
    }

    async fn query(&self, server: &str, domain: &str, trusted: bool) -> Result<String, LookupError> {
        let (host, port) = split_host_port(server, self.config.port);
        debug!("Querying WHOIS server {}:{} for {}", host, port, domain);

        let addrs: Vec<SocketAddr> = lookup_host((host, port))
            .await
            .map_err(|e| LookupError::network(server, e))?
            .collect();

        if !trusted && !self.config.allow_local_referrals {
            self.check_referral(server, host, port, &addrs)?;
        }

        // Connect to the vetted addresses, not to a second resolution
        let mut stream = TcpStream::connect(&addrs[..])
            .await
            .map_err(|e| LookupError::network(server, e))?;

        stream
            .write_all(format!("{}\r\n", domain).as_bytes())
            .await
            .map_err(|e| LookupError::network(server, e))?;

        let mut raw = Vec::new();
        (&mut stream)
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut raw)
            .await
            .map_err(|e| LookupError::network(server, e))?;

        if raw.contains(&0) {
            return Err(LookupError::protocol(format!(
                "binary response from {}",
                server
            )));
        }

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

impl TcpWhoisLookup {
    fn check_referral(
        &self,
        server: &str,
        host: &str,
        port: u16,
        addrs: &[SocketAddr],
    ) -> Result<(), LookupError> {
        if port != self.config.port {
            return Err(LookupError::protocol(format!(
                "referral to {} uses port {}",
                server, port
            )));
        }

        if !is_host_name(host) {
            return Err(LookupError::protocol(format!(
                "referral to {} is not a host name",
                server
            )));
        }

        if let Some(addr) = addrs.iter().find(|addr| !is_public_ip(addr.ip())) {
            return Err(LookupError::protocol(format!(
                "referral to {} resolves to non-public address {}",
                server,
                addr.ip()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl DomainLookup for TcpWhoisLookup {
    #[instrument(skip(self))]
    async fn lookup(&self, domain: &str, timeout: Duration) -> Result<String, LookupError> {
        tokio::time::timeout(timeout, self.follow_referrals(domain))
            .await
            .map_err(|_| LookupError::Timeout(timeout.as_millis()))?
    }
}

/// Find the server a WHOIS response refers to, if any.
pub fn find_referral(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (key, value) = line.trim().split_once(':')?;
        if !REFERRAL_KEYS.contains(&key.trim().to_lowercase().as_str()) {
            return None;
        }

        let value = value.trim();
        let value = value.strip_prefix("whois://").unwrap_or(value);
        let value = value.trim_end_matches('/');
        if value.is_empty() || value.contains("://") {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// A DNS name with at least two labels, not an IP literal or `localhost`.
fn is_host_name(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host.parse::<IpAddr>().is_ok() || host == "localhost" || host.ends_with(".localhost") {
        return false;
    }

    host.contains('.')
        && host.split('.').all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Whether `ip` is routable on the public internet.
fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || a == 0
                // 100.64.0.0/10 shared address space
                || (a == 100 && (b & 0xc0) == 64))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link local
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}

fn split_host_port(server: &str, default_port: u16) -> (&str, u16) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (server, default_port),
        },
        None => (server, default_port),
    }
}
