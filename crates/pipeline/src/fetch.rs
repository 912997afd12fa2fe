//! Download of uploaded audio referenced by URL
//!
//! Only `http` and `https` URLs are fetched. Hosts that name or resolve to
//! loopback, private, link-local or unspecified addresses are refused, and
//! redirects are re-checked against literal hosts.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use reqwest::{redirect, Client, Url};

use agrisaarthi_core::{AudioFormat, AudioInput, CapabilityError};

use crate::http::ensure_success;

const MAX_REDIRECTS: usize = 5;

pub struct AudioFetcher {
    client: Client,
    timeout_secs: u64,
    max_bytes: usize,
    allow_private_hosts: bool,
}

impl AudioFetcher {
    pub fn new(timeout_secs: u64, max_bytes: usize) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: fetch_client(timeout_secs, false)?,
            timeout_secs,
            max_bytes,
            allow_private_hosts: false,
        })
    }

    /// Permit loopback and private hosts, for local storage or tests
    pub fn allow_private_hosts(mut self, allow: bool) -> Result<Self, CapabilityError> {
        self.client = fetch_client(self.timeout_secs, allow)?;
        self.allow_private_hosts = allow;
        Ok(self)
    }

    /// GET `url` and wrap the body; format comes from the content type
    /// when recognizable, else `fallback`
    pub async fn fetch(
        &self,
        url: &str,
        fallback: AudioFormat,
    ) -> Result<AudioInput, CapabilityError> {
        let url = self.checked_url(url).await?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;

        if let Some(len) = response.content_length() {
            let size = usize::try_from(len).unwrap_or(usize::MAX);
            if size > self.max_bytes {
                return Err(CapabilityError::PayloadTooLarge {
                    size,
                    max: self.max_bytes,
                });
            }
        }

        let format = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|ct| AudioFormat::from_str_loose(ct.split(';').next().unwrap_or(ct)))
            .unwrap_or(fallback);

        let bytes = response.bytes().await?;
        let audio = AudioInput::new(bytes.to_vec(), format);
        audio.ensure_within(self.max_bytes)?;
        Ok(audio)
    }

    async fn checked_url(&self, raw: &str) -> Result<Url, CapabilityError> {
        let url = Url::parse(raw.trim()).map_err(|e| rejected(format!("invalid URL: {}", e)))?;
        check_literal(&url)?;
        if self.allow_private_hosts {
            return Ok(url);
        }

        // Literal addresses were already checked above
        let host = url.host_str().unwrap_or_default();
        if host.starts_with('[') || host.parse::<IpAddr>().is_ok() {
            return Ok(url);
        }

        let port = url.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| rejected(format!("cannot resolve {}: {}", host, e)))?;
        for addr in addrs {
            if is_internal(addr.ip()) {
                tracing::warn!(host, ip = %addr.ip(), "Audio URL resolves to an internal address");
                return Err(rejected(format!("{} resolves to an internal address", host)));
            }
        }
        Ok(url)
    }
}

fn rejected(reason: String) -> CapabilityError {
    CapabilityError::InvalidInput(format!("Audio URL not allowed: {}", reason))
}

fn check_scheme(url: &Url) -> Result<(), CapabilityError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(rejected(format!("unsupported scheme {}", other))),
    }
}

/// Scheme and literal-host checks that need no DNS
fn check_literal(url: &Url) -> Result<(), CapabilityError> {
    check_scheme(url)?;
    let host = url
        .host_str()
        .ok_or_else(|| rejected("missing host".to_string()))?;
    if host_is_internal(host) {
        return Err(rejected(format!("internal host {}", host)));
    }
    Ok(())
}

fn host_is_internal(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let lowered = host.to_ascii_lowercase();
    if lowered == "localhost" || lowered.ends_with(".localhost") {
        return true;
    }
    host.parse::<IpAddr>().map(is_internal).unwrap_or(false)
}

fn is_internal(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_internal_v4(v4),
            None => is_internal_v6(v6),
        },
    }
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // 100.64.0.0/10 shared address space
        || (a == 100 && (64..128).contains(&b))
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

fn fetch_client(timeout_secs: u64, allow_private_hosts: bool) -> Result<Client, CapabilityError> {
    let policy = redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let verdict = if allow_private_hosts {
            check_scheme(attempt.url())
        } else {
            check_literal(attempt.url())
        };
        match verdict {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e.to_string()),
        }
    });

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(policy)
        .build()
        .map_err(|e| CapabilityError::Configuration(format!("Failed to create HTTP client: {}", e)))
}
