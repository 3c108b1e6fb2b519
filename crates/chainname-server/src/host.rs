//! `Host` header → site and name.

use axum::http::{header, HeaderMap};

/// Top-level names served by the sites; a request for one of them alone
/// gets the site's root page.
pub const SUPPORTED_TLDS: &[&str] = &["bch", "doge", "dc"];

/// A request host split into the serving site and the name to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteHost {
    /// The last two labels, e.g. `bch.is`.
    pub site: String,
    /// Every label but the last, e.g. `alice.bch`.
    pub domain: String,
}

impl SiteHost {
    /// Split a `Host` header value.
    ///
    /// The value is lower-cased and any `:port` dropped. A name ending in
    /// `dcdomain` is rewritten to end in `dc`, so `alice.dcdomain.wf`
    /// resolves `alice.dc`.
    pub fn parse(host: &str) -> Self {
        let host = host.trim().to_ascii_lowercase();
        let host = host.split(':').next().unwrap_or_default();
        let labels: Vec<&str> = host.split('.').collect();

        let site = labels[labels.len().saturating_sub(2)..].join(".");
        let mut domain = labels[..labels.len().saturating_sub(1)].join(".");
        if let Some(stem) = domain.strip_suffix("dcdomain") {
            domain = format!("{stem}dc");
        }
        Self { site, domain }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self::parse(host)
    }

    /// `true` when the name is a bare supported TLD.
    pub fn is_bare_tld(&self) -> bool {
        SUPPORTED_TLDS.contains(&self.domain.as_str())
    }
}
