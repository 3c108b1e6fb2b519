//! Request handlers.
//!
//! The name to resolve and the chain to read come from the `Host` header;
//! the path only selects the record.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chainname_core::{CoreError, NetworkSelector};
use chainname_resolver::{NameResolver, Network, Networks, ResolveError, Resolution};
use std::sync::Arc;

use crate::host::SiteHost;
use crate::pages;

/// Paths answered with an empty 200 without touching the chain.
const IGNORED_PATHS: &[&str] = &["favicon.ico", "robots.txt"];

/// Shared application state
pub struct AppState {
    pub resolver: NameResolver,
    pub selector: NetworkSelector,
    pub networks: Networks,
}

impl AppState {
    /// The network serving `host`'s site.
    fn network(&self, host: &SiteHost) -> Result<&Network, ResolveError> {
        let chain = self.selector.select(&host.site)?;
        self.networks.get(chain.id)
    }
}

// ==================== Error Handling ====================

#[derive(Debug)]
pub enum ApiError {
    /// Unknown site or nothing to redirect to: the not-found page.
    NotFound { domain: String, site: String },
    BadRequest(String),
    /// Upstream chain or RPC failure.
    BadGateway(String),
}

impl ApiError {
    pub fn not_found(host: &SiteHost) -> Self {
        ApiError::NotFound {
            domain: host.domain.clone(),
            site: host.site.clone(),
        }
    }

    fn resolve(e: ResolveError, host: &SiteHost) -> Self {
        match e {
            ResolveError::Name(CoreError::UnknownNetwork { .. }) => {
                tracing::debug!(site = %host.site, "no chain for site");
                ApiError::not_found(host)
            }
            ResolveError::Name(CoreError::InvalidName { .. }) => ApiError::BadRequest(e.to_string()),
            e => {
                if e.is_rpc_failure() {
                    tracing::warn!(domain = %host.domain, site = %host.site, error = %e, "resolution failed upstream");
                } else {
                    tracing::error!(domain = %host.domain, site = %host.site, error = %e, "resolution failed");
                }
                ApiError::BadGateway(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound { domain, site } => (
                StatusCode::NOT_FOUND,
                Html(pages::not_found_page(&domain, &site)),
            )
                .into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
        }
    }
}

/// 301 to `url`. A record that cannot be a `Location` value is an upstream
/// fault, not a redirect.
fn redirect(url: &str, host: &SiteHost) -> Result<Response, ApiError> {
    let location = HeaderValue::try_from(url).map_err(|e| {
        tracing::warn!(domain = %host.domain, site = %host.site, error = %e, "record is not a valid redirect target");
        ApiError::BadGateway(format!("record for {} is not a valid redirect target", host.domain))
    })?;
    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

fn respond(resolution: Resolution, host: &SiteHost) -> Result<Response, ApiError> {
    match resolution {
        Resolution::LinkFound(url) => redirect(&url, host),
        Resolution::RawValue(value) => Ok((StatusCode::OK, value).into_response()),
        Resolution::NotFound => Err(ApiError::not_found(host)),
    }
}

// ==================== Health Check ====================

pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ==================== Resolution ====================

/// Any method on `/`: redirect to the name's content or `url` record.
pub async fn root(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let host = SiteHost::from_headers(&headers);
    if host.is_bare_tld() {
        return Ok(Html(pages::root_page(&host.site)).into_response());
    }

    let network = state.network(&host).map_err(|e| ApiError::resolve(e, &host))?;
    let resolution = state
        .resolver
        .resolve_root(&host.domain, network)
        .await
        .map_err(|e| ApiError::resolve(e, &host))?;
    respond(resolution, &host)
}

/// `GET /:param`: one record of the name, by alias or raw key.
pub async fn field(
    State(state): State<Arc<AppState>>,
    Path(param): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if IGNORED_PATHS.contains(&param.as_str()) {
        tracing::debug!(path = %param, "filtered out");
        return Ok(StatusCode::OK.into_response());
    }

    let host = SiteHost::from_headers(&headers);
    if host.is_bare_tld() {
        return Ok(Html(pages::root_page(&host.site)).into_response());
    }

    let network = state.network(&host).map_err(|e| ApiError::resolve(e, &host))?;

    if param == "contenthash" {
        let link = state
            .resolver
            .content_hash_redirect(&host.domain, network)
            .await
            .map_err(|e| ApiError::resolve(e, &host))?;
        if let Some(url) = link {
            return redirect(&url, &host);
        }
    }

    let resolution = state
        .resolver
        .resolve_field(&host.domain, network, &param)
        .await
        .map_err(|e| ApiError::resolve(e, &host))?;
    respond(resolution, &host)
}
