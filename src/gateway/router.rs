// ============================================================================
// Gateway Router
// ============================================================================
//
// Routes requests to upstream services based on path prefix.
//
// Routing rules:
// - /auth/*         → identity service (no auth gate)
// - /applications/* → application service (JWT auth gate)
//
// Routes are checked in registration order and the first prefix match wins.
// There is no longest-prefix or specificity ranking.
//
// ============================================================================

use axum::{
    extract::{Request, State},
    response::Response,
};
use std::sync::Arc;

use crate::config::Config;
use crate::context::AppContext;
use crate::error::{GatewayError, GatewayResult};

/// A binding from a path prefix to an upstream base URL.
#[derive(Clone, Debug)]
pub struct Route {
    pub prefix: String,
    /// Upstream base URL. Empty means the route is registered but
    /// unresolvable: requests to it answer 500 without a network attempt.
    pub upstream: String,
    pub requires_auth: bool,
}

/// Ordered route table, immutable for the process lifetime.
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table. Prefixes must be non-empty and unique.
    pub fn new(routes: Vec<Route>) -> anyhow::Result<Self> {
        for (i, route) in routes.iter().enumerate() {
            anyhow::ensure!(!route.prefix.is_empty(), "route prefix must not be empty");
            anyhow::ensure!(
                routes[..i].iter().all(|r| r.prefix != route.prefix),
                "duplicate route prefix: {}",
                route.prefix
            );
        }
        Ok(Self { routes })
    }

    /// The gateway's static routes, bound to the configured upstreams.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.auth_url.is_empty() {
            tracing::warn!("AUTH_URL is not set; /auth requests will answer 500");
        }
        if config.application_url.is_empty() {
            tracing::warn!("APPLICATION_URL is not set; /applications requests will answer 500");
        }

        Self::new(vec![
            Route {
                prefix: "/auth".to_string(),
                upstream: config.auth_url.clone(),
                requires_auth: false,
            },
            Route {
                prefix: "/applications".to_string(),
                upstream: config.application_url.clone(),
                requires_auth: true,
            },
        ])
    }

    /// First prefix match in registration order.
    pub fn match_route(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| path.starts_with(&route.prefix))
    }
}

/// Dispatch a request: match a route, run the auth gate if the route
/// requires it, then forward and relay the upstream response.
pub async fn route_request(
    State(state): State<Arc<AppContext>>,
    mut request: Request,
) -> GatewayResult<Response> {
    let path = request.uri().path().to_string();

    let route = state
        .routes
        .match_route(&path)
        .ok_or_else(|| GatewayError::RouteNotFound(path.clone()))?
        .clone();

    if route.requires_auth {
        let claims = state.auth_manager.authorize(request.headers())?;
        tracing::debug!(sub = %claims.sub, path = %path, "Request authorized");
        // Claims ride along in the request extensions for the rest of the
        // pipeline; they are not part of the forwarded headers.
        request.extensions_mut().insert(claims);
    }

    state
        .service_client
        .forward_request(&route.upstream, request)
        .await
}
