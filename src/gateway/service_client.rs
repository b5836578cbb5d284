// ============================================================================
// Service Client
// ============================================================================
//
// HTTP client for forwarding requests to upstream services:
// - builds the outbound request from the inbound one (method, headers, body)
// - single attempt, transport-default timeouts, no retry
// - relays the upstream status, Content-Type and body back verbatim
//
// ============================================================================

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};

/// HTTP client for forwarding requests to upstream services.
pub struct ServiceClient {
    client: reqwest::Client,
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceClient {
    pub fn new() -> Self {
        // Connection pooling and keep-alive; no request timeout is set, so
        // slow upstreams are governed by the transport defaults alone.
        let client = reqwest::Client::builder()
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Forward an inbound request to `upstream_url` and relay the response.
    ///
    /// The target URL is the base URL (trailing slashes stripped) plus the
    /// original path and query, unmodified. One attempt, no retry: transport
    /// failures map to 502.
    pub async fn forward_request(
        &self,
        upstream_url: &str,
        request: Request,
    ) -> GatewayResult<Response> {
        if upstream_url.is_empty() {
            return Err(GatewayError::UpstreamUnconfigured);
        }

        let path_and_query = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target_url = format!("{}{}", upstream_url.trim_end_matches('/'), path_and_query);

        let method = request.method().clone();
        let headers = request.headers().clone();

        // Read the body fully once into an owned buffer; the outbound request
        // is built from this buffer alone. A failed read means the caller
        // disconnected mid-request, and the outcome is discarded anyway.
        let (_parts, body) = request.into_parts();
        let body_bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

        let mut outbound = self.client.request(method, &target_url);

        // Copy headers verbatim, except Host, which the client derives from
        // the target URL
        for (key, value) in headers.iter() {
            if key != "host" {
                outbound = outbound.header(key, value);
            }
        }

        if !body_bytes.is_empty() {
            outbound = outbound.body(body_bytes);
        }

        let upstream_response = outbound.send().await?;

        let status = upstream_response.status();
        let content_type = upstream_response.headers().get(CONTENT_TYPE).cloned();
        let response_body = upstream_response.bytes().await?;

        // Relay status, Content-Type and body; other upstream headers are
        // not propagated
        let mut response = Response::new(Body::from(response_body));
        *response.status_mut() = status;
        if let Some(content_type) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }

        Ok(response)
    }
}
