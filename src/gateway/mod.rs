// ============================================================================
// API Gateway Core
// ============================================================================
//
// Request dispatch and forwarding pipeline:
// - router: ordered path-prefix route table and per-request dispatch
// - service_client: outbound request construction and response relay
//
// Per-request flow: match route -> (auth gate) -> forward -> relay.
//
// ============================================================================

pub mod router;
pub mod service_client;

pub use router::{Route, RouteTable};
pub use service_client::ServiceClient;
