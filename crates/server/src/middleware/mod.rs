//! HTTP middleware stack for the order counter.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. CORS (origins from `ALLOWED_ORIGINS` in production)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (add unique ID to each request)
//! 5. Security headers (CSP, frame denial, etc.)

pub mod cors;
pub mod request_id;
pub mod security_headers;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
