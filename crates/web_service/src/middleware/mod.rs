pub mod identity_middleware;
pub mod tracing_middleware;

pub use identity_middleware::{extract_user_id, IdentityMiddleware};
pub use tracing_middleware::{extract_trace_id, TraceId, TracingMiddleware};
