pub mod logging;

pub use logging::{init_tracing, make_request_span, shutdown_tracing};
