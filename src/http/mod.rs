pub mod request_log_middleware;

pub use request_log_middleware::RequestLogMiddleware;
