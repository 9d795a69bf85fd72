use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs every backend call with its status and latency.
pub struct RequestLogMiddleware;

#[async_trait::async_trait]
impl Middleware for RequestLogMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        log::debug!("--> {} {}", method, url);

        let started = Instant::now();
        let result = next.run(req, extensions).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(response) => log::debug!(
                "<-- {} {} {} ({} ms)",
                response.status().as_u16(),
                method,
                url,
                elapsed.as_millis()
            ),
            Err(err) => log::warn!(
                "<-- {} {} failed after {} ms: {}",
                method,
                url,
                elapsed.as_millis(),
                err
            ),
        }
        result
    }
}
