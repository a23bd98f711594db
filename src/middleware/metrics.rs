use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Middleware;
use crate::context::{Context, HandlerResponse};

/// Request counters for the handlers it wraps.
///
/// Counters are atomics updated with `Relaxed` ordering; readings are
/// eventually consistent. Share one instance across routes with
/// [`from_shared`](super::from_shared) to aggregate.
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    error_count: AtomicUsize,
    total_latency_ns: AtomicU64,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Responses with a status of 400 or above.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Mean latency of completed requests; zero before the first one.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _ctx: &Context) -> Option<HandlerResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn after(&self, _ctx: &Context, res: &mut HandlerResponse, latency: Duration) {
        self.total_latency_ns.fetch_add(
            u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX),
            Ordering::Relaxed,
        );
        if res.status >= 400 {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{compose, handler_fn};
    use crate::middleware::from_shared;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_counts_requests_and_errors() {
        let metrics = Arc::new(MetricsMiddleware::new());
        let handler = compose(
            handler_fn(|ctx| {
                let status = if ctx.query("fail").is_some() { 500 } else { 200 };
                ctx.json(status, json!({}));
            }),
            &[from_shared(Arc::clone(&metrics))],
        );

        handler(&Context::builder(Method::GET, "/").build());
        handler(&Context::builder(Method::GET, "/?fail=1").build());
        handler(&Context::builder(Method::GET, "/").build());

        assert_eq!(metrics.request_count(), 3);
        assert_eq!(metrics.error_count(), 1);
    }

    #[test]
    fn test_average_latency_starts_at_zero() {
        assert_eq!(MetricsMiddleware::new().average_latency(), Duration::ZERO);
    }
}
