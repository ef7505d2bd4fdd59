use crate::error::GateError;
use crate::rate_limit::{Identity, RateLimiter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// Pulls the caller identity out of a request.
pub trait IdentityExtractor<Req>: Send + Sync {
    fn identity(&self, req: &Req) -> Identity;
}

impl<Req, F> IdentityExtractor<Req> for F
where
    F: Fn(&Req) -> Identity + Send + Sync,
{
    fn identity(&self, req: &Req) -> Identity {
        self(req)
    }
}

/// A layer that enforces rate limits using a [`RateLimiter`].
#[derive(Debug)]
pub struct RateLimitLayer<L, K> {
    limiter: Arc<L>,
    extractor: Arc<K>,
}

impl<L, K> Clone for RateLimitLayer<L, K> {
    fn clone(&self) -> Self {
        Self { limiter: self.limiter.clone(), extractor: self.extractor.clone() }
    }
}

impl<L, K> RateLimitLayer<L, K> {
    /// Create a new rate limit layer.
    pub fn new(limiter: L, extractor: K) -> Self {
        Self { limiter: Arc::new(limiter), extractor: Arc::new(extractor) }
    }

    /// Create a layer around a limiter that is also used elsewhere.
    pub fn shared(limiter: Arc<L>, extractor: K) -> Self {
        Self { limiter, extractor: Arc::new(extractor) }
    }
}

impl<S, L, K> Layer<S> for RateLimitLayer<L, K> {
    type Service = RateLimitService<S, L, K>;

    fn layer(&self, service: S) -> Self::Service {
        RateLimitService {
            inner: service,
            limiter: self.limiter.clone(),
            extractor: self.extractor.clone(),
        }
    }
}

/// Middleware service that enforces rate limits.
///
/// Rejected requests never reach the inner service.
#[derive(Debug)]
pub struct RateLimitService<S, L, K> {
    inner: S,
    limiter: Arc<L>,
    extractor: Arc<K>,
}

impl<S: Clone, L, K> Clone for RateLimitService<S, L, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            limiter: self.limiter.clone(),
            extractor: self.extractor.clone(),
        }
    }
}

impl<S, L, K, Req> Service<Req> for RateLimitService<S, L, K>
where
    S: Service<Req>,
    S::Future: Send + 'static,
    S::Response: 'static,
    S::Error: 'static,
    L: RateLimiter + 'static,
    K: IdentityExtractor<Req> + 'static,
    Req: 'static,
{
    type Response = S::Response;
    type Error = GateError<S::Error>;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(GateError::Inner)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let identity = self.extractor.identity(&req);
        match self.limiter.check(&identity) {
            Ok(_) => {
                let fut = self.inner.call(req);
                Box::pin(async move { fut.await.map_err(GateError::Inner) })
            }
            Err(exceeded) => Box::pin(async move { Err(GateError::RateLimited(exceeded)) }),
        }
    }
}
