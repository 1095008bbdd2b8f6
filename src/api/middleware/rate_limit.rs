//! Per-client rate limiting using a token bucket.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn governor(per_second: u64, burst_size: u32) -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("non-zero rate limiter quota"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter for page views and the home page.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Keys are the
/// socket peer address, so the router must be served with connect info.
pub fn layer() -> IpGovernorLayer {
    governor(2, 100)
}

/// Stricter limiter for credential submission and sign-out.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// # Example
///
/// ```rust,ignore
/// let sign_in = Router::new()
///     .route("/login", post(login_submit_handler))
///     .layer(rate_limit::secure_layer());
/// ```
pub fn secure_layer() -> IpGovernorLayer {
    governor(1, 10)
}
