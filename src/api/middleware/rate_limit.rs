//! Rate limiting middleware using token bucket algorithm.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Per-client request budget.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// Sustained requests per second.
    pub per_second: u64,
    pub burst: u32,
}

impl RateLimit {
    /// Interval at which one request's worth of budget is replenished.
    fn replenish_every_ms(&self) -> u64 {
        if self.per_second == 0 {
            0
        } else {
            (1000 / self.per_second).max(1)
        }
    }
}

/// Rate limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Errors
///
/// Returns an error if either limit is zero.
pub fn layer(
    limit: RateLimit,
) -> Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(limit.replenish_every_ms())
        .burst_size(limit.burst)
        .finish()
        .context("rate limit must have a non-zero period and burst size")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Rate limiter keyed by the forwarded client address.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back to
/// the peer address. Use only behind a trusted reverse proxy.
///
/// # Errors
///
/// Returns an error if either limit is zero.
pub fn proxied_layer(
    limit: RateLimit,
) -> Result<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(limit.replenish_every_ms())
        .burst_size(limit.burst)
        .finish()
        .context("rate limit must have a non-zero period and burst size")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_burst_is_rejected() {
        assert!(
            layer(RateLimit {
                per_second: 1,
                burst: 0
            })
            .is_err()
        );
    }

    #[test]
    fn test_replenish_interval() {
        let limit = RateLimit {
            per_second: 2,
            burst: 4,
        };
        assert_eq!(limit.replenish_every_ms(), 500);
        assert_eq!(
            RateLimit {
                per_second: 5000,
                burst: 1
            }
            .replenish_every_ms(),
            1
        );
    }

    #[test]
    fn test_valid_limits_build() {
        let limit = RateLimit {
            per_second: 2,
            burst: 4,
        };
        assert!(layer(limit).is_ok());
        assert!(proxied_layer(limit).is_ok());
    }
}
