//! Rate Limit Metrics
//!
//! Gauges for the GitHub API quota state, one data point per quota
//! resource. Queried with a dedicated token so that reading the quota does
//! not consume the primary token's budget.
//!
//! | Metric                         | Type  |
//! |--------------------------------|-------|
//! | `actions.rate_limit.limit`     | Gauge |
//! | `actions.rate_limit.remaining` | Gauge |
//! | `actions.rate_limit.used`      | Gauge |

use opentelemetry::metrics::{Gauge, Meter};
use opentelemetry::KeyValue;

use crate::github::models::{RateLimit, RateLimitResource};

/// Records GitHub rate limit gauges.
pub struct RateLimitMetrics {
    limit: Gauge<u64>,
    remaining: Gauge<u64>,
    used: Gauge<u64>,
}

impl RateLimitMetrics {
    /// Creates the instrument set on the given meter.
    pub fn new(meter: &Meter) -> Self {
        let limit = meter
            .u64_gauge("actions.rate_limit.limit")
            .with_description("GitHub API quota per window")
            .build();

        let remaining = meter
            .u64_gauge("actions.rate_limit.remaining")
            .with_description("GitHub API quota remaining in the current window")
            .build();

        let used = meter
            .u64_gauge("actions.rate_limit.used")
            .with_description("GitHub API quota consumed in the current window")
            .build();

        Self {
            limit,
            remaining,
            used,
        }
    }

    /// Records one data point per quota resource present in the response.
    pub fn record(&self, rate_limit: &RateLimit) {
        self.record_resource("core", &rate_limit.resources.core);
        if let Some(search) = &rate_limit.resources.search {
            self.record_resource("search", search);
        }
        if let Some(graphql) = &rate_limit.resources.graphql {
            self.record_resource("graphql", graphql);
        }
    }

    fn record_resource(&self, name: &'static str, resource: &RateLimitResource) {
        let attrs = [KeyValue::new("resource", name)];
        self.limit.record(resource.limit, &attrs);
        self.remaining.record(resource.remaining, &attrs);
        self.used.record(resource.used, &attrs);
    }
}
