//! Reactive rate-limit throttling against the Admin API call bucket.
//!
//! Shopify reports bucket usage on every response via the
//! `X-Shopify-Shop-Api-Call-Limit` header, formatted `"consumed/capacity"`
//! (e.g. `"32/40"`). The throttle only looks backward at the last observed
//! state: when the remaining budget drops below a threshold, the client
//! pauses for a fixed interval to let the bucket refill. It never predicts
//! usage ahead.

/// Last-observed state of the shop's API call bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallLimit {
    /// Calls consumed from the bucket so far.
    pub consumed: u32,
    /// Maximum bucket capacity.
    pub capacity: u32,
}

/// Parses a `X-Shopify-Shop-Api-Call-Limit` header value.
///
/// Returns `None` for anything that is not `"<consumed>/<capacity>"` with
/// two numeric halves.
#[must_use]
pub fn parse_call_limit(header: &str) -> Option<CallLimit> {
    let (consumed, capacity) = header.trim().split_once('/')?;
    Some(CallLimit {
        consumed: consumed.trim().parse().ok()?,
        capacity: capacity.trim().parse().ok()?,
    })
}

/// Whether the client should pause before its next call.
///
/// True iff the bucket state is known (`capacity > 0`) and fewer than
/// `threshold` calls remain. A capacity of zero means no header has been
/// observed yet, so the first call of a session never pauses.
#[must_use]
pub fn should_pause(capacity: u32, consumed: u32, threshold: u32) -> bool {
    capacity > 0 && capacity.saturating_sub(consumed) < threshold
}
