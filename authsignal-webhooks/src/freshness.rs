//! Replay protection based on the signed timestamp

use crate::{Result, WebhookError};

/// Default tolerance, in minutes
pub const DEFAULT_TOLERANCE_MINUTES: i64 = 5;

/// Reject timestamps older than `tolerance_minutes` before `now`
///
/// A tolerance of zero or less turns the check off. The boundary second
/// itself is still accepted. Timestamps in the future are not rejected.
pub fn check(timestamp: i64, tolerance_minutes: i64, now: i64) -> Result<()> {
    if tolerance_minutes <= 0 {
        return Ok(());
    }

    let oldest_accepted = now.saturating_sub(tolerance_minutes.saturating_mul(60));
    if timestamp < oldest_accepted {
        return Err(WebhookError::TimestampOutOfTolerance {
            timestamp,
            oldest_accepted,
        });
    }

    Ok(())
}
