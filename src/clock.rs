//! Time source abstraction.
//!
//! Repositories take their timestamps from an injected [`Clocker`] so tests
//! can pin the current time.

use chrono::{DateTime, TimeZone, Utc};

#[cfg(test)]
use mockall::automock;

/// Supplies the current time.
#[cfg_attr(test, automock)]
pub trait Clocker: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClocker;

impl Clocker for RealClocker {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns 2024-09-24 12:34:56 UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClocker;

impl Clocker for FixedClocker {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 24, 12, 34, 56)
            .single()
            .unwrap_or_default()
    }
}
