//! Timezone-safe datetime helpers.
//! Token lifetimes are computed from civil UTC fields, so the conversions
//! here deal in seconds and never consult the local timezone.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::TimeError;
use crate::settings::Settings;

/// An instant in time, either naive (no timezone attached) or aware
/// (canonically UTC). Naive moments are treated as UTC civil fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Naive(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl Moment {
    pub fn is_aware(&self) -> bool {
        matches!(self, Moment::Utc(_))
    }

    /// Civil date/time fields of this moment, read as UTC.
    pub fn naive_utc(&self) -> NaiveDateTime {
        match self {
            Moment::Naive(ndt) => *ndt,
            Moment::Utc(dt) => dt.naive_utc(),
        }
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(ndt: NaiveDateTime) -> Self {
        Moment::Naive(ndt)
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(dt: DateTime<Utc>) -> Self {
        Moment::Utc(dt)
    }
}

/// Attach UTC to a naive moment when `settings.use_tz` is set; aware moments
/// and naive moments with the flag off pass through unchanged.
pub fn make_utc(settings: &Settings, moment: Moment) -> Moment {
    match moment {
        Moment::Naive(ndt) if settings.use_tz => {
            Moment::Utc(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        }
        other => other,
    }
}

/// The current UTC instant, aware when `settings.use_tz` is set.
pub fn aware_utcnow(settings: &Settings) -> Moment {
    make_utc(settings, Moment::Naive(Utc::now().naive_utc()))
}

/// Seconds since the epoch computed from the moment's UTC calendar fields.
/// Sub-second precision is dropped; the caller is expected to have
/// UTC-normalized the moment already.
pub fn to_epoch(moment: Moment) -> i64 {
    match moment {
        Moment::Naive(ndt) => ndt.and_utc().timestamp(),
        Moment::Utc(dt) => dt.timestamp(),
    }
}

/// Moment for an epoch timestamp, passed through [`make_utc`]. Timestamps
/// outside chrono's calendar range yield [`TimeError::EpochOutOfRange`].
pub fn from_epoch(settings: &Settings, ts: i64) -> Result<Moment, TimeError> {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0).ok_or(TimeError::EpochOutOfRange(ts))?;
    Ok(make_utc(settings, Moment::Naive(dt.naive_utc())))
}
