//! Fixture entities - the pieces a sandbox application is assembled from

mod channel;
mod connection;
mod fixture;
mod key;
mod namespace;

pub use channel::{Channel, Presence};
pub use connection::Connection;
pub use fixture::{AppFixture, PRESENCE_FIXTURES_CHANNEL};
pub use key::Key;
pub use namespace::Namespace;

use chrono::{DateTime, Utc};

// Wire fields are "omitempty": zero values are left out of the request body.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_zero_i32(value: &i32) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Convert a millisecond timestamp, treating zero as "not set"
pub(crate) fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        None
    } else {
        DateTime::from_timestamp_millis(millis)
    }
}
