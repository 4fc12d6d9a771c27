//! Trait definitions for accessing values from the host environment.
//!
//! NOTE: This is a power user API.

use crate::{time::EpochNanoseconds, TemporalResult, UtcOffset};

/// The `HostClock` trait defines an accessor to the host's clock.
pub trait HostClock {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds>;
}

/// The `HostOffset` trait defines the UTC offset the host observes at an instant.
pub trait HostOffset {
    fn get_host_offset(&self, epoch_nanoseconds: EpochNanoseconds) -> TemporalResult<UtcOffset>;
}

/// `HostHooks` marks whether a trait implements the required host hooks with some
/// system methods.
pub trait HostHooks: HostClock + HostOffset {
    fn get_system_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        self.get_host_epoch_nanoseconds()
    }

    fn get_system_offset(&self, epoch_nanoseconds: EpochNanoseconds) -> TemporalResult<UtcOffset> {
        self.get_host_offset(epoch_nanoseconds)
    }
}

/// The empty host is a default implementation of a system host.
///
/// This implementation will always return zero epoch nanoseconds and
/// a +00:00 offset.
///
/// ```
/// use openehr_temporal::host::EmptyHostSystem;
/// use openehr_temporal::OpenEhrOffsetDateTime;
///
/// let now = OpenEhrOffsetDateTime::now_with_host(&EmptyHostSystem).unwrap();
/// assert_eq!(now.to_string(), "1970-01-01T00:00:00:00Z");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyHostSystem;

impl HostClock for EmptyHostSystem {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        Ok(EpochNanoseconds::from_seconds(0))
    }
}

impl HostOffset for EmptyHostSystem {
    fn get_host_offset(&self, _: EpochNanoseconds) -> TemporalResult<UtcOffset> {
        Ok(UtcOffset::UTC)
    }
}

impl HostHooks for EmptyHostSystem {}

/// A host with a frozen clock and a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHost {
    epoch_nanoseconds: EpochNanoseconds,
    offset: UtcOffset,
}

impl FixedHost {
    /// Creates a host that always reports `epoch_nanoseconds` at `offset`.
    pub fn new(epoch_nanoseconds: EpochNanoseconds, offset: UtcOffset) -> TemporalResult<Self> {
        epoch_nanoseconds.check_validity()?;
        Ok(Self {
            epoch_nanoseconds,
            offset,
        })
    }
}

impl HostClock for FixedHost {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        Ok(self.epoch_nanoseconds)
    }
}

impl HostOffset for FixedHost {
    fn get_host_offset(&self, _: EpochNanoseconds) -> TemporalResult<UtcOffset> {
        Ok(self.offset)
    }
}

impl HostHooks for FixedHost {}
