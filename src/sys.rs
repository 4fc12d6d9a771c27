use crate::host::{HostClock, HostHooks, HostOffset};
use crate::time::EpochNanoseconds;
use crate::{TemporalError, TemporalResult, UtcOffset};

use web_time::{SystemTime, UNIX_EPOCH};

/// A host system implementation that returns the current time observed at
/// UTC.
///
/// This implementation is backed by [`std::time::SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl HostClock for SystemHost {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        get_system_nanoseconds()
    }
}

impl HostOffset for SystemHost {
    fn get_host_offset(&self, _: EpochNanoseconds) -> TemporalResult<UtcOffset> {
        Ok(UtcOffset::UTC)
    }
}

impl HostHooks for SystemHost {}

/// Returns the system time in nanoseconds.
pub(crate) fn get_system_nanoseconds() -> TemporalResult<EpochNanoseconds> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TemporalError::general("Error fetching system time"))?
        .as_nanos();
    EpochNanoseconds::try_from(nanos as i128)
}
