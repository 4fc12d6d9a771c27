//! The `Now` component

use crate::{
    host::HostHooks,
    iso::{IsoDateTime, IsoOffsetDateTime},
    time::EpochNanoseconds,
    TemporalResult, UtcOffset,
};

use super::{
    OpenEhrDate, OpenEhrDateTime, OpenEhrOffsetDateTime, OpenEhrOffsetTime, OpenEhrTime,
};

/// Reads the current local date-time and offset from `host`.
pub(crate) fn host_offset_date_time(host: &impl HostHooks) -> TemporalResult<IsoOffsetDateTime> {
    let epoch_nanoseconds = host.get_system_epoch_nanoseconds()?;
    let offset = host.get_system_offset(epoch_nanoseconds)?;
    let date_time = IsoDateTime::from_epoch_nanoseconds(epoch_nanoseconds, offset)?;
    Ok(IsoOffsetDateTime::new_unchecked(date_time, offset))
}

/// A clock handing out current values of every kind at full precision.
///
/// ```rust
/// use openehr_temporal::{host::EmptyHostSystem, Now, OpenEhrField};
///
/// let now = Now::new(EmptyHostSystem);
/// let date = now.date().unwrap();
/// assert_eq!(date.precision_field(), OpenEhrField::Days);
/// assert_eq!(date.to_string(), "1970-01-01");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Now<H: HostHooks> {
    host_hooks: H,
}

impl<H: HostHooks> Now<H> {
    pub fn new(host_hooks: H) -> Self {
        Self { host_hooks }
    }

    /// Returns the current instant.
    pub fn epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        self.host_hooks.get_system_epoch_nanoseconds()
    }

    /// Returns the offset the host currently observes.
    pub fn offset(&self) -> TemporalResult<UtcOffset> {
        let epoch_nanoseconds = self.epoch_nanoseconds()?;
        self.host_hooks.get_system_offset(epoch_nanoseconds)
    }

    pub fn date(&self) -> TemporalResult<OpenEhrDate> {
        OpenEhrDate::now_with_host(&self.host_hooks)
    }

    pub fn time(&self) -> TemporalResult<OpenEhrTime> {
        OpenEhrTime::now_with_host(&self.host_hooks)
    }

    pub fn date_time(&self) -> TemporalResult<OpenEhrDateTime> {
        OpenEhrDateTime::now_with_host(&self.host_hooks)
    }

    pub fn offset_date_time(&self) -> TemporalResult<OpenEhrOffsetDateTime> {
        OpenEhrOffsetDateTime::now_with_host(&self.host_hooks)
    }

    pub fn offset_time(&self) -> TemporalResult<OpenEhrOffsetTime> {
        OpenEhrOffsetTime::now_with_host(&self.host_hooks)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::format;
    use super::Now;
    use crate::{
        fields::OpenEhrField, host::FixedHost, time::EpochNanoseconds, UtcOffset,
    };
    use writeable::assert_writeable_eq;

    #[test]
    fn every_kind_reads_the_same_clock() {
        // 2021-08-06T04:03:02.5Z observed at -03:00.
        let host = FixedHost::new(
            EpochNanoseconds::try_from(1_628_222_582_500_000_000i128).unwrap(),
            UtcOffset::from_seconds(-10_800).unwrap(),
        )
        .unwrap();
        let now = Now::new(host);
        assert_eq!(now.offset().unwrap().seconds(), -10_800);
        assert_writeable_eq!(now.date().unwrap(), "2021-08-06");
        assert_writeable_eq!(now.time().unwrap(), "01:03:02:500000000");
        assert_writeable_eq!(now.date_time().unwrap(), "2021-08-06T01:03:02:500000000");
        assert_writeable_eq!(
            now.offset_date_time().unwrap(),
            "2021-08-06T01:03:02:500000000-03:00"
        );
        assert_writeable_eq!(now.offset_time().unwrap(), "01:03:02:500000000-03:00");
        assert_eq!(now.time().unwrap().precision_field(), OpenEhrField::Nanos);
    }

    #[cfg(feature = "sys")]
    #[test]
    fn system_clock() {
        let now = Now::new(crate::sys::SystemHost);
        let before = now.epoch_nanoseconds().unwrap();
        let date_time = now.offset_date_time().unwrap();
        assert!(date_time.exact().epoch_nanoseconds() >= before.as_i128());
    }
}
