use crate::{error::ErrorMessage, TemporalError, NS_PER_SECOND};

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EpochNanoseconds(pub(crate) i128);

impl EpochNanoseconds {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(i128::from(seconds) * i128::from(NS_PER_SECOND))
    }

    pub fn as_i128(&self) -> i128 {
        self.0
    }

    pub fn check_validity(&self) -> Result<(), TemporalError> {
        if !is_valid_epoch_nanos(&self.0) {
            return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
        }
        Ok(())
    }
}

impl TryFrom<i128> for EpochNanoseconds {
    type Error = TemporalError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        let nanos = Self(value);
        nanos.check_validity()?;
        Ok(nanos)
    }
}

/// Utility for determining if the nanos are within a valid range.
#[inline]
#[must_use]
pub(crate) fn is_valid_epoch_nanos(nanos: &i128) -> bool {
    (crate::NS_MIN_INSTANT..=crate::NS_MAX_INSTANT).contains(nanos)
}
