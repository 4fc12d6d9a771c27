//! The `TemporalQuery` trait.

use crate::{fields::OpenEhrField, TemporalResult};

use super::{FormatterContext, TemporalAccessor};

/// A strategy that extracts an `R` from an external temporal at a given
/// precision.
///
/// Every function with the shape of a `from_temporal` factory is a query.
pub trait TemporalQuery<R> {
    fn query_from(
        &self,
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<R>;
}

impl<R, F> TemporalQuery<R> for F
where
    F: Fn(&TemporalAccessor, OpenEhrField, &FormatterContext) -> TemporalResult<R>,
{
    fn query_from(
        &self,
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<R> {
        self(accessor, precision, context)
    }
}
