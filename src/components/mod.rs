//! The partial-precision temporal values provided by `openehr_temporal`.
//!
//! Every kind is an [`OpenEhrTemporal`] wrapping one exact ISO record, and
//! [`AnyOpenEhrTemporal`] closes over the five kinds.

mod any;
mod context;
mod date;
mod datetime;
mod now;
mod offset;
mod offset_datetime;
mod offset_time;
mod partial;
mod query;
mod time;

#[doc(inline)]
pub use any::{AnyOpenEhrTemporal, ExactOrPartial, TemporalAccessor};
#[doc(inline)]
pub use context::FormatterContext;
#[doc(inline)]
pub use date::OpenEhrDate;
#[doc(inline)]
pub use datetime::OpenEhrDateTime;
#[doc(inline)]
pub use now::Now;
#[doc(inline)]
pub use offset::UtcOffset;
#[doc(inline)]
pub use offset_datetime::OpenEhrOffsetDateTime;
#[doc(inline)]
pub use offset_time::OpenEhrOffsetTime;
#[doc(inline)]
pub use partial::{ExactTemporal, OpenEhrTemporal, TemporalKind};
#[doc(inline)]
pub use query::TemporalQuery;
#[doc(inline)]
pub use time::OpenEhrTime;
