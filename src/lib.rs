/*!
Timefield is a calendar/clock field arithmetic engine.

It answers questions of the form "what is the month of this instant," "set
the day-of-month of this instant to 5," "add 20 months to this partial date"
and "round this instant down to the start of its hour", while honoring the
rules that bind calendar fields together. Months overflow into years. The
day-of-month is bounded by the length of the month currently in effect. A
field set that shortens the month clamps the day instead of producing an
invalid date.

The crate is built around three small abstractions:

* An [`Instant`]: a count of elapsed milliseconds since the Unix epoch.
* A [`DateTimeField`]: a stateless computation for one field (year, month,
  hour, ...). Implementations provide a handful of mandatory operations and
  inherit the entire shared engine as default methods: cascading addition,
  wrap-on-overflow, set-with-clamping and the rounding family.
* A [`Partial`]: an ordered, most-significant-first list of fields paired
  with a caller-owned buffer of values, representing a date/time with some
  fields intentionally omitted (a time of day, a year-month-day, ...).

A complete Gregorian field set lives in the [`civil`] module and is what
most callers will use, but nothing in the engine is specific to it: any
calendar that can express its fields as [`DateTimeField`] implementations
gets the same arithmetic for free.

# Example

```
use timefield::civil::{self, TimeOfDay};
use timefield::DateTimeField;

// 10:20:30.000, as a partial value buffer.
let mut values = [10, 20, 30, 0];
// Add 45 minutes. Minutes overflow into hours.
civil::MINUTE_OF_HOUR.add_partial(&TimeOfDay, 1, &mut values, 45)?;
assert_eq!(values, [11, 5, 30, 0]);

// Add 16 hours with wrap-at-top: the partial is a ring, so this
// wraps past midnight instead of failing.
civil::HOUR_OF_DAY.add_wrap_partial(&TimeOfDay, 0, &mut values, 16)?;
assert_eq!(values, [3, 5, 30, 0]);
# Ok::<(), timefield::Error>(())
```

# Crate features

* **std** (enabled by default) - Implements `std::error::Error` for
  [`Error`]. Disable for `no_std` use; the crate always requires `alloc`.
* **logging** - Emits trace-level events from the cascade engine via the
  [`log`](https://docs.rs/log) crate.
* **serde** - Serializes an [`Instant`] as its raw millisecond count.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub use crate::{
    duration::{DurationField, DurationUnit, PreciseDurationField},
    error::Error,
    field::{DateTimeField, FieldType, TextProvider},
    instant::Instant,
    partial::{FieldPartial, Partial},
};

#[macro_use]
mod logging;

pub mod civil;
mod duration;
mod error;
mod field;
mod instant;
mod partial;
