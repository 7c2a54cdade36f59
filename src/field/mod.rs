/*!
The field abstraction and the shared arithmetic engine.

A [`DateTimeField`] is a stateless computation bound to exactly one
[`FieldType`]. Implementations supply a small set of mandatory operations
(get, the raw setter, the duration and range-duration fields, static
bounds, round-floor) and inherit everything else as default methods:
cascading addition across a partial, wrap-on-overflow, set with
subordinate clamping, the rounding family, difference and the text hooks.
Defaults may be overridden for efficiency but not for correctness.
*/

use alloc::{format, string::String, vec::Vec};

use crate::{
    duration::DurationField,
    error::Error,
    field::bounds::{verify_value_bounds, wrapped_value},
    instant::Instant,
    partial::Partial,
};

pub(crate) mod bounds;

/// An opaque, immutable identifier for a semantic field kind.
///
/// A `FieldType` has a name and equality, and no behavior. Two field types
/// compare equal when their names do. Field types are expected to be
/// process-wide constants, defined once by a calendar module; the standard
/// Gregorian descriptors live in [`civil::types`](crate::civil::types).
#[derive(Debug)]
pub struct FieldType {
    name: &'static str,
}

impl FieldType {
    /// Creates a new field type descriptor with the given name.
    #[inline]
    pub const fn new(name: &'static str) -> FieldType {
        FieldType { name }
    }

    /// Returns the name of this field type, e.g. `"day_of_month"`.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl Eq for FieldType {}

impl PartialEq for FieldType {
    fn eq(&self, other: &FieldType) -> bool {
        self.name == other.name
    }
}

impl core::fmt::Display for FieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name)
    }
}

/// A pluggable source of localized field symbols.
///
/// The engine's own text handling is a single default: decimal rendering
/// and base-10 parsing. A provider can be plugged into the `*_with` text
/// operations to supply calendar-aware names ("January", "Tue", ...).
/// Returning `None` from any method falls back to the decimal default.
pub trait TextProvider {
    /// Renders a symbol for the given field value, or `None` to fall back
    /// to the decimal rendering.
    fn text(
        &self,
        field: &FieldType,
        value: i64,
        locale: &str,
    ) -> Option<String>;

    /// Renders an abbreviated symbol for the given field value.
    ///
    /// Defaults to the long form.
    fn short_text(
        &self,
        field: &FieldType,
        value: i64,
        locale: &str,
    ) -> Option<String> {
        self.text(field, value, locale)
    }

    /// Parses a symbol back to a field value, or `None` to fall back to
    /// base-10 parsing.
    fn parse(
        &self,
        field: &FieldType,
        text: &str,
        locale: &str,
    ) -> Option<i64>;
}

/// A stateless computation for one calendar/clock field.
///
/// Implementations are pure functions of their explicit inputs, hold no
/// per-call mutable state and are safe for unrestricted concurrent use.
/// They are typically defined once as `static` items and shared for the
/// process lifetime.
///
/// # Mandatory operations
///
/// `field_type`, `get`, `set_instant`, `duration_field`,
/// `range_duration_field`, `minimum_value`, `maximum_value` and
/// `round_floor`. Everything else has a default built from these.
///
/// # Partial operations and the values buffer
///
/// The partial-value operations (`add_partial`, `add_wrap_partial`,
/// `set_partial`, ...) take a `&dyn Partial` describing the field list, the
/// index of this field within it, and a caller-owned values buffer parallel
/// to the field list. The buffer is mutated in place. These operations are
/// all-or-nothing: when one returns an error, the buffer is exactly as it
/// was before the call.
pub trait DateTimeField {
    /// Returns the type of this field.
    fn field_type(&self) -> &'static FieldType;

    /// Gets the value of this field from an instant.
    fn get(&self, instant: Instant) -> i64;

    /// Sets this field in an instant to a value already known to be in
    /// bounds.
    ///
    /// This is the field-specific half of [`set`](DateTimeField::set),
    /// which validates and then delegates here. If the new value makes a
    /// less-significant field invalid, as with the 31st of January moving
    /// to February, the implementation clamps that field to its nearest
    /// valid bound.
    ///
    /// # Errors
    ///
    /// When the resulting instant would be outside the representable
    /// range.
    fn set_instant(
        &self,
        instant: Instant,
        value: i64,
    ) -> Result<Instant, Error>;

    /// Returns the duration field for one unit of this field. For an
    /// hour-of-day field, this is the hours duration.
    fn duration_field(&self) -> &dyn DurationField;

    /// Returns the duration of the enclosing unit that bounds this
    /// field's cycle, or `None` when nothing encloses it. For an
    /// hour-of-day field this is the days duration; for a year field it
    /// is `None`.
    ///
    /// Cascading addition uses this to check that a field's overflow may
    /// be handed to its more-significant neighbor: the neighbor's own
    /// duration must equal this field's range duration.
    fn range_duration_field(&self) -> Option<&dyn DurationField>;

    /// Returns the minimum value this field can take, ignoring context.
    fn minimum_value(&self) -> i64;

    /// Returns the maximum value this field can take, ignoring context.
    fn maximum_value(&self) -> i64;

    /// Rounds an instant down to the start of this field's unit.
    ///
    /// The value of this field and of all more-significant fields is
    /// retained; everything below is set to its minimum. Rounding
    /// `2002-11-02T23:34:56.789` to the hour gives
    /// `2002-11-02T23:00:00.000`.
    fn round_floor(&self, instant: Instant) -> Instant;

    /// Returns the name of this field's type.
    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    /// Returns the minimum value for this field in the context of the
    /// given instant. Defaults to the context-free minimum.
    fn minimum_value_at(&self, _instant: Instant) -> i64 {
        self.minimum_value()
    }

    /// Returns the maximum value for this field in the context of the
    /// given instant. Defaults to the context-free maximum.
    fn maximum_value_at(&self, _instant: Instant) -> i64 {
        self.maximum_value()
    }

    /// Returns the minimum value for this field in the context of the
    /// given partial and its current values. Defaults to the context-free
    /// minimum.
    fn minimum_value_in(
        &self,
        _partial: &dyn Partial,
        _values: &[i64],
    ) -> i64 {
        self.minimum_value()
    }

    /// Returns the maximum value for this field in the context of the
    /// given partial and its current values. Defaults to the context-free
    /// maximum.
    ///
    /// This is where calendar coupling between fields lives: a
    /// day-of-month field reports 28, 29, 30 or 31 depending on the month
    /// and year values currently in the buffer.
    fn maximum_value_in(
        &self,
        _partial: &dyn Partial,
        _values: &[i64],
    ) -> i64 {
        self.maximum_value()
    }

    /// Sets this field in an instant, validating the value first.
    ///
    /// Less-significant fields invalidated by the change are clamped to
    /// their nearest valid bound, never reset to an arbitrary value.
    ///
    /// # Errors
    ///
    /// A bounds error when `value` is outside this field's
    /// `[minimum, maximum]` at the given instant.
    fn set(&self, instant: Instant, value: i64) -> Result<Instant, Error> {
        verify_value_bounds(
            self.field_type(),
            value,
            self.minimum_value_at(instant),
            self.maximum_value_at(instant),
        )?;
        self.set_instant(instant, value)
    }

    /// Adds a value (which may be negative) to this field of an instant,
    /// overflowing into larger fields as necessary.
    ///
    /// An absolute instant already encodes all larger units continuously,
    /// so this simply delegates to the duration field; no cascading is
    /// needed. Smaller fields are unaffected except where the result
    /// would make them invalid, in which case they are clamped:
    /// `2001-01-31` plus one month is `2001-02-28`.
    ///
    /// # Errors
    ///
    /// When the result is outside the representable instant range.
    fn add(&self, instant: Instant, value: i64) -> Result<Instant, Error> {
        self.duration_field().add(instant, value)
    }

    /// Adds a value (which may be negative) to this field of a partial,
    /// failing if the overflow cannot be absorbed.
    ///
    /// The value is added to the field at `index`. Overflow cascades into
    /// the more-significant neighbor, one unit at a time. Smaller fields
    /// are unaffected except where the result would make them invalid, in
    /// which case they are clamped.
    ///
    /// A partial only contains some fields, so it has a maximum possible
    /// value; a time of day tops out at `23:59:59.999`. When the add
    /// breaches that limit, this operation fails; use
    /// [`add_wrap_partial`](DateTimeField::add_wrap_partial) to wrap
    /// around instead.
    ///
    /// For example, on a year-month-day partial:
    /// `2000-08-20` add 6 months is `2001-02-20`,
    /// add 20 months is `2002-04-20`,
    /// add -9 months is `1999-11-20`, and
    /// `2001-01-31` add 1 month is `2001-02-28`.
    ///
    /// # Errors
    ///
    /// An overflow error when the most-significant field cannot absorb
    /// the remainder; an incompatible-fields error when adjacent fields'
    /// durations do not line up; a construction error when `index`,
    /// `values` and `partial` are inconsistent. On any error the buffer
    /// is unchanged.
    fn add_partial(
        &self,
        partial: &dyn Partial,
        index: usize,
        values: &mut [i64],
        value: i64,
    ) -> Result<(), Error> {
        check_partial_shape(self.field_type(), partial, index, values)?;
        if value == 0 {
            return Ok(());
        }
        let mut staged: Vec<i64> = values.to_vec();
        cascade(partial.field(index), partial, index, &mut staged, value, false)?;
        values.copy_from_slice(&staged);
        Ok(())
    }

    /// Adds a value (which may be negative) to this field of a partial,
    /// wrapping the whole partial when its maximum is breached.
    ///
    /// Identical to [`add_partial`](DateTimeField::add_partial), except
    /// that overflow reaching the most-significant field wraps around to
    /// that field's minimum (or maximum, for negative adds) and keeps
    /// consuming the remainder; the partial is treated as a bounded
    /// ring. This is the operation to use for cyclic values like a time
    /// of day:
    /// `10:20:30` add 20 minutes is `10:40:30`,
    /// add 45 minutes is `11:05:30`, and
    /// add 16 hours is `02:20:30`.
    ///
    /// # Errors
    ///
    /// An incompatible-fields error or construction error, as for
    /// `add_partial`. Wrapping itself never fails. On any error the
    /// buffer is unchanged.
    fn add_wrap_partial(
        &self,
        partial: &dyn Partial,
        index: usize,
        values: &mut [i64],
        value: i64,
    ) -> Result<(), Error> {
        check_partial_shape(self.field_type(), partial, index, values)?;
        if value == 0 {
            return Ok(());
        }
        let mut staged: Vec<i64> = values.to_vec();
        cascade(partial.field(index), partial, index, &mut staged, value, true)?;
        values.copy_from_slice(&staged);
        Ok(())
    }

    /// Adds a value (which may be negative) to this field of an instant,
    /// wrapping within this field.
    ///
    /// Larger fields are always unaffected; the value wraps inside this
    /// field's own `[minimum, maximum]`. Smaller fields are unaffected
    /// except where the result would make them invalid, in which case
    /// they are clamped. `2000-08-20` with six months added to the month
    /// by wrapping is `2000-02-20`.
    ///
    /// # Errors
    ///
    /// When the resulting instant would be outside the representable
    /// range.
    fn add_wrap_field(
        &self,
        instant: Instant,
        value: i64,
    ) -> Result<Instant, Error> {
        let current = self.get(instant);
        let wrapped = wrapped_value(
            current,
            value,
            self.minimum_value_at(instant),
            self.maximum_value_at(instant),
        )?;
        self.set(instant, wrapped)
    }

    /// Adds a value (which may be negative) to this field of a partial,
    /// wrapping within this field.
    ///
    /// The partial-buffer form of
    /// [`add_wrap_field`](DateTimeField::add_wrap_field): no neighboring
    /// field is ever touched, but less-significant fields invalidated by
    /// the new value are clamped.
    ///
    /// # Errors
    ///
    /// A construction error when `index`, `values` and `partial` are
    /// inconsistent. On any error the buffer is unchanged.
    fn add_wrap_field_partial(
        &self,
        partial: &dyn Partial,
        index: usize,
        values: &mut [i64],
        value: i64,
    ) -> Result<(), Error> {
        check_partial_shape(self.field_type(), partial, index, values)?;
        let wrapped = wrapped_value(
            values[index],
            value,
            self.minimum_value_in(partial, values),
            self.maximum_value_in(partial, values),
        )?;
        set_in_partial(partial.field(index), partial, index, values, wrapped)
    }

    /// Sets this field of a partial to a new value.
    ///
    /// The value is validated against this field's context-dependent
    /// bounds, written, and then every field of lesser significance is
    /// clamped into its own, now possibly different, bounds. This is
    /// how a day-of-month self-corrects after a month change.
    ///
    /// # Errors
    ///
    /// A bounds error when `new_value` is out of range, or a construction
    /// error when `index`, `values` and `partial` are inconsistent. On
    /// any error the buffer is unchanged.
    fn set_partial(
        &self,
        partial: &dyn Partial,
        index: usize,
        values: &mut [i64],
        new_value: i64,
    ) -> Result<(), Error> {
        check_partial_shape(self.field_type(), partial, index, values)?;
        set_in_partial(partial.field(index), partial, index, values, new_value)
    }

    /// Computes the difference between two instants in units of this
    /// field, as `minuend - subtrahend`, dropping fractional units.
    ///
    /// This reverses [`add`](DateTimeField::add): when
    /// `field.add(instant, v)` succeeds without clamping,
    /// `field.difference(field.add(instant, v)?, instant) == v`.
    fn difference(&self, minuend: Instant, subtrahend: Instant) -> i64 {
        self.duration_field().difference(minuend, subtrahend)
    }

    /// Rounds an instant up to the start of the next unit of this field,
    /// or returns it unchanged when it is already on a unit boundary.
    ///
    /// # Errors
    ///
    /// When the rounded instant would be outside the representable range.
    fn round_ceiling(&self, instant: Instant) -> Result<Instant, Error> {
        let floored = self.round_floor(instant);
        if floored != instant {
            self.add(floored, 1)
        } else {
            Ok(instant)
        }
    }

    /// Rounds an instant to the nearest unit boundary of this field,
    /// choosing the floor on an exact tie.
    ///
    /// # Errors
    ///
    /// When computing the ceiling leaves the representable range.
    fn round_half_floor(&self, instant: Instant) -> Result<Instant, Error> {
        let floor = self.round_floor(instant);
        let ceiling = self.round_ceiling(instant)?;
        if instant.since_millis(floor) <= ceiling.since_millis(instant) {
            Ok(floor)
        } else {
            Ok(ceiling)
        }
    }

    /// Rounds an instant to the nearest unit boundary of this field,
    /// choosing the ceiling on an exact tie.
    ///
    /// # Errors
    ///
    /// When computing the ceiling leaves the representable range.
    fn round_half_ceiling(
        &self,
        instant: Instant,
    ) -> Result<Instant, Error> {
        let floor = self.round_floor(instant);
        let ceiling = self.round_ceiling(instant)?;
        if ceiling.since_millis(instant) <= instant.since_millis(floor) {
            Ok(ceiling)
        } else {
            Ok(floor)
        }
    }

    /// Rounds an instant to the nearest unit boundary of this field. On
    /// an exact tie, the boundary that makes this field's value even is
    /// chosen; if both sides are even, the ceiling wins.
    ///
    /// # Errors
    ///
    /// When computing the ceiling leaves the representable range.
    fn round_half_even(&self, instant: Instant) -> Result<Instant, Error> {
        let floor = self.round_floor(instant);
        let ceiling = self.round_ceiling(instant)?;
        let from_floor = instant.since_millis(floor);
        let to_ceiling = ceiling.since_millis(instant);
        if from_floor < to_ceiling {
            Ok(floor)
        } else if to_ceiling < from_floor {
            Ok(ceiling)
        } else if self.get(ceiling) & 1 == 0 {
            Ok(ceiling)
        } else {
            Ok(floor)
        }
    }

    /// Returns the fractional milliseconds of this field: the duration
    /// that [`round_floor`](DateTimeField::round_floor) would subtract.
    fn remainder(&self, instant: Instant) -> i64 {
        instant.since_millis(self.round_floor(instant))
    }

    /// Returns whether this field is "leap" at the given instant; for
    /// example, a year field in a leap year. Defaults to false.
    fn is_leap(&self, _instant: Instant) -> bool {
        false
    }

    /// Returns the amount by which this field is "leap" at the given
    /// instant: one in a leap year, zero otherwise. Defaults to zero.
    fn leap_amount(&self, _instant: Instant) -> i64 {
        0
    }

    /// Returns the duration in which this field leaps, or `None` when it
    /// never does. Defaults to `None`.
    fn leap_duration_field(&self) -> Option<&dyn DurationField> {
        None
    }

    /// Renders a field value as text: the decimal numeral by default.
    fn as_text(&self, value: i64) -> String {
        format!("{value}")
    }

    /// Renders a field value as abbreviated text. Defaults to the long
    /// form.
    fn as_short_text(&self, value: i64) -> String {
        self.as_text(value)
    }

    /// Renders a field value as text through a symbol provider, falling
    /// back to the decimal numeral when the provider has no symbol.
    fn as_text_with(
        &self,
        value: i64,
        locale: &str,
        provider: &dyn TextProvider,
    ) -> String {
        provider
            .text(self.field_type(), value, locale)
            .unwrap_or_else(|| self.as_text(value))
    }

    /// Renders a field value as abbreviated text through a symbol
    /// provider, falling back to the decimal numeral.
    fn as_short_text_with(
        &self,
        value: i64,
        locale: &str,
        provider: &dyn TextProvider,
    ) -> String {
        provider
            .short_text(self.field_type(), value, locale)
            .unwrap_or_else(|| self.as_short_text(value))
    }

    /// Renders this field's value at the given instant as text.
    fn get_as_text(&self, instant: Instant) -> String {
        self.as_text(self.get(instant))
    }

    /// Renders this field's value at the given instant as abbreviated
    /// text.
    fn get_as_short_text(&self, instant: Instant) -> String {
        self.as_short_text(self.get(instant))
    }

    /// Converts text to a field value: base-10 parsing by default.
    ///
    /// # Errors
    ///
    /// A text-conversion error naming this field and the offending text.
    fn convert_text(&self, text: &str) -> Result<i64, Error> {
        text.parse::<i64>()
            .map_err(|_| Error::text_conversion(self.name(), text))
    }

    /// Converts text to a field value through a parsing provider, falling
    /// back to base-10 parsing when the provider does not recognize it.
    ///
    /// # Errors
    ///
    /// A text-conversion error when neither the provider nor base-10
    /// parsing accepts the text.
    fn convert_text_with(
        &self,
        text: &str,
        locale: &str,
        provider: &dyn TextProvider,
    ) -> Result<i64, Error> {
        match provider.parse(self.field_type(), text, locale) {
            Some(value) => Ok(value),
            None => self.convert_text(text),
        }
    }

    /// Sets this field in an instant from text.
    ///
    /// # Errors
    ///
    /// A text-conversion error for unparseable text, or any error
    /// [`set`](DateTimeField::set) can return.
    fn set_text(
        &self,
        instant: Instant,
        text: &str,
    ) -> Result<Instant, Error> {
        let value = self.convert_text(text)?;
        self.set(instant, value)
    }

    /// Sets this field of a partial from text.
    ///
    /// # Errors
    ///
    /// A text-conversion error for unparseable text, or any error
    /// [`set_partial`](DateTimeField::set_partial) can return. On any
    /// error the buffer is unchanged.
    fn set_text_partial(
        &self,
        partial: &dyn Partial,
        index: usize,
        values: &mut [i64],
        text: &str,
    ) -> Result<(), Error> {
        let value = self.convert_text(text)?;
        self.set_partial(partial, index, values, value)
    }

    /// Returns the maximum number of characters the default text
    /// rendering of this field can produce.
    fn maximum_text_length(&self) -> usize {
        let max = self.maximum_value();
        if max >= 0 {
            if max < 10 {
                1
            } else if max < 100 {
                2
            } else if max < 1000 {
                3
            } else {
                decimal_length(max)
            }
        } else {
            decimal_length(max).max(decimal_length(self.minimum_value()))
        }
    }

    /// Returns the maximum number of characters the abbreviated text
    /// rendering of this field can produce. Defaults to the long form's
    /// length.
    fn maximum_short_text_length(&self) -> usize {
        self.maximum_text_length()
    }
}

impl core::fmt::Debug for dyn DateTimeField + '_ {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "DateTimeField[{}]", self.name())
    }
}

/// Returns the number of characters in the decimal rendering of `value`,
/// including a leading minus sign.
fn decimal_length(value: i64) -> usize {
    let mut len = if value < 0 { 1 } else { 0 };
    let mut magnitude = value.unsigned_abs();
    loop {
        len += 1;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }
    len
}

/// Verifies that a partial, a field index and a values buffer are mutually
/// consistent, and that the field at `index` has the expected type.
fn check_partial_shape(
    expected: &FieldType,
    partial: &dyn Partial,
    index: usize,
    values: &[i64],
) -> Result<(), Error> {
    if partial.size() == 0 {
        return Err(Error::construction("partial has no fields"));
    }
    if index >= partial.size() {
        return Err(Error::construction(
            "field index is out of range for the partial",
        ));
    }
    if values.len() != partial.size() {
        return Err(Error::construction(
            "values buffer length does not match the partial's field count",
        ));
    }
    if partial.field(index).field_type() != expected {
        return Err(Error::construction(
            "field at the given index differs from the field operated on",
        ));
    }
    Ok(())
}

/// Verifies that `field`'s overflow may be handed to `neighbor`: the
/// neighbor's own duration must equal this field's range duration.
fn check_cascade_compatible(
    field: &dyn DateTimeField,
    neighbor: &dyn DateTimeField,
) -> Result<(), Error> {
    let neighbor_unit = neighbor.duration_field().unit();
    match field.range_duration_field() {
        Some(range) if range.unit() == neighbor_unit => Ok(()),
        Some(range) => Err(Error::incompatible_fields(
            field.name(),
            range.unit().name(),
            neighbor_unit.name(),
        )),
        None => Err(Error::incompatible_fields(
            field.name(),
            "none",
            neighbor_unit.name(),
        )),
    }
}

/// The cascading add shared by the strict and wrap-at-top operations.
///
/// Works directly on `values`; callers that promise all-or-nothing
/// behavior hand in a scratch copy and commit it on success.
///
/// There are more efficient algorithms than this, especially for
/// time-only fields. The trouble is days and months, whose bounds shift
/// underfoot, so overflow moves one unit of the more-significant field at
/// a time and re-reads the bounds after every carry.
fn cascade(
    field: &dyn DateTimeField,
    partial: &dyn Partial,
    index: usize,
    values: &mut [i64],
    mut value_to_add: i64,
    wrap_at_top: bool,
) -> Result<(), Error> {
    if value_to_add == 0 {
        return Ok(());
    }
    let mut checked_neighbor = false;
    while value_to_add > 0 {
        let max = field.maximum_value_in(partial, values);
        let proposed = i128::from(values[index]) + i128::from(value_to_add);
        if proposed <= i128::from(max) {
            values[index] = proposed as i64;
            break;
        }
        if index == 0 {
            if !wrap_at_top {
                return Err(Error::overflow(field.name()));
            }
            // The most-significant field's bounds cannot shift while
            // only it changes, so it wraps in one modular step.
            let min = field.minimum_value_in(partial, values);
            values[index] =
                wrapped_value(values[index], value_to_add, min, max)?;
            break;
        }
        let neighbor = partial.field(index - 1);
        if !checked_neighbor {
            check_cascade_compatible(field, neighbor)?;
            checked_neighbor = true;
        }
        trace!(
            "field '{}' exceeded its maximum of {max}, carrying into '{}'",
            field.name(),
            neighbor.name(),
        );
        value_to_add -= (max + 1) - values[index];
        cascade(neighbor, partial, index - 1, values, 1, wrap_at_top)?;
        values[index] = field.minimum_value_in(partial, values);
    }
    while value_to_add < 0 {
        let min = field.minimum_value_in(partial, values);
        let proposed = i128::from(values[index]) + i128::from(value_to_add);
        if proposed >= i128::from(min) {
            values[index] = proposed as i64;
            break;
        }
        if index == 0 {
            if !wrap_at_top {
                return Err(Error::overflow(field.name()));
            }
            let max = field.maximum_value_in(partial, values);
            values[index] =
                wrapped_value(values[index], value_to_add, min, max)?;
            break;
        }
        let neighbor = partial.field(index - 1);
        if !checked_neighbor {
            check_cascade_compatible(field, neighbor)?;
            checked_neighbor = true;
        }
        trace!(
            "field '{}' fell below its minimum of {min}, borrowing from '{}'",
            field.name(),
            neighbor.name(),
        );
        value_to_add -= (min - 1) - values[index];
        cascade(neighbor, partial, index - 1, values, -1, wrap_at_top)?;
        values[index] = field.maximum_value_in(partial, values);
    }
    // The converged value is in bounds, but the carry may have shifted
    // the bounds of everything below us. Set clamps those.
    set_in_partial(field, partial, index, values, values[index])
}

/// Writes `new_value` into `values[index]` after validating it, then
/// clamps every less-significant field into its own bounds.
fn set_in_partial(
    field: &dyn DateTimeField,
    partial: &dyn Partial,
    index: usize,
    values: &mut [i64],
    new_value: i64,
) -> Result<(), Error> {
    verify_value_bounds(
        field.field_type(),
        new_value,
        field.minimum_value_in(partial, values),
        field.maximum_value_in(partial, values),
    )?;
    values[index] = new_value;
    for i in index + 1..partial.size() {
        let subordinate = partial.field(i);
        let max = subordinate.maximum_value_in(partial, values);
        if values[i] > max {
            values[i] = max;
        }
        let min = subordinate.minimum_value_in(partial, values);
        if values[i] < min {
            values[i] = min;
        }
    }
    Ok(())
}
