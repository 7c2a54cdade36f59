use crate::{error::Error, instant::Instant};

/// An identifier for a unit of elapsed time.
///
/// A `DurationUnit` is an opaque, immutable descriptor with a name and
/// equality, and nothing else. Units compare equal when their names do.
/// The engine uses unit equality for exactly one thing: deciding whether
/// two adjacent fields in a partial are cascade-compatible, by comparing
/// one field's range unit with its neighbor's own unit.
///
/// The standard Gregorian units are defined in [`civil::units`].
///
/// [`civil::units`]: crate::civil::units
#[derive(Debug)]
pub struct DurationUnit {
    name: &'static str,
}

impl DurationUnit {
    /// Creates a new unit descriptor with the given name.
    ///
    /// Descriptors are expected to be process-wide constants; typically
    /// `static` items that calendar modules define once.
    #[inline]
    pub const fn new(name: &'static str) -> DurationUnit {
        DurationUnit { name }
    }

    /// Returns the name of this unit, e.g. `"months"`.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl Eq for DurationUnit {}

impl PartialEq for DurationUnit {
    fn eq(&self, other: &DurationUnit) -> bool {
        self.name == other.name
    }
}

impl core::fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name)
    }
}

/// A unit of elapsed time that knows how to move instants.
///
/// A `DurationField` can add a count of its units to an instant and
/// measure the difference between two instants in its units. The two
/// operations are inverses: for any instant `i` and count `v` for which
/// `add` succeeds without clamping,
/// `field.difference(field.add(i, v)?, i) == v`.
///
/// Implementations must be stateless and immutable; a `&'static` reference
/// to a duration field may be shared freely across threads.
///
/// Precise units (an hour is always 3,600,000 milliseconds) report
/// [`is_precise`](DurationField::is_precise) and expose their
/// [`unit_millis`](DurationField::unit_millis). Imprecise units (a month's
/// length depends on where you are in the calendar) implement `add` and
/// `difference` against the calendar directly.
pub trait DurationField {
    /// Returns the unit descriptor for this duration field.
    ///
    /// Cascade-compatibility checks compare these for equality.
    fn unit(&self) -> &'static DurationUnit;

    /// Returns true when every unit of this field spans the same number of
    /// milliseconds.
    fn is_precise(&self) -> bool;

    /// Returns the length of one unit in milliseconds.
    ///
    /// For imprecise fields this is an average or nominal length and must
    /// not be used for exact arithmetic.
    fn unit_millis(&self) -> i64;

    /// Adds `count` units to the given instant.
    ///
    /// # Errors
    ///
    /// This returns an error when the result is outside the representable
    /// instant range.
    fn add(&self, instant: Instant, count: i64) -> Result<Instant, Error>;

    /// Returns the number of whole units between the two instants, as
    /// `minuend - subtrahend`. Fractional units are dropped, truncating
    /// toward zero.
    fn difference(&self, minuend: Instant, subtrahend: Instant) -> i64;

    /// Returns the name of this duration field's unit.
    fn name(&self) -> &'static str {
        self.unit().name()
    }
}

impl core::fmt::Debug for dyn DurationField + '_ {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "DurationField[{}]", self.name())
    }
}

/// A duration field whose unit always spans a fixed number of milliseconds.
///
/// This covers everything from milliseconds up through days (this crate
/// treats a day as precisely 86,400,000 milliseconds, since it has no
/// notion of time zones). Addition is a checked multiply-and-add and the
/// difference is a truncating division, so the round-trip law holds
/// exactly.
#[derive(Debug)]
pub struct PreciseDurationField {
    unit: &'static DurationUnit,
    unit_millis: i64,
}

impl PreciseDurationField {
    /// Creates a new precise duration field.
    ///
    /// # Panics
    ///
    /// When `unit_millis` is not positive. (`const` evaluation turns this
    /// into a compile error for the `static` definitions this constructor
    /// is intended for.)
    #[inline]
    pub const fn new(
        unit: &'static DurationUnit,
        unit_millis: i64,
    ) -> PreciseDurationField {
        assert!(unit_millis > 0, "unit length must be positive");
        PreciseDurationField { unit, unit_millis }
    }
}

impl DurationField for PreciseDurationField {
    #[inline]
    fn unit(&self) -> &'static DurationUnit {
        self.unit
    }

    #[inline]
    fn is_precise(&self) -> bool {
        true
    }

    #[inline]
    fn unit_millis(&self) -> i64 {
        self.unit_millis
    }

    fn add(&self, instant: Instant, count: i64) -> Result<Instant, Error> {
        let Some(millis) = count.checked_mul(self.unit_millis) else {
            return Err(Error::range(
                self.name(),
                count,
                i64::MIN / self.unit_millis,
                i64::MAX / self.unit_millis,
            ));
        };
        instant.checked_add_millis(millis)
    }

    fn difference(&self, minuend: Instant, subtrahend: Instant) -> i64 {
        minuend.since_millis(subtrahend) / self.unit_millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TICKS: DurationUnit = DurationUnit::new("ticks");
    static TOCKS: DurationUnit = DurationUnit::new("ticks");
    static OTHER: DurationUnit = DurationUnit::new("other");

    static TICK_FIELD: PreciseDurationField =
        PreciseDurationField::new(&TICKS, 250);

    #[test]
    fn unit_equality_is_by_name() {
        assert_eq!(TICKS, TOCKS);
        assert_ne!(TICKS, OTHER);
    }

    #[test]
    fn precise_add() {
        let i = Instant::from_millis(1_000);
        assert_eq!(
            TICK_FIELD.add(i, 4).unwrap(),
            Instant::from_millis(2_000)
        );
        assert_eq!(
            TICK_FIELD.add(i, -8).unwrap(),
            Instant::from_millis(-1_000)
        );
        assert!(TICK_FIELD.add(i, i64::MAX).is_err());
        assert!(TICK_FIELD.add(Instant::MAX, 1).is_err());
    }

    #[test]
    fn precise_difference_truncates_toward_zero() {
        let zero = Instant::from_millis(0);
        assert_eq!(TICK_FIELD.difference(Instant::from_millis(999), zero), 3);
        assert_eq!(
            TICK_FIELD.difference(Instant::from_millis(-999), zero),
            -3
        );
    }

    quickcheck::quickcheck! {
        // difference(add(i, v), i) == v whenever add succeeds.
        fn prop_roundtrip(instant: Instant, count: i32) -> bool {
            let count = i64::from(count);
            match TICK_FIELD.add(instant, count) {
                Ok(moved) => TICK_FIELD.difference(moved, instant) == count,
                Err(_) => true,
            }
        }
    }
}
