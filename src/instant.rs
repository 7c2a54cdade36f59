use crate::error::Error;

/// An instant in time.
///
/// An `Instant` is a scalar count of elapsed milliseconds since the Unix
/// epoch, `1970-01-01T00:00:00Z`. Values before the epoch are negative. An
/// instant carries no calendar structure of its own; fields such as "month"
/// or "hour of day" are read out of it by a [`DateTimeField`].
///
/// # Range
///
/// The representable range is [`Instant::MIN`] to [`Instant::MAX`],
/// corresponding to `-9999-01-01T00:00:00.000` through
/// `9999-12-31T23:59:59.999` on the Gregorian calendar. Arithmetic that
/// would leave this range returns an error rather than wrapping.
///
/// # Example
///
/// ```
/// use timefield::{civil, DateTimeField, Instant};
///
/// // 2000-08-20T00:00:00Z
/// let instant = Instant::from_millis(966_729_600_000);
/// assert_eq!(civil::MONTH_OF_YEAR.get(instant), 8);
/// assert_eq!(civil::DAY_OF_MONTH.get(instant), 20);
/// ```
///
/// [`DateTimeField`]: crate::DateTimeField
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Instant {
    millis: i64,
}

impl Instant {
    /// The minimum representable instant, `-9999-01-01T00:00:00.000`.
    pub const MIN: Instant = Instant { millis: -377_705_116_800_000 };

    /// The maximum representable instant, `9999-12-31T23:59:59.999`.
    pub const MAX: Instant = Instant { millis: 253_402_300_799_999 };

    /// The Unix epoch, `1970-01-01T00:00:00.000`.
    pub const UNIX_EPOCH: Instant = Instant { millis: 0 };

    /// Creates an instant from a count of milliseconds since the Unix
    /// epoch, without a range check.
    ///
    /// The fallible [`Instant::new`] should be preferred for untrusted
    /// input. This constructor is `const` and is primarily useful for
    /// defining instants known to be valid at compile time. Handing an
    /// out-of-range instant to field operations does not cause memory
    /// unsafety, but field values computed from it are unspecified.
    #[inline]
    pub const fn from_millis(millis: i64) -> Instant {
        Instant { millis }
    }

    /// Creates an instant from a count of milliseconds since the Unix
    /// epoch.
    ///
    /// # Errors
    ///
    /// This returns an error when the given count is outside the range
    /// `Instant::MIN..=Instant::MAX`.
    ///
    /// # Example
    ///
    /// ```
    /// use timefield::Instant;
    ///
    /// assert!(Instant::new(0).is_ok());
    /// assert!(Instant::new(i64::MAX).is_err());
    /// ```
    #[inline]
    pub fn new(millis: i64) -> Result<Instant, Error> {
        if millis < Instant::MIN.millis || millis > Instant::MAX.millis {
            return Err(Error::range(
                "instant",
                millis,
                Instant::MIN.millis,
                Instant::MAX.millis,
            ));
        }
        Ok(Instant { millis })
    }

    /// Returns this instant as a count of milliseconds since the Unix
    /// epoch.
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.millis
    }

    /// Adds a count of milliseconds to this instant.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would fall outside the range
    /// `Instant::MIN..=Instant::MAX`.
    #[inline]
    pub fn checked_add_millis(self, millis: i64) -> Result<Instant, Error> {
        let Some(sum) = self.millis.checked_add(millis) else {
            return Err(Error::range(
                "instant",
                self.millis,
                Instant::MIN.millis,
                Instant::MAX.millis,
            ));
        };
        Instant::new(sum)
    }

    /// Returns the signed count of milliseconds from `other` to this
    /// instant.
    ///
    /// This never overflows because every instant lies within
    /// `Instant::MIN..=Instant::MAX`.
    #[inline]
    pub const fn since_millis(self, other: Instant) -> i64 {
        self.millis - other.millis
    }
}

impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Instant {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.millis)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Instant {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Instant, D::Error> {
        let millis = <i64 as serde::Deserialize>::deserialize(deserializer)?;
        Instant::new(millis).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Instant {
    fn arbitrary(g: &mut quickcheck::Gen) -> Instant {
        // Stay well inside the civil range so that per-test arithmetic
        // (adding a handful of units) can't push past the boundary.
        let millis = i64::arbitrary(g)
            % (Instant::MAX.as_millis() / 2);
        Instant::from_millis(millis)
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Instant>> {
        alloc::boxed::Box::new(
            self.millis.shrink().map(Instant::from_millis),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_range() {
        assert!(Instant::new(Instant::MIN.as_millis()).is_ok());
        assert!(Instant::new(Instant::MAX.as_millis()).is_ok());
        assert!(Instant::new(Instant::MIN.as_millis() - 1).is_err());
        assert!(Instant::new(Instant::MAX.as_millis() + 1).is_err());
        assert!(Instant::new(Instant::MAX.as_millis() + 1)
            .unwrap_err()
            .is_range());
    }

    #[test]
    fn checked_add() {
        let i = Instant::from_millis(5);
        assert_eq!(i.checked_add_millis(-10).unwrap().as_millis(), -5);
        assert!(Instant::MAX.checked_add_millis(1).is_err());
        assert!(Instant::MIN.checked_add_millis(-1).is_err());
        // No silent two's-complement wrap on extreme addends.
        assert!(Instant::MAX.checked_add_millis(i64::MAX).is_err());
    }

    #[test]
    fn since() {
        let a = Instant::from_millis(1_000);
        let b = Instant::from_millis(-500);
        assert_eq!(a.since_millis(b), 1_500);
        assert_eq!(b.since_millis(a), -1_500);
    }
}
