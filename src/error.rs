use alloc::{boxed::Box, sync::Arc};

/// An error that can occur in this crate.
///
/// The most common type of error is a field value falling outside its
/// currently valid bounds. The other cases are:
///
/// * A strict cascading add overflowing the most-significant field of a
/// partial.
/// * A structurally invalid field/partial configuration. (For example,
/// cascading across two adjacent fields whose durations don't line up, or
/// handing the engine a values buffer of the wrong length.)
/// * Text that could not be converted to a field value.
/// * Instant arithmetic leaving the representable range.
///
/// # Design
///
/// This crate uses a single error type for all of its operations, with
/// `is_*` predicates for the cases callers are expected to distinguish.
/// Every error is raised synchronously to the immediate caller; arithmetic
/// failures here are deterministic, never transient, so there is no notion
/// of retrying. Cascading operations are all-or-nothing: when one of them
/// returns an error, the caller's values buffer is unchanged.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make clones cheap and to keep the size of
    /// `Error` itself to one word, since nearly every operation in this
    /// crate returns a `Result<T, Error>`.
    inner: Arc<ErrorKind>,
}

impl Error {
    /// Returns true when this error came from a field or partial being
    /// assembled inconsistently. This signals a bug in the caller's field
    /// configuration, not a bad input value.
    pub fn is_construction(&self) -> bool {
        matches!(*self.inner, ErrorKind::Construction(_))
    }

    /// Returns true when this error came from a field value being outside
    /// its currently valid minimum/maximum.
    pub fn is_bounds(&self) -> bool {
        matches!(*self.inner, ErrorKind::Bounds(_))
    }

    /// Returns true when this error came from a strict cascading add
    /// exceeding the most-significant field of a partial.
    pub fn is_overflow(&self) -> bool {
        matches!(*self.inner, ErrorKind::Overflow(_))
    }

    /// Returns true when this error came from a cascading add discovering
    /// that two adjacent fields in a partial have mismatched durations.
    pub fn is_incompatible_fields(&self) -> bool {
        matches!(*self.inner, ErrorKind::IncompatibleFields(_))
    }

    /// Returns true when this error came from text that could not be
    /// converted to a field value.
    pub fn is_text_conversion(&self) -> bool {
        matches!(*self.inner, ErrorKind::TextConversion(_))
    }

    /// Returns true when this error came from instant arithmetic leaving
    /// the representable range.
    pub fn is_range(&self) -> bool {
        matches!(*self.inner, ErrorKind::Range(_))
    }
}

impl Error {
    /// Creates a new error indicating that a field or partial was built
    /// inconsistently. The given `what` describes the problem.
    #[inline(never)]
    #[cold]
    pub(crate) fn construction(what: &'static str) -> Error {
        Error::from(ErrorKind::Construction(ConstructionError { what }))
    }

    /// Creates a new error indicating that `value` for the field named
    /// `field` is out of its currently valid `min..=max` range.
    #[inline(never)]
    #[cold]
    pub(crate) fn bounds(
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    ) -> Error {
        Error::from(ErrorKind::Bounds(BoundsError { field, value, min, max }))
    }

    /// Creates a new error indicating that a strict cascading add ran out
    /// of more-significant fields while `field` still had overflow to
    /// hand off.
    #[inline(never)]
    #[cold]
    pub(crate) fn overflow(field: &'static str) -> Error {
        Error::from(ErrorKind::Overflow(OverflowError { field }))
    }

    /// Creates a new error indicating that the range duration of `field`
    /// (named `range_unit`) does not match the duration of its
    /// more-significant neighbor (named `neighbor_unit`).
    #[inline(never)]
    #[cold]
    pub(crate) fn incompatible_fields(
        field: &'static str,
        range_unit: &'static str,
        neighbor_unit: &'static str,
    ) -> Error {
        Error::from(ErrorKind::IncompatibleFields(IncompatibleFieldsError {
            field,
            range_unit,
            neighbor_unit,
        }))
    }

    /// Creates a new error indicating that `text` could not be converted
    /// to a value for the field named `field`.
    #[inline(never)]
    #[cold]
    pub(crate) fn text_conversion(field: &'static str, text: &str) -> Error {
        Error::from(ErrorKind::TextConversion(TextConversionError {
            field,
            text: Box::from(text),
        }))
    }

    /// Creates a new error indicating that a `given` value for `what` is
    /// out of the representable `min..=max` range.
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: i64,
        min: i64,
        max: i64,
    ) -> Error {
        Error::from(ErrorKind::Range(RangeError { what, given, min, max }))
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&*self.inner, f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error").field("kind", &self.inner).finish()
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(kind) }
    }
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Construction(ConstructionError),
    Bounds(BoundsError),
    Overflow(OverflowError),
    IncompatibleFields(IncompatibleFieldsError),
    TextConversion(TextConversionError),
    Range(RangeError),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Construction(ref err) => err.fmt(f),
            Bounds(ref err) => err.fmt(f),
            Overflow(ref err) => err.fmt(f),
            IncompatibleFields(ref err) => err.fmt(f),
            TextConversion(ref err) => err.fmt(f),
            Range(ref err) => err.fmt(f),
        }
    }
}

/// A field or partial was assembled inconsistently.
#[derive(Debug)]
struct ConstructionError {
    what: &'static str,
}

impl core::fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid field configuration: {}", self.what)
    }
}

/// A field value was outside its currently valid bounds.
///
/// The error message includes the field's name, the value given and the
/// minimum and maximum values that were in effect.
#[derive(Debug)]
struct BoundsError {
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
}

impl core::fmt::Display for BoundsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let BoundsError { field, value, min, max } = *self;
        write!(
            f,
            "value {value} for field '{field}' \
             is not in the required range of {min}..={max}",
        )
    }
}

/// A strict cascading add exceeded the most-significant field.
#[derive(Debug)]
struct OverflowError {
    field: &'static str,
}

impl core::fmt::Display for OverflowError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "adding to field '{}' overflowed the most-significant \
             field of the partial",
            self.field,
        )
    }
}

/// Two adjacent fields in a partial have mismatched durations.
#[derive(Debug)]
struct IncompatibleFieldsError {
    field: &'static str,
    range_unit: &'static str,
    neighbor_unit: &'static str,
}

impl core::fmt::Display for IncompatibleFieldsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let IncompatibleFieldsError { field, range_unit, neighbor_unit } =
            *self;
        write!(
            f,
            "fields invalid for cascading add: field '{field}' has range \
             unit '{range_unit}' but its more-significant neighbor has \
             unit '{neighbor_unit}'",
        )
    }
}

/// Text could not be converted to a field value.
#[derive(Debug)]
struct TextConversionError {
    field: &'static str,
    text: Box<str>,
}

impl core::fmt::Display for TextConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "text {:?} could not be converted to a value for field '{}'",
            self.text, self.field,
        )
    }
}

/// Instant arithmetic left the representable range.
#[derive(Debug)]
struct RangeError {
    what: &'static str,
    given: i64,
    min: i64,
    max: i64,
}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "parameter '{what}' with value {given} \
             is not in the required range of {min}..={max}",
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    // If the size of `Error` grows past one word, we want that to be a
    // deliberate decision. Nearly everything here returns a `Result`.
    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn bounds_message() {
        let err = Error::bounds("day_of_month", 31, 1, 28);
        assert_eq!(
            err.to_string(),
            "value 31 for field 'day_of_month' \
             is not in the required range of 1..=28",
        );
        assert!(err.is_bounds());
        assert!(!err.is_overflow());
    }

    #[test]
    fn text_conversion_message() {
        let err = Error::text_conversion("month_of_year", "Janvember");
        assert_eq!(
            err.to_string(),
            "text \"Janvember\" could not be converted to a value \
             for field 'month_of_year'",
        );
        assert!(err.is_text_conversion());
    }
}
