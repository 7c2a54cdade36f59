/*!
Pure helpers for field value bounds.

These are the two primitives everything else in the engine leans on:
verifying that a value sits inside an inclusive range, and wrapping an
addition around an inclusive range.
*/

use crate::{error::Error, field::FieldType};

/// Verifies that `value` lies in `min..=max` for the given field.
///
/// # Errors
///
/// A bounds error carrying the field's name, the offending value and the
/// computed bounds.
pub(crate) fn verify_value_bounds(
    field: &FieldType,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), Error> {
    if value < min || value > max {
        return Err(Error::bounds(field.name(), value, min, max));
    }
    Ok(())
}

/// Returns the unique value in `min..=max` congruent to `current + add`
/// modulo the range size.
///
/// # Errors
///
/// When `max < min`, which signals a misconfigured field rather than a bad
/// input value.
pub(crate) fn wrapped_value(
    current: i64,
    add: i64,
    min: i64,
    max: i64,
) -> Result<i64, Error> {
    if max < min {
        return Err(Error::construction("field range has minimum > maximum"));
    }
    // max - min + 1 can reach 2^64 - 1 in the degenerate full-i64 case,
    // and current + add can overflow i64, so the modular step runs in
    // i128.
    let size = i128::from(max) - i128::from(min) + 1;
    let value = i128::from(current) + i128::from(add) - i128::from(min);
    let wrapped = i128::from(min) + value.rem_euclid(size);
    // OK because the result is back inside min..=max.
    Ok(wrapped as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_TYPE: FieldType = FieldType::new("test");

    #[test]
    fn verify_in_range() {
        assert!(verify_value_bounds(&TEST_TYPE, 1, 1, 31).is_ok());
        assert!(verify_value_bounds(&TEST_TYPE, 31, 1, 31).is_ok());
        assert!(verify_value_bounds(&TEST_TYPE, 0, 1, 31).is_err());
        assert!(verify_value_bounds(&TEST_TYPE, 32, 1, 31).is_err());
        let err = verify_value_bounds(&TEST_TYPE, 32, 1, 31).unwrap_err();
        assert!(err.is_bounds());
    }

    #[test]
    fn wrap_basics() {
        // Months: 1..=12.
        assert_eq!(wrapped_value(8, 6, 1, 12).unwrap(), 2);
        assert_eq!(wrapped_value(8, 20, 1, 12).unwrap(), 4);
        assert_eq!(wrapped_value(8, -9, 1, 12).unwrap(), 11);
        assert_eq!(wrapped_value(1, -1, 1, 12).unwrap(), 12);
        assert_eq!(wrapped_value(12, 1, 1, 12).unwrap(), 1);
        // Adding a whole number of cycles is the identity.
        assert_eq!(wrapped_value(5, 24, 1, 12).unwrap(), 5);
        assert_eq!(wrapped_value(5, -24, 1, 12).unwrap(), 5);
    }

    #[test]
    fn wrap_negative_minimum() {
        assert_eq!(wrapped_value(-3, -4, -5, 5).unwrap(), 4);
        assert_eq!(wrapped_value(5, 1, -5, 5).unwrap(), -5);
    }

    #[test]
    fn wrap_inverted_range() {
        let err = wrapped_value(0, 1, 10, 5).unwrap_err();
        assert!(err.is_construction());
    }

    quickcheck::quickcheck! {
        fn prop_wrap_stays_in_range(
            current: i64,
            add: i64,
            min: i8,
            span: u8
        ) -> bool {
            let min = i64::from(min);
            let max = min + i64::from(span);
            let got = wrapped_value(current, add, min, max).unwrap();
            min <= got && got <= max
        }

        fn prop_wrap_is_modular(current: i8, add: i16, span: u8) -> bool {
            let max = i64::from(span);
            let size = max + 1;
            let got =
                wrapped_value(i64::from(current), i64::from(add), 0, max)
                    .unwrap();
            got == (i64::from(current) + i64::from(add)).rem_euclid(size)
        }
    }
}
