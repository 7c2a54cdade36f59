/*!
The standard Gregorian field set.

This module defines the [`DurationUnit`]s and [`DurationField`]s of the
proleptic Gregorian calendar, the seven standard fields from
[`YEAR`](static@YEAR) down to
[`MILLIS_OF_SECOND`](static@MILLIS_OF_SECOND), and two fixed partial
shapes, [`TimeOfDay`] and [`YearMonthDay`].

Everything here is a `static`: fields and duration fields are stateless,
so one instance of each is shared for the process lifetime.

There are no time zones in this crate. A day is exactly 86,400,000
milliseconds and the calendar applies proleptically across the whole
supported range of years, `-9999..=9999`.
*/

use crate::{
    duration::{DurationField, DurationUnit, PreciseDurationField},
    error::Error,
    field::bounds::verify_value_bounds,
    instant::Instant,
};

mod fields;

pub use self::fields::{
    ClockField, DayOfMonthField, MonthOfYearField, TimeOfDay, YearField,
    YearMonthDay, DAY_OF_MONTH, HOUR_OF_DAY, MILLIS_OF_SECOND,
    MINUTE_OF_HOUR, MONTH_OF_YEAR, SECOND_OF_MINUTE, YEAR,
};

pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;
pub(crate) const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub(crate) const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub(crate) const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

// Mean lengths over the 400-year Gregorian cycle. Used only as the
// nominal `unit_millis` of the imprecise duration fields.
const MILLIS_PER_YEAR_AVG: i64 = 31_556_952_000;
const MILLIS_PER_MONTH_AVG: i64 = MILLIS_PER_YEAR_AVG / 12;

/// The smallest year this calendar can represent.
pub const MIN_YEAR: i64 = -9999;

/// The largest year this calendar can represent.
pub const MAX_YEAR: i64 = 9999;

/// The unit descriptors of the Gregorian calendar.
pub mod units {
    use crate::duration::DurationUnit;

    pub static MILLIS: DurationUnit = DurationUnit::new("millis");
    pub static SECONDS: DurationUnit = DurationUnit::new("seconds");
    pub static MINUTES: DurationUnit = DurationUnit::new("minutes");
    pub static HOURS: DurationUnit = DurationUnit::new("hours");
    pub static DAYS: DurationUnit = DurationUnit::new("days");
    pub static MONTHS: DurationUnit = DurationUnit::new("months");
    pub static YEARS: DurationUnit = DurationUnit::new("years");
}

/// The field type descriptors of the Gregorian calendar.
pub mod types {
    use crate::field::FieldType;

    pub static YEAR: FieldType = FieldType::new("year");
    pub static MONTH_OF_YEAR: FieldType = FieldType::new("month_of_year");
    pub static DAY_OF_MONTH: FieldType = FieldType::new("day_of_month");
    pub static HOUR_OF_DAY: FieldType = FieldType::new("hour_of_day");
    pub static MINUTE_OF_HOUR: FieldType = FieldType::new("minute_of_hour");
    pub static SECOND_OF_MINUTE: FieldType =
        FieldType::new("second_of_minute");
    pub static MILLIS_OF_SECOND: FieldType =
        FieldType::new("millis_of_second");
}

/// The milliseconds duration field.
pub static MILLIS: PreciseDurationField =
    PreciseDurationField::new(&units::MILLIS, 1);

/// The seconds duration field.
pub static SECONDS: PreciseDurationField =
    PreciseDurationField::new(&units::SECONDS, MILLIS_PER_SECOND);

/// The minutes duration field.
pub static MINUTES: PreciseDurationField =
    PreciseDurationField::new(&units::MINUTES, MILLIS_PER_MINUTE);

/// The hours duration field.
pub static HOURS: PreciseDurationField =
    PreciseDurationField::new(&units::HOURS, MILLIS_PER_HOUR);

/// The days duration field. A day is always 86,400,000 milliseconds.
pub static DAYS: PreciseDurationField =
    PreciseDurationField::new(&units::DAYS, MILLIS_PER_DAY);

/// The months duration field.
pub static MONTHS: MonthsDurationField = MonthsDurationField;

/// The years duration field.
pub static YEARS: YearsDurationField = YearsDurationField;

/// Creates an instant from Gregorian date and time-of-day fields.
///
/// # Errors
///
/// A bounds error when any field is out of range. The day is validated
/// against the actual length of the given month, so `date_time(2001, 2,
/// 29, ...)` fails.
///
/// # Example
///
/// ```
/// use timefield::{civil, Instant};
///
/// let epoch = civil::date_time(1970, 1, 1, 0, 0, 0, 0)?;
/// assert_eq!(epoch, Instant::UNIX_EPOCH);
/// # Ok::<(), timefield::Error>(())
/// ```
pub fn date_time(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    milli: i64,
) -> Result<Instant, Error> {
    verify_value_bounds(&types::YEAR, year, MIN_YEAR, MAX_YEAR)?;
    verify_value_bounds(&types::MONTH_OF_YEAR, month, 1, 12)?;
    verify_value_bounds(
        &types::DAY_OF_MONTH,
        day,
        1,
        days_in_month(year, month),
    )?;
    verify_value_bounds(&types::HOUR_OF_DAY, hour, 0, 23)?;
    verify_value_bounds(&types::MINUTE_OF_HOUR, minute, 0, 59)?;
    verify_value_bounds(&types::SECOND_OF_MINUTE, second, 0, 59)?;
    verify_value_bounds(&types::MILLIS_OF_SECOND, milli, 0, 999)?;
    let millis_of_day =
        ((hour * 60 + minute) * 60 + second) * MILLIS_PER_SECOND + milli;
    Ok(instant_at(epoch_day_from_date(year, month, day), millis_of_day))
}

/// Creates an instant at midnight of the given Gregorian date.
///
/// # Errors
///
/// As for [`date_time`].
pub fn date(year: i64, month: i64, day: i64) -> Result<Instant, Error> {
    date_time(year, month, day, 0, 0, 0, 0)
}

/// Returns true if and only if the given Gregorian year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
pub fn is_leap_year(year: i64) -> bool {
    let d = if year % 25 != 0 { 4 } else { 16 };
    year % d == 0
}

/// Returns the number of days in the given Gregorian year and month.
///
/// This correctly returns `29` when the year is a leap year and the month
/// is February. The month must be in `1..=12`.
pub fn days_in_month(year: i64, month: i64) -> i64 {
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Splits an instant into its epoch day and its milliseconds of day.
///
/// The epoch day is negative before 1970-01-01 and the milliseconds of
/// day are always in `0..86_400_000`.
pub(crate) fn split(instant: Instant) -> (i64, i64) {
    let millis = instant.as_millis();
    (millis.div_euclid(MILLIS_PER_DAY), millis.rem_euclid(MILLIS_PER_DAY))
}

/// The inverse of [`split`]. No range check; callers either start from a
/// valid instant or validate the pieces themselves.
pub(crate) fn instant_at(epoch_day: i64, millis_of_day: i64) -> Instant {
    Instant::from_millis(epoch_day * MILLIS_PER_DAY + millis_of_day)
}

// The epoch-day/date conversions below use the algorithms from Neri and
// Schneider, "Euclidean affine functions and their application to
// calendar algorithms" (2022), with the computation shifted by 82 full
// 400-year cycles so it runs entirely on unsigned 32-bit values. Our
// epoch days span about +/-4.4 million, comfortably inside the shifted
// domain.

const DAYS_PER_ERA: i64 = 146_097;
const EPOCH_SHIFT_DAYS: i64 = 719_468 + DAYS_PER_ERA * 82;
const YEAR_SHIFT: i64 = 400 * 82;

/// Converts an epoch day to a Gregorian `(year, month, day)`.
pub(crate) fn date_from_epoch_day(epoch_day: i64) -> (i64, i64, i64) {
    let n = (epoch_day + EPOCH_SHIFT_DAYS) as u32;
    let n1 = 4 * n + 3;
    let century = n1 / 146_097;
    let day_of_century = n1 % 146_097 / 4;
    let n2 = 4 * day_of_century + 3;
    let p = 2_939_745u64 * u64::from(n2);
    let year_of_century = (p >> 32) as u32;
    // Day of the computational year, which begins on March 1.
    let day_of_year = (p as u32) / 2_939_745 / 4;
    let n3 = 2_141 * day_of_year + 197_913;
    let month = n3 / 65_536;
    let day = n3 % 65_536 / 2_141;
    let from_january = day_of_year >= 306;
    let year = i64::from(100 * century + year_of_century) - YEAR_SHIFT
        + i64::from(from_january);
    let month = if from_january {
        i64::from(month) - 12
    } else {
        i64::from(month)
    };
    (year, month, i64::from(day) + 1)
}

/// Converts a Gregorian date to its epoch day. The date must be valid
/// and its year in `MIN_YEAR..=MAX_YEAR`.
pub(crate) fn epoch_day_from_date(year: i64, month: i64, day: i64) -> i64 {
    let from_january = month <= 2;
    let y = (year + YEAR_SHIFT - i64::from(from_january)) as u32;
    let m = if from_january { month + 12 } else { month } as u32;
    let d = (day - 1) as u32;
    let century = y / 100;
    let year_days = 1461 * y / 4 - century + century / 4;
    let month_days = (979 * m - 2_919) / 32;
    i64::from(year_days + month_days + d) - EPOCH_SHIFT_DAYS
}

/// The months duration field.
///
/// Imprecise: how far one month moves an instant depends on where in the
/// calendar it lands. Adding months keeps the day-of-month and the time
/// of day, clamping the day when the target month is shorter.
#[derive(Debug)]
pub struct MonthsDurationField;

impl DurationField for MonthsDurationField {
    fn unit(&self) -> &'static DurationUnit {
        &units::MONTHS
    }

    fn is_precise(&self) -> bool {
        false
    }

    fn unit_millis(&self) -> i64 {
        MILLIS_PER_MONTH_AVG
    }

    fn add(&self, instant: Instant, count: i64) -> Result<Instant, Error> {
        let (epoch_day, millis_of_day) = split(instant);
        let (year, month, day) = date_from_epoch_day(epoch_day);
        // Zero-based month count since year 0, widened so any i64 count
        // is representable.
        let total =
            i128::from(year * 12 + (month - 1)) + i128::from(count);
        let new_year = total.div_euclid(12);
        if new_year < i128::from(MIN_YEAR) || new_year > i128::from(MAX_YEAR)
        {
            return Err(Error::range(
                "year",
                new_year as i64,
                MIN_YEAR,
                MAX_YEAR,
            ));
        }
        let new_year = new_year as i64;
        let new_month = total.rem_euclid(12) as i64 + 1;
        let new_day = day.min(days_in_month(new_year, new_month));
        Ok(instant_at(
            epoch_day_from_date(new_year, new_month, new_day),
            millis_of_day,
        ))
    }

    fn difference(&self, minuend: Instant, subtrahend: Instant) -> i64 {
        if minuend < subtrahend {
            return -self.difference(subtrahend, minuend);
        }
        let (min_day, _) = split(minuend);
        let (sub_day, _) = split(subtrahend);
        let (min_year, min_month, _) = date_from_epoch_day(min_day);
        let (sub_year, sub_month, _) = date_from_epoch_day(sub_day);
        let diff = (min_year - sub_year) * 12 + (min_month - sub_month);
        // The calendar months may differ by `diff` while the instants are
        // still less than `diff` whole months apart, because of the
        // day-of-month and time of day. One step back is always enough.
        match self.add(subtrahend, diff) {
            Ok(moved) if moved > minuend => diff - 1,
            _ => diff,
        }
    }
}

/// The years duration field.
///
/// Imprecise: a year is 365 or 366 days. Adding years keeps the month,
/// day and time of day, clamping February 29 to February 28 when the
/// target year is not a leap year.
#[derive(Debug)]
pub struct YearsDurationField;

impl DurationField for YearsDurationField {
    fn unit(&self) -> &'static DurationUnit {
        &units::YEARS
    }

    fn is_precise(&self) -> bool {
        false
    }

    fn unit_millis(&self) -> i64 {
        MILLIS_PER_YEAR_AVG
    }

    fn add(&self, instant: Instant, count: i64) -> Result<Instant, Error> {
        let (epoch_day, millis_of_day) = split(instant);
        let (year, month, day) = date_from_epoch_day(epoch_day);
        let new_year = i128::from(year) + i128::from(count);
        if new_year < i128::from(MIN_YEAR) || new_year > i128::from(MAX_YEAR)
        {
            return Err(Error::range(
                "year",
                new_year as i64,
                MIN_YEAR,
                MAX_YEAR,
            ));
        }
        let new_year = new_year as i64;
        let new_day = day.min(days_in_month(new_year, month));
        Ok(instant_at(
            epoch_day_from_date(new_year, month, new_day),
            millis_of_day,
        ))
    }

    fn difference(&self, minuend: Instant, subtrahend: Instant) -> i64 {
        if minuend < subtrahend {
            return -self.difference(subtrahend, minuend);
        }
        let (min_day, _) = split(minuend);
        let (sub_day, _) = split(subtrahend);
        let (min_year, _, _) = date_from_epoch_day(min_day);
        let (sub_year, _, _) = date_from_epoch_day(sub_day);
        let diff = min_year - sub_year;
        match self.add(subtrahend, diff) {
            Ok(moved) if moved > minuend => diff - 1,
            _ => diff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_conversions() {
        let cases = [
            (0, (1970, 1, 1)),
            (-1, (1969, 12, 31)),
            (11_016, (2000, 2, 29)),
            (11_017, (2000, 3, 1)),
            (11_323, (2001, 1, 1)),
            (19_723, (2024, 1, 1)),
            (-719_528, (0, 1, 1)),
            (-4_371_587, (-9999, 1, 1)),
            (2_932_896, (9999, 12, 31)),
        ];
        for (epoch_day, (year, month, day)) in cases {
            assert_eq!(
                date_from_epoch_day(epoch_day),
                (year, month, day),
                "date of epoch day {epoch_day}",
            );
            assert_eq!(
                epoch_day_from_date(year, month, day),
                epoch_day,
                "epoch day of {year:04}-{month:02}-{day:02}",
            );
        }
    }

    #[test]
    fn exhaustive_epoch_day_roundtrip() {
        // Every day of a 400-year cycle straddling the epoch.
        for epoch_day in -73_049..=73_048 {
            let (year, month, day) = date_from_epoch_day(epoch_day);
            assert!((1..=12).contains(&month));
            assert!(day >= 1 && day <= days_in_month(year, month));
            assert_eq!(epoch_day_from_date(year, month, day), epoch_day);
        }
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(-1));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 7), 31);
        assert_eq!(days_in_month(2023, 8), 31);
        assert_eq!(days_in_month(2023, 9), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn split_negative_instants() {
        // One millisecond before the epoch is the last millisecond of
        // 1969-12-31.
        let (epoch_day, millis_of_day) = split(Instant::from_millis(-1));
        assert_eq!(epoch_day, -1);
        assert_eq!(millis_of_day, MILLIS_PER_DAY - 1);
    }

    #[test]
    fn add_months_clamps_day() {
        let i = date(2001, 1, 31).unwrap();
        assert_eq!(MONTHS.add(i, 1).unwrap(), date(2001, 2, 28).unwrap());
        assert_eq!(MONTHS.add(i, 3).unwrap(), date(2001, 4, 30).unwrap());
        assert_eq!(MONTHS.add(i, 13).unwrap(), date(2002, 2, 28).unwrap());
    }

    #[test]
    fn add_months_across_years() {
        let i = date_time(2000, 8, 20, 10, 20, 30, 0).unwrap();
        assert_eq!(
            MONTHS.add(i, 6).unwrap(),
            date_time(2001, 2, 20, 10, 20, 30, 0).unwrap(),
        );
        assert_eq!(
            MONTHS.add(i, -9).unwrap(),
            date_time(1999, 11, 20, 10, 20, 30, 0).unwrap(),
        );
        assert_eq!(MONTHS.add(i, 0).unwrap(), i);
    }

    #[test]
    fn add_months_out_of_range() {
        let i = date(2000, 1, 1).unwrap();
        assert!(MONTHS.add(i, 96_000).is_err());
        assert!(MONTHS.add(i, i64::MAX).is_err());
        assert!(MONTHS.add(i, i64::MIN).is_err());
    }

    #[test]
    fn month_difference_truncates() {
        let a = date(2000, 8, 20).unwrap();
        let b = date(2001, 2, 20).unwrap();
        assert_eq!(MONTHS.difference(b, a), 6);
        assert_eq!(MONTHS.difference(a, b), -6);
        // 2001-02-19 is not yet six whole months past 2000-08-20.
        let almost = date(2001, 2, 19).unwrap();
        assert_eq!(MONTHS.difference(almost, a), 5);
        // The time of day counts too.
        let late = date_time(2000, 8, 20, 12, 0, 0, 0).unwrap();
        assert_eq!(MONTHS.difference(b, late), 5);
    }

    #[test]
    fn add_years_clamps_leap_day() {
        let i = date(2000, 2, 29).unwrap();
        assert_eq!(YEARS.add(i, 1).unwrap(), date(2001, 2, 28).unwrap());
        assert_eq!(YEARS.add(i, 4).unwrap(), date(2004, 2, 29).unwrap());
        assert_eq!(YEARS.add(i, -100).unwrap(), date(1900, 2, 28).unwrap());
    }

    #[test]
    fn year_difference_truncates() {
        let a = date(2000, 2, 29).unwrap();
        // Adding one year to 2000-02-29 clamps to 2001-02-28, so by
        // 2001-02-28 one whole year has elapsed, but not by 2001-02-27.
        assert_eq!(YEARS.difference(date(2001, 2, 28).unwrap(), a), 1);
        assert_eq!(YEARS.difference(date(2001, 2, 27).unwrap(), a), 0);
        assert_eq!(YEARS.difference(date(2001, 3, 1).unwrap(), a), 1);
        assert_eq!(YEARS.difference(date(2004, 2, 29).unwrap(), a), 4);
    }

    #[test]
    fn date_time_validation() {
        assert!(date_time(2001, 2, 29, 0, 0, 0, 0).is_err());
        assert!(date_time(2000, 2, 29, 0, 0, 0, 0).is_ok());
        assert!(date_time(2000, 13, 1, 0, 0, 0, 0).is_err());
        assert!(date_time(2000, 1, 1, 24, 0, 0, 0).is_err());
        assert!(date_time(10_000, 1, 1, 0, 0, 0, 0).is_err());
        let err = date_time(2000, 1, 32, 0, 0, 0, 0).unwrap_err();
        assert!(err.is_bounds());
    }

    #[test]
    fn range_boundaries() {
        assert_eq!(date(-9999, 1, 1).unwrap(), Instant::MIN);
        assert_eq!(
            date_time(9999, 12, 31, 23, 59, 59, 999).unwrap(),
            Instant::MAX,
        );
    }

    quickcheck::quickcheck! {
        // difference(add(i, n), i) == n for months, as long as the add
        // lands in range and does not clamp the day.
        fn prop_month_roundtrip(instant: Instant, count: i16) -> bool {
            let count = i64::from(count);
            let Ok(moved) = MONTHS.add(instant, count) else {
                return true;
            };
            let (day, _) = split(instant);
            let (moved_day, _) = split(moved);
            if date_from_epoch_day(day).2 != date_from_epoch_day(moved_day).2
            {
                // The day-of-month clamped; the round-trip law does not
                // apply.
                return true;
            }
            MONTHS.difference(moved, instant) == count
        }
    }
}
