use crate::{
    civil::{
        date_from_epoch_day, days_in_month, epoch_day_from_date,
        instant_at, is_leap_year, split, types, DAYS, HOURS, MAX_YEAR,
        MILLIS, MINUTES, MIN_YEAR, MONTHS, SECONDS, YEARS,
    },
    duration::{DurationField, PreciseDurationField},
    error::Error,
    field::{DateTimeField, FieldType},
    instant::Instant,
    partial::Partial,
};

/// The year field, `-9999..=9999`.
///
/// The most significant field: it has no range duration, so a strict
/// cascading add that overflows it fails.
#[derive(Debug)]
pub struct YearField;

/// The year field.
pub static YEAR: YearField = YearField;

impl DateTimeField for YearField {
    fn field_type(&self) -> &'static FieldType {
        &types::YEAR
    }

    fn get(&self, instant: Instant) -> i64 {
        let (epoch_day, _) = split(instant);
        date_from_epoch_day(epoch_day).0
    }

    fn set_instant(
        &self,
        instant: Instant,
        value: i64,
    ) -> Result<Instant, Error> {
        // The calendar conversion is only defined on the supported year
        // range, so the raw setter checks it even though `set` already
        // has.
        if value < MIN_YEAR || value > MAX_YEAR {
            return Err(Error::range("year", value, MIN_YEAR, MAX_YEAR));
        }
        let (epoch_day, millis_of_day) = split(instant);
        let (_, month, day) = date_from_epoch_day(epoch_day);
        // February 29 moving to a common year clamps to February 28.
        let day = day.min(days_in_month(value, month));
        Ok(instant_at(epoch_day_from_date(value, month, day), millis_of_day))
    }

    fn duration_field(&self) -> &dyn DurationField {
        &YEARS
    }

    fn range_duration_field(&self) -> Option<&dyn DurationField> {
        None
    }

    fn minimum_value(&self) -> i64 {
        MIN_YEAR
    }

    fn maximum_value(&self) -> i64 {
        MAX_YEAR
    }

    fn round_floor(&self, instant: Instant) -> Instant {
        let (epoch_day, _) = split(instant);
        let (year, _, _) = date_from_epoch_day(epoch_day);
        instant_at(epoch_day_from_date(year, 1, 1), 0)
    }

    fn is_leap(&self, instant: Instant) -> bool {
        is_leap_year(self.get(instant))
    }

    fn leap_amount(&self, instant: Instant) -> i64 {
        i64::from(self.is_leap(instant))
    }

    fn leap_duration_field(&self) -> Option<&dyn DurationField> {
        Some(&DAYS)
    }

    // The default looks only at the maximum, but "-9999" is wider than
    // "9999".
    fn maximum_text_length(&self) -> usize {
        5
    }
}

/// The month-of-year field, `1..=12`.
#[derive(Debug)]
pub struct MonthOfYearField;

/// The month-of-year field.
pub static MONTH_OF_YEAR: MonthOfYearField = MonthOfYearField;

impl DateTimeField for MonthOfYearField {
    fn field_type(&self) -> &'static FieldType {
        &types::MONTH_OF_YEAR
    }

    fn get(&self, instant: Instant) -> i64 {
        let (epoch_day, _) = split(instant);
        date_from_epoch_day(epoch_day).1
    }

    fn set_instant(
        &self,
        instant: Instant,
        value: i64,
    ) -> Result<Instant, Error> {
        let (epoch_day, millis_of_day) = split(instant);
        let (year, _, day) = date_from_epoch_day(epoch_day);
        // January 31 moving to a shorter month clamps the day.
        let day = day.min(days_in_month(year, value));
        Ok(instant_at(epoch_day_from_date(year, value, day), millis_of_day))
    }

    fn duration_field(&self) -> &dyn DurationField {
        &MONTHS
    }

    fn range_duration_field(&self) -> Option<&dyn DurationField> {
        Some(&YEARS)
    }

    fn minimum_value(&self) -> i64 {
        1
    }

    fn maximum_value(&self) -> i64 {
        12
    }

    fn round_floor(&self, instant: Instant) -> Instant {
        let (epoch_day, _) = split(instant);
        let (year, month, _) = date_from_epoch_day(epoch_day);
        instant_at(epoch_day_from_date(year, month, 1), 0)
    }

    fn is_leap(&self, instant: Instant) -> bool {
        let (epoch_day, _) = split(instant);
        let (year, month, _) = date_from_epoch_day(epoch_day);
        month == 2 && is_leap_year(year)
    }

    fn leap_amount(&self, instant: Instant) -> i64 {
        i64::from(self.is_leap(instant))
    }

    fn leap_duration_field(&self) -> Option<&dyn DurationField> {
        Some(&DAYS)
    }
}

/// The day-of-month field, `1..=31` with context-dependent maxima.
#[derive(Debug)]
pub struct DayOfMonthField;

/// The day-of-month field.
pub static DAY_OF_MONTH: DayOfMonthField = DayOfMonthField;

impl DateTimeField for DayOfMonthField {
    fn field_type(&self) -> &'static FieldType {
        &types::DAY_OF_MONTH
    }

    fn get(&self, instant: Instant) -> i64 {
        let (epoch_day, _) = split(instant);
        date_from_epoch_day(epoch_day).2
    }

    fn set_instant(
        &self,
        instant: Instant,
        value: i64,
    ) -> Result<Instant, Error> {
        let (epoch_day, millis_of_day) = split(instant);
        let (year, month, _) = date_from_epoch_day(epoch_day);
        Ok(instant_at(epoch_day_from_date(year, month, value), millis_of_day))
    }

    fn duration_field(&self) -> &dyn DurationField {
        &DAYS
    }

    fn range_duration_field(&self) -> Option<&dyn DurationField> {
        Some(&MONTHS)
    }

    fn minimum_value(&self) -> i64 {
        1
    }

    fn maximum_value(&self) -> i64 {
        31
    }

    fn maximum_value_at(&self, instant: Instant) -> i64 {
        let (epoch_day, _) = split(instant);
        let (year, month, _) = date_from_epoch_day(epoch_day);
        days_in_month(year, month)
    }

    fn maximum_value_in(
        &self,
        partial: &dyn Partial,
        values: &[i64],
    ) -> i64 {
        // The partial may or may not know the month and year. Use
        // whatever is present, falling back to the loosest bound.
        let mut month = None;
        let mut year = None;
        for i in 0..partial.size() {
            let ftype = partial.field(i).field_type();
            if ftype == &types::MONTH_OF_YEAR {
                month = Some(values[i]);
            } else if ftype == &types::YEAR {
                year = Some(values[i]);
            }
        }
        match (month, year) {
            (Some(month), Some(year)) => days_in_month(year, month),
            // Without a year, February might be in a leap year.
            (Some(2), None) => 29,
            (Some(month), None) => days_in_month(0, month),
            (None, _) => 31,
        }
    }

    fn round_floor(&self, instant: Instant) -> Instant {
        let (epoch_day, _) = split(instant);
        instant_at(epoch_day, 0)
    }
}

/// A time-of-day field whose unit and enclosing range both span a fixed
/// number of milliseconds.
///
/// One implementation covers all four clock fields; only the unit and
/// range durations differ. The value is read straight out of the
/// instant's position within its range cycle, so `get` works for
/// negative instants too.
#[derive(Debug)]
pub struct ClockField {
    ftype: &'static FieldType,
    unit: &'static PreciseDurationField,
    range: &'static PreciseDurationField,
}

impl ClockField {
    const fn new(
        ftype: &'static FieldType,
        unit: &'static PreciseDurationField,
        range: &'static PreciseDurationField,
    ) -> ClockField {
        ClockField { ftype, unit, range }
    }
}

/// The hour-of-day field, `0..=23`.
pub static HOUR_OF_DAY: ClockField =
    ClockField::new(&types::HOUR_OF_DAY, &HOURS, &DAYS);

/// The minute-of-hour field, `0..=59`.
pub static MINUTE_OF_HOUR: ClockField =
    ClockField::new(&types::MINUTE_OF_HOUR, &MINUTES, &HOURS);

/// The second-of-minute field, `0..=59`.
pub static SECOND_OF_MINUTE: ClockField =
    ClockField::new(&types::SECOND_OF_MINUTE, &SECONDS, &MINUTES);

/// The millis-of-second field, `0..=999`.
pub static MILLIS_OF_SECOND: ClockField =
    ClockField::new(&types::MILLIS_OF_SECOND, &MILLIS, &SECONDS);

impl DateTimeField for ClockField {
    fn field_type(&self) -> &'static FieldType {
        self.ftype
    }

    fn get(&self, instant: Instant) -> i64 {
        instant.as_millis().rem_euclid(self.range.unit_millis())
            / self.unit.unit_millis()
    }

    fn set_instant(
        &self,
        instant: Instant,
        value: i64,
    ) -> Result<Instant, Error> {
        let millis = value
            .checked_sub(self.get(instant))
            .and_then(|delta| delta.checked_mul(self.unit.unit_millis()));
        let Some(millis) = millis else {
            return Err(Error::range(
                self.name(),
                value,
                self.minimum_value(),
                self.maximum_value(),
            ));
        };
        instant.checked_add_millis(millis)
    }

    fn duration_field(&self) -> &dyn DurationField {
        self.unit
    }

    fn range_duration_field(&self) -> Option<&dyn DurationField> {
        Some(self.range)
    }

    fn minimum_value(&self) -> i64 {
        0
    }

    fn maximum_value(&self) -> i64 {
        self.range.unit_millis() / self.unit.unit_millis() - 1
    }

    fn round_floor(&self, instant: Instant) -> Instant {
        let millis = instant.as_millis();
        Instant::from_millis(
            millis - millis.rem_euclid(self.unit.unit_millis()),
        )
    }
}

/// The fixed partial shape of a time of day: hour-of-day,
/// minute-of-hour, second-of-minute, millis-of-second.
///
/// A time of day is cyclic, so
/// [`add_wrap_partial`](DateTimeField::add_wrap_partial) is usually the
/// right addition for it: adding 16 hours to 10:20:30 gives 02:20:30.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeOfDay;

impl Partial for TimeOfDay {
    fn size(&self) -> usize {
        4
    }

    fn field(&self, index: usize) -> &dyn DateTimeField {
        match index {
            0 => &HOUR_OF_DAY,
            1 => &MINUTE_OF_HOUR,
            2 => &SECOND_OF_MINUTE,
            3 => &MILLIS_OF_SECOND,
            _ => panic!("field index {index} out of range for a time of day"),
        }
    }
}

/// The fixed partial shape of a date: year, month-of-year, day-of-month.
#[derive(Clone, Copy, Debug, Default)]
pub struct YearMonthDay;

impl Partial for YearMonthDay {
    fn size(&self) -> usize {
        3
    }

    fn field(&self, index: usize) -> &dyn DateTimeField {
        match index {
            0 => &YEAR,
            1 => &MONTH_OF_YEAR,
            2 => &DAY_OF_MONTH,
            _ => {
                panic!("field index {index} out of range for a year-month-day")
            }
        }
    }
}
