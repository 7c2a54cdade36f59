use alloc::vec::Vec;

use crate::{error::Error, field::DateTimeField};

/// An ordered list of fields describing the shape of a partial date-time.
///
/// A partial supports only some fields; a time of day has no year, a
/// year-month-day has no hour. A `Partial` implementation declares which
/// fields those are and their order, which must run from most significant
/// to least significant. The values themselves live in a caller-owned
/// `&mut [i64]` buffer parallel to the field list; the engine reads the
/// shape from the `Partial` and mutates the buffer in place.
///
/// Implementations are expected to be stateless, like the fields they
/// return. Fixed shapes like [`TimeOfDay`](crate::civil::TimeOfDay) are
/// unit structs; [`FieldPartial`] builds a shape from a runtime slice.
pub trait Partial {
    /// Returns the number of fields in this partial.
    fn size(&self) -> usize;

    /// Returns the field at the given index.
    ///
    /// # Panics
    ///
    /// When `index >= self.size()`. The engine validates indices against
    /// [`size`](Partial::size) before calling this.
    fn field(&self, index: usize) -> &dyn DateTimeField;
}

/// A partial shape assembled from a slice of fields at runtime.
///
/// # Example
///
/// ```
/// use timefield::{civil, DateTimeField, FieldPartial};
///
/// let shape = FieldPartial::new(&[
///     &civil::HOUR_OF_DAY,
///     &civil::MINUTE_OF_HOUR,
/// ])?;
/// let mut values = [10, 59];
/// civil::MINUTE_OF_HOUR.add_partial(&shape, 1, &mut values, 1)?;
/// assert_eq!(values, [11, 0]);
/// # Ok::<(), timefield::Error>(())
/// ```
#[derive(Debug)]
pub struct FieldPartial<'f> {
    fields: Vec<&'f dyn DateTimeField>,
}

impl<'f> FieldPartial<'f> {
    /// Creates a partial shape from the given fields, ordered from most
    /// significant to least significant.
    ///
    /// The field list is copied, so the shape may outlive the slice it
    /// was built from.
    ///
    /// # Errors
    ///
    /// When the field list is empty.
    pub fn new(
        fields: &[&'f dyn DateTimeField],
    ) -> Result<FieldPartial<'f>, Error> {
        if fields.is_empty() {
            return Err(Error::construction("partial has no fields"));
        }
        Ok(FieldPartial { fields: fields.to_vec() })
    }
}

impl Partial for FieldPartial<'_> {
    fn size(&self) -> usize {
        self.fields.len()
    }

    fn field(&self, index: usize) -> &dyn DateTimeField {
        self.fields[index]
    }
}
