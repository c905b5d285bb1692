//! [`Period`]-related definitions.

use std::{fmt, time::Duration};

use crate::datetime::DateTimeOf;

/// Untyped period of time.
pub type Period = PeriodOf;

/// Half-open period of time `[start, end)`.
pub struct PeriodOf<Of: ?Sized = ()> {
    /// Inclusive start of this period.
    start: DateTimeOf<Of>,

    /// Exclusive end of this period.
    end: DateTimeOf<Of>,
}

impl<Of: ?Sized> PeriodOf<Of> {
    /// Creates a new [`Period`] if the given `start` and `end` form a
    /// non-empty range.
    #[must_use]
    pub fn new(start: DateTimeOf<Of>, end: DateTimeOf<Of>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Creates a new [`Period`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `start` is strictly before the
    /// given `end`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(
        start: DateTimeOf<Of>,
        end: DateTimeOf<Of>,
    ) -> Self {
        Self { start, end }
    }

    /// Returns the inclusive start of this [`Period`].
    #[must_use]
    pub fn start(&self) -> DateTimeOf<Of> {
        self.start
    }

    /// Returns the exclusive end of this [`Period`].
    #[must_use]
    pub fn end(&self) -> DateTimeOf<Of> {
        self.end
    }

    /// Returns the [`Duration`] of this [`Period`].
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Indicates whether this [`Period`] intersects the `other` one.
    ///
    /// Periods sharing only a boundary point do not intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Indicates whether this [`Period`] fully covers the `other` one.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Coerces one kind of [`Period`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> PeriodOf<NewOf> {
        PeriodOf {
            start: self.start.coerce(),
            end: self.end.coerce(),
        }
    }
}

impl<Of: ?Sized> Copy for PeriodOf<Of> {}
impl<Of: ?Sized> Clone for PeriodOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for PeriodOf<Of> {}
impl<Of: ?Sized> PartialEq for PeriodOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<Of: ?Sized> fmt::Debug for PeriodOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodOf")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

#[cfg(test)]
mod spec {
    use super::Period;
    use crate::DateTime;

    fn datetime(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(
            datetime(&format!("2025-01-10T{start}:00Z")),
            datetime(&format!("2025-01-10T{end}:00Z")),
        )
        .unwrap()
    }

    #[test]
    fn requires_non_empty_range() {
        assert!(Period::new(
            datetime("2025-01-10T09:00:00Z"),
            datetime("2025-01-10T17:00:00Z"),
        )
        .is_some());

        assert!(Period::new(
            datetime("2025-01-10T17:00:00Z"),
            datetime("2025-01-10T09:00:00Z"),
        )
        .is_none());

        assert!(Period::new(
            datetime("2025-01-10T09:00:00Z"),
            datetime("2025-01-10T09:00:00Z"),
        )
        .is_none());
    }

    #[test]
    fn overlaps() {
        for (a, b, expected) in [
            (("09:00", "12:00"), ("11:00", "13:00"), true),
            (("09:00", "12:00"), ("12:00", "14:00"), false),
            (("12:00", "14:00"), ("09:00", "12:00"), false),
            (("09:00", "17:00"), ("10:00", "14:00"), true),
            (("10:00", "14:00"), ("09:00", "17:00"), true),
            (("10:00", "14:00"), ("10:00", "14:00"), true),
            (("09:00", "10:00"), ("15:00", "16:00"), false),
        ] {
            let a = period(a.0, a.1);
            let b = period(b.0, b.1);
            assert_eq!(a.overlaps(&b), expected, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn contains() {
        assert!(period("09:00", "17:00").contains(&period("10:00", "14:00")));
        assert!(period("09:00", "17:00").contains(&period("09:00", "17:00")));
        assert!(!period("09:00", "17:00").contains(&period("08:00", "10:00")));
        assert!(!period("10:00", "14:00").contains(&period("09:00", "17:00")));
    }

    #[test]
    fn duration() {
        assert_eq!(
            period("09:00", "17:00").duration(),
            std::time::Duration::from_secs(8 * 60 * 60),
        );
    }
}
