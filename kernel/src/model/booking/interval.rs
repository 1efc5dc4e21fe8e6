use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, AppResult};

/// 半開区間 `[start, end)`。終了時刻そのものは区間に含まれない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::UnprocessableEntity(format!(
                "start time ({start}) must be before end time ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn with_duration(start: DateTime<Utc>, duration: Duration) -> AppResult<Self> {
        Self::new(start, start + duration)
    }

    // 永続化済みの予約から組み立てる場合のみ。CHECK 制約で start < end が保証されている
    pub(crate) fn from_stored(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn is_free_of<'a, I>(&self, booked: I) -> bool
    where
        I: IntoIterator<Item = &'a TimeInterval>,
    {
        booked.into_iter().all(|b| !b.overlaps(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 21, hour, minute, 0).unwrap()
    }

    fn interval(from: (u32, u32), to: (u32, u32)) -> TimeInterval {
        TimeInterval::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_intervals() {
        assert!(TimeInterval::new(at(10, 0), at(10, 0)).is_err());
        assert!(TimeInterval::new(at(11, 0), at(10, 0)).is_err());
        assert!(TimeInterval::with_duration(at(10, 0), Duration::minutes(-5)).is_err());
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let booked = interval((9, 0), (10, 0));
        let next = interval((10, 0), (11, 0));
        assert!(!booked.overlaps(&next));
        assert!(!next.overlaps(&booked));
        assert!(next.is_free_of([&booked]));
    }

    #[test]
    fn partial_and_nested_intervals_overlap() {
        let booked = interval((9, 0), (10, 0));
        assert!(booked.overlaps(&interval((9, 30), (10, 30))));
        assert!(booked.overlaps(&interval((8, 30), (9, 1))));
        assert!(booked.overlaps(&interval((9, 15), (9, 45))));
        assert!(booked.overlaps(&interval((8, 0), (12, 0))));
        assert!(booked.overlaps(&booked));
    }

    #[test]
    fn free_when_no_booking_intersects() {
        let booked = [interval((9, 0), (10, 0)), interval((13, 0), (14, 0))];
        assert!(interval((10, 0), (13, 0)).is_free_of(&booked));
        assert!(!interval((12, 0), (13, 30)).is_free_of(&booked));
        assert!(interval((9, 0), (10, 0)).is_free_of(std::iter::empty()));
    }
}
