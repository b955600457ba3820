// File: ./src/range.rs
// Day-granularity interval math and the visible grid window
use crate::error::RangeError;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar days. A single-day item has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// What to do with a range whose start falls after its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvertedRangePolicy {
    /// Collapse to the anchor day (the end bound).
    #[default]
    Collapse,
    Reject,
    Swap,
}

impl DateRange {
    /// Builds a range, failing if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Builds a range from two independently edited bounds, resolving an
    /// inverted pair according to `policy`.
    pub fn from_bounds(
        start: NaiveDate,
        end: NaiveDate,
        policy: InvertedRangePolicy,
    ) -> Result<Self, RangeError> {
        if start <= end {
            return Ok(Self { start, end });
        }
        match policy {
            InvertedRangePolicy::Collapse => {
                log::debug!("collapsing inverted range {start}..{end} onto {end}");
                Ok(Self::single(end))
            }
            InvertedRangePolicy::Swap => {
                log::debug!("swapping inverted range {start}..{end}");
                Ok(Self {
                    start: end,
                    end: start,
                })
            }
            InvertedRangePolicy::Reject => Err(RangeError::Inverted { start, end }),
        }
    }

    /// Inclusive on both ends.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Moves both bounds by `n` days. Saturates at chrono's date limits.
    pub fn shift_days(&self, n: i64) -> Self {
        Self {
            start: shift_date(self.start, n),
            end: shift_date(self.end, n),
        }
    }

    /// Returns `self` when ordered, otherwise `previous`.
    /// A resized edge may not cross the opposite edge.
    pub fn clamp_start_before_end(self, previous: DateRange) -> DateRange {
        if self.start > self.end { previous } else { self }
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Number of days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

pub fn shift_date(day: NaiveDate, n: i64) -> NaiveDate {
    let shifted = if n >= 0 {
        day.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        day.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(if n >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// First day of the week containing `day`.
pub fn week_start_of(day: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = (7 + day.weekday().num_days_from_monday()
        - week_start.weekday().num_days_from_monday())
        % 7;
    shift_date(day, -(offset as i64))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Hour,
}

/// The days currently shown on the grid. With `Granularity::Day` the
/// occupancy index answers whole-day queries only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub granularity: Granularity,
}

impl VisibleWindow {
    pub fn new(
        first_day: NaiveDate,
        last_day: NaiveDate,
        granularity: Granularity,
    ) -> Result<Self, RangeError> {
        DateRange::new(first_day, last_day)?;
        Ok(Self {
            first_day,
            last_day,
            granularity,
        })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            first_day: day,
            last_day: day,
            granularity: Granularity::Hour,
        }
    }

    /// Seven-day window containing `day`.
    pub fn week_of(day: NaiveDate, week_start: WeekStart, granularity: Granularity) -> Self {
        let first_day = week_start_of(day, week_start);
        Self {
            first_day,
            last_day: shift_date(first_day, 6),
            granularity,
        }
    }

    /// Whole weeks covering the month containing `day`, as a month grid shows them.
    pub fn month_grid_of(day: NaiveDate, week_start: WeekStart) -> Self {
        let first_of_month = day.with_day(1).unwrap_or(day);
        let last_of_month = last_day_of_month(day);
        let first_day = week_start_of(first_of_month, week_start);
        let last_day = shift_date(week_start_of(last_of_month, week_start), 6);
        Self {
            first_day,
            last_day,
            granularity: Granularity::Day,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day,
            end: self.last_day,
        }
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.range().contains_day(day)
    }

    /// An item is in view iff its range intersects the window.
    pub fn shows(&self, range: &DateRange) -> bool {
        self.range().overlaps(range)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day;
        self.first_day.iter_days().take_while(move |d| *d <= last)
    }
}

pub fn last_day_of_month(day: NaiveDate) -> NaiveDate {
    let (y, m) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(day)
}
