//! Period calendar.
//!
//! Maps the schedule horizon onto an ordered sequence of equal-length
//! periods. The period length also determines the schedule's period type
//! label (day, week, biweek, month, or custom).

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Label derived from the per-period duration in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// 1-day periods.
    Day,
    /// 7-day periods.
    Week,
    /// 14-day periods.
    Biweek,
    /// 28- to 31-day periods.
    Month,
    /// Any other length.
    Custom,
}

impl PeriodType {
    /// Derives the label from a period length in days.
    pub fn from_length_days(days: u32) -> Self {
        match days {
            1 => Self::Day,
            7 => Self::Week,
            14 => Self::Biweek,
            28..=31 => Self::Month,
            _ => Self::Custom,
        }
    }
}

/// Ordered sequence of equal-length periods covering the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCalendar {
    period_dates: Vec<(NaiveDate, NaiveDate)>,
    period_length_days: u32,
}

impl PeriodCalendar {
    /// Builds a calendar from an inclusive horizon and a period length.
    ///
    /// The horizon span must be a positive multiple of `period_length_days`.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        period_length_days: u32,
    ) -> Result<Self, ConfigError> {
        if period_length_days == 0 {
            return Err(ConfigError::BadHorizon(
                "period_length_days must be >= 1".into(),
            ));
        }
        let span_days = (end_date - start_date).num_days() + 1;
        if span_days <= 0 {
            return Err(ConfigError::BadHorizon(format!(
                "end date {end_date} is before start date {start_date}"
            )));
        }
        if span_days % i64::from(period_length_days) != 0 {
            return Err(ConfigError::BadHorizon(format!(
                "horizon of {span_days} days is not a multiple of the \
                 {period_length_days}-day period length"
            )));
        }

        let num_periods = (span_days / i64::from(period_length_days)) as u64;
        let mut period_dates = Vec::with_capacity(num_periods as usize);
        let mut cursor = start_date;
        for _ in 0..num_periods {
            let period_end = cursor + Days::new(u64::from(period_length_days) - 1);
            period_dates.push((cursor, period_end));
            cursor = period_end + Days::new(1);
        }

        Ok(Self {
            period_dates,
            period_length_days,
        })
    }

    /// Number of periods in the horizon.
    pub fn num_periods(&self) -> usize {
        self.period_dates.len()
    }

    /// Per-period length in days.
    pub fn period_length_days(&self) -> u32 {
        self.period_length_days
    }

    /// The `(start, end)` date pair for every period, in order.
    pub fn period_dates(&self) -> &[(NaiveDate, NaiveDate)] {
        &self.period_dates
    }

    /// First day of the horizon.
    pub fn start_date(&self) -> NaiveDate {
        self.period_dates[0].0
    }

    /// Last day of the horizon.
    pub fn end_date(&self) -> NaiveDate {
        self.period_dates[self.period_dates.len() - 1].1
    }

    /// Index of the period containing a date, or `None` if outside the horizon.
    pub fn period_for_date(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start_date() || date > self.end_date() {
            return None;
        }
        let offset = (date - self.start_date()).num_days() as u64;
        Some((offset / u64::from(self.period_length_days)) as usize)
    }

    /// Every date in a period, in order, or `None` for an out-of-range index.
    pub fn dates_in_period(&self, period: usize) -> Option<Vec<NaiveDate>> {
        let (start, end) = *self.period_dates.get(period)?;
        let mut dates = Vec::with_capacity(self.period_length_days as usize);
        let mut cursor = start;
        while cursor <= end {
            dates.push(cursor);
            cursor = cursor + Days::new(1);
        }
        Some(dates)
    }

    /// Label derived from the period length.
    pub fn period_type(&self) -> PeriodType {
        PeriodType::from_length_days(self.period_length_days)
    }

    /// How many days of a period fall on the given weekdays
    /// (0 = Monday .. 6 = Sunday). `None` days means every day counts.
    pub fn applicable_day_count(
        &self,
        period: usize,
        days: Option<&std::collections::BTreeSet<u8>>,
    ) -> usize {
        let Some(dates) = self.dates_in_period(period) else {
            return 0;
        };
        match days {
            None => dates.len(),
            Some(days) => dates
                .iter()
                .filter(|d| days.contains(&(d.weekday().num_days_from_monday() as u8)))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_calendar_weekly() {
        let cal = PeriodCalendar::new(d("2026-02-02"), d("2026-03-01"), 7).unwrap();
        assert_eq!(cal.num_periods(), 4);
        assert_eq!(cal.period_type(), PeriodType::Week);
        assert_eq!(cal.period_dates()[0], (d("2026-02-02"), d("2026-02-08")));
        assert_eq!(cal.period_dates()[3], (d("2026-02-23"), d("2026-03-01")));
    }

    #[test]
    fn test_bad_horizon() {
        // 10 days is not a multiple of 7
        let err = PeriodCalendar::new(d("2026-02-01"), d("2026-02-10"), 7).unwrap_err();
        assert!(matches!(err, ConfigError::BadHorizon(_)));

        // End before start
        assert!(PeriodCalendar::new(d("2026-02-10"), d("2026-02-01"), 1).is_err());

        // Zero-length periods
        assert!(PeriodCalendar::new(d("2026-02-01"), d("2026-02-10"), 0).is_err());
    }

    #[test]
    fn test_period_for_date() {
        let cal = PeriodCalendar::new(d("2026-02-01"), d("2026-02-14"), 7).unwrap();
        assert_eq!(cal.period_for_date(d("2026-02-01")), Some(0));
        assert_eq!(cal.period_for_date(d("2026-02-07")), Some(0));
        assert_eq!(cal.period_for_date(d("2026-02-08")), Some(1));
        assert_eq!(cal.period_for_date(d("2026-02-14")), Some(1));
        assert_eq!(cal.period_for_date(d("2026-01-31")), None);
        assert_eq!(cal.period_for_date(d("2026-02-15")), None);
    }

    #[test]
    fn test_dates_in_period() {
        let cal = PeriodCalendar::new(d("2026-02-01"), d("2026-02-06"), 3).unwrap();
        let dates = cal.dates_in_period(1).unwrap();
        assert_eq!(
            dates,
            vec![d("2026-02-04"), d("2026-02-05"), d("2026-02-06")]
        );
        assert!(cal.dates_in_period(2).is_none());
    }

    #[test]
    fn test_period_type_derivation() {
        assert_eq!(PeriodType::from_length_days(1), PeriodType::Day);
        assert_eq!(PeriodType::from_length_days(7), PeriodType::Week);
        assert_eq!(PeriodType::from_length_days(14), PeriodType::Biweek);
        assert_eq!(PeriodType::from_length_days(28), PeriodType::Month);
        assert_eq!(PeriodType::from_length_days(30), PeriodType::Month);
        assert_eq!(PeriodType::from_length_days(31), PeriodType::Month);
        assert_eq!(PeriodType::from_length_days(10), PeriodType::Custom);
    }

    #[test]
    fn test_applicable_day_count() {
        // 2026-02-02 is a Monday; one full week.
        let cal = PeriodCalendar::new(d("2026-02-02"), d("2026-02-08"), 7).unwrap();
        let weekend: std::collections::BTreeSet<u8> = [5, 6].into_iter().collect();
        assert_eq!(cal.applicable_day_count(0, Some(&weekend)), 2);
        assert_eq!(cal.applicable_day_count(0, None), 7);

        let weekdays: std::collections::BTreeSet<u8> = (0..5).collect();
        assert_eq!(cal.applicable_day_count(0, Some(&weekdays)), 5);
    }

    #[test]
    fn test_single_day_horizon() {
        let cal = PeriodCalendar::new(d("2026-02-01"), d("2026-02-01"), 1).unwrap();
        assert_eq!(cal.num_periods(), 1);
        assert_eq!(cal.period_type(), PeriodType::Day);
    }
}
