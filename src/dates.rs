//! Date parsing for I/O collaborators.
//!
//! The core itself only accepts ISO `YYYY-MM-DD`. Loaders may additionally
//! accept US `MM/DD/YYYY` and EU `DD/MM/YYYY`; an explicit [`DateFormat`]
//! switch resolves ambiguous slash dates, with `Auto` defaulting to US and
//! warning once per distinct ambiguous literal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

/// How slash-separated dates are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// ISO `YYYY-MM-DD` only.
    Iso,
    /// `MM/DD/YYYY`.
    Us,
    /// `DD/MM/YYYY`.
    Eu,
    /// ISO first, then US, then EU; ambiguous inputs resolve as US with a
    /// one-time warning.
    #[default]
    Auto,
}

/// A date string that could not be parsed under the configured format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{input}': expected {expected}")]
pub struct DateParseError {
    /// The rejected input.
    pub input: String,
    /// Formats that would have been accepted.
    pub expected: &'static str,
}

/// Stateful date parser.
///
/// Holds the set of ambiguous literals already warned about, so each
/// distinct input warns exactly once per parser instance.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    format: DateFormat,
    warned: HashSet<String>,
}

impl DateParser {
    /// Creates a parser for the given format.
    pub fn new(format: DateFormat) -> Self {
        Self {
            format,
            warned: HashSet::new(),
        }
    }

    /// The configured format.
    pub fn format(&self) -> DateFormat {
        self.format
    }

    /// Distinct ambiguous literals warned about so far.
    pub fn ambiguous_inputs_seen(&self) -> usize {
        self.warned.len()
    }

    /// Parses a date string under the configured format.
    pub fn parse(&mut self, input: &str) -> Result<NaiveDate, DateParseError> {
        let input = input.trim();
        match self.format {
            DateFormat::Iso => parse_with(input, "%Y-%m-%d", "YYYY-MM-DD"),
            DateFormat::Us => parse_with(input, "%m/%d/%Y", "MM/DD/YYYY"),
            DateFormat::Eu => parse_with(input, "%d/%m/%Y", "DD/MM/YYYY"),
            DateFormat::Auto => self.parse_auto(input),
        }
    }

    fn parse_auto(&mut self, input: &str) -> Result<NaiveDate, DateParseError> {
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(date);
        }

        let us = NaiveDate::parse_from_str(input, "%m/%d/%Y").ok();
        let eu = NaiveDate::parse_from_str(input, "%d/%m/%Y").ok();
        match (us, eu) {
            (Some(us_date), Some(eu_date)) => {
                if us_date != eu_date && self.warned.insert(input.to_string()) {
                    warn!(
                        input,
                        resolved = %us_date,
                        "ambiguous date: interpreting as MM/DD/YYYY"
                    );
                }
                Ok(us_date)
            }
            (Some(date), None) | (None, Some(date)) => Ok(date),
            (None, None) => Err(DateParseError {
                input: input.to_string(),
                expected: "YYYY-MM-DD, MM/DD/YYYY, or DD/MM/YYYY",
            }),
        }
    }
}

fn parse_with(
    input: &str,
    fmt: &str,
    expected: &'static str,
) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input, fmt).map_err(|_| DateParseError {
        input: input.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_iso_only() {
        let mut p = DateParser::new(DateFormat::Iso);
        assert_eq!(p.parse("2026-02-01").unwrap(), d("2026-02-01"));
        assert!(p.parse("01/02/2026").is_err());
    }

    #[test]
    fn test_fixed_us_and_eu() {
        let mut us = DateParser::new(DateFormat::Us);
        assert_eq!(us.parse("01/02/2026").unwrap(), d("2026-01-02"));

        let mut eu = DateParser::new(DateFormat::Eu);
        assert_eq!(eu.parse("01/02/2026").unwrap(), d("2026-02-01"));
    }

    #[test]
    fn test_auto_prefers_iso() {
        let mut p = DateParser::new(DateFormat::Auto);
        assert_eq!(p.parse("2026-02-01").unwrap(), d("2026-02-01"));
        assert_eq!(p.ambiguous_inputs_seen(), 0);
    }

    #[test]
    fn test_auto_ambiguous_resolves_us_and_warns_once() {
        // Scenario: "01/02/2026" is valid both ways; US wins.
        let mut p = DateParser::new(DateFormat::Auto);
        assert_eq!(p.parse("01/02/2026").unwrap(), d("2026-01-02"));
        assert_eq!(p.ambiguous_inputs_seen(), 1);

        // Same literal again: no new warning.
        assert_eq!(p.parse("01/02/2026").unwrap(), d("2026-01-02"));
        assert_eq!(p.ambiguous_inputs_seen(), 1);

        // A different ambiguous literal warns separately.
        assert_eq!(p.parse("03/04/2026").unwrap(), d("2026-03-04"));
        assert_eq!(p.ambiguous_inputs_seen(), 2);
    }

    #[test]
    fn test_auto_unambiguous_slash_date() {
        // Day 25 cannot be a month, so only the EU reading parses.
        let mut p = DateParser::new(DateFormat::Auto);
        assert_eq!(p.parse("25/03/2026").unwrap(), d("2026-03-25"));
        assert_eq!(p.ambiguous_inputs_seen(), 0);

        // Only the US reading parses.
        assert_eq!(p.parse("03/25/2026").unwrap(), d("2026-03-25"));
        assert_eq!(p.ambiguous_inputs_seen(), 0);
    }

    #[test]
    fn test_auto_same_date_both_ways_no_warning() {
        // 02/02 reads the same under US and EU; not ambiguous.
        let mut p = DateParser::new(DateFormat::Auto);
        assert_eq!(p.parse("02/02/2026").unwrap(), d("2026-02-02"));
        assert_eq!(p.ambiguous_inputs_seen(), 0);
    }

    #[test]
    fn test_garbage_rejected() {
        let mut p = DateParser::new(DateFormat::Auto);
        let err = p.parse("not-a-date").unwrap_err();
        assert!(err.to_string().contains("not-a-date"));
    }
}
