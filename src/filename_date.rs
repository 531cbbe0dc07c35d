// src/filename_date.rs
//! Timestamp extraction from filenames such as `cv_2024-03-15-09-30-00.pdf`
//! or `report_2023-01-05.pdf`.
//!
//! Separators between fields may be `-` or `_` in any mixture. The first match
//! anywhere in the name wins; ranges are not pre-validated, so a month `13`
//! simply fails instant construction and yields `None`.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

fn re_full() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]{4})[-_]([0-9]{2})[-_]([0-9]{2})[-_]([0-9]{2})[-_]([0-9]{2})[-_]([0-9]{2})")
            .expect("full datetime regex")
    })
}

fn re_date() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]{4})[-_]([0-9]{2})[-_]([0-9]{2})").expect("date-only regex")
    })
}

/// Parse a UTC timestamp out of `name`.
///
/// Tries the full `YYYY-MM-DD-hh-mm-ss` form first, then `YYYY-MM-DD`
/// (midnight UTC). Returns `None` when neither pattern matches or when the
/// matched fields do not form a real instant.
pub fn parse(name: &str) -> Option<DateTime<Utc>> {
    if let Some(caps) = re_full().captures(name) {
        let f = |i: usize| caps[i].parse::<u32>().ok();
        let year = caps[1].parse::<i32>().ok()?;
        return build(year, f(2)?, f(3)?, f(4)?, f(5)?, f(6)?);
    }
    if let Some(caps) = re_date().captures(name) {
        let f = |i: usize| caps[i].parse::<u32>().ok();
        let year = caps[1].parse::<i32>().ok()?;
        return build(year, f(2)?, f(3)?, 0, 0, 0);
    }
    None
}

fn build(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    // 24:00:00 is the end of the day, i.e. next midnight; any other hour 24 is invalid
    let naive = if (h, m, s) == (24, 0, 0) {
        date.succ_opt()?.and_hms_opt(0, 0, 0)?
    } else {
        date.and_hms_opt(h, m, s)?
    };
    Some(naive.and_utc())
}
