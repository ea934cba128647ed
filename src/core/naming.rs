//! File naming engine
//!
//! Turns `(index, total, naming configuration, timestamp)` into a file base
//! name. Everything here is pure: the same inputs always give the same name,
//! so concurrently rendered cards can never collide, whatever order they
//! finish in.

use crate::domain::{DateFormat, ImageFormat, NamingConfig, NamingPart, NumberOrder, Numeral};
use chrono::NaiveDateTime;

/// Separator placed between name segments
pub const SEPARATOR: &str = "_";

/// Fixed label leading every system-mode name
pub const SYSTEM_LABEL: &str = "Cardex";

const CHINESE_NUMERALS: [&str; 11] = [
    "零", "一", "二", "三", "四", "五", "六", "七", "八", "九", "十",
];

/// Computes the base name (no extension) of the card at `index`
///
/// # Examples
///
/// ```
/// use cardex::core::naming::base_name;
/// use cardex::domain::{NamingConfig, NamingPart, NumberOrder, Numeral};
/// use chrono::NaiveDate;
///
/// let at = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap().and_hms_opt(14, 5, 0).unwrap();
/// let config = NamingConfig::Custom {
///     parts: vec![
///         NamingPart::Prefix { text: "deck".into() },
///         NamingPart::Number { order: NumberOrder::Desc, zero_start: false, numeral: Numeral::Arabic },
///     ],
/// };
/// assert_eq!(base_name(0, 5, &config, at), "deck_5");
/// ```
pub fn base_name(index: usize, total: usize, config: &NamingConfig, at: NaiveDateTime) -> String {
    match config {
        NamingConfig::System { custom } => [
            SYSTEM_LABEL.to_string(),
            date_token(at, DateFormat::Ymd),
            time_token(at),
            sanitize_segment(custom),
            (index + 1).to_string(),
        ]
        .join(SEPARATOR),
        NamingConfig::Custom { parts } => {
            let mut segments: Vec<String> = parts
                .iter()
                .map(|part| part_token(part, index, total, at))
                .filter(|segment| !segment.is_empty())
                .collect();

            // Without a number part every card would share one name
            if !parts
                .iter()
                .any(|part| matches!(part, NamingPart::Number { .. }))
            {
                segments.push((index + 1).to_string());
            }

            segments.join(SEPARATOR)
        }
    }
}

/// Computes the full file name including the format extension
pub fn file_name(
    index: usize,
    total: usize,
    config: &NamingConfig,
    at: NaiveDateTime,
    format: ImageFormat,
) -> String {
    format!(
        "{}.{}",
        base_name(index, total, config, at),
        format.extension()
    )
}

/// Names every card of one job with a shared timestamp
#[derive(Debug, Clone)]
pub struct FileNamer {
    config: NamingConfig,
    at: NaiveDateTime,
    format: ImageFormat,
}

impl FileNamer {
    /// Creates a namer for one job
    pub fn new(config: NamingConfig, at: NaiveDateTime, format: ImageFormat) -> Self {
        Self { config, at, format }
    }

    /// Full file name of the card at `index`
    pub fn name(&self, index: usize, total: usize) -> String {
        file_name(index, total, &self.config, self.at, self.format)
    }
}

fn part_token(part: &NamingPart, index: usize, total: usize, at: NaiveDateTime) -> String {
    match part {
        NamingPart::Prefix { text } | NamingPart::Custom { text } => sanitize_segment(text),
        NamingPart::Date {
            format,
            include_time,
        } => {
            let date = date_token(at, *format);
            if *include_time {
                format!("{date}{SEPARATOR}{}", time_token(at))
            } else {
                date
            }
        }
        NamingPart::Number {
            order,
            zero_start,
            numeral,
        } => number_token(index, total, *order, *zero_start, *numeral),
    }
}

/// Compact date token with a 2-digit year and zero-padded month and day
pub fn date_token(at: NaiveDateTime, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Full | DateFormat::Ymd => "%y%m%d",
        DateFormat::Short => "%m%d",
        DateFormat::Mdy => "%m%d%y",
        DateFormat::Dmy => "%d%m%y",
    };
    at.format(pattern).to_string()
}

/// Compact `HHmm` time token
pub fn time_token(at: NaiveDateTime) -> String {
    at.format("%H%M").to_string()
}

/// Running number token
pub fn number_token(
    index: usize,
    total: usize,
    order: NumberOrder,
    zero_start: bool,
    numeral: Numeral,
) -> String {
    let mut n = match order {
        NumberOrder::Asc => index,
        NumberOrder::Desc => total.saturating_sub(1).saturating_sub(index),
    };
    if !zero_start {
        n += 1;
    }

    match numeral {
        Numeral::Chinese => CHINESE_NUMERALS
            .get(n)
            .map(|s| s.to_string())
            .unwrap_or_else(|| n.to_string()),
        Numeral::Arabic if zero_start => format!("{n:02}"),
        Numeral::Arabic => n.to_string(),
    }
}

/// Replaces characters that are not allowed in file names
pub fn sanitize_segment(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}
