//! Normalisation helpers for provider payloads
//!
//! Providers disagree on number delimiters, date formats and how money is
//! written ("2.85亿", "3,000万", "123456.78"). These helpers turn all of it
//! into the canonical shapes stored in `lottery_draws`.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::services::prize_rules::{LotteryKind, NumberFormat};

lazy_static! {
    static ref DATE_REGEX: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap();
    static ref NUMBER_SPLIT_REGEX: Regex = Regex::new(r"[\s,]+").unwrap();
}

/// Usual draw time for a game, used when a provider omits it
pub fn default_draw_time(lottery_code: &str) -> NaiveTime {
    match lottery_code {
        "ssq" | "fc3d" | "qlc" => NaiveTime::from_hms_opt(21, 15, 0),
        _ => NaiveTime::from_hms_opt(21, 30, 0),
    }
    .unwrap_or(NaiveTime::MIN)
}

/// Number layout of a game, as seeded in `lottery_types`
pub fn game_format(lottery_code: &str) -> Option<NumberFormat> {
    if let Some(kind) = LotteryKind::from_code(lottery_code) {
        return Some(kind.format());
    }

    let (main_count, main_min, main_max, extra_count, extra_min, extra_max) = match lottery_code {
        "pl3" | "fc3d" => (3, 0, 9, 0, 0, 0),
        "pl5" => (5, 0, 9, 0, 0, 0),
        "qxc" => (7, 0, 9, 0, 0, 0),
        "qlc" => (7, 1, 30, 1, 1, 30),
        _ => return None,
    };

    Some(NumberFormat {
        main_count,
        main_min,
        main_max,
        extra_count,
        extra_min,
        extra_max,
    })
}

fn fits_pool(numbers: &str, count: usize, min: u8, max: u8) -> bool {
    let parsed: Vec<Option<u32>> = numbers.split(',').map(|n| n.trim().parse::<u32>().ok()).collect();
    parsed.len() == count
        && parsed
            .iter()
            .all(|n| matches!(n, Some(n) if (u32::from(min)..=u32::from(max)).contains(n)))
}

/// Check normalised numbers against the game's counts and ranges
///
/// The qlc special number is optional: the backup provider only reports
/// the seven main numbers. Codes without a known layout pass unchecked.
pub fn matches_game_format(lottery_code: &str, main_numbers: &str, extra_numbers: Option<&str>) -> bool {
    let Some(format) = game_format(lottery_code) else {
        return true;
    };

    if !fits_pool(main_numbers, format.main_count, format.main_min, format.main_max) {
        return false;
    }

    match extra_numbers {
        Some(extra) => {
            format.extra_count > 0 && fits_pool(extra, format.extra_count, format.extra_min, format.extra_max)
        }
        None => format.extra_count == 0 || lottery_code == "qlc",
    }
}

/// Turn "19 21 29 32 33" or "19,21,29,32,33" into "19,21,29,32,33"
pub fn normalize_numbers(raw: &str) -> Option<String> {
    let parts: Vec<&str> = NUMBER_SPLIT_REGEX
        .split(raw.trim())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() || parts.iter().any(|p| !p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    Some(parts.join(","))
}

/// Join positional fields ("01", "05", ...) skipping blanks
pub fn join_numbers(fields: &[&str]) -> Option<String> {
    let parts: Vec<&str> = fields
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        normalize_numbers(&parts.join(","))
    }
}

/// Pull the date out of strings like "2026-01-18 星期六"
pub fn extract_date(raw: &str) -> Option<NaiveDate> {
    DATE_REGEX
        .captures(raw)
        .and_then(|cap| NaiveDate::parse_from_str(&cap[1], "%Y-%m-%d").ok())
}

/// Parse a money string into cents
///
/// "2.85亿" -> 28_500_000_000, "3,000万" -> 3_000_000_000, "12.5" -> 1250
pub fn parse_money_cents(raw: &str) -> Option<i64> {
    let clean = raw.replace(',', "");
    let clean = clean.trim().trim_end_matches('元').trim();
    if clean.is_empty() {
        return None;
    }

    let (number, multiplier) = if let Some(n) = clean.strip_suffix('亿') {
        (n, dec!(100000000))
    } else if let Some(n) = clean.strip_suffix('万') {
        (n, dec!(10000))
    } else {
        (clean, Decimal::ONE)
    };

    let value = Decimal::from_str(number.trim()).ok()?;
    value
        .checked_mul(multiplier)
        .and_then(|v| v.checked_mul(dec!(100)))?
        .round()
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_numbers() {
        assert_eq!(
            normalize_numbers("19 21  29 32 33"),
            Some("19,21,29,32,33".to_string())
        );
        assert_eq!(normalize_numbers("06,08"), Some("06,08".to_string()));
        assert_eq!(normalize_numbers(" 1, 2 ,3 "), Some("1,2,3".to_string()));
        assert_eq!(normalize_numbers(""), None);
        assert_eq!(normalize_numbers("1 x 3"), None);
    }

    #[test]
    fn test_join_numbers_skips_blank_fields() {
        assert_eq!(
            join_numbers(&["01", "02", "03", "", " "]),
            Some("01,02,03".to_string())
        );
        assert_eq!(join_numbers(&["", ""]), None);
    }

    #[test]
    fn test_extract_date() {
        assert_eq!(
            extract_date("2026-01-18 星期六"),
            NaiveDate::from_ymd_opt(2026, 1, 18)
        );
        assert_eq!(extract_date("2026-01-18"), NaiveDate::from_ymd_opt(2026, 1, 18));
        assert_eq!(extract_date("yesterday"), None);
    }

    #[test]
    fn test_parse_money_cents() {
        assert_eq!(parse_money_cents("2.85亿"), Some(28_500_000_000));
        assert_eq!(parse_money_cents("3,000万"), Some(3_000_000_000));
        assert_eq!(parse_money_cents("12.5"), Some(1_250));
        assert_eq!(parse_money_cents("1,234元"), Some(123_400));
        assert_eq!(parse_money_cents(""), None);
        assert_eq!(parse_money_cents("--"), None);
        // Overflows Decimal
        assert_eq!(parse_money_cents("9999999999999999999999亿"), None);
        // Fits Decimal but not i64
        assert_eq!(parse_money_cents("99999999999999亿"), None);
    }

    #[test]
    fn test_matches_game_format() {
        assert!(matches_game_format("dlt", "19,21,29,32,33", Some("06,08")));
        assert!(matches_game_format("ssq", "01,05,09,17,25,33", Some("16")));
        assert!(matches_game_format("pl3", "0,8,1", None));
        assert!(matches_game_format("qlc", "01,02,03,04,05,06,07", None));

        // Truncated front zone and a garbled back zone
        assert!(!matches_game_format("dlt", "19,21,29,32", Some("300")));
        assert!(!matches_game_format("dlt", "19,21,29,32,33", Some("300")));
        assert!(!matches_game_format("dlt", "19,21,29,32,33", None));
        assert!(!matches_game_format("ssq", "01,05,09,17,25,34", Some("16")));
        assert!(!matches_game_format("pl3", "1,8,10", None));
        assert!(!matches_game_format("pl5", "1,2,3,4,5", Some("6")));

        assert!(matches_game_format("keno", "1,2,3", None));
    }

    #[test]
    fn test_default_draw_time() {
        assert_eq!(default_draw_time("ssq"), NaiveTime::from_hms_opt(21, 15, 0).unwrap());
        assert_eq!(default_draw_time("dlt"), NaiveTime::from_hms_opt(21, 30, 0).unwrap());
    }
}
