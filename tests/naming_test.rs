//! File naming tables

use cardex::core::naming::{base_name, file_name, number_token};
use cardex::domain::{DateFormat, ImageFormat, NamingConfig, NamingPart, NumberOrder, Numeral};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use test_case::test_case;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(9, 7, 0)
        .unwrap()
}

fn custom(parts: Vec<NamingPart>) -> NamingConfig {
    NamingConfig::Custom { parts }
}

fn prefix(text: &str) -> NamingPart {
    NamingPart::Prefix {
        text: text.to_string(),
    }
}

fn number(order: NumberOrder, zero_start: bool, numeral: Numeral) -> NamingPart {
    NamingPart::Number {
        order,
        zero_start,
        numeral,
    }
}

#[test_case(0, 5, NumberOrder::Asc, false, Numeral::Arabic => "1"; "first ascending")]
#[test_case(4, 5, NumberOrder::Asc, false, Numeral::Arabic => "5"; "last ascending")]
#[test_case(0, 5, NumberOrder::Desc, false, Numeral::Arabic => "5"; "first descending")]
#[test_case(4, 5, NumberOrder::Desc, false, Numeral::Arabic => "1"; "last descending")]
#[test_case(0, 5, NumberOrder::Asc, true, Numeral::Arabic => "00"; "zero start pads")]
#[test_case(4, 5, NumberOrder::Desc, true, Numeral::Arabic => "00"; "zero start descending")]
#[test_case(2, 5, NumberOrder::Asc, false, Numeral::Chinese => "三"; "chinese three")]
#[test_case(0, 1, NumberOrder::Asc, true, Numeral::Chinese => "零"; "chinese zero")]
#[test_case(9, 12, NumberOrder::Asc, false, Numeral::Chinese => "十"; "chinese ten")]
#[test_case(10, 12, NumberOrder::Asc, false, Numeral::Chinese => "11"; "chinese falls back above ten")]
fn test_number_token(
    index: usize,
    total: usize,
    order: NumberOrder,
    zero_start: bool,
    numeral: Numeral,
) -> String {
    number_token(index, total, order, zero_start, numeral)
}

#[test_case(DateFormat::Full => "240105"; "full")]
#[test_case(DateFormat::Short => "0105"; "short")]
#[test_case(DateFormat::Mdy => "010524"; "month day year")]
#[test_case(DateFormat::Dmy => "050124"; "day month year")]
#[test_case(DateFormat::Ymd => "240105"; "year month day")]
fn test_date_part(format: DateFormat) -> String {
    base_name(
        0,
        1,
        &custom(vec![
            NamingPart::Date {
                format,
                include_time: false,
            },
            number(NumberOrder::Asc, false, Numeral::Arabic),
        ]),
        at(),
    )
    .trim_end_matches("_1")
    .to_string()
}

#[test]
fn test_system_mode() {
    let config = NamingConfig::System {
        custom: "launch".to_string(),
    };
    assert_eq!(base_name(2, 3, &config, at()), "Cardex_240105_0907_launch_3");
}

#[test]
fn test_system_mode_with_empty_custom_text_keeps_separator() {
    let config = NamingConfig::System {
        custom: String::new(),
    };
    assert_eq!(base_name(0, 3, &config, at()), "Cardex_240105_0907__1");
}

#[test]
fn test_custom_mode_with_time() {
    let config = custom(vec![
        prefix("deck"),
        NamingPart::Date {
            format: DateFormat::Short,
            include_time: true,
        },
        number(NumberOrder::Asc, false, Numeral::Arabic),
    ]);
    assert_eq!(base_name(0, 2, &config, at()), "deck_0105_0907_1");
}

#[test]
fn test_file_name_uses_format_extension() {
    let config = custom(vec![prefix("deck"), number(NumberOrder::Asc, false, Numeral::Arabic)]);
    assert_eq!(file_name(1, 2, &config, at(), ImageFormat::Png), "deck_2.png");
    assert_eq!(file_name(1, 2, &config, at(), ImageFormat::Jpeg), "deck_2.jpeg");
}

#[test_case(custom(vec![prefix("same")]); "prefix only")]
#[test_case(custom(vec![]); "no parts")]
#[test_case(custom(vec![prefix("x"), number(NumberOrder::Desc, true, Numeral::Chinese)]); "chinese descending")]
#[test_case(NamingConfig::default(); "system mode")]
fn test_names_are_unique_within_a_batch(config: NamingConfig) {
    let total = 15;
    let names: HashSet<String> = (0..total)
        .map(|i| base_name(i, total, &config, at()))
        .collect();
    assert_eq!(names.len(), total);
}
