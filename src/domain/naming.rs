//! File naming configuration
//!
//! These types describe how exported files are named. The engine that turns
//! them into names lives in [`crate::core::naming`].

use serde::{Deserialize, Serialize};

/// Naming configuration supplied by the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NamingConfig {
    /// Fixed template: label, date, time, custom text, running index
    System {
        #[serde(default)]
        custom: String,
    },
    /// User-ordered list of parts
    Custom {
        #[serde(default)]
        parts: Vec<NamingPart>,
    },
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig::System {
            custom: String::new(),
        }
    }
}

/// One configurable token of a custom file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamingPart {
    /// Fixed prefix text
    Prefix {
        #[serde(default)]
        text: String,
    },
    /// Export date, optionally followed by the time
    Date {
        #[serde(default)]
        format: DateFormat,
        #[serde(default)]
        include_time: bool,
    },
    /// Free custom text
    Custom {
        #[serde(default)]
        text: String,
    },
    /// Running number
    Number {
        #[serde(default)]
        order: NumberOrder,
        #[serde(default)]
        zero_start: bool,
        #[serde(default)]
        numeral: Numeral,
    },
}

/// Date token layout; every layout uses a 2-digit year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFormat {
    /// yyMMdd
    Full,
    /// MMdd
    Short,
    /// MMddyy
    Mdy,
    /// ddMMyy
    Dmy,
    /// yyMMdd
    #[default]
    Ymd,
}

impl From<String> for DateFormat {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "full" | "dateformatfull" => DateFormat::Full,
            "short" | "dateformatshort" => DateFormat::Short,
            "mdy" | "dateformatmdy" => DateFormat::Mdy,
            "dmy" | "dateformatdmy" => DateFormat::Dmy,
            // "ymd" and anything unrecognized
            _ => DateFormat::Ymd,
        }
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        match value {
            DateFormat::Full => "full",
            DateFormat::Short => "short",
            DateFormat::Mdy => "mdy",
            DateFormat::Dmy => "dmy",
            DateFormat::Ymd => "ymd",
        }
        .to_string()
    }
}

/// Direction of the running number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberOrder {
    /// First card gets the smallest number
    #[default]
    Asc,
    /// First card gets the largest number
    Desc,
}

/// Numeral alphabet for the running number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Numeral {
    /// Decimal digits
    #[default]
    Arabic,
    /// Chinese numerals for 0 through 10, decimal above
    Chinese,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming_config_default_is_system() {
        assert_eq!(
            NamingConfig::default(),
            NamingConfig::System {
                custom: String::new()
            }
        );
    }

    #[test]
    fn test_custom_config_deserialize() {
        let config: NamingConfig = serde_json::from_str(
            r#"{
                "mode": "custom",
                "parts": [
                    {"kind": "prefix", "text": "deck"},
                    {"kind": "date", "format": "dmy", "include_time": true},
                    {"kind": "number", "order": "desc", "numeral": "chinese"}
                ]
            }"#,
        )
        .unwrap();

        let NamingConfig::Custom { parts } = config else {
            panic!("expected custom naming");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[1],
            NamingPart::Date {
                format: DateFormat::Dmy,
                include_time: true
            }
        );
        assert_eq!(
            parts[2],
            NamingPart::Number {
                order: NumberOrder::Desc,
                zero_start: false,
                numeral: Numeral::Chinese
            }
        );
    }

    #[test]
    fn test_unrecognized_date_format_falls_back_to_ymd() {
        let part: NamingPart =
            serde_json::from_str(r#"{"kind": "date", "format": "iso-week"}"#).unwrap();
        assert_eq!(
            part,
            NamingPart::Date {
                format: DateFormat::Ymd,
                include_time: false
            }
        );

        let missing: NamingPart = serde_json::from_str(r#"{"kind": "date"}"#).unwrap();
        assert!(matches!(
            missing,
            NamingPart::Date {
                format: DateFormat::Ymd,
                ..
            }
        ));
    }

    #[test]
    fn test_legacy_date_format_names() {
        assert_eq!(DateFormat::from("dateFormatShort".to_string()), DateFormat::Short);
        assert_eq!(DateFormat::from("dateFormatMDY".to_string()), DateFormat::Mdy);
    }
}
