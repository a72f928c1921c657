//! Per-column kind inference and typed field parsing.

use crate::options::CsvOptions;
use chrono::{NaiveDate, NaiveDateTime};
use tabula_columnar::{Scalar, ScalarKind};

/// Applies trimming and null-token rules; `None` means the field is null.
pub(crate) fn normalize_field<'a>(field: &'a str, options: &CsvOptions) -> Option<&'a str> {
    let v = if options.trim_fields {
        field.trim()
    } else {
        field
    };
    if v.is_empty() || options.null_tokens.iter().any(|t| t == v) {
        return None;
    }
    Some(v)
}

pub(crate) fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_integer(v: &str) -> Option<i64> {
    let v = v.trim();
    let digits = v.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(v);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    v.parse().ok()
}

pub(crate) fn parse_float(v: &str, options: &CsvOptions) -> Option<f64> {
    let v = v.trim();
    let (negative, body) = match v.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, v.strip_prefix('+').unwrap_or(v)),
    };
    let normalized = normalize_number(body.trim(), options.decimal_separator)?;
    let parsed: f64 = normalized.parse().ok()?;
    Some(if negative { -parsed } else { parsed })
}

/// Rewrites a locale-formatted number into Rust's float syntax, dropping grouping separators.
fn normalize_number(s: &str, decimal_separator: char) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut saw_digit = false;
    let mut saw_decimal = false;
    let mut saw_exp = false;

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            saw_digit = true;
            out.push(ch);
            continue;
        }
        if !saw_exp && ch == decimal_separator {
            if saw_decimal {
                return None;
            }
            saw_decimal = true;
            out.push('.');
            continue;
        }
        if !saw_exp && !saw_decimal && is_grouping_separator(ch, decimal_separator) {
            continue;
        }
        if !saw_exp && matches!(ch, 'e' | 'E') {
            if !saw_digit {
                return None;
            }
            saw_exp = true;
            out.push('e');
            continue;
        }
        // Exponent sign is only valid immediately after `e`.
        if saw_exp && matches!(ch, '+' | '-') && out.ends_with('e') {
            out.push(ch);
            continue;
        }
        return None;
    }

    if !saw_digit || out.ends_with('e') || out.ends_with("e+") || out.ends_with("e-") {
        return None;
    }
    Some(out)
}

fn is_grouping_separator(ch: char, decimal_separator: char) -> bool {
    match decimal_separator {
        '.' => matches!(ch, ',' | '_' | '\u{00A0}' | '\u{202F}'),
        ',' => matches!(ch, '.' | ' ' | '_' | '\u{00A0}' | '\u{202F}'),
        _ => false,
    }
}

pub(crate) fn parse_timestamp(v: &str, options: &CsvOptions) -> Option<NaiveDateTime> {
    let v = v.trim();
    for format in &options.timestamp_formats {
        if let Ok(ts) = NaiveDateTime::parse_from_str(v, format) {
            return Some(ts);
        }
        if let Ok(date) = NaiveDate::parse_from_str(v, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parses a non-null field as `kind`. `None` means it does not parse.
pub(crate) fn parse_as(v: &str, kind: ScalarKind, options: &CsvOptions) -> Option<Scalar> {
    match kind {
        ScalarKind::Boolean => parse_bool(v).map(Scalar::Boolean),
        ScalarKind::Integer => parse_integer(v).map(Scalar::Integer),
        ScalarKind::Float => parse_float(v, options).map(Scalar::from),
        ScalarKind::Timestamp => parse_timestamp(v, options).map(Scalar::Timestamp),
        ScalarKind::Text => Some(Scalar::from(v)),
    }
}

/// Running evidence for one column's kind.
#[derive(Clone, Debug)]
pub(crate) struct KindSniffer {
    samples: usize,
    is_bool: bool,
    saw_word_bool: bool,
    is_integer: bool,
    is_float: bool,
    is_timestamp: bool,
}

impl KindSniffer {
    pub(crate) fn new() -> Self {
        Self {
            samples: 0,
            is_bool: true,
            saw_word_bool: false,
            is_integer: true,
            is_float: true,
            is_timestamp: true,
        }
    }

    pub(crate) fn samples(&self) -> usize {
        self.samples
    }

    /// Records one non-null value.
    pub(crate) fn observe(&mut self, v: &str, options: &CsvOptions) {
        self.samples += 1;
        if self.is_bool {
            match parse_bool(v) {
                Some(_) => {
                    if !matches!(v.trim(), "0" | "1") {
                        self.saw_word_bool = true;
                    }
                }
                None => self.is_bool = false,
            }
        }
        if self.is_integer && parse_integer(v).is_none() {
            self.is_integer = false;
        }
        if self.is_float && parse_float(v, options).is_none() {
            self.is_float = false;
        }
        if self.is_timestamp && parse_timestamp(v, options).is_none() {
            self.is_timestamp = false;
        }
    }

    /// First kind in Boolean, Integer, Float, Timestamp order that every sample parsed as.
    ///
    /// A column of only `0`/`1` is Integer, and a column without samples is Text.
    pub(crate) fn kind(&self) -> ScalarKind {
        if self.samples == 0 {
            ScalarKind::Text
        } else if self.is_bool && self.saw_word_bool {
            ScalarKind::Boolean
        } else if self.is_integer {
            ScalarKind::Integer
        } else if self.is_float {
            ScalarKind::Float
        } else if self.is_timestamp {
            ScalarKind::Timestamp
        } else {
            ScalarKind::Text
        }
    }
}
