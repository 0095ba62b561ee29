//! Axis value → label text.
//!
//! Time axes take calendar patterns built from `YYYY MM DD HH mm ss` style
//! tokens; number axes take numeral patterns such as `0,0.00`, `0%`, `$0.0a`.

use std::fmt::Write as _;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::axis::AxisType;
use super::data::format_plain_number;
use super::extract::{CategoryGroups, millis_to_datetime};

/// Calendar tokens, longest first so `MMMM` wins over `MM`.
const CALENDAR_TOKENS: [(&str, &str); 20] = [
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("A", "%p"),
];

const ABBREVIATIONS: [(f64, &str); 4] = [(1e12, "t"), (1e9, "b"), (1e6, "m"), (1e3, "k")];

/// Text for `value` on an axis.
///
/// Categorical axes look the category up by rounded index (`None` when out of
/// range). Otherwise `format` is applied as a calendar pattern (time axes) or a
/// numeral pattern (number axes); without a format the plain number is used.
#[must_use]
pub fn value_title(
    axis_type: AxisType,
    groups: &CategoryGroups,
    value: f64,
    format: Option<&str>,
) -> Option<String> {
    if axis_type.is_categorical() {
        let index = value.round();
        if !index.is_finite() || index < 0.0 {
            return None;
        }
        return groups.label(index as usize).map(str::to_owned);
    }

    match (axis_type, format) {
        (_, None) => Some(format_plain_number(value)),
        (AxisType::Time, Some(format)) => {
            Some(format_calendar(value, format).unwrap_or_else(|| format_plain_number(value)))
        }
        (_, Some(format)) => Some(format_numeral(value, format)),
    }
}

/// Formats epoch milliseconds with a calendar pattern, in UTC.
///
/// Text inside `[...]` is copied literally.
#[must_use]
pub fn format_calendar(millis: f64, format: &str) -> Option<String> {
    let dt = millis_to_datetime(millis)?;
    let pattern = calendar_to_strftime(format);
    let mut out = String::new();
    write!(out, "{}", dt.format(&pattern)).ok()?;
    Some(out)
}

fn calendar_to_strftime(format: &str) -> String {
    let mut pattern = String::with_capacity(format.len() * 2);
    let mut rest = format;
    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            let literal_end = rest.find(']').unwrap_or(rest.len());
            push_literal(&mut pattern, &rest[1..literal_end]);
            rest = rest.get(literal_end + 1..).unwrap_or("");
            continue;
        }
        for (token, spec) in CALENDAR_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                pattern.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        if let Some(tail) = rest.strip_prefix('a') {
            pattern.push_str("%P");
            rest = tail;
            continue;
        }
        push_literal(&mut pattern, &rest[..ch.len_utf8()]);
        rest = &rest[ch.len_utf8()..];
    }
    pattern
}

fn push_literal(pattern: &mut String, literal: &str) {
    for ch in literal.chars() {
        if ch == '%' {
            pattern.push_str("%%");
        } else {
            pattern.push(ch);
        }
    }
}

/// Parsed numeral pattern like `$0,0.00a`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NumeralPattern {
    prefix: String,
    suffix: String,
    thousands: bool,
    decimals: u32,
    optional_decimals: bool,
    percent: bool,
    abbreviate: bool,
}

impl NumeralPattern {
    fn parse(format: &str) -> Self {
        let is_body = |ch: char| matches!(ch, '0' | '#' | ',' | '.' | '[' | ']');
        let body_start = format.find(['0', '#']).unwrap_or(format.len());
        let body_len = format[body_start..]
            .find(|ch: char| !is_body(ch))
            .unwrap_or(format.len() - body_start);
        let body = &format[body_start..body_start + body_len];
        let prefix = format[..body_start].to_owned();
        let suffix = format[body_start + body_len..].to_owned();

        let (integer_part, fraction_part) = body.split_once('.').unwrap_or((body, ""));
        let optional_decimals = fraction_part.starts_with('[');
        let decimals = fraction_part.chars().filter(|ch| *ch == '0').count() as u32;

        Self {
            percent: suffix.contains('%') || prefix.contains('%'),
            abbreviate: suffix.contains('a'),
            thousands: integer_part.contains(','),
            decimals,
            optional_decimals,
            prefix,
            suffix,
        }
    }
}

/// Formats a number with a numeral pattern.
///
/// Supported: literal prefix/suffix text, `,` thousands grouping, a fixed
/// count of decimals (`[00]` makes them optional), `%` (value × 100), and `a`
/// (k/m/b/t abbreviation). Rounding is half away from zero.
#[must_use]
pub fn format_numeral(value: f64, format: &str) -> String {
    if !value.is_finite() {
        return format_plain_number(value);
    }

    let pattern = NumeralPattern::parse(format);
    let mut scaled = if pattern.percent { value * 100.0 } else { value };

    let mut abbreviation = "";
    if pattern.abbreviate {
        if let Some((divisor, suffix)) = ABBREVIATIONS
            .iter()
            .find(|(divisor, _)| scaled.abs() >= *divisor)
        {
            scaled /= *divisor;
            abbreviation = *suffix;
        }
    }

    let Some(decimal) = Decimal::from_f64(scaled) else {
        return format_plain_number(value);
    };
    let mut rounded =
        decimal.round_dp_with_strategy(pattern.decimals, RoundingStrategy::MidpointAwayFromZero);
    if pattern.optional_decimals {
        rounded = rounded.normalize();
    } else {
        rounded.rescale(pattern.decimals);
    }

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (integer_digits, fraction_digits) = digits
        .split_once('.')
        .unwrap_or((digits.as_str(), ""));
    let integer_digits = if pattern.thousands {
        group_thousands(integer_digits)
    } else {
        integer_digits.to_owned()
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&pattern.prefix);
    out.push_str(&integer_digits);
    if !fraction_digits.is_empty() {
        out.push('.');
        out.push_str(fraction_digits);
    }
    out.push_str(&pattern.suffix.replace('a', abbreviation));
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
