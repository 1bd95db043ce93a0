// Utility helpers for parsing and presentation formatting.
//
// All the "dirty" CSV cell handling lives here so the rest of the code can
// assume clean, typed values. Rounding happens only in `format_number`,
// never on values that still feed a computation.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};
use std::iter::Peekable;
use std::str::Chars;

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Plain `YYYY-MM-DD`, or the timestamp form spreadsheets tend to emit.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a serialized label list such as `['Action', "Sci-Fi"]`.
///
/// The grammar is deliberately narrow: a bracketed, comma separated list of
/// single or double quoted strings, with `\\`, `\'` and `\"` as the only
/// escapes and an optional trailing comma. The list must be non-empty and
/// free of blank or repeated labels. Errors are returned as a human readable
/// reason which the loader wraps with the row number.
pub fn parse_label_list(s: &str) -> Result<Vec<String>, String> {
    let inner = s
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| "expected a bracketed list".to_string())?;

    let mut chars = inner.chars().peekable();
    let mut labels: Vec<String> = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(format!("expected a quoted label, found {c:?}")),
        };
        let label = read_quoted(&mut chars, quote)?;
        if label.is_empty() {
            return Err("empty label".to_string());
        }
        if labels.contains(&label) {
            return Err(format!("duplicate label {label:?}"));
        }
        labels.push(label);

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(c) => return Err(format!("expected ',' between labels, found {c:?}")),
        }
    }
    if labels.is_empty() {
        return Err("empty label list".to_string());
    }
    Ok(labels)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, String> {
    let mut label = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(e @ ('\\' | '\'' | '"')) => label.push(e),
                Some(e) => return Err(format!("unsupported escape \\{e}")),
                None => break,
            },
            c if c == quote => return Ok(label.trim().to_string()),
            c => label.push(c),
        }
    }
    Err("unterminated label".to_string())
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond `u128` (or for inf/NaN) keep the digits as printed.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    // `-0.00` reads as noise in a report; only keep the sign if something
    // non-zero survived the rounding.
    let rounded_to_zero = s.chars().all(|c| c == '0' || c == '.');
    if n.is_sign_negative() && !rounded_to_zero {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parses_both_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2019, 4, 26);
        assert_eq!(parse_date_safe(Some("2019-04-26")), expected);
        assert_eq!(parse_date_safe(Some("2019-04-26 00:00:00")), expected);
        assert_eq!(parse_date_safe(Some("26/04/2019")), None);
    }

    #[test]
    fn label_list_accepts_python_style_literals() {
        assert_eq!(
            parse_label_list("['Action', \"Sci-Fi\" ,'Drama',]").unwrap(),
            vec!["Action", "Sci-Fi", "Drama"]
        );
        assert_eq!(
            parse_label_list(r"['Children\'s']").unwrap(),
            vec!["Children's"]
        );
        assert_eq!(parse_label_list("['Crime, Noir']").unwrap(), vec!["Crime, Noir"]);
    }

    #[test]
    fn label_list_rejects_malformed_input() {
        for bad in [
            "",
            "Action",
            "[]",
            "[Action]",
            "['Action'",
            "['Action'] + ['Drama']",
            "['Action' 'Drama']",
            "['Action', 'Action']",
            "['  ']",
            "['Action]",
            "[__import__('os')]",
        ] {
            assert!(parse_label_list(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn formats_with_separators_and_fixed_decimals() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-70.7107, 2), "-70.71");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(5.0, 0), "5");
        assert_eq!(format_int(9855usize), "9,855");
        assert_eq!(format_number(1e20, 2), "100,000,000,000,000,000,000.00");
        assert_eq!(format_number(-2e19, 0), "-20,000,000,000,000,000,000");
    }
}
