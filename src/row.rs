//! Type-directed decoding of result rows.
//!
//! The caller declares the type of each column positionally. Stored values
//! are coerced the way SQLite's `sqlite3_column_*` accessors coerce them, so
//! decoding never fails: non-numeric text read as an integer is `0`, NULL
//! read as text is the empty string.

use rusqlite::types::ValueRef;
use rusqlite::Row;

/// Decode one column of the current row.
pub trait FromColumn: Sized {
    fn from_column(value: ValueRef<'_>) -> Self;
}

/// Decode the leading columns of the current row into a fixed-shape record.
pub trait FromRow: Sized {
    /// Number of columns consumed, starting at column 0
    const WIDTH: usize;

    fn from_row(row: &Row<'_>) -> Self;
}

// A missing column reads as NULL. Arity is checked before stepping, so this
// only happens if the statement changes shape underneath us.
pub(crate) fn column<T: FromColumn>(row: &Row<'_>, index: usize) -> T {
    T::from_column(row.get_ref(index).unwrap_or(ValueRef::Null))
}

impl FromColumn for i64 {
    fn from_column(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => 0,
            ValueRef::Integer(i) => i,
            ValueRef::Real(r) => r as i64,
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => integer_prefix(bytes),
        }
    }
}

impl FromColumn for i32 {
    fn from_column(value: ValueRef<'_>) -> Self {
        i64::from_column(value) as i32
    }
}

impl FromColumn for f64 {
    fn from_column(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => 0.0,
            ValueRef::Integer(i) => i as f64,
            ValueRef::Real(r) => r,
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => real_prefix(bytes),
        }
    }
}

impl FromColumn for String {
    fn from_column(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => String::new(),
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(r) => real_to_text(r),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }
}

impl<T: FromColumn> FromColumn for Option<T> {
    fn from_column(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => None,
            other => Some(T::from_column(other)),
        }
    }
}

macro_rules! tuple_from_row {
    ($width:expr; $($name:ident $index:tt),+) => {
        impl<$($name: FromColumn),+> FromRow for ($($name,)+) {
            const WIDTH: usize = $width;

            fn from_row(row: &Row<'_>) -> Self {
                ($(column::<$name>(row, $index),)+)
            }
        }
    };
}

tuple_from_row!(1; A 0);
tuple_from_row!(2; A 0, B 1);
tuple_from_row!(3; A 0, B 1, C 2);
tuple_from_row!(4; A 0, B 1, C 2, D 3);
tuple_from_row!(5; A 0, B 1, C 2, D 3, E 4);
tuple_from_row!(6; A 0, B 1, C 2, D 3, E 4, F 5);
tuple_from_row!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
tuple_from_row!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
tuple_from_row!(9; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
tuple_from_row!(10; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
tuple_from_row!(11; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
tuple_from_row!(12; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

// SQLite's whitespace set: space and 0x09..=0x0D.
fn trim_leading_space(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r'))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Optional sign and decimal digits only, saturating on overflow. No prefix
/// reads as 0.
fn integer_prefix(bytes: &[u8]) -> i64 {
    let rest = trim_leading_space(bytes);
    let (negative, digits) = match rest.first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let mut value: i64 = 0;
    for digit in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i64::from(digit - b'0');
        let next = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(digit) } else { v.checked_add(digit) });
        match next {
            Some(next) => value = next,
            None => return if negative { i64::MIN } else { i64::MAX },
        }
    }
    value
}

/// Longest real-number prefix (sign, digits, fraction, exponent). No prefix
/// reads as 0.0.
fn real_prefix(bytes: &[u8]) -> f64 {
    let rest = trim_leading_space(bytes);

    let mut end = 0;
    if matches!(rest.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    end += count_digits(&rest[end..]);
    let mut digits = end - int_start;

    if rest.get(end) == Some(&b'.') {
        let fraction = count_digits(&rest[end + 1..]);
        if digits > 0 || fraction > 0 {
            end += 1 + fraction;
            digits += fraction;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if matches!(rest.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(rest.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&rest[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    std::str::from_utf8(&rest[..end])
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Render a real the way SQLite does (`%!.15g`): 15 significant digits,
/// always with a decimal point or exponent.
fn real_to_text(r: f64) -> String {
    if r.is_nan() {
        return String::new();
    }
    if r.is_infinite() {
        return if r > 0.0 { "Inf".into() } else { "-Inf".into() };
    }
    // Negative zero renders unsigned.
    if r == 0.0 {
        return "0.0".into();
    }

    let scientific = format!("{:.14e}", r);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..15).contains(&exponent) {
        let mantissa = with_point(trim_fraction(mantissa));
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let decimals = (14 - exponent).max(0) as usize;
    with_point(trim_fraction(&format!("{:.*}", decimals, r)))
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn with_point(text: &str) -> String {
    if text.contains('.') {
        text.to_string()
    } else {
        format!("{}.0", text)
    }
}
