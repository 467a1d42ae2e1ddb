// ── Fixed-point number rendering ──
//
// Readings and report statistics are shown with a fixed number of decimals.
// Rounding works on the exact binary value and resolves ties away from zero,
// so `10.125` (exactly representable) becomes `"10.13"` while `1.005`
// (really 1.00499...) becomes `"1.00"`.

/// Placeholder for a missing live reading value.
pub const MISSING_READING: &str = "N/A";

/// Placeholder for a missing report statistic.
pub const MISSING_STAT: &str = "-";

/// Extra digits rendered before rounding; far beyond any f64 tie ambiguity.
const GUARD_DIGITS: usize = 40;

/// Render `value` with exactly `digits` decimals.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }

    let negative = value < 0.0;
    let expanded = format!("{:.*}", digits + GUARD_DIGITS, value.abs());
    let (int_part, frac_part) = expanded.split_once('.').unwrap_or((&expanded, ""));
    let (kept, dropped) = frac_part.split_at_checked(digits).unwrap_or((frac_part, ""));

    let mut buf: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        increment(&mut buf);
    }

    let point = buf.len().saturating_sub(digits);
    let mut out = String::with_capacity(buf.len() + 2);
    if negative {
        out.push('-');
    }
    for (i, d) in buf.iter().enumerate() {
        if i == point && digits > 0 {
            out.push('.');
        }
        out.push(char::from(*d));
    }
    out
}

/// Add one unit in the last place of an ASCII digit string.
fn increment(buf: &mut Vec<u8>) {
    for d in buf.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    buf.insert(0, b'1');
}

/// Live reading value: one decimal, or `"N/A"`.
pub fn reading_value(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_READING.into(), |v| to_fixed(v, 1))
}

/// Report statistic: two decimals, or `"-"`.
pub fn stat_value(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_STAT.into(), |v| to_fixed(v, 2))
}
