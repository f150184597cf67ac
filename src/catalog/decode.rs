use serde_json::Value;

/// Read a numeric field the way the catalog tables are filled in by hand:
/// JSON numbers are taken as-is, strings contribute their leading numeric
/// prefix ("180g" -> 180). Missing, null, empty and non-numeric values are
/// `None`, as is anything non-finite.
pub fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_leading_f64(s),
        _ => None,
    }
}

/// Read a text field. Blank strings count as missing.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// Read an identifier column, which may be an integer or a uuid string.
pub fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace.
pub fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = float_prefix_len(s.as_bytes())?;
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Length of the longest `[sign] digits [. digits] [e [sign] digits]` prefix,
/// in one pass. An exponent without digits is left out ("3e" -> "3").
fn float_prefix_len(bytes: &[u8]) -> Option<usize> {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    Some(i)
}
