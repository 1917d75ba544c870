use std::fmt::Write as _;

use crate::{
    CollectorError,
    measurement::{FieldValue, Point},
};

/// Encode a batch as InfluxDB line protocol, one point per line.
///
/// No timestamp is written; the server stamps the points on arrival.
pub fn encode(points: &[Point]) -> Result<String, CollectorError> {
    let mut out = String::new();
    for point in points {
        encode_point(point, &mut out)?;
        out.push('\n');
    }
    Ok(out)
}

fn encode_point(point: &Point, out: &mut String) -> Result<(), CollectorError> {
    if point.fields.is_empty() {
        return Err(CollectorError::write(format!(
            "point `{}` has no fields",
            point.measurement
        )));
    }

    out.push_str(&escape(&point.measurement, &[',', ' ']));
    for (key, value) in &point.tags {
        // empty tag values are not allowed by the server
        if value.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            ",{}={}",
            escape(key, &[',', '=', ' ']),
            escape(value, &[',', '=', ' '])
        );
    }

    for (i, (key, value)) in point.fields.iter().enumerate() {
        out.push(if i == 0 { ' ' } else { ',' });
        out.push_str(&escape(key, &[',', '=', ' ']));
        out.push('=');
        match value {
            FieldValue::Float(v) if !v.is_finite() => {
                return Err(CollectorError::write(format!(
                    "field `{key}` of `{}` is not a finite number",
                    point.measurement
                )));
            }
            FieldValue::Float(v) => {
                let _ = write!(out, "{v}");
            }
            FieldValue::Integer(v) => {
                let _ = write!(out, "{v}i");
            }
        }
    }

    Ok(())
}

fn escape(s: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
