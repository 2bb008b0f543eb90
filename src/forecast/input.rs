//! Request payload validation
//!
//! Rows arrive as loosely typed JSON arrays of
//! `[temperature, humidity, wind_speed, precipitation, direction, pressure, timestamp]`.
//! Numeric fields may be JSON numbers or numeric strings.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::{floor_to_minute, Observation, TIMESTAMP_FORMAT};
use crate::error::{ForecastError, Result};

pub const FIELDS_PER_ROW: usize = 7;

/// Accepted in addition to [`TIMESTAMP_FORMAT`]
const ALTERNATE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a request payload into observations, in payload order
///
/// Returns `InvalidInputShape` unless `data` is a non-empty list of equally
/// long lists of scalars.
pub fn parse_observations(data: &Value) -> Result<Vec<Observation>> {
    let rows = as_matrix(data).ok_or(ForecastError::InvalidInputShape)?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| parse_row(index, row))
        .collect()
}

fn as_matrix(data: &Value) -> Option<Vec<&Vec<Value>>> {
    let rows = data
        .as_array()?
        .iter()
        .map(Value::as_array)
        .collect::<Option<Vec<_>>>()?;

    let width = rows.first()?.len();
    let scalar_cells = rows
        .iter()
        .flat_map(|row| row.iter())
        .all(|cell| !(cell.is_array() || cell.is_object()));

    (scalar_cells && rows.iter().all(|row| row.len() == width)).then_some(rows)
}

fn parse_row(row: usize, fields: &[Value]) -> Result<Observation> {
    if fields.len() != FIELDS_PER_ROW {
        return Err(ForecastError::FieldCount {
            row,
            expected: FIELDS_PER_ROW,
            actual: fields.len(),
        });
    }

    Ok(Observation {
        temperature_c: number(row, "temperature", &fields[0])?,
        humidity_percent: number(row, "humidity", &fields[1])?,
        wind_speed_ms: number(row, "wind_speed", &fields[2])?,
        precipitation_mm: number(row, "precipitation", &fields[3])?,
        wind_direction: fields[4].as_str().map(str::to_string),
        pressure_hpa: number(row, "pressure", &fields[5])?,
        timestamp: timestamp(row, &fields[6])?,
    })
}

fn number(row: usize, field: &'static str, value: &Value) -> Result<f64> {
    let invalid = |reason: String| ForecastError::InvalidObservation { row, field, reason };

    let parsed = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("{n} is not representable as f64")))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(format!("{s:?}: {e}")))?,
        other => return Err(invalid(format!("expected a number, got {other}"))),
    };

    if !parsed.is_finite() {
        return Err(invalid(format!("{value} is not a finite number")));
    }
    Ok(parsed)
}

fn timestamp(row: usize, value: &Value) -> Result<NaiveDateTime> {
    let invalid = |reason: String| ForecastError::InvalidObservation {
        row,
        field: "timestamp",
        reason,
    };

    let text = value
        .as_str()
        .ok_or_else(|| invalid(format!("expected text, got {value}")))?
        .trim();

    std::iter::once(TIMESTAMP_FORMAT)
        .chain(ALTERNATE_TIMESTAMP_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(floor_to_minute)
        .ok_or_else(|| invalid(format!("{text:?} does not match {TIMESTAMP_FORMAT}")))
}
