//! Status Event Schema
//!
//! Converts the parsed literal tree into typed events, rejecting any
//! shape the producers are not documented to emit.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::literal::{self, Literal};

/// Scalar payload of a telemetry event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventValue {
    /// Whole-number reading, fixed-point scaled by the producer
    Integer(i64),
    /// Fractional reading
    Float(f64),
    /// Textual payload, numeric for some producer firmwares
    Text(String),
    /// Flag payload, carried by switch-type events
    Boolean(bool),
}

impl EventValue {
    /// Numeric view of the value. Text is accepted when it parses as a
    /// number; booleans never convert.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EventValue::Integer(n) => Some(*n as f64),
            EventValue::Float(f) => Some(*f),
            EventValue::Text(s) => s.trim().parse::<f64>().ok(),
            EventValue::Boolean(_) => None,
        }
    }
}

/// One decoded telemetry event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Signal code, e.g. `cur_voltage` or a vendor variant of it
    pub code: String,
    /// Reported value
    pub value: EventValue,
    /// Event timestamp (Unix ms); some producers omit it
    pub t: Option<i64>,
}

/// Decode a status blob into its event list.
///
/// The blob must be a list of dicts. Each dict needs a string `code` and a
/// scalar `value`; `t` is an optional integer. Unknown keys are ignored and
/// a later duplicate of a key overrides an earlier one.
pub fn decode_events(blob: &str) -> Result<Vec<StatusEvent>, CodecError> {
    let items = match literal::parse(blob)? {
        Literal::List(items) => items,
        _ => return Err(CodecError::NotAList),
    };
    let mut events = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        events.push(decode_event(index, item)?);
    }
    Ok(events)
}

fn decode_event(index: usize, item: Literal) -> Result<StatusEvent, CodecError> {
    let entries = match item {
        Literal::Dict(entries) => entries,
        _ => return Err(CodecError::NotADict { index }),
    };

    let mut code = None;
    let mut value = None;
    let mut t = None;
    for (key, val) in entries {
        let name = match key {
            Literal::Str(name) => name,
            _ => continue,
        };
        match name.as_str() {
            "code" => code = Some(val),
            "value" => value = Some(val),
            "t" => t = Some(val),
            _ => {}
        }
    }

    let code = match code {
        Some(Literal::Str(s)) => s,
        Some(_) => return Err(CodecError::InvalidFieldType { index, field: "code" }),
        None => return Err(CodecError::MissingField { index, field: "code" }),
    };
    let value = match value {
        Some(Literal::Int(n)) => EventValue::Integer(n),
        Some(Literal::Float(f)) => EventValue::Float(f),
        Some(Literal::Str(s)) => EventValue::Text(s),
        Some(Literal::Bool(b)) => EventValue::Boolean(b),
        Some(_) => return Err(CodecError::InvalidFieldType { index, field: "value" }),
        None => return Err(CodecError::MissingField { index, field: "value" }),
    };
    let t = match t {
        Some(Literal::Int(ms)) => Some(ms),
        Some(_) => return Err(CodecError::InvalidFieldType { index, field: "t" }),
        None => None,
    };

    Ok(StatusEvent { code, value, t })
}
