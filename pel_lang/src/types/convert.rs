//! Value-level conversion execution
//!
//! The conversion matrix is consulted first: a `NotSupported` pair fails
//! before the value is inspected, `SameType` clones, and the remaining
//! modes dispatch to the kind-pair rules below. `RunTimeCheck` pairs are
//! the only ones that can fail on the value itself.

use crate::config::compile_time::runtime::MAX_STRING_RENDER_LENGTH;
use crate::tokens::token::format_number;
use crate::types::kind::TypeKind;
use crate::types::lang_type::ConversionMode;
use crate::types::values::LValue;
use chrono::{NaiveDate, NaiveTime, Timelike, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Conversion failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Conversion from '{from}' to '{to}' is not supported")]
    NotSupported { from: TypeKind, to: TypeKind },

    #[error("Cannot convert {from} value '{value}' to '{to}': {reason}")]
    Failed {
        from: TypeKind,
        to: TypeKind,
        value: String,
        reason: String,
    },

    #[error("Rendered string too long: {length} bytes (max {MAX_STRING_RENDER_LENGTH})")]
    RenderTooLong { length: usize },
}

impl ConversionError {
    fn failed(value: &LValue, to: TypeKind, reason: impl Into<String>) -> Self {
        Self::Failed {
            from: value.kind(),
            to,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convert `value` to the `target` kind per the conversion matrix
pub fn convert(value: &LValue, target: TypeKind) -> Result<LValue, ConversionError> {
    match value.lang_type().conversion_to(target) {
        ConversionMode::NotSupported => Err(ConversionError::NotSupported {
            from: value.kind(),
            to: target,
        }),
        ConversionMode::SameType => Ok(value.clone()),
        ConversionMode::Supported | ConversionMode::RunTimeCheck => apply(value, target),
    }
}

fn apply(value: &LValue, target: TypeKind) -> Result<LValue, ConversionError> {
    // Every row supports the null target
    if target == TypeKind::Null {
        return Ok(LValue::Null);
    }

    match (value, target) {
        // Null converts to the zero value of every kind
        (LValue::Null, TypeKind::Bool) => Ok(LValue::Bool(false)),
        (LValue::Null, TypeKind::Number) => Ok(LValue::Number(0.0)),
        (LValue::Null, TypeKind::String) => Ok(LValue::Str(String::new())),
        (LValue::Null, TypeKind::Date) => Ok(LValue::Date(epoch_date())),
        (LValue::Null, TypeKind::Time) => Ok(LValue::Time(NaiveTime::MIN)),
        (LValue::Null, TypeKind::Array) => Ok(LValue::Array(Vec::new())),
        (LValue::Null, TypeKind::Map) => Ok(LValue::Map(BTreeMap::new())),
        (LValue::Null, TypeKind::Any) => Ok(LValue::Null),

        (LValue::Bool(b), TypeKind::Number) => {
            Ok(LValue::Number(if *b { 1.0 } else { 0.0 }))
        }
        (LValue::Bool(b), TypeKind::String) => Ok(LValue::Str(b.to_string())),

        (LValue::Date(d), TypeKind::Number) => {
            let seconds = d.and_time(NaiveTime::MIN).and_utc().timestamp();
            Ok(LValue::Number(seconds as f64))
        }
        (LValue::Date(_), TypeKind::String) => Ok(LValue::Str(value.to_string())),
        (LValue::Date(_), TypeKind::Time) => Ok(LValue::Time(NaiveTime::MIN)),

        (LValue::Number(n), TypeKind::Bool) => Ok(LValue::Bool(*n != 0.0)),
        (LValue::Number(n), TypeKind::String) => Ok(LValue::Str(format_number(*n))),
        (LValue::Number(n), TypeKind::Date) => {
            if n.fract() != 0.0 {
                return Err(ConversionError::failed(
                    value,
                    target,
                    "epoch seconds must be integral",
                ));
            }
            chrono::DateTime::from_timestamp(*n as i64, 0)
                .map(|dt| LValue::Date(dt.date_naive()))
                .ok_or_else(|| {
                    ConversionError::failed(value, target, "out of the representable date range")
                })
        }
        (LValue::Number(n), TypeKind::Time) => {
            if n.fract() != 0.0 || *n < 0.0 || *n >= 86_400.0 {
                return Err(ConversionError::failed(
                    value,
                    target,
                    "seconds since midnight must be integral and within one day",
                ));
            }
            NaiveTime::from_num_seconds_from_midnight_opt(*n as u32, 0)
                .map(LValue::Time)
                .ok_or_else(|| ConversionError::failed(value, target, "invalid second count"))
        }

        (LValue::Str(s), TypeKind::Bool) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(LValue::Bool(true)),
            "false" => Ok(LValue::Bool(false)),
            _ => Err(ConversionError::failed(
                value,
                target,
                "expected 'true' or 'false'",
            )),
        },
        (LValue::Str(s), TypeKind::Number) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(LValue::Number(n)),
            _ => Err(ConversionError::failed(value, target, "not a number")),
        },
        (LValue::Str(s), TypeKind::Date) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(LValue::Date)
            .map_err(|_| ConversionError::failed(value, target, "expected YYYY-MM-DD")),
        (LValue::Str(s), TypeKind::Time) => {
            let text = s.trim();
            NaiveTime::parse_from_str(text, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .map(LValue::Time)
                .map_err(|_| {
                    ConversionError::failed(value, target, "expected HH:MM or HH:MM:SS")
                })
        }

        // A bare time projects onto the current date
        (LValue::Time(_), TypeKind::Date) => Ok(LValue::Date(Utc::now().date_naive())),
        (LValue::Time(t), TypeKind::Number) => {
            Ok(LValue::Number(t.num_seconds_from_midnight() as f64))
        }
        (LValue::Time(_), TypeKind::String) => Ok(LValue::Str(value.to_string())),

        (LValue::Array(_), TypeKind::String) | (LValue::Map(_), TypeKind::String) => {
            let rendered = value.to_string();
            if rendered.len() > MAX_STRING_RENDER_LENGTH {
                return Err(ConversionError::RenderTooLong {
                    length: rendered.len(),
                });
            }
            Ok(LValue::Str(rendered))
        }

        // The matrix gates which pairs reach here; anything else is a row bug
        _ => Err(ConversionError::NotSupported {
            from: value.kind(),
            to: target,
        }),
    }
}

fn epoch_date() -> NaiveDate {
    chrono::DateTime::<Utc>::UNIX_EPOCH.date_naive()
}
