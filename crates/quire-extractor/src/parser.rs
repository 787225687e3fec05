//! Decode oracle replies into typed responses
//!
//! A reply that is not a JSON object fails the call. Inside a valid object,
//! every field or document entry with the wrong shape is recorded as a
//! [`MalformedField`] and skipped; the remainder of the reply is kept.

use crate::error::OracleError;
use crate::types::{DocumentCandidate, MalformedField, OracleResponse, SubjectCandidate};
use quire_domain::{MultiField, ScalarField};
use serde_json::{Map, Value};

/// A decoded reply plus everything that had to be skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    /// Usable part of the reply
    pub response: OracleResponse,

    /// Fields and entries that were dropped
    pub malformed: Vec<MalformedField>,
}

/// Parse a raw oracle reply
pub fn parse_oracle_reply(reply: &str) -> Result<ParsedReply, OracleError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(reply)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| OracleError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| OracleError::InvalidFormat("Expected JSON object".to_string()))?;

    let mut malformed = Vec::new();
    let subject = parse_subject(obj, &mut malformed);
    let documents = parse_documents(obj, &mut malformed);

    Ok(ParsedReply {
        response: OracleResponse { subject, documents },
        malformed,
    })
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, OracleError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(OracleError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence, and the closing one when present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_subject(
    obj: &Map<String, Value>,
    malformed: &mut Vec<MalformedField>,
) -> Option<SubjectCandidate> {
    // a null under one key falls through to the other
    let (key, value) = ["patient", "subject"]
        .into_iter()
        .find_map(|key| obj.get(key).filter(|v| !v.is_null()).map(|v| (key, v)))?;

    let fields = match value {
        Value::Object(fields) => fields,
        _ => {
            malformed.push(MalformedField::new(key, "expected an object"));
            return None;
        }
    };

    let mut candidate = SubjectCandidate::new();

    for field in ScalarField::ALL {
        let location = format!("{}.{}", key, field.key());
        match fields.get(field.key()) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => candidate.set_scalar(field, s.as_str()),
            Some(Value::Number(n)) => candidate.set_scalar(field, n.to_string()),
            Some(_) => malformed.push(MalformedField::new(location, "expected a string")),
        }
    }

    for field in MultiField::ALL {
        for name in [field.key(), multi_field_alias(field)] {
            let location = format!("{}.{}", key, name);
            match fields.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => candidate.push_candidate(field, s.as_str()),
                Some(Value::Array(items)) => {
                    for (idx, item) in items.iter().enumerate() {
                        match item {
                            Value::String(s) => candidate.push_candidate(field, s.as_str()),
                            _ => malformed.push(MalformedField::new(
                                format!("{}[{}]", location, idx),
                                "expected a string",
                            )),
                        }
                    }
                }
                Some(_) => malformed.push(MalformedField::new(
                    location,
                    "expected a string or an array of strings",
                )),
            }
        }
    }

    Some(candidate)
}

fn multi_field_alias(field: MultiField) -> &'static str {
    match field {
        MultiField::PossibleSpecies => "species",
        MultiField::PossibleBreed => "breed",
    }
}

fn parse_documents(
    obj: &Map<String, Value>,
    malformed: &mut Vec<MalformedField>,
) -> Vec<DocumentCandidate> {
    let entries = match obj.get("documents") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            malformed.push(MalformedField::new("documents", "expected an array"));
            return Vec::new();
        }
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match parse_document(idx, entry) {
            Ok(doc) => Some(doc),
            Err(m) => {
                malformed.push(m);
                None
            }
        })
        .collect()
}

/// Parse a single document entry
fn parse_document(idx: usize, json: &Value) -> Result<DocumentCandidate, MalformedField> {
    let location = format!("documents[{}]", idx);

    let obj = json
        .as_object()
        .ok_or_else(|| MalformedField::new(&location, "expected an object"))?;

    let title = obj
        .get("title")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MalformedField::new(format!("{}.title", location), "missing or not a string"))?
        .to_string();

    let start_line = line_number(obj.get("start_line"))
        .ok_or_else(|| MalformedField::new(format!("{}.start_line", location), "missing or not an integer"))?;

    let end_line = line_number(obj.get("end_line"))
        .ok_or_else(|| MalformedField::new(format!("{}.end_line", location), "missing or not an integer"))?;

    if start_line < 0 {
        return Err(MalformedField::new(
            format!("{}.start_line", location),
            format!("negative line number {}", start_line),
        ));
    }
    if end_line < start_line {
        return Err(MalformedField::new(
            location,
            format!("end_line {} before start_line {}", end_line, start_line),
        ));
    }

    Ok(DocumentCandidate {
        title,
        start_line,
        end_line,
    })
}

/// Integer line number; integral floats such as `12.0` are accepted
fn line_number(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}
