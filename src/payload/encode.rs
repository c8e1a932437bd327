use super::raw::RawJson;
use super::split::{DATAFRAME_SPLIT_KEY, Payload, SplitFrame};
use super::types::Scalar;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// How NaN and infinite cells are written into the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Bare `NaN`, `Infinity` and `-Infinity` tokens (not strict JSON).
    #[default]
    Sentinel,
    /// Written as `null`.
    Null,
    /// Refuse to encode the payload.
    Reject,
}

impl FromStr for NonFinitePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sentinel" => Ok(Self::Sentinel),
            "null" => Ok(Self::Null),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown non-finite policy '{other}' (expected sentinel, null or reject)"
            )),
        }
    }
}

impl fmt::Display for NonFinitePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sentinel => "sentinel",
            Self::Null => "null",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Serializes a payload into the exact bytes sent on the wire.
pub fn encode_payload(payload: &Payload, policy: NonFinitePolicy) -> Result<Vec<u8>> {
    match payload {
        Payload::Raw(raw) => encode_raw(raw, policy),
        Payload::Split(frame) => encode_split(frame, policy),
    }
}

fn encode_raw(raw: &RawJson, policy: NonFinitePolicy) -> Result<Vec<u8>> {
    if raw.non_finite_count() == 0 {
        return Ok(serde_json::to_vec(raw.value())?);
    }
    match policy {
        // caller text already carries the bare tokens
        NonFinitePolicy::Sentinel => Ok(raw.text().as_bytes().to_vec()),
        NonFinitePolicy::Null => Ok(serde_json::to_vec(raw.value())?),
        NonFinitePolicy::Reject => Err(Error::input(format!(
            "Raw JSON payload contains {} non-finite values",
            raw.non_finite_count()
        ))),
    }
}

fn encode_split(frame: &SplitFrame, policy: NonFinitePolicy) -> Result<Vec<u8>> {
    if policy == NonFinitePolicy::Reject {
        reject_non_finite(frame)?;
    }

    let mut out = Vec::with_capacity(64 + frame.data.len() * frame.columns.len() * 8);
    write!(out, "{{\"{DATAFRAME_SPLIT_KEY}\":{{\"columns\":")?;
    serde_json::to_writer(&mut out, &frame.columns)?;
    out.extend_from_slice(b",\"index\":");
    serde_json::to_writer(&mut out, &frame.index)?;
    out.extend_from_slice(b",\"data\":[");
    for (i, row) in frame.data.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        out.push(b'[');
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                out.push(b',');
            }
            write_cell(&mut out, cell, policy)?;
        }
        out.push(b']');
    }
    out.extend_from_slice(b"]}}");
    Ok(out)
}

fn write_cell(out: &mut Vec<u8>, cell: &Scalar, policy: NonFinitePolicy) -> Result<()> {
    match cell {
        Scalar::Float(value) if !value.is_finite() && policy == NonFinitePolicy::Sentinel => {
            out.extend_from_slice(sentinel_token(*value).as_bytes());
        }
        // serde_json writes non-finite floats as null
        _ => serde_json::to_writer(&mut *out, cell)?,
    }
    Ok(())
}

fn sentinel_token(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

fn reject_non_finite(frame: &SplitFrame) -> Result<()> {
    for (row_number, row) in frame.data.iter().enumerate() {
        for (column, cell) in frame.columns.iter().zip(row) {
            if cell.is_non_finite() {
                return Err(Error::input(format!(
                    "Non-finite value in column '{column}' at row {row_number}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Column, Table, build_tabular_payload};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn frame_with_specials() -> SplitFrame {
        let table = Table::new(vec![
            Column::new("text", vec!["a \"quoted\"".into(), "b".into(), "c".into()]),
            Column::new(
                "score",
                vec![
                    Scalar::Float(f64::NAN),
                    Scalar::Float(f64::INFINITY),
                    Scalar::Float(f64::NEG_INFINITY),
                ],
            ),
        ])
        .unwrap();
        build_tabular_payload(&table)
    }

    fn encode_str(payload: &Payload, policy: NonFinitePolicy) -> String {
        String::from_utf8(encode_payload(payload, policy).unwrap()).unwrap()
    }

    #[test]
    fn test_finite_split_is_strict_json() {
        let table = Table::new(vec![
            Column::new("text", vec!["x".into(), Scalar::Null]),
            Column::new("flag", vec![Scalar::Bool(true), Scalar::Bool(false)]),
            Column::new("score", vec![Scalar::Float(1.5), Scalar::Int(-2)]),
        ])
        .unwrap();
        let payload = Payload::dataframe_split(&table);
        let encoded = encode_str(&payload, NonFinitePolicy::Sentinel);

        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed, payload.to_value().unwrap());
        assert_eq!(
            parsed,
            json!({"dataframe_split": {
                "columns": ["text", "flag", "score"],
                "index": [0, 1],
                "data": [["x", true, 1.5], [null, false, -2]]
            }})
        );
    }

    #[test]
    fn test_sentinel_tokens() {
        let encoded = encode_str(
            &Payload::Split(frame_with_specials()),
            NonFinitePolicy::Sentinel,
        );
        assert_eq!(
            encoded,
            r#"{"dataframe_split":{"columns":["text","score"],"index":[0,1,2],"data":[["a \"quoted\"",NaN],["b",Infinity],["c",-Infinity]]}}"#
        );
    }

    #[test]
    fn test_null_policy() {
        let encoded = encode_str(&Payload::Split(frame_with_specials()), NonFinitePolicy::Null);
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed["dataframe_split"]["data"][0][1], Value::Null);
        assert_eq!(parsed["dataframe_split"]["data"][2][1], Value::Null);
    }

    #[test]
    fn test_reject_policy() {
        let err = encode_payload(&Payload::Split(frame_with_specials()), NonFinitePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert!(err.to_string().contains("column 'score' at row 0"));
    }

    #[test]
    fn test_raw_passthrough() {
        let value = json!({"instances": [{"text": "hello"}], "params": {"k": 3}});
        let encoded = encode_payload(&Payload::Raw(value.clone().into()), NonFinitePolicy::Reject).unwrap();
        let parsed: Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(parsed, value);
    }

    fn raw_with_specials() -> Payload {
        Payload::Raw(RawJson::parse(r#"{"inputs": [NaN, 1.0, -Infinity]}"#).unwrap())
    }

    #[test]
    fn test_raw_sentinel_forwards_tokens() {
        assert_eq!(
            encode_str(&raw_with_specials(), NonFinitePolicy::Sentinel),
            r#"{"inputs": [NaN, 1.0, -Infinity]}"#
        );
    }

    #[test]
    fn test_raw_null_policy() {
        let encoded = encode_str(&raw_with_specials(), NonFinitePolicy::Null);
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed, json!({"inputs": [null, 1.0, null]}));
    }

    #[test]
    fn test_raw_reject_policy() {
        let err = encode_payload(&raw_with_specials(), NonFinitePolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert!(err.to_string().contains("2 non-finite values"));
    }

    #[rstest]
    #[case("sentinel", NonFinitePolicy::Sentinel)]
    #[case("NULL", NonFinitePolicy::Null)]
    #[case("Reject", NonFinitePolicy::Reject)]
    fn test_policy_from_str(#[case] input: &str, #[case] expected: NonFinitePolicy) {
        assert_eq!(input.parse::<NonFinitePolicy>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<NonFinitePolicy>().unwrap(), expected);
    }

    #[test]
    fn test_policy_from_str_unknown() {
        assert!("strict".parse::<NonFinitePolicy>().is_err());
    }
}
