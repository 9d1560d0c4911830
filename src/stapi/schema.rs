//! Declarative JSON shape descriptions and the validator that interprets them
//!
//! STAPI payloads are loosely typed. Every response passes through [`validate`]
//! before anything downstream reads it, so the rest of the crate only ever sees
//! fully-populated, normalized values.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Expected shape of a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Array(Box<Shape>),
    Object(Vec<(&'static str, Shape)>),
    /// Either a bare value or an array of values; always emitted as an array.
    OneOrMany(Box<Shape>),
}

impl Shape {
    pub fn array(item: Shape) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn object<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Shape)>,
    {
        Self::Object(fields.into_iter().collect())
    }

    pub fn one_or_many(item: Shape) -> Self {
        Self::OneOrMany(Box::new(item))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Array(item) => format!("array<{}>", item.describe()),
            Self::Object(_) => "object".to_string(),
            Self::OneOrMany(item) => {
                let item = item.describe();
                format!("{item} | array<{item}>")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error("missing required field")]
    MissingField,
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },
    #[error("no alternative of {expected} matched")]
    NoUnionMatch { expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed at {path}: {kind}")]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    fn new(path: &str, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
        }
    }
}

/// Checks `value` against `shape` and returns a pruned copy.
///
/// Undeclared object fields are dropped and [`Shape::OneOrMany`] values are
/// normalized to arrays. The first mismatch aborts validation.
pub fn validate(shape: &Shape, value: &Value) -> Result<Value, ValidationError> {
    validate_at(shape, value, "$")
}

fn validate_at(shape: &Shape, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match shape {
        Shape::String => match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(type_mismatch(shape, other, path)),
        },
        Shape::Array(item) => {
            let Value::Array(items) = value else {
                return Err(type_mismatch(shape, value, path));
            };

            items
                .iter()
                .enumerate()
                .map(|(index, element)| validate_at(item, element, &format!("{path}[{index}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Shape::Object(fields) => {
            let Value::Object(object) = value else {
                return Err(type_mismatch(shape, value, path));
            };

            let mut validated = Map::new();
            for (name, field_shape) in fields {
                let field_path = format!("{path}.{name}");
                let field_value = object.get(*name).ok_or_else(|| {
                    ValidationError::new(&field_path, ValidationErrorKind::MissingField)
                })?;
                validated.insert(
                    (*name).to_string(),
                    validate_at(field_shape, field_value, &field_path)?,
                );
            }

            Ok(Value::Object(validated))
        }
        Shape::OneOrMany(item) => {
            if value.is_array() {
                return validate_at(&Shape::Array(item.clone()), value, path);
            }

            // A wrong type at this level matches neither form; deeper errors keep their path.
            validate_at(item, value, path)
                .map(|single| Value::Array(vec![single]))
                .map_err(|err| match &err.kind {
                    ValidationErrorKind::TypeMismatch { .. } if err.path == path => {
                        ValidationError::new(
                            path,
                            ValidationErrorKind::NoUnionMatch {
                                expected: shape.describe(),
                            },
                        )
                    }
                    _ => err,
                })
        }
    }
}

/// Decodes an already-validated value into its typed form.
pub fn decode_validated<T: DeserializeOwned>(validated: Value) -> Result<T, ValidationError> {
    serde_json::from_value(validated).map_err(|err| {
        ValidationError::new(
            "$",
            ValidationErrorKind::TypeMismatch {
                expected: format!("{} ({err})", std::any::type_name::<T>()),
                found: "object",
            },
        )
    })
}

fn type_mismatch(shape: &Shape, value: &Value, path: &str) -> ValidationError {
    ValidationError::new(
        path,
        ValidationErrorKind::TypeMismatch {
            expected: shape.describe(),
            found: json_type_name(value),
        },
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn named() -> Shape {
    Shape::object([("name", Shape::String)])
}

fn titled() -> Shape {
    Shape::object([("title", Shape::String)])
}

/// `GET /character?uid=...` response body.
pub fn character_response_shape() -> Shape {
    Shape::object([(
        "character",
        Shape::object([
            ("name", Shape::String),
            ("characterSpecies", Shape::one_or_many(named())),
            ("performers", Shape::array(named())),
            (
                "episodes",
                Shape::array(Shape::object([
                    ("title", Shape::String),
                    ("series", titled()),
                    ("season", titled()),
                ])),
            ),
            ("movies", Shape::array(titled())),
        ]),
    )])
}

/// `POST /character/search` response body.
pub fn search_response_shape() -> Shape {
    Shape::object([(
        "characters",
        Shape::array(Shape::object([("uid", Shape::String)])),
    )])
}
