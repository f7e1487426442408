//! Contract shapes and runtime shape-checking
//!
//! A [`Contract`] declares the structure a loosely-typed JSON value must have.
//! [`Contract::validate`] is the only way untrusted values enter the typed
//! world: it either returns a normalized copy (declared defaults applied,
//! undeclared fields dropped) or a [`ContractViolation`] naming the offending
//! JSON path.

use serde_json::{json, Map, Value};

/// Structural kind of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A JSON string
    Text,
    /// A JSON number (integer or float)
    Number,
    /// A JSON string restricted to a fixed set of values
    Enum(&'static [&'static str]),
    /// A JSON array whose elements all match the item field
    List(Box<Field>),
    /// A JSON object with the listed fields
    Object(Vec<Field>),
}

/// A named field with its constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
    /// Text must contain a non-whitespace character; lists must have an element
    pub non_empty: bool,
    pub minimum: Option<f64>,
    pub description: Option<&'static str>,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            non_empty: false,
            minimum: None,
            description: None,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Enum(values))
    }

    pub fn list(name: &'static str, item: Field) -> Self {
        Self::new(name, FieldKind::List(Box::new(item)))
    }

    pub fn object(name: &'static str, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::Object(fields))
    }

    /// Reject empty (or whitespace-only) text and empty lists
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Value substituted when the field is absent or null
    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn check(&self, value: &Value, path: &str) -> Result<Value, ContractViolation> {
        match &self.kind {
            FieldKind::Text => {
                let text = value
                    .as_str()
                    .ok_or_else(|| ContractViolation::new(path, "expected a string"))?;
                if self.non_empty && text.trim().is_empty() {
                    return Err(ContractViolation::new(path, "must not be empty"));
                }
                Ok(Value::String(text.to_string()))
            }
            FieldKind::Number => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| ContractViolation::new(path, "expected a number"))?;
                if let Some(minimum) = self.minimum {
                    if number < minimum {
                        return Err(ContractViolation::new(
                            path,
                            format!("must be at least {}", minimum),
                        ));
                    }
                }
                Ok(value.clone())
            }
            FieldKind::Enum(allowed) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| ContractViolation::new(path, "expected a string"))?;
                if !allowed.contains(&text) {
                    return Err(ContractViolation::new(
                        path,
                        format!("expected one of: {}", allowed.join(", ")),
                    ));
                }
                Ok(Value::String(text.to_string()))
            }
            FieldKind::List(item) => {
                let elements = value
                    .as_array()
                    .ok_or_else(|| ContractViolation::new(path, "expected an array"))?;
                if self.non_empty && elements.is_empty() {
                    return Err(ContractViolation::new(path, "must contain at least one element"));
                }
                elements
                    .iter()
                    .enumerate()
                    .map(|(index, element)| item.check(element, &format!("{}[{}]", path, index)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            FieldKind::Object(fields) => {
                let map = value
                    .as_object()
                    .ok_or_else(|| ContractViolation::new(path, "expected an object"))?;
                let mut normalized = Map::new();

                for field in fields {
                    let child_path = format!("{}.{}", path, field.name);
                    match map.get(field.name) {
                        None | Some(Value::Null) => {
                            if let Some(ref default) = field.default {
                                normalized.insert(field.name.to_string(), default.clone());
                            } else if field.required {
                                return Err(ContractViolation::new(
                                    child_path,
                                    "missing required field",
                                ));
                            }
                        }
                        Some(present) => {
                            let checked = field.check(present, &child_path)?;
                            normalized.insert(field.name.to_string(), checked);
                        }
                    }
                }

                Ok(Value::Object(normalized))
            }
        }
    }

    fn schema(&self) -> Value {
        let mut schema = match &self.kind {
            FieldKind::Text => json!({ "type": "string" }),
            FieldKind::Number => match self.minimum {
                Some(minimum) => json!({ "type": "number", "minimum": minimum }),
                None => json!({ "type": "number" }),
            },
            FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
            FieldKind::List(item) => json!({ "type": "array", "items": item.schema() }),
            FieldKind::Object(fields) => {
                let properties: Map<String, Value> = fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.schema()))
                    .collect();
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect();
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false,
                })
            }
        };

        if let Some(object) = schema.as_object_mut() {
            if let Some(description) = self.description {
                object.insert("description".to_string(), json!(description));
            }
            if let Some(ref default) = self.default {
                object.insert("default".to_string(), default.clone());
            }
        }

        schema
    }
}

/// Declared shape of one request or response
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    name: &'static str,
    root: Field,
}

impl Contract {
    pub fn new(name: &'static str, root: Field) -> Self {
        Self { name, root }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn root(&self) -> &Field {
        &self.root
    }

    /// Check `value` against this contract.
    ///
    /// On success the returned value has defaults filled in and any field
    /// the contract does not declare removed.
    pub fn validate(&self, value: &Value) -> Result<Value, ContractViolation> {
        self.root.check(value, "$")
    }

    /// JSON Schema rendering of the contract, as handed to the reasoning service
    pub fn json_schema(&self) -> Value {
        let mut schema = self.root.schema();
        if let Some(object) = schema.as_object_mut() {
            object.insert("title".to_string(), json!(self.name));
        }
        schema
    }
}

/// A value did not match its contract
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{path}: {reason}")]
pub struct ContractViolation {
    /// JSON path of the offending value, e.g. `$[1].status`
    pub path: String,
    pub reason: String,
}

impl ContractViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Contract {
        Contract::new(
            "Person",
            Field::object(
                "person",
                vec![
                    Field::text("name").non_empty(),
                    Field::number("age").minimum(0.0),
                    Field::one_of("role", &["admin", "guest"]),
                    Field::list("tags", Field::text("tag")).default_value(json!([])),
                    Field::text("nickname").optional(),
                ],
            ),
        )
    }

    #[test]
    fn test_valid_value_is_normalized() {
        let value = json!({
            "name": "Ada",
            "age": 36,
            "role": "admin",
            "unexpected": true,
        });

        let normalized = person().validate(&value).unwrap();

        assert_eq!(
            normalized,
            json!({ "name": "Ada", "age": 36, "role": "admin", "tags": [] })
        );
    }

    #[test]
    fn test_missing_required_field() {
        let value = json!({ "name": "Ada", "role": "guest" });
        let err = person().validate(&value).unwrap_err();
        assert_eq!(err.path, "$.age");
        assert_eq!(err.reason, "missing required field");
    }

    #[test]
    fn test_null_counts_as_absent() {
        let value = json!({ "name": "Ada", "age": 1, "role": "guest", "tags": null });
        let normalized = person().validate(&value).unwrap();
        assert_eq!(normalized["tags"], json!([]));
    }

    #[test]
    fn test_enum_outside_declared_set() {
        let value = json!({ "name": "Ada", "age": 1, "role": "root" });
        let err = person().validate(&value).unwrap_err();
        assert_eq!(err.path, "$.role");
        assert!(err.reason.contains("admin, guest"));
    }

    #[test]
    fn test_wrong_primitive_types() {
        let value = json!({ "name": "Ada", "age": "36", "role": "guest" });
        assert_eq!(person().validate(&value).unwrap_err().path, "$.age");

        let value = json!({ "name": 7, "age": 36, "role": "guest" });
        assert_eq!(person().validate(&value).unwrap_err().path, "$.name");
    }

    #[test]
    fn test_non_empty_and_minimum() {
        let value = json!({ "name": "   ", "age": 1, "role": "guest" });
        assert_eq!(
            person().validate(&value).unwrap_err().reason,
            "must not be empty"
        );

        let value = json!({ "name": "Ada", "age": -1, "role": "guest" });
        assert!(person().validate(&value).unwrap_err().reason.contains("at least 0"));
    }

    #[test]
    fn test_list_element_paths() {
        let value = json!({ "name": "Ada", "age": 1, "role": "guest", "tags": ["a", 2] });
        let err = person().validate(&value).unwrap_err();
        assert_eq!(err.path, "$.tags[1]");
    }

    #[test]
    fn test_json_schema() {
        let schema = person().json_schema();

        assert_eq!(schema["title"], "Person");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["name", "age", "role"]));
        assert_eq!(schema["properties"]["role"]["enum"], json!(["admin", "guest"]));
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(schema["properties"]["tags"]["default"], json!([]));
        assert_eq!(schema["properties"]["age"]["minimum"], json!(0.0));
    }
}
