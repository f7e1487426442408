//! Binds a template against a validated request value

use serde_json::Value;

use super::template::{FieldPath, Segment, Template};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("request has no value for '{0}'")]
    MissingField(String),
    #[error("'{0}' is not a scalar and cannot be inserted as text")]
    NotScalar(String),
    #[error("'{0}' is not a list and cannot be repeated")]
    NotAList(String),
    #[error("'{0}' refers to a block element outside of a block")]
    OutsideBlock(String),
}

/// Renders templates against request values.
///
/// Values are inserted verbatim: strings without quotes, numbers and
/// booleans in their JSON text form. Lists and objects only appear through
/// `{{#each}}` blocks.
pub struct PromptBinder;

impl PromptBinder {
    pub fn bind(template: &Template, request: &Value) -> Result<String, BindError> {
        let mut out = String::new();
        render(template.segments(), request, None, &mut out)?;
        Ok(out)
    }
}

fn render(
    segments: &[Segment],
    root: &Value,
    element: Option<&Value>,
    out: &mut String,
) -> Result<(), BindError> {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(path) => {
                let value = resolve(path, root, element)?;
                out.push_str(&scalar_text(path, value)?);
            }
            Segment::Each { field, body } => {
                let value = resolve(field, root, element)?;
                let items = value
                    .as_array()
                    .ok_or_else(|| BindError::NotAList(field.to_string()))?;
                for item in items {
                    render(body, root, Some(item), out)?;
                }
            }
        }
    }
    Ok(())
}

fn resolve<'a>(
    path: &FieldPath,
    root: &'a Value,
    element: Option<&'a Value>,
) -> Result<&'a Value, BindError> {
    let (mut value, keys) = if path.is_element() {
        let element = element.ok_or_else(|| BindError::OutsideBlock(path.to_string()))?;
        (element, &path.parts()[1..])
    } else {
        (root, path.parts())
    };

    for key in keys {
        value = value
            .get(key.as_str())
            .filter(|v| !v.is_null())
            .ok_or_else(|| BindError::MissingField(path.to_string()))?;
    }

    Ok(value)
}

fn scalar_text(path: &FieldPath, value: &Value) -> Result<String, BindError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(BindError::NotScalar(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bind(source: &str, request: Value) -> Result<String, BindError> {
        PromptBinder::bind(&Template::parse(source).unwrap(), &request)
    }

    #[test]
    fn test_scalar_substitution_is_verbatim() {
        let rendered = bind(
            "Q: {{question}} ({{marks}} marks, bonus: {{bonus}})",
            json!({ "question": "Is \"5\" < 10?", "marks": 5, "bonus": false }),
        )
        .unwrap();

        assert_eq!(rendered, "Q: Is \"5\" < 10? (5 marks, bonus: false)");
    }

    #[test]
    fn test_repetition_preserves_order() {
        let rendered = bind(
            "Logs:\n{{#each logs}}\n- {{this.timestamp}} {{this.status}}\n{{/each}}\nEnd",
            json!({
                "logs": [
                    { "timestamp": "T1", "status": "present" },
                    { "timestamp": "T2", "status": "tab_switch" },
                    { "timestamp": "T3", "status": "no_face" },
                ]
            }),
        )
        .unwrap();

        assert_eq!(
            rendered,
            "Logs:\n- T1 present\n- T2 tab_switch\n- T3 no_face\nEnd"
        );
    }

    #[test]
    fn test_block_can_reach_root_fields() {
        let rendered = bind(
            "{{#each tags}}{{owner}}:{{this}} {{/each}}",
            json!({ "owner": "ada", "tags": ["a", "b"] }),
        )
        .unwrap();

        assert_eq!(rendered, "ada:a ada:b ");
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let rendered = bind("[{{#each items}}x{{/each}}]", json!({ "items": [] })).unwrap();
        assert_eq!(rendered, "[]");
    }

    #[test]
    fn test_bind_errors() {
        assert_eq!(
            bind("{{missing}}", json!({})),
            Err(BindError::MissingField("missing".to_string()))
        );
        assert_eq!(
            bind("{{items}}", json!({ "items": [1, 2] })),
            Err(BindError::NotScalar("items".to_string()))
        );
        assert_eq!(
            bind("{{#each name}}x{{/each}}", json!({ "name": "ada" })),
            Err(BindError::NotAList("name".to_string()))
        );
        assert_eq!(
            bind("{{this.name}}", json!({ "name": "ada" })),
            Err(BindError::OutsideBlock("this.name".to_string()))
        );
        assert_eq!(
            bind("{{name}}", json!({ "name": null })),
            Err(BindError::MissingField("name".to_string()))
        );
    }
}
