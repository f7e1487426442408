//! Structured prompt templates
//!
//! Template source uses `{{path.to.field}}` for substitution and
//! `{{#each field}} ... {{/each}}` for repetition. Inside a block,
//! `{{this}}` is the current element and `{{this.name}}` one of its fields.
//! A newline directly after a block tag is dropped so that block tags can
//! sit on their own lines.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(
        r"\{\{\s*(?:#each\s+([A-Za-z_][\w.]*)|(/each)|([A-Za-z_][\w.]*))\s*\}\}"
    )
    .expect("template tag pattern");
}

/// Dotted reference to a request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// True when the path starts at the current block element
    pub fn is_element(&self) -> bool {
        self.0.first().map(String::as_str) == Some("this")
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(FieldPath),
    Each { field: FieldPath, body: Vec<Segment> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("block over '{field}' is never closed")]
    UnclosedBlock { field: String },
    #[error("unexpected {{{{/each}}}} at byte {offset}")]
    UnexpectedClose { offset: usize },
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut open: Vec<(FieldPath, Vec<Segment>)> = Vec::new();
        let mut current: Vec<Segment> = Vec::new();
        let mut cursor = 0;
        let mut after_block_tag = false;

        for caps in TAG.captures_iter(source) {
            let Some(tag) = caps.get(0) else { continue };

            let literal = &source[cursor..tag.start()];
            push_literal(&mut current, literal, after_block_tag);
            cursor = tag.end();
            after_block_tag = false;

            if let Some(field) = caps.get(1) {
                open.push((FieldPath::parse(field.as_str()), std::mem::take(&mut current)));
                after_block_tag = true;
            } else if caps.get(2).is_some() {
                let (field, parent) = open
                    .pop()
                    .ok_or(TemplateError::UnexpectedClose { offset: tag.start() })?;
                let body = std::mem::replace(&mut current, parent);
                current.push(Segment::Each { field, body });
                after_block_tag = true;
            } else if let Some(field) = caps.get(3) {
                current.push(Segment::Field(FieldPath::parse(field.as_str())));
            }
        }

        push_literal(&mut current, &source[cursor..], after_block_tag);

        if let Some((field, _)) = open.pop() {
            return Err(TemplateError::UnclosedBlock {
                field: field.to_string(),
            });
        }

        Ok(Self { segments: current })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str, strip_newline: bool) {
    let text = if strip_newline {
        text.strip_prefix("\r\n")
            .or_else(|| text.strip_prefix('\n'))
            .unwrap_or(text)
    } else {
        text
    };

    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        let template = Template::parse("Hello {{name}}, you have {{ account.balance }}.").unwrap();

        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("Hello ".to_string()),
                Segment::Field(FieldPath::parse("name")),
                Segment::Literal(", you have ".to_string()),
                Segment::Field(FieldPath::parse("account.balance")),
                Segment::Literal(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_block_strips_tag_newlines() {
        let template = Template::parse("Items:\n{{#each items}}\n- {{this}}\n{{/each}}\nDone").unwrap();

        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("Items:\n".to_string()),
                Segment::Each {
                    field: FieldPath::parse("items"),
                    body: vec![
                        Segment::Literal("- ".to_string()),
                        Segment::Field(FieldPath::parse("this")),
                        Segment::Literal("\n".to_string()),
                    ],
                },
                Segment::Literal("Done".to_string()),
            ]
        );
    }

    #[test]
    fn test_unbalanced_blocks() {
        assert_eq!(
            Template::parse("{{#each items}} open"),
            Err(TemplateError::UnclosedBlock {
                field: "items".to_string()
            })
        );
        assert_eq!(
            Template::parse("text {{/each}}"),
            Err(TemplateError::UnexpectedClose { offset: 5 })
        );
    }

    #[test]
    fn test_single_braces_are_literal() {
        let template = Template::parse("Reply as {\"motto\": ...}").unwrap();
        assert_eq!(
            template.segments(),
            &[Segment::Literal("Reply as {\"motto\": ...}".to_string())]
        );
    }

    #[test]
    fn test_field_path() {
        let path = FieldPath::parse("this.status");
        assert!(path.is_element());
        assert_eq!(path.parts(), &["this".to_string(), "status".to_string()]);
        assert_eq!(path.to_string(), "this.status");
    }
}
