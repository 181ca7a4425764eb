// crates/tuf-metadata/src/schema/mod.rs
// ============================================================================
// Module: Metadata Schema Model
// Description: Declarative field rules evaluated over decoded JSON values.
// Purpose: Give every metadata type one composable, testable schema definition.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! A schema is a [`Collection`] of named [`Field`]s, each carrying an ordered
//! list of [`Constraint`] rules. Rules are pure: they inspect a
//! [`serde_json::Value`] and append [`Violation`]s with the dotted field path
//! that failed. Validation never coerces or defaults data.
//!
//! Evaluation stops at the first failing rule of a field (so a type mismatch
//! does not cascade into range errors) but continues across sibling fields, so
//! one pass reports every broken field.
//!
//! Security posture: payloads are untrusted until validated and verified; every
//! rule fails closed on unexpected shapes.

pub mod constraints;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Field Paths
// ============================================================================

/// Dotted path to a field inside a metadata document.
///
/// # Invariants
/// - The root path renders as an empty string.
/// - Sequence elements render as `parent[index]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Returns the document root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Returns the path of a named child field.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() { Self(name.to_string()) } else { Self(format!("{}.{name}", self.0)) }
    }

    /// Returns the path of a sequence element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() { f.write_str("<root>") } else { f.write_str(&self.0) }
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// One failed rule at one field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path of the offending field.
    pub path: FieldPath,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl Violation {
    /// Creates a violation for a path.
    #[must_use]
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Structural validation failure carrying every violation found.
///
/// # Invariants
/// - `violations` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation: {}", render_violations(.violations))]
pub struct SchemaViolation {
    /// Violations in discovery order.
    violations: Vec<Violation>,
}

impl SchemaViolation {
    /// Builds a schema violation from a single failed rule.
    #[must_use]
    pub fn single(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation::new(path, message)],
        }
    }

    /// Returns all violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true when any violation sits at `path` or below it.
    #[must_use]
    pub fn touches(&self, path: &str) -> bool {
        self.violations.iter().any(|violation| {
            let candidate = violation.path.as_str();
            candidate == path
                || candidate
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
        })
    }
}

/// Joins violations into a single diagnostic line.
fn render_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

// ============================================================================
// SECTION: Value Kinds
// ============================================================================

/// Structural value kinds recognised by [`Constraint::Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// JSON `true` / `false`.
    Boolean,
    /// JSON number without a fractional part.
    Integer,
    /// JSON string.
    String,
    /// JSON array.
    Sequence,
    /// JSON object.
    Mapping,
}

impl ValueKind {
    /// Returns a stable label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }

    /// Returns true when `value` is of this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Sequence => value.is_array(),
            Self::Mapping => value.is_object(),
        }
    }
}

/// Describes the actual kind of a value for diagnostics.
fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// ============================================================================
// SECTION: String Formats
// ============================================================================

/// String formats checked by [`Constraint::Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    /// RFC 3339 date-time, e.g. `2030-01-01T00:00:00Z`.
    DateTime,
    /// Metadata format version `1.<minor>.<patch>`.
    SpecVersion,
}

impl StringFormat {
    /// Returns a stable label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateTime => "rfc3339 date-time",
            Self::SpecVersion => "spec version 1.<minor>.<patch>",
        }
    }

    /// Returns true when `text` is in this format.
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        match self {
            Self::DateTime => OffsetDateTime::parse(text, &Rfc3339).is_ok(),
            Self::SpecVersion => {
                let mut parts = text.split('.');
                matches!(
                    (parts.next(), parts.next(), parts.next(), parts.next()),
                    (Some("1"), Some(minor), Some(patch), None)
                        if is_ascii_digits(minor) && is_ascii_digits(patch)
                )
            }
        }
    }
}

/// Returns true for a non-empty run of ASCII digits.
fn is_ascii_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// A single validation rule applied to one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Value must be of the given kind.
    Type(ValueKind),
    /// Strings must contain non-whitespace; collections must be non-empty;
    /// null is blank.
    NotBlank,
    /// Sequence or mapping must hold at least this many entries.
    MinCount(usize),
    /// Integer must be greater than or equal to the bound.
    GreaterThanOrEqual(i64),
    /// Value must equal the given value exactly.
    EqualTo(Value),
    /// String must be in the given format.
    Format(StringFormat),
    /// Every element of a sequence (or every value of a mapping) must pass all
    /// nested rules.
    All(Vec<Self>),
    /// Value must be a mapping satisfying the nested collection.
    Collection(Collection),
}

impl Constraint {
    /// Applies the rule, appending violations. Returns true when it passed.
    fn check(&self, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> bool {
        match self {
            Self::Type(kind) => {
                if kind.matches(value) {
                    return true;
                }
                let message = format!("expected {}, found {}", kind.as_str(), describe(value));
                out.push(Violation::new(path.clone(), message));
                false
            }
            Self::NotBlank => {
                let blank = match value {
                    Value::Null => true,
                    Value::String(text) => text.trim().is_empty(),
                    Value::Array(items) => items.is_empty(),
                    Value::Object(map) => map.is_empty(),
                    Value::Bool(_) | Value::Number(_) => false,
                };
                if blank {
                    out.push(Violation::new(path.clone(), "value must not be blank"));
                }
                !blank
            }
            Self::MinCount(min) => {
                let count = match value {
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    other => {
                        let message =
                            format!("expected a collection to count, found {}", describe(other));
                        out.push(Violation::new(path.clone(), message));
                        return false;
                    }
                };
                if count >= *min {
                    return true;
                }
                let message = format!("expected at least {min} entries, found {count}");
                out.push(Violation::new(path.clone(), message));
                false
            }
            Self::GreaterThanOrEqual(bound) => {
                let passed = match value {
                    Value::Number(number) => match (number.as_i64(), number.as_u64()) {
                        (Some(signed), _) => signed >= *bound,
                        (None, Some(_)) => true,
                        (None, None) => false,
                    },
                    _ => false,
                };
                if !passed {
                    let message = format!("expected integer >= {bound}, found {value}");
                    out.push(Violation::new(path.clone(), message));
                }
                passed
            }
            Self::EqualTo(expected) => {
                if value == expected {
                    return true;
                }
                out.push(Violation::new(path.clone(), format!("expected {expected}, found {value}")));
                false
            }
            Self::Format(format) => {
                let passed = value.as_str().is_some_and(|text| format.matches(text));
                if !passed {
                    let message = format!("expected {}, found {value}", format.as_str());
                    out.push(Violation::new(path.clone(), message));
                }
                passed
            }
            Self::All(rules) => {
                let before = out.len();
                match value {
                    Value::Array(items) => {
                        for (index, item) in items.iter().enumerate() {
                            apply_rules(rules, item, &path.index(index), out);
                        }
                    }
                    Value::Object(map) => {
                        for (key, item) in map {
                            apply_rules(rules, item, &path.child(key), out);
                        }
                    }
                    other => {
                        let message =
                            format!("expected a collection of entries, found {}", describe(other));
                        out.push(Violation::new(path.clone(), message));
                    }
                }
                out.len() == before
            }
            Self::Collection(collection) => {
                let before = out.len();
                collection.check_into(value, path, out);
                out.len() == before
            }
        }
    }
}

/// Applies rules in order, stopping at the first failing rule.
fn apply_rules(rules: &[Constraint], value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    for rule in rules {
        if !rule.check(value, path, out) {
            return;
        }
    }
}

/// Validates a single named value against a rule list.
///
/// # Errors
///
/// Returns [`SchemaViolation`] when any rule fails.
pub fn check_field(
    name: &str,
    rules: &[Constraint],
    value: &Value,
) -> Result<(), SchemaViolation> {
    let mut violations = Vec::new();
    apply_rules(rules, value, &FieldPath::root().child(name), &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaViolation {
            violations,
        })
    }
}

// ============================================================================
// SECTION: Collections
// ============================================================================

/// Whether a collection field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Missing field is a violation.
    Required,
    /// Missing field is accepted; present values are still checked.
    Optional,
}

/// Named field of a [`Collection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name within the parent mapping.
    pub name: String,
    /// Presence requirement.
    pub presence: Presence,
    /// Rules applied in order when the field is present.
    pub rules: Vec<Constraint>,
}

/// Schema for a mapping with named fields.
///
/// # Invariants
/// - Field names are unique; setting a field with an existing name replaces it
///   in place, which is how type schemas extend the base schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Declared fields in declaration order.
    fields: Vec<Field>,
    /// Whether undeclared fields are accepted.
    allow_extra_fields: bool,
}

impl Collection {
    /// Creates an empty, strict collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a required field.
    #[must_use]
    pub fn required(mut self, name: &str, rules: Vec<Constraint>) -> Self {
        self.set_field(Field {
            name: name.to_string(),
            presence: Presence::Required,
            rules,
        });
        self
    }

    /// Adds or replaces an optional field.
    #[must_use]
    pub fn optional(mut self, name: &str, rules: Vec<Constraint>) -> Self {
        self.set_field(Field {
            name: name.to_string(),
            presence: Presence::Optional,
            rules,
        });
        self
    }

    /// Accepts fields that are not declared.
    #[must_use]
    pub fn allow_extra_fields(mut self) -> Self {
        self.allow_extra_fields = true;
        self
    }

    /// Inserts a field, replacing any field with the same name.
    pub fn set_field(&mut self, field: Field) {
        if let Some(existing) = self.fields.iter_mut().find(|item| item.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
    }

    /// Returns the declared field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Validates a value rooted at the document root.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] listing every violated field.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, &FieldPath::root())
    }

    /// Validates a value located at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] listing every violated field.
    pub fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<(), SchemaViolation> {
        let mut violations = Vec::new();
        self.check_into(value, path, &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation {
                violations,
            })
        }
    }

    /// Appends violations for `value` at `path`.
    fn check_into(&self, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
        let Value::Object(map) = value else {
            out.push(Violation::new(
                path.clone(),
                format!("expected mapping, found {}", describe(value)),
            ));
            return;
        };
        for field in &self.fields {
            let field_path = path.child(&field.name);
            match (map.get(&field.name), field.presence) {
                (Some(item), _) => apply_rules(&field.rules, item, &field_path, out),
                (None, Presence::Required) => {
                    out.push(Violation::new(field_path, "required field is missing"));
                }
                (None, Presence::Optional) => {}
            }
        }
        if !self.allow_extra_fields {
            for key in map.keys() {
                if self.field(key).is_none() {
                    out.push(Violation::new(path.child(key), "unexpected field"));
                }
            }
        }
    }
}
