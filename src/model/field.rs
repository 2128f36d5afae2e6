//! Field primitives for the CMI data model.
//!
//! Every leaf in the CMI tree is described by a `FieldSpec`: its access
//! mode, whether a first write may materialize a missing collection item,
//! an optional default, the value kind, and any cross-field rules. Specs
//! are `'static` data selected at schema-definition time; the tree holds
//! the runtime values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::DataModelError;

/// Access mode for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Both get and set are allowed.
    ReadWrite,
    /// Set always fails.
    ReadOnly,
    /// Get always fails.
    WriteOnly,
}

/// Value domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any character string.
    Text,
    /// ISO 8601 timestamp.
    Timestamp,
    /// One of a fixed set of tokens.
    State(&'static [&'static str]),
    /// Numeric string in [0, 1]. Only used by read-only fields, so it is
    /// validated eagerly from the seed and never at set time.
    Real01,
}

/// Cross-field rule applied when reading a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRule {
    None,
    /// Derive completed/incomplete from the root completion threshold and
    /// progress measure when both are set.
    CompletionStatus,
}

/// Cross-field rule applied when writing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteRule {
    None,
    /// Reject ids already present among sibling collection items.
    UniqueObjectiveId,
    /// Validate against the owning interaction's type field.
    ResponsePattern,
}

/// Static description of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub access: Access,
    pub creatable: bool,
    pub default: Option<&'static str>,
    pub kind: FieldKind,
    pub read_rule: ReadRule,
    pub write_rule: WriteRule,
}

impl FieldSpec {
    /// Create a read-write field of the given kind with no extras.
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            access: Access::ReadWrite,
            creatable: false,
            default: None,
            kind,
            read_rule: ReadRule::None,
            write_rule: WriteRule::None,
        }
    }

    pub const fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    pub const fn write_only(mut self) -> Self {
        self.access = Access::WriteOnly;
        self
    }

    /// Mark the field as able to materialize a missing collection item on
    /// first write.
    pub const fn creatable(mut self) -> Self {
        self.creatable = true;
        self
    }

    /// Use `value` when the seed does not supply one.
    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn derived(mut self, rule: ReadRule) -> Self {
        self.read_rule = rule;
        self
    }

    pub const fn guarded(mut self, rule: WriteRule) -> Self {
        self.write_rule = rule;
        self
    }
}

impl FieldKind {
    /// Validate a candidate value against this kind's domain.
    pub fn validate(&self, value: &str) -> Result<(), DataModelError> {
        match self {
            FieldKind::Text => Ok(()),
            FieldKind::Timestamp => {
                if is_iso8601(value) {
                    Ok(())
                } else {
                    Err(DataModelError::type_mismatch(format!(
                        "{value} is an invalid date"
                    )))
                }
            }
            FieldKind::State(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(DataModelError::type_mismatch(format!(
                        "{value} is not one of the valid values: {}",
                        allowed.join(", ")
                    )))
                }
            }
            FieldKind::Real01 => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| DataModelError::type_mismatch(format!("{value} is not a number")))?;
                if (0.0..=1.0).contains(&parsed) {
                    Ok(())
                } else {
                    Err(DataModelError::type_mismatch(format!(
                        "{value} is outside [0, 1]"
                    )))
                }
            }
        }
    }

    /// Whether a seed-supplied value is validated at construction time.
    ///
    /// Enumerated and range-bounded fields reject bad seed data outright;
    /// text and timestamp fields are only checked at set time.
    pub fn eager(&self) -> bool {
        matches!(self, FieldKind::State(_) | FieldKind::Real01)
    }
}

/// Check whether a string parses as an ISO 8601 timestamp.
///
/// Accepts a full RFC 3339 timestamp, a naive datetime with or without
/// seconds, or a plain date.
pub fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
