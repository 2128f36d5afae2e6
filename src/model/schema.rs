//! Static schema for the standardized CMI attribute namespace.
//!
//! The tree shape is fixed data: aggregates map child names to node specs,
//! collections describe the shape of their items. Instances in
//! [`crate::model::tree`] mirror this structure with runtime values.

use crate::model::field::{FieldKind, FieldSpec, ReadRule, WriteRule};

/// Name of the schema root, the first segment of every element path.
pub const ROOT_NAME: &str = "cmi";

/// Static description of any node in the CMI tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeSpec {
    Field(FieldSpec),
    Aggregate(&'static AggregateSpec),
    Collection(CollectionSpec),
}

/// Fixed mapping from child name to child spec, in schema order.
#[derive(Debug)]
pub struct AggregateSpec {
    pub children: &'static [(&'static str, NodeSpec)],
}

impl AggregateSpec {
    /// Look up a child spec by name.
    pub fn child(&self, name: &str) -> Option<&'static NodeSpec> {
        self.children
            .iter()
            .find(|(child, _)| *child == name)
            .map(|(_, spec)| spec)
    }

    /// Comma-joined child names, the `_children` pseudo-field value.
    pub fn children_list(&self) -> String {
        self.children
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// An append-extendable sequence of same-shaped items.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub item: &'static AggregateSpec,
}

// Allowed token sets, as the standard defines them.
const COMPLETION_STATES: &[&str] = &["completed", "incomplete", "not attempted", "unknown"];
const SUCCESS_STATES: &[&str] = &["passed", "failed", "unknown"];
const CREDIT_STATES: &[&str] = &["credit", "no-credit"];
const ENTRY_STATES: &[&str] = &["ab-initio", "resume", ""];
const EXIT_STATES: &[&str] = &["time-out", "suspend", "logout", "normal", ""];
const MODE_STATES: &[&str] = &["browse", "normal", "review"];
const INTERACTION_TYPES: &[&str] = &[
    "true-false",
    "choice",
    "fill-in",
    "long-fill-in",
    "likert",
    "matching",
    "performance",
    "sequencing",
    "numeric",
    "other",
];

/// A learner comment record. New records are created by writing any of the
/// three children.
static COMMENT_FROM_LEARNER: AggregateSpec = AggregateSpec {
    children: &[
        (
            "comment",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text).creatable()),
        ),
        (
            "location",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text).creatable()),
        ),
        (
            "timestamp",
            NodeSpec::Field(FieldSpec::new(FieldKind::Timestamp).creatable()),
        ),
    ],
};

/// An LMS comment record, fully read-only and only ever seeded.
static COMMENT_FROM_LMS: AggregateSpec = AggregateSpec {
    children: &[
        (
            "comment",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text).read_only()),
        ),
        (
            "location",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text).read_only()),
        ),
        (
            "timestamp",
            NodeSpec::Field(FieldSpec::new(FieldKind::Timestamp).read_only()),
        ),
    ],
};

/// A root-level objective record.
static OBJECTIVE: AggregateSpec = AggregateSpec {
    children: &[
        (
            "id",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text).creatable()),
        ),
        (
            "progress_measure",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text)),
        ),
        (
            "completion_status",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::State(COMPLETION_STATES))
                    .with_default("unknown")
                    .derived(ReadRule::CompletionStatus),
            ),
        ),
    ],
};

/// An objective reference under an interaction. Ids must be unique within
/// the owning collection.
static INTERACTION_OBJECTIVE: AggregateSpec = AggregateSpec {
    children: &[(
        "id",
        NodeSpec::Field(
            FieldSpec::new(FieldKind::Text)
                .creatable()
                .guarded(WriteRule::UniqueObjectiveId),
        ),
    )],
};

/// A correct-response record. Pattern validity depends on the owning
/// interaction's type.
static CORRECT_RESPONSE: AggregateSpec = AggregateSpec {
    children: &[(
        "pattern",
        NodeSpec::Field(
            FieldSpec::new(FieldKind::Text)
                .creatable()
                .guarded(WriteRule::ResponsePattern),
        ),
    )],
};

/// An interaction record.
static INTERACTION: AggregateSpec = AggregateSpec {
    children: &[
        (
            "id",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text).creatable()),
        ),
        (
            "type",
            NodeSpec::Field(FieldSpec::new(FieldKind::State(INTERACTION_TYPES))),
        ),
        (
            "objectives",
            NodeSpec::Collection(CollectionSpec {
                item: &INTERACTION_OBJECTIVE,
            }),
        ),
        (
            "timestamp",
            NodeSpec::Field(FieldSpec::new(FieldKind::Timestamp)),
        ),
        (
            "correct_responses",
            NodeSpec::Collection(CollectionSpec {
                item: &CORRECT_RESPONSE,
            }),
        ),
    ],
};

/// The CMI root aggregate: the complete standardized namespace.
pub static CMI: AggregateSpec = AggregateSpec {
    children: &[
        (
            "_version",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::Text)
                    .read_only()
                    .with_default("1.0"),
            ),
        ),
        (
            "comments_from_learner",
            NodeSpec::Collection(CollectionSpec {
                item: &COMMENT_FROM_LEARNER,
            }),
        ),
        (
            "comments_from_lms",
            NodeSpec::Collection(CollectionSpec {
                item: &COMMENT_FROM_LMS,
            }),
        ),
        (
            "completion_status",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::State(COMPLETION_STATES))
                    .with_default("unknown")
                    .derived(ReadRule::CompletionStatus),
            ),
        ),
        (
            "completion_threshold",
            NodeSpec::Field(FieldSpec::new(FieldKind::Real01).read_only()),
        ),
        (
            "credit",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::State(CREDIT_STATES))
                    .read_only()
                    .with_default("credit"),
            ),
        ),
        (
            "entry",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::State(ENTRY_STATES))
                    .read_only()
                    .with_default(""),
            ),
        ),
        (
            "exit",
            NodeSpec::Field(FieldSpec::new(FieldKind::State(EXIT_STATES)).write_only()),
        ),
        (
            "interactions",
            NodeSpec::Collection(CollectionSpec { item: &INTERACTION }),
        ),
        ("location", NodeSpec::Field(FieldSpec::new(FieldKind::Text))),
        (
            "mode",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::State(MODE_STATES))
                    .read_only()
                    .with_default("normal"),
            ),
        ),
        (
            "objectives",
            NodeSpec::Collection(CollectionSpec { item: &OBJECTIVE }),
        ),
        (
            "progress_measure",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text)),
        ),
        (
            "session_time",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text)),
        ),
        (
            "success_status",
            NodeSpec::Field(
                FieldSpec::new(FieldKind::State(SUCCESS_STATES)).with_default("unknown"),
            ),
        ),
        (
            "suspend_data",
            NodeSpec::Field(FieldSpec::new(FieldKind::Text)),
        ),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::Access;

    #[test]
    fn test_root_child_lookup() {
        assert!(CMI.child("location").is_some());
        assert!(CMI.child("interactions").is_some());
        assert!(CMI.child("batman").is_none());
    }

    #[test]
    fn test_version_is_read_only_with_default() {
        let Some(NodeSpec::Field(spec)) = CMI.child("_version") else {
            panic!("expected _version field");
        };
        assert_eq!(spec.access, Access::ReadOnly);
        assert_eq!(spec.default, Some("1.0"));
    }

    #[test]
    fn test_comment_children_list() {
        assert_eq!(
            COMMENT_FROM_LEARNER.children_list(),
            "comment,location,timestamp"
        );
    }

    #[test]
    fn test_interaction_children_list() {
        assert_eq!(
            INTERACTION.children_list(),
            "id,type,objectives,timestamp,correct_responses"
        );
    }

    #[test]
    fn test_lms_comments_are_read_only_and_not_creatable() {
        for (_, spec) in COMMENT_FROM_LMS.children {
            let NodeSpec::Field(field) = spec else {
                panic!("expected field");
            };
            assert_eq!(field.access, Access::ReadOnly);
            assert!(!field.creatable);
        }
    }

    #[test]
    fn test_interaction_objective_id_is_guarded() {
        let Some(NodeSpec::Field(spec)) = INTERACTION_OBJECTIVE.child("id") else {
            panic!("expected id field");
        };
        assert!(spec.creatable);
        assert_eq!(spec.write_rule, WriteRule::UniqueObjectiveId);
    }

    #[test]
    fn test_defaults_cover_state_fields() {
        for name in ["completion_status", "credit", "entry", "mode", "success_status"] {
            let Some(NodeSpec::Field(spec)) = CMI.child(name) else {
                panic!("expected {name} field");
            };
            assert!(spec.default.is_some(), "{name} should carry a default");
        }
    }
}
