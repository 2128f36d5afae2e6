//! The CMI tree: runtime instances of the static schema.
//!
//! Construction seeds the tree from a plain snapshot (eagerly validating
//! enumerated and range-bounded values), `get`/`set` resolve dot-path
//! segments against it, and `export` produces the plain snapshot handed to
//! the persistence collaborator.
//!
//! Writes are planned against an immutable view first and committed only
//! after every validation passes. Auto-created collection items therefore
//! never outlive a failed write: either the new item chain and the value
//! are committed together, or nothing changes.

use serde_json::{Map, Value};

use crate::error::{DataModelError, RteError};
use crate::model::field::{Access, FieldSpec, ReadRule, WriteRule};
use crate::model::schema::{self, AggregateSpec, CollectionSpec, NodeSpec};

/// A runtime node mirroring one schema node.
#[derive(Debug, Clone)]
enum Node {
    Field(FieldNode),
    Aggregate(AggregateNode),
    Collection(CollectionNode),
}

#[derive(Debug, Clone)]
struct FieldNode {
    spec: FieldSpec,
    value: Option<String>,
}

#[derive(Debug, Clone)]
struct AggregateNode {
    spec: &'static AggregateSpec,
    children: Vec<Node>,
}

#[derive(Debug, Clone)]
struct CollectionNode {
    spec: CollectionSpec,
    items: Vec<AggregateNode>,
}

/// The CMI data-model tree for one session.
#[derive(Debug, Clone)]
pub struct CmiTree {
    root: AggregateNode,
}

impl Default for CmiTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of planning a write: where (if anywhere) a new collection item
/// chain must be materialized.
struct SetPlan {
    creation: Option<usize>,
}

impl CmiTree {
    /// Create a tree with every field unset or at its schema default.
    pub fn new() -> Self {
        Self {
            root: build_defaults(&schema::CMI),
        }
    }

    /// Create a tree pre-populated from a seed snapshot.
    ///
    /// The seed matches the exported shape: nested objects, arrays for
    /// collections, string leaves. Enumerated and range-bounded fields
    /// reject invalid seed values here rather than at first access.
    pub fn with_seed(seed: &Value) -> Result<Self, RteError> {
        Ok(Self {
            root: build_aggregate(&schema::CMI, Some(seed), schema::ROOT_NAME)?,
        })
    }

    /// Read the value at `path` (segments below the `cmi` root).
    pub fn get(&self, path: &[&str]) -> Result<String, DataModelError> {
        enum Cur<'a> {
            Agg(&'a AggregateNode),
            Coll(&'a CollectionNode),
            Field(&'a FieldNode),
        }

        let mut cur = Cur::Agg(&self.root);
        for (i, seg) in path.iter().enumerate() {
            let last = i + 1 == path.len();
            cur = match cur {
                Cur::Agg(agg) => match agg.child(seg).ok_or(DataModelError::Undefined)? {
                    Node::Field(f) => Cur::Field(f),
                    Node::Aggregate(a) => Cur::Agg(a),
                    Node::Collection(c) => Cur::Coll(c),
                },
                Cur::Coll(coll) => {
                    if *seg == "_count" {
                        if !last {
                            return Err(DataModelError::Undefined);
                        }
                        return Ok(coll.items.len().to_string());
                    }
                    if *seg == "_children" {
                        if !last {
                            return Err(DataModelError::Undefined);
                        }
                        return Ok(coll.spec.item.children_list());
                    }
                    let index: usize = seg.parse().map_err(|_| DataModelError::OutOfBound)?;
                    let item = coll.items.get(index).ok_or(DataModelError::OutOfBound)?;
                    Cur::Agg(item)
                }
                Cur::Field(_) => return Err(DataModelError::Undefined),
            };
        }

        match cur {
            Cur::Field(field) => self.read_field(field),
            _ => Err(DataModelError::Undefined),
        }
    }

    /// Write `value` at `path`, materializing collection items where the
    /// schema allows it.
    pub fn set(&mut self, path: &[&str], value: &str) -> Result<(), DataModelError> {
        let plan = self.plan_set(path, value)?;
        self.commit_set(path, value, plan);
        Ok(())
    }

    /// Export the tree as a plain snapshot. Unset fields are omitted;
    /// write-only and computed fields export their stored value.
    pub fn export(&self) -> Value {
        Value::Object(export_aggregate(&self.root))
    }

    fn read_field(&self, field: &FieldNode) -> Result<String, DataModelError> {
        if field.spec.access == Access::WriteOnly {
            return Err(DataModelError::WriteOnly);
        }
        if field.spec.read_rule == ReadRule::CompletionStatus {
            if let Some(derived) = self.derived_completion_status() {
                return Ok(derived);
            }
        }
        field
            .value
            .clone()
            .ok_or(DataModelError::ValueNotInitialized)
    }

    /// Completion status mandated by the root threshold/progress pair, or
    /// `None` when no threshold is set and the stored value governs.
    fn derived_completion_status(&self) -> Option<String> {
        let threshold: f64 = field_value(&self.root, "completion_threshold")?.parse().ok()?;
        let progress = field_value(&self.root, "progress_measure").and_then(|v| v.parse::<f64>().ok());
        Some(match progress {
            Some(p) if p >= threshold => "completed".to_string(),
            Some(_) => "incomplete".to_string(),
            None => "unknown".to_string(),
        })
    }

    fn plan_set(&self, path: &[&str], value: &str) -> Result<SetPlan, DataModelError> {
        enum Cur<'a> {
            Agg(&'a AggregateNode),
            Coll(&'a CollectionNode),
            Field(&'a FieldNode),
            SpecAgg(&'static AggregateSpec),
            SpecColl(CollectionSpec),
            SpecField(FieldSpec),
        }

        let mut cur = Cur::Agg(&self.root);
        let mut creation: Option<usize> = None;

        for (i, seg) in path.iter().enumerate() {
            let last = i + 1 == path.len();
            cur = match cur {
                Cur::Agg(agg) => match agg.child(seg).ok_or(DataModelError::Undefined)? {
                    Node::Field(f) => Cur::Field(f),
                    Node::Aggregate(a) => Cur::Agg(a),
                    Node::Collection(c) => Cur::Coll(c),
                },
                Cur::Coll(coll) => {
                    if *seg == "_count" || *seg == "_children" {
                        return Err(if last {
                            DataModelError::ReadOnly
                        } else {
                            DataModelError::Undefined
                        });
                    }
                    let index: usize = seg.parse().map_err(|_| DataModelError::OutOfBound)?;
                    if index < coll.items.len() {
                        Cur::Agg(&coll.items[index])
                    } else if index == coll.items.len() {
                        creation = Some(i);
                        Cur::SpecAgg(coll.spec.item)
                    } else {
                        return Err(DataModelError::OutOfBound);
                    }
                }
                Cur::SpecAgg(spec) => match spec.child(seg).ok_or(DataModelError::Undefined)? {
                    NodeSpec::Field(f) => Cur::SpecField(*f),
                    NodeSpec::Aggregate(a) => Cur::SpecAgg(a),
                    NodeSpec::Collection(c) => Cur::SpecColl(*c),
                },
                Cur::SpecColl(cspec) => {
                    if *seg == "_count" || *seg == "_children" {
                        return Err(if last {
                            DataModelError::ReadOnly
                        } else {
                            DataModelError::Undefined
                        });
                    }
                    // A collection inside a not-yet-created item is empty,
                    // so only its append index is reachable.
                    let index: usize = seg.parse().map_err(|_| DataModelError::OutOfBound)?;
                    if index == 0 {
                        Cur::SpecAgg(cspec.item)
                    } else {
                        return Err(DataModelError::OutOfBound);
                    }
                }
                Cur::Field(_) | Cur::SpecField(_) => return Err(DataModelError::Undefined),
            };
        }

        let spec = match cur {
            Cur::Field(f) => f.spec,
            Cur::SpecField(s) => s,
            _ => return Err(DataModelError::Undefined),
        };

        if creation.is_some() && !spec.creatable {
            return Err(DataModelError::TargetNotCreatable);
        }
        if spec.access == Access::ReadOnly {
            return Err(DataModelError::ReadOnly);
        }
        spec.kind.validate(value)?;
        match spec.write_rule {
            WriteRule::None => {}
            WriteRule::UniqueObjectiveId => self.check_unique_objective_id(path, value, creation)?,
            WriteRule::ResponsePattern => self.check_response_pattern(path, value, creation)?,
        }

        Ok(SetPlan { creation })
    }

    /// Reject ids already used by items of the sibling collection. The
    /// collection sits two segments above the id field; if it is itself
    /// part of the pending creation there is nothing to collide with.
    fn check_unique_objective_id(
        &self,
        path: &[&str],
        value: &str,
        creation: Option<usize>,
    ) -> Result<(), DataModelError> {
        let coll_path = &path[..path.len() - 2];
        if creation.is_some_and(|ci| ci < coll_path.len()) {
            return Ok(());
        }
        let Some(coll) = collection_at(&self.root, coll_path) else {
            return Ok(());
        };
        if coll
            .items
            .iter()
            .any(|item| field_value(item, "id") == Some(value))
        {
            return Err(DataModelError::duplicated_objective_id(value));
        }
        Ok(())
    }

    /// Validate a correct-response pattern against the owning interaction's
    /// type, three segments above the pattern field. An unset type means
    /// the dependency is not established.
    fn check_response_pattern(
        &self,
        path: &[&str],
        value: &str,
        creation: Option<usize>,
    ) -> Result<(), DataModelError> {
        let interaction_path = &path[..path.len() - 3];
        let interaction_type = if creation.is_some_and(|ci| ci < interaction_path.len()) {
            None
        } else {
            aggregate_at(&self.root, interaction_path)
                .and_then(|agg| field_value(agg, "type"))
                .map(str::to_string)
        };
        let Some(ty) = interaction_type else {
            return Err(DataModelError::TargetNotCreatable);
        };

        match ty.as_str() {
            "true-false" if !matches!(value, "true" | "false") => {
                Err(DataModelError::InvalidPattern)
            }
            "choice" if value.trim().is_empty() => Err(DataModelError::InvalidPattern),
            _ => Ok(()),
        }
    }

    fn commit_set(&mut self, path: &[&str], value: &str, plan: SetPlan) {
        match plan.creation {
            None => write_field(&mut self.root, path, value),
            Some(ci) => {
                let coll = collection_at_mut(&mut self.root, &path[..ci]);
                let item = materialize_item(coll.spec.item, &path[ci + 1..], value);
                coll.items.push(item);
            }
        }
    }
}

impl AggregateNode {
    fn child(&self, name: &str) -> Option<&Node> {
        self.child_index(name).map(|i| &self.children[i])
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.spec
            .children
            .iter()
            .position(|(child, _)| *child == name)
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

fn build_defaults(spec: &'static AggregateSpec) -> AggregateNode {
    let children = spec
        .children
        .iter()
        .map(|(_, child)| match child {
            NodeSpec::Field(f) => Node::Field(FieldNode {
                spec: *f,
                value: f.default.map(str::to_string),
            }),
            NodeSpec::Aggregate(a) => Node::Aggregate(build_defaults(a)),
            NodeSpec::Collection(c) => Node::Collection(CollectionNode {
                spec: *c,
                items: Vec::new(),
            }),
        })
        .collect();
    AggregateNode { spec, children }
}

fn build_aggregate(
    spec: &'static AggregateSpec,
    seed: Option<&Value>,
    path: &str,
) -> Result<AggregateNode, RteError> {
    let map = match seed {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            return Err(RteError::seed(path, format!("expected an object, got {other}")));
        }
    };

    let mut children = Vec::with_capacity(spec.children.len());
    for (name, child_spec) in spec.children {
        let child_seed = map.and_then(|m| m.get(*name));
        let child_path = format!("{path}.{name}");
        children.push(match child_spec {
            NodeSpec::Field(f) => Node::Field(build_field(f, child_seed, &child_path)?),
            NodeSpec::Aggregate(a) => Node::Aggregate(build_aggregate(a, child_seed, &child_path)?),
            NodeSpec::Collection(c) => {
                Node::Collection(build_collection(*c, child_seed, &child_path)?)
            }
        });
    }
    Ok(AggregateNode { spec, children })
}

fn build_field(
    spec: &FieldSpec,
    seed: Option<&Value>,
    path: &str,
) -> Result<FieldNode, RteError> {
    let explicit = match seed {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(RteError::seed(path, format!("expected a string, got {other}")));
        }
    };

    if let Some(value) = &explicit {
        if spec.kind.eager() {
            spec.kind
                .validate(value)
                .map_err(|e| RteError::seed(path, e.to_string()))?;
        }
    }

    Ok(FieldNode {
        spec: *spec,
        value: explicit.or_else(|| spec.default.map(str::to_string)),
    })
}

fn build_collection(
    spec: CollectionSpec,
    seed: Option<&Value>,
    path: &str,
) -> Result<CollectionNode, RteError> {
    let items = match seed {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .enumerate()
            .map(|(i, v)| build_aggregate(spec.item, Some(v), &format!("{path}.{i}")))
            .collect::<Result<_, _>>()?,
        Some(other) => {
            return Err(RteError::seed(path, format!("expected an array, got {other}")));
        }
    };
    Ok(CollectionNode { spec, items })
}

// ---------------------------------------------------------------------------
// Resolution helpers
// ---------------------------------------------------------------------------

/// Value of a directly-owned field child, if set.
fn field_value<'a>(agg: &'a AggregateNode, name: &str) -> Option<&'a str> {
    match agg.child(name)? {
        Node::Field(f) => f.value.as_deref(),
        _ => None,
    }
}

/// Resolve an existing aggregate at `path` (empty path is the given node).
fn aggregate_at<'a>(agg: &'a AggregateNode, path: &[&str]) -> Option<&'a AggregateNode> {
    let Some((first, rest)) = path.split_first() else {
        return Some(agg);
    };
    match agg.child(first)? {
        Node::Aggregate(a) => aggregate_at(a, rest),
        Node::Collection(c) => {
            let (index, rest) = rest.split_first()?;
            let index: usize = index.parse().ok()?;
            aggregate_at(c.items.get(index)?, rest)
        }
        Node::Field(_) => None,
    }
}

/// Resolve an existing collection at `path`.
fn collection_at<'a>(agg: &'a AggregateNode, path: &[&str]) -> Option<&'a CollectionNode> {
    let (first, rest) = path.split_first()?;
    match agg.child(first)? {
        Node::Collection(c) if rest.is_empty() => Some(c),
        Node::Collection(c) => {
            let (index, rest) = rest.split_first()?;
            let index: usize = index.parse().ok()?;
            collection_at(c.items.get(index)?, rest)
        }
        Node::Aggregate(a) => collection_at(a, rest),
        Node::Field(_) => None,
    }
}

// The mutable walkers below are only called with paths a `SetPlan` already
// resolved; a miss here is a planning defect, not a caller error.

fn write_field(agg: &mut AggregateNode, path: &[&str], value: &str) {
    let Some((first, rest)) = path.split_first() else {
        unreachable!("set plan resolved an empty field path");
    };
    let Some(index) = agg.child_index(first) else {
        unreachable!("set plan resolved a missing child: {first}");
    };
    match &mut agg.children[index] {
        Node::Field(f) if rest.is_empty() => f.value = Some(value.to_string()),
        Node::Aggregate(a) => write_field(a, rest, value),
        Node::Collection(c) => {
            let Some((item_index, rest)) = rest.split_first() else {
                unreachable!("set plan resolved a collection as a field");
            };
            let item_index: usize = item_index
                .parse()
                .unwrap_or_else(|_| unreachable!("set plan resolved index {item_index}"));
            write_field(&mut c.items[item_index], rest, value)
        }
        Node::Field(_) => unreachable!("set plan resolved a field mid-path"),
    }
}

fn collection_at_mut<'a>(agg: &'a mut AggregateNode, path: &[&str]) -> &'a mut CollectionNode {
    let Some((first, rest)) = path.split_first() else {
        unreachable!("set plan resolved an empty collection path");
    };
    let Some(index) = agg.child_index(first) else {
        unreachable!("set plan resolved a missing child: {first}");
    };
    match &mut agg.children[index] {
        Node::Collection(c) => {
            if rest.is_empty() {
                return c;
            }
            let Some((item_index, rest)) = rest.split_first() else {
                unreachable!("set plan resolved a bare collection mid-path");
            };
            let item_index: usize = item_index
                .parse()
                .unwrap_or_else(|_| unreachable!("set plan resolved index {item_index}"));
            collection_at_mut(&mut c.items[item_index], rest)
        }
        Node::Aggregate(a) => collection_at_mut(a, rest),
        Node::Field(_) => unreachable!("set plan resolved a field as a collection"),
    }
}

/// Build a fresh collection item and write `value` at `rel` inside it,
/// creating nested items along the way. All checks ran during planning.
fn materialize_item(
    spec: &'static AggregateSpec,
    rel: &[&str],
    value: &str,
) -> AggregateNode {
    let mut item = build_defaults(spec);
    fill_new_item(&mut item, rel, value);
    item
}

fn fill_new_item(agg: &mut AggregateNode, rel: &[&str], value: &str) {
    let Some((first, rest)) = rel.split_first() else {
        unreachable!("set plan resolved an empty creation path");
    };
    let Some(index) = agg.child_index(first) else {
        unreachable!("set plan resolved a missing child: {first}");
    };
    match &mut agg.children[index] {
        Node::Field(f) if rest.is_empty() => f.value = Some(value.to_string()),
        Node::Aggregate(a) => fill_new_item(a, rest, value),
        Node::Collection(c) => {
            // rest[0] is the validated append index (always 0 in a fresh item)
            let item = materialize_item(c.spec.item, &rest[1..], value);
            c.items.push(item);
        }
        Node::Field(_) => unreachable!("set plan resolved a field mid-path"),
    }
}

fn export_aggregate(agg: &AggregateNode) -> Map<String, Value> {
    let mut map = Map::new();
    for ((name, _), child) in agg.spec.children.iter().zip(&agg.children) {
        match child {
            Node::Field(f) => {
                if let Some(value) = &f.value {
                    map.insert(name.to_string(), Value::String(value.clone()));
                }
            }
            Node::Aggregate(a) => {
                map.insert(name.to_string(), Value::Object(export_aggregate(a)));
            }
            Node::Collection(c) => {
                map.insert(
                    name.to_string(),
                    Value::Array(
                        c.items
                            .iter()
                            .map(|item| Value::Object(export_aggregate(item)))
                            .collect(),
                    ),
                );
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn get(tree: &CmiTree, path: &str) -> Result<String, DataModelError> {
        let segments: Vec<&str> = path.split('.').collect();
        tree.get(&segments)
    }

    fn set(tree: &mut CmiTree, path: &str, value: &str) -> Result<(), DataModelError> {
        let segments: Vec<&str> = path.split('.').collect();
        tree.set(&segments, value)
    }

    #[test]
    fn test_version_default() {
        let tree = CmiTree::new();
        assert_eq!(get(&tree, "_version").unwrap(), "1.0");
    }

    #[test]
    fn test_version_is_read_only() {
        let mut tree = CmiTree::new();
        assert_eq!(
            set(&mut tree, "_version", "1.1").unwrap_err(),
            DataModelError::ReadOnly
        );
    }

    #[test]
    fn test_unknown_element() {
        let tree = CmiTree::new();
        assert_eq!(get(&tree, "batman").unwrap_err(), DataModelError::Undefined);
        assert_eq!(
            get(&tree, "location.nested").unwrap_err(),
            DataModelError::Undefined
        );
    }

    #[test]
    fn test_location_round_trip() {
        let mut tree = CmiTree::new();
        assert_eq!(
            get(&tree, "location").unwrap_err(),
            DataModelError::ValueNotInitialized
        );
        set(&mut tree, "location", "page-4").unwrap();
        assert_eq!(get(&tree, "location").unwrap(), "page-4");
    }

    #[test]
    fn test_exit_is_write_only() {
        let mut tree = CmiTree::new();
        set(&mut tree, "exit", "suspend").unwrap();
        assert_eq!(get(&tree, "exit").unwrap_err(), DataModelError::WriteOnly);
    }

    #[test]
    fn test_exit_validates_tokens() {
        let mut tree = CmiTree::new();
        assert!(matches!(
            set(&mut tree, "exit", "batman").unwrap_err(),
            DataModelError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_state_defaults() {
        let tree = CmiTree::new();
        assert_eq!(get(&tree, "credit").unwrap(), "credit");
        assert_eq!(get(&tree, "entry").unwrap(), "");
        assert_eq!(get(&tree, "mode").unwrap(), "normal");
        assert_eq!(get(&tree, "success_status").unwrap(), "unknown");
        assert_eq!(get(&tree, "completion_status").unwrap(), "unknown");
    }

    #[test]
    fn test_seed_round_trip() {
        let seed = json!({
            "location": "page-2",
            "suspend_data": "state-blob",
        });
        let tree = CmiTree::with_seed(&seed).unwrap();
        assert_eq!(get(&tree, "location").unwrap(), "page-2");
        assert_eq!(get(&tree, "suspend_data").unwrap(), "state-blob");
    }

    #[test]
    fn test_seed_rejects_bad_threshold() {
        for bad in ["potato", "2", "-0.5"] {
            let seed = json!({ "completion_threshold": bad });
            let err = CmiTree::with_seed(&seed).unwrap_err();
            assert!(err.to_string().contains("cmi.completion_threshold"), "{err}");
        }
    }

    #[test]
    fn test_seed_rejects_bad_credit() {
        let seed = json!({ "credit": "batman" });
        assert!(CmiTree::with_seed(&seed).is_err());
    }

    #[test]
    fn test_seed_rejects_non_string_leaf() {
        let seed = json!({ "location": 42 });
        assert!(CmiTree::with_seed(&seed).is_err());
    }

    #[test]
    fn test_seed_accepts_valid_threshold() {
        let seed = json!({ "completion_threshold": "0.5" });
        let tree = CmiTree::with_seed(&seed).unwrap();
        assert_eq!(get(&tree, "completion_threshold").unwrap(), "0.5");
    }

    #[test]
    fn test_completion_status_derivation() {
        let seed = json!({ "completion_threshold": "0.5" });
        let mut tree = CmiTree::with_seed(&seed).unwrap();

        // threshold set, progress unset
        assert_eq!(get(&tree, "completion_status").unwrap(), "unknown");

        set(&mut tree, "progress_measure", "0.1").unwrap();
        assert_eq!(get(&tree, "completion_status").unwrap(), "incomplete");

        set(&mut tree, "progress_measure", "0.5").unwrap();
        assert_eq!(get(&tree, "completion_status").unwrap(), "completed");

        set(&mut tree, "progress_measure", "0.9").unwrap();
        assert_eq!(get(&tree, "completion_status").unwrap(), "completed");
    }

    #[test]
    fn test_completion_status_derivation_overrides_stored_value() {
        let seed = json!({ "completion_threshold": "0.5" });
        let mut tree = CmiTree::with_seed(&seed).unwrap();
        set(&mut tree, "completion_status", "completed").unwrap();
        set(&mut tree, "progress_measure", "0.2").unwrap();

        assert_eq!(get(&tree, "completion_status").unwrap(), "incomplete");

        // the stored value still exports unchanged
        assert_eq!(tree.export()["completion_status"], "completed");
    }

    #[test]
    fn test_completion_status_stored_without_threshold() {
        let mut tree = CmiTree::new();
        set(&mut tree, "completion_status", "completed").unwrap();
        assert_eq!(get(&tree, "completion_status").unwrap(), "completed");
    }

    #[test]
    fn test_completion_status_unparseable_progress_counts_as_unset() {
        let seed = json!({ "completion_threshold": "0.5" });
        let mut tree = CmiTree::with_seed(&seed).unwrap();
        set(&mut tree, "progress_measure", "almost done").unwrap();
        assert_eq!(get(&tree, "completion_status").unwrap(), "unknown");
    }

    #[test]
    fn test_collection_pseudo_fields() {
        let tree = CmiTree::new();
        assert_eq!(get(&tree, "objectives._count").unwrap(), "0");
        assert_eq!(
            get(&tree, "comments_from_learner._children").unwrap(),
            "comment,location,timestamp"
        );
        assert_eq!(
            get(&tree, "interactions._children").unwrap(),
            "id,type,objectives,timestamp,correct_responses"
        );
    }

    #[test]
    fn test_pseudo_fields_are_read_only() {
        let mut tree = CmiTree::new();
        assert_eq!(
            set(&mut tree, "objectives._count", "5").unwrap_err(),
            DataModelError::ReadOnly
        );
        assert_eq!(
            set(&mut tree, "objectives._children", "id").unwrap_err(),
            DataModelError::ReadOnly
        );
    }

    #[test]
    fn test_pseudo_fields_with_trailing_path() {
        let tree = CmiTree::new();
        assert_eq!(
            get(&tree, "objectives._count.anything").unwrap_err(),
            DataModelError::Undefined
        );
    }

    #[test]
    fn test_collection_growth_by_creatable_child() {
        let mut tree = CmiTree::new();
        set(&mut tree, "comments_from_learner.0.comment", "hello").unwrap();

        assert_eq!(get(&tree, "comments_from_learner._count").unwrap(), "1");
        assert_eq!(get(&tree, "comments_from_learner.0.comment").unwrap(), "hello");

        // sibling fields of the new item remain unset
        assert_eq!(
            get(&tree, "comments_from_learner.0.location").unwrap_err(),
            DataModelError::ValueNotInitialized
        );
    }

    #[test]
    fn test_collection_write_to_existing_index_does_not_grow() {
        let mut tree = CmiTree::new();
        set(&mut tree, "comments_from_learner.0.comment", "first").unwrap();
        set(&mut tree, "comments_from_learner.0.comment", "second").unwrap();

        assert_eq!(get(&tree, "comments_from_learner._count").unwrap(), "1");
        assert_eq!(get(&tree, "comments_from_learner.0.comment").unwrap(), "second");
    }

    #[test]
    fn test_collection_write_past_append_point() {
        let mut tree = CmiTree::new();
        assert_eq!(
            set(&mut tree, "comments_from_learner.1.comment", "text").unwrap_err(),
            DataModelError::OutOfBound
        );
        assert_eq!(
            set(&mut tree, "comments_from_learner.-1.comment", "text").unwrap_err(),
            DataModelError::OutOfBound
        );
        assert_eq!(
            set(&mut tree, "comments_from_learner.x.comment", "text").unwrap_err(),
            DataModelError::OutOfBound
        );
    }

    #[test]
    fn test_collection_read_past_length() {
        let tree = CmiTree::new();
        assert_eq!(
            get(&tree, "objectives.0.id").unwrap_err(),
            DataModelError::OutOfBound
        );
    }

    #[test]
    fn test_non_creatable_child_does_not_create() {
        let mut tree = CmiTree::new();
        // interaction type is not creatable
        assert_eq!(
            set(&mut tree, "interactions.0.type", "choice").unwrap_err(),
            DataModelError::TargetNotCreatable
        );
        assert_eq!(get(&tree, "interactions._count").unwrap(), "0");
    }

    #[test]
    fn test_failed_validation_rolls_back_creation() {
        let mut tree = CmiTree::new();
        // timestamp is creatable but the value is invalid; the item must
        // not be committed
        assert!(matches!(
            set(&mut tree, "comments_from_learner.0.timestamp", "batman").unwrap_err(),
            DataModelError::TypeMismatch { .. }
        ));
        assert_eq!(get(&tree, "comments_from_learner._count").unwrap(), "0");
    }

    #[test]
    fn test_timestamp_valid_value_creates() {
        let mut tree = CmiTree::new();
        set(&mut tree, "comments_from_learner.0.timestamp", "2022-04-03T21:59:00Z").unwrap();
        assert_eq!(
            get(&tree, "comments_from_learner.0.timestamp").unwrap(),
            "2022-04-03T21:59:00Z"
        );
    }

    #[test]
    fn test_lms_comments_read_only_when_seeded() {
        let seed = json!({
            "comments_from_lms": [{
                "comment": "text",
                "location": "1",
                "timestamp": "2022-04-03T21:59:00Z",
            }],
        });
        let mut tree = CmiTree::with_seed(&seed).unwrap();
        assert_eq!(get(&tree, "comments_from_lms.0.timestamp").unwrap(), "2022-04-03T21:59:00Z");
        assert_eq!(
            set(&mut tree, "comments_from_lms.0.comment", "hello").unwrap_err(),
            DataModelError::ReadOnly
        );
    }

    #[test]
    fn test_lms_comments_not_creatable() {
        let mut tree = CmiTree::new();
        assert_eq!(
            set(&mut tree, "comments_from_lms.0.comment", "hello").unwrap_err(),
            DataModelError::TargetNotCreatable
        );
    }

    #[test]
    fn test_seeded_objectives() {
        let seed = json!({
            "objectives": [
                { "id": "obj1" },
                { "id": "obj2" },
                { "id": "obj3" },
            ],
        });
        let tree = CmiTree::with_seed(&seed).unwrap();
        assert_eq!(get(&tree, "objectives._count").unwrap(), "3");
        assert_eq!(get(&tree, "objectives.1.id").unwrap(), "obj2");
    }

    #[test]
    fn test_objective_created_by_id_write() {
        let mut tree = CmiTree::new();
        set(&mut tree, "objectives.0.id", "obj1").unwrap();
        assert_eq!(get(&tree, "objectives._count").unwrap(), "1");
        assert_eq!(get(&tree, "objectives.0.completion_status").unwrap(), "unknown");
    }

    #[test]
    fn test_nested_creation_in_one_write() {
        let mut tree = CmiTree::new();
        // creates interaction 0 and its objective 0 atomically
        set(&mut tree, "interactions.0.objectives.0.id", "obj1").unwrap();

        assert_eq!(get(&tree, "interactions._count").unwrap(), "1");
        assert_eq!(get(&tree, "interactions.0.objectives._count").unwrap(), "1");
        assert_eq!(get(&tree, "interactions.0.objectives.0.id").unwrap(), "obj1");
    }

    #[test]
    fn test_duplicate_interaction_objective_id() {
        let mut tree = CmiTree::new();
        set(&mut tree, "interactions.0.objectives.0.id", "obj1").unwrap();

        let err = set(&mut tree, "interactions.0.objectives.1.id", "obj1").unwrap_err();
        assert_eq!(err, DataModelError::duplicated_objective_id("obj1"));

        // the failed write must not grow the collection
        assert_eq!(get(&tree, "interactions.0.objectives._count").unwrap(), "1");

        // a distinct id is fine
        set(&mut tree, "interactions.0.objectives.1.id", "obj2").unwrap();
        assert_eq!(get(&tree, "interactions.0.objectives._count").unwrap(), "2");
    }

    #[test]
    fn test_duplicate_check_covers_existing_item_rewrite() {
        let mut tree = CmiTree::new();
        set(&mut tree, "interactions.0.objectives.0.id", "obj1").unwrap();
        set(&mut tree, "interactions.0.objectives.1.id", "obj2").unwrap();

        let err = set(&mut tree, "interactions.0.objectives.1.id", "obj1").unwrap_err();
        assert_eq!(err, DataModelError::duplicated_objective_id("obj1"));
        assert_eq!(get(&tree, "interactions.0.objectives.1.id").unwrap(), "obj2");
    }

    #[test]
    fn test_pattern_requires_interaction_type() {
        let mut tree = CmiTree::new();
        set(&mut tree, "interactions.0.id", "q1").unwrap();

        assert_eq!(
            set(&mut tree, "interactions.0.correct_responses.0.pattern", "true").unwrap_err(),
            DataModelError::TargetNotCreatable
        );
        assert_eq!(get(&tree, "interactions.0.correct_responses._count").unwrap(), "0");
    }

    #[test]
    fn test_true_false_pattern() {
        let mut tree = CmiTree::new();
        set(&mut tree, "interactions.0.id", "q1").unwrap();
        set(&mut tree, "interactions.0.type", "true-false").unwrap();

        assert_eq!(
            set(&mut tree, "interactions.0.correct_responses.0.pattern", "maybe").unwrap_err(),
            DataModelError::InvalidPattern
        );
        set(&mut tree, "interactions.0.correct_responses.0.pattern", "true").unwrap();
        assert_eq!(
            get(&tree, "interactions.0.correct_responses.0.pattern").unwrap(),
            "true"
        );
    }

    #[test]
    fn test_choice_pattern_rejects_blank() {
        let mut tree = CmiTree::new();
        set(&mut tree, "interactions.0.id", "q1").unwrap();
        set(&mut tree, "interactions.0.type", "choice").unwrap();

        assert_eq!(
            set(&mut tree, "interactions.0.correct_responses.0.pattern", "  ").unwrap_err(),
            DataModelError::InvalidPattern
        );
        set(&mut tree, "interactions.0.correct_responses.0.pattern", "option_a").unwrap();
    }

    #[test]
    fn test_fill_in_pattern_accepts_anything() {
        let mut tree = CmiTree::new();
        set(&mut tree, "interactions.0.id", "q1").unwrap();
        set(&mut tree, "interactions.0.type", "fill-in").unwrap();
        set(&mut tree, "interactions.0.correct_responses.0.pattern", "any text").unwrap();
    }

    #[test]
    fn test_set_on_aggregate_or_collection_is_undefined() {
        let mut tree = CmiTree::new();
        assert_eq!(
            set(&mut tree, "objectives", "x").unwrap_err(),
            DataModelError::Undefined
        );
        set(&mut tree, "objectives.0.id", "obj1").unwrap();
        assert_eq!(
            tree.set(&["objectives", "0"], "x").unwrap_err(),
            DataModelError::Undefined
        );
        assert_eq!(tree.get(&[]).unwrap_err(), DataModelError::Undefined);
    }

    #[test]
    fn test_export_shape() {
        let mut tree = CmiTree::new();
        set(&mut tree, "location", "page-9").unwrap();
        set(&mut tree, "comments_from_learner.0.comment", "hi").unwrap();
        set(&mut tree, "exit", "suspend").unwrap();

        let snapshot = tree.export();
        assert_eq!(snapshot["_version"], "1.0");
        assert_eq!(snapshot["location"], "page-9");
        assert_eq!(snapshot["comments_from_learner"][0]["comment"], "hi");
        // write-only fields still export their stored value
        assert_eq!(snapshot["exit"], "suspend");
        // unset fields are omitted
        assert!(snapshot.get("suspend_data").is_none());
        assert!(snapshot["comments_from_learner"][0].get("location").is_none());
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut tree = CmiTree::new();
        set(&mut tree, "location", "page-9").unwrap();
        set(&mut tree, "objectives.0.id", "obj1").unwrap();

        let snapshot = tree.export();
        let restored = CmiTree::with_seed(&snapshot).unwrap();
        assert_eq!(get(&restored, "location").unwrap(), "page-9");
        assert_eq!(get(&restored, "objectives.0.id").unwrap(), "obj1");
    }
}
