//! Staged dataset validation with structured issue reporting
//!
//! `validate_dataset` runs seven stages over untyped JSON input. Stage 1
//! (structural shape) short-circuits; stages 2-7 accumulate every issue
//! they find. The result is a tagged value: the typed dataset on success,
//! or the full ordered issue list. Validation never panics and never
//! returns a partial dataset.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::{FamilyDataset, ParentKind, Relationship, RelationshipType};

/// Issue categories, ordered roughly by stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Input does not match the schema shape at all; fatal to validation.
    Parse,
    DuplicateId,
    MissingReference,
    Constraint,
    Cycle,
    Custom,
}

/// One validation finding. `path` is a dotted/bracketed locator into the
/// input document, e.g. `relationships[3].parentId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
        }
    }
}

fn person_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^p_[a-zA-Z0-9_-]+$").expect("valid person id pattern"))
}

fn relationship_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^rel_[a-zA-Z0-9_-]+$").expect("valid relationship id pattern"))
}

fn event_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ev_[a-zA-Z0-9_-]+$").expect("valid event id pattern"))
}

fn media_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^m_[a-zA-Z0-9_-]+$").expect("valid media id pattern"))
}

/// Validate untyped JSON input into a typed dataset.
///
/// Returns the dataset when no issue is found, otherwise the ordered,
/// deterministic list of every issue detected.
pub fn validate_dataset(input: &serde_json::Value) -> Result<FamilyDataset, Vec<ValidationIssue>> {
    // Stage 1: structural shape. Any failure returns immediately; later
    // stages assume a structurally valid dataset.
    let dataset: FamilyDataset = match serde_json::from_value(input.clone()) {
        Ok(dataset) => dataset,
        Err(err) => {
            return Err(vec![ValidationIssue::new(
                IssueCode::Parse,
                "$",
                err.to_string(),
            )]);
        }
    };

    let shape_issues = check_id_patterns(&dataset);
    if !shape_issues.is_empty() {
        return Err(shape_issues);
    }

    let mut issues = Vec::new();

    // Stage 2 (people half): duplicate person ids, first-seen wins.
    let person_ids = collect_person_ids(&dataset, &mut issues);

    // Stages 2-4 over relationships: duplicates, shape, references.
    check_relationships(&dataset, &person_ids, &mut issues);

    // Stage 5: default root must name an existing person.
    if !person_ids.contains(&dataset.ui.default_root_person_id) {
        issues.push(ValidationIssue::new(
            IssueCode::MissingReference,
            "ui.defaultRootPersonId",
            format!(
                "default root person not found: {}",
                dataset.ui.default_root_person_id
            ),
        ));
    }

    // Stage 6: at most two biological (or unspecified) parents per child.
    check_biological_parent_limit(&dataset, &mut issues);

    // Stage 7: the parent subgraph must be acyclic.
    if let Some(cycle) = detect_parent_cycle(&dataset.relationships) {
        issues.push(ValidationIssue::new(
            IssueCode::Cycle,
            "relationships",
            format!("parent-child cycle detected: {}", cycle.join(" -> ")),
        ));
    }

    if issues.is_empty() {
        tracing::debug!(
            people = dataset.people.len(),
            relationships = dataset.relationships.len(),
            "dataset validated"
        );
        Ok(dataset)
    } else {
        tracing::debug!(issues = issues.len(), "dataset validation failed");
        Err(issues)
    }
}

/// Id pattern checks belong to the structural stage: the wire schema
/// constrains them, so a violation short-circuits like any shape failure.
fn check_id_patterns(dataset: &FamilyDataset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (index, person) in dataset.people.iter().enumerate() {
        if !person_id_pattern().is_match(&person.id) {
            issues.push(ValidationIssue::new(
                IssueCode::Parse,
                format!("people[{index}].id"),
                format!("invalid person id: {}", person.id),
            ));
        }
    }
    for (index, relationship) in dataset.relationships.iter().enumerate() {
        if !relationship_id_pattern().is_match(&relationship.id) {
            issues.push(ValidationIssue::new(
                IssueCode::Parse,
                format!("relationships[{index}].id"),
                format!("invalid relationship id: {}", relationship.id),
            ));
        }
    }
    for (index, event) in dataset.events.iter().enumerate() {
        if !event_id_pattern().is_match(&event.id) {
            issues.push(ValidationIssue::new(
                IssueCode::Parse,
                format!("events[{index}].id"),
                format!("invalid event id: {}", event.id),
            ));
        }
    }
    for (index, media) in dataset.media.iter().enumerate() {
        if !media_id_pattern().is_match(&media.id) {
            issues.push(ValidationIssue::new(
                IssueCode::Parse,
                format!("media[{index}].id"),
                format!("invalid media id: {}", media.id),
            ));
        }
    }
    if let Some(succession) = &dataset.succession {
        for (index, entry) in succession.list.iter().enumerate() {
            if entry.rank < 1 {
                issues.push(ValidationIssue::new(
                    IssueCode::Parse,
                    format!("succession.list[{index}].rank"),
                    "succession rank must be at least 1".to_string(),
                ));
            }
        }
    }

    issues
}

fn collect_person_ids(dataset: &FamilyDataset, issues: &mut Vec<ValidationIssue>) -> HashSet<String> {
    let mut person_ids = HashSet::new();

    for (index, person) in dataset.people.iter().enumerate() {
        if person_ids.contains(&person.id) {
            issues.push(ValidationIssue::new(
                IssueCode::DuplicateId,
                format!("people[{index}].id"),
                format!("duplicate person id: {}", person.id),
            ));
        }
        person_ids.insert(person.id.clone());
    }

    person_ids
}

fn check_relationships(
    dataset: &FamilyDataset,
    person_ids: &HashSet<String>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut relationship_ids = HashSet::new();

    for (index, relationship) in dataset.relationships.iter().enumerate() {
        if relationship_ids.contains(&relationship.id) {
            issues.push(ValidationIssue::new(
                IssueCode::DuplicateId,
                format!("relationships[{index}].id"),
                format!("duplicate relationship id: {}", relationship.id),
            ));
        }
        relationship_ids.insert(relationship.id.clone());

        check_relationship_shape(relationship, index, issues);
        check_relationship_references(relationship, index, person_ids, issues);
    }
}

/// Parent edges require parentId/childId and forbid from/to; partner edges
/// are the reverse. Every missing or forbidden field is its own issue.
fn check_relationship_shape(
    relationship: &Relationship,
    index: usize,
    issues: &mut Vec<ValidationIssue>,
) {
    let custom = |field: &str, message: String| {
        ValidationIssue::new(
            IssueCode::Custom,
            format!("relationships[{index}].{field}"),
            message,
        )
    };

    match relationship.rel_type {
        RelationshipType::Parent => {
            if relationship.parent_id.is_none() {
                issues.push(custom("parentId", "parent relationship requires parentId".into()));
            }
            if relationship.child_id.is_none() {
                issues.push(custom("childId", "parent relationship requires childId".into()));
            }
            if relationship.from.is_some() {
                issues.push(custom("from", "parent relationship must not include from".into()));
            }
            if relationship.to.is_some() {
                issues.push(custom("to", "parent relationship must not include to".into()));
            }
        }
        RelationshipType::Partner => {
            if relationship.from.is_none() {
                issues.push(custom("from", "partner relationship requires from".into()));
            }
            if relationship.to.is_none() {
                issues.push(custom("to", "partner relationship requires to".into()));
            }
            if relationship.parent_id.is_some() {
                issues.push(custom(
                    "parentId",
                    "partner relationship must not include parentId".into(),
                ));
            }
            if relationship.child_id.is_some() {
                issues.push(custom(
                    "childId",
                    "partner relationship must not include childId".into(),
                ));
            }
        }
        RelationshipType::Guardian | RelationshipType::StepParent => {}
    }
}

fn check_relationship_references(
    relationship: &Relationship,
    index: usize,
    person_ids: &HashSet<String>,
    issues: &mut Vec<ValidationIssue>,
) {
    let fields = [
        ("parentId", relationship.parent_id.as_deref()),
        ("childId", relationship.child_id.as_deref()),
        ("from", relationship.from.as_deref()),
        ("to", relationship.to.as_deref()),
    ];

    for (field, value) in fields {
        let Some(person_id) = value else { continue };
        if person_id.is_empty() || person_ids.contains(person_id) {
            continue;
        }
        issues.push(ValidationIssue::new(
            IssueCode::MissingReference,
            format!("relationships[{index}].{field}"),
            format!("relationship references missing person: {person_id}"),
        ));
    }
}

/// No child may have more than two parent edges whose kind is biological
/// or absent. Reported once per offending child, in first-seen order.
fn check_biological_parent_limit(dataset: &FamilyDataset, issues: &mut Vec<ValidationIssue>) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for relationship in &dataset.relationships {
        if relationship.rel_type != RelationshipType::Parent {
            continue;
        }
        let Some(child_id) = relationship.child_id.as_deref() else {
            continue;
        };
        if matches!(
            relationship.kind,
            Some(ParentKind::Adopted) | Some(ParentKind::Unknown)
        ) {
            continue;
        }
        let count = counts.entry(child_id).or_insert(0);
        if *count == 0 {
            first_seen.push(child_id);
        }
        *count += 1;
    }

    for child_id in first_seen {
        if counts[child_id] > 2 {
            issues.push(ValidationIssue::new(
                IssueCode::Constraint,
                "relationships",
                format!("{child_id} has more than 2 biological/unknown parents"),
            ));
        }
    }
}

/// Depth-first search over the parent subgraph with an explicit frame
/// stack, so arbitrarily deep genealogies cannot overflow the call stack.
/// Returns the first cycle found as the id sequence from the repeated
/// ancestor back to itself.
fn detect_parent_cycle(relationships: &[Relationship]) -> Option<Vec<String>> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    let mut known: HashSet<&str> = HashSet::new();

    for relationship in relationships {
        if relationship.rel_type != RelationshipType::Parent {
            continue;
        }
        let (Some(parent), Some(child)) = (
            relationship.parent_id.as_deref(),
            relationship.child_id.as_deref(),
        ) else {
            continue;
        };
        for id in [parent, child] {
            if known.insert(id) {
                order.push(id);
            }
        }
        let entry = children.entry(parent).or_default();
        if !entry.contains(&child) {
            entry.push(child);
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut visiting: HashSet<&str> = HashSet::new();

    for &start in &order {
        if visited.contains(start) {
            continue;
        }

        // Frame: (node, index of next child to expand).
        let mut frames: Vec<(&str, usize)> = vec![(start, 0)];
        let mut path: Vec<&str> = vec![start];
        visiting.insert(start);

        while let Some(&(node, next_child)) = frames.last() {
            let node_children = children.get(node).map(Vec::as_slice).unwrap_or(&[]);

            if next_child < node_children.len() {
                frames.last_mut().expect("frame present").1 += 1;
                let child = node_children[next_child];

                if visiting.contains(child) {
                    let pos = path
                        .iter()
                        .position(|&id| id == child)
                        .expect("back-edge target on path");
                    let mut cycle: Vec<String> =
                        path[pos..].iter().map(|id| id.to_string()).collect();
                    cycle.push(child.to_string());
                    return Some(cycle);
                }
                if !visited.contains(child) {
                    visiting.insert(child);
                    path.push(child);
                    frames.push((child, 0));
                }
            } else {
                visiting.remove(node);
                visited.insert(node);
                path.pop();
                frames.pop();
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_dataset_value() -> serde_json::Value {
        json!({
            "meta": { "dataset": "test", "version": "1.0.0", "displayName": "Test" },
            "people": [
                { "id": "p_a", "name": "A" },
                { "id": "p_b", "name": "B" }
            ],
            "relationships": [
                { "id": "rel_1", "type": "parent", "parentId": "p_a", "childId": "p_b" }
            ],
            "ui": { "defaultRootPersonId": "p_a" }
        })
    }

    #[test]
    fn test_valid_dataset_parses() {
        let dataset = validate_dataset(&minimal_dataset_value()).unwrap();
        assert_eq!(dataset.people.len(), 2);
        assert_eq!(dataset.relationships.len(), 1);
    }

    #[test]
    fn test_structural_failure_short_circuits() {
        let issues = validate_dataset(&json!({ "people": [] })).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::Parse);
        assert_eq!(issues[0].path, "$");
    }

    #[test]
    fn test_bad_id_pattern_is_structural() {
        let mut value = minimal_dataset_value();
        value["people"][0]["id"] = json!("person_a");
        let issues = validate_dataset(&value).unwrap_err();
        // stage 1 short-circuits: the dangling reference to the renamed
        // person is never reached
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::Parse);
        assert_eq!(issues[0].path, "people[0].id");
    }

    #[test]
    fn test_duplicate_person_id_reported_once_at_second_occurrence() {
        let mut value = minimal_dataset_value();
        value["people"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "id": "p_dup", "name": "First" }));
        value["people"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "id": "p_dup", "name": "Second" }));

        let issues = validate_dataset(&value).unwrap_err();
        let dups: Vec<_> = issues
            .iter()
            .filter(|i| i.code == IssueCode::DuplicateId)
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].path, "people[3].id");
        assert_eq!(dups[0].message, "duplicate person id: p_dup");
    }

    #[test]
    fn test_partner_shape_issues_are_per_field() {
        let mut value = minimal_dataset_value();
        value["relationships"].as_array_mut().unwrap().push(json!({
            "id": "rel_2",
            "type": "partner",
            "parentId": "p_a"
        }));

        let issues = validate_dataset(&value).unwrap_err();
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"relationships[1].from"));
        assert!(paths.contains(&"relationships[1].to"));
        assert!(paths.contains(&"relationships[1].parentId"));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_parent_shape_forbids_from_to() {
        let mut value = minimal_dataset_value();
        value["relationships"].as_array_mut().unwrap().push(json!({
            "id": "rel_2",
            "type": "parent",
            "parentId": "p_a",
            "childId": "p_b",
            "from": "p_a",
            "to": "p_b"
        }));

        let issues = validate_dataset(&value).unwrap_err();
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"relationships[1].from"));
        assert!(paths.contains(&"relationships[1].to"));
    }

    #[test]
    fn test_missing_reference_reported_per_occurrence() {
        let mut value = minimal_dataset_value();
        value["relationships"].as_array_mut().unwrap().push(json!({
            "id": "rel_2",
            "type": "partner",
            "from": "p_ghost",
            "to": "p_b"
        }));

        let issues = validate_dataset(&value).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::MissingReference);
        assert_eq!(issues[0].path, "relationships[1].from");
        assert_eq!(
            issues[0].message,
            "relationship references missing person: p_ghost"
        );
    }

    #[test]
    fn test_default_root_soft_checked() {
        let mut value = minimal_dataset_value();
        value["ui"]["defaultRootPersonId"] = json!("p_missing");
        let issues = validate_dataset(&value).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "ui.defaultRootPersonId");
        assert_eq!(issues[0].message, "default root person not found: p_missing");
    }

    #[test]
    fn test_biological_parent_limit_reported_once_per_child() {
        let mut value = minimal_dataset_value();
        for (i, parent) in ["p_a", "p_b", "p_c", "p_d"].iter().enumerate() {
            if i >= 2 {
                value["people"]
                    .as_array_mut()
                    .unwrap()
                    .push(json!({ "id": parent, "name": parent }));
            }
        }
        value["people"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "id": "p_kid", "name": "Kid" }));
        let rels = value["relationships"].as_array_mut().unwrap();
        rels.clear();
        for (i, parent) in ["p_a", "p_b", "p_c", "p_d"].iter().enumerate() {
            rels.push(json!({
                "id": format!("rel_{i}"),
                "type": "parent",
                "parentId": parent,
                "childId": "p_kid"
            }));
        }

        let issues = validate_dataset(&value).unwrap_err();
        let constraints: Vec<_> = issues
            .iter()
            .filter(|i| i.code == IssueCode::Constraint)
            .collect();
        assert_eq!(constraints.len(), 1);
        assert_eq!(
            constraints[0].message,
            "p_kid has more than 2 biological/unknown parents"
        );
    }

    #[test]
    fn test_adopted_parents_do_not_count_toward_limit() {
        let mut value = minimal_dataset_value();
        value["people"]
            .as_array_mut()
            .unwrap()
            .extend([json!({ "id": "p_c", "name": "C" }), json!({ "id": "p_d", "name": "D" })]);
        let rels = value["relationships"].as_array_mut().unwrap();
        rels.push(json!({
            "id": "rel_2", "type": "parent", "parentId": "p_c", "childId": "p_b",
            "kind": "adopted"
        }));
        rels.push(json!({
            "id": "rel_3", "type": "parent", "parentId": "p_d", "childId": "p_b",
            "kind": "biological"
        }));

        assert!(validate_dataset(&value).is_ok());
    }

    #[test]
    fn test_two_node_cycle_reported() {
        let mut value = minimal_dataset_value();
        value["relationships"].as_array_mut().unwrap().push(json!({
            "id": "rel_2",
            "type": "parent",
            "parentId": "p_b",
            "childId": "p_a"
        }));

        let issues = validate_dataset(&value).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::Cycle);
        assert_eq!(issues[0].path, "relationships");
        assert_eq!(
            issues[0].message,
            "parent-child cycle detected: p_a -> p_b -> p_a"
        );
    }

    #[test]
    fn test_validator_is_deterministic() {
        let mut value = minimal_dataset_value();
        value["ui"]["defaultRootPersonId"] = json!("p_missing");
        value["relationships"].as_array_mut().unwrap().push(json!({
            "id": "rel_1",
            "type": "partner",
            "from": "p_ghost",
            "to": "p_b"
        }));

        let first = validate_dataset(&value).unwrap_err();
        let second = validate_dataset(&value).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_partner_edges_excluded_from_cycle_detection() {
        let mut value = minimal_dataset_value();
        value["relationships"].as_array_mut().unwrap().push(json!({
            "id": "rel_2",
            "type": "partner",
            "from": "p_b",
            "to": "p_a"
        }));
        assert!(validate_dataset(&value).is_ok());
    }
}
