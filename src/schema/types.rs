//! Typed dataset model for genealogical family trees
//!
//! These types mirror the JSON wire shape consumed by the tree workbench.
//! Unknown fields are tolerated on input so datasets can carry extra
//! annotations without failing structural validation.

use serde::{Deserialize, Serialize};

/// Visibility tier applied to people, relationships, events, and media.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    Public,
    #[default]
    Family,
    Private,
}

/// Per-person privacy flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonPrivacy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<PrivacyLevel>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide_dates: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide_location: bool,
    /// Explicit living flag; overrides the born/died heuristic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub living: Option<bool>,
}

/// Helper for serde skip_serializing_if
fn is_false(b: &bool) -> bool {
    !*b
}

/// Presentation hints attached to a person.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonDisplay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crest_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badge_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Nonbinary,
    Unknown,
}

/// A person record. `id` must match `p_*` and be unique across the dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// ISO-ish date string ("1954", "1954-01", "1954-01-31").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Branch label ("Main Branch", "Cadet Branch", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<PersonDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PersonPrivacy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_ids: Vec<String>,
}

impl Person {
    /// Preferred label for sorting and search: display name, else name.
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Relationship kinds. Parent edges are lineage; partner edges are
/// presentation-peers; guardian and step-parent edges are traversable but
/// carry no lineage semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Parent,
    Partner,
    Guardian,
    StepParent,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Parent => "parent",
            RelationshipType::Partner => "partner",
            RelationshipType::Guardian => "guardian",
            RelationshipType::StepParent => "step_parent",
        }
    }
}

/// Qualifier on parent edges; absent means unknown, which counts as
/// biological for the two-parent cardinality limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Biological,
    Adopted,
    Unknown,
}

/// Partner edge status, used only for presentation (badges), never for
/// graph semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Married,
    Partnered,
    Divorced,
    Separated,
    Widowed,
}

/// A relationship record. `id` must match `rel_*` and be unique.
///
/// Parent-shaped types (`parent`, `guardian`, `step_parent`) use
/// `parent_id`/`child_id`; partner edges use `from`/`to`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PartnerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyLevel>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Birth,
    Death,
    Marriage,
    Divorce,
    Move,
    Achievement,
    Note,
}

/// A dated event referencing people and/or a relationship.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub person_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyLevel>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Portrait,
    Photo,
    Document,
    Audio,
    Video,
}

/// A media asset referenced by `Person::media_ids`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyLevel>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuccessionMode {
    #[default]
    Manual,
    Computed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuccessionEntry {
    /// 1-based rank in the line of succession.
    pub rank: u32,
    pub person_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// An ordered line of succession as of a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Succession {
    pub as_of: String,
    #[serde(default)]
    pub mode: SuccessionMode,
    pub list: Vec<SuccessionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_note: Option<String>,
}

/// Layout mode requested by the dataset or caller. Only descendant layout
/// is algorithmically implemented; the other modes are declared for API
/// stability and fall back to descendant (see `layout::layout_tree`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Descendant,
    Ancestor,
    Both,
    Radial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    RoyalArchive,
    RoyalNight,
    RoyalParchment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succession: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_mode: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motto: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiBranding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_text: Option<String>,
}

/// Dataset-level UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    /// Soft-checked reference: must name an existing person, reported as
    /// an issue (not fatal) when it does not.
    pub default_root_person_id: String,
    #[serde(default)]
    pub layout: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_flags: Option<FeatureFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<UiLabels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<UiBranding>,
}

/// Dataset metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub dataset: String,
    pub version: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_notes: Vec<String>,
}

/// The validated dataset: the unit everything downstream consumes.
/// Never mutated after construction; rebuild derived structures instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDataset {
    pub meta: Meta,
    pub people: Vec<Person>,
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succession: Option<Succession>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaAsset>,
    pub ui: UiConfig,
}

impl FamilyDataset {
    /// Look up a person by id.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_deserializes_camel_case_fields() {
        let person: Person = serde_json::from_value(serde_json::json!({
            "id": "p_root",
            "name": "Rakesh I",
            "displayName": "Rakesh the First",
            "placeOfBirth": "Jaipur",
            "tags": ["founder"],
            "privacy": { "living": false, "hideDates": true }
        }))
        .unwrap();

        assert_eq!(person.display_name.as_deref(), Some("Rakesh the First"));
        assert_eq!(person.place_of_birth.as_deref(), Some("Jaipur"));
        assert_eq!(person.privacy.as_ref().unwrap().living, Some(false));
        assert!(person.privacy.as_ref().unwrap().hide_dates);
    }

    #[test]
    fn test_person_tolerates_unknown_fields() {
        let person: Person = serde_json::from_value(serde_json::json!({
            "id": "p_x",
            "name": "X",
            "futureField": { "nested": true }
        }))
        .unwrap();
        assert_eq!(person.id, "p_x");
    }

    #[test]
    fn test_relationship_type_snake_case() {
        let rel: Relationship = serde_json::from_value(serde_json::json!({
            "id": "rel_1",
            "type": "step_parent",
            "parentId": "p_a",
            "childId": "p_b"
        }))
        .unwrap();
        assert_eq!(rel.rel_type, RelationshipType::StepParent);
        assert_eq!(rel.parent_id.as_deref(), Some("p_a"));
    }

    #[test]
    fn test_ui_config_defaults() {
        let ui: UiConfig = serde_json::from_value(serde_json::json!({
            "defaultRootPersonId": "p_root"
        }))
        .unwrap();
        assert_eq!(ui.theme, Theme::RoyalArchive);
        assert_eq!(ui.layout, LayoutMode::Descendant);
    }

    #[test]
    fn test_display_label_falls_back_to_name() {
        let person: Person = serde_json::from_value(serde_json::json!({
            "id": "p_y",
            "name": "Mira"
        }))
        .unwrap();
        assert_eq!(person.display_label(), "Mira");
    }
}
