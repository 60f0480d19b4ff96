//! Person filtering and search predicates
//!
//! Sidebar filter logic: tag, branch (house), and living-status
//! predicates plus the case-insensitive label search. Pure functions
//! over people; the caller intersects them with graph selections.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::Person;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivingFilter {
    #[default]
    All,
    Living,
    Deceased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivingStatus {
    Living,
    Deceased,
    Unknown,
}

/// Active sidebar filters. Empty tag/branch strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFilters {
    pub tag: String,
    pub branch: String,
    pub living: LivingFilter,
}

/// Distinct, sorted values available for the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub tags: Vec<String>,
    pub branches: Vec<String>,
}

/// An explicit privacy flag wins over dates; a death date means
/// deceased; a birth date alone means living; otherwise unknown.
pub fn living_status(person: &Person) -> LivingStatus {
    match person.privacy.as_ref().and_then(|privacy| privacy.living) {
        Some(true) => return LivingStatus::Living,
        Some(false) => return LivingStatus::Deceased,
        None => {}
    }
    if person.died.is_some() {
        return LivingStatus::Deceased;
    }
    if person.born.is_some() {
        return LivingStatus::Living;
    }
    LivingStatus::Unknown
}

pub fn matches_filters(person: &Person, filters: &PersonFilters) -> bool {
    if !filters.tag.is_empty() && !person.tags.contains(&filters.tag) {
        return false;
    }

    if !filters.branch.is_empty() && person.house.as_deref() != Some(filters.branch.as_str()) {
        return false;
    }

    match filters.living {
        LivingFilter::All => true,
        LivingFilter::Living => living_status(person) == LivingStatus::Living,
        LivingFilter::Deceased => living_status(person) == LivingStatus::Deceased,
    }
}

/// Case-insensitive substring match on the display label. A blank query
/// matches everyone.
pub fn matches_search(person: &Person, search_query: &str) -> bool {
    let query = search_query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    person.display_label().to_lowercase().contains(&query)
}

pub fn collect_filter_options(people: &[Person]) -> FilterOptions {
    let mut tags = BTreeSet::new();
    let mut branches = BTreeSet::new();

    for person in people {
        for tag in &person.tags {
            tags.insert(tag.clone());
        }
        if let Some(house) = &person.house {
            branches.insert(house.clone());
        }
    }

    FilterOptions {
        tags: tags.into_iter().collect(),
        branches: branches.into_iter().collect(),
    }
}
