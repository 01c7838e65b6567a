use chrono::{FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogStore, Entity, EntityKind, Match};
use crate::selection::SelectionSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub text_query: String,
    pub date_exact: Option<NaiveDate>,
    pub included_only: bool,
    // Matches only: narrows by the referenced league's name.
    #[serde(default)]
    pub league_query: String,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        !self.text_query.is_empty()
            || self.date_exact.is_some()
            || self.included_only
            || !self.league_query.is_empty()
    }
}

/// What the match predicates need beyond the catalog itself.
#[derive(Debug, Clone, Copy)]
pub struct FilterEnv<'a> {
    pub leagues: Option<&'a Catalog>,
    pub offset: FixedOffset,
}

impl Default for FilterEnv<'_> {
    fn default() -> Self {
        Self {
            leagues: None,
            offset: Utc.fix(),
        }
    }
}

impl<'a> FilterEnv<'a> {
    pub fn for_store(store: &'a CatalogStore, offset: FixedOffset) -> Self {
        Self {
            leagues: Some(&store.leagues),
            offset,
        }
    }

    fn league_name<'m>(&self, m: &'m Match) -> &'m str
    where
        'a: 'm,
    {
        match self.leagues.and_then(|leagues| leagues.get(&m.league_ref)) {
            Some(Entity::League(l)) => l.name.as_str(),
            _ => m.league_ref.as_str(),
        }
    }
}

/// Visible rows with match dates compared in UTC and no league names resolved.
pub fn visible<'c>(
    catalog: &'c Catalog,
    criteria: &FilterCriteria,
    selection: &SelectionSet,
) -> Vec<&'c Entity> {
    visible_in(catalog, criteria, selection, &FilterEnv::default())
}

/// Stable subsequence of `catalog` passing every active predicate.
pub fn visible_in<'c>(
    catalog: &'c Catalog,
    criteria: &FilterCriteria,
    selection: &SelectionSet,
    env: &FilterEnv<'_>,
) -> Vec<&'c Entity> {
    if !criteria.is_active() {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|entity| passes(entity, criteria, selection, env))
        .collect()
}

pub fn visible_entities<'c>(
    kind: EntityKind,
    store: &'c CatalogStore,
    criteria: &FilterCriteria,
    selection: &SelectionSet,
    offset: FixedOffset,
) -> Vec<&'c Entity> {
    let env = FilterEnv::for_store(store, offset);
    visible_in(store.get(kind), criteria, selection, &env)
}

fn passes(
    entity: &Entity,
    criteria: &FilterCriteria,
    selection: &SelectionSet,
    env: &FilterEnv<'_>,
) -> bool {
    if !criteria.text_query.is_empty()
        && !contains_ci(&entity.display_text(), &criteria.text_query)
    {
        return false;
    }
    if let Some(m) = entity.as_match() {
        if let Some(date) = criteria.date_exact {
            let local = env.offset.from_utc_datetime(&m.kickoff).date_naive();
            if local != date {
                return false;
            }
        }
        if !criteria.league_query.is_empty()
            && !contains_ci(env.league_name(m), &criteria.league_query)
        {
            return false;
        }
    }
    if criteria.included_only && selection.get(entity.key()) != Some(true) {
        return false;
    }
    true
}

/// Case-insensitive substring search. ASCII input is compared without allocating.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        let h = haystack.as_bytes();
        let n = needle.as_bytes();
        if n.len() > h.len() {
            return false;
        }
        return h
            .windows(n.len())
            .any(|window| window.iter().zip(n).all(|(a, b)| a.eq_ignore_ascii_case(b)));
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, already clamped into `1..=page_count`.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

pub fn paginate<T: Clone>(rows: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = rows.len();
    let page_count = total.div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    Page {
        items: rows[start.min(total)..end].to_vec(),
        page,
        page_count,
        total,
    }
}
