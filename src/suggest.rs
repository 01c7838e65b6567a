use crate::catalog::{Catalog, CatalogStore, EntityKind};
use crate::filter::contains_ci;

/// Autocomplete candidates for `partial`, in catalog order.
///
/// An empty query yields nothing: suggestions only show up once typing starts.
pub fn suggest(catalog: &Catalog, partial: &str) -> Vec<String> {
    if partial.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .map(|entity| entity.display_text())
        .filter(|text| contains_ci(text, partial))
        .collect()
}

pub fn suggestions(kind: EntityKind, store: &CatalogStore, partial: &str) -> Vec<String> {
    suggest(store.get(kind), partial)
}
