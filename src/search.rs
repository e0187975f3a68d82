//! Client-side refinement of an already fetched page.

use crate::domain::record::Entity;

/// Keeps the items whose searchable fields contain `term`, ignoring case.
///
/// An empty (or whitespace-only) term returns every item; otherwise the term
/// is matched exactly as typed. With no configured fields every top-level
/// scalar field is searched.
pub fn filter_by_search<E, S>(items: &[E], term: &str, fields: &[S]) -> Vec<E>
where
    E: Entity,
    S: AsRef<str>,
{
    if term.trim().is_empty() {
        return items.to_vec();
    }
    let needle = term.to_lowercase();

    items
        .iter()
        .filter(|item| matches(*item, &needle, fields))
        .cloned()
        .collect()
}

fn matches<E: Entity, S: AsRef<str>>(item: &E, needle: &str, fields: &[S]) -> bool {
    if fields.is_empty() {
        return item
            .all_field_text()
            .iter()
            .any(|text| text.to_lowercase().contains(needle));
    }

    fields.iter().any(|field| {
        item.field_text(field.as_ref())
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}
