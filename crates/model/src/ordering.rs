//! Ordered collection helpers shared by modules and pages

use formkit_core::Identifiable;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Move the items at `sources` so they start at `destination`
///
/// The selected items keep their relative order. Indices past the end are
/// ignored and `destination` is clamped to what remains after removal.
pub fn move_items<T>(items: &mut Vec<T>, sources: &[usize], destination: usize) {
    let selected: BTreeSet<usize> = sources.iter().copied().filter(|&i| i < items.len()).collect();
    if selected.is_empty() {
        return;
    }

    let mut moved = Vec::with_capacity(selected.len());
    let mut kept = Vec::with_capacity(items.len() - selected.len());
    for (index, item) in items.drain(..).enumerate() {
        if selected.contains(&index) {
            moved.push(item);
        } else {
            kept.push(item);
        }
    }

    let at = destination.min(kept.len());
    kept.splice(at..at, moved);
    *items = kept;
}

/// Remove the item with the given id
pub fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let index = items.iter().position(|item| item.matches_id(id))?;
    Some(items.remove(index))
}
