use crate::domain::{Quote, QuoteId};
use std::collections::HashMap;

/// Reports whether `remote` diverges from `local`.
///
/// Order of either slice is irrelevant: records are matched by id and then
/// compared field by field, unmodelled backend columns included.
pub fn has_changed(local: &[Quote], remote: &[Quote]) -> bool {
    if local.len() != remote.len() {
        return true;
    }

    let local_by_id = group_by_id(local);
    let remote_by_id = group_by_id(remote);

    if local_by_id.len() != remote_by_id.len() {
        return true;
    }

    remote_by_id.iter().any(|(id, remote_group)| {
        local_by_id
            .get(id)
            .is_none_or(|local_group| !same_members(local_group, remote_group))
    })
}

fn group_by_id(quotes: &[Quote]) -> HashMap<&QuoteId, Vec<&Quote>> {
    let mut groups: HashMap<&QuoteId, Vec<&Quote>> = HashMap::with_capacity(quotes.len());
    for quote in quotes {
        groups.entry(&quote.id).or_default().push(quote);
    }
    groups
}

// Groups hold more than one record only when a side repeats an id.
fn same_members(left: &[&Quote], right: &[&Quote]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut pending: Vec<&Quote> = left.to_vec();
    for quote in right {
        match pending.iter().position(|candidate| candidate == quote) {
            Some(index) => {
                pending.swap_remove(index);
            }
            None => return false,
        }
    }
    true
}
