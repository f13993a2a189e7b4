use std::sync::Arc;

use crate::domain::model::{Item, Order, PARCEL_MAX_WEIGHT};

/// Unroll an order's lines into one entry per ordered unit: line order first,
/// then quantity order within the line.
pub fn expand_order(order: &Order) -> Vec<Arc<Item>> {
    order
        .lines
        .iter()
        .flat_map(|line| (0..line.quantity).map(move |_| line.item.clone()))
        .collect()
}

/// Greedy descending-weight first-fit grouping.
///
/// Items are stable-sorted heaviest first, then placed one at a time: the
/// first pending item that still fits the most recently opened group is
/// appended to it; when nothing fits there, the heaviest pending item opens a
/// new group. Earlier groups are never revisited. Only a single item heavier
/// than `max_weight` can produce an over-limit group; pricing decides later
/// whether that aborts the run.
///
/// Deterministic: the sort is stable and placement depends on nothing but the
/// input sequence.
pub fn pack_items(mut items: Vec<Arc<Item>>, max_weight: f64) -> Vec<Vec<Arc<Item>>> {
    items.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    // Pending items form a singly linked list of indices into the sorted
    // vector; `n` is the end sentinel. Unlinking is O(1), so a placement
    // never shifts or reallocates the pending list.
    let n = items.len();
    let mut next: Vec<usize> = (1..=n).collect();
    let mut head = 0;
    let mut remaining = n;

    let mut closed: Vec<Vec<Arc<Item>>> = Vec::new();
    let mut open: Vec<Arc<Item>> = Vec::new();
    let mut open_weight = 0.0_f64;

    while remaining > 0 {
        // First pending item (heaviest first) that still fits the open group.
        let mut prev: Option<usize> = None;
        let mut cur = head;
        let mut fit: Option<(Option<usize>, usize)> = None;
        while cur < n {
            if open_weight + items[cur].weight <= max_weight {
                fit = Some((prev, cur));
                break;
            }
            prev = Some(cur);
            cur = next[cur];
        }

        if let Some((prev, idx)) = fit {
            match prev {
                Some(p) => next[p] = next[idx],
                None => head = next[idx],
            }
            open_weight += items[idx].weight;
            open.push(items[idx].clone());
        } else {
            // Nothing fits: the heaviest pending item starts a fresh group.
            let idx = head;
            head = next[idx];
            open_weight = items[idx].weight;
            closed.push(std::mem::replace(&mut open, vec![items[idx].clone()]));
        }
        remaining -= 1;
    }

    closed.push(open);
    closed
}

/// Split one order into parcel-sized item groups bounded by
/// [`PARCEL_MAX_WEIGHT`].
pub fn split_order(order: &Order) -> Vec<Vec<Arc<Item>>> {
    pack_items(expand_order(order), PARCEL_MAX_WEIGHT)
}
