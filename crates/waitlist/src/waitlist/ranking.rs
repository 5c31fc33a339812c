//! Queue ordering: most referrals first, earlier joins win ties.

use std::cmp::Ordering;

use super::domain::WaitlistEntry;

/// Ordering between two entries; `Equal` leaves the tie to join order.
pub fn compare(a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
    b.referral_count
        .cmp(&a.referral_count)
        .then_with(|| a.joined_at.cmp(&b.joined_at))
}

/// Assign `position` to every entry in place.
///
/// `entries` must be in join order. The slice itself is not reordered, so
/// entries that compare equal keep their join order as the final tie-break
/// and repeated calls produce identical positions.
pub fn assign_positions(entries: &mut [WaitlistEntry]) {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| compare(&entries[a], &entries[b]));

    for (rank, index) in order.into_iter().enumerate() {
        entries[index].position = rank as u32 + 1;
    }
}

/// Copy of `entries` with positions assigned, sorted best-first.
pub fn ranked(entries: &[WaitlistEntry]) -> Vec<WaitlistEntry> {
    let mut ranked = entries.to_vec();
    assign_positions(&mut ranked);
    ranked.sort_by_key(|entry| entry.position);
    ranked
}
