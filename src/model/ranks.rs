use std::{cmp::Ordering, hash::Hash};

use indexmap::IndexMap;

/// Competition ranking with a custom sort key.
///
/// Players are stable-sorted by key (descending when `descending` is
/// set). Strictly-equal keys form a tie group sharing one rank, and the
/// numbering skips past each group, so three players with keys
/// `10, 10, 5` rank `1, 1, 3`.
pub fn assign_ranks_by<P, T, K, F>(
    ratings: &IndexMap<P, T>,
    first_rank: usize,
    descending: bool,
    key: F
) -> IndexMap<P, usize>
where
    P: Eq + Hash + Clone,
    K: PartialOrd,
    F: Fn(&T) -> K
{
    let mut sorted: Vec<(&P, K)> = ratings.iter().map(|(player, value)| (player, key(value))).collect();
    sorted.sort_by(|(_, a), (_, b)| {
        let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    let mut ranks = IndexMap::with_capacity(sorted.len());
    let mut current_rank = first_rank;

    for (position, (player, value)) in sorted.iter().enumerate() {
        let tied_with_previous = position > 0 && sorted[position - 1].1.partial_cmp(value) == Some(Ordering::Equal);

        if !tied_with_previous {
            // Rank = first_rank + number of strictly better players.
            current_rank = first_rank + position;
        }

        ranks.insert((**player).clone(), current_rank);
    }

    ranks
}

/// Ranks a rating map descending by value, best rank 1.
pub fn assign_ranks<P: Eq + Hash + Clone>(ratings: &IndexMap<P, f64>) -> IndexMap<P, usize> {
    assign_ranks_by(ratings, 1, true, |rating| *rating)
}
