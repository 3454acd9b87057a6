//! Stable in-place bidirectional exchange sort.
//!
//! Alternates a forward pass, which carries the largest element of the window
//! to its right edge, with a backward pass, which carries the smallest to the
//! left edge, shrinking the window by one on each side per round. Elements are
//! swapped only when strictly out of order, so equal elements keep their
//! original relative order. Always O(n²) comparisons: the window shrinks to
//! nothing even when a pass makes no swap.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Which routine orders decorated rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// The standard library's `sort_by` (stable merge sort)
    #[default]
    Native,
    /// [`shaker_sort`]
    Shaker,
}

impl SortStrategy {
    /// Sort `items` in place with this strategy. Both strategies are stable.
    pub fn sort<T, F>(self, items: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        match self {
            SortStrategy::Native => items.sort_by(compare),
            SortStrategy::Shaker => shaker_sort(items, compare),
        }
    }
}

/// Sort `list` in place, preserving the order of equal elements.
pub fn shaker_sort<T, F>(list: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if list.len() < 2 {
        return;
    }
    let mut left = 0;
    let mut right = list.len() - 1;

    // Full convergence: no early exit on a pass without swaps.
    while left < right {
        forward_pass(list, &mut compare, left, right);
        right -= 1;

        backward_pass(list, &mut compare, left, right);
        left += 1;
    }
}

/// Bubble the maximum of `list[left..=right]` to `right`. Returns whether
/// anything moved.
fn forward_pass<T, F>(list: &mut [T], compare: &mut F, left: usize, right: usize) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut swapped = false;
    for i in left..right {
        if compare(&list[i], &list[i + 1]) == Ordering::Greater {
            list.swap(i, i + 1);
            swapped = true;
        }
    }
    swapped
}

/// Bubble the minimum of `list[left..=right]` to `left`. Returns whether
/// anything moved.
fn backward_pass<T, F>(list: &mut [T], compare: &mut F, left: usize, right: usize) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut swapped = false;
    for i in (left + 1..=right).rev() {
        if compare(&list[i], &list[i - 1]) == Ordering::Less {
            list.swap(i, i - 1);
            swapped = true;
        }
    }
    swapped
}
