//! The per-process table of candidate combination masks.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

use deduku_core::ValueSet;

static GROUP_MASKS: OnceLock<Mutex<HashMap<u8, Arc<Vec<ValueSet>>>>> = OnceLock::new();

/// Returns every k-subset of the values `1..=size` for k in
/// `2..=size/2`, the masks the naked/hidden group techniques scan.
///
/// The table is generated once per grid size and cached for the life of
/// the process.
pub(crate) fn group_masks(size: u8) -> Arc<Vec<ValueSet>> {
    let cache = GROUP_MASKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().expect("combination mask cache poisoned");
    Arc::clone(cache.entry(size).or_insert_with(|| {
        let mut masks = Vec::new();
        for k in 2..=size / 2 {
            push_k_subsets(size, k, &mut masks);
        }
        Arc::new(masks)
    }))
}

/// Appends every k-subset of `1..=size` in lexicographic order.
fn push_k_subsets(size: u8, k: u8, masks: &mut Vec<ValueSet>) {
    let width = usize::from(k);
    let mut picks: Vec<u8> = (1..=k).collect();
    loop {
        masks.push(ValueSet::from_values(size, picks.iter().copied()));

        // Advance the rightmost pick that has room, then pack the rest
        // tightly behind it.
        let Some(i) = (0..width).rev().find(|&i| {
            #[expect(clippy::cast_possible_truncation)]
            let max = size - k + i as u8 + 1;
            picks[i] < max
        }) else {
            return;
        };
        picks[i] += 1;
        for j in i + 1..width {
            picks[j] = picks[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_sizes_for_9x9() {
        let masks = group_masks(9);
        // C(9,2) + C(9,3) + C(9,4) = 36 + 84 + 126
        assert_eq!(masks.len(), 246);
        assert!(masks.iter().all(|m| (2..=4).contains(&m.len())));
    }

    #[test]
    fn test_masks_are_distinct() {
        let masks = group_masks(9);
        for (i, a) in masks.iter().enumerate() {
            for b in &masks[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_pair_masks_cover_all_pairs() {
        let masks = group_masks(4);
        // For a 4×4 grid only pairs qualify: C(4,2) = 6.
        assert_eq!(masks.len(), 6);
        assert!(
            masks
                .iter()
                .any(|m| *m == ValueSet::from_values(4, [1, 4]))
        );
    }

    #[test]
    fn test_table_is_cached() {
        let a = group_masks(9);
        let b = group_masks(9);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
