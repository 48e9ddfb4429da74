//! Property tests for rebase sheet ordering

use pama_core::sheet::reorder;
use proptest::prelude::*;

/// Distinct keys in a fixed reference order plus a permutation of a subset.
fn ordering() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::btree_set("[0-9a-f]{6}", 0..12).prop_flat_map(|keys| {
        let by: Vec<String> = keys.into_iter().collect();
        let len = by.len();
        (
            Just(by.clone()),
            prop::sample::subsequence(by, 0..=len).prop_shuffle(),
        )
    })
}

proptest! {
    #[test]
    fn known_keys_follow_reference_order((by, now) in ordering()) {
        let mut items = now.clone();
        reorder(&mut items, &now, &by);

        let expected: Vec<String> = by.iter().filter(|k| now.contains(k)).cloned().collect();
        prop_assert_eq!(items, expected);
    }

    #[test]
    fn unknown_key_leaves_order_untouched((by, mut now) in ordering(), pos in any::<prop::sample::Index>()) {
        let at = pos.index(now.len() + 1);
        now.insert(at, "zzzzzz".to_string());

        let mut items = now.clone();
        reorder(&mut items, &now, &by);
        prop_assert_eq!(items, now);
    }
}
