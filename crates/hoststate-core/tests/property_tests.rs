use hoststate_core::merge;
use hoststate_fs::JsonObject;
use proptest::collection::btree_map;
use proptest::prelude::*;
use serde_json::Value;

fn documents() -> impl Strategy<Value = JsonObject> {
    btree_map("[a-e]{1,2}", "[0-9a-z]{0,4}", 0..8).prop_map(|map| {
        map.into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

proptest! {
    #[test]
    fn existing_values_win_without_override(before in documents(), desired in documents()) {
        let merged = merge(&before, &desired, false);

        for (key, value) in &before {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    #[test]
    fn desired_values_win_with_override(before in documents(), desired in documents()) {
        let merged = merge(&before, &desired, true);

        for (key, value) in &desired {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    #[test]
    fn new_keys_are_always_added(
        before in documents(),
        desired in documents(),
        override_existing in any::<bool>(),
    ) {
        let merged = merge(&before, &desired, override_existing);

        for key in desired.keys().filter(|k| !before.contains_key(*k)) {
            prop_assert_eq!(merged.get(key), desired.get(key));
        }
        for key in merged.keys() {
            prop_assert!(before.contains_key(key) || desired.contains_key(key));
        }
    }

    #[test]
    fn merge_is_idempotent(before in documents(), desired in documents(), override_existing in any::<bool>()) {
        let once = merge(&before, &desired, override_existing);
        let twice = merge(&once, &desired, override_existing);
        prop_assert_eq!(once, twice);
    }
}
