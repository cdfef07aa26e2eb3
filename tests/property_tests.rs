use proptest::prelude::*;
use sdict::Dict;
use std::collections::BTreeSet;

/// Short keys over a tiny alphabet: dense tries, heavy prefix sharing,
/// frequent tail compression.
fn keys_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..4, 0..10), 0..60)
}

proptest! {
    #[test]
    fn test_build_decode_roundtrip(keys in keys_strategy(), nested in any::<bool>()) {
        let distinct: BTreeSet<Vec<u8>> = keys.iter().cloned().collect();
        let dict = Dict::build(&keys, nested);
        prop_assert_eq!(dict.len(), distinct.len());

        let mut decoded = BTreeSet::new();
        for id in 0..dict.len() {
            let key = dict.decode(id).expect("dense identifier decodes");
            prop_assert_eq!(dict.prefix_search(&key), Some((id, key.len())));
            decoded.insert(key);
        }
        prop_assert_eq!(&decoded, &distinct);
        prop_assert_eq!(dict.decode(dict.len()), None);
    }

    #[test]
    fn test_queries_match_brute_force(
        keys in keys_strategy(),
        queries in keys_strategy(),
    ) {
        let distinct: BTreeSet<Vec<u8>> = keys.iter().cloned().collect();
        let dict = Dict::build(&keys, false);

        for q in &queries {
            // Stored prefixes of q, shortest first. Among prefixes of one
            // string, lexicographic order is length order, so the sorted
            // set iterates them in the expected sequence.
            let expected: Vec<&Vec<u8>> = distinct
                .iter()
                .filter(|k| q.starts_with(k.as_slice()))
                .collect();
            let got = dict.common_prefix_search(q, usize::MAX);
            prop_assert_eq!(got.len(), expected.len());
            for (id, k) in got.iter().zip(&expected) {
                prop_assert_eq!(&dict.decode(*id).unwrap(), *k);
            }

            // The longest stored prefix, with its matched length.
            let longest = expected.last();
            match (dict.prefix_search(q), longest) {
                (Some((id, len)), Some(k)) => {
                    prop_assert_eq!(len, k.len());
                    prop_assert_eq!(&dict.decode(id).unwrap(), *k);
                }
                (None, None) => {}
                (got, want) => {
                    prop_assert!(false, "prefix_search {:?} vs expected {:?}", got, want)
                }
            }

            // Stored extensions of q.
            let expected: BTreeSet<&Vec<u8>> = distinct
                .iter()
                .filter(|k| k.starts_with(q.as_slice()))
                .collect();
            let got = dict.predictive_search(q, usize::MAX);
            prop_assert_eq!(got.len(), expected.len());
            for id in &got {
                let key = dict.decode(*id).unwrap();
                prop_assert!(expected.contains(&key));
            }
        }
    }

    #[test]
    fn test_nested_and_flat_agree(
        keys in keys_strategy(),
        queries in keys_strategy(),
    ) {
        let flat = Dict::build(&keys, false);
        let nested = Dict::build(&keys, true);
        prop_assert_eq!(flat.len(), nested.len());
        for id in 0..flat.len() {
            prop_assert_eq!(flat.decode(id), nested.decode(id));
        }
        for q in &queries {
            prop_assert_eq!(flat.prefix_search(q), nested.prefix_search(q));
            prop_assert_eq!(
                flat.common_prefix_search(q, usize::MAX),
                nested.common_prefix_search(q, usize::MAX)
            );
            prop_assert_eq!(
                flat.predictive_search(q, usize::MAX),
                nested.predictive_search(q, usize::MAX)
            );
        }
    }

    #[test]
    fn test_serialization_identity(keys in keys_strategy(), nested in any::<bool>()) {
        let dict = Dict::build(&keys, nested);
        let bytes = dict.to_bytes();
        let reloaded = Dict::from_bytes(&bytes).unwrap();
        prop_assert_eq!(reloaded.to_bytes(), bytes);
        prop_assert_eq!(reloaded.len(), dict.len());
        for id in 0..dict.len() {
            prop_assert_eq!(reloaded.decode(id), dict.decode(id));
        }
    }

    #[test]
    fn test_limits_truncate(keys in keys_strategy(), limit in 0usize..5) {
        let dict = Dict::build(&keys, false);
        for q in keys.iter().take(8) {
            let full = dict.common_prefix_search(q, usize::MAX);
            let capped = dict.common_prefix_search(q, limit);
            prop_assert_eq!(&full[..full.len().min(limit)], &capped[..]);

            let full = dict.predictive_search(q, usize::MAX);
            let capped = dict.predictive_search(q, limit);
            prop_assert!(capped.len() <= limit);
            prop_assert_eq!(&full[..capped.len()], &capped[..]);
        }
    }
}
