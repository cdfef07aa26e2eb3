#![no_main]
use libfuzzer_sys::fuzz_target;
use sdict::Dict;

fuzz_target!(|data: (Vec<Vec<u8>>, bool)| {
    let (keys, nested) = data;

    let dict = Dict::build(&keys, nested);
    assert!(dict.len() <= keys.len());

    // Every identifier decodes and round-trips through prefix search.
    for id in 0..dict.len() {
        let key = dict.decode(id).expect("dense identifier decodes");
        assert_eq!(dict.prefix_search(&key), Some((id, key.len())));

        let hits = dict.common_prefix_search(&key, usize::MAX);
        assert_eq!(hits.last(), Some(&id));
    }
    assert_eq!(dict.decode(dict.len()), None);

    // Serialization is stable: reload, re-serialize, compare bytes.
    let bytes = dict.to_bytes();
    let reloaded = Dict::from_bytes(&bytes).expect("own image loads");
    assert_eq!(reloaded.to_bytes(), bytes);

    // Truncated images never load.
    if !bytes.is_empty() {
        assert!(Dict::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }
});
