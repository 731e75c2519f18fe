#![no_main]
use libfuzzer_sys::fuzz_target;
use sqz::huffman::{node_count, node_count_keyed, stream_bits, stream_bits_keyed, stream_bytes};
use sqz::nil::total_len;
use std::collections::HashSet;

// The sizing pre-passes run the whole build internally (frequency count,
// tree construction, code derivation), so driving them with arbitrary
// corpora exercises the pipeline end to end at run time.
fuzz_target!(|strings: Vec<String>| {
    let total: usize = strings.iter().map(|s| s.len()).sum();
    if strings.is_empty() || total == 0 {
        return;
    }
    let refs: Vec<&str> = strings.iter().map(String::as_str).collect();

    let distinct: HashSet<u8> = refs.iter().flat_map(|s| s.bytes()).collect();
    let leaves = distinct.len().max(2);
    assert_eq!(node_count(&refs), 2 * leaves - 1);

    let bits = stream_bits(&refs);
    assert!(bits <= 8 * total);
    assert_eq!(stream_bytes(&refs), bits.div_ceil(8));
    assert_eq!(total_len(&refs), total);

    // attaching keys must not change the encoding
    let pairs: Vec<(u32, &str)> = refs
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as u32, s))
        .collect();
    assert_eq!(node_count_keyed(&pairs), node_count(&refs));
    assert_eq!(stream_bits_keyed(&pairs), bits);
});
