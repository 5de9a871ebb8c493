#![no_main]

use ksh_model::{parse_ksh, stringify_ksh};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (text, _, _) = encoding_rs::SHIFT_JIS.decode(data);
    let ksh = parse_ksh(&text);

    // Canonical output is a fixed point
    let canonical = stringify_ksh(&ksh);
    let reparsed = parse_ksh(&canonical);
    assert_eq!(stringify_ksh(&reparsed), canonical);
});
