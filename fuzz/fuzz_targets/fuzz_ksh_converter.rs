#![no_main]

use ksh_model::{ksh_to_kson, parse_ksh};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Conversion may reject the chart, but a converted chart must validate
    if let Ok(kson) = ksh_to_kson(&parse_ksh(text)) {
        let json = kson.to_json_string().unwrap();
        kson_model::Kson::from_json_str(&json).unwrap();
    }
});
