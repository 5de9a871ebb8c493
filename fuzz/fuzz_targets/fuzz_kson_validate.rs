#![no_main]

use kson_model::Kson;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    if let Ok(kson) = Kson::from_value(&value) {
        let reserialized = kson.to_value().unwrap();
        assert_eq!(Kson::from_value(&reserialized).unwrap(), kson);
    }
});
