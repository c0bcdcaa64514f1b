//! Fuzz target for the `run_json` entrypoint.
//!
//! The first byte picks a mode; the rest is the argument JSON. Whatever the
//! input, the output must be a well-formed envelope.

#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;

const MODES: [&str; 6] = ["structure", "obfuscation", "both", "rules", "version", "bogus"];
const MAX_INPUT_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(args) = std::str::from_utf8(rest) else {
        return;
    };
    let mode = MODES[usize::from(selector) % MODES.len()];

    let out = decipher_core::ffi::run_json(mode, args);
    let envelope: Value = serde_json::from_str(&out).expect("envelope is valid JSON");
    match envelope["ok"].as_bool() {
        Some(true) => assert!(envelope.get("data").is_some()),
        Some(false) => assert!(envelope["error"]["code"].is_string()),
        None => panic!("envelope without ok flag: {out}"),
    }
});
