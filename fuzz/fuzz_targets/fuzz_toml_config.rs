//! Fuzz target for `decipher.toml` parsing.
//!
//! Tests `TomlConfig::parse()` with arbitrary input to find panics, hangs,
//! or excessive memory usage in the deserializer.

#![no_main]
use decipher_config::TomlConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = TomlConfig::parse(s);
    }
});
