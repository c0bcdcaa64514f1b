//! Fuzz target for the parser adapter and structure traversal.
//!
//! Any input either parses or fails with a located message; a parsed tree
//! always traverses without panicking and deterministically.

#![no_main]

use decipher_types::Dialect;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(source) = std::str::from_utf8(rest) else {
        return;
    };
    let dialect = match selector % 3 {
        0 => Dialect::Javascript,
        1 => Dialect::Typescript,
        _ => Dialect::Tsx,
    };

    match decipher_parse::parse_with(source, dialect) {
        Ok(tree) => {
            let first = decipher_structure::analyze(&tree);
            let second = decipher_structure::analyze(&tree);
            assert_eq!(first, second);
            assert!(first.total() <= tree.len());
        }
        Err(err) => assert!(!err.message.is_empty()),
    }
});
