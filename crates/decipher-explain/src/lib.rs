//! # decipher-explain
//!
//! **Tier 3 (Presentation)**
//!
//! Turns analysis results into ordered, titled explanation steps written for
//! learners, and interprets the small markup subset those steps may carry.
//!
//! ## What belongs here
//! * The structure renderer ([`structure::render`])
//! * The obfuscation renderer ([`obfuscation::render`])
//! * The markup substitution pass ([`markup`])
//!
//! ## What does NOT belong here
//! * Parsing, traversal or pattern matching
//! * Terminal or file output

pub mod markup;
pub mod obfuscation;
pub mod structure;

/// `singular` when `count == 1`, otherwise `plural`.
pub(crate) fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}
