use crate::config::{self};

pub const MATCHING: config::Matching = config::Matching::Exact;

/// Passes of [reduce](crate::procedures::reduce) before a formula is taken to be stuck.
pub const PASS_LIMIT: config::PassLimit = 256;

/// Rules with more variables are not checked by truth table.
pub const VERIFY_VARIABLE_LIMIT: usize = 16;

/// Clauses folded between updates of the stats window.
pub const WINDOW_INTERVAL: usize = 64;
