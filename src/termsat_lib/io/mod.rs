//! Terminal output.

pub mod window;
