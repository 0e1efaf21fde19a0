//! Lectern library exports for testing

pub mod core;
pub mod library;
pub mod tui;

#[cfg(test)]
pub mod test_support;
