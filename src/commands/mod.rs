//! Command implementations for the template-sync CLI

pub mod sync;
