/// Exception ids, names and interrupt mapping.
pub mod error;
