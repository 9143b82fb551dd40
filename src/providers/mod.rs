//! Storage backends that talk to hosted services

pub mod postgrest;
