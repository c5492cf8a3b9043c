pub mod code_hash;
pub mod repository;
pub mod types;
