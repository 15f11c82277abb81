//! Comic catalogue: domain types, storage adapters and the service facade.

pub mod domain;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod seed;
pub mod service;
