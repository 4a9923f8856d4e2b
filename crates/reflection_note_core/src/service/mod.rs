//! Use-case services above the repositories.

pub mod bootstrap_service;
