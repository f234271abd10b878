//! Core business logic modules
//!
//! Pure business logic with no I/O dependencies

pub mod balancer;

pub use balancer::GroupBalancer;
