//! # IO Module
//!
//! Interfaces through which the outside world reaches the domain. The
//! contacts backend only exposes a REST API.

pub mod rest;

pub use rest::*;
