//! Startup support for the userdir server binary.

pub mod seed;
