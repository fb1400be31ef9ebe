//! # Mathcraft standard library extensions
//!
//! This crate contains general purpose data structures
//! that are used in the Mathcraft project
//! but are otherwise independent of the project.

pub mod collections {
    pub mod interner;
    pub mod scopedmap;
}
