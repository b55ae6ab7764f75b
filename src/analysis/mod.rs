//! Analysis passes over extracted document text.
//!
//! Each pass is pure given its inputs; the only I/O lives in the
//! presence checker (reads the persisted text export) and the
//! dictionary loader.

pub mod presence;
pub mod repetition;
pub mod replace;
pub mod sanitize;
pub mod segment;
pub mod spell;
