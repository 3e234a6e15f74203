//! fnmove: semantic function relocation.
//!
//! Moves one named function between compilation units and packages of a
//! Go source tree, rewriting call sites and imports so the program keeps
//! its meaning. Every touched file is committed together or not at all.

// Core infrastructure - re-exported from fnmove-core
pub use fnmove_core::changeset;
pub use fnmove_core::config;
pub use fnmove_core::diff;
pub use fnmove_core::error;
pub use fnmove_core::interaction;
pub use fnmove_core::store;
pub use fnmove_core::types;

// Language support
pub use fnmove_go as go;

// Front door
pub mod cli;
