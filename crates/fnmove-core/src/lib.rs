//! Core infrastructure for fnmove.
//!
//! This crate provides language-agnostic infrastructure:
//! - Error types and error codes
//! - Spans and source locations
//! - Text position utilities and content hashing
//! - Line-level unified diffs
//! - The ChangeSet transaction manager (snapshot, render, preview, commit, rollback)
//! - Interaction ports for confirmation prompts and preview output
//! - The file-store port used for commit writes
//! - Configuration loading

pub mod changeset;
pub mod config;
pub mod diff;
pub mod error;
pub mod hash;
pub mod interaction;
pub mod store;
pub mod text;
pub mod types;
