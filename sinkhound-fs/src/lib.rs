//! Filesystem abstraction for sinkhound.
//!
//! This crate provides:
//! - A `Filesystem` trait covering the two access patterns the daemon needs:
//!   atomic whole-file replacement for the published policy, and cursored
//!   reads (byte offset + file identity) for tailing the telemetry log
//! - `RealFilesystem` backed by std::fs
//! - `MockFilesystem` for deterministic tests

pub mod filesystem;

pub use filesystem::{Filesystem, FsError, MockFilesystem, RealFilesystem};
