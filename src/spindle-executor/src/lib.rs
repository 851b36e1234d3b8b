//! Thread-based building blocks for running independent work
//! concurrently.
//!
//! # Motivation
//!
//! Most of the concurrency we need is one of two shapes: a handful
//! of unrelated jobs that should run side by side and report their
//! failures, or a loop that produces items at a different pace than
//! another loop consumes them.
//!
//! # Design
//!
//! [`parallel`] dedicates one OS thread to every task and hands back
//! a [`Conduit`] over which failures are reported. [`wait`] drains it
//! and merges whatever arrived into a [`TaskFailure`].
//!
//! [`Pump`] moves a producer onto its own thread and feeds the caller's
//! consumer through a bounded queue. The producer thread is scoped to
//! the call, so no background activity survives a return from
//! [`pump`] or from a [`pipeline`].
//!
//! Panics are never turned into error values. They are caught where
//! a thread ends and resumed on the thread that collects the results.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub use config::BadConfiguration;

mod parallel;
pub use parallel::*;

mod pump;
pub use pump::*;
