//! Runtime adapter: per-instance state and event invocation.
//!
//! Machine definitions never change at run time; everything that does
//! change lives here. A [`Tracker`] owns the current-state map for one
//! host instance, consults the optional persistence store, and drives the
//! hook sequence when an event fires.

mod tracker;

pub use tracker::Tracker;
