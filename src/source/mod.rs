//! Streaming access to the compressed flights file.
//!
//! [`FlightArchive`] owns the open file handle; [`Batches`] borrows it and
//! yields bounded row batches until the CSV is exhausted.

mod archive;
mod chunks;

pub use archive::FlightArchive;
pub use chunks::{BatchState, Batches};
