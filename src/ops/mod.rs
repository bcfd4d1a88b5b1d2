//! The operator catalogue. Every operator is an inherent method on
//! [`Sequence`](crate::Sequence) returning a new, undriven sequence.

mod buffered;
mod combine;
mod core;
mod group;
mod window;

pub use combine::concat;
