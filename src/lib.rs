//! Lazy, push-driven sequences.
//!
//! A [`Sequence`] wraps a producer that pushes elements into a consume
//! callback until the callback asks it to stop. Operators build new sequences
//! without driving anything; terminal actions such as [`Sequence::to_vec`] or
//! [`Sequence::find`] drive the whole chain. Operators that must advance
//! several sequences in lockstep (`zip` and friends) run each input on a
//! [`Bridge`] worker thread and pull from it.

pub mod error;
pub mod sequence_configuration;

pub mod producer;
pub mod sequence;
pub mod pair;

pub mod bridge;
pub mod lockstep;
pub mod sources;
pub mod ops;
pub mod terminal;

pub mod pipe;

pub use bridge::{active_workers, Bridge};
pub use error::{SeqError, SeqResult};
pub use lockstep::{compress, uncons, zip, zip3, zip_longest, zip_with_config};
pub use ops::concat;
pub use pair::{Pair, PairSequence, Triple};
pub use pipe::Pipe;
pub use producer::{Flow, FnProducer, PairProducer, Producer};
pub use sequence::Sequence;
pub use sequence_configuration::{BridgeConfig, ReaderConfig};

// Re-export all constructors at the crate root
pub use sources::*;
