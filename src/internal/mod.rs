//! Internal implementation details.

pub(crate) mod unwind;

pub(crate) use unwind::panic_message;
