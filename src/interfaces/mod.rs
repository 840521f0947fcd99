//! Adapters between validated requests and the outside world: gateway wire
//! envelopes and CSV batch input.

pub mod csv;
pub mod envelope;
