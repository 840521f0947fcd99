//! Domain layer: the gateway's field rules and message shapes.

pub mod data_vault;
pub mod fields;
pub mod ports;
pub mod sale;
