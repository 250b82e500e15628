// Domain layer: query/reading models and the ports the client and session depend on.

pub mod model;
pub mod ports;
