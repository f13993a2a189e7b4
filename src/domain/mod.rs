// Domain layer: models and ports (interfaces). Nothing here talks to the
// filesystem or the network.

pub mod model;
pub mod ports;
