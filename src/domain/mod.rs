// Domain layer: value types and the ports the node runner talks to.

pub mod model;
pub mod ports;
pub mod severity;
