// Domain layer: records, outcomes and the port the dispatcher talks to.

pub mod model;
pub mod ports;
