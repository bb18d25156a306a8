// Domain layer: rate and salary models plus the ports the core depends on.

pub mod model;
pub mod ports;
