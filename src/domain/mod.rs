// Domain layer: harvested entities and the ports the harvester depends on.

pub mod model;
pub mod ports;
