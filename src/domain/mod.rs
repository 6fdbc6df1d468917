// Domain layer: models and ports. Concrete adapters live under config/ and core/.

pub mod model;
pub mod ports;
