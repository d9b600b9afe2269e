// Domain layer: models and ports (map surface, venue provider).

pub mod model;
pub mod ports;
