// Domain layer: core models and ports (interfaces) for the parse flow.

pub mod model;
pub mod ports;
