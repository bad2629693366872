// Domain layer: content models and ports. No HTTP or storage concretions here.

pub mod model;
pub mod ports;
