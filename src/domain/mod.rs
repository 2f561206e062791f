// Domain layer: listing model, attribute selectors and ports. No I/O here.

pub mod attribute;
pub mod model;
pub mod ports;
