// Domain layer: value objects, the audit entity, ports and the evaluator.
// No I/O here; everything is synchronous and deterministic except the
// async port signatures implemented by adapters.

pub mod model;
pub mod ports;
pub mod services;
