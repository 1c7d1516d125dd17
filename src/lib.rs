// Module layout (Clean Architecture style)
// - bootstrap: configuration, telemetry and the dependency container
// - infrastructure: in-memory store and notification adapters
// - application: access guard, discussion services, use cases and ports
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
