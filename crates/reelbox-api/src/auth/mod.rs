//! Access gate: route classification, session resolution and enforcement.

pub mod gate;
pub mod middleware;
pub mod models;
pub mod routes;

pub use gate::{decide, GateDecision};
pub use middleware::{access_gate_middleware, AuthState};
pub use models::{AuthSubject, JwtClaims};
pub use routes::{RouteClass, RouteTable};
