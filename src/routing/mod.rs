pub mod dispatch;
pub mod guard;
pub mod routes;
pub mod screen;

pub use dispatch::{View, dispatch, view_for_role};
pub use guard::{GuardDecision, RouteGuard};
pub use routes::Route;
pub use screen::{Screen, resolve};
