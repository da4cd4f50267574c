pub mod auth;
pub mod throttle;

pub use auth::{AuthUser, auth_middleware};
pub use throttle::LoginThrottle;
