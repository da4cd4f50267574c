pub mod identity;
pub mod token;
pub mod user;

pub use identity::{Identity, IdentityPayload, Role, UserId};
pub use token::SessionToken;
pub use user::{AuthResponse, Claims, LoginRequest, RegisterRequest};
