pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::{AuthUser, Claims};
pub use jwt::{JwtConfig, JwtService};
pub use middleware::jwt_auth_middleware;
