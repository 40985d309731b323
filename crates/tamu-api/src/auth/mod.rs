// Authentication module
// Decision: stateless HS256 JWTs; role checks read the claims, /auth/me
//   reads the database

pub mod jwt;
pub mod middleware;
pub mod routes;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthOperator;
pub use routes::{routes, AuthState};
