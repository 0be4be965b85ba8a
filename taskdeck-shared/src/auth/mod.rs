/// Authentication and authorization
///
/// - `password`: Argon2id hashing and verification
/// - `jwt`: access/refresh token creation and validation
/// - `middleware`: bearer-token extraction producing an `AuthContext`
/// - `authorization`: role and ownership checks over an `AuthContext`

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
