/// Authorization and credential utilities
///
/// - `authorization`: ownership and membership checks gating project access
/// - `password`: bcrypt hashing for user credentials
///
/// There is deliberately no authentication here - the acting user id is an
/// opaque value supplied by the caller.

pub mod authorization;
pub mod password;
