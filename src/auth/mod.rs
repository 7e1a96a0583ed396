pub mod middleware;
pub mod password;
pub mod session;
pub mod username;

pub use middleware::{safe_next, session_token, MaybeUser, RequireUser, LOGIN_PATH};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use session::{
    clear_session_cookie, generate_session_token, purge_expired_sessions, start_session,
};
pub use username::validate_username;
