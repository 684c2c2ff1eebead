pub mod password;
pub mod sessions;

pub use password::{hash_password, verify_password, PasswordAuthenticator};
pub use sessions::InMemorySessionStore;
