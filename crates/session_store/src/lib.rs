//! Durable client-side session state for the admin client.
//!
//! A session holds the bearer credentials issued by the backend
//! (`access_token`, `refresh_token`) and the signed-in admin's `user_id`.
//! Storage is exposed through [`SessionStorage`] so the request pipeline can
//! read tokens at send time without knowing where they live.

mod error;
mod paths;
mod session;
mod store;

pub use error::SessionStoreError;
pub use paths::{session_file_path, session_root, SESSION_DIR, SESSION_FILE_NAME};
pub use session::{Session, SESSION_FORMAT_VERSION};
pub use store::{FileSessionStore, MemorySessionStore, SessionStorage};
