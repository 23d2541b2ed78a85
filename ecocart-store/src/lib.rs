pub mod app_config;
pub mod session_store;

pub use app_config::Config;
pub use session_store::{SessionStore, StoreError};
