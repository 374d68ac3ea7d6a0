//! HTTP API handlers for mtt-ui

pub mod auth;
pub mod data;
pub mod health;
pub mod login;
pub mod ui;

pub use auth::{require_session, require_session_page};
pub use data::{download_backup, get_data, save_data};
pub use health::health_routes;
pub use login::{login, login_page, logout};
pub use ui::serve_index;
