//! Smart Energy admin client.
//!
//! [`SmartEnergyAdmin`] wraps the authenticated [`admin_api::AdminApiClient`]
//! with typed calls for every dashboard screen: sign-in, admin users,
//! notifications, announcements, categories, products, services and orders.
//! Session tokens live in a [`session_store::SessionStorage`]; an expired
//! access token is refreshed transparently, and an unrecoverable session ends
//! in [`AdminError::is_session_expired`] after the store has been cleared.
//!
//! # Configuration
//! [`config::Settings`] resolves defaults, an optional JSON file, and the
//! `SMART_ENERGY_*` environment variables. [`logging::init_logging`] installs
//! `env_logger` for binaries.

pub mod admin;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod resources;

pub use admin::{Page, Pagination, SmartEnergyAdmin};
pub use config::{EnvConfig, FileConfig, Settings};
pub use error::{AdminError, ConfigError};
pub use format::{format_price, PriceInput};
pub use resources::admins::AdminForm;
pub use resources::announcements::{Announcement, AnnouncementKind};
pub use resources::auth::AdminUser;
pub use resources::categories::{Category, CategoryForm, CategoryKind};
pub use resources::notifications::{Notification, NotificationForm};
pub use resources::orders::{Order, OrderForm, OrderStatus};
pub use resources::products::{Product, ProductForm};
pub use resources::services::{Service, ServiceForm};
