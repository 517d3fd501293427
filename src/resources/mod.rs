//! Typed calls for each dashboard screen, all as methods on
//! [`SmartEnergyAdmin`](crate::SmartEnergyAdmin).

pub mod admins;
pub mod announcements;
pub mod auth;
pub mod categories;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod services;
