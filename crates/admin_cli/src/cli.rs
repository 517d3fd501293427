use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use smart_energy_admin::{AnnouncementKind, CategoryKind, OrderStatus};

#[derive(Debug, Parser)]
#[command(name = "smart-energy-admin")]
#[command(version)]
#[command(about = "Operate the Smart Energy admin backend from the terminal")]
pub struct Cli {
    /// Backend base URL (overrides SMART_ENERGY_API_URL and the config file).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides SMART_ENERGY_SESSION_PATH).
    #[arg(long, global = true)]
    pub session_path: Option<PathBuf>,

    /// Request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// More log output; repeat for debug and trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SMART_ENERGY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Email a one-time sign-in code.
    RequestCode {
        #[arg(long)]
        email: String,
    },
    /// Sign in with the emailed code.
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: u32,
    },
    /// Forget the stored session.
    Logout,
    /// Print the signed-in admin id.
    Whoami,
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// List product or service categories.
    Categories {
        #[arg(value_parser = parse_category_kind)]
        kind: CategoryKind,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        search: Option<String>,
    },
    /// List products.
    Products {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List services.
    Services {
        #[command(flatten)]
        page: PageArgs,
    },
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Show the current product or service announcement.
    Announcement {
        #[arg(value_parser = parse_announcement_kind)]
        kind: AnnouncementKind,
    },
    /// Delete `{path}/{id}`.
    Delete { path: String, id: String },
}

/// Manage broadcast notifications.
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        title_uz: String,
        #[arg(long)]
        title_ru: String,
        #[arg(long, default_value = "")]
        description_uz: String,
        #[arg(long, default_value = "")]
        description_ru: String,
    },
}

/// Inspect orders and move them through their statuses.
#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    SetStatus {
        id: String,
        #[arg(value_parser = parse_order_status)]
        status: OrderStatus,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

fn parse_category_kind(value: &str) -> Result<CategoryKind, String> {
    value.parse()
}

fn parse_announcement_kind(value: &str) -> Result<AnnouncementKind, String> {
    value.parse()
}

fn parse_order_status(value: &str) -> Result<OrderStatus, String> {
    value.parse()
}
