use admin_api::{SessionExpiredReason, SessionExpiryHandler};
use smart_energy_admin::{
    AdminError, NotificationForm, Page, Pagination, SmartEnergyAdmin,
};

use crate::cli::{Command, NotificationsCommand, OrdersCommand, PageArgs};

/// Tells the operator to sign in again once the session is gone.
pub struct ReloginNotice;

impl SessionExpiryHandler for ReloginNotice {
    fn session_expired(&self, login_path: &str, reason: &SessionExpiredReason) {
        log::debug!("login entry point: {login_path}");
        eprintln!("Session expired ({reason}). Run `smart-energy-admin login` to sign in again.");
    }
}

impl From<PageArgs> for Pagination {
    fn from(args: PageArgs) -> Self {
        Pagination::new(args.page, args.limit)
    }
}

pub async fn run(admin: &SmartEnergyAdmin, command: Command) -> Result<(), AdminError> {
    match command {
        Command::Login { email, password } => {
            let user = admin.login(&email, &password).await?;
            println!("Signed in as {} ({})", user.display_name(), user.id);
        }
        Command::RequestCode { email } => {
            admin.request_code(&email).await?;
            println!("Code sent to {email}");
        }
        Command::Verify { email, code } => {
            let user = admin.verify(&email, code).await?;
            println!("Signed in as {} ({})", user.display_name(), user.id);
        }
        Command::Logout => {
            admin.logout()?;
            println!("Signed out");
        }
        Command::Whoami => println!("{}", admin.require_admin()?),
        Command::Notifications(NotificationsCommand::List { page }) => {
            admin.require_admin()?;
            let listing = admin.list_notifications(page.into()).await?;
            print_page(&listing, |item| format!("{}  {}", item.id, item.title_uz));
        }
        Command::Notifications(NotificationsCommand::Create {
            title_uz,
            title_ru,
            description_uz,
            description_ru,
        }) => {
            admin.require_admin()?;
            let form = NotificationForm {
                title_uz,
                description_uz,
                title_ru,
                description_ru,
            };
            let created = admin.create_notification(&form).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Command::Categories { kind, page, search } => {
            admin.require_admin()?;
            let listing = admin
                .list_categories(kind, page.into(), search.as_deref())
                .await?;
            print_page(&listing, |item| {
                format!("{}  {} / {}", item.id, item.name_uz, item.name_ru)
            });
        }
        Command::Products { page } => {
            admin.require_admin()?;
            let listing = admin.list_products(page.into()).await?;
            print_page(&listing, |item| {
                format!("{}  {}  {}", item.id, item.name_uz, item.formatted_price())
            });
        }
        Command::Services { page } => {
            admin.require_admin()?;
            let listing = admin.list_services(page.into()).await?;
            print_page(&listing, |item| {
                format!("{}  {}  {}", item.id, item.name_uz, item.formatted_price())
            });
        }
        Command::Orders(OrdersCommand::List { page }) => {
            admin.require_admin()?;
            let listing = admin.list_orders(page.into()).await?;
            print_page(&listing, |item| {
                format!("{}  {:<9}  {}", item.id, item.status, item.formatted_total())
            });
        }
        Command::Orders(OrdersCommand::SetStatus { id, status }) => {
            admin.require_admin()?;
            admin.update_order_status(&id, status).await?;
            println!("Order {id} is now {status}");
        }
        Command::Announcement { kind } => {
            admin.require_admin()?;
            match admin.get_announcement(kind).await? {
                Some(current) => println!(
                    "{} / {}  {}",
                    current.name_uz,
                    current.name_ru,
                    current.formatted_price()
                ),
                None => println!("No {kind} announcement"),
            }
        }
        Command::Delete { path, id } => {
            admin.require_admin()?;
            admin.delete(&path, &id).await?;
            println!("Deleted {path}/{id}");
        }
    }
    Ok(())
}

fn print_page<T>(page: &Page<T>, line: impl Fn(&T) -> String) {
    for item in &page.items {
        println!("{}", line(item));
    }
    println!("-- {} of {}", page.items.len(), page.count);
}
