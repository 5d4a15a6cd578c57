use clap::Subcommand;

use super::{app_context, report_eviction, require_auth, AppContext};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List notifications
    List {
        /// Only unread ones
        #[arg(long)]
        unread: bool,
    },
    /// Number of unread notifications
    Count,
    /// Mark one notification read
    Read { id: i64 },
    /// Mark every notification read
    ReadAll,
    /// Delete a notification
    Remove { id: i64 },
}

pub async fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app_context()?;
    require_auth(&ctx)?;
    let result = exec(&ctx, action).await;
    report_eviction(&ctx);
    result
}

async fn exec(ctx: &AppContext, action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::List { unread } => {
            let notifications = if unread {
                ctx.api.notifications().unread().await?
            } else {
                ctx.api.notifications().list().await?
            };
            if notifications.is_empty() {
                println!("No notifications.");
            }
            for n in notifications {
                let marker = match n.status {
                    habitkit_core::models::NotificationStatus::Unread => "*",
                    habitkit_core::models::NotificationStatus::Read => " ",
                };
                println!("{marker} #{} [{:?}] {}: {}", n.id, n.notification_type, n.title, n.message);
            }
        }
        NotifyAction::Count => {
            println!("{}", ctx.api.notifications().unread_count().await?);
        }
        NotifyAction::Read { id } => {
            ctx.api.notifications().mark_read(id).await?;
            println!("Notification #{id} marked read");
        }
        NotifyAction::ReadAll => {
            ctx.api.notifications().mark_all_read().await?;
            println!("All notifications marked read");
        }
        NotifyAction::Remove { id } => {
            ctx.api.notifications().delete(id).await?;
            println!("Notification #{id} deleted");
        }
    }
    Ok(())
}
