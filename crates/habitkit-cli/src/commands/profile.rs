use clap::Subcommand;
use habitkit_core::models::UserUpdate;

use super::{app_context, report_eviction, require_auth, AppContext};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the signed-in user's profile
    Show,
    /// Update profile fields
    Edit {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}

pub async fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app_context()?;
    require_auth(&ctx)?;
    let result = exec(&ctx, action).await;
    report_eviction(&ctx);
    result
}

async fn exec(ctx: &AppContext, action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Show => {
            let user = ctx.api.users().profile().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        ProfileAction::Edit {
            email,
            first_name,
            last_name,
        } => {
            let update = UserUpdate {
                email,
                first_name,
                last_name,
            };
            let user = ctx.api.users().update_profile(&update).await?;
            println!("Profile updated for {}", user.username);
        }
    }
    Ok(())
}
