use clap::Subcommand;
use habitkit_core::models::RegisterRequest;

use super::{app_context, report_eviction, AppContext};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in and persist the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account (sign in separately afterwards)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Sign out and clear the persisted session
    Logout,
    /// Show who is signed in
    Status,
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app_context()?;
    let result = exec(&ctx, action).await;
    report_eviction(&ctx);
    result
}

async fn exec(ctx: &AppContext, action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { username, password } => {
            let user = ctx.session.login(&username, &password).await?;
            println!("Signed in as {} <{}>", user.username, user.email);
        }
        AuthAction::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let fields = RegisterRequest {
                username,
                email,
                password,
                first_name,
                last_name,
            };
            let message = ctx.session.register(&fields).await?;
            println!("{message}");
            println!("Sign in with 'habitkit auth login'.");
        }
        AuthAction::Logout => {
            ctx.session.logout();
            println!("Signed out");
        }
        AuthAction::Status => {
            let session = ctx.session.current();
            match session.user {
                Some(user) => println!("authenticated as {} <{}>", user.username, user.email),
                None => println!("not authenticated"),
            }
        }
    }
    Ok(())
}
