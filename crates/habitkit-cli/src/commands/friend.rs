use clap::Subcommand;
use habitkit_core::models::Friendship;

use super::{app_context, report_eviction, require_auth, AppContext};

#[derive(Subcommand)]
pub enum FriendAction {
    /// List accepted friends
    List,
    /// Friend requests waiting for your answer
    Pending,
    /// Friend requests you sent
    Sent,
    /// Send a friend request to a user
    Request { user_id: i64 },
    /// Accept a friend request
    Accept { friendship_id: i64 },
    /// Decline a friend request
    Decline { friendship_id: i64 },
    /// Remove a friend
    Remove { friendship_id: i64 },
}

pub async fn run(action: FriendAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app_context()?;
    require_auth(&ctx)?;
    let result = exec(&ctx, action).await;
    report_eviction(&ctx);
    result
}

async fn exec(ctx: &AppContext, action: FriendAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FriendAction::List => {
            let friends = ctx.api.friends().list().await?;
            if friends.is_empty() {
                println!("No friends yet.");
            }
            for user in friends {
                println!("#{} {} <{}>", user.id, user.username, user.email);
            }
        }
        FriendAction::Pending => {
            for friendship in ctx.api.friends().pending().await? {
                print_request(&friendship, &friendship.requester.username);
            }
        }
        FriendAction::Sent => {
            for friendship in ctx.api.friends().sent().await? {
                print_request(&friendship, &friendship.addressee.username);
            }
        }
        FriendAction::Request { user_id } => {
            let friendship = ctx.api.friends().request(user_id).await?;
            println!(
                "Request sent to {} (friendship #{})",
                friendship.addressee.username, friendship.id
            );
        }
        FriendAction::Accept { friendship_id } => {
            let friendship = ctx.api.friends().accept(friendship_id).await?;
            println!("You are now friends with {}", friendship.requester.username);
        }
        FriendAction::Decline { friendship_id } => {
            ctx.api.friends().decline(friendship_id).await?;
            println!("Request declined");
        }
        FriendAction::Remove { friendship_id } => {
            ctx.api.friends().remove(friendship_id).await?;
            println!("Friend removed");
        }
    }
    Ok(())
}

fn print_request(friendship: &Friendship, counterpart: &str) {
    println!(
        "#{} {} ({:?}, since {})",
        friendship.id, counterpart, friendship.status, friendship.created_at
    );
}
