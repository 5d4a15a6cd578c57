use clap::Subcommand;
use habitkit_core::models::{CompetitionType, NewCompetition};

use super::{app_context, report_eviction, require_auth, AppContext};

#[derive(Subcommand)]
pub enum CompeteAction {
    /// List competitions
    List,
    /// Show one competition with its leaderboard
    Show { id: i64 },
    /// Create a competition
    Add {
        name: String,
        /// streak, completions, time
        #[arg(long, default_value = "streak")]
        kind: String,
        /// Start date (RFC 3339)
        #[arg(long)]
        start: String,
        /// End date (RFC 3339)
        #[arg(long)]
        end: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Join a competition
    Join { id: i64 },
    /// Leave a competition
    Leave { id: i64 },
}

pub async fn run(action: CompeteAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app_context()?;
    require_auth(&ctx)?;
    let result = exec(&ctx, action).await;
    report_eviction(&ctx);
    result
}

async fn exec(ctx: &AppContext, action: CompeteAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CompeteAction::List => {
            let competitions = ctx.api.competitions().list().await?;
            if competitions.is_empty() {
                println!("No competitions.");
            }
            for c in competitions {
                let state = if c.is_active { "active" } else { "ended" };
                println!(
                    "#{} {} ({:?}, {state}, {} -> {})",
                    c.id, c.name, c.competition_type, c.start_date, c.end_date
                );
            }
        }
        CompeteAction::Show { id } => {
            let c = ctx.api.competitions().get(id).await?;
            println!("#{} {} ({:?})", c.id, c.name, c.competition_type);
            if let Some(description) = &c.description {
                println!("{description}");
            }
            println!("{} -> {}", c.start_date, c.end_date);
            for p in &c.participants {
                println!("  {:>3}. {} -- {}", p.rank, p.user.username, p.score);
            }
        }
        CompeteAction::Add {
            name,
            kind,
            start,
            end,
            description,
        } => {
            let competition = NewCompetition {
                name,
                description,
                competition_type: parse_kind(&kind)?,
                start_date: start,
                end_date: end,
                is_active: true,
            };
            let created = ctx.api.competitions().create(&competition).await?;
            println!("Competition created: #{} {}", created.id, created.name);
        }
        CompeteAction::Join { id } => {
            ctx.api.competitions().join(id).await?;
            println!("Joined competition #{id}");
        }
        CompeteAction::Leave { id } => {
            ctx.api.competitions().leave(id).await?;
            println!("Left competition #{id}");
        }
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<CompetitionType, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "streak" => Ok(CompetitionType::Streak),
        "completions" => Ok(CompetitionType::CompletionCount),
        "time" => Ok(CompetitionType::TimeBased),
        other => Err(format!("unknown competition type: {other}").into()),
    }
}
