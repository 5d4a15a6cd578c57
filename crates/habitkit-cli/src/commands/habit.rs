use clap::Subcommand;
use habitkit_core::models::{Habit, HabitFrequency, HabitType, HabitUpdate, NewCompletion, NewHabit};

use super::{app_context, report_eviction, require_auth, AppContext};

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits
    List {
        /// Emit raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one habit
    Show { id: i64 },
    /// Create a habit
    Add {
        name: String,
        /// health, productivity, learning, social, finance, mindfulness,
        /// creative, maintenance
        #[arg(long, default_value = "health")]
        kind: String,
        /// daily, weekly, monthly
        #[arg(long, default_value = "daily")]
        frequency: String,
        #[arg(long, default_value_t = 1.0)]
        target: f64,
        #[arg(long, default_value = "times")]
        unit: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update fields of a habit
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Activate or deactivate (true/false)
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a habit
    Remove { id: i64 },
    /// Record a completion for a habit
    Done {
        id: i64,
        #[arg(long)]
        value: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
}

pub async fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app_context()?;
    require_auth(&ctx)?;
    let result = exec(&ctx, action).await;
    report_eviction(&ctx);
    result
}

async fn exec(ctx: &AppContext, action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HabitAction::List { json } => {
            let habits = ctx.api.habits().list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("No habits yet. Create one with 'habitkit habit add'.");
            } else {
                for habit in &habits {
                    print_habit_line(habit);
                }
            }
        }
        HabitAction::Show { id } => {
            let habit = ctx.api.habits().get(id).await?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Add {
            name,
            kind,
            frequency,
            target,
            unit,
            description,
        } => {
            let habit = NewHabit {
                name,
                description,
                habit_type: parse_kind(&kind)?,
                frequency: parse_frequency(&frequency)?,
                target_value: target,
                target_unit: unit,
                is_active: true,
            };
            let created = ctx.api.habits().create(&habit).await?;
            println!("Habit created: #{} {}", created.id, created.name);
        }
        HabitAction::Edit {
            id,
            name,
            kind,
            frequency,
            target,
            unit,
            description,
            active,
        } => {
            let update = HabitUpdate {
                name,
                description,
                habit_type: kind.as_deref().map(parse_kind).transpose()?,
                frequency: frequency.as_deref().map(parse_frequency).transpose()?,
                target_value: target,
                target_unit: unit,
                is_active: active,
            };
            let habit = ctx.api.habits().update(id, &update).await?;
            println!("Habit updated: #{} {}", habit.id, habit.name);
        }
        HabitAction::Remove { id } => {
            ctx.api.habits().delete(id).await?;
            println!("Habit #{id} deleted");
        }
        HabitAction::Done { id, value, notes } => {
            let completion = NewCompletion { value, notes };
            let recorded = ctx.api.habits().complete(id, &completion).await?;
            println!(
                "Completion recorded for habit #{} on {}",
                recorded.habit_id, recorded.completion_date
            );
        }
    }
    Ok(())
}

fn print_habit_line(habit: &Habit) {
    let state = if habit.is_active { "" } else { " (inactive)" };
    println!(
        "#{} {} -- {:?}/{:?}, target {} {}{}",
        habit.id,
        habit.name,
        habit.habit_type,
        habit.frequency,
        habit.target_value,
        habit.target_unit,
        state
    );
}

fn parse_kind(s: &str) -> Result<HabitType, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "health" => Ok(HabitType::Health),
        "productivity" => Ok(HabitType::Productivity),
        "learning" => Ok(HabitType::Learning),
        "social" => Ok(HabitType::Social),
        "finance" => Ok(HabitType::Finance),
        "mindfulness" => Ok(HabitType::Mindfulness),
        "creative" => Ok(HabitType::Creative),
        "maintenance" => Ok(HabitType::Maintenance),
        other => Err(format!("unknown habit type: {other}").into()),
    }
}

fn parse_frequency(s: &str) -> Result<HabitFrequency, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "daily" => Ok(HabitFrequency::Daily),
        "weekly" => Ok(HabitFrequency::Weekly),
        "monthly" => Ok(HabitFrequency::Monthly),
        other => Err(format!("unknown frequency: {other}").into()),
    }
}
