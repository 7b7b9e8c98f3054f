use bmi_core::validation::validate_user_id;
use bmi_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bmifit")]
#[command(about = "BMI tracking and workout plan recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User whose history and profile to use
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate and classify BMI without recording it
    Bmi {
        /// Body weight in kilograms
        #[arg(long)]
        weight: f64,

        /// Height in centimetres
        #[arg(long)]
        height: f64,
    },

    /// Record a measurement in the history
    Log {
        /// Body weight in kilograms
        #[arg(long)]
        weight: f64,

        /// Height in centimetres
        #[arg(long)]
        height: f64,
    },

    /// List recorded measurements, newest first
    History {
        /// Show at most this many measurements
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete all recorded measurements
    Clear,

    /// Show or set the goal (lose, gain, fit, or auto to infer it from BMI)
    Goal {
        selection: Option<GoalSelection>,
    },

    /// Build a workout plan
    Plan {
        /// Body weight in kilograms (defaults to the latest measurement)
        #[arg(long, requires = "height")]
        weight: Option<f64>,

        /// Height in centimetres (defaults to the latest measurement)
        #[arg(long, requires = "weight")]
        height: Option<f64>,

        /// Goal for this plan (lose, gain, fit); defaults to the profile goal
        #[arg(long)]
        goal: Option<Goal>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the measurement history as CSV
    Export {
        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    bmi_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let user = cli
        .user
        .unwrap_or_else(|| config.profile.default_user.clone());
    validate_user_id(&user)?;

    let ctx = Context {
        history: JsonlHistoryStore::new(data_dir.join("history")),
        profile_path: profile_path(&data_dir.join("profiles"), &user)?,
        user,
        limits: config.limits,
    };

    match cli.command {
        Commands::Bmi { weight, height } => cmd_bmi(&ctx, weight, height),
        Commands::Log { weight, height } => cmd_log(ctx, weight, height),
        Commands::History { limit } => cmd_history(&ctx, limit),
        Commands::Clear => cmd_clear(ctx),
        Commands::Goal { selection } => cmd_goal(&ctx, selection),
        Commands::Plan {
            weight,
            height,
            goal,
            json,
        } => cmd_plan(&ctx, weight.zip(height), goal, json),
        Commands::Export { output } => cmd_export(&ctx, &output),
    }
}

struct Context {
    history: JsonlHistoryStore,
    profile_path: PathBuf,
    user: String,
    limits: Limits,
}

fn cmd_bmi(ctx: &Context, weight: f64, height: f64) -> Result<()> {
    ctx.limits.validate(weight, height)?;

    let reading = assess(weight, height);
    println!("BMI: {:.1}", round1(reading.bmi));
    println!("Category: {}", reading.category.label());
    println!("{}", reading.category.note());
    Ok(())
}

fn cmd_log(mut ctx: Context, weight: f64, height: f64) -> Result<()> {
    ctx.limits.validate(weight, height)?;

    let record = MeasurementRecord::new(ctx.user.clone(), weight, height, chrono::Utc::now());
    ctx.history.append(&record)?;

    println!(
        "✓ Logged {:.1} kg / {:.1} cm: BMI {:.1} ({})",
        record.weight_kg,
        record.height_cm,
        record.bmi,
        record.category.label()
    );
    Ok(())
}

fn cmd_history(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let records = ctx.history.list(&ctx.user)?;

    if records.is_empty() {
        println!("No measurements recorded.");
        return Ok(());
    }

    let shown = limit.unwrap_or(records.len());
    for record in records.iter().take(shown) {
        println!(
            "{}  {:>6.1} kg  {:>6.1} cm  BMI {:>4.1}  {}",
            record.recorded_at.format("%Y-%m-%d %H:%M"),
            record.weight_kg,
            record.height_cm,
            record.bmi,
            record.category.label()
        );
    }
    Ok(())
}

fn cmd_clear(mut ctx: Context) -> Result<()> {
    let count = ctx.history.clear(&ctx.user)?;
    println!("✓ Cleared {} measurements", count);
    Ok(())
}

fn cmd_goal(ctx: &Context, selection: Option<GoalSelection>) -> Result<()> {
    if let Some(selection) = selection {
        UserProfile::update(&ctx.profile_path, |p| p.goal = selection)?;
        println!("✓ Goal set to {}", selection);
        return Ok(());
    }

    let profile = UserProfile::load(&ctx.profile_path)?;
    let latest_bmi = ctx.history.latest(&ctx.user)?.map(|r| r.bmi);
    let resolved = resolve_goal(profile.goal, latest_bmi);

    println!("Selected goal: {}", profile.goal);
    match (profile.goal, latest_bmi) {
        (GoalSelection::Unset, Some(bmi)) => {
            println!("Plan goal: {} (inferred from BMI {:.1})", resolved, bmi)
        }
        _ => println!("Plan goal: {}", resolved),
    }
    Ok(())
}

fn cmd_plan(
    ctx: &Context,
    measurement: Option<(f64, f64)>,
    goal: Option<Goal>,
    json: bool,
) -> Result<()> {
    let (weight, height, bmi) = match measurement {
        Some((weight, height)) => {
            ctx.limits.validate(weight, height)?;
            (weight, height, calculate_bmi(weight, height))
        }
        None => {
            let latest = ctx.history.latest(&ctx.user)?.ok_or_else(|| {
                Error::History(
                    "no measurements recorded; pass --weight and --height or log one first"
                        .into(),
                )
            })?;
            (latest.weight_kg, latest.height_cm, latest.bmi)
        }
    };

    let goal = match goal {
        Some(goal) => goal,
        None => {
            let profile = UserProfile::load(&ctx.profile_path)?;
            resolve_goal(profile.goal, Some(bmi))
        }
    };

    tracing::info!("Planning for {} with goal {}", ctx.user, goal);
    let plan = build_plan(weight, height, bmi, goal);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan);
    }
    Ok(())
}

fn cmd_export(ctx: &Context, output: &Path) -> Result<()> {
    let records = ctx.history.list(&ctx.user)?;
    let count = export_csv(&records, output)?;
    println!("✓ Exported {} measurements to {}", count, output.display());
    Ok(())
}

fn display_plan(plan: &WorkoutPlan) {
    let gym = &plan.gym_plan;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} PLAN", plan.goal.as_str().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", plan.summary);
    println!();
    println!("  Current weight: {:.1} kg", plan.current_weight_kg);
    println!(
        "  Target weight:  {:.1} kg (BMI {:.1})",
        plan.target_weight_kg, plan.target_bmi
    );
    println!("  Change:         {:+.1} kg", plan.delta_kg);
    println!("  Estimated time: {} weeks", plan.estimated_weeks);
    println!();
    println!(
        "  → Strength: {} × {} min per week",
        gym.strength_sessions_per_week, gym.strength_minutes_per_session
    );
    println!(
        "  → Cardio:   {} × {} min per week",
        gym.cardio_sessions_per_week, gym.cardio_minutes_per_session
    );
    println!("  → Steps:    {} per day", gym.steps_per_day);

    if !plan.notes.is_empty() {
        println!();
        for note in &plan.notes {
            println!("  ℹ {}", note);
        }
    }

    println!();
}
