use crate::render::stat_bar;
use capygotchi::config::{load_settings, project_paths, save_settings_atomic};
use capygotchi::engine::PetEngine;
use capygotchi::model::{ActionKind, PetPhase, PetState, StatKind};
use capygotchi::notify::{event_text, PendingAlertsFile};
use capygotchi::storage::JsonFileStore;
use capygotchi::{alerts::alert_text, telemetry};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub(crate) type FileEngine = PetEngine<JsonFileStore, PendingAlertsFile>;

#[derive(Parser, Debug)]
#[command(name = "capygotchi")]
#[command(about = "A capybara that gets hungry, thirsty and lonely while you're away")]
pub(crate) struct Cli {
    /// Directory for save, settings, alerts and log files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Open the terminal UI (default)
    Play,
    /// Print stats and coins
    Status,
    /// Buy food
    Feed { amount: Option<u8> },
    /// Buy water
    Water { amount: Option<u8> },
    /// Pet the capybara (free)
    Pet { amount: Option<u8> },
    /// List the pending alert schedule
    Alerts,
    /// Add coins
    Credit { amount: u32 },
    /// Give the capybara a new name
    Rename { name: String },
    /// Welcome a new capybara after the last one ran away
    Reset,
}

pub(crate) fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = project_paths(cli.data_dir)?;
    let settings = load_settings(&paths.settings_path);
    if !paths.settings_path.exists() {
        // leave an editable copy of the defaults behind
        save_settings_atomic(&paths.settings_path, &settings)?;
    }
    telemetry::init_logging(&paths.log_path, &settings.log_filter)?;

    let store = JsonFileStore::new(&paths.save_path);
    let scheduler = PendingAlertsFile::open(&paths.alerts_path);
    let (mut engine, opened) = PetEngine::open(store, scheduler, settings.rules.clone(), Utc::now());
    tracing::info!(hours = opened.hours_applied, "session started");

    let command = cli.command.unwrap_or(Command::Play);
    if !matches!(command, Command::Play) {
        for event in &opened.events {
            let (title, body) = event_text(&engine.state().name, event);
            println!("! {title}: {body}");
        }
    }

    let now = Utc::now();
    match command {
        Command::Play => return crate::app::run(engine, settings, opened),
        Command::Status => print_status(engine.state()),
        Command::Feed { amount } => act(&mut engine, ActionKind::Feed, amount)?,
        Command::Water { amount } => act(&mut engine, ActionKind::Water, amount)?,
        Command::Pet { amount } => act(&mut engine, ActionKind::Pet, amount)?,
        Command::Alerts => print_alerts(&engine),
        Command::Credit { amount } => {
            engine.credit(amount);
            println!("coins: {}", engine.state().currency);
        }
        Command::Rename { name } => {
            if engine.rename(&name, now) {
                println!("say hello to {}", engine.state().name);
            } else {
                println!("name unchanged: {}", engine.state().name);
            }
        }
        Command::Reset => {
            engine.reset(now)?;
            println!("{} came back home!", engine.state().name);
        }
    }
    Ok(())
}

fn act(engine: &mut FileEngine, kind: ActionKind, amount: Option<u8>) -> anyhow::Result<()> {
    let magnitude = amount.unwrap_or_else(|| engine.rules().magnitude(kind));
    let value = engine.apply_action(kind, magnitude, Utc::now())?;
    println!(
        "{} is now {value} (coins: {})",
        kind.target(),
        engine.state().currency
    );
    Ok(())
}

fn print_status(st: &PetState) {
    let phase = match st.phase() {
        PetPhase::Active => "at home",
        PetPhase::RanAway => "ran away (run `reset` to start over)",
    };
    println!("{} - {phase}", st.name);
    for kind in StatKind::ALL {
        let v = st.stat(kind);
        println!("  {:<10} {} {:>3}", kind.label(), stat_bar(v, 20), v);
    }
    println!("  coins      {}", st.currency);
    println!("  anchored   {}", st.last_update.format("%Y-%m-%d %H:%M UTC"));
}

fn print_alerts(engine: &FileEngine) {
    let schedule = engine.alert_schedule();
    if schedule.is_empty() {
        println!("no alerts scheduled");
        return;
    }
    let now = Utc::now();
    for alert in schedule {
        let (title, body) = alert_text(&engine.state().name, &alert);
        let at = now + ChronoDuration::hours(i64::from(alert.offset_hours));
        println!(
            "in {:>3}h  {}  {title} ({body})",
            alert.offset_hours,
            at.format("%a %H:%M UTC")
        );
    }
}
