use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Result, WrapErr};
use uuid::Uuid;

use sialo_app::default_data_dir;
use sialo_app::error::AppError;
use sialo_app::fields::{FIELD_PATHS, ordinal, parse_edit};
use sialo_app::logging;
use sialo_app::observe::{self, Outcome, Progress};
use sialo_app::session::Session;
use sialo_core::models::evaluation::{INTERVAL_COUNT, SLOT_SECONDS, SessionKind};
use sialo_core::models::record::Mode;
use sialo_export::{ExportFormat, file_base};
use sialo_instruments::instruments::dq5::score_session;
use sialo_instruments::scoring::format_pct;
use sialo_instruments::wizard::{Advance, Step, StepStatus, WizardFlow};
use sialo_storage::store::FileStore;

#[derive(Parser)]
#[command(name = "sialo", version)]
#[command(about = "Guided sialorrhea assessment: DQ5, drooling scales and narrative report")]
struct Cli {
    /// Directory holding evaluations and configuration
    #[arg(long, env = "SIALO_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Require an integration comment on the synthesis step when results disagree
    #[arg(long, global = true)]
    legacy_flow: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a blank evaluation and focus it
    New,
    /// List stored evaluations, newest first
    List,
    /// Focus an evaluation by id
    Select { id: Uuid },
    /// Copy the focused evaluation and focus the copy
    Duplicate,
    /// Add a filled-in sample evaluation and focus it
    Demo,
    /// Set one field of the focused evaluation, e.g. `set daily.seated 2`
    Set { field: String, value: String },
    /// Flip one DQ5 slot (1-20)
    Toggle { session: SessionArg, slot: String },
    /// Switch between guided and quick navigation
    Mode { mode: ModeArg },
    /// Advance to the next step
    Next,
    /// Go back one step
    Prev,
    /// Jump to a step by number (0-8)
    Goto { step: usize },
    /// Current step, its completeness and the step list
    Status,
    /// Clinical summary, checklist and report preview
    Review {
        #[arg(long)]
        json: bool,
    },
    /// Print the narrative report, generating it if none is stored
    Report {
        /// Discard the stored text and generate it again
        #[arg(long)]
        regenerate: bool,
    },
    /// Print the orienting diagnosis, generating it if none is stored
    Diagnosis {
        #[arg(long)]
        regenerate: bool,
    },
    /// Write the focused evaluation to a file
    Export {
        format: FormatArg,
        /// Output path (default: sialorrhea_assessment_<name>_<date>.<ext>)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show or change the scoring configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Run the 5-minute DQ5 countdown; press Enter to mark an escape
    Observe {
        session: SessionArg,
        /// Clear the session's marks before starting
        #[arg(long)]
        clear: bool,
    },
    /// Delete every evaluation and the configuration
    Wipe {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    /// Change band cut-points (percent); omitted values are kept
    Bands {
        #[arg(long)]
        dq5_low: Option<f64>,
        #[arg(long)]
        dq5_mild: Option<f64>,
        #[arg(long)]
        dq5_moderate: Option<f64>,
        #[arg(long)]
        dis_low: Option<f64>,
        #[arg(long)]
        dis_moderate: Option<f64>,
    },
    /// Rename an impact item (numbered from 1)
    Item { number: String, label: String },
    /// Append an impact item
    AddItem,
    /// Restore the default configuration
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum SessionArg {
    Activity,
    Rest,
}

impl From<SessionArg> for SessionKind {
    fn from(arg: SessionArg) -> Self {
        match arg {
            SessionArg::Activity => SessionKind::Activity,
            SessionArg::Rest => SessionKind::Rest,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Guided,
    Quick,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Guided => Mode::Guided,
            ModeArg::Quick => Mode::Quick,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
    Html,
    Docx,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Docx => ExportFormat::Docx,
        }
    }
}

type AppSession = Session<FileStore>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    tracing::subscriber::set_global_default(logging::subscriber(cli.log_json, std::io::stderr))?;

    let dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    tracing::debug!(dir = %dir.display(), "opening store");

    let mut session = Session::open(FileStore::new(dir)).wrap_err("failed to open data store")?;
    if cli.legacy_flow {
        session.set_flow(WizardFlow::Legacy);
    }

    run(&mut session, cli.command).await?;
    session.close()?;
    Ok(())
}

async fn run(session: &mut AppSession, command: Command) -> Result<()> {
    match command {
        Command::New => {
            let record = session.new_evaluation()?;
            println!("New evaluation {}", record.id);
        }
        Command::List => list(session),
        Command::Select { id } => {
            let record = session.select(id)?;
            println!("{}", record.list_label());
        }
        Command::Duplicate => {
            let record = session.duplicate()?;
            println!("{} ({})", record.title, record.id);
        }
        Command::Demo => {
            let record = session.load_demo()?;
            println!("Demo loaded as {}", record.id);
        }
        Command::Set { field, value } => {
            let edit = parse_edit(&field, &value).map_err(with_field_list)?;
            session.apply_edit(edit)?;
        }
        Command::Toggle { session: kind, slot } => {
            let index = ordinal("slot", &slot)?;
            session.toggle_interval(kind.into(), index)?;
            let data = &session.active().data;
            let kind = SessionKind::from(kind);
            println!("{} slots: {}", kind.label(), slot_strip(&data.session(kind).intervals));
        }
        Command::Mode { mode } => {
            session.set_mode(mode.into());
            println!("Mode: {}", mode_name(session.wizard().mode));
        }
        Command::Next => match session.next()? {
            Advance::Moved(step) => print_step(session, step),
            Advance::Review => print!("{}", session.review()?.to_text()),
        },
        Command::Prev => {
            let step = session.prev()?;
            print_step(session, step);
        }
        Command::Goto { step } => {
            let step = session.goto(Step::from_index(step)?)?;
            print_step(session, step);
        }
        Command::Status => status(session),
        Command::Review { json } => {
            let review = session.review()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&review)?);
            } else {
                print!("{}", review.to_text());
            }
        }
        Command::Report { regenerate } => {
            let text = if regenerate {
                session.regenerate_report()?
            } else {
                session.ensure_report()?
            };
            println!("{text}");
        }
        Command::Diagnosis { regenerate } => {
            let text = if regenerate {
                session.regenerate_diagnosis()?
            } else {
                session.ensure_diagnosis()?
            };
            println!("{text}");
        }
        Command::Export { format, out } => {
            let format = ExportFormat::from(format);
            let bytes = session.export(format)?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "{}.{}",
                    file_base(&session.active().data),
                    format.extension()
                ))
            });
            std::fs::write(&path, &bytes)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} ({} bytes)", path.display(), bytes.len());
        }
        Command::Config { action } => config(session, action.unwrap_or(ConfigAction::Show))?,
        Command::Observe {
            session: kind,
            clear,
        } => observe_session(session, kind.into(), clear).await?,
        Command::Wipe { yes } => {
            if !yes {
                eyre::bail!(
                    "this deletes every evaluation and the configuration; re-run with --yes"
                );
            }
            session.wipe()?;
            println!("All data deleted");
        }
    }
    Ok(())
}

fn with_field_list(err: AppError) -> eyre::Report {
    match err {
        AppError::UnknownField(_) => {
            eyre::eyre!("{err}\nknown fields:\n  {}", FIELD_PATHS.join("\n  "))
        }
        other => other.into(),
    }
}

fn list(session: &AppSession) {
    let active = session.active().id;
    for record in session.records() {
        let marker = if record.id == active { "*" } else { " " };
        println!("{marker} {}  {}", record.id, record.list_label());
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Guided => "guided",
        Mode::Quick => "quick",
    }
}

fn slot_strip(intervals: &[u8]) -> String {
    intervals
        .iter()
        .map(|&s| if s == 1 { 'X' } else { '.' })
        .collect()
}

fn print_step(session: &AppSession, step: Step) {
    println!("Step {}: {}", step.index(), step.title());
    println!("  {}", step.hint());
    let check = session.step_check();
    match check.message {
        Some(message) if !check.valid => println!("  ! {message}"),
        _ => println!("  Section valid"),
    }
}

fn status(session: &AppSession) {
    let record = session.active();
    let wizard = session.wizard();
    println!("{}  ({})", record.list_label(), record.id);
    println!("Mode: {}", mode_name(wizard.mode));
    print_step(session, wizard.step);
    println!();
    for (step, state) in session.step_statuses() {
        let tag = match state {
            StepStatus::Active => ">",
            StepStatus::Done => "+",
            StepStatus::Invalid => "!",
            StepStatus::Pending => " ",
        };
        println!("  {tag} {} {}", step.index(), step.title());
    }
}

fn config(session: &mut AppSession, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {}
        ConfigAction::Bands {
            dq5_low,
            dq5_mild,
            dq5_moderate,
            dis_low,
            dis_moderate,
        } => {
            let mut config = session.config().clone();
            let f = &mut config.frequency_bands;
            f.low = dq5_low.unwrap_or(f.low);
            f.mild = dq5_mild.unwrap_or(f.mild);
            f.moderate = dq5_moderate.unwrap_or(f.moderate);
            let i = &mut config.impact_bands;
            i.low = dis_low.unwrap_or(i.low);
            i.moderate = dis_moderate.unwrap_or(i.moderate);
            session.save_config(config)?;
        }
        ConfigAction::Item { number, label } => {
            let index = ordinal("item", &number)?;
            let mut config = session.config().clone();
            let len = config.item_count();
            let slot = config
                .impact_items
                .get_mut(index)
                .ok_or_else(|| eyre::eyre!("item {} out of range (1-{len})", index + 1))?;
            *slot = label;
            session.save_config(config)?;
        }
        ConfigAction::AddItem => session.add_impact_item()?,
        ConfigAction::Reset => session.reset_config()?,
    }

    let config = session.config();
    let f = &config.frequency_bands;
    let i = &config.impact_bands;
    println!("DQ5 bands: low <= {}, mild <= {}, moderate <= {}", f.low, f.mild, f.moderate);
    println!("DIS bands: low <= {}, moderate <= {}", i.low, i.moderate);
    println!(
        "DIS items ({}-{} each):",
        config.impact_scale.min, config.impact_scale.max
    );
    for (n, item) in config.impact_items.iter().enumerate() {
        println!("  {:>2}. {item}", n + 1);
    }
    Ok(())
}

async fn observe_session(session: &mut AppSession, kind: SessionKind, clear: bool) -> Result<()> {
    if clear {
        session.timer_mut().start(kind);
        session.reset_timer(true);
    }
    println!(
        "Observing {} session: {INTERVAL_COUNT} slots of {SLOT_SECONDS} s. Enter marks an escape, Ctrl-C stops.",
        kind.label()
    );
    println!("slot {}/{INTERVAL_COUNT}", session.timer().slot() + 1);

    let stop = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let outcome = observe::run(
        session,
        kind,
        Duration::from_secs(1),
        observe::stdin_marks(),
        stop,
        |progress| match progress {
            Progress::SlotStarted(slot) => println!("slot {}/{INTERVAL_COUNT}", slot + 1),
            Progress::Marked(slot) => println!("  escape marked in slot {}", slot + 1),
        },
    )
    .await?;
    match outcome {
        Outcome::Finished => println!("Observation finished"),
        Outcome::Stopped { slot } => println!("Stopped at slot {}", slot + 1),
    }

    let intervals = &session.active().data.session(kind).intervals;
    let score = score_session(intervals);
    println!(
        "{}  {} escapes, {}%",
        slot_strip(intervals),
        score.escape_count,
        format_pct(score.pct)
    );
    Ok(())
}
