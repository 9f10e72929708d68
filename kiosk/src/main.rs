//! Festival kiosk terminal front end
//!
//! Runs one kiosk session against the configured storage, reading one
//! command per line from stdin.
//!
//! # Usage
//!
//! ```bash
//! KIOSK_STORAGE_BACKEND=memory cargo run --bin festival-kiosk
//! ```
//!
//! Type `help` for the command list.

use anyhow::Context;
use festival_kiosk::workflow::ActivityKind;
use festival_kiosk::{
    BookingStore, Config, FormField, Step, WorkflowAction, WorkflowEnvironment, WorkflowReducer,
    WorkflowState, storage,
};
use festival_kiosk_core::NaiveDate;
use festival_kiosk_core::environment::{Clock, SystemClock};
use festival_kiosk_runtime::Store;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type KioskStore = Store<WorkflowState, WorkflowAction, WorkflowEnvironment, WorkflowReducer>;

const HELP: &str = "\
commands:
  start                 leave the landing screen
  prev | next           move the calendar one week
  select YYYY-MM-DD     pick a date
  focus <field>         name | identifier | phone | email
  type <text>           press each character on the focused field
  set <field> <value>   replace a field
  backspace             delete the last character
  submit                book
  back                  form -> calendar
  new                   confirmation -> calendar
  home                  confirmation -> landing
  touch                 register activity
  state                 redraw
  quit";

/// A parsed input line
enum Command {
    Send(Vec<WorkflowAction>),
    Show,
    Help,
    Quit,
}

fn parse_field(name: &str) -> Result<FormField, String> {
    FormField::from_name(name).ok_or_else(|| format!("unknown field '{name}'"))
}

fn single(action: WorkflowAction) -> Result<Command, String> {
    Ok(Command::Send(vec![action]))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "" | "state" => Ok(Command::Show),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "start" => single(WorkflowAction::Start),
        "prev" => single(WorkflowAction::PreviousWeek),
        "next" => single(WorkflowAction::NextWeek),
        "select" => {
            let date = NaiveDate::parse_from_str(rest.trim(), "%Y-%m-%d")
                .map_err(|e| format!("bad date '{rest}': {e}"))?;
            single(WorkflowAction::SelectDate { date })
        },
        "focus" => single(WorkflowAction::FocusField {
            field: parse_field(rest.trim())?,
        }),
        "type" => Ok(Command::Send(
            rest.chars()
                .map(|key| WorkflowAction::KeyPressed { key })
                .collect(),
        )),
        "set" => {
            let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
            single(WorkflowAction::SetField {
                field: parse_field(field)?,
                value: value.to_string(),
            })
        },
        "backspace" => single(WorkflowAction::Backspace),
        "submit" => single(WorkflowAction::Submit),
        "back" => single(WorkflowAction::Back),
        "new" => single(WorkflowAction::NewBooking),
        "home" => single(WorkflowAction::GoHome),
        "touch" => single(WorkflowAction::UserActivity {
            kind: ActivityKind::Touch,
        }),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

async fn render(store: &KioskStore) {
    let state = store.state(Clone::clone).await;
    let env = store.environment();
    let today = env.clock.today();

    println!();
    match state.step {
        Step::Landing => println!("== Winter Festival == type 'start' to book a visit"),
        Step::DateSelection => {
            println!("== Choose a date ==");
            for day in state.calendar(today, env.bookings.availability()) {
                let marker = if day.selectable { ' ' } else { 'x' };
                println!(
                    "  [{marker}] {} {:>3} slots",
                    day.date.format("%a %Y-%m-%d"),
                    day.remaining
                );
            }
        },
        Step::VisitorForm => {
            if let Some(date) = state.selected_date {
                println!("== Visitor details for {date} ==");
            }
            for field in FormField::ALL {
                let cursor = if state.active_field == Some(field) { '>' } else { ' ' };
                print!("{cursor} {field:<10} {}", state.form.get(field));
                if let Some(error) = state.errors.get(&field) {
                    print!("   ! {error}");
                }
                println!();
            }
            if let Some(layout) = state.keyboard_layout() {
                println!("  keyboard: {layout:?}");
            }
        },
        Step::Confirmation => {
            if let Some(booking) = &state.confirmation {
                println!("== Booking confirmed ==");
                println!("  protocol: {}", booking.protocol);
                println!("  name:     {}", booking.name);
                println!("  date:     {}", booking.date);
            }
        },
    }
    if let Some(notice) = &state.notice {
        println!("  ! {notice}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they do not interleave with the screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,festival_kiosk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    config.validate().context("invalid configuration")?;
    tracing::info!(
        backend = ?config.storage.backend,
        path = %config.storage.path.display(),
        idle_timeout_secs = config.workflow.idle_timeout_secs,
        "Configuration loaded"
    );

    let kv = storage::open(&config.storage).context("opening storage")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let bookings = Arc::new(
        BookingStore::new(kv, Arc::clone(&clock)).with_protocol_policy(config.protocol.policy()),
    );
    bookings
        .initialize(&config.availability)
        .context("seeding availability")?;

    let env = WorkflowEnvironment::new(
        Arc::clone(&clock),
        Arc::clone(&bookings),
        config.workflow.idle_timeout(),
    );
    let store = Store::new(WorkflowState::new(clock.today()), WorkflowReducer::new(), env);

    render(&store).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                println!("{HELP}");
                continue;
            },
            Ok(Command::Show) => {},
            Ok(Command::Send(actions)) => {
                for action in actions {
                    store.send(action).await?;
                }
            },
            Err(message) => {
                println!("{message}");
                continue;
            },
        }
        render(&store).await;
    }

    store.shutdown();
    tracing::info!("Kiosk stopped");
    Ok(())
}
