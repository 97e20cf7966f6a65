use anyhow::{Result, bail};
use clap::builder::TypedValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Config;
use crate::query::{Actor, ActorRole};
use crate::render::OutputFormat;
use crate::report::{DEFAULT_JOBS, FilterIntent, ReportRequest};
use crate::sprint::{ActiveFallback, SprintSelection};

pub const DEFAULT_E2E_REPORTER: &str = "atom-ci.gen";

#[derive(Parser, Debug)]
#[command(
    name = "jira-report",
    version,
    about = "Display Jira issues by sprint, assignee or reporter and flag stale in-progress work",
    long_about = "Reads JIRA_BASE_URL, JIRA_PROJECT, JIRA_BOARD, JIRA_USERNAME and JIRA_PASSWORD (base64) from the environment."
)]
pub struct Cli {
  /// Increase log detail (-v info, -vv debug); RUST_LOG overrides
  #[arg(short, long, action = ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for sprint and staleness checks (hidden; tests only)
  #[arg(long = "now-override", hide = true, global = true)]
  pub now_override: Option<String>,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Show issues assigned to a user (default: JIRA_USERNAME) or to anyone
  Issues(IssuesArgs),
  /// Show issues filed by a user (default: JIRA_USERNAME)
  Filed(FiledArgs),
  /// Show all sprints of the board
  Sprints(SprintsArgs),
  /// Show open issues filed by the e2e automation account
  E2e(E2eArgs),
}

#[derive(Args, Debug, Default)]
pub struct BoardArgs {
  /// Project key or name (default: JIRA_PROJECT)
  #[arg(long)]
  pub project: Option<String>,

  /// Board name within the project (default: JIRA_BOARD)
  #[arg(long)]
  pub board: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct SprintArgs {
  /// Only issues in the named sprint (exact, case-sensitive)
  #[arg(long, conflicts_with = "active")]
  pub sprint: Option<String>,

  /// Only issues in the currently active sprint
  #[arg(long)]
  pub active: bool,

  /// What --active picks when no sprint's dates contain now
  #[arg(long, value_enum, default_value_t = ActiveFallback::LatestEnded)]
  pub active_fallback: ActiveFallback,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
  /// Highlight issues "In Progress" for more than this many days (0 = off)
  #[arg(long, default_value_t = 0)]
  pub warn_after: u32,

  /// Concurrent changelog fetches when --warn-after is set
  #[arg(long, default_value_t = DEFAULT_JOBS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
  pub jobs: usize,

  #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
  pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct IssuesArgs {
  #[command(flatten)]
  pub board: BoardArgs,

  #[command(flatten)]
  pub sprint: SprintArgs,

  #[command(flatten)]
  pub output: OutputArgs,

  /// Assignee to filter on (default: JIRA_USERNAME)
  #[arg(long, conflicts_with = "all")]
  pub username: Option<String>,

  /// Show issues regardless of assignee
  #[arg(long)]
  pub all: bool,

  /// Keep Resolved and Closed issues
  #[arg(long)]
  pub include_resolved: bool,
}

#[derive(Args, Debug)]
pub struct FiledArgs {
  #[command(flatten)]
  pub board: BoardArgs,

  #[command(flatten)]
  pub sprint: SprintArgs,

  #[command(flatten)]
  pub output: OutputArgs,

  /// Reporter to filter on (default: JIRA_USERNAME)
  #[arg(long)]
  pub username: Option<String>,
}

#[derive(Args, Debug)]
pub struct SprintsArgs {
  #[command(flatten)]
  pub board: BoardArgs,

  #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
  pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct E2eArgs {
  #[command(flatten)]
  pub board: BoardArgs,

  #[command(flatten)]
  pub output: OutputArgs,

  /// Account that files the e2e failure issues
  #[arg(long, default_value = DEFAULT_E2E_REPORTER)]
  pub reporter: String,
}

/// A fully defaulted unit of work for the binary.
#[derive(Debug)]
pub enum Invocation {
  Report { request: ReportRequest, format: OutputFormat },
  Sprints { project: String, board: String, format: OutputFormat },
}

impl SprintArgs {
  fn selection(&self) -> SprintSelection {
    match (&self.sprint, self.active) {
      (_, true) => SprintSelection::Active,
      (Some(name), false) if !name.is_empty() => SprintSelection::ByName(name.clone()),
      _ => SprintSelection::None,
    }
  }
}

fn board_or_default(args: &BoardArgs, cfg: &Config) -> (String, String) {
  (
    args.project.clone().unwrap_or_else(|| cfg.project.clone()),
    args.board.clone().unwrap_or_else(|| cfg.board.clone()),
  )
}

fn report(board: &BoardArgs, output: &OutputArgs, intent: FilterIntent, cfg: &Config) -> Invocation {
  let (project, board) = board_or_default(board, cfg);

  Invocation::Report {
    request: ReportRequest {
      project,
      board,
      intent: FilterIntent {
        warn_after_days: output.warn_after,
        ..intent
      },
      jobs: output.jobs,
    },
    format: output.format,
  }
}

/// Fill CLI gaps from the configuration.
pub fn normalize(command: Command, cfg: &Config) -> Result<Invocation> {
  let inv = match command {
    Command::Issues(a) => {
      let actor = if a.all {
        None
      } else {
        let name = a.username.clone().unwrap_or_else(|| cfg.username.clone());
        Some(Actor::new(ActorRole::Assignee, name))
      };
      let intent = FilterIntent {
        actor,
        sprint: a.sprint.selection(),
        exclude_resolved_closed: !a.include_resolved,
        active_fallback: a.sprint.active_fallback,
        match_all: a.all && a.include_resolved,
        ..FilterIntent::default()
      };
      report(&a.board, &a.output, intent, cfg)
    }
    Command::Filed(a) => {
      let name = a.username.clone().unwrap_or_else(|| cfg.username.clone());
      let intent = FilterIntent {
        actor: Some(Actor::new(ActorRole::Reporter, name)),
        sprint: a.sprint.selection(),
        active_fallback: a.sprint.active_fallback,
        ..FilterIntent::default()
      };
      report(&a.board, &a.output, intent, cfg)
    }
    Command::E2e(a) => {
      if a.reporter.trim().is_empty() {
        bail!("--reporter cannot be empty");
      }
      let intent = FilterIntent {
        actor: Some(Actor::new(ActorRole::Reporter, a.reporter.clone())),
        ..FilterIntent::default()
      };
      report(&a.board, &a.output, intent, cfg)
    }
    Command::Sprints(a) => {
      let (project, board) = board_or_default(&a.board, cfg);
      Invocation::Sprints {
        project,
        board,
        format: a.format,
      }
    }
  };

  Ok(inv)
}
