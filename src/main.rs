use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;

mod cli;
mod config;
mod context;
mod error;
mod ext;
mod jira_api;
mod model;
mod query;
mod render;
mod report;
mod sprint;
mod staleness;
mod util;

#[cfg(test)]
mod testutil;

use crate::cli::{Cli, Invocation, normalize};
use crate::config::Config;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_logging(cli.verbose);

  let Some(command) = cli.command else {
    bail!("no command given; try `jira-report --help`");
  };

  // Phase 1: configuration and CLI defaults
  let cfg = Config::from_env().context("invalid jira configuration")?;
  let invocation = normalize(command, &cfg)?;
  let now = util::effective_now(util::parse_now_override(cli.now_override.as_deref())?);
  debug!(base_url = %cfg.base_url, %now, "configured");

  // Phase 2: talk to Jira
  let api = jira_api::make_api(&cfg);

  // Phase 3: render
  let out = match invocation {
    Invocation::Report { request, format } => {
      let report = report::assemble(api.as_ref(), &request, now)?;
      render::render_report(&report, format, std::io::stdout().is_terminal())?
    }
    Invocation::Sprints { project, board, format } => {
      let rows = report::list_sprints(api.as_ref(), &project, &board)?;
      render::render_sprints(&rows, format)?
    }
  };

  print!("{}", out);
  Ok(())
}
