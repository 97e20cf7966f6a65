use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::model::{Report, ReportRow, SprintRow};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Table,
  Json,
}

const ISSUE_HEADER: [&str; 5] = ["KEY", "SUMMARY", "STATUS", "LAST UPDATE", "ASSIGNEE"];
const SPRINT_HEADER: [&str; 2] = ["SPRINT", "STATE"];

fn last_update(age_days: Option<i64>) -> String {
  match age_days {
    Some(d) => format!("{} days", d),
    None => "N/A".to_string(),
  }
}

/// Cells hold one terminal line; control characters become spaces.
fn one_line(cell: &str) -> String {
  cell.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
}

/// Boxed table with a rule after every row. `highlight[i]` paints body row `i` red.
/// Widths are terminal columns, so wide characters keep the borders aligned.
fn table<const N: usize>(header: [&str; N], body: &[[String; N]], highlight: &[bool]) -> String {
  let body: Vec<[String; N]> = body.iter().map(|row| row.each_ref().map(|c| one_line(c))).collect();

  let mut widths = header.map(|h| h.width());
  for row in &body {
    for (w, cell) in widths.iter_mut().zip(row.iter()) {
      *w = (*w).max(cell.width());
    }
  }

  let rule = format!(
    "+{}+",
    widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
  );

  let line = |cells: Vec<&str>, red: bool| -> String {
    let padded: Vec<String> = cells
      .iter()
      .zip(widths.iter())
      .map(|(c, w)| {
        let p = format!("{}{}", c, " ".repeat(w.saturating_sub(c.width())));
        if red { p.red().to_string() } else { p }
      })
      .collect();
    format!("| {} |", padded.join(" | "))
  };

  let mut out = Vec::with_capacity(body.len() * 2 + 3);
  out.push(rule.clone());
  out.push(line(header.to_vec(), false));
  out.push(rule.clone());

  for (i, row) in body.iter().enumerate() {
    let red = highlight.get(i).copied().unwrap_or(false);
    out.push(line(row.iter().map(String::as_str).collect(), red));
    out.push(rule.clone());
  }

  out.join("\n") + "\n"
}

pub fn issue_table(rows: &[ReportRow], color: bool) -> String {
  let body: Vec<[String; 5]> = rows
    .iter()
    .map(|r| {
      [
        r.key.clone(),
        r.summary.clone(),
        r.status.clone(),
        last_update(r.age_days),
        r.assignee.clone(),
      ]
    })
    .collect();
  let highlight: Vec<bool> = rows.iter().map(|r| color && r.flagged).collect();

  table(ISSUE_HEADER, &body, &highlight)
}

pub fn sprint_table(rows: &[SprintRow]) -> String {
  let body: Vec<[String; 2]> = rows
    .iter()
    .map(|r| [r.name.clone(), r.state.as_str().to_string()])
    .collect();

  table(SPRINT_HEADER, &body, &[])
}

pub fn render_report(report: &Report, format: OutputFormat, color: bool) -> Result<String> {
  match format {
    OutputFormat::Table => Ok(issue_table(&report.rows, color)),
    OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
  }
}

pub fn render_sprints(rows: &[SprintRow], format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Table => Ok(sprint_table(rows)),
    OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)? + "\n"),
  }
}
