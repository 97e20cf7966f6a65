use predicates::prelude::*;
use serde_json::Value;
use test_support::{jira_cmd, JiraFixtures};

const NOW: &str = "2025-01-16T00:00:00Z";

fn run_json(args: &[&str]) -> Value {
  let out = jira_cmd(&JiraFixtures::load("active_sprint"))
    .args(["--now-override", NOW])
    .args(args)
    .args(["--format", "json"])
    .output()
    .unwrap();
  assert!(out.status.success(), "cli run failed: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn active_sprint_report_flags_stale_in_progress_issue() {
  let v = run_json(&["issues", "--active", "--warn-after", "5"]);

  assert_eq!(v["project"], "PROJ");
  assert_eq!(v["project_name"], "Project");
  assert_eq!(v["board"], "Team");
  assert_eq!(v["sprint"], "SprintB");
  assert_eq!(
    v["query"],
    "Status NOT IN (Resolved,Closed) and sprint = SprintB and assignee = alice"
  );
  assert_eq!(v["count"], 4);
  assert_eq!(v["flagged"], 1);

  let rows = v["rows"].as_array().unwrap();
  let flagged: Vec<&str> = rows
    .iter()
    .filter(|r| r["flagged"] == true)
    .map(|r| r["key"].as_str().unwrap())
    .collect();
  assert_eq!(flagged, ["PROJ-101"]);

  assert_eq!(rows[0]["age_days"], 2);
  assert_eq!(rows[1]["assignee"], "Carol");
  assert_eq!(rows[3]["status"], "N/A");
  assert_eq!(rows[3]["age_days"], Value::Null);
}

#[test]
fn staleness_is_off_without_threshold() {
  let v = run_json(&["issues", "--active"]);
  assert_eq!(v["flagged"], 0);
}

#[test]
fn huge_threshold_flags_nothing() {
  let v = run_json(&["issues", "--active", "--warn-after", "4294967295"]);
  assert_eq!(v["count"], 4);
  assert_eq!(v["flagged"], 0);
}

#[test]
fn named_sprint_and_other_user() {
  let v = run_json(&["issues", "--sprint", "SprintA", "--username", "bob"]);
  assert_eq!(v["sprint"], "SprintA");
  assert_eq!(
    v["query"],
    "Status NOT IN (Resolved,Closed) and sprint = SprintA and assignee = bob"
  );
}

#[test]
fn filed_quotes_unusual_reporter_names() {
  let v = run_json(&["filed", "--username", "o'brien"]);
  assert_eq!(v["query"], "Status NOT IN (Resolved,Closed) and reporter = \"o'brien\"");
  assert!(v.get("sprint").is_none());
}

#[test]
fn e2e_lists_ci_filed_issues() {
  let v = run_json(&["e2e"]);
  assert_eq!(v["query"], "Status NOT IN (Resolved,Closed) and reporter = atom-ci.gen");
}

#[test]
fn all_with_resolved_runs_unfiltered_query() {
  let v = run_json(&["issues", "--all", "--include-resolved"]);
  assert_eq!(v["query"], "");
  assert_eq!(v["count"], 4);
}

#[test]
fn table_output_lists_every_issue() {
  let out = jira_cmd(&JiraFixtures::load("active_sprint"))
    .args(["--now-override", NOW, "issues", "--active", "--warn-after", "5"])
    .output()
    .unwrap();
  assert!(out.status.success(), "cli run failed: {}", String::from_utf8_lossy(&out.stderr));

  // stdout is a pipe, so no color codes
  insta::assert_snapshot!(String::from_utf8_lossy(&out.stdout), @r"
  +----------+-----------------+-------------+-------------+----------+
  | KEY      | SUMMARY         | STATUS      | LAST UPDATE | ASSIGNEE |
  +----------+-----------------+-------------+-------------+----------+
  | PROJ-101 | Stuck migration | In Progress | 2 days      | bob      |
  +----------+-----------------+-------------+-------------+----------+
  | PROJ-102 | Fresh work      | In Progress | 0 days      | Carol    |
  +----------+-----------------+-------------+-------------+----------+
  | PROJ-103 | Backlog item    | To Do       | 14 days     |          |
  +----------+-----------------+-------------+-------------+----------+
  | PROJ-104 | Imported        | N/A         | N/A         |          |
  +----------+-----------------+-------------+-------------+----------+
  ");
}

#[test]
fn unknown_sprint_aborts() {
  jira_cmd(&JiraFixtures::load("active_sprint"))
    .args(["--now-override", NOW, "issues", "--sprint", "Nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to get jira sprint Nope: not found"));
}

#[test]
fn active_without_fallback_aborts_after_last_sprint() {
  jira_cmd(&JiraFixtures::load("active_sprint"))
    .args(["--now-override", "2025-03-01T00:00:00Z", "issues", "--active", "--active-fallback", "none"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to get jira active sprint"));
}

#[test]
fn active_falls_back_to_latest_ended_sprint() {
  let out = jira_cmd(&JiraFixtures::load("active_sprint"))
    .args(["--now-override", "2025-03-01T00:00:00Z", "issues", "--active", "--format", "json"])
    .output()
    .unwrap();
  assert!(out.status.success());
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["sprint"], "SprintB");
}

#[test]
fn ambiguous_board_aborts() {
  jira_cmd(&JiraFixtures::load("ambiguous_board"))
    .args(["issues", "--all"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to get jira board Team in project PROJ"))
    .stderr(predicate::str::contains("2 candidates"));
}
