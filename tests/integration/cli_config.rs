use predicates::prelude::*;
use test_support::{cmd_bin, BASE_ENV, BIN};

fn env_without(skip: &str) -> Vec<(&'static str, &'static str)> {
  BASE_ENV.into_iter().filter(|(k, _)| *k != skip).collect()
}

#[test]
fn missing_base_url_is_fatal() {
  cmd_bin(BIN)
    .env_clear()
    .envs(env_without("JIRA_BASE_URL"))
    .arg("sprints")
    .assert()
    .failure()
    .stderr(predicate::str::contains("env variable JIRA_BASE_URL not found"));
}

#[test]
fn each_variable_is_required() {
  for (var, _) in BASE_ENV {
    cmd_bin(BIN)
      .env_clear()
      .envs(env_without(var))
      .args(["issues", "--all"])
      .assert()
      .failure()
      .stderr(predicate::str::contains(var));
  }
}

#[test]
fn password_must_be_base64() {
  cmd_bin(BIN)
    .env_clear()
    .envs(env_without("JIRA_PASSWORD"))
    .env("JIRA_PASSWORD", "not base64!")
    .arg("sprints")
    .assert()
    .failure()
    .stderr(predicate::str::contains("JIRA_PASSWORD is not valid base64"))
    .stderr(predicate::str::contains("not base64!").not());
}

#[test]
fn subcommand_is_required() {
  cmd_bin(BIN)
    .env_clear()
    .envs(BASE_ENV)
    .assert()
    .failure()
    .stderr(predicate::str::contains("no command given"));
}

#[test]
fn conflicting_sprint_flags_are_rejected() {
  cmd_bin(BIN)
    .env_clear()
    .envs(BASE_ENV)
    .args(["issues", "--sprint", "SprintA", "--active"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn zero_timeout_is_rejected() {
  cmd_bin(BIN)
    .env_clear()
    .envs(BASE_ENV)
    .env("JIRA_TIMEOUT_SECS", "0")
    .arg("sprints")
    .assert()
    .failure()
    .stderr(predicate::str::contains("JIRA_TIMEOUT_SECS has invalid value \"0\""));
}
