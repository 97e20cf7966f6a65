use serde_json::Value;
use test_support::{jira_cmd, read_fixture_json, JiraFixtures};

#[test]
fn sprints_table() {
  let out = jira_cmd(&JiraFixtures::load("active_sprint")).arg("sprints").output().unwrap();
  assert!(out.status.success(), "cli run failed: {}", String::from_utf8_lossy(&out.stderr));

  insta::assert_snapshot!(String::from_utf8_lossy(&out.stdout), @r"
  +---------+--------+
  | SPRINT  | STATE  |
  +---------+--------+
  | SprintA | closed |
  +---------+--------+
  | SprintB | active |
  +---------+--------+
  | SprintC | future |
  +---------+--------+
  ");
}

#[test]
fn sprints_json_matches_board_order() {
  let fixture: Value = read_fixture_json("active_sprint/sprints.json");
  let expected: Vec<&str> = fixture["values"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["name"].as_str().unwrap())
    .collect();

  let out = jira_cmd(&JiraFixtures::load("active_sprint"))
    .args(["sprints", "--format", "json"])
    .output()
    .unwrap();
  assert!(out.status.success());

  let rows: Vec<Value> = serde_json::from_slice(&out.stdout).unwrap();
  let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
  assert_eq!(names, expected);
  assert_eq!(rows[0]["state"], "closed");
}
