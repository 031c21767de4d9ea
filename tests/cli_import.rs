use std::fs;
use std::path::Path;

use predicates::prelude::*;
use quest_import::formats::{QuestImportRecord, QuestStatus};
use quest_import::store::StoredQuest;

fn stored_quests(store_dir: &Path) -> anyhow::Result<Vec<StoredQuest>> {
    let quests_dir = store_dir.join("quests");
    if !quests_dir.exists() {
        return Ok(Vec::new());
    }
    let mut quests = Vec::new();
    for entry in fs::read_dir(quests_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        quests.push(serde_json::from_str(&fs::read_to_string(path)?)?);
    }
    Ok(quests)
}

fn sorted_names(quests: &[StoredQuest]) -> Vec<String> {
    let mut names: Vec<String> = quests.iter().map(|q| q.quest.name.clone()).collect();
    names.sort();
    names
}

#[test]
fn importing_two_quests_reports_info_and_stores_both() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("store");
    let file = temp.path().join("quests.json");
    fs::write(&file, r#"[{"name":"Q1"},{"name":"Q2","status":"active"}]"#)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args([
        "import",
        "--store",
        store_dir.to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout("info: Imported 2 quest(s).\n");

    let quests = stored_quests(&store_dir)?;
    assert_eq!(sorted_names(&quests), vec!["Q1", "Q2"]);
    let q2 = quests
        .iter()
        .find(|q| q.quest.name == "Q2")
        .expect("Q2 stored");
    assert_eq!(q2.quest.status, QuestStatus::Active);
    Ok(())
}

#[test]
fn invalid_json_reports_error() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("store");
    let file = temp.path().join("broken.json");
    fs::write(&file, "{ this is not json")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args([
        "import",
        "--store",
        store_dir.to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout("error: Quest import failed.\n");

    assert!(stored_quests(&store_dir)?.is_empty());
    Ok(())
}

#[test]
fn valid_then_malformed_file_reports_warning() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("store");
    let good = temp.path().join("good.json");
    let bad = temp.path().join("bad.json");
    fs::write(&good, r#"{"quests":[{"name":"Survivor"}]}"#)?;
    fs::write(&bad, "[{\"name\":")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args([
        "import",
        "--store",
        store_dir.to_str().unwrap(),
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout("warning: Imported 1 quest(s); 1 could not be imported.\n");

    assert_eq!(sorted_names(&stored_quests(&store_dir)?), vec!["Survivor"]);
    Ok(())
}

#[test]
fn missing_file_counts_as_failure() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("store");
    let good = temp.path().join("good.json");
    fs::write(&good, r#"{"data":[{"name":"A"},{"name":"B"}]}"#)?;
    let missing = temp.path().join("missing.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args([
        "import",
        "--store",
        store_dir.to_str().unwrap(),
        missing.to_str().unwrap(),
        good.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout("warning: Imported 2 quest(s); 1 could not be imported.\n")
    .stderr(predicate::str::contains("failed to read import file"));
    Ok(())
}

#[test]
fn no_files_selected_emits_no_notification() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("store");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args(["import", "--store", store_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout("");

    assert!(!store_dir.exists());
    Ok(())
}

#[test]
fn store_dir_and_placeholder_come_from_env() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("env-store");
    let file = temp.path().join("nameless.json");
    fs::write(&file, r#"{"name":"   ","priority":2.5}"#)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.env("QUEST_IMPORT_STORE_DIR", &store_dir)
        .env("QUEST_IMPORT_PLACEHOLDER_NAME", "Untitled")
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout("info: Imported 1 quest(s).\n");

    let quests = stored_quests(&store_dir)?;
    assert_eq!(sorted_names(&quests), vec!["Untitled"]);
    assert_eq!(quests[0].quest.priority, 0);
    Ok(())
}

#[test]
fn check_prints_sanitized_records_without_storing() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let file = temp.path().join("journal.json");
    fs::write(
        &file,
        r#"{
  "name": "Journal Entry",
  "flags": {
    "forien-quest-log": {
      "quest": {
        "name": "  The Lost Ring ",
        "status": "bogus",
        "tasks": [{"name": "Search the well", "id": "old"}, 7],
        "rewards": [{"type": "item", "data": {"name": "Ring"}}],
        "date": {"create": null, "start": null, "end": null}
      }
    }
  }
}"#,
    )?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    let output = cmd
        .current_dir(temp.path())
        .args(["check", file.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output)?;
    let records: Vec<QuestImportRecord> = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("parse record json line"))
        .collect();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.name, "The Lost Ring");
    assert_eq!(record.status, QuestStatus::Inactive);
    assert_eq!(record.tasks.len(), 1);
    assert_ne!(record.tasks[0].id, "old");
    assert!(record.rewards[0].locked);
    assert_eq!(record.date, None);

    assert!(!temp.path().join("quest-store").exists());
    Ok(())
}

#[test]
fn check_fails_on_scalar_payload() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let file = temp.path().join("scalar.json");
    fs::write(&file, "42")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args(["check", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quest records found"));
    Ok(())
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.env("RUST_LOG", "debug")
        .env_remove("QUEST_IMPORT_LOG")
        .args(["import"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
}

#[test]
fn byte_order_mark_file_imports() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let store_dir = temp.path().join("store");
    let file = temp.path().join("bom.json");
    fs::write(&file, "\u{FEFF}[{\"name\":\"Q1\"}]")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args([
        "import",
        "--store",
        store_dir.to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout("info: Imported 1 quest(s).\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("quest-import");
    cmd.args(["check", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"Q1\""));
    Ok(())
}
