use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str], db: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dm_cli"))
        .env_remove("RUST_LOG")
        .env_remove("DOCMETA_DB")
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("run dm_cli")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn cli_extract_json_is_canonical() {
    let root = tempfile::tempdir().expect("tempdir");
    let csv = root.path().join("ledger.csv");
    std::fs::write(&csv, "date,amount\n2024-01-01,10\n").expect("write");
    let db = root.path().join("records.sqlite");

    let out = run(&["extract", csv.to_string_lossy().as_ref(), "--json"], &db);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(value["format"], "csv");
    assert_eq!(value["metadata"]["row_count"], "1");
    assert_eq!(value["metadata"]["column_names"], r#"["date","amount"]"#);
    assert_eq!(value["hash"].as_str().map(str::len), Some(64));
    assert!(!db.exists(), "extract must not create the database");
}

#[test]
fn cli_save_list_show_history() {
    let root = tempfile::tempdir().expect("tempdir");
    let csv = root.path().join("ledger.csv");
    std::fs::write(&csv, "date,amount\n2024-01-01,10\n").expect("write");
    let db = root.path().join("nested/records.sqlite");
    let csv_arg = csv.to_string_lossy().into_owned();

    let saved = run(&["save", &csv_arg], &db);
    assert!(saved.status.success(), "stderr: {}", stderr(&saved));
    assert!(stdout(&saved).starts_with("saved record 1 ("));

    std::fs::write(&csv, "date,amount\n2024-01-01,10\n2024-01-02,4\n").expect("rewrite");
    let saved = run(&["save", &csv_arg], &db);
    assert!(saved.status.success(), "stderr: {}", stderr(&saved));

    let list = run(&["list"], &db);
    assert!(list.status.success());
    let lines: Vec<String> = stdout(&list).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("2\t"));
    assert!(lines[1].starts_with("1\t"));
    assert!(lines[0].contains("\tledger.csv\t"));

    let show = run(&["show", "1"], &db);
    assert!(show.status.success(), "stderr: {}", stderr(&show));
    let text = stdout(&show);
    assert!(text.contains("filename: ledger.csv"));
    assert!(text.contains("row_count=1\n"));
    assert!(!text.contains("integrity: mismatch"));

    let history = run(&["history", "ledger.csv"], &db);
    assert_eq!(stdout(&history).lines().count(), 2);
    let none = run(&["history", "other.csv"], &db);
    assert_eq!(stdout(&none).trim(), "no records");
}

#[test]
fn cli_show_unknown_record_exits_2() {
    let root = tempfile::tempdir().expect("tempdir");
    let db = root.path().join("records.sqlite");

    let out = run(&["show", "99"], &db);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("record 99 not found"));
}

#[test]
fn cli_verify_reports_match_and_mismatch() {
    let root = tempfile::tempdir().expect("tempdir");
    let csv = root.path().join("rows.csv");
    std::fs::write(&csv, "a,b\n1,2\n").expect("write");
    let db = root.path().join("records.sqlite");
    let csv_arg = csv.to_string_lossy().into_owned();

    assert!(run(&["save", &csv_arg], &db).status.success());

    let same = run(&["verify", "1", &csv_arg], &db);
    assert_eq!(same.status.code(), Some(0), "stderr: {}", stderr(&same));
    assert!(stdout(&same).starts_with("match "));

    std::fs::write(&csv, "a,b\n1,2\n3,4\n").expect("rewrite");
    let changed = run(&["verify", "1", &csv_arg], &db);
    assert_eq!(changed.status.code(), Some(3));
    let text = stdout(&changed);
    assert!(text.starts_with("mismatch"));
    assert!(text.contains("~ row_count: 1 -> 2"));
}

#[test]
fn cli_unsupported_format_fails_without_touching_store() {
    let root = tempfile::tempdir().expect("tempdir");
    let xls = root.path().join("report.xls");
    std::fs::write(&xls, b"legacy").expect("write");
    let db = root.path().join("records.sqlite");

    let out = run(&["save", xls.to_string_lossy().as_ref()], &db);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("DM_UNSUPPORTED_FORMAT:"));
    assert!(!db.exists());
}

#[test]
fn cli_db_path_from_environment_and_missing_config() {
    let root = tempfile::tempdir().expect("tempdir");
    let csv = root.path().join("t.csv");
    std::fs::write(&csv, "x\n1\n").expect("write");
    let env_db = root.path().join("from_env.sqlite");

    let out = Command::new(env!("CARGO_BIN_EXE_dm_cli"))
        .env_remove("RUST_LOG")
        .env("DOCMETA_DB", &env_db)
        .args(["save", csv.to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(env_db.exists());

    let missing = root.path().join("nope.json");
    let out = Command::new(env!("CARGO_BIN_EXE_dm_cli"))
        .env_remove("RUST_LOG")
        .args(["--config", missing.to_string_lossy().as_ref(), "list"])
        .output()
        .expect("run");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("DM_CONFIG_MISSING:"));
}
