//! Unit tests for the fold / analyze aggregation
//!
//! Manifests are built in memory and SQL is served by a
//! `MemorySourceReader`, so these tests never touch the file system.

use std::path::Path;

use dbrepo::model::{analyze, extract_object_information, fold, DatabaseObjectEntry};
use dbrepo::release::{DatabaseFileType, DatabaseVersionFile};
use dbrepo::MemorySourceReader;
use pretty_assertions::assert_eq;

fn manifest(version: &str, files: &[&str]) -> DatabaseVersionFile {
    let list: Vec<String> = files.iter().map(|f| format!("\"{}\"", f)).collect();
    let json = format!(
        r#"[{{"userToUse": "postgres", "databaseToUse": "app", "fileList": [{}]}}]"#,
        list.join(", ")
    );
    DatabaseVersionFile::from_manifest_json(
        Path::new(&format!("app/postgres/release/{}/version.json", version)),
        &json,
    )
    .unwrap()
}

fn file(version: &str, relative: &str) -> String {
    format!("app/postgres/release/{}/{}", version, relative)
}

#[test]
fn test_latest_file_follows_version_order() {
    let files = ["03-tables/abct_user_usr.sql"];
    let version_files = vec![
        manifest("1.0.0.1", &files),
        manifest("current", &files),
        manifest("0.9.9.9", &files),
    ];
    let reader = MemorySourceReader::new()
        .with_file(
            file("0.9.9.9", files[0]),
            "create table abct_user_usr (pk_usr_id serial primary key);",
        )
        .with_file(
            file("1.0.0.1", files[0]),
            "create table abct_user_usr (pk_usr_id serial primary key, usr_a text);",
        )
        .with_file(
            file("current", files[0]),
            "create table abct_user_usr (pk_usr_id serial primary key, usr_a text, usr_b text);",
        );

    let model = extract_object_information(&version_files, &reader);

    assert_eq!(model.versions, vec!["0.9.9.9", "1.0.0.1", "current"]);
    assert!(model.properties.has_current);
    assert_eq!(model.properties.last_version, "1.0.0.1");

    let user = model.tables().next().unwrap();
    assert_eq!(user.base.latest_file, file("current", files[0]));
    assert_eq!(user.base.latest_version, "current");
    assert_eq!(user.base.versions.len(), 3);
    // Analysis reads the latest file only
    assert_eq!(user.fields.len(), 3);
}

#[test]
fn test_read_is_idempotent() {
    let version_files = vec![
        manifest("1.0.0.0", &["03-tables/abct_user_usr.sql", "06-views/abcv_users.sql"]),
        manifest("current", &["07-functions/abcf_user_count.sql"]),
    ];
    let reader = MemorySourceReader::new()
        .with_file(
            file("1.0.0.0", "03-tables/abct_user_usr.sql"),
            "create table abct_user_usr (pk_usr_id serial primary key, usr_name text /* #sort */);",
        )
        .with_file(
            file("current", "07-functions/abcf_user_count.sql"),
            "create function abcf_user_count() returns bigint as $$ select count(*) from abct_user_usr $$ language sql;",
        );

    let first = serde_json::to_string(&extract_object_information(&version_files, &reader)).unwrap();
    let second = serde_json::to_string(&extract_object_information(&version_files, &reader)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_files_are_not_bucketed() {
    let version_files = vec![manifest(
        "current",
        &["misc/notes.sql", "04-sequences/abcs_counter.sql"],
    )];
    let model = extract_object_information(&version_files, &MemorySourceReader::new());

    assert_eq!(model.object_count(), 1);
    assert!(model.find("notes").is_none());
    assert!(model.bucket(DatabaseFileType::Unknown).is_none());
    let (kind, entry) = model.find("abcs_counter").unwrap();
    assert_eq!(kind, DatabaseFileType::Sequence);
    assert!(matches!(entry, DatabaseObjectEntry::Generic(_)));
}

#[test]
fn test_parameter_scan_dedupes_per_file() {
    let version_files = vec![manifest("current", &["00-database-setup/01-drop.sql"])];
    let path = file("current", "00-database-setup/01-drop.sql");
    let reader = MemorySourceReader::new().with_file(
        path.clone(),
        "drop database if exists <ENV>_<DB_NAME>;\ncreate database <DB_NAME>;",
    );

    let model = extract_object_information(&version_files, &reader);
    assert_eq!(model.parameters["DB_NAME"], vec![path.clone()]);
    assert_eq!(model.parameters["ENV"], vec![path]);
}

#[test]
fn test_parameter_scan_covers_every_version() {
    let relative = "00-database-setup/01-drop.sql";
    let version_files = vec![manifest("1.0.0.0", &[relative]), manifest("current", &[relative])];
    let reader = MemorySourceReader::new()
        .with_file(file("1.0.0.0", relative), "<ENV>")
        .with_file(file("current", relative), "<ENV>");

    let model = extract_object_information(&version_files, &reader);
    assert_eq!(
        model.parameters["ENV"],
        vec![file("1.0.0.0", relative), file("current", relative)]
    );
}

#[test]
fn test_parallel_and_sequential_analysis_agree() {
    // Enough objects to cross the parallel threshold
    let names: Vec<String> = (0..12).map(|i| format!("03-tables/abct_t{:02}_t{:02}.sql", i, i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut reader = MemorySourceReader::new();
    for (i, name) in names.iter().enumerate() {
        reader.insert(
            file("current", name),
            format!("create table abct_t{:02}_t{:02} (c{} int);", i, i, i),
        );
    }

    let big = analyze(fold(&[manifest("current", &refs)]), &reader);
    assert_eq!(big.tables().count(), 12);
    assert!(big.tables().all(|t| t.fields.len() == 1));

    let small = analyze(fold(&[manifest("current", &refs[..2])]), &reader);
    let first_big = big.tables().next().unwrap();
    let first_small = small.tables().next().unwrap();
    assert_eq!(first_big, first_small);
}

#[test]
fn test_every_name_in_one_bucket() {
    let version_files = vec![manifest(
        "current",
        &[
            "03-tables/abct_user_usr.sql",
            "05-indexes/abci_user_email.sql",
            "08-triggers/abcg_user_audit.sql",
        ],
    )];
    let model = extract_object_information(&version_files, &MemorySourceReader::new());
    for name in ["abct_user_usr", "abci_user_email", "abcg_user_audit"] {
        let holders = model
            .buckets
            .values()
            .filter(|bucket| bucket.contains_key(name))
            .count();
        assert_eq!(holders, 1, "{} should be in exactly one bucket", name);
    }
}
