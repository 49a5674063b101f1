//! Unit tests for version manifests, version ordering and file classification

use std::path::Path;

use dbrepo::release::{
    is_acceptable_version, version_sort_key, DatabaseFileType, DatabaseVersionFile,
};

#[test]
fn test_every_segment_classifies() {
    let cases = [
        ("00-database-setup/a.sql", DatabaseFileType::Setup),
        ("03-tables/a.sql", DatabaseFileType::Table),
        ("0q-types/a.sql", DatabaseFileType::Type),
        ("07-functions/a.sql", DatabaseFileType::Function),
        ("09-data/a.sql", DatabaseFileType::Data),
        ("04-sequences/a.sql", DatabaseFileType::Sequence),
        ("05-indexes/a.sql", DatabaseFileType::Index),
        ("06-views/a.sql", DatabaseFileType::View),
        ("08-triggers/a.sql", DatabaseFileType::Trigger),
        ("fdw/00-foreign-servers/a.sql", DatabaseFileType::ForeignServers),
        ("fdw/01-user-mappings/a.sql", DatabaseFileType::UserMappings),
        ("fdw/02-local-tables/a.sql", DatabaseFileType::LocalTables),
        ("fdw/03-foreign-tables/a.sql", DatabaseFileType::ForeignTables),
        (
            "fdw/04-source-specific-app-setup/a.sql",
            DatabaseFileType::SourceSpecificAppSetup,
        ),
        ("int/01-data-transfers/a.sql", DatabaseFileType::DataTransfers),
        (
            "int/02-external-system-integrations/a.sql",
            DatabaseFileType::ExternalSystemIntegrations,
        ),
        ("int/03-data-exchange/a.sql", DatabaseFileType::DataExchange),
        (
            "10-users-roles-permissions/a.sql",
            DatabaseFileType::UsersRolesPermissions,
        ),
        (
            "11-full-text-catalogues/a.sql",
            DatabaseFileType::FullTextCatalogues,
        ),
    ];

    assert_eq!(cases.len(), DatabaseFileType::BUCKETS.len());
    for (path, expected) in cases {
        assert_eq!(DatabaseFileType::classify(path), expected, "path: {}", path);
    }
}

#[test]
fn test_unrecognised_path_is_unknown() {
    assert_eq!(
        DatabaseFileType::classify("scripts/cleanup.sql"),
        DatabaseFileType::Unknown
    );
}

#[test]
fn test_version_processing_order() {
    let mut versions = vec!["1.0.0.1", "current", "0.9.9.9"];
    versions.sort_by_key(|v| version_sort_key(v));
    assert_eq!(versions, vec!["0.9.9.9", "1.0.0.1", "current"]);
}

#[test]
fn test_version_order_is_numeric_per_component() {
    assert!(version_sort_key("1.0.0.9") < version_sort_key("1.0.0.10"));
    assert!(version_sort_key("1.9.0.0") < version_sort_key("1.10.0.0"));
    assert!(version_sort_key("2.0.0.0") < version_sort_key("current"));
}

#[test]
fn test_acceptable_version_names() {
    for name in ["current", "0.0.0.1", "12.3.45.678"] {
        assert!(is_acceptable_version(name), "{} should be accepted", name);
    }
    for name in ["", "1.0", "1.0.0.0.0", "latest", "1.0.0.a"] {
        assert!(!is_acceptable_version(name), "{} should be rejected", name);
    }
}

#[test]
fn test_manifest_with_several_steps() {
    let json = r#"[
        {"userToUse": "postgres", "databaseToUse": "postgres",
         "fileList": ["00-database-setup/01-drop.sql", "00-database-setup/02-create.sql"]},
        {"userToUse": "shop_owner", "databaseToUse": "shop",
         "fileList": ["03-tables/shot_customer_cus.sql"]}
    ]"#;
    let vf = DatabaseVersionFile::from_manifest_json(
        Path::new("shop/postgres/release/2.0.0.0/version.json"),
        json,
    )
    .unwrap();

    assert_eq!(vf.version_name, "2.0.0.0");
    assert_eq!(vf.versions[1].user_to_use, "shop_owner");
    assert_eq!(vf.versions[1].database_to_use, "shop");
    let names: Vec<&str> = vf.files().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["01-drop", "02-create", "shot_customer_cus"]);
    assert_eq!(vf.unknown_files().count(), 0);
}
