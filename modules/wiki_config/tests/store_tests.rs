//! Backing store tests: files, environment overlay and the database table

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use wiki_config::contract::*;
use wiki_config::domain::{ConfigurationStore, NoOpEventPublisher, Service, StoredSettings};
use wiki_config::infra::storage::migrations::Migrator;
use wiki_config::infra::storage::{
    env_key, DocumentFormat, EnvOverlayStore, FileConfigurationStore, MemoryConfigurationStore,
    SeaOrmConfigurationStore, DEFAULT_ENV_PREFIX,
};

mod common;
use common::{print_test_header, scenario_json, scenario_settings, scenario_with};

async fn sqlite_connection(dir: &tempfile::TempDir) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("wiki.db").display());
    let conn = Database::connect(url.as_str()).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    conn
}

// ===== File store =====

#[tokio::test]
async fn test_json_file_store_round_trip() {
    print_test_header(
        "test_json_file_store_round_trip",
        &["A JSON document loads, saves through a temp file and reloads"],
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wiki.json");
    std::fs::write(&path, scenario_json()).unwrap();

    let store = FileConfigurationStore::new(&path).unwrap();
    assert_eq!(store.format(), DocumentFormat::Json);
    assert_eq!(store.load().await.unwrap(), scenario_settings());

    let updated = scenario_with(&[("UseObjectCache", "false")]);
    store.save(&updated).await.unwrap();

    assert_eq!(store.load().await.unwrap(), updated);
    assert!(!dir.path().join("wiki.json.tmp").exists());
    println!("   ✓ {}", store.describe());
}

#[tokio::test]
async fn test_yaml_file_store_accepts_string_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wiki.yaml");
    std::fs::write(
        &path,
        concat!(
            "ConnectionString: Server=x\n",
            "Installed: \"True\"\n",
            "AdminRoleName: Admins\n",
            "EditorRoleName: Editors\n",
            "UseWindowsAuthentication: false\n",
            "ApiKeys: \"\"\n",
            "UseHtmlWhiteList: \"FALSE\"\n",
            "Theme: dark\n",
            "LdapPassword: ~\n",
        ),
    )
    .unwrap();

    let store = Arc::new(FileConfigurationStore::new(&path).unwrap());
    assert_eq!(store.format(), DocumentFormat::Yaml);

    let stored = store.load().await.unwrap();
    assert_eq!(stored.get(ConfigField::Installed), FieldValue::Flag(true));
    assert_eq!(stored.get(ConfigField::UseHtmlWhiteList), FieldValue::Flag(false));
    assert!(!stored.contains(ConfigField::LdapPassword));
    assert_eq!(stored.len(), 7);

    let service = Service::load(store, Arc::new(NoOpEventPublisher))
        .await
        .unwrap();
    assert_eq!(service.startup_mode(), StartupMode::Normal);
    assert_eq!(service.get(ConfigField::LdapPassword), FieldValue::from(""));
}

#[tokio::test]
async fn test_file_store_rejects_case_variant_and_duplicate_keys() {
    let dir = tempfile::tempdir().unwrap();

    let case_path = dir.path().join("case.json");
    std::fs::write(&case_path, r#"{"installed": true}"#).unwrap();
    let err = FileConfigurationStore::new(&case_path)
        .unwrap()
        .load()
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("differs from 'Installed' only by case"));

    let duplicate_path = dir.path().join("duplicate.json");
    std::fs::write(
        &duplicate_path,
        r#"{"Installed": true, "Installed": false}"#,
    )
    .unwrap();
    let err = FileConfigurationStore::new(&duplicate_path)
        .unwrap()
        .load()
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Duplicate configuration key: Installed"));
}

#[tokio::test]
async fn test_file_store_rejects_text_in_flag_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wiki.json");
    std::fs::write(&path, r#"{"UseObjectCache": "sometimes"}"#).unwrap();

    let result = Service::load(
        Arc::new(FileConfigurationStore::new(&path).unwrap()),
        Arc::new(NoOpEventPublisher),
    )
    .await;
    assert!(matches!(result, Err(ConfigError::Load { .. })));
}

#[test]
fn test_file_store_rejects_unknown_extension() {
    assert!(FileConfigurationStore::new("/etc/wiki/settings.ini").is_err());
}

#[tokio::test]
async fn test_missing_file_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileConfigurationStore::new(dir.path().join("absent.json")).unwrap();
    let err = store.load().await.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read"));
}

// ===== Environment overlay =====

#[tokio::test]
async fn test_env_overlay_overrides_inner_store() {
    print_test_header(
        "test_env_overlay_overrides_inner_store",
        &[
            "WIKI_* variables replace stored values on load",
            "Variables for other prefixes or unknown fields are ignored",
        ],
    );

    let inner = Arc::new(MemoryConfigurationStore::new(scenario_with(&[(
        "DatabaseName",
        "SqlServer2012",
    )])));
    let overlay = EnvOverlayStore::with_vars(
        inner.clone(),
        DEFAULT_ENV_PREFIX,
        [
            (env_key(DEFAULT_ENV_PREFIX, ConfigField::DatabaseName), "Postgres".to_string()),
            (env_key(DEFAULT_ENV_PREFIX, ConfigField::UseObjectCache), "false".to_string()),
            (env_key(DEFAULT_ENV_PREFIX, ConfigField::ApiKeys), "k1,k2".to_string()),
            ("WIKI_THEME".to_string(), "dark".to_string()),
            ("OTHER_INSTALLED".to_string(), "false".to_string()),
        ],
    );

    let stored = overlay.load().await.unwrap();
    assert_eq!(stored.get(ConfigField::DatabaseName), FieldValue::from("Postgres"));
    assert_eq!(stored.get(ConfigField::UseObjectCache), FieldValue::Flag(false));
    assert_eq!(stored.get(ConfigField::ApiKeys), FieldValue::from("k1,k2"));
    assert_eq!(stored.get(ConfigField::Installed), FieldValue::Flag(true));
    assert!(overlay.describe().contains("WIKI_"));

    // Environment values never reach the inner store
    overlay.save(&stored).await.unwrap();
    let persisted = inner.stored();
    assert_eq!(persisted.get(ConfigField::DatabaseName), FieldValue::from("SqlServer2012"));
    assert_eq!(persisted.stored_value(ConfigField::ApiKeys), Some(FieldValue::from("")));
    assert!(!persisted.contains(ConfigField::UseObjectCache));
}

#[tokio::test]
async fn test_env_overlay_save_keeps_environment_values_out_of_store() {
    print_test_header(
        "test_env_overlay_save_keeps_environment_values_out_of_store",
        &[
            "Saving unrelated changes does not persist environment secrets",
            "An explicitly changed field is persisted and survives reload",
        ],
    );

    let inner = Arc::new(MemoryConfigurationStore::new(scenario_settings()));
    let overlay = Arc::new(EnvOverlayStore::with_vars(
        inner.clone(),
        DEFAULT_ENV_PREFIX,
        [
            (env_key(DEFAULT_ENV_PREFIX, ConfigField::LdapPassword), "s3cret"),
            (env_key(DEFAULT_ENV_PREFIX, ConfigField::IsPublicSite), "false"),
        ],
    ));
    let service = Service::load(overlay.clone(), Arc::new(NoOpEventPublisher))
        .await
        .unwrap();
    assert_eq!(service.get(ConfigField::LdapPassword), FieldValue::from("s3cret"));

    service
        .set(ConfigField::AzureContainer, FieldValue::from("media"))
        .await
        .unwrap();
    service.save().await.unwrap();

    let persisted = inner.stored();
    assert!(!persisted.contains(ConfigField::LdapPassword));
    assert!(!persisted.contains(ConfigField::IsPublicSite));
    assert_eq!(persisted.get(ConfigField::AzureContainer), FieldValue::from("media"));
    // Reloaded view still carries the environment values
    assert_eq!(service.get(ConfigField::LdapPassword), FieldValue::from("s3cret"));
    assert_eq!(service.get(ConfigField::IsPublicSite), FieldValue::Flag(false));

    // An explicit change to an overridden field wins over the variable
    service
        .set(ConfigField::IsPublicSite, FieldValue::Flag(true))
        .await
        .unwrap();
    service.save().await.unwrap();

    assert_eq!(
        inner.stored().stored_value(ConfigField::IsPublicSite),
        Some(FieldValue::Flag(true))
    );
    assert!(!inner.stored().contains(ConfigField::LdapPassword));
    assert_eq!(service.get(ConfigField::IsPublicSite), FieldValue::Flag(true));

    service.reload().await.unwrap();
    assert_eq!(service.get(ConfigField::IsPublicSite), FieldValue::Flag(true));
    assert_eq!(service.get(ConfigField::LdapPassword), FieldValue::from("s3cret"));
}

#[tokio::test]
async fn test_env_overlay_rejects_malformed_flag() {
    let overlay = EnvOverlayStore::with_vars(
        Arc::new(MemoryConfigurationStore::new(scenario_settings())),
        "WIKI_",
        [("WIKI_INSTALLED", "maybe")],
    );

    let err = overlay.load().await.unwrap_err();
    assert!(format!("{:#}", err).contains("WIKI_INSTALLED"));
}

// ===== Database store =====

#[tokio::test]
async fn test_database_store_round_trip() {
    print_test_header(
        "test_database_store_round_trip",
        &[
            "Migrator creates wiki_configuration",
            "Save upserts one row per key and load reads them back",
            "Rows for keys absent from a later save are deleted",
        ],
    );

    let dir = tempfile::tempdir().unwrap();
    let conn = Arc::new(sqlite_connection(&dir).await);
    let store = SeaOrmConfigurationStore::new(conn.clone());

    assert!(store.load().await.unwrap().is_empty());

    store.save(&scenario_settings()).await.unwrap();
    assert_eq!(store.load().await.unwrap(), scenario_settings());

    // Second save updates existing rows in place
    let updated = scenario_with(&[("Installed", "false"), ("AzureContainer", "files")]);
    store.save(&updated).await.unwrap();
    assert_eq!(store.load().await.unwrap(), updated);

    let rows = conn
        .query_all(sea_orm::Statement::from_string(
            conn.get_database_backend(),
            r#"SELECT "key", "value" FROM wiki_configuration"#,
        ))
        .await
        .unwrap();
    assert_eq!(rows.len(), 7);

    // Keys missing from the next document are removed
    store.save(&scenario_settings()).await.unwrap();
    assert_eq!(store.load().await.unwrap(), scenario_settings());
    let rows = conn
        .query_all(sea_orm::Statement::from_string(
            conn.get_database_backend(),
            r#"SELECT "key" FROM wiki_configuration WHERE "key" = 'AzureContainer'"#,
        ))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_database_store_drives_service() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Arc::new(sqlite_connection(&dir).await);
    let store = Arc::new(SeaOrmConfigurationStore::new(conn));

    let service = Service::load(store.clone(), Arc::new(NoOpEventPublisher))
        .await
        .unwrap();
    assert!(service.startup_mode().is_setup());
    assert_eq!(service.snapshot().missing_required.len(), 6);

    for (key, raw) in common::SCENARIO_PAIRS {
        let field: ConfigField = key.parse().unwrap();
        let value = FieldValue::parse(field.kind(), raw).unwrap();
        service.set(field, value).await.unwrap();
    }
    service.save().await.unwrap();

    let reopened = Service::load(store, Arc::new(NoOpEventPublisher))
        .await
        .unwrap();
    assert_eq!(reopened.startup_mode(), StartupMode::Normal);
    assert_eq!(
        reopened.configuration(),
        WikiConfiguration::from_settings(&scenario_settings())
            .unwrap()
            .with_defaults()
    );
}

#[test]
fn test_stored_settings_string_pairs_match_database_rows() {
    let pairs = scenario_with(&[("IsPublicSite", "false")]).to_string_pairs();
    assert!(pairs.contains(&("IsPublicSite".to_string(), "false".to_string())));
    assert!(pairs.contains(&("ApiKeys".to_string(), String::new())));

    let restored = StoredSettings::from_pairs(pairs).unwrap();
    assert_eq!(restored.get(ConfigField::IsPublicSite), FieldValue::Flag(false));
}
