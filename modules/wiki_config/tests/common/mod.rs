//! Common test utilities and shared store fixtures

#![allow(dead_code)]

use std::sync::Arc;

use wiki_config::contract::WikiSettings;
use wiki_config::domain::{NoOpEventPublisher, Service, StoredSettings};
use wiki_config::infra::storage::MemoryConfigurationStore;

/// Required fields of a completed installation, every optional field omitted
pub const SCENARIO_PAIRS: [(&str, &str); 6] = [
    ("ConnectionString", "Server=x"),
    ("Installed", "true"),
    ("AdminRoleName", "Admins"),
    ("EditorRoleName", "Editors"),
    ("UseWindowsAuthentication", "false"),
    ("ApiKeys", ""),
];

/// Store document of a completed installation
pub fn scenario_settings() -> StoredSettings {
    StoredSettings::from_pairs(SCENARIO_PAIRS).unwrap()
}

/// Scenario document with extra pairs layered on top; later pairs win
pub fn scenario_with(extra: &[(&str, &str)]) -> StoredSettings {
    let mut settings = scenario_settings();
    let overrides = StoredSettings::from_pairs(extra.iter().copied()).unwrap();
    for (field, value) in overrides.iter() {
        settings.set(field, value.clone()).unwrap();
    }
    settings
}

/// Scenario document as JSON text
pub fn scenario_json() -> String {
    serde_json::to_string_pretty(&scenario_settings()).unwrap()
}

/// Memory store plus a service loaded from it
pub async fn memory_service(settings: StoredSettings) -> (Arc<MemoryConfigurationStore>, Arc<Service>) {
    let store = Arc::new(MemoryConfigurationStore::new(settings));
    let service = Service::load(store.clone(), Arc::new(NoOpEventPublisher))
        .await
        .unwrap();
    (store, Arc::new(service))
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn print_json(label: &str, value: &serde_json::Value) {
    println!("   {}: {}", label, serde_json::to_string_pretty(value).unwrap());
}
