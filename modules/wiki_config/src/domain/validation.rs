//! Checks the host runs on a loaded configuration
//!
//! The schema itself never validates values; these helpers only answer
//! whether the application may leave the setup workflow and whether a
//! REST caller presented a configured key.

use crate::contract::{ConfigField, SetupReason, StartupMode, WikiSettings};

/// Required fields the representation does not hold
pub fn missing_required_fields<S: WikiSettings + ?Sized>(settings: &S) -> Vec<ConfigField> {
    ConfigField::ALL
        .into_iter()
        .filter(|field| field.is_required() && settings.stored_value(*field).is_none())
        .collect()
}

/// Decide between normal operation and the setup workflow
///
/// Missing required fields win over `Installed`, since an installed flag
/// next to an incomplete store cannot be trusted.
pub fn startup_mode(installed: bool, missing_required: &[ConfigField]) -> StartupMode {
    if !missing_required.is_empty() {
        StartupMode::Setup(SetupReason::MissingRequired(missing_required.to_vec()))
    } else if !installed {
        StartupMode::Setup(SetupReason::NotInstalled)
    } else {
        StartupMode::Normal
    }
}

/// Whether `presented` is one of the configured API keys
///
/// Always false when `ApiKeys` is empty (REST API disabled). Every
/// configured key is compared in full, whatever matched earlier.
pub fn accepts_api_key<S: WikiSettings + ?Sized>(settings: &S, presented: &str) -> bool {
    let presented = presented.trim();
    if presented.is_empty() {
        return false;
    }
    settings
        .api_key_list()
        .iter()
        .fold(false, |matched, key| {
            matched | constant_time_eq(key.as_bytes(), presented.as_bytes())
        })
}

/// Byte comparison whose running time depends only on the lengths
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::WikiConfiguration;
    use crate::domain::StoredSettings;

    #[test]
    fn test_missing_required_fields() {
        let settings =
            StoredSettings::from_pairs([("ConnectionString", "Server=x"), ("Installed", "true")])
                .unwrap();
        assert_eq!(
            missing_required_fields(&settings),
            vec![
                ConfigField::AdminRoleName,
                ConfigField::EditorRoleName,
                ConfigField::ApiKeys,
                ConfigField::UseWindowsAuthentication,
            ]
        );
    }

    #[test]
    fn test_empty_api_keys_is_present_not_missing() {
        let settings = StoredSettings::from_pairs([("ApiKeys", "")]).unwrap();
        assert!(!missing_required_fields(&settings).contains(&ConfigField::ApiKeys));
    }

    #[test]
    fn test_startup_mode() {
        assert_eq!(startup_mode(true, &[]), StartupMode::Normal);
        assert_eq!(
            startup_mode(false, &[]),
            StartupMode::Setup(SetupReason::NotInstalled)
        );
        assert_eq!(
            startup_mode(true, &[ConfigField::ConnectionString]),
            StartupMode::Setup(SetupReason::MissingRequired(vec![
                ConfigField::ConnectionString
            ]))
        );
    }

    #[test]
    fn test_accepts_api_key() {
        let config = WikiConfiguration {
            api_keys: "alpha,beta".to_string(),
            ..Default::default()
        };
        assert!(accepts_api_key(&config, "beta"));
        assert!(!accepts_api_key(&config, "gamma"));
        assert!(!accepts_api_key(&config, ""));

        let disabled = WikiConfiguration::default();
        assert!(!accepts_api_key(&disabled, ""));
        assert!(!accepts_api_key(&disabled, "alpha"));
    }

    #[test]
    fn test_accepts_api_key_compares_whole_keys() {
        let config = WikiConfiguration {
            api_keys: "first-key,second-key,last-key".to_string(),
            ..Default::default()
        };
        assert!(accepts_api_key(&config, "last-key"));
        assert!(accepts_api_key(&config, " first-key "));
        assert!(!accepts_api_key(&config, "last"));
        assert!(!accepts_api_key(&config, "last-key2"));
        assert!(!accepts_api_key(&config, "Last-key"));

        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
