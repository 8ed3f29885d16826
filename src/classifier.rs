//! Provider integration-family inference.
//!
//! The three signal fields on a raw provider record are not mutually
//! exclusive, so classification is an ordered chain: the explicit
//! `integrationProvider` tag always beats the login-form heuristic.

use crate::model::Provider;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderType {
    Lean,
    Vezgo,
    Yodlee,
    Unknown,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderType::Lean => "LEAN",
            ProviderType::Vezgo => "VEZGO",
            ProviderType::Yodlee => "YODLEE",
            ProviderType::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Infer a record's integration family. First match wins; a stale
/// `accountLoginForm` next to a valid `integrationProvider` must not
/// reclassify the record.
pub fn classify(provider: &Provider) -> ProviderType {
    match provider.integration_provider.as_deref() {
        Some("LEAN") => return ProviderType::Lean,
        Some("VEZGO") => return ProviderType::Vezgo,
        _ => {}
    }
    let has_login_fields = provider
        .account_login_form
        .as_ref()
        .is_some_and(|form| !form.account_login_fields.is_empty());
    if has_login_fields {
        ProviderType::Yodlee
    } else {
        ProviderType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountLoginForm;

    fn with_login_form(mut provider: Provider) -> Provider {
        provider.account_login_form = Some(AccountLoginForm {
            account_login_fields: vec![serde_json::json!({"name": "username"})],
        });
        provider
    }

    #[test]
    fn integration_provider_tag_wins() {
        let mut provider = Provider::default();
        provider.integration_provider = Some("LEAN".to_string());
        assert_eq!(classify(&provider), ProviderType::Lean);

        provider.integration_provider = Some("VEZGO".to_string());
        assert_eq!(classify(&provider), ProviderType::Vezgo);
    }

    #[test]
    fn login_fields_imply_yodlee() {
        let provider = with_login_form(Provider::default());
        assert_eq!(classify(&provider), ProviderType::Yodlee);
    }

    #[test]
    fn stale_login_form_does_not_beat_explicit_tag() {
        let mut provider = with_login_form(Provider::default());
        provider.integration_provider = Some("LEAN".to_string());
        assert_eq!(classify(&provider), ProviderType::Lean);
    }

    #[test]
    fn empty_login_form_is_unknown() {
        let mut provider = Provider::default();
        provider.account_login_form = Some(AccountLoginForm::default());
        assert_eq!(classify(&provider), ProviderType::Unknown);

        provider.integration_provider = Some("PLAID".to_string());
        assert_eq!(classify(&provider), ProviderType::Unknown);
    }
}
