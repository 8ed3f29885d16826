//! Wire records for the aggregation engine.
//!
//! The backend deployments return weakly-typed camelCase JSON; everything
//! optional stays `Option` here and the fallback rules live in the
//! consuming modules, not in deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account family as reported by the backend. Unknown values are kept
/// rather than rejected so a new backend class never breaks a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum AccountClass {
    Linked,
    Manual,
    Crypto,
    #[serde(other)]
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBalance {
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// A financial position owned by the customer.
///
/// The sign of `have` is the sole asset/liability authority: positive is
/// an asset, negative a liability, whatever the type tags claim.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub account_class: AccountClass,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub manual_account_type: Option<String>,
    #[serde(default)]
    pub account_icon: Option<String>,
    #[serde(default)]
    pub account_icon_image_url: Option<String>,
    #[serde(default)]
    pub service_provider_id: Option<String>,
    /// Signed balance in the account's native currency.
    #[serde(default)]
    pub have: f64,
    #[serde(default)]
    pub current_balance: Option<CurrentBalance>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub deactivated: bool,
}

impl Account {
    /// Native currency of the account: `currentBalance.currencyCode`,
    /// then the top-level `currencyCode`, then the requested display
    /// currency when the record carries neither.
    pub fn native_currency<'a>(&'a self, display_currency: &'a str) -> &'a str {
        self.current_balance
            .as_ref()
            .and_then(|b| b.currency_code.as_deref())
            .or(self.currency_code.as_deref())
            .unwrap_or(display_currency)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountLoginForm {
    #[serde(default)]
    pub account_login_fields: Vec<serde_json::Value>,
}

/// A linkable institution record as returned by one regional backend.
/// Raw input to the merger; consumers only ever see [`CatalogEntry`].
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(default)]
    pub id: Option<String>,
    /// Legacy identifier still emitted by older deployments.
    #[serde(default)]
    pub tts_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "logo")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub integration_provider: Option<String>,
    #[serde(default)]
    pub account_login_form: Option<AccountLoginForm>,
    #[serde(default)]
    pub can_link: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl Provider {
    /// Canonical identity key: `id`, falling back to the legacy `ttsId`.
    pub fn identity_key(&self) -> Option<&str> {
        self.id.as_deref().or(self.tts_id.as_deref())
    }

    /// Absent `canLink` means linkable.
    pub fn is_linkable(&self) -> bool {
        self.can_link.unwrap_or(true)
    }
}

/// Currency-pair rates valid for one aggregation cycle.
///
/// Keys are uppercase `"FROM:TO"` pairs; bare currency-code keys are read
/// as that currency's rate into `base_currency` when one is set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateTable {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExchangeRateTable {
    /// Direct rate from `from` to `to`, if the table carries one.
    /// Inverse lookup is the caller's concern (`currency::convert`).
    pub fn rate(&self, from: &str, to: &str) -> Option<f64> {
        let from = from.to_ascii_uppercase();
        let to = to.to_ascii_uppercase();
        if let Some(rate) = self.rates.get(&format!("{from}:{to}")) {
            return Some(*rate);
        }
        match &self.base_currency {
            Some(base) if base.eq_ignore_ascii_case(&to) => self.rates.get(&from).copied(),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates.insert(
            format!("{}:{}", from.to_ascii_uppercase(), to.to_ascii_uppercase()),
            rate,
        );
        self
    }
}

/// Everything the backend knows about a customer as of one fetch.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub service_providers: Vec<Provider>,
    #[serde(default)]
    pub exchange_rates: ExchangeRateTable,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_deserializes_camel_case_with_nested_balance() {
        let json = r#"{
            "id": "acc-1",
            "accountClass": "Linked",
            "accountType": "Bank",
            "serviceProviderId": "sp-9",
            "have": -120.5,
            "currentBalance": { "currencyCode": "AED" },
            "deactivated": false
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.account_class, AccountClass::Linked);
        assert_eq!(account.have, -120.5);
        assert_eq!(account.native_currency("USD"), "AED");
    }

    #[test]
    fn native_currency_falls_back_to_top_level_then_display() {
        let account: Account =
            serde_json::from_str(r#"{"id": "a", "currencyCode": "SAR"}"#).unwrap();
        assert_eq!(account.native_currency("USD"), "SAR");

        let bare: Account = serde_json::from_str(r#"{"id": "b"}"#).unwrap();
        assert_eq!(bare.native_currency("USD"), "USD");
    }

    #[test]
    fn unknown_account_class_is_tolerated() {
        let account: Account =
            serde_json::from_str(r#"{"id": "a", "accountClass": "Pension"}"#).unwrap();
        assert_eq!(account.account_class, AccountClass::Unknown);
    }

    #[test]
    fn provider_identity_prefers_id_over_tts_id() {
        let provider: Provider =
            serde_json::from_str(r#"{"id": "p-1", "ttsId": "legacy-1"}"#).unwrap();
        assert_eq!(provider.identity_key(), Some("p-1"));

        let legacy: Provider = serde_json::from_str(r#"{"ttsId": "legacy-1"}"#).unwrap();
        assert_eq!(legacy.identity_key(), Some("legacy-1"));

        let anonymous: Provider = serde_json::from_str(r#"{"name": "No Id Bank"}"#).unwrap();
        assert_eq!(anonymous.identity_key(), None);
    }

    #[test]
    fn provider_logo_alias_and_linkable_default() {
        let provider: Provider =
            serde_json::from_str(r#"{"id": "p", "logo": "https://cdn/x.png"}"#).unwrap();
        assert_eq!(provider.logo_url.as_deref(), Some("https://cdn/x.png"));
        assert!(provider.is_linkable());

        let blocked: Provider =
            serde_json::from_str(r#"{"id": "p", "canLink": false}"#).unwrap();
        assert!(!blocked.is_linkable());
    }

    #[test]
    fn rate_table_reads_pair_and_bare_code_keys() {
        let json = r#"{
            "rates": { "AED:USD": 0.27, "SAR": 0.2666 },
            "baseCurrency": "USD"
        }"#;
        let table: ExchangeRateTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.rate("AED", "USD"), Some(0.27));
        assert_eq!(table.rate("aed", "usd"), Some(0.27));
        assert_eq!(table.rate("SAR", "USD"), Some(0.2666));
        assert_eq!(table.rate("SAR", "EUR"), None);
    }
}
