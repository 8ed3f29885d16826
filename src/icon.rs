//! Account icon and identity resolution.
//!
//! One rule chain for every caller. The order is load-bearing: an account
//! can satisfy several rules at once (a manual crypto account with an
//! explicit image override still shows the crypto icon).

use crate::model::{Account, AccountClass};

/// Template for linked-institution logos, parameterized by provider id.
const INSTITUTION_LOGO_URL: &str = "https://static.wealthlens.app/institutions/{id}/logo.png";

const MANUAL_ICON_PREFIX: &str = "manual_account/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRef {
    pub is_local: bool,
    pub icon_path: String,
}

impl IconRef {
    fn local(path: impl Into<String>) -> Self {
        IconRef {
            is_local: true,
            icon_path: path.into(),
        }
    }

    fn remote(url: impl Into<String>) -> Self {
        IconRef {
            is_local: false,
            icon_path: url.into(),
        }
    }
}

/// Icon file name for a manual account type tag.
fn manual_type_icon(type_tag: &str) -> &'static str {
    match type_tag {
        "Bank" => "bank",
        "CreditCard" => "credit_card",
        "Investment" | "Investments" => "investment",
        "RealEstate" => "real_estate",
        "Vehicle" => "vehicle",
        "Loan" => "loan",
        "Insurance" => "insurance",
        "Cash" => "cash",
        "Crypto" => "cryptocurrency",
        _ => "default",
    }
}

fn is_crypto(account: &Account) -> bool {
    if account.account_class == AccountClass::Crypto {
        return true;
    }
    account.account_class == AccountClass::Manual
        && (account.manual_account_type.as_deref() == Some("Crypto")
            || account.account_type.as_deref() == Some("Crypto")
            || account.account_icon.as_deref() == Some("Crypto"))
}

/// Resolve the display icon for an account. Strict priority:
/// crypto detection, explicit image override, manual-type derivation,
/// linked-institution logo, then the default.
pub fn resolve_icon(account: &Account) -> IconRef {
    if is_crypto(account) {
        return IconRef::local("cryptocurrency");
    }

    if let Some(url) = account
        .account_icon_image_url
        .as_deref()
        .filter(|url| !url.is_empty())
    {
        return IconRef::remote(url);
    }

    if account.account_class == AccountClass::Manual {
        let icon = match account.account_icon.as_deref() {
            None | Some("Manual") => {
                let type_tag = account
                    .manual_account_type
                    .as_deref()
                    .or(account.account_type.as_deref())
                    .unwrap_or("SomethingElse");
                manual_type_icon(type_tag).to_string()
            }
            Some(explicit) => explicit.to_string(),
        };
        return IconRef::local(format!("{MANUAL_ICON_PREFIX}{icon}"));
    }

    if let Some(provider_id) = account.service_provider_id.as_deref() {
        return IconRef::remote(INSTITUTION_LOGO_URL.replace("{id}", provider_id));
    }

    IconRef::local(format!("{MANUAL_ICON_PREFIX}default"))
}
