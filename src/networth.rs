//! Net-worth totals and category grouping.
//!
//! Deactivated accounts are skipped everywhere. A conversion miss falls
//! back to the native-currency amount so an account can never silently
//! leave the totals. The sign of `have` alone decides asset vs liability.

use crate::currency;
use crate::model::{Account, AccountClass, ExchangeRateTable};
use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct NetWorthSummary {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub timestamp: DateTime<Utc>,
}

/// One derived display category. Built fresh on every grouping pass.
#[derive(Debug, Clone)]
pub struct AccountGroup {
    pub name: String,
    pub icon_path: String,
    pub accounts: Vec<Account>,
    /// Signed sum of converted member balances; negative for
    /// liability-heavy groups.
    pub total: f64,
}

/// Canonical display categories, in render priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKind {
    Bank,
    Investments,
    Crypto,
    RealEstate,
    Vehicles,
    CreditCards,
    VehicleLoans,
    HomeLoans,
    SomethingElse,
}

const GROUP_ORDER: &[GroupKind] = &[
    GroupKind::Bank,
    GroupKind::Investments,
    GroupKind::Crypto,
    GroupKind::RealEstate,
    GroupKind::Vehicles,
    GroupKind::CreditCards,
    GroupKind::VehicleLoans,
    GroupKind::HomeLoans,
    GroupKind::SomethingElse,
];

impl GroupKind {
    fn name(self) -> &'static str {
        match self {
            GroupKind::Bank => "Bank",
            GroupKind::Investments => "Investments",
            GroupKind::Crypto => "Crypto",
            GroupKind::RealEstate => "Real Estate",
            GroupKind::Vehicles => "Vehicles",
            GroupKind::CreditCards => "Credit Cards",
            GroupKind::VehicleLoans => "Vehicle Loans",
            GroupKind::HomeLoans => "Home Loans",
            GroupKind::SomethingElse => "Something Else",
        }
    }

    /// Fixed per-group icon, independent of member account icons.
    fn icon_path(self) -> &'static str {
        match self {
            GroupKind::Bank => "account_group/bank",
            GroupKind::Investments => "account_group/investments",
            GroupKind::Crypto => "account_group/cryptocurrency",
            GroupKind::RealEstate => "account_group/real_estate",
            GroupKind::Vehicles => "account_group/vehicle",
            GroupKind::CreditCards => "account_group/credit_card",
            GroupKind::VehicleLoans => "account_group/vehicle_loan",
            GroupKind::HomeLoans => "account_group/home_loan",
            GroupKind::SomethingElse => "account_group/something_else",
        }
    }
}

/// Assign an account to exactly one group, from class and type tags.
fn resolve_group(account: &Account) -> GroupKind {
    if account.account_class == AccountClass::Crypto {
        return GroupKind::Crypto;
    }
    let type_tag = account
        .manual_account_type
        .as_deref()
        .or(account.account_type.as_deref())
        .unwrap_or("");
    match type_tag {
        "Bank" | "Checking" | "Savings" => GroupKind::Bank,
        "Investment" | "Investments" | "Brokerage" => GroupKind::Investments,
        "Crypto" => GroupKind::Crypto,
        "RealEstate" => GroupKind::RealEstate,
        "Vehicle" => GroupKind::Vehicles,
        "CreditCard" => GroupKind::CreditCards,
        "VehicleLoan" | "CarLoan" => GroupKind::VehicleLoans,
        "HomeLoan" | "Mortgage" => GroupKind::HomeLoans,
        _ => GroupKind::SomethingElse,
    }
}

/// Signed balance in the display currency, falling back to the native
/// amount when no rate path exists.
fn converted_balance(account: &Account, display_currency: &str, rates: &ExchangeRateTable) -> f64 {
    let native = account.native_currency(display_currency);
    match currency::convert(account.have, native, display_currency, rates) {
        Some(converted) => converted,
        None => {
            debug!(
                account = %account.id,
                from = %native,
                to = %display_currency,
                "Conversion miss, keeping native amount"
            );
            account.have
        }
    }
}

pub fn compute_net_worth(
    accounts: &[Account],
    display_currency: &str,
    rates: &ExchangeRateTable,
) -> NetWorthSummary {
    let mut total_assets = 0.0;
    let mut total_liabilities = 0.0;

    for account in accounts.iter().filter(|a| !a.deactivated) {
        let converted = converted_balance(account, display_currency, rates);
        if account.have >= 0.0 {
            total_assets += converted.abs();
        } else {
            total_liabilities += converted.abs();
        }
    }

    NetWorthSummary {
        total_assets,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
        timestamp: rates.timestamp.unwrap_or_else(Utc::now),
    }
}

/// Partition accounts into display groups with signed converted totals.
/// Empty groups are omitted; ordering follows the fixed priority list.
pub fn group_accounts(
    accounts: &[Account],
    rates: &ExchangeRateTable,
    display_currency: &str,
) -> Vec<AccountGroup> {
    let mut groups: Vec<AccountGroup> = GROUP_ORDER
        .iter()
        .map(|kind| AccountGroup {
            name: kind.name().to_string(),
            icon_path: kind.icon_path().to_string(),
            accounts: Vec::new(),
            total: 0.0,
        })
        .collect();

    for account in accounts.iter().filter(|a| !a.deactivated) {
        let kind = resolve_group(account);
        let slot = GROUP_ORDER.iter().position(|k| *k == kind).unwrap_or(GROUP_ORDER.len() - 1);
        groups[slot].total += converted_balance(account, display_currency, rates);
        groups[slot].accounts.push(account.clone());
    }

    groups.retain(|group| !group.accounts.is_empty());
    groups
}
