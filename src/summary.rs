//! Rendering of net-worth reports and the merged provider catalog.

use crate::currency;
use crate::icon;
use crate::merge::MergeOutcome;
use crate::model::{Account, ExchangeRateTable};
use crate::networth::{self, AccountGroup, NetWorthSummary};
use crate::ui;
use comfy_table::Cell;

/// Everything the summary command shows: totals plus grouped accounts,
/// all in one display currency.
#[derive(Debug)]
pub struct NetWorthReport {
    pub summary: NetWorthSummary,
    pub groups: Vec<AccountGroup>,
    pub currency: String,
}

impl NetWorthReport {
    pub fn build(accounts: &[Account], rates: &ExchangeRateTable, currency: &str) -> Self {
        NetWorthReport {
            summary: networth::compute_net_worth(accounts, currency, rates),
            groups: networth::group_accounts(accounts, rates, currency),
            currency: currency.to_string(),
        }
    }

    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Group"),
            ui::header_cell("Accounts"),
            ui::header_cell(&format!("Total ({})", self.currency)),
        ]);

        for group in &self.groups {
            table.add_row(vec![
                Cell::new(&group.name),
                Cell::new(group.accounts.len().to_string()),
                ui::money_cell(group.total, &self.currency),
            ]);
        }

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Net Worth", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        let assets = currency::format_money(self.summary.total_assets, &self.currency);
        let liabilities = currency::format_money(-self.summary.total_liabilities, &self.currency);
        let net_worth = currency::format_money(self.summary.net_worth, &self.currency);
        output.push_str(&format!(
            "\n\n{}: {}\n{}: {}\n{}: {}",
            ui::style_text("Total Assets", ui::StyleType::TotalLabel),
            ui::style_text(&assets, ui::StyleType::TotalValue),
            ui::style_text("Total Liabilities", ui::StyleType::TotalLabel),
            ui::style_text(&liabilities, ui::StyleType::Error),
            ui::style_text("Net Worth", ui::StyleType::TotalLabel),
            ui::style_text(&net_worth, ui::StyleType::TotalValue),
        ));
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("as of {}", self.summary.timestamp.format("%Y-%m-%d %H:%M UTC")),
                ui::StyleType::Subtle
            )
        ));
        output
    }

    /// One table per group with the member accounts and resolved icons.
    pub fn display_group_details(&self) -> String {
        let mut output = String::new();
        for group in &self.groups {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Account"),
                ui::header_cell("Icon"),
                ui::header_cell(&format!("Balance ({})", self.currency)),
            ]);
            for account in &group.accounts {
                let icon = icon::resolve_icon(account);
                let origin = if icon.is_local { "local" } else { "remote" };
                table.add_row(vec![
                    Cell::new(&account.id),
                    Cell::new(format!("{origin}:{}", icon.icon_path)),
                    ui::money_cell(account.have, account.native_currency(&self.currency)),
                ]);
            }
            output.push_str(&format!(
                "\n{} [{}]\n{}\n",
                ui::style_text(&group.name, ui::StyleType::Title),
                group.icon_path,
                table
            ));
        }
        output
    }
}

/// Render the merged catalog for the "link an account" picker. Within the
/// stable merge order, popular providers (lowest `sortOrder`) come first,
/// then the rest by name.
pub fn display_provider_catalog(outcome: &MergeOutcome) -> String {
    let mut entries: Vec<_> = outcome.providers.iter().collect();
    entries.sort_by(|a, b| match (a.sort_order, b.sort_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Provider"),
        ui::header_cell("Type"),
        ui::header_cell("Source"),
    ]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(entry.name.as_deref().unwrap_or(&entry.id)),
            Cell::new(entry.provider_type.to_string()),
            Cell::new(&entry.source_api),
        ]);
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("Linkable Providers", ui::StyleType::Title),
        table
    );

    if !outcome.failures.is_empty() {
        let sources: Vec<&str> = outcome.failures.iter().map(|f| f.source.as_str()).collect();
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Some sources were unavailable: {}", sources.join(", ")),
                ui::StyleType::Error
            )
        ));
    }
    if !outcome.data_errors.is_empty() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("{} record(s) dropped for missing identity", outcome.data_errors.len()),
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ProviderType;
    use crate::merge::{CatalogEntry, DataError, SourceFailure};
    use crate::model::AccountClass;

    fn account(id: &str, have: f64, currency_code: &str) -> Account {
        Account {
            id: id.to_string(),
            account_class: AccountClass::Linked,
            account_type: Some("Bank".to_string()),
            have,
            currency_code: Some(currency_code.to_string()),
            ..Account::default()
        }
    }

    fn entry(id: &str, name: &str, sort_order: Option<i64>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: Some(name.to_string()),
            logo_url: None,
            provider_type: ProviderType::Lean,
            source_api: "uae".to_string(),
            sort_order,
            also_offered_by: Vec::new(),
        }
    }

    #[test]
    fn report_carries_totals_and_groups() {
        let rates = ExchangeRateTable::default().with_rate("AED", "USD", 0.27);
        let accounts = vec![account("a", 1000.0, "AED"), account("b", -500.0, "USD")];
        let report = NetWorthReport::build(&accounts, &rates, "USD");

        assert!((report.summary.net_worth + 230.0).abs() < 1e-9);
        assert_eq!(report.groups.len(), 1);
        let rendered = report.display_as_table();
        assert!(rendered.contains("Bank"));
        assert!(rendered.contains("Net Worth"));
    }

    #[test]
    fn group_details_show_resolved_icons() {
        let rates = ExchangeRateTable::default();
        let mut wallet = account("wallet", 12.0, "USD");
        wallet.account_class = AccountClass::Crypto;
        let report = NetWorthReport::build(&[wallet], &rates, "USD");
        let details = report.display_group_details();
        assert!(details.contains("local:cryptocurrency"));
    }

    #[test]
    fn catalog_display_sorts_by_popularity_then_name() {
        let outcome = MergeOutcome {
            providers: vec![
                entry("c", "Zeta Bank", None),
                entry("a", "Alpha Bank", Some(2)),
                entry("b", "Beta Bank", Some(1)),
                entry("d", "Acme Bank", None),
            ],
            failures: vec![SourceFailure {
                source: "eu".to_string(),
                message: "timeout".to_string(),
            }],
            data_errors: vec![DataError {
                source: "uae".to_string(),
                detail: "missing id".to_string(),
            }],
        };
        let rendered = display_provider_catalog(&outcome);
        let beta = rendered.find("Beta Bank").unwrap();
        let alpha = rendered.find("Alpha Bank").unwrap();
        let acme = rendered.find("Acme Bank").unwrap();
        let zeta = rendered.find("Zeta Bank").unwrap();
        assert!(beta < alpha && alpha < acme && acme < zeta);
        assert!(rendered.contains("Some sources were unavailable: eu"));
        assert!(rendered.contains("1 record(s) dropped"));
    }
}
