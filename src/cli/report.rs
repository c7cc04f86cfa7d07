use super::{contribute, drift, ui};
use crate::core::category::AssetCategory;
use crate::core::config::EngineSettings;
use crate::core::contribution::ContributionPlan;
use crate::core::market::EconomicIndicators;
use crate::core::rebalance::DriftEntry;
use crate::core::valuation::PortfolioSnapshot;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use console::style;

/// Renders the full daily report: summary, per-category holdings, drift
/// table and the contribution suggestion.
pub fn run(
    today: NaiveDate,
    snapshot: &PortfolioSnapshot,
    variation_pct: f64,
    indicators: &EconomicIndicators,
    drift_entries: &[DriftEntry],
    contribution_amount: f64,
    plan: &ContributionPlan,
    settings: &EngineSettings,
) -> Result<()> {
    let home = &settings.home_currency;

    println!(
        "\n{}",
        ui::style_text(
            &format!("Daily Portfolio Report - {today}"),
            ui::StyleType::Title
        )
    );

    let variation = if variation_pct >= 0.0 {
        style(format!("{variation_pct:+.2}%")).green()
    } else {
        style(format!("{variation_pct:+.2}%")).red()
    };
    println!(
        "\nTotal Value ({}): {}   ({} vs previous day)",
        ui::style_text(home, ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.2}", snapshot.total_value), ui::StyleType::TotalValue),
        variation
    );
    println!(
        "{}",
        ui::style_text(
            &format!(
                "Policy rate {:.2}% | Interbank {:.2}% | FX reference {:.4}",
                indicators.policy_rate_pct,
                indicators.interbank_rate_pct,
                indicators.fx_reference_rate
            ),
            ui::StyleType::Subtle
        )
    );

    // Categories appear in the order holdings declare them.
    let mut categories: Vec<AssetCategory> = Vec::new();
    for holding in &snapshot.holdings {
        if !categories.contains(&holding.category) {
            categories.push(holding.category);
        }
    }

    for category in categories {
        println!(
            "\n{}",
            ui::style_text(category.label(), ui::StyleType::Title)
        );

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Asset"),
            ui::header_cell("Qty"),
            ui::header_cell("Price"),
            ui::header_cell(&format!("Value ({home})")),
            ui::header_cell("Weight"),
            ui::header_cell("1D"),
            ui::header_cell("12M"),
            ui::header_cell("P/L"),
        ]);

        for holding in snapshot.holdings.iter().filter(|h| h.category == category) {
            let name = if holding.name == holding.ticker {
                holding.ticker.clone()
            } else {
                format!("{} ({})", holding.name, holding.ticker)
            };
            table.add_row(vec![
                Cell::new(name),
                ui::money_cell(holding.quantity),
                ui::money_cell(holding.price),
                ui::money_cell(holding.value),
                ui::pct_cell(holding.allocation_pct),
                ui::change_cell(holding.change_1d_pct),
                ui::change_cell(holding.change_12m_pct),
                ui::change_cell(holding.profit_loss_pct),
            ]);
        }
        println!("{table}");
    }

    ui::print_separator();
    println!(
        "\n{}\n",
        ui::style_text("Allocation vs Target", ui::StyleType::Title)
    );
    println!("{}", drift::drift_table(drift_entries));

    println!(
        "\n{}\n",
        ui::style_text(
            &format!("Contribution Suggestion ({contribution_amount:.2})"),
            ui::StyleType::Title
        )
    );
    contribute::render(plan);

    Ok(())
}
