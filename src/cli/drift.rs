use super::ui;
use crate::core::rebalance::{DriftEntry, DriftStatus};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color, Table};

pub fn run(drift: &[DriftEntry]) -> Result<()> {
    println!(
        "\n{}\n",
        ui::style_text("Allocation vs Target", ui::StyleType::Title)
    );
    println!("{}", drift_table(drift));
    Ok(())
}

pub(crate) fn drift_table(drift: &[DriftEntry]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Current"),
        ui::header_cell("Target"),
        ui::header_cell("Diff"),
        ui::header_cell("Status"),
    ]);

    for entry in drift {
        table.add_row(vec![
            Cell::new(&entry.category),
            ui::pct_cell(entry.current_pct),
            ui::pct_cell(entry.target_pct),
            Cell::new(format!("{:+.1}", entry.diff)).set_alignment(CellAlignment::Right),
            status_cell(entry.status),
        ]);
    }
    table
}

fn status_cell(status: DriftStatus) -> Cell {
    let color = match status {
        DriftStatus::Buy => Color::Green,
        DriftStatus::Sell => Color::Red,
        DriftStatus::Ok => Color::DarkGrey,
    };
    Cell::new(status.to_string()).fg(color)
}
