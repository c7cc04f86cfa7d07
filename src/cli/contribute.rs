use super::ui;
use crate::core::contribution::ContributionPlan;
use anyhow::Result;
use comfy_table::Cell;

pub fn run(amount: f64, plan: &ContributionPlan) -> Result<()> {
    println!(
        "\n{}\n",
        ui::style_text(
            &format!("Contribution Suggestion ({amount:.2})"),
            ui::StyleType::Title
        )
    );
    render(plan);
    Ok(())
}

pub(crate) fn render(plan: &ContributionPlan) {
    match plan {
        ContributionPlan::Balanced => {
            println!("No specific suggestion (allocation is balanced).");
        }
        ContributionPlan::Suggestions(slices) => {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Category"),
                ui::header_cell("Suggested Amount"),
            ]);
            for slice in slices {
                table.add_row(vec![
                    Cell::new(&slice.category),
                    ui::money_cell(slice.amount),
                ]);
            }
            println!("{table}");
        }
    }
}
