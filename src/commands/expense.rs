use anyhow::{Context, Result};

use crate::{
    api::{Expense, ExpenseSummary, NewExpense},
    credential::CredentialStore,
    http::{RequestClient, Transport},
    runtime::Runtime,
};

fn expense_line(expense: &Expense) -> String {
    let mut line = format!(
        "#{} {} {:.2} on {}",
        expense.id, expense.category, expense.amount, expense.expense_date
    );
    if let Some(description) = expense.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!(" - {}", description));
    }
    line
}

fn summary_lines(summary: &ExpenseSummary) -> Vec<String> {
    let mut lines = vec![format!("Total: {:.2}", summary.total)];
    for (category, amount) in &summary.by_category {
        lines.push(format!("  {}: {:.2}", category, amount));
    }
    if let (Some(budget), Some(remaining)) = (summary.budget, summary.remaining) {
        lines.push(format!("Budget: {:.2} (remaining {:.2})", budget, remaining));
    }
    if let Some(usage) = summary.usage_percentage {
        lines.push(format!("Used: {:.1}%", usage));
    }
    lines
}

#[tracing::instrument(skip(client, expense), fields(category = %expense.category))]
pub async fn add<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    expense: &NewExpense,
) -> Result<()> {
    let created = client.create_expense(expense).await?;
    println!("Recorded {}", expense_line(&created));
    Ok(())
}

pub async fn list<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    travel_plan_id: Option<i64>,
) -> Result<()> {
    let expenses = client.expenses(travel_plan_id).await?;
    if expenses.is_empty() {
        println!("No expenses.");
        return Ok(());
    }
    for expense in &expenses {
        println!("{}", expense_line(expense));
    }
    Ok(())
}

pub async fn summary<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    travel_plan_id: Option<i64>,
) -> Result<()> {
    let summary = client.expense_summary(travel_plan_id).await?;
    for line in summary_lines(&summary) {
        println!("{}", line);
    }
    if let Some(analysis) = &summary.ai_analysis {
        let text = match analysis.as_str() {
            Some(text) => text.to_string(),
            None => serde_json::to_string_pretty(analysis).context("Failed to format analysis")?,
        };
        println!("{}", text);
    }
    Ok(())
}

pub async fn update<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    expense_id: i64,
    expense: &NewExpense,
) -> Result<()> {
    let updated = client.update_expense(expense_id, expense).await?;
    println!("Updated {}", expense_line(&updated));
    Ok(())
}

/// Delete an expense, asking first unless `yes` is set
#[tracing::instrument(skip(runtime, client))]
pub async fn delete<R: Runtime, T: Transport, S: CredentialStore>(
    runtime: &R,
    client: &RequestClient<T, S>,
    expense_id: i64,
    yes: bool,
) -> Result<()> {
    if !yes && !runtime.confirm(&format!("Delete expense #{}?", expense_id))? {
        println!("Deletion cancelled.");
        return Ok(());
    }
    client.delete_expense(expense_id).await?;
    println!("Deleted expense #{}", expense_id);
    Ok(())
}
