use anyhow::Result;

use super::decode;
use super::types::{Expense, ExpenseSummary, NewExpense};
use crate::credential::CredentialStore;
use crate::http::{RequestClient, RequestDescriptor, Transport};

fn plan_filter(travel_plan_id: Option<i64>) -> Vec<(&'static str, String)> {
    travel_plan_id
        .map(|id| vec![("travel_plan_id", id.to_string())])
        .unwrap_or_default()
}

impl<T: Transport, S: CredentialStore> RequestClient<T, S> {
    #[tracing::instrument(skip(self, expense), fields(category = %expense.category))]
    pub async fn create_expense(&self, expense: &NewExpense) -> Result<Expense> {
        decode(self.post("/expenses/", expense).await?, "expense")
    }

    /// Lists expenses, newest first, optionally only those of one plan.
    pub async fn expenses(&self, travel_plan_id: Option<i64>) -> Result<Vec<Expense>> {
        let descriptor = RequestDescriptor::get("/expenses/").with_query(plan_filter(travel_plan_id));
        decode(self.execute(&descriptor).await?, "expense list")
    }

    pub async fn expense_summary(&self, travel_plan_id: Option<i64>) -> Result<ExpenseSummary> {
        let descriptor =
            RequestDescriptor::get("/expenses/summary").with_query(plan_filter(travel_plan_id));
        decode(self.execute(&descriptor).await?, "expense summary")
    }

    pub async fn update_expense(&self, expense_id: i64, expense: &NewExpense) -> Result<Expense> {
        let path = format!("/expenses/{}", expense_id);
        decode(self.put(&path, expense).await?, "expense")
    }

    pub async fn delete_expense(&self, expense_id: i64) -> Result<()> {
        let path = format!("/expenses/{}", expense_id);
        self.delete(&path).await?;
        Ok(())
    }
}
