//! Expense and income entries (`/egreso_ingreso/`).

use tracing::instrument;

use super::ApiClient;
use crate::api::ApiError;
use crate::api::types::common::ListResponse;
use crate::api::types::{Entry, NewEntry};

const EXPENSES: &str = "egreso_ingreso/egresos/";
const INCOMES: &str = "egreso_ingreso/ingresos/";

impl ApiClient {
    /// Recorded expenses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_expenses(&self) -> Result<Vec<Entry>, ApiError> {
        let list: ListResponse<Entry> = self.get_json(EXPENSES, &[]).await?;
        Ok(list.into())
    }

    /// Record an expense.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, entry), fields(monto = %entry.monto))]
    pub async fn create_expense(&self, entry: &NewEntry) -> Result<Entry, ApiError> {
        self.post_json(EXPENSES, entry).await
    }

    /// Recorded incomes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_incomes(&self) -> Result<Vec<Entry>, ApiError> {
        let list: ListResponse<Entry> = self.get_json(INCOMES, &[]).await?;
        Ok(list.into())
    }

    /// Record an income.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, entry), fields(monto = %entry.monto))]
    pub async fn create_income(&self, entry: &NewEntry) -> Result<Entry, ApiError> {
        self.post_json(INCOMES, entry).await
    }
}
