use tracing::{info, warn};

use super::FlowError;
use crate::api::ApiClient;
use crate::models::{Transaction, User};
use crate::validation::TransactionForm;

const CREATE_FAILED: &str = "Could not create transaction. Please try again.";
const REMOVE_FAILED: &str = "Could not remove the transaction.";

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeData {
    pub user: User,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
}

/// Load the user and the transaction list concurrently.
///
/// A 401 from either request ends the session. Any other failure degrades
/// that half of the screen: an empty user (zero balance) or an empty list.
pub async fn load_home(api: &ApiClient) -> Result<HomeData, FlowError> {
    let (user_res, transactions_res) = tokio::join!(api.fetch_user(), api.fetch_transactions());

    let user = match user_res {
        Ok(user) => user,
        Err(e) if e.is_unauthorized() => return Err(FlowError::SessionExpired(e)),
        Err(e) => {
            warn!(error = %e, "Failed to load user data, showing defaults");
            User::default()
        }
    };

    let transactions = match transactions_res {
        Ok(transactions) => transactions,
        Err(e) if e.is_unauthorized() => return Err(FlowError::SessionExpired(e)),
        Err(e) => {
            warn!(error = %e, "Failed to load transactions, showing none");
            Vec::new()
        }
    };

    Ok(HomeData {
        balance: user.balance(),
        user,
        transactions,
    })
}

/// Validate the form and create the transaction.
pub async fn create_transaction(api: &ApiClient, form: &TransactionForm) -> Result<Option<Transaction>, FlowError> {
    let new_transaction = form.validate()?;
    let created = api
        .create_transaction(&new_transaction)
        .await
        .map_err(|e| FlowError::authenticated(e, CREATE_FAILED))?;
    info!(kind = %new_transaction.kind, amount = new_transaction.amount, "Transaction created");
    Ok(created)
}

pub async fn remove_transaction(api: &ApiClient, id: i64) -> Result<(), FlowError> {
    api.delete_transaction(id)
        .await
        .map_err(|e| FlowError::authenticated(e, REMOVE_FAILED))?;
    info!(id, "Transaction removed");
    Ok(())
}
