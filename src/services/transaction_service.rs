use std::sync::Arc;

use crate::db::{ NewTransaction, Store, Transaction, User };
use crate::error::{ AppError, Result };

/// Server-side statement query: required owner, optional exact type match and
/// inclusive date lower bound, date ordering.
#[derive(Debug, Clone, Default)]
pub struct TxListParams {
    pub user_id: i64,
    pub tx_type: Option<String>,
    pub date_gte: Option<String>,
    pub ascending: bool,
}

pub struct TransactionService {
    store: Arc<Store>,
}

impl TransactionService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn list(&self, caller: &User, params: TxListParams) -> Result<Vec<Transaction>> {
        if caller.id != params.user_id {
            return Err(AppError::Forbidden);
        }

        let mut list = self.store.transactions_for_user(params.user_id);

        if let Some(tx_type) = &params.tx_type {
            list.retain(|t| t.tx_type.as_str() == tx_type);
        }
        // ISO dates compare correctly as strings.
        if let Some(gte) = &params.date_gte {
            if !gte.is_empty() {
                list.retain(|t| t.date.as_str() >= gte.as_str());
            }
        }

        // Stable sort: equal dates keep their stored order in both directions.
        if params.ascending {
            list.sort_by(|a, b| a.date.cmp(&b.date));
        } else {
            list.sort_by(|a, b| b.date.cmp(&a.date));
        }

        Ok(list)
    }

    /// Applies a balance-mutating ledger entry for the caller. Overdrafts are
    /// allowed: the demo intentionally has no insufficient-funds rule.
    pub fn create(&self, caller: &User, new_tx: NewTransaction) -> Result<Transaction> {
        if !new_tx.amount.is_finite() {
            return Err(AppError::InvalidInput("Valor inválido".to_string()));
        }

        let tx = self.store.create_transaction(caller.id, new_tx);

        tracing::info!(
            user_id = caller.id,
            tx_id = tx.id,
            amount = tx.amount,
            balance_after = tx.balance_after,
            "transaction created"
        );

        Ok(tx)
    }
}
