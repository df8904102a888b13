use std::sync::Arc;

use crate::db::{ Account, AccountPatch, Store, User };
use crate::error::{ AppError, Result };

pub struct AccountService {
    store: Arc<Store>,
}

impl AccountService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// The caller's account, lazily created on first access.
    pub fn my_account(&self, caller: &User) -> Account {
        self.store.ensure_account(caller.id)
    }

    pub fn list_for_user(&self, caller: &User, user_id: i64) -> Result<Vec<Account>> {
        if caller.id != user_id {
            return Err(AppError::Forbidden);
        }

        Ok(self.store.accounts_for_user(user_id))
    }

    pub fn patch(&self, caller: &User, account_id: i64, patch: AccountPatch) -> Result<Account> {
        // Missing id reads as 404 before the ownership check.
        let account = self.store.find_account(account_id).ok_or(AppError::AccountNotFound)?;
        if account.user_id != caller.id {
            return Err(AppError::Forbidden);
        }

        self.store.patch_account(account_id, patch)
    }
}
