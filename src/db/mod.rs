use std::sync::RwLock;

use rand::Rng;

use crate::auth::normalize_email;
use crate::error::{ AppError, Result };

pub mod models;
pub use models::*;

pub const DEFAULT_AGENCY: &str = "0001";

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    session_email: Option<String>,
}

/// In-memory store backing the mock REST surface. Four logical collections
/// (users, accounts, transactions, session marker) behind one lock so every
/// operation is a single read-modify-write.
pub struct Store {
    inner: RwLock<Collections>,
    opening_balance: f64,
}

fn next_id<T>(list: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    list.iter().map(id_of).max().unwrap_or(0) + 1
}

impl Store {
    pub fn new(opening_balance: f64) -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
            opening_balance,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn reset(&self) {
        *self.write() = Collections::default();
    }

    /// Seeds the demo user used by the front-end and the API tests.
    pub fn seed_demo(&self) -> User {
        let user = match self.find_user_by_email("diego@teste.com") {
            Some(user) => user,
            None =>
                self.create_user(
                    "Diego".to_string(),
                    "diego@teste.com".to_string(),
                    "123456".to_string()
                ),
        };
        self.ensure_account(user.id);
        user
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let wanted = normalize_email(email);
        self.read()
            .users.iter()
            .find(|u| normalize_email(&u.email) == wanted)
            .cloned()
    }

    pub fn create_user(&self, name: String, email: String, password: String) -> User {
        let mut inner = self.write();
        let user = User {
            id: next_id(&inner.users, |u| u.id),
            name,
            email: normalize_email(&email),
            password,
        };
        inner.users.push(user.clone());
        user
    }

    pub fn accounts_for_user(&self, user_id: i64) -> Vec<Account> {
        self.read()
            .accounts.iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn find_account(&self, id: i64) -> Option<Account> {
        self.read()
            .accounts.iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Finds or creates the user's account inside an already-held write
    /// lock. Account numbers are random and not checked for collisions,
    /// which is acceptable for the demo.
    fn ensure_account_slot(
        inner: &mut Collections,
        user_id: i64,
        opening_balance: f64
    ) -> &mut Account {
        if let Some(idx) = inner.accounts.iter().position(|a| a.user_id == user_id) {
            return &mut inner.accounts[idx];
        }
        let account = Account {
            id: next_id(&inner.accounts, |a| a.id),
            user_id,
            agency: DEFAULT_AGENCY.to_string(),
            number: rand::rng().random_range(100_000..=999_999).to_string(),
            balance: opening_balance,
        };
        inner.accounts.push(account);
        inner.accounts.last_mut().unwrap()
    }

    /// Returns the user's account, creating it with the opening balance on
    /// first access.
    pub fn ensure_account(&self, user_id: i64) -> Account {
        let mut inner = self.write();
        Self::ensure_account_slot(&mut inner, user_id, self.opening_balance).clone()
    }

    pub fn patch_account(&self, id: i64, patch: AccountPatch) -> Result<Account> {
        let mut inner = self.write();
        let acc = inner.accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::AccountNotFound)?;

        if let Some(agency) = patch.agency {
            acc.agency = agency;
        }
        if let Some(number) = patch.number {
            acc.number = number;
        }
        if let Some(balance) = patch.balance {
            acc.balance = balance;
        }

        Ok(acc.clone())
    }

    pub fn transactions_for_user(&self, user_id: i64) -> Vec<Transaction> {
        self.read()
            .transactions.iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Applies a transaction to the user's account in one critical section:
    /// the account balance is bumped by the signed amount and the ledger
    /// entry records the resulting balance. No insufficient-funds check.
    pub fn create_transaction(&self, user_id: i64, new_tx: NewTransaction) -> Transaction {
        let mut inner = self.write();

        let acc = Self::ensure_account_slot(&mut inner, user_id, self.opening_balance);
        acc.balance += new_tx.amount;
        let balance_after = acc.balance;

        let id = next_id(&inner.transactions, |t| t.id);

        let tx = Transaction {
            id,
            user_id,
            tx_type: new_tx.tx_type,
            beneficiary: new_tx.beneficiary,
            document: new_tx.document,
            bank: new_tx.bank,
            agency: new_tx.agency,
            account: new_tx.account,
            pix_key: new_tx.pix_key,
            amount: new_tx.amount,
            date: new_tx.date,
            balance_after,
        };
        // Newest first, mirroring the statement's default presentation.
        inner.transactions.insert(0, tx.clone());
        tx
    }

    pub fn session_email(&self) -> Option<String> {
        self.read().session_email.clone()
    }

    pub fn set_session_email(&self, email: Option<String>) {
        self.write().session_email = email;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tx(amount: f64, date: &str) -> NewTransaction {
        NewTransaction {
            tx_type: TxType::Pix,
            beneficiary: "Maria".to_string(),
            document: "123.456.789-00".to_string(),
            bank: None,
            agency: None,
            account: None,
            pix_key: Some("maria@pix.com".to_string()),
            amount,
            date: date.to_string(),
        }
    }

    #[test]
    fn test_sequential_ids() {
        let store = Store::new(1000.0);
        let a = store.create_user("A".into(), "a@x.com".into(), "1".into());
        let b = store.create_user("B".into(), "b@x.com".into(), "2".into());
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn test_email_lookup_is_case_insensitive() {
        let store = Store::new(1000.0);
        store.create_user("A".into(), "  Diego@Teste.com ".into(), "1".into());
        let found = store.find_user_by_email("diego@teste.com").unwrap();
        assert_eq!(found.email, "diego@teste.com");
    }

    #[test]
    fn test_ensure_account_is_idempotent() {
        let store = Store::new(1000.0);
        let user = store.create_user("A".into(), "a@x.com".into(), "1".into());
        let first = store.ensure_account(user.id);
        let second = store.ensure_account(user.id);
        assert_eq!(first.id, second.id);
        assert_eq!(first.balance, 1000.0);
        assert_eq!(first.agency, DEFAULT_AGENCY);
        assert_eq!(store.accounts_for_user(user.id).len(), 1);
    }

    #[test]
    fn test_transaction_updates_balance_and_snapshot() {
        let store = Store::new(1000.0);
        let user = store.create_user("A".into(), "a@x.com".into(), "1".into());
        store.ensure_account(user.id);

        let tx = store.create_transaction(user.id, new_tx(-250.0, "2025-08-20"));
        assert_eq!(tx.balance_after, 750.0);
        assert_eq!(store.accounts_for_user(user.id)[0].balance, 750.0);

        // Debits may overdraw: no insufficient-funds check.
        let tx = store.create_transaction(user.id, new_tx(-5000.0, "2025-08-21"));
        assert_eq!(tx.balance_after, -4250.0);
    }

    #[test]
    fn test_transactions_stored_newest_first() {
        let store = Store::new(1000.0);
        let user = store.create_user("A".into(), "a@x.com".into(), "1".into());
        store.ensure_account(user.id);
        store.create_transaction(user.id, new_tx(1.0, "2025-08-20"));
        store.create_transaction(user.id, new_tx(2.0, "2025-08-21"));

        let txs = store.transactions_for_user(user.id);
        assert_eq!(txs[0].amount, 2.0);
        assert_eq!(txs[1].amount, 1.0);
    }

    #[test]
    fn test_reset_and_seed() {
        let store = Store::new(1000.0);
        let diego = store.seed_demo();
        assert_eq!(diego.email, "diego@teste.com");
        assert_eq!(store.accounts_for_user(diego.id).len(), 1);

        // Seeding twice must not duplicate the user.
        let again = store.seed_demo();
        assert_eq!(again.id, diego.id);

        store.reset();
        assert!(store.find_user_by_email("diego@teste.com").is_none());
    }
}
