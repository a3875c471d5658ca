//! The in-memory directory of registered accounts.

use crate::account::Account;
use crate::model::Test;

/// Position of an account inside a [`Directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(usize);

/// All known accounts, searched linearly in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    accounts: Vec<Account>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three built-in accounts: admin1, teacher1, student1.
    pub fn seeded() -> Self {
        Self {
            accounts: vec![
                Account::administrator("admin1", "adminpass"),
                Account::teacher("teacher1", "teacherpass"),
                Account::student("student1", "studentpass"),
            ],
        }
    }

    /// First account whose username and password both match exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<AccountId> {
        self.accounts
            .iter()
            .position(|a| a.matches(username, password))
            .map(AccountId)
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id.0)
    }

    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id.0)
    }

    /// Append an account. Usernames are not checked for uniqueness.
    pub fn insert(&mut self, account: Account) -> AccountId {
        self.accounts.push(account);
        AccountId(self.accounts.len() - 1)
    }

    /// Remove the first account with this username.
    ///
    /// Ids handed out earlier may point at a different account afterwards.
    pub fn remove(&mut self, username: &str) -> Option<Account> {
        let idx = self
            .accounts
            .iter()
            .position(|a| a.username() == username)?;
        Some(self.accounts.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Every teacher's tests, teachers in directory order.
    pub fn published_tests(&self) -> Vec<&Test> {
        self.accounts
            .iter()
            .filter_map(Account::as_teacher)
            .flat_map(|t| t.tests())
            .collect()
    }
}
