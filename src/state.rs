use crate::repository::Repository;
use crate::service::{AccountService, MessageService};

#[derive(Debug, Clone)]
#[must_use]
pub struct SharedState {
    pub accounts: AccountService,
    pub messages: MessageService,
}

impl SharedState {
    pub fn new(repository: Repository) -> Self {
        let Repository { accounts, messages } = repository;
        Self {
            messages: MessageService::new(messages, accounts.clone()),
            accounts: AccountService::new(accounts),
        }
    }
}
