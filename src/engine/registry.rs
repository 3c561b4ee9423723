use crate::engine::Account;

/// Position of an account in the registry, stable for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAttribute {
    Number,
    RoutingCode,
    TaxCode,
}

impl AccountAttribute {
    fn value_of<'a>(&self, account: &'a Account) -> &'a str {
        match self {
            AccountAttribute::Number => account.number(),
            AccountAttribute::RoutingCode => account.bik(),
            AccountAttribute::TaxCode => account.kpp(),
        }
    }
}

/// Every account opened during the process, in opening order. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        AccountRegistry {
            accounts: Vec::new(),
        }
    }

    /// Duplicate account numbers are accepted.
    pub fn register(&mut self, account: Account) -> AccountId {
        self.accounts.push(account);
        AccountId(self.accounts.len() - 1)
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id.0)
    }

    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Open and closed accounts whose `attribute` equals `value`, ignoring case.
    pub fn find_by_attribute<'a>(
        &'a self,
        attribute: AccountAttribute,
        value: &str,
    ) -> impl Iterator<Item = &'a Account> + use<'a> {
        let needle = value.to_lowercase();
        self.accounts
            .iter()
            .filter(move |account| attribute.value_of(account).to_lowercase() == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AccountRegistry {
        let mut registry = AccountRegistry::new();
        registry.register(Account::open("40201810000000000001", "044525225", "770701001"));
        registry.register(Account::open("ABC-1", "044525999", "770701001"));
        registry.register(Account::open("abc-1", "044525225", "500100732"));
        registry
    }

    fn numbers<'a>(found: impl Iterator<Item = &'a Account>) -> Vec<&'a str> {
        found.map(Account::number).collect()
    }

    #[test]
    fn test_register_returns_sequential_ids() {
        let mut registry = AccountRegistry::new();
        assert!(registry.is_empty());

        let first = registry.register(Account::open("1", "", ""));
        let second = registry.register(Account::open("1", "", ""));

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(first).map(Account::number), Some("1"));
        assert_eq!(registry.get(second).map(Account::number), Some("1"));
    }

    #[test]
    fn test_find_is_case_insensitive_and_ordered() {
        let registry = registry();

        assert_eq!(
            numbers(registry.find_by_attribute(AccountAttribute::Number, "Abc-1")),
            ["ABC-1", "abc-1"]
        );
        assert_eq!(
            numbers(registry.find_by_attribute(AccountAttribute::RoutingCode, "044525225")),
            ["40201810000000000001", "abc-1"]
        );
        assert_eq!(
            numbers(registry.find_by_attribute(AccountAttribute::TaxCode, "770701001")),
            ["40201810000000000001", "ABC-1"]
        );
    }

    #[test]
    fn test_find_is_exact_match() {
        let registry = registry();

        assert_eq!(registry.find_by_attribute(AccountAttribute::Number, "abc").count(), 0);
        assert_eq!(registry.find_by_attribute(AccountAttribute::TaxCode, "nothing").count(), 0);
    }

    #[test]
    fn test_find_includes_closed_accounts() {
        let mut registry = registry();
        let id = registry.register(Account::open("closed-1", "", ""));
        registry.get_mut(id).unwrap().close().unwrap();

        let found: Vec<_> = registry.find_by_attribute(AccountAttribute::Number, "CLOSED-1").collect();
        assert_eq!(found.len(), 1);
        assert!(!found[0].is_open());
    }
}
