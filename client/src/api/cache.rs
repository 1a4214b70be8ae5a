//! Per-account ABI and contract caches.
//!
//! Both maps are concurrent so that the ABI lookups of one transaction can
//! run in parallel. Concurrent misses on the same account may fetch twice;
//! the last writer wins and both results are identical.

use std::sync::Arc;

use dashmap::DashMap;

use antelope_abi::{Abi, Contract};

/// A fetched ABI in both forms: the bytes go to signers, the parsed form
/// builds contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAbi {
    pub raw_abi: Vec<u8>,
    pub abi: Abi,
}

#[derive(Debug, Default)]
pub struct AbiCache {
    abis: DashMap<String, Arc<CachedAbi>>,
    contracts: DashMap<String, Arc<Contract>>,
}

impl AbiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abi(&self, account: &str) -> Option<Arc<CachedAbi>> {
        self.abis.get(account).map(|entry| Arc::clone(entry.value()))
    }

    /// Stores a freshly fetched ABI. Any contract built from the previous
    /// ABI for this account is dropped.
    pub fn insert_abi(&self, account: &str, abi: CachedAbi) -> Arc<CachedAbi> {
        let abi = Arc::new(abi);
        self.abis.insert(account.to_string(), Arc::clone(&abi));
        self.contracts.remove(account);
        abi
    }

    pub fn contract(&self, account: &str) -> Option<Arc<Contract>> {
        self.contracts
            .get(account)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert_contract(&self, account: &str, contract: Contract) -> Arc<Contract> {
        let contract = Arc::new(contract);
        self.contracts
            .insert(account.to_string(), Arc::clone(&contract));
        contract
    }

    /// Number of accounts with a cached ABI.
    pub fn len(&self) -> usize {
        self.abis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abis.is_empty()
    }

    pub fn clear(&self) {
        self.abis.clear();
        self.contracts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(version: &str) -> CachedAbi {
        CachedAbi {
            raw_abi: vec![1, 2, 3],
            abi: Abi {
                version: version.into(),
                ..Abi::default()
            },
        }
    }

    #[test]
    fn abi_round_trips_through_cache() {
        let cache = AbiCache::new();
        assert!(cache.is_empty());
        cache.insert_abi("eosio.token", cached("eosio::abi/1.1"));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.abi("eosio.token").unwrap().abi.version,
            "eosio::abi/1.1"
        );
        assert!(cache.abi("eosio").is_none());
    }

    #[test]
    fn new_abi_invalidates_contract() {
        let cache = AbiCache::new();
        let contract = Contract::from_abi(&cached("eosio::abi/1.1").abi).unwrap();
        cache.insert_contract("eosio.token", contract);
        assert!(cache.contract("eosio.token").is_some());

        cache.insert_abi("eosio.token", cached("eosio::abi/1.2"));
        assert!(cache.contract("eosio.token").is_none());
    }

    #[test]
    fn clear_empties_both_maps() {
        let cache = AbiCache::new();
        cache.insert_abi("a", cached("eosio::abi/1.0"));
        cache.insert_contract("a", Contract::from_abi(&Abi::default()).unwrap());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.contract("a").is_none());
    }
}
