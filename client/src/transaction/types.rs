//! Transaction and action shapes.
//!
//! [`Transaction`] is what callers build; its TAPOS fields are optional
//! until the controller derives or checks them. [`SerializedAction`] is an
//! action whose data has already been encoded with the contract's ABI,
//! which is the form the `transaction` struct carries on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::tapos::TransactionHeader;

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// `actor@permission`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

impl PermissionLevel {
    pub fn new(actor: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            permission: permission.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A contract call with structured data.
///
/// `data` is normally a JSON object encoded through the contract's ABI.
/// A JSON string is taken as data that is already hex-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub account: String,
    pub name: String,
    #[serde(default)]
    pub authorization: Vec<PermissionLevel>,
    #[serde(default)]
    pub data: Value,
}

impl Action {
    pub fn new(account: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            name: name.into(),
            authorization: Vec::new(),
            data: Value::Object(Default::default()),
        }
    }

    pub fn authorization(mut self, actor: impl Into<String>, permission: impl Into<String>) -> Self {
        self.authorization.push(PermissionLevel::new(actor, permission));
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// A contract call whose data is ABI-encoded, as uppercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedAction {
    pub account: String,
    pub name: String,
    #[serde(default)]
    pub authorization: Vec<PermissionLevel>,
    pub data: String,
}

/// An entry of `transaction_extensions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(rename = "type")]
    pub ty: u16,
    /// Hex-encoded payload.
    pub data: String,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction as assembled by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_num: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_prefix: Option<u32>,
    #[serde(default)]
    pub max_net_usage_words: u32,
    #[serde(default)]
    pub max_cpu_usage_ms: u8,
    #[serde(default)]
    pub delay_sec: u32,
    #[serde(default)]
    pub context_free_actions: Vec<Action>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub transaction_extensions: Vec<Extension>,
    /// Context-free data blobs, serialized separately from the transaction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_free_data: Vec<Vec<u8>>,
}

impl Transaction {
    /// Expiration, reference block number and prefix are all present.
    pub fn has_tapos(&self) -> bool {
        self.expiration.as_deref().is_some_and(|e| !e.is_empty())
            && self.ref_block_num.is_some()
            && self.ref_block_prefix.is_some()
    }

    /// Fills missing TAPOS fields from a derived header. Fields the caller
    /// set explicitly win.
    pub fn with_header(mut self, header: &TransactionHeader) -> Self {
        if self.expiration.as_deref().map_or(true, str::is_empty) {
            self.expiration = Some(header.expiration.clone());
        }
        self.ref_block_num.get_or_insert(header.ref_block_num);
        self.ref_block_prefix.get_or_insert(header.ref_block_prefix);
        self
    }

    /// Distinct contract accounts, context-free actions first, in order of
    /// first appearance.
    pub fn accounts(&self) -> Vec<&str> {
        let mut accounts: Vec<&str> = Vec::new();
        for action in self.context_free_actions.iter().chain(&self.actions) {
            if !accounts.contains(&action.account.as_str()) {
                accounts.push(&action.account);
            }
        }
        accounts
    }

    /// The `transaction` struct value with the given encoded actions in
    /// place of the structured ones.
    pub fn to_serialized_value(
        &self,
        context_free_actions: &[SerializedAction],
        actions: &[SerializedAction],
    ) -> Value {
        json!({
            "expiration": self.expiration,
            "ref_block_num": self.ref_block_num,
            "ref_block_prefix": self.ref_block_prefix,
            "max_net_usage_words": self.max_net_usage_words,
            "max_cpu_usage_ms": self.max_cpu_usage_ms,
            "delay_sec": self.delay_sec,
            "context_free_actions": context_free_actions,
            "actions": actions,
            "transaction_extensions": self.transaction_extensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> TransactionHeader {
        TransactionHeader {
            expiration: "2026-10-18T12:00:30.000".into(),
            ref_block_num: 7,
            ref_block_prefix: 99,
        }
    }

    #[test]
    fn test_has_tapos() {
        let mut trx = Transaction::default();
        assert!(!trx.has_tapos());
        trx.expiration = Some(String::new());
        trx.ref_block_num = Some(0);
        trx.ref_block_prefix = Some(0);
        assert!(!trx.has_tapos());
        trx.expiration = Some("2026-10-18T12:00:30".into());
        assert!(trx.has_tapos());
    }

    #[test]
    fn test_header_fills_only_missing_fields() {
        let trx = Transaction {
            ref_block_prefix: Some(1234),
            ..Transaction::default()
        }
        .with_header(&header());
        assert_eq!(trx.expiration.as_deref(), Some("2026-10-18T12:00:30.000"));
        assert_eq!(trx.ref_block_num, Some(7));
        assert_eq!(trx.ref_block_prefix, Some(1234));
    }

    #[test]
    fn test_accounts_are_deduplicated_in_order() {
        let trx = Transaction {
            context_free_actions: vec![Action::new("cfa.contract", "noop")],
            actions: vec![
                Action::new("eosio.token", "transfer"),
                Action::new("cfa.contract", "log"),
                Action::new("eosio.token", "transfer"),
            ],
            ..Transaction::default()
        };
        assert_eq!(trx.accounts(), vec!["cfa.contract", "eosio.token"]);
    }

    #[test]
    fn test_serialized_value_shape() {
        let trx = Transaction::default().with_header(&header());
        let action = SerializedAction {
            account: "eosio.token".into(),
            name: "transfer".into(),
            authorization: vec![PermissionLevel::new("alice", "active")],
            data: "00".into(),
        };
        let value = trx.to_serialized_value(&[], &[action]);
        assert_eq!(value["ref_block_num"], json!(7));
        assert_eq!(value["actions"][0]["authorization"][0]["actor"], json!("alice"));
        assert_eq!(value["context_free_actions"], json!([]));
    }

    #[test]
    fn test_action_builder() {
        let action = Action::new("eosio.token", "transfer")
            .authorization("alice", "active")
            .data(json!({ "memo": "hi" }));
        assert_eq!(action.authorization, vec![PermissionLevel::new("alice", "active")]);
        assert_eq!(action.data["memo"], "hi");
    }
}
