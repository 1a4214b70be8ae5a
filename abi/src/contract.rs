//! Per-account contract schema: the account's type registry plus the
//! mapping from action name to the struct that carries its data.

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::error::{SerializeError, SerializeResult};
use crate::schema::Abi;
use crate::types::TypeRegistry;

/// Everything needed to (de)serialize one account's actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    types: TypeRegistry,
    actions: HashMap<String, String>,
}

impl Contract {
    /// Builds the schema from a parsed ABI. Every action type must resolve.
    pub fn from_abi(abi: &Abi) -> SerializeResult<Self> {
        let types = TypeRegistry::from_abi(abi)?;
        let mut actions = HashMap::with_capacity(abi.actions.len());
        for action in &abi.actions {
            types.check_type(&action.ty)?;
            actions.insert(action.name.clone(), action.ty.clone());
        }
        Ok(Self { types, actions })
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Struct type carrying `action`'s data, if the contract defines it.
    pub fn action_type(&self, action: &str) -> Option<&str> {
        self.actions.get(action).map(String::as_str)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    fn require_action(&self, account: &str, action: &str) -> SerializeResult<&str> {
        self.action_type(action)
            .ok_or_else(|| SerializeError::UnknownAction {
                account: account.to_string(),
                action: action.to_string(),
            })
    }

    /// Encodes an action's structured data.
    pub fn serialize_action_data(
        &self,
        account: &str,
        action: &str,
        data: &Value,
    ) -> SerializeResult<Vec<u8>> {
        let ty = self.require_action(account, action)?;
        trace!(account, action, ty, "serializing action data");
        self.types.encode(ty, data)
    }

    /// Decodes an action's binary data.
    pub fn deserialize_action_data(
        &self,
        account: &str,
        action: &str,
        data: &[u8],
    ) -> SerializeResult<Value> {
        let ty = self.require_action(account, action)?;
        self.types.decode(ty, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AbiAction, AbiField, AbiStruct};
    use serde_json::json;

    fn token_contract() -> Contract {
        let abi = Abi {
            version: "eosio::abi/1.1".into(),
            structs: vec![AbiStruct {
                name: "transfer".into(),
                base: String::new(),
                fields: [
                    ("from", "name"),
                    ("to", "name"),
                    ("quantity", "asset"),
                    ("memo", "string"),
                ]
                .iter()
                .map(|(n, t)| AbiField {
                    name: (*n).into(),
                    ty: (*t).into(),
                })
                .collect(),
            }],
            actions: vec![AbiAction {
                name: "transfer".into(),
                ty: "transfer".into(),
                ricardian_contract: String::new(),
            }],
            ..Abi::default()
        };
        Contract::from_abi(&abi).unwrap()
    }

    #[test]
    fn test_action_lookup() {
        let contract = token_contract();
        assert_eq!(contract.action_type("transfer"), Some("transfer"));
        assert_eq!(contract.action_type("issue"), None);
        assert_eq!(contract.action_names().collect::<Vec<_>>(), vec!["transfer"]);
    }

    #[test]
    fn test_action_data_round_trip() {
        let contract = token_contract();
        let data = json!({
            "from": "alice",
            "to": "bob",
            "quantity": "1.0000 SYS",
            "memo": "thanks",
        });
        let bytes = contract
            .serialize_action_data("eosio.token", "transfer", &data)
            .unwrap();
        assert_eq!(bytes.len(), 8 + 8 + 16 + 1 + 6);
        let decoded = contract
            .deserialize_action_data("eosio.token", "transfer", &bytes)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_unknown_action() {
        let contract = token_contract();
        let err = contract
            .serialize_action_data("eosio.token", "burn", &json!({}))
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::UnknownAction {
                account: "eosio.token".into(),
                action: "burn".into()
            }
        );
    }

    #[test]
    fn test_unresolvable_action_type() {
        let abi = Abi {
            actions: vec![AbiAction {
                name: "ghost".into(),
                ty: "nothing".into(),
                ricardian_contract: String::new(),
            }],
            ..Abi::default()
        };
        assert_eq!(
            Contract::from_abi(&abi).unwrap_err(),
            SerializeError::UnknownType("nothing".into())
        );
    }
}
