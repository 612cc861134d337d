//! Contract action descriptors.

use crate::abi::{self, AbiDecode, AbiEncode, Decoder, Encoder};
use crate::name::Name;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tokend_error::Result;

/// An `actor@permission` pair authorizing an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    /// Account granting the authorization
    pub actor: Name,
    /// Permission of that account, e.g. `active`
    pub permission: Name,
}

impl PermissionLevel {
    /// Creates a permission level
    pub fn new(actor: Name, permission: Name) -> Self {
        Self { actor, permission }
    }

    /// `............1@............2`, resolved by the signer later
    pub fn placeholder() -> Self {
        Self {
            actor: Name::from_raw(1),
            permission: Name::from_raw(2),
        }
    }

    /// True for the placeholder authorization
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

impl AbiEncode for PermissionLevel {
    fn abi_encode(&self, encoder: &mut Encoder) {
        self.actor.abi_encode(encoder);
        self.permission.abi_encode(encoder);
    }
}

impl AbiDecode for PermissionLevel {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            actor: Name::abi_decode(decoder)?,
            permission: Name::abi_decode(decoder)?,
        })
    }
}

/// Options for building an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOptions {
    /// Authorizations to attach; empty means the placeholder
    pub authorization: Vec<PermissionLevel>,
}

impl ActionOptions {
    /// Adds an authorization
    pub fn authorize(mut self, level: PermissionLevel) -> Self {
        self.authorization.push(level);
        self
    }

    /// The authorizations to use, substituting the placeholder when empty
    pub fn resolved_authorization(&self) -> Vec<PermissionLevel> {
        if self.authorization.is_empty() {
            vec![PermissionLevel::placeholder()]
        } else {
            self.authorization.clone()
        }
    }
}

/// A constructed, unsigned contract action.
///
/// `data` holds the binary-encoded payload; JSON renders it as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Contract account
    pub account: Name,
    /// Action name
    pub name: Name,
    /// Required authorizations
    pub authorization: Vec<PermissionLevel>,
    /// Encoded payload
    #[serde(serialize_with = "hex_serialize", deserialize_with = "hex_deserialize")]
    pub data: Vec<u8>,
}

impl Action {
    /// Builds an action by encoding `data`
    pub fn new<T: AbiEncode + ?Sized>(
        account: Name,
        name: Name,
        authorization: Vec<PermissionLevel>,
        data: &T,
    ) -> Self {
        Self {
            account,
            name,
            authorization,
            data: abi::encode(data),
        }
    }

    /// Decodes the payload as `T`
    pub fn decode_data<T: AbiDecode>(&self) -> Result<T> {
        abi::decode(&self.data)
    }

    /// Payload as lowercase hex
    pub fn data_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

impl AbiEncode for Action {
    fn abi_encode(&self, encoder: &mut Encoder) {
        self.account.abi_encode(encoder);
        self.name.abi_encode(encoder);
        self.authorization.abi_encode(encoder);
        encoder.write_bytes(&self.data);
    }
}

impl AbiDecode for Action {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            account: Name::abi_decode(decoder)?,
            name: Name::abi_decode(decoder)?,
            authorization: Vec::abi_decode(decoder)?,
            data: decoder.read_bytes()?.to_vec(),
        })
    }
}

fn hex_serialize<S: Serializer>(
    data: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(data))
}

fn hex_deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    hex::decode(s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Name {
        Name::new("eosio.token").unwrap()
    }

    #[test]
    fn test_placeholder() {
        let level = PermissionLevel::placeholder();
        assert!(level.is_placeholder());
        assert_eq!(level.to_string(), "............1@............2");
    }

    #[test]
    fn test_options_default_to_placeholder() {
        let options = ActionOptions::default();
        assert_eq!(options.resolved_authorization(), vec![PermissionLevel::placeholder()]);

        let active = PermissionLevel::new(
            Name::new("teamgreymass").unwrap(),
            Name::new("active").unwrap(),
        );
        let options = ActionOptions::default().authorize(active);
        assert_eq!(options.resolved_authorization(), vec![active]);
    }

    #[test]
    fn test_action_json_shape() {
        let action = Action::new(
            token(),
            Name::new("transfer").unwrap(),
            vec![PermissionLevel::placeholder()],
            "hi",
        );
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["account"], "eosio.token");
        assert_eq!(json["name"], "transfer");
        assert_eq!(json["authorization"][0]["actor"], "............1");
        assert_eq!(json["data"], "026869");

        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
        assert_eq!(back.decode_data::<String>().unwrap(), "hi");
    }

    #[test]
    fn test_action_binary_round_trip() {
        let action = Action::new(token(), Name::new("open").unwrap(), vec![], &7u64);
        let bytes = abi::encode(&action);
        assert_eq!(abi::decode::<Action>(&bytes).unwrap(), action);
    }
}
