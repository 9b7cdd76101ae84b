//! List-query envelopes and entity response types.
//!
//! Every list operation accepts one of the query envelopes below and returns
//! a [Page] whose `next` field echoes the query with its cursor advanced, so
//! a client resumes by resubmitting `next` unchanged.
//!
//! The entity response types exist to pin down the serialized field order:
//! declaration order here is the documented output order per entity type.

use crate::filter::FilterParam;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size applied to every list operation.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A bounded page of results plus the continuation to fetch the following
/// one. `last_page` is true iff fewer than the requested limit were
/// returned.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Page<T, Q> {
    pub items: Vec<T>,
    pub last_page: bool,
    pub next: Q,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListAccountsQuery {
    pub filter: String,
    pub filter_params: Vec<FilterParam>,
    pub after: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListAssetsQuery {
    pub filter: String,
    pub filter_params: Vec<FilterParam>,
    pub after: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListBalancesQuery {
    pub filter: String,
    pub filter_params: Vec<FilterParam>,
    /// Grouping fields. Empty means the documented default grouping by
    /// asset identity (`asset_alias`, `asset_id`).
    pub sum_by: Vec<String>,
    /// Upper time bound in milliseconds. Zero means unbounded above.
    pub timestamp: u64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListTxsQuery {
    pub filter: String,
    pub filter_params: Vec<FilterParam>,
    /// Lower time bound in milliseconds, inclusive. Used to look up a
    /// starting cursor when `after` is empty.
    pub start_time: u64,
    /// Upper time bound in milliseconds. Zero means unbounded above.
    pub end_time: u64,
    /// Wait timeout for tailing queries, e.g. `"5s"`. Empty means no
    /// timeout beyond the ambient request deadline.
    pub timeout: String,
    pub after: String,
    /// Ascending order with a blocking wait for new matching transactions
    /// instead of an empty page.
    pub ascending_with_long_poll: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListOutputsQuery {
    pub filter: String,
    pub filter_params: Vec<FilterParam>,
    /// Upper time bound in milliseconds. Zero means unbounded above.
    pub timestamp: u64,
    pub after: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListTxFeedsQuery {
    pub after: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListKeysQuery {
    pub aliases: Vec<String>,
    pub after: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AccountKeyResponse {
    pub root_xpub: Value,
    pub account_xpub: Value,
    pub account_derivation_path: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AccountResponse {
    pub id: Value,
    pub alias: Value,
    pub keys: Vec<AccountKeyResponse>,
    pub quorum: Value,
    pub tags: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AssetKeyResponse {
    pub root_xpub: Value,
    pub asset_pubkey: Value,
    pub asset_derivation_path: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AssetResponse {
    pub id: Value,
    pub alias: Option<String>,
    pub issuance_program: Value,
    pub keys: Vec<AssetKeyResponse>,
    pub quorum: Value,
    pub definition: Value,
    pub tags: Value,
    pub is_local: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TxInputResponse {
    #[serde(rename = "type")]
    pub input_type: Value,
    pub asset_id: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub asset_alias: Value,
    pub asset_definition: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub asset_tags: Value,
    pub asset_is_local: Value,
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub issuance_program: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spent_output: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub account_id: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub account_alias: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub account_tags: Value,
    pub reference_data: Value,
    pub is_local: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TxOutputResponse {
    #[serde(rename = "type")]
    pub output_type: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub purpose: Value,
    pub position: Value,
    pub asset_id: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub asset_alias: Value,
    pub asset_definition: Value,
    pub asset_tags: Value,
    pub asset_is_local: Value,
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub account_id: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub account_alias: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub account_tags: Value,
    pub control_program: Value,
    pub reference_data: Value,
    pub is_local: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TxResponse {
    pub id: Value,
    pub timestamp: Value,
    pub block_id: Value,
    pub block_height: Value,
    pub position: Value,
    pub reference_data: Value,
    pub is_local: Value,
    pub inputs: Vec<TxInputResponse>,
    pub outputs: Vec<TxOutputResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct UtxoResponse {
    #[serde(rename = "type")]
    pub output_type: Value,
    pub purpose: Value,
    pub transaction_id: Value,
    pub position: Value,
    pub asset_id: Value,
    pub asset_alias: Value,
    pub asset_definition: Value,
    pub asset_tags: Value,
    pub asset_is_local: Value,
    pub amount: Value,
    pub account_id: Value,
    pub account_alias: Value,
    pub account_tags: Value,
    pub control_program: Value,
    pub reference_data: Value,
    pub is_local: Value,
}

/// A stored transaction feed. Feeds are listed unfiltered.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TxFeedResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub filter: String,
    pub after: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct XPubResponse {
    pub xpub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_field_order_is_fixed() {
        let resp = AccountResponse {
            id: Value::from("acc1"),
            alias: Value::from("alice"),
            keys: vec![],
            quorum: Value::from(1),
            tags: Value::Null,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"id":"acc1","alias":"alice","keys":[],"quorum":1,"tags":null}"#);
    }

    #[test]
    fn query_defaults_fill_missing_fields() {
        let q: ListTxsQuery = serde_json::from_str(r#"{"filter":"inputs(asset_id = $1)"}"#).unwrap();
        assert_eq!(q.filter, "inputs(asset_id = $1)");
        assert_eq!(q.start_time, 0);
        assert_eq!(q.end_time, 0);
        assert!(!q.ascending_with_long_poll);
        assert!(q.after.is_empty());
    }

    #[test]
    fn continuation_echo_round_trips() {
        let q = ListAccountsQuery {
            filter: "alias = $1".into(),
            filter_params: vec![FilterParam::from("alice")],
            after: "acc-cursor".into(),
        };
        let page = Page { items: Vec::<AccountResponse>::new(), last_page: true, next: q.clone() };
        let back: Page<AccountResponse, ListAccountsQuery> =
            serde_json::from_str(&serde_json::to_string(&page).unwrap()).unwrap();
        assert_eq!(back.next, q);
    }
}
