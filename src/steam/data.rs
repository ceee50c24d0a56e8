use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Response of the `/render/` listings endpoint.
///
/// Only the fields we use are declared, the endpoint also returns
/// `app_data`, `assets`, `currency`, `hovers` and the rendered html.
#[derive(Debug, PartialEq, Deserialize)]
pub struct RenderResponse {
    pub total_count: u64,
    #[serde(default, deserialize_with = "listing_map")]
    pub listinginfo: BTreeMap<String, serde_json::Value>,
}

/// Steam sends `"listinginfo": []` instead of an empty object when there is
/// nothing to list.
fn listing_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Map(BTreeMap<String, serde_json::Value>),
        List(Vec<serde_json::Value>),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Map(map) => Ok(map),
        Raw::List(list) => {
            if !list.is_empty() {
                tracing::warn!(entries = list.len(), "Listing info is a non empty list");
            }
            Ok(BTreeMap::new())
        }
        Raw::Null(()) => Ok(BTreeMap::new()),
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ListingInfo {
    pub asset: Asset,
    pub converted_price: Option<u64>,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub market_actions: Vec<MarketAction>,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct MarketAction {
    pub link: String,
}
