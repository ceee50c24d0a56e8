//! Client for the float inspection service.

use crate::{decode::Decoded, steam::ListingRecord, FetchError};

pub mod data;

pub use data::ItemInfo;

/// What the service told us about one listed item.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub listing_id: String,
    pub item: ItemInfo,
    pub price: Option<f64>,
}

impl Inspection {
    /// Combines a service response with the listing it was requested for.
    ///
    /// A price known from the listing wins over the one the service reports.
    pub fn from_response(
        record: &ListingRecord,
        resp: data::InspectResponse,
    ) -> Result<Self, FetchError> {
        if resp.success == Some(false) {
            return Err(FetchError::Unsuccessful);
        }

        let item = resp.iteminfo.ok_or(FetchError::MissingData("iteminfo"))?;

        Ok(Self {
            listing_id: record.listing_id.clone(),
            item,
            price: record.price.or(resp.price),
        })
    }
}

pub struct Client {
    req_client: reqwest::Client,
    base_url: reqwest::Url,
}

impl Client {
    pub fn new(req_client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| FetchError::InvalidEndpoint(format!("{base_url}: {e}")))?;

        Ok(Self {
            req_client,
            base_url,
        })
    }

    #[tracing::instrument(skip(self, record), fields(listing_id = %record.listing_id))]
    pub async fn load_inspection(&self, record: &ListingRecord) -> Result<Inspection, FetchError> {
        let resp = self
            .req_client
            .get(self.base_url.clone())
            .query(&[("url", &record.inspect_link)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!("Non Success Response: {:?}", status);
            return Err(FetchError::Status(status));
        }

        let content = resp.bytes().await?;
        let parsed = Decoded::<data::InspectResponse>::from_slice(&content)?.into_result()?;

        Inspection::from_response(record, parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: Option<f64>) -> ListingRecord {
        ListingRecord {
            listing_id: "4242".to_string(),
            asset_id: "31337".to_string(),
            inspect_link: "steam://rungame/730/1/+csgo_econ_action_preview%20M4242A31337D1".to_string(),
            price,
        }
    }

    fn response(content: serde_json::Value) -> data::InspectResponse {
        serde_json::from_value(content).unwrap()
    }

    #[test]
    fn listing_price_wins() {
        let resp = response(serde_json::json!({
            "success": true,
            "price": 9.5,
            "iteminfo": { "m": "4242", "floatvalue": 0.061, "paintseed": 661 }
        }));

        let inspection = Inspection::from_response(&record(Some(2.0)), resp).unwrap();

        assert_eq!(Some(2.0), inspection.price);
        assert_eq!(661, inspection.item.paintseed);
        assert_eq!("4242", inspection.listing_id);
    }

    #[test]
    fn service_price_without_listing_price() {
        let resp = response(serde_json::json!({
            "price": 9.5,
            "iteminfo": { "floatvalue": 0.5, "paintseed": 1 }
        }));

        let inspection = Inspection::from_response(&record(None), resp).unwrap();
        assert_eq!(Some(9.5), inspection.price);
    }

    #[test]
    fn missing_iteminfo() {
        let resp = response(serde_json::json!({ "success": true }));

        assert!(matches!(
            Inspection::from_response(&record(None), resp),
            Err(FetchError::MissingData("iteminfo"))
        ));
    }

    #[test]
    fn unsuccessful() {
        let resp = response(serde_json::json!({
            "success": false,
            "iteminfo": { "floatvalue": 0.5, "paintseed": 1 }
        }));

        assert!(matches!(
            Inspection::from_response(&record(None), resp),
            Err(FetchError::Unsuccessful)
        ));
    }

    #[test]
    fn invalid_base_url() {
        assert!(Client::new(reqwest::Client::new(), "::").is_err());
    }
}
