use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{decode::Decoded, Config, FetchError, ItemDescriptor};

pub mod data;

/// The raw `listinginfo` of one page, keyed by listing id.
pub type ListingPage = BTreeMap<String, serde_json::Value>;

/// One listing ready to be inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub listing_id: String,
    pub asset_id: String,
    pub inspect_link: String,
    pub price: Option<f64>,
}

#[derive(Debug, Default, PartialEq)]
pub struct Extracted {
    pub records: Vec<ListingRecord>,
    /// Entries that had a value but could not be turned into a record.
    pub skipped: usize,
}

pub struct Client {
    req_client: reqwest::Client,
    listings_url: reqwest::Url,
    country: String,
    language: String,
    currency: String,
}

/// `<base>/<app id>/<market hash name>/render/` with the name encoded as a
/// single path segment.
pub fn listings_url(base: &str, item: &ItemDescriptor) -> Result<reqwest::Url, FetchError> {
    let mut url =
        reqwest::Url::parse(base).map_err(|e| FetchError::InvalidEndpoint(format!("{base}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .push(&item.app_id.to_string())
        .push(&item.market_hash_name())
        .push("render")
        .push("");

    Ok(url)
}

impl Client {
    pub fn new(req_client: reqwest::Client, config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            req_client,
            listings_url: listings_url(&config.market_url, &config.item)?,
            country: config.country.clone(),
            language: config.language.clone(),
            currency: config.currency.to_string(),
        })
    }

    async fn render(&self, start: u64, count: u32) -> Result<data::RenderResponse, FetchError> {
        let start = start.to_string();
        let count = count.to_string();

        let resp = self
            .req_client
            .get(self.listings_url.clone())
            .query(&[
                ("query", ""),
                ("start", &start),
                ("count", &count),
                ("country", &self.country),
                ("language", &self.language),
                ("currency", &self.currency),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!("Non Success Response: {:?}", status);
            return Err(FetchError::Status(status));
        }

        let content = resp.bytes().await?;
        Decoded::from_slice(&content)?.into_result()
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_total_count(&self, count: u32) -> Result<u64, FetchError> {
        let resp = self.render(0, count).await?;

        tracing::debug!(total_count = resp.total_count, "Loaded total count");

        Ok(resp.total_count)
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_page(&self, start: u64, count: u32) -> Result<ListingPage, FetchError> {
        let resp = self.render(start, count).await?;

        tracing::debug!(listings = resp.listinginfo.len(), "Loaded page");

        Ok(resp.listinginfo)
    }
}

/// Mirrors javascript truthiness, plus empty objects and lists.
fn is_empty_entry(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
    }
}

/// Substitutes the asset and listing ids into an inspect link template.
pub fn fill_link(template: &str, listing_id: &str, asset_id: &str) -> String {
    template
        .replace("%assetid%", asset_id)
        .replace("%listingid%", listing_id)
}

fn to_record(
    listing_id: &str,
    value: &serde_json::Value,
    price_divisor: f64,
) -> Result<ListingRecord, FetchError> {
    let info = data::ListingInfo::deserialize(value)
        .map_err(|e| FetchError::Malformed(e.to_string()))?;

    let action = info
        .asset
        .market_actions
        .first()
        .ok_or(FetchError::MissingData("market_actions"))?;

    Ok(ListingRecord {
        listing_id: listing_id.to_string(),
        inspect_link: fill_link(&action.link, listing_id, &info.asset.id),
        asset_id: info.asset.id,
        price: info.converted_price.map(|p| p as f64 / price_divisor),
    })
}

/// Turns a page into inspectable records, in key order.
pub fn extract_listings(page: &ListingPage, price_divisor: f64) -> Extracted {
    let mut extracted = Extracted::default();

    for (listing_id, value) in page {
        if is_empty_entry(value) {
            continue;
        }

        match to_record(listing_id, value, price_divisor) {
            Ok(record) => extracted.records.push(record),
            Err(e) => {
                tracing::warn!(listing_id = %listing_id, "Skipping listing: {}", e);
                tracing::debug!(%value, "Skipped listing");
                extracted.skipped += 1;
            }
        }
    }

    extracted
}
