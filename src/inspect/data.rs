#[derive(Debug, PartialEq, serde::Deserialize)]
pub struct InspectResponse {
    pub success: Option<bool>,
    pub iteminfo: Option<ItemInfo>,
    pub price: Option<f64>,
}

/*
Trimmed example of an `iteminfo`:
{
    "itemid": "31337",
    "defindex": 4,
    "paintindex": 586,
    "rarity": 3,
    "quality": 4,
    "paintseed": 661,
    "s": "0",
    "a": "31337",
    "d": "4996987246995889424",
    "m": "4242",
    "floatvalue": 0.0612765327095985,
    "min": 0,
    "max": 0.3,
    "weapon_type": "Glock-18",
    "item_name": "Grinder",
    "wear_name": "Factory New",
    "full_item_name": "Glock-18 | Grinder (Factory New)"
}
*/
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ItemInfo {
    /// Listing id the service resolved the link to, empty for inventory links.
    #[serde(default)]
    pub m: String,
    pub floatvalue: f64,
    pub paintseed: u32,
}
