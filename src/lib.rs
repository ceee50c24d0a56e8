use std::fmt::Display;

use serde::Deserialize;

pub mod config;
pub mod decode;
pub mod error;
pub mod inspect;
pub mod metrics;
pub mod pagination;
pub mod pipeline;
pub mod sink;
pub mod steam;

pub use config::Config;
pub use error::{FetchError, RunError};
pub use metrics::Metrics;
pub use pagination::PaginationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FactoryNew => write!(f, "Factory New"),
            Self::MinimalWear => write!(f, "Minimal Wear"),
            Self::FieldTested => write!(f, "Field-Tested"),
            Self::WellWorn => write!(f, "Well-Worn"),
            Self::BattleScarred => write!(f, "Battle-Scarred"),
        }
    }
}

const STATTRAK_PREFIX: &str = "StatTrak™ ";

/// The one item variant a run collects listings for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemDescriptor {
    #[serde(default)]
    pub stattrak: bool,
    /// Steam app the item belongs to, 730 for CS.
    #[serde(default = "default_app_id")]
    pub app_id: u32,
    pub weapon: String,
    pub finish: String,
    pub wear: Condition,
}

fn default_app_id() -> u32 {
    730
}

impl ItemDescriptor {
    /// The name the market knows the item by, e.g.
    /// `StatTrak™ AK-47 | Asiimov (Field-Tested)`.
    pub fn market_hash_name(&self) -> String {
        format!(
            "{}{} | {} ({})",
            self.prefix(),
            self.weapon,
            self.finish,
            self.wear
        )
    }

    /// Filesystem friendly label, `|` is not allowed in file names everywhere.
    pub fn file_label(&self) -> String {
        format!(
            "{}{} - {} ({})",
            self.prefix(),
            self.weapon,
            self.finish,
            self.wear
        )
    }

    fn prefix(&self) -> &'static str {
        if self.stattrak {
            STATTRAK_PREFIX
        } else {
            ""
        }
    }
}

impl Default for ItemDescriptor {
    fn default() -> Self {
        Self {
            stattrak: false,
            app_id: default_app_id(),
            weapon: "Glock-18".to_string(),
            finish: "Grinder".to_string(),
            wear: Condition::FactoryNew,
        }
    }
}
