use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::features::{layout, CATALOG_SIZE, FEATURE_VERSION};
use crate::logic::model::{store, EngineStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatusReport {
    pub app: String,
    pub version: String,

    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,

    pub model: EngineStatus,
}

impl EngineStatusReport {
    pub fn current() -> Self {
        Self {
            app: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout::layout_hash(),
            feature_count: CATALOG_SIZE,
            model: store::get_status(),
        }
    }
}
