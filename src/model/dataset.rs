use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{optional_string_or_number, Id, Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "datasetId")]
    pub dataset_id: Id,
    #[serde(rename = "datasetSummary")]
    pub summary: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "linkURL", default)]
    pub link_url: String,
    #[serde(rename = "datasetBLOB", default)]
    pub blob: String,
    #[serde(rename = "datasetDescription", default)]
    pub description: String,
    #[serde(
        rename = "userId",
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<Id>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Dataset {
    pub fn new(dataset_id: Id, summary: String, display_name: String) -> Self {
        Self {
            dataset_id,
            summary,
            display_name,
            link_url: String::new(),
            blob: String::new(),
            description: String::new(),
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Resource for Dataset {
    const KIND: ResourceKind = ResourceKind::Dataset;
    const ID_FIELD: &'static str = "datasetId";
    const INDEX_FIELDS: &'static [&'static str] =
        &["datasetId", "datasetSummary", "displayName", "linkURL"];

    fn id(&self) -> &str {
        &self.dataset_id
    }

    fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    fn set_owner(&mut self, owner_id: String) {
        self.owner_id = Some(owner_id);
    }

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
    }
}
