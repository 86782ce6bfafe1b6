//! History records appended after successful generations

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use log::debug;

use crate::error::Error;
use crate::request::GenerationResult;
use crate::schema::ContentType;

/// One saved generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem
{   pub id: String
  , /// Display label of the content type, e.g. "Product Description"
    #[serde(rename = "type")]
    pub kind: String
  , pub text: String
  , /// RFC 3339, UTC
    pub timestamp: String
}

impl HistoryItem
{   pub fn new(content_type: ContentType, text: impl Into<String>) -> Self
    {   HistoryItem
        {   id: uuid::Uuid::new_v4().to_string()
          , kind: content_type.label().to_string()
          , text: text.into()
          , timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        }
    }

    /// An item for a success, nothing for a failure
    pub fn from_result(
      content_type: ContentType
    , result: &GenerationResult
    ) -> Option<Self>
    {   result.text().map(|text| HistoryItem::new(content_type, text))
    }
}

/// In-memory history, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog
{   items: Vec<HistoryItem>
}

impl HistoryLog
{   pub fn new() -> Self
    {   HistoryLog::default()
    }

    pub fn add(&mut self, item: HistoryItem)
    {   debug!("Adding history item {}", item.id);
        self.items.insert(0, item);
    }

    /// Record a result if it was a success; returns the new item's id
    pub fn record(
      &mut self
    , content_type: ContentType
    , result: &GenerationResult
    ) -> Option<String>
    {   let item = HistoryItem::from_result(content_type, result)?;
        let id = item.id.clone();
        self.add(item);
        Some(id)
    }

    /// Remove one item; returns whether it existed
    pub fn delete(&mut self, id: &str) -> bool
    {   let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before != self.items.len()
    }

    pub fn clear(&mut self)
    {   debug!("Clearing {} history items", self.items.len());
        self.items.clear();
    }

    pub fn items(&self) -> &[HistoryItem]
    {   &self.items
    }

    pub fn len(&self) -> usize
    {   self.items.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.items.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, Error>
    {   serde_json::from_str(json).map_err(|e| Error::ParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, Error>
    {   serde_json::to_string(self).map_err(|e| Error::Other(e.to_string()))
    }
}
