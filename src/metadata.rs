//! Build metadata for processed documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Identity of one processing run, stamped into output when enabled.
#[derive(Debug, Clone, Serialize)]
pub struct BuildMetadata {
    pub build_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl BuildMetadata {
    pub fn new() -> Self {
        Self {
            build_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }

    /// Comment block recording the build, using the format's line-comment
    /// prefix. Formats without comments (json) get no stamp.
    pub fn stamp_comment(&self, source: &str, comment_prefix: Option<&str>) -> Option<String> {
        let prefix = comment_prefix?;
        Some(format!(
            "{prefix} Generated by ono build {} at {}\n{prefix} Source: {source}\n",
            self.build_id,
            self.timestamp.to_rfc3339(),
        ))
    }
}

impl Default for BuildMetadata {
    fn default() -> Self {
        Self::new()
    }
}
