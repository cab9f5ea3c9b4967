use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Account owner as returned by the auth endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IdeaStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Archived,
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IdeaPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// An idea as the server stores it. Guest-created ideas use the same shape
/// with a `guest-` prefixed id until they are migrated.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(default)]
    pub priority: IdeaPriority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Creation payload for an idea; the server assigns id and timestamps.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(default)]
    pub priority: IdeaPriority,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; unset fields are left untouched server-side.
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IdeaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<IdeaPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Listing filter. Page and limit are not part of the filter; the client
/// controls those.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdeaFilter {
    pub status: Option<IdeaStatus>,
    pub category: Option<String>,
    pub priority: Option<IdeaPriority>,
    pub search: Option<String>,
}

impl IdeaFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(status) = &self.status {
            out.push(("status", status.as_ref().to_string()));
        }
        if let Some(category) = &self.category {
            out.push(("category", category.clone()));
        }
        if let Some(priority) = &self.priority {
            out.push(("priority", priority.as_ref().to_string()));
        }
        if let Some(search) = &self.search {
            out.push(("search", search.clone()));
        }
        out
    }
}

/// Daily memo, addressed by its `YYYY-MM-DD` date.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: String,
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MemoDraft {
    pub date: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    #[serde(default)]
    pub idea_id: String,
    pub action: String,
    /// Free-form payload recorded by the backend; the schema varies per action.
    #[serde(default)]
    pub detail: serde_json::Value,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdeaStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub by_status: BTreeMap<String, u32>,
    #[serde(default)]
    pub by_category: BTreeMap<String, u32>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub has_next: bool,
}

/// One page of a listing endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idea_contract_deserialize() {
        // Contract based on the ideas endpoints (camelCase wire format).
        let json = r#"{
            "id": "663e1a2b",
            "title": "Solar balcony",
            "description": "Panels on the rail",
            "category": "home",
            "status": "in-progress",
            "priority": "high",
            "tags": ["energy"],
            "createdAt": "2026-08-01T10:00:00.000Z",
            "updatedAt": "2026-08-02T09:30:00.000Z"
        }"#;
        let idea: Idea = serde_json::from_str(json).expect("idea should parse");
        assert_eq!(idea.status, IdeaStatus::InProgress);
        assert_eq!(idea.priority, IdeaPriority::High);
        assert_eq!(idea.created_at, "2026-08-01T10:00:00.000Z");
    }

    #[test]
    fn idea_defaults_tolerate_sparse_payloads() {
        let idea: Idea =
            serde_json::from_str(r#"{"id":"1","title":"t"}"#).expect("sparse idea should parse");
        assert_eq!(idea.status, IdeaStatus::Pending);
        assert_eq!(idea.priority, IdeaPriority::Medium);
        assert!(idea.tags.is_empty());
    }

    #[test]
    fn idea_patch_skips_unset_fields() {
        let patch = IdeaPatch {
            status: Some(IdeaStatus::Completed),
            ..Default::default()
        };
        let v = serde_json::to_value(&patch).expect("patch should serialize");
        assert_eq!(v, serde_json::json!({"status": "completed"}));
    }

    #[test]
    fn filter_query_pairs_keep_field_order() {
        let filter = IdeaFilter {
            status: Some(IdeaStatus::InProgress),
            search: Some("solar".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("status", "in-progress".to_string()),
                ("search", "solar".to_string()),
            ]
        );
    }

    #[test]
    fn memo_endpoint_may_return_null() {
        let memo: Option<Memo> = serde_json::from_str("null").expect("null should parse");
        assert!(memo.is_none());
    }

    #[test]
    fn paged_defaults_to_no_next_page() {
        let paged: Paged<Idea> =
            serde_json::from_str(r#"{"data":[]}"#).expect("empty page should parse");
        assert!(paged.data.is_empty());
        assert!(!paged.pagination.has_next);
    }
}
