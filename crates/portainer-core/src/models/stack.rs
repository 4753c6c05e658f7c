use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Status code Portainer reports for a running regular stack.
pub const STACK_STATUS_ACTIVE: i64 = 1;

// --- Unified model ---

/// A stack as presented to agents, whichever backend representation it came from.
///
/// Regular stacks fill `status` and `endpoint_id`; edge stacks fill
/// `environment_group_ids` and leave the other two at their zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub endpoint_id: i64,
    #[serde(default, rename = "group_ids", skip_serializing_if = "Vec::is_empty")]
    pub environment_group_ids: Vec<i64>,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

// --- Backend records ---

/// A regular stack record as returned by `GET /api/stacks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegularStack {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub r#type: i64,
    #[serde(default)]
    pub endpoint_id: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub creation_date: i64,
}

/// An edge stack record as returned by `GET /api/edge_stacks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EdgeStack {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub creation_date: i64,
    #[serde(default)]
    pub edge_groups: Vec<i64>,
    #[serde(default)]
    pub deployment_type: i64,
}

/// Payload of the `/file` endpoints for both stack kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct StackFile {
    #[serde(rename = "StackFileContent")]
    pub content: String,
}

// --- Conversion ---

impl From<RegularStack> for Stack {
    fn from(raw: RegularStack) -> Self {
        let status = if raw.status == STACK_STATUS_ACTIVE {
            "active"
        } else {
            "inactive"
        };
        Stack {
            id: raw.id,
            name: raw.name,
            status: status.to_string(),
            created_at: format_epoch(raw.creation_date),
            endpoint_id: raw.endpoint_id,
            environment_group_ids: Vec::new(),
        }
    }
}

impl From<EdgeStack> for Stack {
    fn from(raw: EdgeStack) -> Self {
        Stack {
            id: raw.id,
            name: raw.name,
            created_at: format_epoch(raw.creation_date),
            environment_group_ids: raw.edge_groups,
            ..Default::default()
        }
    }
}

/// Epoch seconds to RFC 3339 (UTC). Out-of-range values yield an empty string.
fn format_epoch(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
