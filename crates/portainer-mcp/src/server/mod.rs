mod params;
mod stack;

#[cfg(test)]
mod mock;

use std::fmt::Display;
use std::sync::Arc;

use portainer_core::StackService;
use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo, Tool},
    tool_handler, ServerHandler,
};
use serde::Serialize;

const INSTRUCTIONS: &str = r#"This server manages Docker Compose stacks on a Portainer instance.

Regular stacks run on a single environment (endpoint); address them with both `id` and `endpointId`. Edge stacks are deployed to one or more edge groups (`environmentGroupIds`).

- `listStacks` / `listEdgeStacks` return JSON arrays of {id, name, status, created_at, endpoint_id | group_ids}.
- `getStackFile` / `getEdgeStackFile` return the compose file text. Read it before calling an update tool so you change only what you mean to.
- `updateStack` re-pulls images unless `pullImage` is "false".
- Start/stop/delete are not idempotent: starting a running stack or deleting a missing one returns the backend's error."#;

const READ_ONLY_NOTE: &str =
    "\n\nThis server is running in read-only mode: only listing and file inspection tools are available.";

#[derive(Clone)]
pub struct PortainerServer {
    tool_router: ToolRouter<Self>,
    stacks: Arc<dyn StackService>,
    read_only: bool,
}

impl PortainerServer {
    /// In read-only mode every tool not annotated `read_only_hint = true` is
    /// dropped from the router, so it is neither advertised nor callable.
    pub fn new(stacks: Arc<dyn StackService>, read_only: bool) -> Self {
        let mut tool_router = Self::stack_tools();
        if read_only {
            retain_read_only(&mut tool_router);
        }
        Self {
            tool_router,
            stacks,
            read_only,
        }
    }

    /// Names of the registered tools, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        names
    }
}

fn is_read_only(tool: &Tool) -> bool {
    tool.annotations
        .as_ref()
        .and_then(|a| a.read_only_hint)
        .unwrap_or(false)
}

fn retain_read_only(router: &mut ToolRouter<PortainerServer>) {
    let mutating: Vec<_> = router
        .list_all()
        .into_iter()
        .filter(|t| !is_read_only(t))
        .map(|t| t.name)
        .collect();
    for name in mutating {
        router.remove_route(&name);
    }
}

#[tool_handler]
impl ServerHandler for PortainerServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = if self.read_only {
            format!("{INSTRUCTIONS}{READ_ONLY_NOTE}")
        } else {
            INSTRUCTIONS.to_string()
        };
        ServerInfo {
            instructions: Some(instructions.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// --- Result rendering ---

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

fn json_result<T: Serialize>(value: &T, marshal_context: &str) -> CallToolResult {
    match serde_json::to_string(value) {
        Ok(json) => text_result(json),
        Err(e) => tool_error(marshal_context, e),
    }
}

/// Error result carrying `prefix: cause`. Never a protocol-level error.
fn tool_error(prefix: &str, err: impl Display) -> CallToolResult {
    tracing::warn!(error = %err, "{prefix}");
    CallToolResult::error(vec![Content::text(format!("{prefix}: {err}"))])
}
