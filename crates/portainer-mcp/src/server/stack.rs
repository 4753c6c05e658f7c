use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, JsonObject},
    schemars, tool, tool_router, ErrorData as McpError,
};
use serde::Deserialize;

use super::params::{input_schema, parse_args, resolve_pull_image};
use super::{json_result, text_result, tool_error, PortainerServer};

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct StackIdRequest {
    /// The ID of the stack
    id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct StackTargetRequest {
    /// The ID of the stack
    id: i64,
    /// The ID of the environment (endpoint) the stack is deployed on
    endpoint_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct CreateStackRequest {
    /// Name of the stack
    name: String,
    /// Docker Compose file content
    file: String,
    /// The ID of the environment (endpoint) to deploy the stack on
    endpoint_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateStackRequest {
    /// The ID of the stack to update
    id: i64,
    /// New Docker Compose file content
    file: String,
    /// The ID of the environment (endpoint) the stack is deployed on
    endpoint_id: i64,
    /// Re-pull images before redeploying: "true" or "false". Defaults to "true".
    pull_image: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct CreateEdgeStackRequest {
    /// Name of the edge stack
    name: String,
    /// Docker Compose file content
    file: String,
    /// IDs of the edge groups to deploy the stack to
    environment_group_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateEdgeStackRequest {
    /// The ID of the edge stack to update
    id: i64,
    /// New Docker Compose file content
    file: String,
    /// IDs of the edge groups the stack should target
    environment_group_ids: Vec<i64>,
}

fn require_name(name: &str) -> Result<(), CallToolResult> {
    if name.trim().is_empty() {
        return Err(tool_error("invalid name parameter", "name must not be empty"));
    }
    Ok(())
}

fn require_groups(ids: &[i64]) -> Result<(), CallToolResult> {
    if ids.is_empty() {
        return Err(tool_error(
            "invalid environmentGroupIds parameter",
            "at least one environment group is required",
        ));
    }
    Ok(())
}

// --- Tools ---

#[tool_router(router = stack_tool_router)]
impl PortainerServer {
    pub(crate) fn stack_tools() -> ToolRouter<Self> {
        Self::stack_tool_router()
    }

    #[tool(
        name = "listStacks",
        description = "List all regular (non-edge) stacks on the Portainer instance. Returns a JSON array of {id, name, status (\"active\"/\"inactive\"), created_at, endpoint_id}.",
        annotations(read_only_hint = true)
    )]
    async fn list_stacks(&self) -> Result<CallToolResult, McpError> {
        match self.stacks.get_stacks().await {
            Ok(stacks) => Ok(json_result(&stacks, "failed to marshal stacks")),
            Err(e) => Ok(tool_error("failed to get stacks", e)),
        }
    }

    #[tool(
        name = "getStackFile",
        description = "Get the Docker Compose file content of a regular stack",
        input_schema = input_schema::<StackIdRequest>(),
        annotations(read_only_hint = true)
    )]
    async fn get_stack_file(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: StackIdRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        match self.stacks.get_stack_file(req.id).await {
            Ok(file) => Ok(text_result(file)),
            Err(e) => Ok(tool_error("failed to get stack file", e)),
        }
    }

    #[tool(
        name = "createStack",
        description = "Deploy a new Docker Compose stack on a single environment. Returns the ID of the created stack.",
        input_schema = input_schema::<CreateStackRequest>(),
        annotations(read_only_hint = false)
    )]
    async fn create_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: CreateStackRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        if let Err(result) = require_name(&req.name) {
            return Ok(result);
        }
        tracing::debug!(name = %req.name, endpoint_id = req.endpoint_id, "creating stack");
        match self
            .stacks
            .create_stack(&req.name, &req.file, req.endpoint_id)
            .await
        {
            Ok(id) => Ok(text_result(format!(
                "Stack created successfully with ID: {}",
                id
            ))),
            Err(e) => Ok(tool_error("error creating stack", e)),
        }
    }

    #[tool(
        name = "updateStack",
        description = "Replace the Docker Compose file of a regular stack and redeploy it. Images are re-pulled unless pullImage is \"false\".",
        input_schema = input_schema::<UpdateStackRequest>(),
        annotations(read_only_hint = false)
    )]
    async fn update_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: UpdateStackRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        let pull_image = resolve_pull_image(req.pull_image.as_deref());
        match self
            .stacks
            .update_stack(req.id, &req.file, req.endpoint_id, pull_image)
            .await
        {
            Ok(()) => Ok(text_result("Stack updated successfully")),
            Err(e) => Ok(tool_error("failed to update stack", e)),
        }
    }

    #[tool(
        name = "startStack",
        description = "Start a stopped regular stack",
        input_schema = input_schema::<StackTargetRequest>(),
        annotations(read_only_hint = false)
    )]
    async fn start_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: StackTargetRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        match self.stacks.start_stack(req.id, req.endpoint_id).await {
            Ok(()) => Ok(text_result("Stack started successfully")),
            Err(e) => Ok(tool_error("failed to start stack", e)),
        }
    }

    #[tool(
        name = "stopStack",
        description = "Stop a running regular stack",
        input_schema = input_schema::<StackTargetRequest>(),
        annotations(read_only_hint = false)
    )]
    async fn stop_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: StackTargetRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        match self.stacks.stop_stack(req.id, req.endpoint_id).await {
            Ok(()) => Ok(text_result("Stack stopped successfully")),
            Err(e) => Ok(tool_error("failed to stop stack", e)),
        }
    }

    #[tool(
        name = "deleteStack",
        description = "Delete a regular stack and remove its containers",
        input_schema = input_schema::<StackTargetRequest>(),
        annotations(read_only_hint = false, destructive_hint = true)
    )]
    async fn delete_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: StackTargetRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        match self.stacks.delete_stack(req.id, req.endpoint_id).await {
            Ok(()) => Ok(text_result("Stack deleted successfully")),
            Err(e) => Ok(tool_error("failed to delete stack", e)),
        }
    }

    #[tool(
        name = "listEdgeStacks",
        description = "List all edge stacks. Returns a JSON array of {id, name, status, created_at, group_ids}; status is always empty for edge stacks.",
        annotations(read_only_hint = true)
    )]
    async fn list_edge_stacks(&self) -> Result<CallToolResult, McpError> {
        match self.stacks.get_edge_stacks().await {
            Ok(stacks) => Ok(json_result(&stacks, "failed to marshal edge stacks")),
            Err(e) => Ok(tool_error("failed to get edge stacks", e)),
        }
    }

    #[tool(
        name = "getEdgeStackFile",
        description = "Get the Docker Compose file content of an edge stack",
        input_schema = input_schema::<StackIdRequest>(),
        annotations(read_only_hint = true)
    )]
    async fn get_edge_stack_file(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: StackIdRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        match self.stacks.get_edge_stack_file(req.id).await {
            Ok(file) => Ok(text_result(file)),
            Err(e) => Ok(tool_error("failed to get edge stack file", e)),
        }
    }

    #[tool(
        name = "createEdgeStack",
        description = "Create a Docker Compose edge stack deployed to one or more edge groups. Returns the ID of the created stack.",
        input_schema = input_schema::<CreateEdgeStackRequest>(),
        annotations(read_only_hint = false)
    )]
    async fn create_edge_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: CreateEdgeStackRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        if let Err(result) =
            require_name(&req.name).and_then(|()| require_groups(&req.environment_group_ids))
        {
            return Ok(result);
        }
        match self
            .stacks
            .create_edge_stack(&req.name, &req.file, &req.environment_group_ids)
            .await
        {
            Ok(id) => Ok(text_result(format!(
                "Edge stack created successfully with ID: {}",
                id
            ))),
            Err(e) => Ok(tool_error("error creating edge stack", e)),
        }
    }

    #[tool(
        name = "updateEdgeStack",
        description = "Replace the Docker Compose file and target edge groups of an edge stack",
        input_schema = input_schema::<UpdateEdgeStackRequest>(),
        annotations(read_only_hint = false)
    )]
    async fn update_edge_stack(
        &self,
        Parameters(args): Parameters<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let req: UpdateEdgeStackRequest = match parse_args(args) {
            Ok(r) => r,
            Err(result) => return Ok(result),
        };
        if let Err(result) = require_groups(&req.environment_group_ids) {
            return Ok(result);
        }
        match self
            .stacks
            .update_edge_stack(req.id, &req.file, &req.environment_group_ids)
            .await
        {
            Ok(()) => Ok(text_result("Edge stack updated successfully")),
            Err(e) => Ok(tool_error("failed to update edge stack", e)),
        }
    }
}
