//! Stack operations as the tool layer sees them.
//!
//! Callers never deal with regular vs edge backend records or raw transport
//! errors: every method returns normalized [`Stack`] values and wraps failures
//! with a fixed context naming the operation. Nothing is retried.

use async_trait::async_trait;

use crate::client::PortainerClient;
use crate::error::{Result, ResultExt};
use crate::models::Stack;

#[async_trait]
pub trait StackService: Send + Sync {
    async fn get_stacks(&self) -> Result<Vec<Stack>>;
    async fn get_stack_file(&self, id: i64) -> Result<String>;
    async fn create_stack(&self, name: &str, file: &str, endpoint_id: i64) -> Result<i64>;
    /// `pull_image` must already be resolved by the caller; no default applies here.
    async fn update_stack(
        &self,
        id: i64,
        file: &str,
        endpoint_id: i64,
        pull_image: bool,
    ) -> Result<()>;
    async fn start_stack(&self, id: i64, endpoint_id: i64) -> Result<()>;
    async fn stop_stack(&self, id: i64, endpoint_id: i64) -> Result<()>;
    async fn delete_stack(&self, id: i64, endpoint_id: i64) -> Result<()>;

    async fn get_edge_stacks(&self) -> Result<Vec<Stack>>;
    async fn get_edge_stack_file(&self, id: i64) -> Result<String>;
    async fn create_edge_stack(&self, name: &str, file: &str, group_ids: &[i64]) -> Result<i64>;
    async fn update_edge_stack(&self, id: i64, file: &str, group_ids: &[i64]) -> Result<()>;
}

#[async_trait]
impl StackService for PortainerClient {
    async fn get_stacks(&self) -> Result<Vec<Stack>> {
        let raw = self
            .list_regular_stacks()
            .await
            .context("failed to list stacks")?;
        Ok(raw.into_iter().map(Stack::from).collect())
    }

    async fn get_stack_file(&self, id: i64) -> Result<String> {
        self.get_regular_stack_file(id)
            .await
            .context("failed to get stack file")
    }

    async fn create_stack(&self, name: &str, file: &str, endpoint_id: i64) -> Result<i64> {
        self.create_regular_stack(name, file, endpoint_id)
            .await
            .context("failed to create stack")
    }

    async fn update_stack(
        &self,
        id: i64,
        file: &str,
        endpoint_id: i64,
        pull_image: bool,
    ) -> Result<()> {
        self.update_regular_stack(id, endpoint_id, file, pull_image)
            .await
            .context("failed to update stack")
    }

    async fn start_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        self.start_regular_stack(id, endpoint_id)
            .await
            .context("failed to start stack")
    }

    async fn stop_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        self.stop_regular_stack(id, endpoint_id)
            .await
            .context("failed to stop stack")
    }

    async fn delete_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        self.delete_regular_stack(id, endpoint_id)
            .await
            .context("failed to delete stack")
    }

    async fn get_edge_stacks(&self) -> Result<Vec<Stack>> {
        let raw = self
            .list_edge_stacks()
            .await
            .context("failed to list edge stacks")?;
        Ok(raw.into_iter().map(Stack::from).collect())
    }

    async fn get_edge_stack_file(&self, id: i64) -> Result<String> {
        self.inspect_edge_stack_file(id)
            .await
            .context("failed to get edge stack file")
    }

    async fn create_edge_stack(&self, name: &str, file: &str, group_ids: &[i64]) -> Result<i64> {
        self.create_edge_stack_from_string(name, file, group_ids)
            .await
            .context("failed to create edge stack")
    }

    async fn update_edge_stack(&self, id: i64, file: &str, group_ids: &[i64]) -> Result<()> {
        self.update_edge_stack_file(id, file, group_ids)
            .await
            .context("failed to update edge stack")
    }
}
