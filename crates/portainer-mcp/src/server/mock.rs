use std::sync::Mutex;

use async_trait::async_trait;
use portainer_core::{Error, Result, Stack, StackService};

/// Scripted [`StackService`] that records every call it receives.
#[derive(Default)]
pub(crate) struct MockStackService {
    pub stacks: Vec<Stack>,
    pub edge_stacks: Vec<Stack>,
    pub file: String,
    pub created_id: i64,
    /// When set, every call fails with this backend message.
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockStackService {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(message) => Err(Error::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StackService for MockStackService {
    async fn get_stacks(&self) -> Result<Vec<Stack>> {
        self.record("get_stacks()".to_string())?;
        Ok(self.stacks.clone())
    }

    async fn get_stack_file(&self, id: i64) -> Result<String> {
        self.record(format!("get_stack_file({id})"))?;
        Ok(self.file.clone())
    }

    async fn create_stack(&self, name: &str, _file: &str, endpoint_id: i64) -> Result<i64> {
        self.record(format!("create_stack({name}, {endpoint_id})"))?;
        Ok(self.created_id)
    }

    async fn update_stack(
        &self,
        id: i64,
        _file: &str,
        endpoint_id: i64,
        pull_image: bool,
    ) -> Result<()> {
        self.record(format!("update_stack({id}, {endpoint_id}, {pull_image})"))
    }

    async fn start_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        self.record(format!("start_stack({id}, {endpoint_id})"))
    }

    async fn stop_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        self.record(format!("stop_stack({id}, {endpoint_id})"))
    }

    async fn delete_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        self.record(format!("delete_stack({id}, {endpoint_id})"))
    }

    async fn get_edge_stacks(&self) -> Result<Vec<Stack>> {
        self.record("get_edge_stacks()".to_string())?;
        Ok(self.edge_stacks.clone())
    }

    async fn get_edge_stack_file(&self, id: i64) -> Result<String> {
        self.record(format!("get_edge_stack_file({id})"))?;
        Ok(self.file.clone())
    }

    async fn create_edge_stack(&self, name: &str, _file: &str, group_ids: &[i64]) -> Result<i64> {
        self.record(format!("create_edge_stack({name}, {group_ids:?})"))?;
        Ok(self.created_id)
    }

    async fn update_edge_stack(&self, id: i64, _file: &str, group_ids: &[i64]) -> Result<()> {
        self.record(format!("update_edge_stack({id}, {group_ids:?})"))
    }
}
