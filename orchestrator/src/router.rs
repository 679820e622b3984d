//! Static task-to-backend routing.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_backends::{AnthropicAdapter, BackendAdapter, OpenAiAdapter};
use tracing::info;

use crate::error::{AiError, Result};
use crate::task::TaskKind;

/// Mapping from task to backend adapter name, fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    routes: BTreeMap<TaskKind, String>,
}

impl RoutingTable {
    /// A table with no routes. Useful as a starting point for tests.
    pub fn empty() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Point `task` at the adapter called `backend`.
    pub fn with_route(mut self, task: TaskKind, backend: impl Into<String>) -> Self {
        self.routes.insert(task, backend.into());
        self
    }

    /// Every task routed to `backend`.
    pub fn uniform(backend: &str) -> Self {
        TaskKind::ALL
            .into_iter()
            .fold(Self::empty(), |table, task| table.with_route(task, backend))
    }

    pub fn get(&self, task: TaskKind) -> Option<&str> {
        self.routes.get(&task).map(String::as_str)
    }
}

impl Default for RoutingTable {
    /// Comparison and recommendation go to Anthropic; everything else to OpenAI.
    fn default() -> Self {
        Self::uniform(OpenAiAdapter::NAME)
            .with_route(TaskKind::ProductComparison, AnthropicAdapter::NAME)
            .with_route(TaskKind::PersonalizedRecommendation, AnthropicAdapter::NAME)
    }
}

/// Resolves a [`TaskKind`] to the adapter responsible for it.
///
/// Construction validates the whole table, so [`TaskRouter::route`] cannot fail.
#[derive(Clone)]
pub struct TaskRouter {
    routes: Vec<Arc<dyn BackendAdapter>>,
}

impl TaskRouter {
    /// Build a router from `table` over the given adapters.
    ///
    /// Fails if any task is unrouted, names an unknown adapter, or names an
    /// adapter that lacks the task's required capability.
    pub fn new(table: &RoutingTable, adapters: &[Arc<dyn BackendAdapter>]) -> Result<Self> {
        let mut by_name: HashMap<&str, &Arc<dyn BackendAdapter>> = HashMap::new();
        for adapter in adapters {
            if by_name.insert(adapter.name(), adapter).is_some() {
                return Err(AiError::Config(format!(
                    "duplicate backend name {:?}",
                    adapter.name()
                )));
            }
        }

        let mut routes = Vec::with_capacity(TaskKind::ALL.len());
        for task in TaskKind::ALL {
            let name = table
                .get(task)
                .ok_or_else(|| AiError::Routing(format!("no backend routed for {task}")))?;

            let adapter = by_name.get(name).ok_or_else(|| {
                AiError::Routing(format!("{task} is routed to unknown backend {name:?}"))
            })?;

            let capability = task.required_capability();
            if !adapter.supports(capability) {
                return Err(AiError::CapabilityNotSupported {
                    backend: name.to_string(),
                    capability,
                });
            }

            info!("Routing {task} to {name}");
            routes.push(Arc::clone(adapter));
        }

        Ok(Self { routes })
    }

    /// The adapter responsible for `task`.
    pub fn route(&self, task: TaskKind) -> &Arc<dyn BackendAdapter> {
        &self.routes[task.index()]
    }
}

impl std::fmt::Debug for TaskRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for task in TaskKind::ALL {
            map.entry(&task.as_str(), &self.route(task).name());
        }
        map.finish()
    }
}
