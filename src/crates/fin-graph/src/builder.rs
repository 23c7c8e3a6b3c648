//! `GraphBuilder::compile()` -- the one place structural mistakes (a
//! dangling edge, an unregistered entry node, an unreachable node) are
//! caught before a thread ever runs.

use crate::command::{END, INTERRUPT};
use crate::error::SchedulerError;
use crate::types::{Node, Subgraph};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

#[derive(Default)]
pub struct GraphBuilder {
    nodes: HashMap<String, Node>,
    edges: HashMap<String, Vec<String>>,
    subgraphs: Vec<Subgraph>,
    entry: Option<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(mut self, node: Node) -> Self {
        self.edges.entry(node.node_id.clone()).or_default();
        self.nodes.insert(node.node_id.clone(), node);
        self
    }

    /// Declare a possible transition. This is used only for structural
    /// validation at compile time -- the node's actual `Command` at
    /// runtime decides which declared edge is taken.
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.entry(from.into()).or_default().push(to.into());
        self
    }

    pub fn add_subgraph(mut self, subgraph: Subgraph) -> Self {
        self.subgraphs.push(subgraph);
        self
    }

    pub fn with_entry(mut self, node_id: impl Into<String>) -> Self {
        self.entry = Some(node_id.into());
        self
    }

    pub fn compile(self) -> Result<GraphCompiled, SchedulerError> {
        let entry = self
            .entry
            .ok_or_else(|| SchedulerError::GraphCompiled("no entry node declared".into()))?;

        if !self.nodes.contains_key(&entry) {
            return Err(SchedulerError::GraphCompiled(format!("entry node {entry:?} is not registered")));
        }

        for (from, targets) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(SchedulerError::GraphCompiled(format!("edge source {from:?} is not a registered node")));
            }
            for target in targets {
                if target != END && target != INTERRUPT && !self.nodes.contains_key(target) {
                    return Err(SchedulerError::GraphCompiled(format!(
                        "edge {from:?} -> {target:?} targets an unregistered node"
                    )));
                }
            }
        }

        let reachable = reachable_from(&entry, &self.edges);
        for node_id in self.nodes.keys() {
            if !reachable.contains(node_id) {
                return Err(SchedulerError::GraphCompiled(format!("node {node_id:?} is unreachable from the entry node")));
            }
        }

        for subgraph in &self.subgraphs {
            if !self.nodes.contains_key(&subgraph.entry) {
                return Err(SchedulerError::GraphCompiled(format!(
                    "subgraph {:?} entry {:?} is not a registered node",
                    subgraph.name, subgraph.entry
                )));
            }
            for terminal in &subgraph.terminals {
                if !self.nodes.contains_key(terminal) {
                    return Err(SchedulerError::GraphCompiled(format!(
                        "subgraph {:?} terminal {:?} is not a registered node",
                        subgraph.name, terminal
                    )));
                }
            }
        }

        Ok(GraphCompiled {
            nodes: Arc::new(self.nodes),
            edges: Arc::new(self.edges),
            subgraphs: Arc::new(self.subgraphs),
            entry,
        })
    }
}

fn reachable_from(entry: &str, edges: &HashMap<String, Vec<String>>) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([entry.to_string()]);
    seen.insert(entry.to_string());
    while let Some(node) = queue.pop_front() {
        for target in edges.get(&node).into_iter().flatten() {
            if target != END && target != INTERRUPT && seen.insert(target.clone()) {
                queue.push_back(target.clone());
            }
        }
    }
    seen
}

/// A validated, immutable graph ready to be driven by the scheduler.
#[derive(Clone)]
pub struct GraphCompiled {
    pub nodes: Arc<HashMap<String, Node>>,
    pub edges: Arc<HashMap<String, Vec<String>>>,
    pub subgraphs: Arc<Vec<Subgraph>>,
    pub entry: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::retry::RetryPolicy;
    use std::sync::Arc as StdArc;

    fn noop_node(id: &str) -> Node {
        Node {
            node_id: id.to_string(),
            agent_id: "test".to_string(),
            retry_policy: RetryPolicy::default(),
            run: StdArc::new(|_state| Box::pin(async { Ok(Command::end()) })),
        }
    }

    #[test]
    fn compile_rejects_a_dangling_edge() {
        let result = GraphBuilder::new()
            .add_node(noop_node("intent"))
            .add_edge("intent", "missing")
            .with_entry("intent")
            .compile();
        assert!(matches!(result, Err(SchedulerError::GraphCompiled(_))));
    }

    #[test]
    fn compile_rejects_an_unreachable_node() {
        let result = GraphBuilder::new()
            .add_node(noop_node("intent"))
            .add_node(noop_node("orphan"))
            .add_edge("intent", END)
            .with_entry("intent")
            .compile();
        assert!(matches!(result, Err(SchedulerError::GraphCompiled(_))));
    }

    #[test]
    fn compile_accepts_a_well_formed_graph() {
        let result = GraphBuilder::new()
            .add_node(noop_node("intent"))
            .add_node(noop_node("debate"))
            .add_edge("intent", "debate")
            .add_edge("debate", END)
            .with_entry("intent")
            .compile();
        assert!(result.is_ok());
    }
}
