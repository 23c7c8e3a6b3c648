//! A node's return value: where to go next and what state to merge in.
//! Nodes never touch the checkpoint store, the event bus, or the
//! artifact store directly -- every effect flows through a `Command`.

use fin_events::{AgentOutputEnvelope, InterruptRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel goto target: the run has reached its terminal node.
pub const END: &str = "__end__";

/// Sentinel goto target: the node is suspending the run for human
/// input. Paired with `update` carrying the serialized `InterruptRequest`.
pub const INTERRUPT: &str = "__interrupt__";

/// Reserved `update` key an agent's emitted `AgentOutputEnvelope` travels
/// under. The scheduler publishes `state.update` from it and strips it
/// before the round's updates are merged into thread state -- it never
/// reaches the persisted state tree.
pub const AGENT_OUTPUT_KEY: &str = "_agent_output";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GotoTarget {
    Node(String),
    Nodes(Vec<String>),
}

impl GotoTarget {
    pub fn targets(&self) -> Vec<String> {
        match self {
            GotoTarget::Node(n) => vec![n.clone()],
            GotoTarget::Nodes(ns) => ns.clone(),
        }
    }
}

impl From<&str> for GotoTarget {
    fn from(node: &str) -> Self {
        GotoTarget::Node(node.to_string())
    }
}

impl From<String> for GotoTarget {
    fn from(node: String) -> Self {
        GotoTarget::Node(node)
    }
}

impl From<Vec<String>> for GotoTarget {
    fn from(nodes: Vec<String>) -> Self {
        GotoTarget::Nodes(nodes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Command {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto: Option<GotoTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<Value>,
}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goto(target: impl Into<GotoTarget>) -> Self {
        Self { goto: Some(target.into()), update: None }
    }

    pub fn end() -> Self {
        Self::goto(END)
    }

    /// Suspend the run. The interrupt controller picks this up, persists
    /// it on the thread, and emits `interrupt.request`.
    pub fn interrupt(request: &InterruptRequest) -> Self {
        Self {
            goto: Some(GotoTarget::Node(INTERRUPT.to_string())),
            update: Some(serde_json::to_value(request).expect("InterruptRequest always serializes")),
        }
    }

    pub fn with_update(mut self, update: Value) -> Self {
        self.update = Some(update);
        self
    }

    /// Attach this round's `AgentOutputEnvelope` alongside any state
    /// update. Agents never publish to the event bus themselves -- this
    /// is how a node's orchestrator hands the scheduler what it should
    /// emit as `state.update`, ahead of that node's `agent.status=done`.
    pub fn with_output(mut self, output: &AgentOutputEnvelope) -> Self {
        let serialized = serde_json::to_value(output).expect("AgentOutputEnvelope always serializes");
        match &mut self.update {
            Some(Value::Object(map)) => {
                map.insert(AGENT_OUTPUT_KEY.to_string(), serialized);
            }
            Some(_) => {
                self.update = Some(serde_json::json!({ AGENT_OUTPUT_KEY: serialized }));
            }
            None => {
                self.update = Some(serde_json::json!({ AGENT_OUTPUT_KEY: serialized }));
            }
        }
        self
    }

    pub fn is_end(&self) -> bool {
        matches!(&self.goto, Some(GotoTarget::Node(n)) if n == END)
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(&self.goto, Some(GotoTarget::Node(n)) if n == INTERRUPT)
    }

    pub fn targets(&self) -> Vec<String> {
        self.goto.as_ref().map(GotoTarget::targets).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fan_out_goto_lists_every_target() {
        let cmd = Command::goto(vec!["news".to_string(), "technical".to_string()]);
        assert_eq!(cmd.targets(), vec!["news", "technical"]);
    }

    #[test]
    fn interrupt_command_carries_the_request_as_its_update() {
        let request = InterruptRequest {
            kind: "ticker_selection".into(),
            title: "Pick a ticker".into(),
            description: "Multiple matches".into(),
            data: json!({}),
            schema: json!({"properties": {"selected_symbol": {"enum": ["GOOG", "GOOGL"]}}}),
            ui_hints: json!({}),
        };
        let cmd = Command::interrupt(&request);
        assert!(cmd.is_interrupt());
        assert_eq!(cmd.update.unwrap()["type"], "ticker_selection");
    }

    #[test]
    fn with_output_nests_the_envelope_alongside_a_state_update() {
        let output = AgentOutputEnvelope {
            kind: "news.items_list".into(),
            version: "v1".into(),
            summary: "3 items".into(),
            preview: json!({"count": 3}),
            reference: None,
            error_logs: vec![],
        };
        let cmd = Command::goto("debate").with_update(json!({"news": {"count": 3}})).with_output(&output);
        let update = cmd.update.unwrap();
        assert_eq!(update["news"]["count"], 3);
        assert_eq!(update[AGENT_OUTPUT_KEY]["kind"], "news.items_list");
    }
}
