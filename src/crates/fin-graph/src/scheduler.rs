//! The superstep scheduler: `start`, `resume`, `state`, `history`.
//!
//! A run proceeds in rounds. Each round pops the whole ready-set
//! (fanned-out nodes run concurrently on independent tasks), integrates
//! every returned `Command`, persists a checkpoint, flushes events, and
//! repeats until the ready-set is empty or an interrupt/END/error is
//! produced. Nodes never touch the checkpoint store or the event bus
//! directly -- only this module does.

use crate::builder::GraphCompiled;
use crate::command::{Command, AGENT_OUTPUT_KEY};
use crate::config::SchedulerConfig;
use crate::error::{InterruptError, Result, SchedulerError};
use crate::interrupt::InterruptController;
use crate::merge::merge_round;
use crate::types::{NodeStatus, Thread, ThreadState};
use fin_checkpoint::{Checkpoint, CheckpointConfig, CheckpointMetadata, CheckpointSaver, CheckpointSource};
use fin_events::{AgentOutputEnvelope, AgentStatus, EventBus, EventPayload, EventStream, InterruptRequest, LifecycleStatus};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

pub struct Scheduler {
    graph: GraphCompiled,
    checkpointer: Arc<dyn CheckpointSaver>,
    events: Arc<EventBus>,
    config: SchedulerConfig,
    active: parking_lot::Mutex<HashSet<String>>,
}

impl Scheduler {
    pub fn new(graph: GraphCompiled, checkpointer: Arc<dyn CheckpointSaver>, events: Arc<EventBus>, config: SchedulerConfig) -> Arc<Self> {
        Arc::new(Self { graph, checkpointer, events, config, active: parking_lot::Mutex::new(HashSet::new()) })
    }

    #[instrument(skip(self, initial_message))]
    pub async fn start(self: &Arc<Self>, thread_id: &str, initial_message: Value) -> Result<EventStream> {
        self.begin_run(thread_id)?;

        let mut thread = match self.load_thread(thread_id).await? {
            Some(existing) if existing.is_running => {
                self.end_run(thread_id);
                return Err(SchedulerError::ThreadAlreadyRunning(thread_id.to_string()));
            }
            Some(existing) => existing,
            None => Thread::new(thread_id, self.graph.entry.clone()),
        };

        thread.messages.push(initial_message.clone());
        if let Value::Object(ref mut map) = thread.state {
            map.insert("messages".to_string(), Value::Array(thread.messages.clone()));
        } else {
            thread.state = json!({"messages": thread.messages.clone()});
        }
        thread.ready = vec![self.graph.entry.clone()];
        thread.is_running = true;
        thread.terminal = false;

        self.persist(&mut thread, CheckpointSource::Input, 0, vec![]).await?;
        self.events.publish(thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Running });

        let stream = self.events.subscribe(thread_id, Some(thread.last_seq_id));
        let this = Arc::clone(self);
        let tid = thread_id.to_string();
        tokio::spawn(async move { this.drive(tid).await });
        Ok(stream)
    }

    #[instrument(skip(self, resume_payload))]
    pub async fn resume(self: &Arc<Self>, thread_id: &str, resume_payload: Value) -> Result<EventStream> {
        let mut thread = self
            .load_thread(thread_id)
            .await?
            .ok_or_else(|| SchedulerError::UnknownThread(thread_id.to_string()))?;

        let request = thread
            .pending_interrupt
            .clone()
            .ok_or_else(|| InterruptError::NoPendingInterrupt(thread_id.to_string()))?;
        let node_id = thread.pending_interrupt_node.clone().expect("pending_interrupt implies a recorded node");

        let validated = InterruptController::validate_resume(&request, &resume_payload)?;

        self.begin_run(thread_id)?;

        thread.pending_interrupt = None;
        thread.pending_interrupt_node = None;
        thread.ready = vec![node_id];
        thread.is_running = true;
        if let Value::Object(ref mut map) = thread.state {
            map.insert("resume".to_string(), validated);
        } else {
            thread.state = json!({"resume": validated});
        }

        self.persist(&mut thread, CheckpointSource::Update, 0, vec![]).await?;
        self.events.publish(thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Running });

        let stream = self.events.subscribe(thread_id, Some(thread.last_seq_id));
        let this = Arc::clone(self);
        let tid = thread_id.to_string();
        tokio::spawn(async move { this.drive(tid).await });
        Ok(stream)
    }

    pub async fn state(&self, thread_id: &str) -> Result<ThreadState> {
        let thread = self
            .load_thread(thread_id)
            .await?
            .ok_or_else(|| SchedulerError::UnknownThread(thread_id.to_string()))?;
        Ok(thread.snapshot())
    }

    /// Reverse-chronological, bounded page of prior messages.
    pub async fn history(&self, thread_id: &str, before: Option<usize>, page_size: usize) -> Result<Vec<Value>> {
        let thread = self
            .load_thread(thread_id)
            .await?
            .ok_or_else(|| SchedulerError::UnknownThread(thread_id.to_string()))?;
        let end = before.unwrap_or(thread.messages.len()).min(thread.messages.len());
        let start = end.saturating_sub(page_size);
        Ok(thread.messages[start..end].iter().rev().cloned().collect())
    }

    fn begin_run(&self, thread_id: &str) -> Result<()> {
        let mut active = self.active.lock();
        if !active.insert(thread_id.to_string()) {
            return Err(SchedulerError::ThreadAlreadyRunning(thread_id.to_string()));
        }
        Ok(())
    }

    fn end_run(&self, thread_id: &str) {
        self.active.lock().remove(thread_id);
    }

    async fn drive(self: Arc<Self>, thread_id: String) {
        loop {
            let mut thread = match self.load_thread(&thread_id).await {
                Ok(Some(t)) => t,
                _ => {
                    self.end_run(&thread_id);
                    return;
                }
            };

            if thread.ready.is_empty() {
                thread.is_running = false;
                thread.terminal = true;
                let _ = self.persist(&mut thread, CheckpointSource::Loop, 0, vec![]).await;
                self.events.publish(&thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Done });
                self.end_run(&thread_id);
                return;
            }

            let ready = std::mem::take(&mut thread.ready);
            let mut join_set = JoinSet::new();
            for node_id in &ready {
                let Some(node) = self.graph.nodes.get(node_id).cloned() else {
                    warn!(node_id = %node_id, "ready node vanished from compiled graph");
                    continue;
                };
                let input = thread.state.clone();
                let events = Arc::clone(&self.events);
                let tid = thread_id.clone();
                let timeout = self.config.node_default_timeout;
                join_set.spawn(async move { execute_node(node, input, events, tid, timeout).await });
            }

            let mut commands: Vec<(String, Command)> = Vec::new();
            let mut failure: Option<(String, SchedulerError)> = None;
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(Ok(pair)) => commands.push(pair),
                    Ok(Err(pair)) => failure = Some(pair),
                    Err(join_err) => failure = Some(("<join>".to_string(), SchedulerError::TransientIo(join_err.to_string()))),
                }
            }

            for node_id in &ready {
                thread.node_statuses.insert(node_id.clone(), NodeStatus::Done);
            }

            for (_, cmd) in &commands {
                if let Some(reference) = extract_agent_output(cmd).and_then(|output| output.reference) {
                    thread.agent_outputs.push(reference);
                }
            }

            if let Some((node_id, error)) = failure {
                thread.node_statuses.insert(node_id.clone(), NodeStatus::Error);
                thread.is_running = false;
                thread.terminal = true;
                let _ = self.persist(&mut thread, CheckpointSource::Loop, 0, vec![]).await;
                self.events.publish(
                    &thread_id,
                    &node_id,
                    EventPayload::Error { message: error.to_string(), error_code: error.error_code().to_string(), node: node_id.clone() },
                );
                self.events.publish(&thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Error });
                self.end_run(&thread_id);
                return;
            }

            if let Some((node_id, cmd)) = commands.iter().find(|(_, c)| c.is_interrupt()) {
                let parsed: std::result::Result<InterruptRequest, _> = serde_json::from_value(cmd.update.clone().unwrap_or_default());
                let Ok(request) = parsed else {
                    let error = SchedulerError::NodeFailed {
                        node: node_id.clone(),
                        source: "node emitted a malformed InterruptRequest".into(),
                    };
                    thread.is_running = false;
                    thread.terminal = true;
                    let _ = self.persist(&mut thread, CheckpointSource::Loop, 0, vec![]).await;
                    self.events.publish(
                        &thread_id,
                        node_id,
                        EventPayload::Error { message: error.to_string(), error_code: error.error_code().to_string(), node: node_id.clone() },
                    );
                    self.events.publish(&thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Error });
                    self.end_run(&thread_id);
                    return;
                };
                thread.pending_interrupt = Some(request.clone());
                thread.pending_interrupt_node = Some(node_id.clone());
                thread.is_running = false;
                let source_node = node_id.clone();
                let _ = self.persist(&mut thread, CheckpointSource::Loop, 0, vec![]).await;
                self.events.publish(&thread_id, &source_node, EventPayload::InterruptRequest(request));
                self.events.publish(&thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Paused });
                self.end_run(&thread_id);
                return;
            }

            let updates: Vec<(String, Value)> = commands
                .iter()
                .filter_map(|(n, c)| {
                    c.update.clone().map(|mut u| {
                        if let Value::Object(map) = &mut u {
                            map.remove(AGENT_OUTPUT_KEY);
                        }
                        (n.clone(), u)
                    })
                })
                .collect();

            match merge_round(&thread.state, updates) {
                Ok(merged) => thread.state = merged,
                Err(error) => {
                    thread.is_running = false;
                    thread.terminal = true;
                    let _ = self.persist(&mut thread, CheckpointSource::Loop, 0, vec![]).await;
                    self.events.publish(
                        &thread_id,
                        "scheduler",
                        EventPayload::Error { message: error.to_string(), error_code: error.error_code().to_string(), node: "<merge>".to_string() },
                    );
                    self.events.publish(&thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Error });
                    self.end_run(&thread_id);
                    return;
                }
            }

            let mut next_ready: Vec<String> = Vec::new();
            let mut seen_targets = HashSet::new();
            let mut reached_end = false;
            for (_, cmd) in &commands {
                if cmd.is_end() {
                    reached_end = true;
                } else if !cmd.is_interrupt() {
                    for target in cmd.targets() {
                        if seen_targets.insert(target.clone()) {
                            next_ready.push(target);
                        }
                    }
                }
            }
            thread.ready = next_ready;

            if reached_end && thread.ready.is_empty() {
                thread.is_running = false;
                thread.terminal = true;
                let _ = self.persist(&mut thread, CheckpointSource::Loop, 0, vec![]).await;
                self.events.publish(&thread_id, "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Done });
                self.end_run(&thread_id);
                return;
            }

            if let Err(e) = self.persist(&mut thread, CheckpointSource::Loop, 0, ready.clone()).await {
                warn!(error = %e, "failed to persist checkpoint mid-run");
            }
        }
    }

    async fn load_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let Some(tuple) = self.checkpointer.get_tuple(&CheckpointConfig::latest(thread_id)).await? else {
            return Ok(None);
        };
        Ok(Some(thread_from_checkpoint(thread_id, &tuple.checkpoint)?))
    }

    async fn persist(&self, thread: &mut Thread, source: CheckpointSource, step: u64, nodes_run: Vec<String>) -> Result<()> {
        thread.last_seq_id = self.events.latest_seq(&thread.thread_id);
        thread.checkpoint_seq += 1;
        let checkpoint = checkpoint_from_thread(thread);
        let config = CheckpointConfig::latest(&thread.thread_id);
        self.checkpointer.put(&config, checkpoint, CheckpointMetadata { step, source, nodes_run }).await?;
        Ok(())
    }
}

#[instrument(skip(node, input, events), fields(node_id = %node.node_id))]
async fn execute_node(
    node: crate::types::Node,
    input: Value,
    events: Arc<EventBus>,
    thread_id: String,
    timeout: std::time::Duration,
) -> std::result::Result<(String, Command), (String, SchedulerError)> {
    events.publish(&thread_id, &node.node_id, EventPayload::AgentStatus { status: AgentStatus::Running, node: node.node_id.clone() });

    let mut attempt = 0;
    loop {
        let outcome = tokio::time::timeout(timeout, (node.run)(input.clone())).await;
        let error = match outcome {
            Ok(Ok(command)) => {
                if let Some(output) = extract_agent_output(&command) {
                    events.publish(&thread_id, &node.node_id, EventPayload::StateUpdate(output));
                }
                events.publish(&thread_id, &node.node_id, EventPayload::AgentStatus { status: AgentStatus::Done, node: node.node_id.clone() });
                return Ok((node.node_id.clone(), command));
            }
            Ok(Err(err)) => err,
            Err(_elapsed) => SchedulerError::NodeTimeout { node: node.node_id.clone() },
        };

        if node.retry_policy.should_retry(attempt, &error) {
            let delay = node.retry_policy.delay_for(attempt);
            attempt += 1;
            info!(node_id = %node.node_id, attempt, ?delay, "retrying node after transient error");
            tokio::time::sleep(delay).await;
            continue;
        }

        events.publish(&thread_id, &node.node_id, EventPayload::AgentStatus { status: AgentStatus::Error, node: node.node_id.clone() });
        return Err((node.node_id.clone(), error));
    }
}

fn extract_agent_output(command: &Command) -> Option<AgentOutputEnvelope> {
    let raw = command.update.as_ref()?.get(AGENT_OUTPUT_KEY)?;
    serde_json::from_value(raw.clone()).ok()
}

fn checkpoint_from_thread(thread: &Thread) -> Checkpoint {
    let state = json!({
        "created_at": thread.created_at,
        "state": thread.state,
        "messages": thread.messages,
        "node_statuses": thread.node_statuses,
        "agent_outputs": thread.agent_outputs,
        "ready": thread.ready,
        "is_running": thread.is_running,
        "pending_interrupt_node": thread.pending_interrupt_node,
    });
    Checkpoint {
        id: String::new(),
        ts: chrono::Utc::now(),
        checkpoint_seq: thread.checkpoint_seq,
        state,
        last_seq_id: thread.last_seq_id,
        pending_interrupt: thread
            .pending_interrupt
            .as_ref()
            .map(|r| serde_json::to_value(r).expect("InterruptRequest always serializes")),
        terminal: thread.terminal,
    }
}

fn thread_from_checkpoint(thread_id: &str, checkpoint: &Checkpoint) -> Result<Thread> {
    let blob = &checkpoint.state;
    Ok(Thread {
        thread_id: thread_id.to_string(),
        created_at: serde_json::from_value(blob["created_at"].clone()).unwrap_or_else(|_| chrono::Utc::now()),
        terminal: checkpoint.terminal,
        state: blob["state"].clone(),
        last_seq_id: checkpoint.last_seq_id,
        checkpoint_seq: checkpoint.checkpoint_seq,
        pending_interrupt: checkpoint
            .pending_interrupt
            .as_ref()
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(|e: serde_json::Error| SchedulerError::Checkpoint(fin_checkpoint::CheckpointError::Serialization(e)))?,
        pending_interrupt_node: serde_json::from_value(blob["pending_interrupt_node"].clone()).unwrap_or(None),
        messages: serde_json::from_value(blob["messages"].clone()).unwrap_or_default(),
        node_statuses: serde_json::from_value(blob["node_statuses"].clone()).unwrap_or_default(),
        agent_outputs: serde_json::from_value(blob["agent_outputs"].clone()).unwrap_or_default(),
        ready: serde_json::from_value(blob["ready"].clone()).unwrap_or_default(),
        is_running: blob["is_running"].as_bool().unwrap_or(false),
    })
}
