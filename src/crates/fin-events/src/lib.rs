pub mod bus;
pub mod envelope;
pub mod error;

pub use bus::{EventBus, EventResult, EventStream};
pub use envelope::{
    AgentEvent, AgentOutputEnvelope, AgentStatus, EventPayload, InterruptRequest, LifecycleStatus,
    PROTOCOL_VERSION,
};
pub use error::EventBusError;
