pub mod builder;
pub mod command;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod merge;
pub mod retry;
pub mod scheduler;
pub mod types;

pub use builder::{GraphBuilder, GraphCompiled};
pub use command::{Command, GotoTarget, END, INTERRUPT};
pub use config::SchedulerConfig;
pub use error::{InterruptError, Result, SchedulerError};
pub use interrupt::InterruptController;
pub use merge::merge_round;
pub use retry::RetryPolicy;
pub use scheduler::Scheduler;
pub use types::{Node, NodeFn, NodeStatus, Subgraph, Thread, ThreadState};
