//! Server-side extension plumbing: wire messages, function table and the call dispatcher.

pub mod codec;
pub mod dispatch;
pub mod metadata;
pub mod observer;
pub mod proto;
pub mod registry;
pub mod sink;

pub use dispatch::Dispatcher;
pub use observer::{CallInfo, CallObserver, CallOutcome, CallSummary, TracingObserver};
pub use registry::{ConnectorInfo, FunctionDescriptor, FunctionKind, FunctionRegistry};
pub use sink::{ChannelSink, Outbound, ResponseSink};
