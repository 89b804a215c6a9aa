//! Per-call diagnostics hook. Observers see a call start and end; they never steer it.

use tonic::metadata::{KeyAndValueRef, KeyRef, MetadataMap};
use tracing::{debug, enabled, trace, warn, Level};

use crate::error::DispatchError;

use super::metadata;
use super::proto::{CommonRequestHeader, FunctionRequestHeader};

/// What a call looked like when it arrived.
#[derive(Clone, Debug)]
pub struct CallInfo<'a> {
    pub function: Option<FunctionRequestHeader>,
    pub common: Option<CommonRequestHeader>,
    metadata: &'a MetadataMap,
}

impl<'a> CallInfo<'a> {
    pub fn from_metadata(metadata: &'a MetadataMap) -> Self {
        Self {
            function: metadata::function_header(metadata).ok(),
            common: metadata::common_header(metadata),
            metadata,
        }
    }

    /// Metadata keys in arrival order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        let metadata: &'a MetadataMap = self.metadata;
        metadata.keys().map(|key| match key {
            KeyRef::Ascii(key) => key.as_str(),
            KeyRef::Binary(key) => key.as_str(),
        })
    }

    /// Every metadata entry. Binary values are not rendered.
    pub fn headers(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> {
        let metadata: &'a MetadataMap = self.metadata;
        metadata.iter().map(|entry| match entry {
            KeyAndValueRef::Ascii(key, value) => {
                let value = value.to_str().unwrap_or("<non-ascii>");
                (key.as_str(), Some(value))
            }
            KeyAndValueRef::Binary(key, _) => (key.as_str(), None),
        })
    }
}

/// How a call finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSummary {
    pub function: &'static str,
    pub batches: usize,
    pub rows: usize,
}

pub type CallOutcome = Result<CallSummary, DispatchError>;

pub trait CallObserver: Send + Sync {
    fn on_call_start(&self, _call: &CallInfo<'_>) {}

    fn on_call_end(&self, _call: &CallInfo<'_>, _outcome: &CallOutcome) {}
}

/// Logs calls through `tracing`; header dumps only when `trace` is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_call_start(&self, call: &CallInfo<'_>) {
        let function_id = call.function.as_ref().map(|h| h.function_id);
        debug!(function_id, "ExecuteFunction called");

        if !enabled!(Level::TRACE) {
            return;
        }
        for (key, value) in call.headers() {
            trace!("{key} : {}", value.unwrap_or("<binary>"));
        }
        if let Some(header) = &call.function {
            trace!(
                function_id = header.function_id,
                version = %header.version,
                "FunctionRequestHeader"
            );
        }
        if let Some(common) = &call.common {
            trace!(
                app_id = %common.app_id,
                user_id = %common.user_id,
                cardinality = common.cardinality,
                "CommonRequestHeader"
            );
        }
    }

    fn on_call_end(&self, _call: &CallInfo<'_>, outcome: &CallOutcome) {
        match outcome {
            Ok(summary) => debug!(
                function = summary.function,
                batches = summary.batches,
                rows = summary.rows,
                "ExecuteFunction completed"
            ),
            Err(err) => warn!(error = %err, "ExecuteFunction failed"),
        }
    }
}
