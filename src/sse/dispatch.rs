//! Stream dispatcher: runs one function call over a bidirectional row stream.
//!
//! Per call: decode the invocation header, resolve the function, then for each
//! inbound batch convert every row and send the outbound batch before pulling
//! the next one. Tensor functions announce their schema once, sized by the
//! first batch.

use futures::{pin_mut, Stream, StreamExt};
use tonic::metadata::MetadataMap;
use tonic::Status;
use tracing::trace;

use crate::error::DispatchError;
use crate::proj::GridTransform;

use super::metadata;
use super::observer::{CallInfo, CallObserver, CallOutcome, CallSummary, TracingObserver};
use super::proto::BundledRows;
use super::registry::{FunctionDescriptor, FunctionRegistry};
use super::sink::ResponseSink;

pub struct Dispatcher<O = TracingObserver> {
    registry: FunctionRegistry,
    transform: GridTransform,
    observer: O,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            registry: FunctionRegistry::default(),
            transform: GridTransform::british_national_grid(),
            observer: TracingObserver,
        }
    }
}

impl<O: CallObserver> Dispatcher<O> {
    pub fn with_observer<P: CallObserver>(self, observer: P) -> Dispatcher<P> {
        Dispatcher {
            registry: self.registry,
            transform: self.transform,
            observer,
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Run one call to completion.
    ///
    /// Returns once the inbound stream ends, or with the first fatal error. On a
    /// header or lookup failure nothing is read from `requests` and nothing is
    /// written to `sink`.
    pub async fn execute<S, K>(
        &self,
        metadata: &MetadataMap,
        requests: S,
        sink: &mut K,
    ) -> CallOutcome
    where
        S: Stream<Item = Result<BundledRows, Status>> + Send,
        K: ResponseSink + ?Sized,
    {
        let call = CallInfo::from_metadata(metadata);
        self.observer.on_call_start(&call);
        let outcome = self.run(metadata, requests, sink).await;
        self.observer.on_call_end(&call, &outcome);
        outcome
    }

    async fn run<S, K>(
        &self,
        metadata: &MetadataMap,
        requests: S,
        sink: &mut K,
    ) -> CallOutcome
    where
        S: Stream<Item = Result<BundledRows, Status>> + Send,
        K: ResponseSink + ?Sized,
    {
        let header = metadata::function_header(metadata)?;
        let function = self
            .registry
            .get(header.function_id)
            .ok_or(DispatchError::UnknownFunction(header.function_id))?;

        let mut summary = CallSummary {
            function: function.name,
            batches: 0,
            rows: 0,
        };
        let mut pending_description = function.table_description(0);

        pin_mut!(requests);
        while let Some(batch) = requests.next().await {
            let batch = batch?;
            if let Some(mut description) = pending_description.take() {
                description.number_of_rows = batch.rows.len() as i64;
                sink.send_table_description(description).await?;
            }

            let converted = self.convert_batch(function, &batch)?;
            trace!(
                function = function.name,
                rows = converted.rows.len(),
                "batch converted"
            );
            summary.batches += 1;
            summary.rows += converted.rows.len();
            sink.send_rows(converted).await?;
        }

        // A tensor call with no batches still tells the host its schema.
        if let Some(description) = pending_description {
            sink.send_table_description(description).await?;
        }

        Ok(summary)
    }

    /// Convert one batch, row i of the output coming from row i of the input.
    pub fn convert_batch(
        &self,
        function: &FunctionDescriptor,
        batch: &BundledRows,
    ) -> Result<BundledRows, DispatchError> {
        let rows = batch
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                function
                    .convert_row(&self.transform, row)
                    .map_err(|short| DispatchError::MalformedRow {
                        function: function.name,
                        row: index,
                        expected: short.expected,
                        found: short.found,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BundledRows { rows })
    }
}
