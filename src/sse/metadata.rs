//! Binary call metadata: the invocation header in, the table description out.

use prost::Message;
use tonic::metadata::{MetadataMap, MetadataValue};

use crate::error::DispatchError;

use super::proto::{CommonRequestHeader, FunctionRequestHeader, TableDescription};

pub const FUNCTION_REQUEST_HEADER: &str = "qlik-functionrequestheader-bin";
pub const COMMON_REQUEST_HEADER: &str = "qlik-commonrequestheader-bin";
pub const TABLE_DESCRIPTION_HEADER: &str = "qlik-tabledescription-bin";

fn decode_bin<M: Message + Default>(
    metadata: &MetadataMap,
    key: &str,
) -> Option<Result<M, String>> {
    let value = metadata.get_bin(key)?;
    let decoded = value
        .to_bytes()
        .map_err(|e| e.to_string())
        .and_then(|bytes| M::decode(bytes).map_err(|e| e.to_string()));
    Some(decoded)
}

/// Decode the function invocation header. Absent or undecodable is fatal for the call.
pub fn function_header(metadata: &MetadataMap) -> Result<FunctionRequestHeader, DispatchError> {
    decode_bin(metadata, FUNCTION_REQUEST_HEADER)
        .ok_or(DispatchError::MissingFunctionHeader)?
        .map_err(DispatchError::InvalidFunctionHeader)
}

/// Decode the common request header, if the host sent a readable one.
pub fn common_header(metadata: &MetadataMap) -> Option<CommonRequestHeader> {
    decode_bin(metadata, COMMON_REQUEST_HEADER)?.ok()
}

/// Response metadata carrying a tensor function's table description.
///
/// The transport sends this as the call's initial response metadata; see
/// [`Outbound::response_metadata`](super::sink::Outbound::response_metadata).
pub(crate) fn table_description_metadata(description: &TableDescription) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    metadata.insert_bin(
        TABLE_DESCRIPTION_HEADER,
        MetadataValue::from_bytes(&description.encode_to_vec()),
    );
    metadata
}

#[cfg(test)]
pub(crate) fn request_metadata(function_id: i32) -> MetadataMap {
    let header = FunctionRequestHeader {
        function_id,
        version: "1".to_string(),
    };
    let mut metadata = MetadataMap::new();
    metadata.insert_bin(
        FUNCTION_REQUEST_HEADER,
        MetadataValue::from_bytes(&header.encode_to_vec()),
    );
    metadata
}
