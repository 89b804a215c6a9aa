//! Protobuf messages of the server-side extension protocol.
//!
//! Declared by hand with `prost` derives, field tags matching the host's
//! `ServerSideExtension.proto`, so the crate builds without `protoc`.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DataType {
    String = 0,
    Numeric = 1,
    Dual = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FunctionType {
    Scalar = 0,
    Aggregation = 1,
    Tensor = 2,
}

/// A value slot holding a number, a string, or both.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Dual {
    #[prost(double, tag = "1")]
    pub num_data: f64,
    #[prost(string, tag = "2")]
    pub str_data: ::prost::alloc::string::String,
}

impl Dual {
    pub fn numeric(value: f64) -> Self {
        Self {
            num_data: value,
            str_data: String::new(),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Row {
    #[prost(message, repeated, tag = "1")]
    pub duals: ::prost::alloc::vec::Vec<Dual>,
}

/// One streamed batch of rows.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BundledRows {
    #[prost(message, repeated, tag = "1")]
    pub rows: ::prost::alloc::vec::Vec<Row>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionRequestHeader {
    #[prost(int32, tag = "1")]
    pub function_id: i32,
    #[prost(string, tag = "2")]
    pub version: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommonRequestHeader {
    #[prost(string, tag = "1")]
    pub app_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub user_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub cardinality: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FieldDescription {
    #[prost(enumeration = "DataType", tag = "1")]
    pub data_type: i32,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "3")]
    pub tags: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// Schema of a tensor function's output, sent once per call as response metadata.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TableDescription {
    #[prost(message, repeated, tag = "1")]
    pub fields: ::prost::alloc::vec::Vec<FieldDescription>,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub number_of_rows: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parameter {
    #[prost(enumeration = "DataType", tag = "1")]
    pub data_type: i32,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionDefinition {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(enumeration = "FunctionType", tag = "2")]
    pub function_type: i32,
    #[prost(enumeration = "DataType", tag = "3")]
    pub return_type: i32,
    #[prost(message, repeated, tag = "4")]
    pub params: ::prost::alloc::vec::Vec<Parameter>,
    #[prost(int32, tag = "5")]
    pub function_id: i32,
}

/// The manifest returned to the host's capability request.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Capabilities {
    #[prost(bool, tag = "1")]
    pub allow_script: bool,
    #[prost(message, repeated, tag = "2")]
    pub functions: ::prost::alloc::vec::Vec<FunctionDefinition>,
    #[prost(string, tag = "3")]
    pub plugin_identifier: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub plugin_version: ::prost::alloc::string::String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_function_header_wire_format() {
        // functionId = 4, version = "1"
        let bytes = [0x08, 0x04, 0x12, 0x01, b'1'];
        let header = FunctionRequestHeader::decode(&bytes[..]).unwrap();
        assert_eq!(header.function_id, 4);
        assert_eq!(header.version, "1");
    }

    #[test]
    fn test_table_description_wire_format() {
        let desc = TableDescription {
            fields: vec![FieldDescription {
                data_type: DataType::Numeric as i32,
                name: "Latitude".into(),
                tags: vec![],
            }],
            name: String::new(),
            number_of_rows: 3,
        };
        let bytes = desc.encode_to_vec();
        // field 3 (number_of_rows), varint 3 at the tail
        assert_eq!(&bytes[bytes.len() - 2..], &[0x18, 0x03]);
        assert_eq!(TableDescription::decode(bytes.as_slice()).unwrap(), desc);
    }
}
