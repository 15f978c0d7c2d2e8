use serde::{Deserialize, Serialize};

/// A decoded pprof profile, as described by `profile.proto`.
///
/// The same struct is the target of both decoders: prost reads the binary
/// protobuf encoding, serde reads the JSON export. Only the messages the
/// call-tree engine needs are modeled; unknown protobuf fields (mappings,
/// labels, comments) are skipped by prost and unknown JSON keys by serde.
///
/// Every `i64` "index" field below refers to a position in `string_table`,
/// whose entry 0 is always the empty string.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    /// Semantics of each column of `Sample::value`.
    #[prost(message, repeated, tag = "1")]
    #[serde(alias = "sampleTypes")]
    pub sample_type: Vec<ValueType>,
    #[prost(message, repeated, tag = "2")]
    #[serde(alias = "samples")]
    pub sample: Vec<Sample>,
    #[prost(message, repeated, tag = "4")]
    #[serde(alias = "locations")]
    pub location: Vec<Location>,
    #[prost(message, repeated, tag = "5")]
    #[serde(alias = "functions")]
    pub function: Vec<Function>,
    #[prost(string, repeated, tag = "6")]
    pub string_table: Vec<String>,
    /// Informational; not used by aggregation.
    #[prost(int64, tag = "10")]
    pub duration_nanos: i64,
    /// The kind of events between samples, e.g. `["cpu", "nanoseconds"]`
    /// or `["space", "bytes"]`.
    #[prost(message, optional, tag = "11")]
    pub period_type: Option<ValueType>,
    #[prost(int64, tag = "12")]
    pub period: i64,
}

/// Type and unit of a value, both as string-table indices.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueType {
    #[prost(int64, tag = "1")]
    pub r#type: i64,
    #[prost(int64, tag = "2")]
    pub unit: i64,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sample {
    /// Location ids, leaf first.
    #[prost(uint64, repeated, tag = "1")]
    #[serde(alias = "locationIds")]
    pub location_id: Vec<u64>,
    /// One entry per `Profile::sample_type`.
    #[prost(int64, repeated, tag = "2")]
    #[serde(alias = "values")]
    pub value: Vec<i64>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub mapping_id: u64,
    #[prost(uint64, tag = "3")]
    pub address: u64,
    /// Source lines at this location. More than one entry means inlining:
    /// `line[0]` is the innermost inlined callee, the last entry is the
    /// caller the code was inlined into.
    #[prost(message, repeated, tag = "4")]
    #[serde(alias = "lines")]
    pub line: Vec<Line>,
    #[prost(bool, tag = "5")]
    pub is_folded: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Line {
    /// 0 means "no function".
    #[prost(uint64, tag = "1")]
    pub function_id: u64,
    #[prost(int64, tag = "2")]
    pub line: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Function {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(int64, tag = "2")]
    pub name: i64,
    #[prost(int64, tag = "3")]
    pub system_name: i64,
    #[prost(int64, tag = "4")]
    #[serde(alias = "fileName")]
    pub filename: i64,
    #[prost(int64, tag = "5")]
    pub start_line: i64,
}
