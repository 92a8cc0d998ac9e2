use aidoku::{
	AidokuError,
	alloc::{String, string::ToString},
};
use thiserror::Error;

use crate::proto::WireType;

/// Failures while reading a protobuf payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
	#[error("unexpected end of payload")]
	UnexpectedEof,

	#[error("varint exceeds 10 bytes")]
	VarintOverflow,

	#[error("invalid field number {0}")]
	InvalidFieldNumber(u64),

	#[error("unsupported wire type {0}")]
	UnsupportedWireType(u8),

	#[error("field {field} has wire type {found:?}, expected {expected:?}")]
	WireTypeMismatch {
		field: u32,
		expected: WireType,
		found: WireType,
	},

	#[error("string field is not valid utf-8")]
	InvalidUtf8,

	#[error("response carries both a success and an error result")]
	AmbiguousEnvelope,

	#[error("response carries neither a success nor an error result")]
	EmptyEnvelope,

	#[error("success result carries {0} views, expected exactly one")]
	ViewCount(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MangaPlusError {
	#[error("Failed to decode response: {0}")]
	Decode(#[from] DecodeError),

	/// The API answered with an error result; holds the localized popup body.
	#[error("{0}")]
	UpstreamRejected(String),

	#[error("Response is missing the {0} view")]
	UnexpectedView(&'static str),

	/// Holds the rejected key; it is left out of the message.
	#[error("Invalid encryption key")]
	InvalidEncryptionKey(String),
}

impl From<MangaPlusError> for AidokuError {
	fn from(value: MangaPlusError) -> Self {
		AidokuError::Message(value.to_string())
	}
}

impl From<DecodeError> for AidokuError {
	fn from(value: DecodeError) -> Self {
		MangaPlusError::from(value).into()
	}
}
