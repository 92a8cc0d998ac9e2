//! Minimal reader for the protobuf wire format used by the MANGA Plus API.
//!
//! Messages implement [`Message`] by matching on field numbers; everything the
//! schema does not name is skipped.
use aidoku::alloc::{String, Vec};

use crate::error::DecodeError;

type Result<T> = core::result::Result<T, DecodeError>;

const MAX_VARINT_LEN: usize = 10;

const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
	Varint,
	Fixed64,
	LengthDelimited,
	StartGroup,
	EndGroup,
	Fixed32,
}

impl TryFrom<u8> for WireType {
	type Error = DecodeError;

	fn try_from(value: u8) -> Result<Self> {
		match value {
			0 => Ok(Self::Varint),
			1 => Ok(Self::Fixed64),
			2 => Ok(Self::LengthDelimited),
			3 => Ok(Self::StartGroup),
			4 => Ok(Self::EndGroup),
			5 => Ok(Self::Fixed32),
			other => Err(DecodeError::UnsupportedWireType(other)),
		}
	}
}

pub struct Reader<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self { buf, pos: 0 }
	}

	pub fn is_empty(&self) -> bool {
		self.pos >= self.buf.len()
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8]> {
		let end = self
			.pos
			.checked_add(len)
			.filter(|end| *end <= self.buf.len())
			.ok_or(DecodeError::UnexpectedEof)?;
		let bytes = &self.buf[self.pos..end];
		self.pos = end;
		Ok(bytes)
	}

	pub fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0u64;
		for i in 0..MAX_VARINT_LEN {
			let byte = *self.buf.get(self.pos).ok_or(DecodeError::UnexpectedEof)?;
			self.pos += 1;
			value |= u64::from(byte & 0x7f) << (7 * i);
			if byte & 0x80 == 0 {
				return Ok(value);
			}
		}
		Err(DecodeError::VarintOverflow)
	}

	/// Reads a field key, returning the field number and its wire type.
	pub fn read_key(&mut self) -> Result<(u32, WireType)> {
		let key = self.read_varint()?;
		let wire_type = WireType::try_from((key & 0x07) as u8)?;
		let field = key >> 3;
		if field == 0 || field > MAX_FIELD_NUMBER {
			return Err(DecodeError::InvalidFieldNumber(field));
		}
		Ok((field as u32, wire_type))
	}

	pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
		let len = usize::try_from(self.read_varint()?).map_err(|_| DecodeError::UnexpectedEof)?;
		self.take(len)
	}

	pub fn read_string(&mut self) -> Result<String> {
		let bytes = self.read_bytes()?;
		core::str::from_utf8(bytes)
			.map(String::from)
			.map_err(|_| DecodeError::InvalidUtf8)
	}

	pub fn read_int32(&mut self) -> Result<i32> {
		// negative int32 values are sign-extended to 10 bytes on the wire
		Ok(self.read_varint()? as i32)
	}

	pub fn read_int64(&mut self) -> Result<i64> {
		Ok(self.read_varint()? as i64)
	}

	/// Merges a length-delimited sub-message into `message`.
	pub fn merge_message<M: Message>(&mut self, message: &mut M) -> Result<()> {
		let bytes = self.read_bytes()?;
		message.merge(bytes)
	}

	pub fn read_message<M: Message>(&mut self) -> Result<M> {
		let mut message = M::default();
		self.merge_message(&mut message)?;
		Ok(message)
	}

	pub fn skip(&mut self, wire_type: WireType) -> Result<()> {
		match wire_type {
			WireType::Varint => self.read_varint().map(|_| ()),
			WireType::Fixed64 => self.take(8).map(|_| ()),
			WireType::LengthDelimited => self.read_bytes().map(|_| ()),
			WireType::Fixed32 => self.take(4).map(|_| ()),
			WireType::StartGroup => Err(DecodeError::UnsupportedWireType(3)),
			WireType::EndGroup => Err(DecodeError::UnsupportedWireType(4)),
		}
	}
}

/// Fails unless `found` is the wire type the schema declares for `field`.
pub fn expect(field: u32, expected: WireType, found: WireType) -> Result<()> {
	if expected == found {
		Ok(())
	} else {
		Err(DecodeError::WireTypeMismatch {
			field,
			expected,
			found,
		})
	}
}

pub trait Message: Default {
	/// Consumes the value of `field` from `reader`.
	fn merge_field(&mut self, field: u32, wire_type: WireType, reader: &mut Reader<'_>)
	-> Result<()>;

	fn merge(&mut self, buf: &[u8]) -> Result<()> {
		let mut reader = Reader::new(buf);
		while !reader.is_empty() {
			let (field, wire_type) = reader.read_key()?;
			self.merge_field(field, wire_type, &mut reader)?;
		}
		Ok(())
	}

	fn decode(buf: &[u8]) -> Result<Self> {
		let mut message = Self::default();
		message.merge(buf)?;
		Ok(message)
	}
}

/// Field helpers shared by the message definitions.
pub mod field {
	use super::*;

	pub fn string(
		target: &mut String,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::LengthDelimited, wire_type)?;
		*target = reader.read_string()?;
		Ok(())
	}

	pub fn optional_string(
		target: &mut Option<String>,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::LengthDelimited, wire_type)?;
		*target = Some(reader.read_string()?);
		Ok(())
	}

	pub fn int32(
		target: &mut i32,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::Varint, wire_type)?;
		*target = reader.read_int32()?;
		Ok(())
	}

	pub fn int64(
		target: &mut i64,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::Varint, wire_type)?;
		*target = reader.read_int64()?;
		Ok(())
	}

	pub fn message<M: Message>(
		target: &mut M,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::LengthDelimited, wire_type)?;
		reader.merge_message(target)
	}

	pub fn optional_message<M: Message>(
		target: &mut Option<M>,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::LengthDelimited, wire_type)?;
		reader.merge_message(target.get_or_insert_with(M::default))
	}

	pub fn repeated_message<M: Message>(
		target: &mut Vec<M>,
		field: u32,
		wire_type: WireType,
		reader: &mut Reader<'_>,
	) -> Result<()> {
		expect(field, WireType::LengthDelimited, wire_type)?;
		target.push(reader.read_message()?);
		Ok(())
	}
}

#[cfg(test)]
pub mod encode;
