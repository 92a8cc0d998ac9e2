//! Writer used to build protobuf payloads in tests.
use aidoku::alloc::Vec;

pub fn put_varint(buf: &mut Vec<u8>, mut value: u64) {
	while value >= 0x80 {
		buf.push((value as u8 & 0x7f) | 0x80);
		value >>= 7;
	}
	buf.push(value as u8);
}

pub fn put_key(buf: &mut Vec<u8>, field: u32, wire_type: u8) {
	put_varint(buf, (u64::from(field) << 3) | u64::from(wire_type));
}

#[derive(Debug, Default, Clone)]
pub struct Encoder {
	buf: Vec<u8>,
}

impl Encoder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn varint(mut self, field: u32, value: u64) -> Self {
		put_key(&mut self.buf, field, 0);
		put_varint(&mut self.buf, value);
		self
	}

	pub fn int32(self, field: u32, value: i32) -> Self {
		// negative values are sign-extended like the real encoder does
		self.varint(field, i64::from(value) as u64)
	}

	pub fn int64(self, field: u32, value: i64) -> Self {
		self.varint(field, value as u64)
	}

	pub fn fixed32(mut self, field: u32, value: u32) -> Self {
		put_key(&mut self.buf, field, 5);
		self.buf.extend_from_slice(&value.to_le_bytes());
		self
	}

	pub fn fixed64(mut self, field: u32, value: u64) -> Self {
		put_key(&mut self.buf, field, 1);
		self.buf.extend_from_slice(&value.to_le_bytes());
		self
	}

	pub fn bytes(mut self, field: u32, value: &[u8]) -> Self {
		put_key(&mut self.buf, field, 2);
		put_varint(&mut self.buf, value.len() as u64);
		self.buf.extend_from_slice(value);
		self
	}

	pub fn string(self, field: u32, value: &str) -> Self {
		self.bytes(field, value.as_bytes())
	}

	pub fn message(self, field: u32, value: Encoder) -> Self {
		self.bytes(field, &value.buf)
	}

	/// Appends bytes as they are, for malformed payloads.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
