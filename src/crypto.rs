use aidoku::alloc::{String, Vec};

use crate::error::MangaPlusError;

pub const ENCRYPTION_KEY_PARAM: &str = "encryptionKey";

/// Reads `key` as consecutive two-digit hex bytes; a trailing single digit is
/// its own byte.
pub fn keystream(key: &str) -> Result<Vec<u8>, MangaPlusError> {
	let invalid = || MangaPlusError::InvalidEncryptionKey(key.into());
	if key.is_empty() || !key.bytes().all(|byte| byte.is_ascii_hexdigit()) {
		return Err(invalid());
	}
	key.as_bytes()
		.chunks(2)
		.map(|chunk| {
			core::str::from_utf8(chunk)
				.ok()
				.and_then(|digits| u8::from_str_radix(digits, 16).ok())
				.ok_or_else(invalid)
		})
		.collect()
}

/// XORs `data` with the keystream of `key`. Applying it twice restores the input.
pub fn decrypt(key: &str, data: &[u8]) -> Result<Vec<u8>, MangaPlusError> {
	let key_stream = keystream(key)?;
	Ok(data
		.iter()
		.zip(key_stream.iter().cycle())
		.map(|(byte, key)| byte ^ key)
		.collect())
}

/// Removes every `encryptionKey` query parameter from `url`, returning the
/// cleaned url and the first key found.
///
/// A key appended with `&` to a url without a query is found as well.
pub fn scrub_url(url: &str) -> (String, Option<String>) {
	let (base, fragment) = match url.find('#') {
		Some(idx) => url.split_at(idx),
		None => (url, ""),
	};
	let Some((path, query, separator)) = base
		.split_once('?')
		.map(|(path, query)| (path, query, '?'))
		.or_else(|| base.split_once('&').map(|(path, query)| (path, query, '&')))
	else {
		return (url.into(), None);
	};

	let mut key = None;
	let mut kept = Vec::new();
	for param in query.split('&') {
		let (name, value) = param.split_once('=').unwrap_or((param, ""));
		if name == ENCRYPTION_KEY_PARAM {
			if key.is_none() {
				key = Some(String::from(value));
			}
		} else if !param.is_empty() {
			kept.push(param);
		}
	}
	if key.is_none() {
		return (url.into(), None);
	}

	let mut scrubbed = String::from(path);
	if !kept.is_empty() {
		scrubbed.push(separator);
		scrubbed.push_str(&kept.join("&"));
	}
	scrubbed.push_str(fragment);
	(scrubbed, key)
}

/// A page image body after the post-fetch transform.
#[derive(Debug, PartialEq, Eq)]
pub enum ImageBody {
	/// No key was captured; the fetched bytes are the image.
	Passthrough(Vec<u8>),
	/// Plain JPEG bytes recovered with the captured key.
	Decrypted(Vec<u8>),
}

/// An image fetch whose key has been taken out of the url before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFetch {
	pub url: String,
	pub key: Option<String>,
}

impl ImageFetch {
	pub fn new(url: &str) -> Self {
		let (url, key) = scrub_url(url);
		Self { url, key }
	}
}

/// Post-fetch transform: decrypts `body` when a key was captured, otherwise
/// hands it back untouched.
pub fn decrypt_image(key: Option<&str>, body: Vec<u8>) -> Result<ImageBody, MangaPlusError> {
	match key {
		Some(key) => Ok(ImageBody::Decrypted(decrypt(key, &body)?)),
		None => Ok(ImageBody::Passthrough(body)),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku::alloc::vec;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn keystream_pairs() {
		assert_eq!(keystream("1a2b3c"), Ok(vec![0x1a, 0x2b, 0x3c]));
		assert_eq!(keystream("FF00"), Ok(vec![0xff, 0x00]));
	}

	#[aidoku_test]
	fn keystream_trailing_digit() {
		assert_eq!(keystream("1a2"), Ok(vec![0x1a, 0x02]));
		assert_eq!(keystream("f"), Ok(vec![0x0f]));
	}

	#[aidoku_test]
	fn keystream_rejects_garbage() {
		assert!(keystream("").is_err());
		assert!(keystream("zz").is_err());
		assert!(keystream("1a+b").is_err());
		assert!(keystream("1aé").is_err());
	}

	#[aidoku_test]
	fn decrypt_cycles_key() {
		let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0xff];
		assert_eq!(
			decrypt("0102", &data),
			Ok(vec![0x01, 0x02, 0x01, 0x02, 0x01, 0xfd])
		);
	}

	#[aidoku_test]
	fn decrypt_is_involution() {
		let key = "c3a1f07e9b2d";
		let data: Vec<u8> = (0..=255u8).chain(0..=40u8).collect();
		let encrypted = decrypt(key, &data).unwrap();
		assert_ne!(encrypted, data);
		assert_eq!(decrypt(key, &encrypted).unwrap(), data);

		let odd_key = "abc";
		let encrypted = decrypt(odd_key, &data).unwrap();
		assert_eq!(decrypt(odd_key, &encrypted).unwrap(), data);
	}

	#[aidoku_test]
	fn decrypt_keeps_length() {
		assert_eq!(decrypt("1a", &[]), Ok(Vec::new()));
		assert_eq!(decrypt("1a2b3c4d", &[1, 2, 3]).unwrap().len(), 3);
	}

	#[aidoku_test]
	fn scrub_removes_key() {
		let (url, key) = scrub_url("https://cdn.example/image?encryptionKey=1a2b&x=1");
		assert_eq!(url, "https://cdn.example/image?x=1");
		assert_eq!(key.as_deref(), Some("1a2b"));
		assert!(!url.contains(ENCRYPTION_KEY_PARAM));
	}

	#[aidoku_test]
	fn scrub_trailing_key() {
		let (url, key) = scrub_url("https://cdn.example/image.jpg?hash=ab&duration=10&encryptionKey=ff");
		assert_eq!(url, "https://cdn.example/image.jpg?hash=ab&duration=10");
		assert_eq!(key.as_deref(), Some("ff"));

		let (url, key) = scrub_url("https://cdn.example/image.jpg?encryptionKey=ff");
		assert_eq!(url, "https://cdn.example/image.jpg");
		assert_eq!(key.as_deref(), Some("ff"));
	}

	#[aidoku_test]
	fn scrub_removes_every_key() {
		let (url, key) =
			scrub_url("https://cdn.example/i?encryptionKey=aa&a=1&encryptionKey=bb#frag");
		assert_eq!(url, "https://cdn.example/i?a=1#frag");
		assert_eq!(key.as_deref(), Some("aa"));
	}

	#[aidoku_test]
	fn scrub_key_on_url_without_query() {
		let (url, key) = scrub_url("https://cdn.example/1.jpg&encryptionKey=0f1e");
		assert_eq!(url, "https://cdn.example/1.jpg");
		assert_eq!(key.as_deref(), Some("0f1e"));

		let (url, key) = scrub_url("https://cdn.example/1.jpg&hash=ab&encryptionKey=0f1e");
		assert_eq!(url, "https://cdn.example/1.jpg&hash=ab");
		assert_eq!(key.as_deref(), Some("0f1e"));
	}

	#[aidoku_test]
	fn scrub_without_key() {
		let (url, key) = scrub_url("https://cdn.example/image?x=1");
		assert_eq!(url, "https://cdn.example/image?x=1");
		assert_eq!(key, None);

		let (url, key) = scrub_url("https://cdn.example/image");
		assert_eq!(url, "https://cdn.example/image");
		assert_eq!(key, None);

		let (url, key) = scrub_url("https://cdn.example/a&b.jpg?&x=1");
		assert_eq!(url, "https://cdn.example/a&b.jpg?&x=1");
		assert_eq!(key, None);
	}

	#[aidoku_test]
	fn fetch_passes_plain_images_through() {
		let fetch = ImageFetch::new("https://cdn.example/image?x=1");
		assert_eq!(
			decrypt_image(fetch.key.as_deref(), vec![1, 2, 3]),
			Ok(ImageBody::Passthrough(vec![1, 2, 3]))
		);
	}

	#[aidoku_test]
	fn fetch_decrypts_keyed_images() {
		let fetch = ImageFetch::new("https://cdn.example/image?encryptionKey=0f&x=1");
		assert_eq!(fetch.url, "https://cdn.example/image?x=1");
		assert_eq!(
			decrypt_image(fetch.key.as_deref(), vec![0x0f, 0xf0]),
			Ok(ImageBody::Decrypted(vec![0x00, 0xff]))
		);
	}

	#[aidoku_test]
	fn fetch_fails_on_bad_key() {
		let fetch = ImageFetch::new("https://cdn.example/image?encryptionKey=xyz");
		assert!(matches!(
			decrypt_image(fetch.key.as_deref(), vec![1, 2, 3]),
			Err(MangaPlusError::InvalidEncryptionKey(_))
		));
	}
}
