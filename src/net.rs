use aidoku::{
	Result,
	alloc::{String, Vec, string::ToString, vec},
	imports::{net::Request, std::current_date},
	prelude::*,
};
use core::{
	fmt::{Display, Formatter, Result as FmtResult},
	sync::atomic::{AtomicU32, Ordering},
};
use uuid::{Builder, Uuid};

use crate::models::{Language, MangaPlusResponse};
use crate::{API_URL, USER_AGENT, WEB_URL};

/// Client state fixed when the source is created.
#[derive(Debug, Clone)]
pub struct Session {
	/// Aidoku language code, e.g. `en` or `es`.
	pub lang: String,
	pub language: Language,
	/// Sent as `SESSION-TOKEN` on every API call.
	pub token: String,
}

impl Session {
	pub fn new(lang: &str) -> Self {
		Self::with_seed(lang, &session_seed(current_date()))
	}

	/// Builds a session whose token is derived from `seed`.
	pub fn with_seed(lang: &str, seed: &[u8]) -> Self {
		Self {
			lang: lang.into(),
			language: Language::from_code(lang),
			token: gen_session_token(seed).to_string(),
		}
	}

	pub fn api_headers(&self) -> Vec<(&'static str, String)> {
		vec![
			("Origin", WEB_URL.into()),
			("Referer", WEB_URL.into()),
			("User-Agent", USER_AGENT.into()),
			("SESSION-TOKEN", self.token.clone()),
		]
	}

	pub fn image_headers(&self) -> Vec<(&'static str, String)> {
		vec![
			("Referer", WEB_URL.into()),
			("User-Agent", USER_AGENT.into()),
		]
	}

	pub fn request(&self, url: &Url) -> Result<Request> {
		let mut request = Request::get(url.to_string())?;
		for (name, value) in self.api_headers() {
			request = request.header(name, &value);
		}
		Ok(request)
	}

	pub fn image_request(&self, url: &str) -> Result<Request> {
		let mut request = Request::get(url)?;
		for (name, value) in self.image_headers() {
			request = request.header(name, &value);
		}
		Ok(request)
	}

	/// Fetches `url` and decodes the protobuf body.
	pub fn fetch(&self, url: &Url) -> Result<MangaPlusResponse> {
		let data = self.request(url)?.data()?;
		Ok(MangaPlusResponse::decode(&data)?)
	}
}

static SESSION_COUNT: AtomicU32 = AtomicU32::new(0);

/// Creation time followed by a per-process instance counter.
///
/// The host has no random source, so two sessions never share a seed but
/// anyone who knows the creation second can guess the token.
fn session_seed(date: i64) -> [u8; 12] {
	let instance = SESSION_COUNT.fetch_add(1, Ordering::Relaxed);
	let mut seed = [0; 12];
	seed[..8].copy_from_slice(&date.to_le_bytes());
	seed[8..].copy_from_slice(&instance.to_le_bytes());
	seed
}

/// Uuid with v4 version and variant bits over an md5 digest of `seed`.
/// Deterministic: the same seed gives the same token.
pub fn gen_session_token(seed: &[u8]) -> Uuid {
	let digest = md5::compute(seed);
	Builder::from_random_bytes(digest.0).into_uuid()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Url {
	Ranking,
	WebHome { language: Language },
	AllTitles,
	TitleDetail { title_id: String },
	MangaViewer { chapter_id: String },
}

impl Display for Url {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Url::Ranking => write!(f, "{API_URL}/title_list/ranking"),
			Url::WebHome { language } => {
				write!(f, "{API_URL}/web/web_home?lang={}", language.internal_code())
			}
			Url::AllTitles => write!(f, "{API_URL}/title_list/all"),
			Url::TitleDetail { title_id } => {
				write!(f, "{API_URL}/title_detail?title_id={title_id}")
			}
			Url::MangaViewer { chapter_id } => write!(
				f,
				"{API_URL}/manga_viewer?chapter_id={chapter_id}&split=yes&img_quality=high"
			),
		}
	}
}
