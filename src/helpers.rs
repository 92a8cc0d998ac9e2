use aidoku::{
	alloc::{String, string::ToString},
	helpers::uri::encode_uri_component,
	prelude::format,
};

use crate::{IMAGES_PROXY_URL, WEB_URL};

/// Drops the expiring `&duration` token and routes the image through the
/// caching proxy.
pub fn proxied_image_url(url: &str) -> String {
	let image_url = url.split("&duration").next().unwrap_or(url);
	format!("{IMAGES_PROXY_URL}/?url={}", encode_uri_component(image_url))
}

/// Number after the last `#` in a chapter name, or 0 when it doesn't parse.
pub fn chapter_number(name: &str) -> f32 {
	let number = match name.rfind('#') {
		Some(idx) => &name[idx + 1..],
		None => name,
	};
	number.trim().parse::<f32>().unwrap_or(0.0)
}

/// Id at the end of a synthetic url such as `#/titles/100020`.
pub fn id_from_url(url: &str) -> String {
	url.rsplit('/').next().unwrap_or(url).to_string()
}

/// Title id in a web link such as `{WEB_URL}/titles/100020` or
/// `{WEB_URL}/#/titles/100020`.
pub fn title_id_from_link(url: &str) -> Option<String> {
	let path = url.strip_prefix(WEB_URL)?.trim_start_matches(['/', '#']);
	path.strip_prefix("titles/")?
		.split(['/', '?', '#'])
		.next()
		.filter(|id| !id.is_empty())
		.map(String::from)
}

/// Title id of an `id:{titleId}` search query.
pub fn title_id_from_query(query: &str) -> Option<&str> {
	query
		.strip_prefix("id:")
		.map(str::trim)
		.filter(|id| !id.is_empty())
}

/// Case-insensitive title search.
pub fn matches_query(title: &str, query: &str) -> bool {
	title.to_lowercase().contains(&query.to_lowercase())
}
