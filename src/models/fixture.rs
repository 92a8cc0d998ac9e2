//! Encoded API payloads for tests.
use aidoku::{alloc::Vec, prelude::format};

use crate::proto::encode::Encoder;

pub const ALL_TITLES_VIEW: u32 = 5;
pub const TITLE_RANKING_VIEW: u32 = 6;
pub const TITLE_DETAIL_VIEW: u32 = 8;
pub const MANGA_VIEWER: u32 = 10;
pub const WEB_HOME_VIEW: u32 = 11;

pub fn title(id: i32, name: &str, language: i32) -> Encoder {
	Encoder::new()
		.int32(1, id)
		.string(2, name)
		.string(3, "Eiichiro Oda")
		.string(
			4,
			&format!("https://cdn.example/title/{id}.jpg?hash=ab&duration=86400"),
		)
		.string(5, "https://cdn.example/landscape.jpg")
		.int32(6, 12_345)
		.int32(7, language)
}

pub fn titles_view(titles: Vec<Encoder>) -> Encoder {
	titles
		.into_iter()
		.fold(Encoder::new(), |view, title| view.message(1, title))
}

pub fn web_home_view(groups: Vec<Vec<Encoder>>) -> Encoder {
	groups.into_iter().fold(Encoder::new(), |view, titles| {
		let group = titles.into_iter().fold(
			Encoder::new().string(1, "Updated"),
			|group, title| group.message(2, Encoder::new().message(1, title).int32(2, 1)),
		);
		view.message(2, group)
	})
}

pub fn chapter(id: i32, name: &str, sub_title: Option<&str>, start: i64) -> Encoder {
	let chapter = Encoder::new()
		.int32(1, 100_020)
		.int32(2, id)
		.string(3, name);
	let chapter = match sub_title {
		Some(sub_title) => chapter.string(4, sub_title),
		None => chapter,
	};
	chapter.int64(6, start).int64(7, start + 86_400)
}

pub fn detail_view(title: Encoder, first: Vec<Encoder>, last: Vec<Encoder>) -> Encoder {
	let view = Encoder::new()
		.message(1, title)
		.string(2, "https://cdn.example/header.jpg")
		.string(3, "Pirates and treasure.")
		.int64(5, 1_700_000_000)
		.string(7, "The latest 3 chapters are free.");
	let view = first
		.into_iter()
		.fold(view, |view, chapter| view.message(9, chapter));
	last.into_iter()
		.fold(view, |view, chapter| view.message(10, chapter))
}

pub fn page(image_url: &str, key: Option<&str>) -> Encoder {
	let page = Encoder::new()
		.string(1, image_url)
		.int32(2, 1200)
		.int32(3, 1700);
	let page = match key {
		Some(key) => page.string(5, key),
		None => page,
	};
	Encoder::new().message(1, page)
}

pub fn viewer(pages: Vec<Encoder>) -> Encoder {
	pages
		.into_iter()
		.fold(Encoder::new(), |view, page| view.message(1, page))
}

pub fn success(view_field: u32, view: Encoder) -> Vec<u8> {
	Encoder::new()
		.message(1, Encoder::new().varint(1, 1).message(view_field, view))
		.finish()
}

pub fn error(action: i32, english: &str, spanish: &str) -> Vec<u8> {
	let popup = |body: &str| Encoder::new().string(1, "Error").string(2, body);
	Encoder::new()
		.message(
			2,
			Encoder::new()
				.int32(1, action)
				.message(2, popup(english))
				.message(3, popup(spanish)),
		)
		.finish()
}
