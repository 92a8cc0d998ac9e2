#![no_std]
use aidoku::{
	Chapter, DeepLinkHandler, DeepLinkResult, FilterValue, ImageRequestProvider, ImageResponse,
	Listing, ListingProvider, Manga, MangaPageResult, Page, PageContext, PageImageProcessor, Result,
	Source,
	alloc::{String, Vec},
	imports::{canvas::ImageRef, net::Request},
	prelude::*,
};

mod crypto;
mod error;
mod helpers;
mod models;
mod net;
mod parser;
mod proto;
mod settings;

use crypto::{ImageBody, ImageFetch};
use net::{Session, Url};
use parser::CatalogEntry;

const WEB_URL: &str = "https://mangaplus.shueisha.co.jp";
const API_URL: &str = "https://jumpg-webapi.tokyo-cdn.com/api";
const IMAGES_PROXY_URL: &str = "https://images.weserv.nl";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";
const PUBLISHER: &str = "Shueisha";

struct MangaPlus {
	session: Session,
}

fn into_page_result(entries: Vec<CatalogEntry>) -> MangaPageResult {
	MangaPageResult {
		entries: entries.into_iter().map(Manga::from).collect(),
		has_next_page: false,
	}
}

impl Source for MangaPlus {
	fn new() -> Self {
		Self {
			session: Session::new(&settings::get_language()),
		}
	}

	fn get_search_manga_list(
		&self,
		query: Option<String>,
		page: i32,
		_filters: Vec<FilterValue>,
	) -> Result<MangaPageResult> {
		if page > 1 {
			return Ok(into_page_result(Vec::new()));
		}

		if let Some(title_id) = query.as_deref().and_then(helpers::title_id_from_query) {
			let response = self.session.fetch(&Url::TitleDetail {
				title_id: title_id.into(),
			})?;
			let entries = parser::parse_detail_entry(response, &self.session)?
				.into_iter()
				.collect();
			return Ok(into_page_result(entries));
		}

		let response = self.session.fetch(&Url::AllTitles)?;
		let mut entries = parser::parse_search(response, &self.session)?;
		if let Some(query) = query.as_deref().filter(|q| !q.is_empty()) {
			entries.retain(|entry| helpers::matches_query(&entry.title, query));
		}
		Ok(into_page_result(entries))
	}

	fn get_manga_update(
		&self,
		mut manga: Manga,
		needs_details: bool,
		needs_chapters: bool,
	) -> Result<Manga> {
		let url = Url::TitleDetail {
			title_id: helpers::id_from_url(&manga.key),
		};
		let response = self.session.fetch(&url)?;

		if needs_details {
			parser::parse_details(response.clone(), &self.session)?.apply(&mut manga);
		}

		if needs_chapters {
			manga.chapters = Some(
				parser::parse_chapters(response, &self.session)?
					.into_iter()
					.map(Chapter::from)
					.collect(),
			);
		}

		Ok(manga)
	}

	fn get_page_list(&self, _manga: Manga, chapter: Chapter) -> Result<Vec<Page>> {
		let url = Url::MangaViewer {
			chapter_id: helpers::id_from_url(&chapter.key),
		};
		let response = self.session.fetch(&url)?;
		Ok(parser::parse_pages(response, &self.session)?
			.into_iter()
			.map(Page::from)
			.collect())
	}
}

impl ListingProvider for MangaPlus {
	fn get_manga_list(&self, listing: Listing, page: i32) -> Result<MangaPageResult> {
		if page > 1 {
			return Ok(into_page_result(Vec::new()));
		}

		let entries = match listing.id.as_str() {
			"Popular" => parser::parse_ranking(self.session.fetch(&Url::Ranking)?, &self.session)?,
			"Latest" => {
				let url = Url::WebHome {
					language: self.session.language,
				};
				parser::parse_latest(self.session.fetch(&url)?, &self.session)?
			}
			_ => bail!("Invalid listing"),
		};
		Ok(into_page_result(entries))
	}
}

impl ImageRequestProvider for MangaPlus {
	fn get_image_request(&self, url: String, _context: Option<PageContext>) -> Result<Request> {
		// never let the cipher key reach the network
		let fetch = ImageFetch::new(&url);
		self.session.image_request(&fetch.url)
	}
}

impl PageImageProcessor for MangaPlus {
	fn process_page_image(
		&self,
		response: ImageResponse,
		context: Option<PageContext>,
	) -> Result<ImageRef> {
		let Some(key) = context.as_ref().and_then(|context| context.get("key")) else {
			return Ok(response.image);
		};

		let body = crypto::decrypt_image(Some(key.as_str()), response.image.data())
			.inspect_err(|err| {
				let url = response.request.url.as_deref().unwrap_or_default();
				println!("[mangaplus] {url}: {err}");
			})?;
		match body {
			ImageBody::Decrypted(data) | ImageBody::Passthrough(data) => {
				Ok(ImageRef::new(&data))
			}
		}
	}
}

impl DeepLinkHandler for MangaPlus {
	fn handle_deep_link(&self, url: String) -> Result<Option<DeepLinkResult>> {
		// viewer links don't say which title they belong to
		Ok(helpers::title_id_from_link(&url).map(|key| DeepLinkResult::Manga { key }))
	}
}

register_source!(
	MangaPlus,
	ListingProvider,
	ImageRequestProvider,
	PageImageProcessor,
	DeepLinkHandler
);
