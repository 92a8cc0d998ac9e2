//! Turns decoded responses into the records handed to Aidoku.
use aidoku::{
	Chapter, Manga, MangaStatus, Page, PageContent, PageContext,
	alloc::{String, Vec, vec},
	prelude::*,
};
use hashbrown::HashSet;

use crate::crypto::ImageFetch;
use crate::error::MangaPlusError;
use crate::helpers::{chapter_number, id_from_url, proxied_image_url};
use crate::models::{ErrorResult, MangaPlusResponse, SuccessResult, Title};
use crate::net::Session;
use crate::{PUBLISHER, WEB_URL};

type Result<T> = core::result::Result<T, MangaPlusError>;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
	pub title: String,
	pub thumbnail_url: String,
	/// Synthetic `#/titles/{id}` url.
	pub url: String,
}

pub struct TitleDetail {
	pub author: String,
	pub artist: String,
	pub description: String,
	pub status: MangaStatus,
	pub thumbnail_url: String,
	pub next_update_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRef {
	pub name: String,
	pub scanlator: String,
	pub upload_epoch_millis: i64,
	/// Synthetic `#/viewer/{id}` url.
	pub url: String,
	pub chapter_number: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRef {
	pub index: usize,
	pub url: String,
	/// Image url, with an `encryptionKey` query parameter for encrypted pages.
	pub image_url: String,
}

impl From<Title> for CatalogEntry {
	fn from(value: Title) -> Self {
		Self {
			title: value.name,
			thumbnail_url: proxied_image_url(&value.portrait_image_url),
			url: format!("#/titles/{}", value.title_id),
		}
	}
}

impl From<CatalogEntry> for Manga {
	fn from(value: CatalogEntry) -> Self {
		Self {
			key: id_from_url(&value.url),
			title: value.title,
			cover: Some(value.thumbnail_url),
			url: Some(format!("{WEB_URL}/{}", value.url)),
			..Default::default()
		}
	}
}

impl TitleDetail {
	pub fn apply(self, manga: &mut Manga) {
		manga.authors = (!self.author.is_empty()).then(|| vec![self.author]);
		manga.artists = (!self.artist.is_empty()).then(|| vec![self.artist]);
		manga.description = Some(self.description);
		manga.status = self.status;
		manga.cover = Some(self.thumbnail_url);
		manga.url = Some(format!("{WEB_URL}/#/titles/{}", manga.key));
		manga.next_update_time = self.next_update_time;
	}
}

impl From<ChapterRef> for Chapter {
	fn from(value: ChapterRef) -> Self {
		Chapter {
			key: id_from_url(&value.url),
			title: Some(value.name),
			chapter_number: Some(value.chapter_number),
			date_uploaded: Some(value.upload_epoch_millis / 1000),
			scanlators: Some(vec![value.scanlator]),
			url: Some(format!("{WEB_URL}/{}", value.url)),
			..Default::default()
		}
	}
}

impl From<PageRef> for Page {
	fn from(value: PageRef) -> Self {
		// the key travels in the page context so it never reaches the network
		let fetch = ImageFetch::new(&value.image_url);
		Page {
			content: match fetch.key {
				Some(key) => {
					let mut context = PageContext::new();
					context.insert("key".into(), key);
					PageContent::url_context(fetch.url, context)
				}
				None => PageContent::url(fetch.url),
			},
			..Default::default()
		}
	}
}

fn rejected(error: &ErrorResult, session: &Session) -> MangaPlusError {
	MangaPlusError::UpstreamRejected(error.popup(&session.lang).body.clone())
}

/// Unwraps a success result, turning an error result into a localized error.
fn into_success(response: MangaPlusResponse, session: &Session) -> Result<SuccessResult> {
	match response {
		MangaPlusResponse::Success(success) => Ok(success),
		MangaPlusResponse::Error(error) => Err(rejected(&error, session)),
	}
}

/// Browse listings degrade to an empty page when the API rejects the call.
fn browse_titles(
	response: MangaPlusResponse,
	session: &Session,
	extract: fn(SuccessResult) -> Option<Vec<Title>>,
	view: &'static str,
) -> Result<Vec<Title>> {
	match response {
		MangaPlusResponse::Success(success) => {
			extract(success).ok_or(MangaPlusError::UnexpectedView(view))
		}
		MangaPlusResponse::Error(error) => {
			println!(
				"[mangaplus] {view} rejected ({:?}): {}",
				error.action,
				error.popup(&session.lang).body
			);
			Ok(Vec::new())
		}
	}
}

fn catalog_entries(titles: Vec<Title>, session: &Session) -> Vec<CatalogEntry> {
	titles
		.into_iter()
		.filter(|title| title.language == session.language)
		.map(CatalogEntry::from)
		.collect()
}

pub fn parse_ranking(response: MangaPlusResponse, session: &Session) -> Result<Vec<CatalogEntry>> {
	let titles = browse_titles(
		response,
		session,
		|success| match success {
			SuccessResult::TitleRanking(view) => Some(view.titles),
			_ => None,
		},
		"titleRankingView",
	)?;
	Ok(catalog_entries(titles, session))
}

pub fn parse_latest(response: MangaPlusResponse, session: &Session) -> Result<Vec<CatalogEntry>> {
	let titles = browse_titles(
		response,
		session,
		|success| match success {
			SuccessResult::WebHome(view) => Some(
				view.groups
					.into_iter()
					.flat_map(|group| group.titles)
					.filter_map(|title| title.title)
					.collect(),
			),
			_ => None,
		},
		"webHomeView",
	)?;
	let mut seen = HashSet::new();
	Ok(catalog_entries(titles, session)
		.into_iter()
		.filter(|entry| seen.insert(entry.title.clone()))
		.collect())
}

/// Language-filtered full catalog; query matching is left to the caller.
pub fn parse_search(response: MangaPlusResponse, session: &Session) -> Result<Vec<CatalogEntry>> {
	let titles = browse_titles(
		response,
		session,
		|success| match success {
			SuccessResult::AllTitles(view) => Some(view.titles),
			_ => None,
		},
		"allTitlesView",
	)?;
	Ok(catalog_entries(titles, session))
}

pub fn parse_details(response: MangaPlusResponse, session: &Session) -> Result<TitleDetail> {
	let SuccessResult::TitleDetail(details) = into_success(response, session)? else {
		return Err(MangaPlusError::UnexpectedView("titleDetailView"));
	};
	Ok(TitleDetail {
		author: details.title.author.clone(),
		artist: details.title.author,
		description: format!(
			"{}\n\n{}",
			details.overview, details.viewing_period_description
		),
		// the api has no completed flag
		status: MangaStatus::Ongoing,
		thumbnail_url: proxied_image_url(&details.title.portrait_image_url),
		next_update_time: (details.next_time_stamp != 0).then_some(details.next_time_stamp),
	})
}

/// Catalog entry of the title in a detail response, if it is in the session language.
pub fn parse_detail_entry(
	response: MangaPlusResponse,
	session: &Session,
) -> Result<Option<CatalogEntry>> {
	let SuccessResult::TitleDetail(details) = into_success(response, session)? else {
		return Err(MangaPlusError::UnexpectedView("titleDetailView"));
	};
	Ok(catalog_entries(vec![details.title], session).pop())
}

pub fn parse_chapters(response: MangaPlusResponse, session: &Session) -> Result<Vec<ChapterRef>> {
	let SuccessResult::TitleDetail(details) = into_success(response, session)? else {
		return Err(MangaPlusError::UnexpectedView("titleDetailView"));
	};
	Ok(details
		.first_chapter_list
		.into_iter()
		.chain(details.last_chapter_list)
		.rev()
		// chapters without a subtitle have expired
		.filter(|chapter| !chapter.is_expired())
		.map(|chapter| ChapterRef {
			name: format!(
				"{} - {}",
				chapter.name,
				chapter.sub_title.unwrap_or_default()
			),
			scanlator: PUBLISHER.into(),
			upload_epoch_millis: 1000 * chapter.start_time_stamp,
			url: format!("#/viewer/{}", chapter.chapter_id),
			chapter_number: chapter_number(&chapter.name),
		})
		.collect())
}

pub fn parse_pages(response: MangaPlusResponse, session: &Session) -> Result<Vec<PageRef>> {
	let SuccessResult::MangaViewer(viewer) = into_success(response, session)? else {
		return Err(MangaPlusError::UnexpectedView("mangaViewer"));
	};
	Ok(viewer
		.pages
		.into_iter()
		.filter_map(|page| page.page)
		.enumerate()
		.map(|(index, page)| PageRef {
			index,
			url: String::new(),
			image_url: match page.encryption_key {
				Some(key) => {
					let separator = if page.image_url.contains('?') { '&' } else { '?' };
					format!("{}{separator}encryptionKey={key}", page.image_url)
				}
				None => page.image_url,
			},
		})
		.collect())
}
