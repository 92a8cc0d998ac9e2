use aidoku::alloc::{String, Vec};

use crate::error::DecodeError;
use crate::proto::{Message, Reader, WireType, field};

type Result<T> = core::result::Result<T, DecodeError>;

/// Decoded API response: a success result or an error result, never both.
#[derive(Debug, Clone)]
pub enum MangaPlusResponse {
	Success(SuccessResult),
	Error(ErrorResult),
}

impl MangaPlusResponse {
	pub fn decode(buf: &[u8]) -> Result<Self> {
		let envelope = Envelope::decode(buf)?;
		match (envelope.success, envelope.error) {
			(Some(success), None) => Ok(Self::Success(success.try_into()?)),
			(None, Some(error)) => Ok(Self::Error(error)),
			(Some(_), Some(_)) => Err(DecodeError::AmbiguousEnvelope),
			(None, None) => Err(DecodeError::EmptyEnvelope),
		}
	}
}

#[derive(Default)]
struct Envelope {
	success: Option<RawSuccessResult>,
	error: Option<ErrorResult>,
}

impl Message for Envelope {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::optional_message(&mut self.success, tag, wire_type, reader),
			2 => field::optional_message(&mut self.error, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	#[default]
	Default,
	Unauthorized,
	Maintenance,
	GeoIpBlocking,
	Unknown(i32),
}

impl From<i32> for Action {
	fn from(value: i32) -> Self {
		match value {
			0 => Self::Default,
			1 => Self::Unauthorized,
			2 => Self::Maintenance,
			3 => Self::GeoIpBlocking,
			other => Self::Unknown(other),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct ErrorResult {
	pub action: Action,
	pub english_popup: Popup,
	pub spanish_popup: Popup,
}

impl ErrorResult {
	/// The popup to show for a locale; Spanish for `es`, English otherwise.
	pub fn popup(&self, lang: &str) -> &Popup {
		match lang {
			"es" => &self.spanish_popup,
			_ => &self.english_popup,
		}
	}
}

impl Message for ErrorResult {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => {
				let mut action = 0;
				field::int32(&mut action, tag, wire_type, reader)?;
				self.action = action.into();
				Ok(())
			}
			2 => field::message(&mut self.english_popup, tag, wire_type, reader),
			3 => field::message(&mut self.spanish_popup, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct Popup {
	// pub subject: String,
	pub body: String,
}

impl Message for Popup {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			2 => field::string(&mut self.body, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

/// The one view a success result carries, chosen by the endpoint requested.
#[derive(Debug, Clone)]
pub enum SuccessResult {
	AllTitles(AllTitlesView),
	TitleRanking(TitleRankingView),
	TitleDetail(TitleDetailView),
	MangaViewer(MangaViewer),
	WebHome(WebHomeView),
}

#[derive(Default)]
struct RawSuccessResult {
	// is_featured_updated: bool,
	all_titles_view: Option<AllTitlesView>,
	title_ranking_view: Option<TitleRankingView>,
	title_detail_view: Option<TitleDetailView>,
	manga_viewer: Option<MangaViewer>,
	web_home_view: Option<WebHomeView>,
}

impl Message for RawSuccessResult {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			5 => field::optional_message(&mut self.all_titles_view, tag, wire_type, reader),
			6 => field::optional_message(&mut self.title_ranking_view, tag, wire_type, reader),
			8 => field::optional_message(&mut self.title_detail_view, tag, wire_type, reader),
			10 => field::optional_message(&mut self.manga_viewer, tag, wire_type, reader),
			11 => field::optional_message(&mut self.web_home_view, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

impl TryFrom<RawSuccessResult> for SuccessResult {
	type Error = DecodeError;

	fn try_from(value: RawSuccessResult) -> Result<Self> {
		let mut views: Vec<SuccessResult> = [
			value.all_titles_view.map(Self::AllTitles),
			value.title_ranking_view.map(Self::TitleRanking),
			value.title_detail_view.map(Self::TitleDetail),
			value.manga_viewer.map(Self::MangaViewer),
			value.web_home_view.map(Self::WebHome),
		]
		.into_iter()
		.flatten()
		.collect();
		match views.len() {
			1 => views.pop().ok_or(DecodeError::ViewCount(0)),
			count => Err(DecodeError::ViewCount(count)),
		}
	}
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Language {
	#[default]
	English,
	Spanish,
	French,
	Indonesian,
	BrazilianPortuguese,
	Russian,
	Thai,
	German,
	Vietnamese,
	Unknown(i32),
}

impl Language {
	/// Maps an Aidoku language code to the API language.
	pub fn from_code(code: &str) -> Self {
		match code {
			"es" => Self::Spanish,
			"fr" => Self::French,
			"id" => Self::Indonesian,
			"pt-BR" => Self::BrazilianPortuguese,
			"ru" => Self::Russian,
			"th" => Self::Thai,
			"de" => Self::German,
			"vi" => Self::Vietnamese,
			_ => Self::English,
		}
	}

	/// Code the web home endpoint expects in its `lang` parameter.
	pub fn internal_code(&self) -> &'static str {
		match self {
			Self::Spanish => "esp",
			Self::French => "fra",
			Self::Indonesian => "ind",
			Self::BrazilianPortuguese => "ptb",
			Self::Russian => "rus",
			Self::Thai => "tha",
			Self::German => "deu",
			Self::Vietnamese => "vie",
			Self::English | Self::Unknown(_) => "eng",
		}
	}
}

impl From<i32> for Language {
	fn from(value: i32) -> Self {
		match value {
			0 => Self::English,
			1 => Self::Spanish,
			2 => Self::French,
			3 => Self::Indonesian,
			4 => Self::BrazilianPortuguese,
			5 => Self::Russian,
			6 => Self::Thai,
			7 => Self::German,
			9 => Self::Vietnamese,
			other => Self::Unknown(other),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct Title {
	pub title_id: i32,
	pub name: String,
	pub author: String,
	pub portrait_image_url: String,
	// pub landscape_image_url: String,
	// pub view_count: i32,
	pub language: Language,
}

impl Message for Title {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::int32(&mut self.title_id, tag, wire_type, reader),
			2 => field::string(&mut self.name, tag, wire_type, reader),
			3 => field::string(&mut self.author, tag, wire_type, reader),
			4 => field::string(&mut self.portrait_image_url, tag, wire_type, reader),
			7 => {
				let mut language = 0;
				field::int32(&mut language, tag, wire_type, reader)?;
				self.language = language.into();
				Ok(())
			}
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct TitleRankingView {
	pub titles: Vec<Title>,
}

impl Message for TitleRankingView {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::repeated_message(&mut self.titles, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct AllTitlesView {
	pub titles: Vec<Title>,
}

impl Message for AllTitlesView {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::repeated_message(&mut self.titles, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct WebHomeView {
	pub groups: Vec<UpdatedTitleGroup>,
}

impl Message for WebHomeView {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			2 => field::repeated_message(&mut self.groups, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct UpdatedTitleGroup {
	// pub group_name: String,
	pub titles: Vec<UpdatedTitle>,
}

impl Message for UpdatedTitleGroup {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			2 => field::repeated_message(&mut self.titles, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct UpdatedTitle {
	pub title: Option<Title>,
	// pub chapter_id: i32,
	// pub chapter_name: Option<String>,
	// pub chapter_subtitle: Option<String>,
}

impl Message for UpdatedTitle {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::optional_message(&mut self.title, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct TitleDetailView {
	pub title: Title,
	// pub title_image_url: String,
	pub overview: String,
	// pub background_image_url: String,
	pub next_time_stamp: i64,
	pub viewing_period_description: String,
	pub first_chapter_list: Vec<Chapter>,
	pub last_chapter_list: Vec<Chapter>,
}

impl Message for TitleDetailView {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::message(&mut self.title, tag, wire_type, reader),
			3 => field::string(&mut self.overview, tag, wire_type, reader),
			5 => field::int64(&mut self.next_time_stamp, tag, wire_type, reader),
			7 => field::string(&mut self.viewing_period_description, tag, wire_type, reader),
			9 => field::repeated_message(&mut self.first_chapter_list, tag, wire_type, reader),
			10 => field::repeated_message(&mut self.last_chapter_list, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct Chapter {
	// pub title_id: i32,
	pub chapter_id: i32,
	pub name: String,
	pub sub_title: Option<String>,
	// pub thumbnail_url: String,
	pub start_time_stamp: i64,
	// pub end_time_stamp: i64,
}

impl Chapter {
	pub fn is_expired(&self) -> bool {
		self.sub_title.is_none()
	}
}

impl Message for Chapter {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			2 => field::int32(&mut self.chapter_id, tag, wire_type, reader),
			3 => field::string(&mut self.name, tag, wire_type, reader),
			4 => field::optional_string(&mut self.sub_title, tag, wire_type, reader),
			6 => field::int64(&mut self.start_time_stamp, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct MangaViewer {
	pub pages: Vec<MangaPlusPage>,
}

impl Message for MangaViewer {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::repeated_message(&mut self.pages, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

/// A viewer entry; only entries carrying a manga page are images.
#[derive(Debug, Default, Clone)]
pub struct MangaPlusPage {
	pub page: Option<MangaPage>,
}

impl Message for MangaPlusPage {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::optional_message(&mut self.page, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[derive(Debug, Default, Clone)]
pub struct MangaPage {
	pub image_url: String,
	// pub width: i32,
	// pub height: i32,
	pub encryption_key: Option<String>,
}

impl Message for MangaPage {
	fn merge_field(&mut self, tag: u32, wire_type: WireType, reader: &mut Reader<'_>) -> Result<()> {
		match tag {
			1 => field::string(&mut self.image_url, tag, wire_type, reader),
			5 => field::optional_string(&mut self.encryption_key, tag, wire_type, reader),
			_ => reader.skip(wire_type),
		}
	}
}

#[cfg(test)]
pub mod fixture;
