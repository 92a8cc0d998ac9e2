use aidoku::{
	alloc::{String, Vec},
	imports::defaults::defaults_get,
};

// settings keys
const LANGUAGES_KEY: &str = "languages";

const DEFAULT_LANGUAGE: &str = "en";

/// Language the source was configured for; the first selected one wins.
pub fn get_language() -> String {
	defaults_get::<Vec<String>>(LANGUAGES_KEY)
		.and_then(|langs| langs.into_iter().next())
		.unwrap_or_else(|| DEFAULT_LANGUAGE.into())
}
