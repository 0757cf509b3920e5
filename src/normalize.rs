//! # Record Normalization
//!
//! Canonicalizes raw dataset tuples into stored records: the city name is
//! title-cased, the zip code and state pass through verbatim. No validation
//! is performed here — any input string is accepted, including empty ones.

use crate::ingestion::RawZipRecord;
use crate::ZipRecord;
use regex::Regex;

/// Turns raw feed tuples into canonical `ZipRecord`s.
pub struct RecordNormalizer {
    word_re: Regex,
}

impl RecordNormalizer {
    pub fn new() -> Self {
        // A word character followed by any run of non-whitespace. Runs that
        // start with punctuation are left untouched.
        let word_re = Regex::new(r"\w\S*").expect("static pattern compiles");
        Self { word_re }
    }

    /// Normalize a raw tuple into its stored form.
    pub fn normalize(&self, raw: RawZipRecord) -> ZipRecord {
        ZipRecord {
            zip: raw.zipcode,
            city: self.title_case(&raw.city),
            state: raw.state,
        }
    }

    /// Title-case `input`: the first character of each word run is
    /// upper-cased and the remainder lower-cased. Characters outside word
    /// runs (punctuation, extra delimiters) pass through unchanged.
    pub fn title_case(&self, input: &str) -> String {
        self.word_re
            .replace_all(input, |caps: &regex::Captures<'_>| {
                let mut chars = caps[0].chars();
                match chars.next() {
                    Some(first) => {
                        let mut word: String = first.to_uppercase().collect();
                        word.push_str(&chars.as_str().to_lowercase());
                        word
                    }
                    None => String::new(),
                }
            })
            .into_owned()
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-case folding of a state identifier, used to key the per-state
/// tries. The original-case state string is preserved inside records.
pub fn region_key(state: &str) -> String {
    state.to_lowercase()
}
