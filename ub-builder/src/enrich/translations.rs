//! Translations pass: common names in other languages

use crate::models::{EnrichmentTable, SpeciesRecord};
use crate::sources::LegacyTranslations;
use std::collections::HashMap;
use tracing::info;
use ub_common::Result;

/// Name of the translations pass and its processed table
pub const TRANSLATIONS_PASS: &str = "translations";

/// Languages carried into the deck, in export order
pub const LANGUAGES: [&str; 57] = [
    "Afrikaans",
    "Albanian",
    "Arabic",
    "Armenian",
    "Azerbaijani",
    "Belarusian",
    "Bengali",
    "Bulgarian",
    "Catalan",
    "Chinese",
    "Chinese (Traditional)",
    "Croatian",
    "Czech",
    "Danish",
    "Dutch",
    "Estonian",
    "Faroese",
    "Finnish",
    "French",
    "Galician",
    "Georgian",
    "German",
    "Greek",
    "Hebrew",
    "Hungarian",
    "Icelandic",
    "Indonesian",
    "Italian",
    "Japanese",
    "Kazakh",
    "Korean",
    "Latvian",
    "Lithuanian",
    "Macedonian",
    "Marathi",
    "Malay",
    "Maltese",
    "Mongolian",
    "Nepali",
    "Norwegian",
    "Persian",
    "Polish",
    "Portuguese",
    "Romanian",
    "Russian",
    "Serbian",
    "Slovak",
    "Slovenian",
    "Spanish",
    "Swahili",
    "Swedish",
    "Tajik",
    "Thai",
    "Turkish",
    "Ukrainian",
    "Uzbek",
    "Vietnamese",
];

/// Capitalise each whitespace-separated word, lowercasing the rest of it
///
/// Runs of whitespace collapse to one space.
pub fn capwords(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Capitalise names written entirely in lowercase-initial form
fn tidy(name: String) -> String {
    if name.chars().next().is_some_and(char::is_lowercase) {
        capwords(&name)
    } else {
        name
    }
}

/// Fill `target` gaps from `source`, position by position
fn fill_missing(target: &mut [Option<String>], source: Option<&Vec<Option<String>>>) {
    let Some(source) = source else {
        return;
    };
    for (slot, value) in target.iter_mut().zip(source) {
        if slot.is_none() {
            slot.clone_from(value);
        }
    }
}

/// Per-species translations aligned with `languages`
///
/// **Algorithm:**
/// 1. IOC list row for the species' resolved IOC scientific name
/// 2. Gaps filled from the first-generation deck by common name
/// 3. Remaining gaps filled from it by scientific name
/// 4. Lowercase-initial names capitalised word by word
///
/// Species without any translation get no row.
pub fn translations_pass(
    records: &[SpeciesRecord],
    ioc: &HashMap<String, Vec<Option<String>>>,
    legacy: &LegacyTranslations,
    languages: &[&str],
) -> Result<EnrichmentTable<Vec<Option<String>>>> {
    let mut table = EnrichmentTable::new(TRANSLATIONS_PASS);

    for record in records {
        let mut names: Vec<Option<String>> = vec![None; languages.len()];
        fill_missing(&mut names, record.ioc_scientific().and_then(|s| ioc.get(s)));
        fill_missing(&mut names, legacy.by_common.get(&record.common_name));
        fill_missing(&mut names, legacy.by_scientific.get(&record.scientific_name));

        if names.iter().all(Option::is_none) {
            continue;
        }
        let names = names.into_iter().map(|n| n.map(tidy)).collect();
        table.insert(record.key(), names)?;
    }

    info!("Found translations for {} species", table.len());
    Ok(table)
}
