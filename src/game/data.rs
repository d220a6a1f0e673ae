/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::game::prelude::*;
use crate::game::rng::SeededRng;
use lazy_static::lazy_static;
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::collections::HashSet;
use std::str::Utf8Error;
use thiserror::Error;

// All game content is static JSON on a third-party CDN, fetched at runtime.
pub const NAMES_SOURCE_URL: &str = "https://cdn-assets.teuteuf.fr/data/common/countries.json";
pub const CITIES_SOURCE_URL: &str = "https://cdn-assets.teuteuf.fr/data/common/cities.json";
pub const PRODUCTS_SOURCE_URL: &str = "https://cdn-assets.teuteuf.fr/data/common/products.json";
pub const LANGUAGES_SOURCE_URL: &str = "https://cdn-assets.teuteuf.fr/data/common/languages.json";
pub const COUNTRY_DETAIL_BASE_URL: &str = "https://cdn-assets.teuteuf.fr/data/common/countries/";
pub const GEOGRID_BASE_URL: &str = "https://cdn-assets.teuteuf.fr/data/geogrid/countries/";
pub const FLAGS_BASE_URL: &str = "https://cdn-assets.teuteuf.fr/data/common/flags/";
pub const QUESTION_MARK_IMG: &str =
    "https://cdn.pixabay.com/photo/2015/12/23/23/15/question-mark-1106309_1280.png";

pub fn country_detail_url(code: &str) -> String {
    format!("{}{}.json", COUNTRY_DETAIL_BASE_URL, code)
}

pub fn geogrid_url(code: &str) -> String {
    format!("{}{}.json", GEOGRID_BASE_URL, code)
}

pub fn flag_url(code: &str) -> String {
    format!("{}{}.svg", FLAGS_BASE_URL, code)
}

/// One entry of the country catalog: the answer rotation and the set of
/// accepted guesses both come from this list. Fields are defaulted so one
/// partial row doesn't sink the whole catalog; callers drop rows with an
/// empty name or code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CountryListing {
    pub name: String,
    pub code: String,
}

impl CountryListing {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.code.is_empty()
    }
}

/// `names.en` style localized-name object used by several catalogs.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocalizedNames {
    pub en: Option<String>,
}

/// The per-country detail document. Every field is optional or defaulted:
/// a sparse record just means fewer clue templates apply.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountryDetail {
    pub name: Option<String>,
    pub code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub borders: Vec<String>,
    pub size: Option<f64>,
    pub capital: Option<String>,
    pub continent: Option<String>,
    pub population: Option<f64>,
    pub currency_data: Option<CurrencyData>,
    pub tld: Option<String>,
    pub top_exports: Vec<TopExport>,
    pub product_data: Option<ProductLinks>,
    pub language_data: Option<LanguageLinks>,
}

impl CountryDetail {
    /// Top exports live either directly on the record or nested under
    /// `productData`, depending on the catalog revision.
    pub fn effective_top_exports(&self) -> &[TopExport] {
        if !self.top_exports.is_empty() {
            return &self.top_exports;
        }
        self.product_data
            .as_ref()
            .map(|p| p.top_exports.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyData {
    pub name: Option<String>,
    pub name_choices: Vec<String>,
}

impl CurrencyData {
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.name_choices.first().map(String::as_str))
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopExport {
    pub product_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductLinks {
    pub top_exports: Vec<TopExport>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageLinks {
    pub languages: Vec<LanguageRef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageRef {
    pub language_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CityRecord {
    pub country_code: String,
    pub capital: bool,
    pub names: LocalizedNames,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_code: String,
    pub names: LocalizedNames,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageRecord {
    pub language_code: String,
    pub names: LocalizedNames,
}

///
/// The optional per-country trivia document. Absence of the whole document or
/// of any single field is normal; `Option` everywhere so the clue templates
/// can tell "fact present" from "fact missing".
///
/// Field renames pin the exact wire keys, typos included, since the CDN owns
/// the format.
///
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeogridFacts {
    pub flag_info: FlagInfo,
    pub geography_info: GeographyInfo,
    pub economic_info: EconomicInfo,
    pub political_info: PoliticalInfo,
    pub sports_info: SportsInfo,
    pub facts_info: FactsInfo,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlagInfo {
    pub has_star: Option<bool>,
    pub has_coat_of_arms: Option<bool>,
    pub has_animal: Option<bool>,
    pub colors_on_flag: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeographyInfo {
    pub coastline_length: Option<f64>,
    pub island_nation: Option<bool>,
    pub landlocked: Option<bool>,
    pub coastline: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EconomicInfo {
    #[serde(rename = "GDPPerCapita")]
    pub gdp_per_capita: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoliticalInfo {
    pub has_nuclear_weapons: Option<bool>,
    #[serde(rename = "wasUSSR")]
    pub was_ussr: Option<bool>,
    #[serde(rename = "inEU")]
    pub in_eu: Option<bool>,
    pub is_monarchy: Option<bool>,
    pub is_commonwealth: Option<bool>,
    #[serde(rename = "sameSexMarrigeLegal")]
    pub same_sex_marriage_legal: Option<bool>,
    pub time_zones: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SportsInfo {
    #[serde(rename = "hostedF1")]
    pub hosted_f1: Option<bool>,
    pub hosted_mens_world_cup: Option<bool>,
    pub played_mens_world_cup: Option<bool>,
    pub won_mens_world_cup: Option<bool>,
    pub hosted_olympics: Option<bool>,
    pub olympic_medals: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactsInfo {
    #[serde(rename = "hasAlchoholBan")]
    pub has_alcohol_ban: Option<bool>,
    #[serde(rename = "top20TourismRate")]
    pub top20_tourism_rate: Option<bool>,
}

///
/// The four flat catalogs, tracked per-source so the clue builder can tell
/// "not yet arrived" (`None`, keep waiting) from "arrived empty" (`Some` with
/// no rows, build with what we have). A failed fetch parks its catalog at
/// `Some(vec![])`, which quietly disables every template that joins against
/// it for the rest of the session.
///
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
    pub listings: Option<Vec<CountryListing>>,
    pub cities: Option<Vec<CityRecord>>,
    pub products: Option<Vec<ProductRecord>>,
    pub languages: Option<Vec<LanguageRecord>>,
}

impl Catalogs {
    pub fn all_arrived(&self) -> bool {
        self.listings.is_some()
            && self.cities.is_some()
            && self.products.is_some()
            && self.languages.is_some()
    }
}

///
/// Everything a clue template may look at for one country, borrowed for the
/// duration of a single pool-building pass.
///
pub struct FactBundle<'a> {
    pub country: &'a CountryDetail,
    pub listings: &'a [CountryListing],
    pub cities: &'a [CityRecord],
    pub products: &'a [ProductRecord],
    pub languages: &'a [LanguageRecord],
    pub geogrid: Option<&'a GeogridFacts>,
    pub answer_code: &'a str,
}

impl FactBundle<'_> {
    /// Resolves an ISO code to its display name, falling back to the raw code
    /// when the catalog doesn't know it.
    pub fn country_name_from_code<'b>(&'b self, code: &'b str) -> &'b str {
        self.listings
            .iter()
            .find(|item| item.code.eq_ignore_ascii_case(code))
            .map(|item| item.name.as_str())
            .unwrap_or(code)
    }

    pub fn capital_city(&self) -> Option<&str> {
        self.cities
            .iter()
            .find(|city| {
                city.capital
                    && city.country_code.eq_ignore_ascii_case(self.answer_code)
                    && city.names.en.is_some()
            })
            .and_then(|city| city.names.en.as_deref())
    }

    pub fn random_non_capital_city(&self, rng: &mut SeededRng) -> Option<&str> {
        let candidates: Vec<&str> = self
            .cities
            .iter()
            .filter(|city| {
                !city.capital && city.country_code.eq_ignore_ascii_case(self.answer_code)
            })
            .filter_map(|city| city.names.en.as_deref())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.pick_index(candidates.len())])
    }

    pub fn random_top_export(&self, rng: &mut SeededRng) -> Option<&str> {
        let exports = self.country.effective_top_exports();
        if exports.is_empty() || self.products.is_empty() {
            return None;
        }
        let code = exports[rng.pick_index(exports.len())].product_code.as_deref()?;
        self.products
            .iter()
            .find(|product| product.product_code == code)
            .and_then(|product| product.names.en.as_deref())
    }

    pub fn random_language(&self, rng: &mut SeededRng) -> Option<&str> {
        let spoken = &self.country.language_data.as_ref()?.languages;
        if spoken.is_empty() || self.languages.is_empty() {
            return None;
        }
        let code = spoken[rng.pick_index(spoken.len())].language_code.as_deref()?;
        self.languages
            .iter()
            .find(|language| language.language_code == code)
            .and_then(|language| language.names.en.as_deref())
    }
}

// A baked-in country list from an earlier revision of the game. Keeps the
// guess input usable when the names catalog fetch fails.
#[derive(RustEmbed)]
#[folder = "data/"]
struct RawData;

pub const FALLBACK_NAMES_FILE: &str = "country_names.txt";

lazy_static! {
    pub static ref FALLBACK_NAMES: Vec<String> = match try_read_fallback_names() {
        Ok(names) => names,
        Err(err) => {
            log::error!("failed to read embedded country names: {}", err);
            Vec::new()
        }
    };
}

#[derive(Error, Debug)]
pub enum LoadDataErr {
    #[error("missing embedded country names file")]
    MissingNamesFile,
    #[error(transparent)]
    EncodingError(#[from] Utf8Error),
}

/// Reads the embedded fallback list: one country name per line.
fn try_read_fallback_names() -> Result<Vec<String>, LoadDataErr> {
    let raw = RawData::get(FALLBACK_NAMES_FILE).ok_or(LoadDataErr::MissingNamesFile)?;
    let text = std::str::from_utf8(&raw.data)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

///
/// The set of strings accepted as guesses. Built from the fetched country
/// catalog when available, from the embedded fallback list otherwise.
/// Membership tests are case-insensitive; `names` keeps the original casing
/// and order for the autocomplete list.
///
#[derive(Clone, Debug, Default)]
pub struct NameIndex {
    names: Vec<String>,
    lowered: HashSet<String>,
}

impl NameIndex {
    pub fn from_names<I>(source: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut names = Vec::new();
        let mut lowered = HashSet::new();
        for name in source {
            if lowered.insert(name.to_lowercase()) {
                names.push(name);
            }
        }
        Self { names, lowered }
    }

    pub fn from_listings(listings: &[CountryListing]) -> Self {
        Self::from_names(listings.iter().map(|item| item.name.clone()))
    }

    pub fn fallback() -> Self {
        Self::from_names(FALLBACK_NAMES.iter().cloned())
    }

    /// Whether a raw guess names a known country (trimmed, case-insensitive).
    pub fn contains(&self, raw: &str) -> bool {
        self.lowered.contains(&normalize_guess(raw))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle<'a>(
        country: &'a CountryDetail,
        listings: &'a [CountryListing],
        cities: &'a [CityRecord],
        products: &'a [ProductRecord],
        languages: &'a [LanguageRecord],
    ) -> FactBundle<'a> {
        FactBundle {
            country,
            listings,
            cities,
            products,
            languages,
            geogrid: None,
            answer_code: "fr",
        }
    }

    #[test]
    fn decodes_country_detail_wire_format() {
        let raw = r#"{
            "name": "France",
            "code": "fr",
            "latitude": 46.2,
            "longitude": 2.2,
            "borders": ["de", "es"],
            "size": 551695,
            "population": 68000000,
            "currencyData": {"nameChoices": ["Euro"]},
            "topExports": [{"productCode": "aircraft"}],
            "languageData": {"languages": [{"languageCode": "fra"}]}
        }"#;
        let detail: CountryDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.name.as_deref(), Some("France"));
        assert_eq!(detail.borders.len(), 2);
        assert_eq!(detail.size, Some(551_695.0));
        assert_eq!(detail.currency_data.as_ref().unwrap().display_name(), Some("Euro"));
        assert_eq!(detail.effective_top_exports().len(), 1);
    }

    #[test]
    fn decodes_geogrid_wire_keys() {
        let raw = r#"{
            "flagInfo": {"hasStar": false, "colorsOnFlag": ["blue", "white", "red"]},
            "economicInfo": {"GDPPerCapita": 44408},
            "politicalInfo": {"wasUSSR": false, "inEU": true, "sameSexMarrigeLegal": true},
            "sportsInfo": {"hostedF1": true, "olympicMedals": 950},
            "factsInfo": {"hasAlchoholBan": false, "top20TourismRate": true}
        }"#;
        let facts: GeogridFacts = serde_json::from_str(raw).unwrap();
        assert_eq!(facts.flag_info.has_star, Some(false));
        assert_eq!(facts.flag_info.has_animal, None);
        assert_eq!(facts.economic_info.gdp_per_capita, Some(44_408.0));
        assert_eq!(facts.political_info.in_eu, Some(true));
        assert_eq!(facts.political_info.same_sex_marriage_legal, Some(true));
        assert_eq!(facts.sports_info.hosted_f1, Some(true));
        assert_eq!(facts.facts_info.top20_tourism_rate, Some(true));
    }

    #[test]
    fn sparse_detail_decodes_to_defaults() {
        let detail: CountryDetail = serde_json::from_str(r#"{"name": "Atlantis"}"#).unwrap();
        assert!(detail.borders.is_empty());
        assert_eq!(detail.size, None);
        assert!(detail.effective_top_exports().is_empty());
    }

    #[test]
    fn top_exports_fall_back_to_product_data() {
        let raw = r#"{"productData": {"topExports": [{"productCode": "wine"}]}}"#;
        let detail: CountryDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.effective_top_exports().len(), 1);
    }

    #[test]
    fn name_index_is_case_insensitive_and_deduped() {
        let index = NameIndex::from_names(vec![
            "France".to_string(),
            "FRANCE".to_string(),
            "Japan".to_string(),
        ]);
        assert_eq!(index.names().len(), 2);
        assert!(index.contains("  france "));
        assert!(index.contains("JAPAN"));
        assert!(!index.contains("Narnia"));
    }

    #[test]
    fn fallback_names_load_from_embedded_data() {
        assert!(FALLBACK_NAMES.len() > 100);
        let index = NameIndex::fallback();
        assert!(index.contains("france"));
        assert!(index.contains("new zealand"));
    }

    #[test]
    fn capital_join_respects_capital_flag() {
        let country = CountryDetail::default();
        let cities = vec![
            CityRecord {
                country_code: "FR".into(),
                capital: false,
                names: LocalizedNames { en: Some("Lyon".into()) },
            },
            CityRecord {
                country_code: "FR".into(),
                capital: true,
                names: LocalizedNames { en: Some("Paris".into()) },
            },
            CityRecord {
                country_code: "DE".into(),
                capital: true,
                names: LocalizedNames { en: Some("Berlin".into()) },
            },
        ];
        let bundle = sample_bundle(&country, &[], &cities, &[], &[]);
        assert_eq!(bundle.capital_city(), Some("Paris"));

        let mut rng = SeededRng::from_seed_str("2025-07-25");
        assert_eq!(bundle.random_non_capital_city(&mut rng), Some("Lyon"));
    }

    #[test]
    fn export_join_resolves_product_name() {
        let country: CountryDetail =
            serde_json::from_str(r#"{"topExports": [{"productCode": "wine"}]}"#).unwrap();
        let products = vec![ProductRecord {
            product_code: "wine".into(),
            names: LocalizedNames { en: Some("Wine".into()) },
        }];
        let bundle = sample_bundle(&country, &[], &[], &products, &[]);
        let mut rng = SeededRng::from_seed_str("2025-07-25");
        assert_eq!(bundle.random_top_export(&mut rng), Some("Wine"));
    }

    #[test]
    fn export_join_without_catalog_is_none() {
        let country: CountryDetail =
            serde_json::from_str(r#"{"topExports": [{"productCode": "wine"}]}"#).unwrap();
        let bundle = sample_bundle(&country, &[], &[], &[], &[]);
        let mut rng = SeededRng::from_seed_str("2025-07-25");
        assert_eq!(bundle.random_top_export(&mut rng), None);
    }

    #[test]
    fn language_join_resolves_language_name() {
        let country: CountryDetail =
            serde_json::from_str(r#"{"languageData": {"languages": [{"languageCode": "fra"}]}}"#)
                .unwrap();
        let languages = vec![LanguageRecord {
            language_code: "fra".into(),
            names: LocalizedNames { en: Some("French".into()) },
        }];
        let bundle = sample_bundle(&country, &[], &[], &[], &languages);
        let mut rng = SeededRng::from_seed_str("2025-07-25");
        assert_eq!(bundle.random_language(&mut rng), Some("French"));
    }

    #[test]
    fn border_codes_resolve_to_names() {
        let country = CountryDetail::default();
        let listings = vec![CountryListing { name: "Germany".into(), code: "de".into() }];
        let bundle = sample_bundle(&country, &listings, &[], &[], &[]);
        assert_eq!(bundle.country_name_from_code("DE"), "Germany");
        assert_eq!(bundle.country_name_from_code("xx"), "xx");
    }

    #[test]
    fn catalogs_gate_requires_every_source() {
        let mut catalogs = Catalogs::default();
        assert!(!catalogs.all_arrived());
        catalogs.listings = Some(Vec::new());
        catalogs.cities = Some(Vec::new());
        catalogs.products = Some(Vec::new());
        assert!(!catalogs.all_arrived());
        catalogs.languages = Some(Vec::new());
        assert!(catalogs.all_arrived());
    }
}
