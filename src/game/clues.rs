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

use crate::game::data::FactBundle;
use crate::game::rng::SeededRng;

//
// The clue bank: a fixed, ordered registry of template functions per
// difficulty tier. Each template inspects the day's fact bundle and either
// renders one human-readable clue or opts out with `None` (fact missing,
// catalog empty, geogrid document absent). Opting out is the only failure
// mode a template has; nothing here can abort the pool-building pass.
//
// Rules the registry relies on:
//   * templates that pick among several candidates (a city, an export, a
//     flag color...) draw from the shared seeded source, never an unseeded
//     one, so every player sees the same choice on the same day
//   * boolean trivia facts render in both the positive and the negated
//     phrasing, but only when the fact is actually present
//   * numeric and list facts render only when present and non-empty

/// Difficulty bucket a clue template belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Hard,
    Medium,
    Easy,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Hard, Tier::Medium, Tier::Easy];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Hard => "hard",
            Tier::Medium => "medium",
            Tier::Easy => "easy",
        }
    }
}

/// A single rendered clue. Most are plain text; a template may also attach a
/// link to an illustrative image, which the UI offers next to the clue text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clue {
    Text(String),
    Illustrated { text: String, image_url: String },
}

impl Clue {
    pub fn text(&self) -> &str {
        match self {
            Clue::Text(text) => text,
            Clue::Illustrated { text, .. } => text,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Clue::Text(_) => None,
            Clue::Illustrated { image_url, .. } => Some(image_url),
        }
    }
}

impl From<String> for Clue {
    fn from(text: String) -> Self {
        Clue::Text(text)
    }
}

pub type TemplateFn = fn(&FactBundle<'_>, &mut SeededRng) -> Option<Clue>;

/// A named entry in the bank. The name never reaches players; it exists for
/// logs and per-template tests.
pub struct ClueTemplate {
    pub name: &'static str,
    pub render: TemplateFn,
}

pub fn templates(tier: Tier) -> &'static [ClueTemplate] {
    match tier {
        Tier::Hard => HARD_TEMPLATES,
        Tier::Medium => MEDIUM_TEMPLATES,
        Tier::Easy => EASY_TEMPLATES,
    }
}

/// Renders a tier's templates in declaration order, keeping the non-empty
/// results. Order is irrelevant downstream (the selector reshuffles), but
/// keeping it stable keeps the seeded draws stable.
pub fn build_pool(tier: Tier, facts: &FactBundle<'_>, rng: &mut SeededRng) -> Vec<Clue> {
    let pool: Vec<Clue> = templates(tier)
        .iter()
        .filter_map(|template| (template.render)(facts, rng))
        .filter(|clue| !clue.text().trim().is_empty())
        .collect();
    log::debug!("{} pool holds {} of {} templates", tier.label(), pool.len(), templates(tier).len());
    pool
}

fn text_clue(text: String) -> Option<Clue> {
    Some(Clue::Text(text))
}

/// Boolean facts always have something to say when present: the positive or
/// the negated phrasing. Absent facts say nothing.
fn bool_fact(value: Option<bool>, positive: &str, negative: &str) -> Option<Clue> {
    value.map(|v| Clue::Text(if v { positive } else { negative }.to_string()))
}

// --- hard tier ---

fn borders_count(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let count = facts.country.borders.len();
    if count == 0 {
        return None;
    }
    text_clue(format!("It borders {} countries.", count))
}

fn area_km2(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let size = facts.country.size?;
    text_clue(format!("Its area is around {} km².", size))
}

fn non_capital_city(facts: &FactBundle<'_>, rng: &mut SeededRng) -> Option<Clue> {
    let city = facts.random_non_capital_city(rng)?;
    text_clue(format!("A city from this country is {}.", city))
}

fn top_export(facts: &FactBundle<'_>, rng: &mut SeededRng) -> Option<Clue> {
    let product = facts.random_top_export(rng)?;
    text_clue(format!("One of this country's top exports is {}.", product))
}

fn flag_star(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.flag_info.has_star,
        "This country has a star on its flag.",
        "This country does not have a star on its flag.",
    )
}

fn flag_coat_of_arms(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.flag_info.has_coat_of_arms,
        "This country has a coat of arms on its flag.",
        "This country does not have a coat of arms on its flag.",
    )
}

fn flag_animal(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.flag_info.has_animal,
        "This country has an animal on its flag.",
        "This country does not have an animal on its flag.",
    )
}

fn coastline_length(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let km = facts.geogrid?.geography_info.coastline_length?;
    text_clue(format!("Its coastline is {} km long.", km))
}

fn gdp_per_capita(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let gdp = facts.geogrid?.economic_info.gdp_per_capita?;
    text_clue(format!("This country's GDP per capita is {} US dollars.", gdp))
}

fn nuclear_weapons(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.political_info.has_nuclear_weapons,
        "This country has nuclear weapons.",
        "This country does not have nuclear weapons.",
    )
}

fn was_ussr(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.political_info.was_ussr,
        "This country was in the USSR.",
        "This country was not in the USSR.",
    )
}

fn hosted_f1(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.sports_info.hosted_f1,
        "This country has hosted Formula 1.",
        "This country has not hosted Formula 1.",
    )
}

fn hosted_world_cup(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.sports_info.hosted_mens_world_cup,
        "This country has hosted the men's FIFA World Cup.",
        "This country has not hosted the men's FIFA World Cup.",
    )
}

// --- medium tier ---

fn population(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let population = facts.country.population?;
    text_clue(format!("Population is roughly {} people.", population))
}

fn currency(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let name = facts.country.currency_data.as_ref()?.display_name()?;
    text_clue(format!("One of its currencies is {}.", name))
}

fn island_nation(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.geography_info.island_nation,
        "This country is an island nation.",
        "This country is not an island nation.",
    )
}

fn in_eu(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.political_info.in_eu,
        "This country is in the EU.",
        "This country is not in the EU.",
    )
}

fn landlocked(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.geography_info.landlocked,
        "This country is landlocked.",
        "This country is not landlocked.",
    )
}

fn olympic_medals(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let medals = facts.geogrid?.sports_info.olympic_medals?;
    if medals > 0.0 {
        text_clue(format!("It has {} Olympic medals.", medals))
    } else {
        text_clue("It has no Olympic medals.".to_string())
    }
}

fn monarchy(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.political_info.is_monarchy,
        "This country is a monarchy.",
        "This country is not a monarchy.",
    )
}

fn commonwealth(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.political_info.is_commonwealth,
        "This country is a member of the Commonwealth.",
        "This country is not a member of the Commonwealth.",
    )
}

fn same_sex_marriage(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.political_info.same_sex_marriage_legal,
        "Same-sex marriage is legal here.",
        "Same-sex marriage is illegal here.",
    )
}

fn hosted_olympics(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.sports_info.hosted_olympics,
        "This country has hosted the Olympics.",
        "This country has not hosted the Olympics.",
    )
}

fn played_world_cup(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.sports_info.played_mens_world_cup,
        "This country has played in the men's FIFA World Cup.",
        "This country has not played in the men's FIFA World Cup.",
    )
}

fn won_world_cup(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.sports_info.won_mens_world_cup,
        "This country has won the men's FIFA World Cup.",
        "This country has not won the men's FIFA World Cup.",
    )
}

fn alcohol_ban(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.facts_info.has_alcohol_ban,
        "This country has banned alcohol.",
        "This country has not banned alcohol.",
    )
}

fn tourism_top20(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    bool_fact(
        facts.geogrid?.facts_info.top20_tourism_rate,
        "This country is in the top 20 for tourism.",
        "This country is not in the top 20 for tourism.",
    )
}

// --- easy tier ---

fn continent(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let code = facts.country.continent.as_deref()?;
    let full_name = match code.to_ascii_uppercase().as_str() {
        "EU" => "Europe",
        "OC" => "Oceania",
        "AS" => "Asia",
        "NA" => "North America",
        "AF" => "Africa",
        "SA" => "South America",
        "AN" => "Antarctica",
        _ => code,
    };
    text_clue(format!("It is located in {}.", full_name))
}

fn first_border(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let code = facts.country.borders.first()?;
    let neighbor = facts.country_name_from_code(code);
    text_clue(format!("It shares a border with {}.", neighbor))
}

fn iso_initial(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let initial = facts.country.code.as_deref()?.chars().next()?;
    text_clue(format!("Its ISO code starts with {}.", initial))
}

fn name_length(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let name = facts.country.name.as_deref()?;
    text_clue(format!("Its name has {} letters.", name.chars().count()))
}

fn capital_city(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let capital = facts.capital_city()?;
    text_clue(format!("The capital city of this country is: {}.", capital))
}

fn latitude(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let latitude = facts.country.latitude?;
    text_clue(format!("Its latitude is: {}.", latitude))
}

fn longitude(facts: &FactBundle<'_>, _: &mut SeededRng) -> Option<Clue> {
    let longitude = facts.country.longitude?;
    text_clue(format!("Its longitude is: {}.", longitude))
}

fn spoken_language(facts: &FactBundle<'_>, rng: &mut SeededRng) -> Option<Clue> {
    let language = facts.random_language(rng)?;
    text_clue(format!("One of the languages this country speaks is {}.", language))
}

fn flag_colour(facts: &FactBundle<'_>, rng: &mut SeededRng) -> Option<Clue> {
    let colours = &facts.geogrid?.flag_info.colors_on_flag;
    if colours.is_empty() {
        return None;
    }
    let colour = &colours[rng.pick_index(colours.len())];
    text_clue(format!("This country has {} on its flag.", colour))
}

fn coastline_region(facts: &FactBundle<'_>, rng: &mut SeededRng) -> Option<Clue> {
    let regions = &facts.geogrid?.geography_info.coastline;
    if regions.is_empty() {
        return None;
    }
    let region = &regions[rng.pick_index(regions.len())];
    text_clue(format!("This country's coastline is on the {}.", region))
}

fn timezone(facts: &FactBundle<'_>, rng: &mut SeededRng) -> Option<Clue> {
    let zones = &facts.geogrid?.political_info.time_zones;
    if zones.is_empty() {
        return None;
    }
    let zone = &zones[rng.pick_index(zones.len())];
    text_clue(format!("One of this country's timezones is {}.", zone))
}

const HARD_TEMPLATES: &[ClueTemplate] = &[
    ClueTemplate { name: "borders-count", render: borders_count },
    ClueTemplate { name: "area-km2", render: area_km2 },
    ClueTemplate { name: "non-capital-city", render: non_capital_city },
    ClueTemplate { name: "top-export", render: top_export },
    ClueTemplate { name: "flag-star", render: flag_star },
    ClueTemplate { name: "flag-coat-of-arms", render: flag_coat_of_arms },
    ClueTemplate { name: "flag-animal", render: flag_animal },
    ClueTemplate { name: "coastline-length", render: coastline_length },
    ClueTemplate { name: "gdp-per-capita", render: gdp_per_capita },
    ClueTemplate { name: "nuclear-weapons", render: nuclear_weapons },
    ClueTemplate { name: "was-ussr", render: was_ussr },
    ClueTemplate { name: "hosted-f1", render: hosted_f1 },
    ClueTemplate { name: "hosted-world-cup", render: hosted_world_cup },
];

const MEDIUM_TEMPLATES: &[ClueTemplate] = &[
    ClueTemplate { name: "population", render: population },
    ClueTemplate { name: "currency", render: currency },
    ClueTemplate { name: "island-nation", render: island_nation },
    ClueTemplate { name: "in-eu", render: in_eu },
    ClueTemplate { name: "landlocked", render: landlocked },
    ClueTemplate { name: "olympic-medals", render: olympic_medals },
    ClueTemplate { name: "monarchy", render: monarchy },
    ClueTemplate { name: "commonwealth", render: commonwealth },
    ClueTemplate { name: "same-sex-marriage", render: same_sex_marriage },
    ClueTemplate { name: "hosted-olympics", render: hosted_olympics },
    ClueTemplate { name: "played-world-cup", render: played_world_cup },
    ClueTemplate { name: "won-world-cup", render: won_world_cup },
    ClueTemplate { name: "alcohol-ban", render: alcohol_ban },
    ClueTemplate { name: "tourism-top20", render: tourism_top20 },
];

const EASY_TEMPLATES: &[ClueTemplate] = &[
    ClueTemplate { name: "continent", render: continent },
    ClueTemplate { name: "first-border", render: first_border },
    ClueTemplate { name: "iso-initial", render: iso_initial },
    ClueTemplate { name: "name-length", render: name_length },
    ClueTemplate { name: "capital-city", render: capital_city },
    ClueTemplate { name: "latitude", render: latitude },
    ClueTemplate { name: "longitude", render: longitude },
    ClueTemplate { name: "spoken-language", render: spoken_language },
    ClueTemplate { name: "flag-colour", render: flag_colour },
    ClueTemplate { name: "coastline-region", render: coastline_region },
    ClueTemplate { name: "timezone", render: timezone },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::data::{CityRecord, CountryDetail, CountryListing, GeogridFacts, LocalizedNames};

    fn rng() -> SeededRng {
        SeededRng::from_seed_str("2025-07-25")
    }

    fn bundle<'a>(
        country: &'a CountryDetail,
        cities: &'a [CityRecord],
        listings: &'a [CountryListing],
        geogrid: Option<&'a GeogridFacts>,
    ) -> FactBundle<'a> {
        FactBundle {
            country,
            listings,
            cities,
            products: &[],
            languages: &[],
            geogrid,
            answer_code: "fr",
        }
    }

    fn render_named(name: &str, facts: &FactBundle<'_>) -> Option<Clue> {
        let template = Tier::ALL
            .iter()
            .flat_map(|tier| templates(*tier))
            .find(|t| t.name == name)
            .expect("unknown template name");
        (template.render)(facts, &mut rng())
    }

    #[test]
    fn missing_facts_exclude_their_templates() {
        // borders + capital present, size absent: the hard pool keeps the
        // borders clue and drops the area clue
        let country: CountryDetail =
            serde_json::from_str(r#"{"borders": ["fr", "de"], "capital": "Paris"}"#).unwrap();
        let facts = bundle(&country, &[], &[], None);
        let pool = build_pool(Tier::Hard, &facts, &mut rng());
        let texts: Vec<&str> = pool.iter().map(Clue::text).collect();
        assert!(texts.contains(&"It borders 2 countries."));
        assert!(!texts.iter().any(|t| t.contains("area")));
    }

    #[test]
    fn absent_geogrid_document_disables_trivia_templates() {
        let country = CountryDetail::default();
        let facts = bundle(&country, &[], &[], None);
        for tier in Tier::ALL {
            for clue in build_pool(tier, &facts, &mut rng()) {
                assert!(!clue.text().contains("flag"), "unexpected: {}", clue.text());
            }
        }
    }

    #[test]
    fn boolean_facts_render_both_phrasings() {
        let yes: GeogridFacts =
            serde_json::from_str(r#"{"flagInfo": {"hasStar": true}}"#).unwrap();
        let no: GeogridFacts =
            serde_json::from_str(r#"{"flagInfo": {"hasStar": false}}"#).unwrap();
        let country = CountryDetail::default();

        let facts = bundle(&country, &[], &[], Some(&yes));
        assert_eq!(
            render_named("flag-star", &facts).unwrap().text(),
            "This country has a star on its flag."
        );

        let facts = bundle(&country, &[], &[], Some(&no));
        assert_eq!(
            render_named("flag-star", &facts).unwrap().text(),
            "This country does not have a star on its flag."
        );
    }

    #[test]
    fn absent_boolean_fact_renders_nothing() {
        let empty: GeogridFacts = serde_json::from_str("{}").unwrap();
        let country = CountryDetail::default();
        let facts = bundle(&country, &[], &[], Some(&empty));
        assert!(render_named("flag-star", &facts).is_none());
        assert!(render_named("in-eu", &facts).is_none());
    }

    #[test]
    fn zero_medals_still_reads_naturally() {
        let none: GeogridFacts =
            serde_json::from_str(r#"{"sportsInfo": {"olympicMedals": 0}}"#).unwrap();
        let country = CountryDetail::default();
        let facts = bundle(&country, &[], &[], Some(&none));
        assert_eq!(
            render_named("olympic-medals", &facts).unwrap().text(),
            "It has no Olympic medals."
        );
    }

    #[test]
    fn continent_codes_expand_to_names() {
        let country: CountryDetail = serde_json::from_str(r#"{"continent": "EU"}"#).unwrap();
        let facts = bundle(&country, &[], &[], None);
        assert_eq!(
            render_named("continent", &facts).unwrap().text(),
            "It is located in Europe."
        );
    }

    #[test]
    fn border_clue_uses_catalog_names() {
        let country: CountryDetail = serde_json::from_str(r#"{"borders": ["de"]}"#).unwrap();
        let listings = vec![CountryListing { name: "Germany".into(), code: "de".into() }];
        let facts = bundle(&country, &[], &listings, None);
        assert_eq!(
            render_named("first-border", &facts).unwrap().text(),
            "It shares a border with Germany."
        );
    }

    #[test]
    fn capital_clue_requires_a_capital_row() {
        let country = CountryDetail::default();
        let cities = vec![CityRecord {
            country_code: "FR".into(),
            capital: false,
            names: LocalizedNames { en: Some("Lyon".into()) },
        }];
        let facts = bundle(&country, &cities, &[], None);
        assert!(render_named("capital-city", &facts).is_none());

        let cities = vec![CityRecord {
            country_code: "FR".into(),
            capital: true,
            names: LocalizedNames { en: Some("Paris".into()) },
        }];
        let facts = bundle(&country, &cities, &[], None);
        assert_eq!(
            render_named("capital-city", &facts).unwrap().text(),
            "The capital city of this country is: Paris."
        );
    }

    #[test]
    fn multi_candidate_picks_are_seed_deterministic() {
        let geogrid: GeogridFacts = serde_json::from_str(
            r#"{"flagInfo": {"colorsOnFlag": ["red", "white", "blue", "green", "black"]}}"#,
        )
        .unwrap();
        let country = CountryDetail::default();
        let facts = bundle(&country, &[], &[], Some(&geogrid));
        let first = render_named("flag-colour", &facts).unwrap();
        for _ in 0..5 {
            assert_eq!(render_named("flag-colour", &facts).unwrap(), first);
        }
    }

    #[test]
    fn name_length_counts_characters() {
        let country: CountryDetail = serde_json::from_str(r#"{"name": "Chad"}"#).unwrap();
        let facts = bundle(&country, &[], &[], None);
        assert_eq!(
            render_named("name-length", &facts).unwrap().text(),
            "Its name has 4 letters."
        );
    }

    #[test]
    fn pool_preserves_declaration_order() {
        let country: CountryDetail = serde_json::from_str(
            r#"{"name": "France", "code": "fr", "continent": "EU", "latitude": 46.2}"#,
        )
        .unwrap();
        let facts = bundle(&country, &[], &[], None);
        let pool = build_pool(Tier::Easy, &facts, &mut rng());
        let texts: Vec<&str> = pool.iter().map(Clue::text).collect();
        assert_eq!(
            texts,
            vec![
                "It is located in Europe.",
                "Its ISO code starts with f.",
                "Its name has 6 letters.",
                "Its latitude is: 46.2.",
            ]
        );
    }

    #[test]
    fn illustrated_clues_expose_their_link() {
        let clue = Clue::Illustrated {
            text: "A famous landmark is shown here.".into(),
            image_url: "https://example.com/x.jpg".into(),
        };
        assert_eq!(clue.image_url(), Some("https://example.com/x.jpg"));
        assert_eq!(Clue::Text("plain".into()).image_url(), None);
    }
}
