pub mod calendar;
pub mod clues;
pub mod data;
pub mod prelude;
pub mod rng;
pub mod select;
pub mod session;

pub use calendar::{daily_index, format_countdown, seed_string};
pub use clues::{build_pool, Clue, Tier};
pub use data::{
    flag_url, Catalogs, CityRecord, CountryDetail, CountryListing, FactBundle, GeogridFacts,
    LanguageRecord, NameIndex, ProductRecord,
};
pub use rng::SeededRng;
pub use select::select_daily;
pub use session::{GameSession, GuessErr, Outcome};
