use gloo_timers::callback::Interval;
use instant::Instant;
use yew::prelude::*;

use crate::game::calendar::{daily_index, format_countdown, seed_string};
use crate::game::clues::{build_pool, Clue, Tier};
use crate::game::data::{
    country_detail_url, flag_url, geogrid_url, Catalogs, CityRecord, CountryDetail,
    CountryListing, FactBundle, GeogridFacts, LanguageRecord, NameIndex, ProductRecord,
    CITIES_SOURCE_URL, LANGUAGES_SOURCE_URL, NAMES_SOURCE_URL, PRODUCTS_SOURCE_URL,
    QUESTION_MARK_IMG,
};
use crate::game::prelude::*;
use crate::game::rng::SeededRng;
use crate::game::select::select_daily;
use crate::game::session::{GameSession, GuessErr, Outcome};
use crate::web::effects;
use crate::web::fetch;
use crate::web::keys::EscapeListener;

///
/// The single page component. Owns the fetched datasets, the current answer,
/// and at most one `GameSession` at a time; everything it renders is a
/// projection of those.
///
/// Clue building is gated: it waits until the four catalogs, the per-country
/// detail record and the geogrid lookup have all completed, and re-checks the
/// gate each time any of them lands. The one recurring piece of machinery is
/// the 1 Hz countdown interval, which is replaced (never stacked) whenever the
/// day rolls over and dropped with the component.
///
pub struct App {
    catalogs: Catalogs,
    name_index: NameIndex,

    answer: Option<CountryListing>,
    country: Option<CountryDetail>,
    // outer None: lookup still in flight; inner None: no document for this country
    geogrid: Option<Option<GeogridFacts>>,
    session: Option<GameSession>,

    virtual_now_ms: f64,
    target_ms: f64,
    countdown_text: String,
    timer: Option<Interval>,

    guess_value: String,
    // rejection message for the current input; cleared by any counted guess
    flash: Option<String>,

    dark_mode: bool,
    name_hint_enabled: bool,
    flag_hint_enabled: bool,
    infinite_enabled: bool,

    rules_open: bool,
    hints_open: bool,
    _esc_listener: Option<EscapeListener>,

    started_at: Instant,
}

#[derive(Debug)]
pub enum Msg {
    NamesLoaded(Vec<CountryListing>),
    CitiesLoaded(Vec<CityRecord>),
    ProductsLoaded(Vec<ProductRecord>),
    LanguagesLoaded(Vec<LanguageRecord>),
    CountryLoaded(String, Box<Option<CountryDetail>>),
    GeogridLoaded(String, Box<Option<GeogridFacts>>),
    Tick,
    UpdateGuess(String),
    SubmitGuess,
    ToggleDarkMode,
    SetNameHint(bool),
    SetFlagHint(bool),
    SetInfiniteClues(bool),
    SkipClue,
    SkipDay,
    SetRulesOpen(bool),
    SetHintsOpen(bool),
    CloseModals,
    Share,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let dark_mode = effects::load_dark_mode();
        effects::apply_dark_class(dark_mode);

        let link = ctx.link();
        fetch::fetch_catalog(NAMES_SOURCE_URL, "country names", link.callback(Msg::NamesLoaded));
        fetch::fetch_catalog(CITIES_SOURCE_URL, "cities", link.callback(Msg::CitiesLoaded));
        fetch::fetch_catalog(PRODUCTS_SOURCE_URL, "products", link.callback(Msg::ProductsLoaded));
        fetch::fetch_catalog(
            LANGUAGES_SOURCE_URL,
            "languages",
            link.callback(Msg::LanguagesLoaded),
        );

        let target_ms = next_target_ms();
        Self {
            catalogs: Catalogs::default(),
            name_index: NameIndex::fallback(),
            answer: None,
            country: None,
            geogrid: None,
            session: None,
            virtual_now_ms: js_sys::Date::now(),
            target_ms,
            countdown_text: format_countdown(target_ms - js_sys::Date::now(), !TEST_MODE),
            timer: Some(make_timer(ctx)),
            guess_value: String::new(),
            flash: None,
            dark_mode,
            name_hint_enabled: false,
            flag_hint_enabled: false,
            infinite_enabled: false,
            rules_open: true,
            hints_open: false,
            _esc_listener: EscapeListener::create(ctx.link().callback(|_| Msg::CloseModals)),
            started_at: Instant::now(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::NamesLoaded(items) => {
                let items: Vec<CountryListing> =
                    items.into_iter().filter(CountryListing::is_complete).collect();
                if !items.is_empty() {
                    self.name_index = NameIndex::from_listings(&items);
                }
                self.catalogs.listings = Some(items);
                self.derive_answer(ctx);
                self.try_build_day();
                true
            }
            Msg::CitiesLoaded(items) => {
                self.catalogs.cities = Some(items);
                self.try_build_day()
            }
            Msg::ProductsLoaded(items) => {
                self.catalogs.products = Some(items);
                self.try_build_day()
            }
            Msg::LanguagesLoaded(items) => {
                self.catalogs.languages = Some(items);
                self.try_build_day()
            }
            Msg::CountryLoaded(code, detail) => {
                if !self.is_current_answer(&code) {
                    log::debug!("dropping stale country detail for '{}'", code);
                    return false;
                }
                self.country = *detail;
                self.try_build_day()
            }
            Msg::GeogridLoaded(code, facts) => {
                if !self.is_current_answer(&code) {
                    log::debug!("dropping stale geogrid facts for '{}'", code);
                    return false;
                }
                self.geogrid = Some(*facts);
                self.try_build_day()
            }
            Msg::Tick => {
                let remaining = self.target_ms - js_sys::Date::now();
                if remaining <= 0.0 {
                    self.rollover(ctx);
                } else {
                    self.countdown_text = format_countdown(remaining, !TEST_MODE);
                }
                true
            }
            Msg::UpdateGuess(value) => {
                self.guess_value = value;
                true
            }
            Msg::SubmitGuess => self.submit_guess(),
            Msg::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                effects::store_dark_mode(self.dark_mode);
                effects::apply_dark_class(self.dark_mode);
                true
            }
            Msg::SetNameHint(enabled) => {
                self.name_hint_enabled = enabled;
                true
            }
            Msg::SetFlagHint(enabled) => {
                self.flag_hint_enabled = enabled;
                true
            }
            Msg::SetInfiniteClues(enabled) => {
                if !TEST_MODE {
                    return false;
                }
                self.infinite_enabled = enabled;
                if let Some(clues) = self.build_selection(enabled) {
                    if let Some(session) = self.session.as_mut() {
                        session.set_clues(clues, enabled);
                    }
                }
                true
            }
            Msg::SkipClue => {
                if !TEST_MODE {
                    return false;
                }
                match self.session.as_mut() {
                    Some(session) => {
                        session.skip_clue();
                        self.flash = None;
                        true
                    }
                    None => false,
                }
            }
            Msg::SkipDay => {
                if !TEST_MODE {
                    return false;
                }
                self.rollover(ctx);
                true
            }
            Msg::SetRulesOpen(open) => {
                self.rules_open = open;
                true
            }
            Msg::SetHintsOpen(open) => {
                self.hints_open = open;
                true
            }
            Msg::CloseModals => {
                let was_open = self.rules_open || self.hints_open;
                self.rules_open = false;
                self.hints_open = false;
                was_open
            }
            Msg::Share => {
                if let Some(message) = self.session.as_ref().and_then(GameSession::share_message) {
                    effects::share_text(&message);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <>
                {self.show_top_controls(ctx)}
                {self.show_settings(ctx)}
                <div class="container">
                    <h1>{"Cluele"}</h1>
                    {self.show_image()}
                    {self.show_clue_area(ctx)}
                    {self.show_guess_form(ctx)}
                    {self.show_result()}
                    <div id="countdown-container">
                        <span>{"Next game in: "}</span>
                        <span id="countdown">{&self.countdown_text}</span>
                    </div>
                    {self.show_share_button(ctx)}
                </div>
                {self.show_rules_modal(ctx)}
                {self.show_hints_modal(ctx)}
                <footer class="site-footer">
                    {"© 2025 Jonathan Williams. All rights reserved."}
                    <span class="version">{format!(" · {}", crate::GIT_VERSION)}</span>
                </footer>
            </>
        }
    }
}

impl App {
    fn now_ms(&self) -> f64 {
        if TEST_MODE {
            self.virtual_now_ms
        } else {
            js_sys::Date::now()
        }
    }

    fn is_current_answer(&self, code: &str) -> bool {
        self.answer.as_ref().map(|a| a.code == code).unwrap_or(false)
    }

    /// Picks today's answer from the catalog and kicks off its two
    /// per-country lookups. Does nothing until the catalog has arrived.
    fn derive_answer(&mut self, ctx: &Context<Self>) {
        let listings = match self.catalogs.listings.as_ref() {
            Some(listings) if !listings.is_empty() => listings,
            _ => return,
        };

        let idx = daily_index(listings.len(), EPOCH_MS, self.now_ms());
        let item = &listings[idx];
        let code = item.code.to_lowercase();
        log::debug!("answer is entry {} of {}", idx, listings.len());

        self.answer = Some(CountryListing { name: item.name.clone(), code: code.clone() });
        self.country = None;
        self.geogrid = None;
        self.session = None;

        let link = ctx.link();
        fetch::fetch_document(
            country_detail_url(&code),
            "country detail",
            code.clone(),
            link.callback(|(code, detail)| Msg::CountryLoaded(code, Box::new(detail))),
        );
        fetch::fetch_document(
            geogrid_url(&code),
            "geogrid facts",
            code,
            link.callback(|(code, facts)| Msg::GeogridLoaded(code, Box::new(facts))),
        );
    }

    /// Runs the day's deterministic clue selection, provided every dataset
    /// has reported in.
    fn build_selection(&self, infinite: bool) -> Option<Vec<Clue>> {
        let answer = self.answer.as_ref()?;
        if !self.catalogs.all_arrived() {
            return None;
        }
        let country = self.country.as_ref()?;
        let geogrid = self.geogrid.as_ref()?;

        let bundle = FactBundle {
            country,
            listings: self.catalogs.listings.as_deref().unwrap_or(&[]),
            cities: self.catalogs.cities.as_deref().unwrap_or(&[]),
            products: self.catalogs.products.as_deref().unwrap_or(&[]),
            languages: self.catalogs.languages.as_deref().unwrap_or(&[]),
            geogrid: geogrid.as_ref(),
            answer_code: &answer.code,
        };

        let mut rng = SeededRng::from_seed_str(&seed_string(self.now_ms()));
        let hard = build_pool(Tier::Hard, &bundle, &mut rng);
        let medium = build_pool(Tier::Medium, &bundle, &mut rng);
        let easy = build_pool(Tier::Easy, &bundle, &mut rng);
        log::debug!(
            "clue pools: {} hard / {} medium / {} easy",
            hard.len(),
            medium.len(),
            easy.len(),
        );

        Some(select_daily(hard, medium, easy, &mut rng, infinite))
    }

    /// The readiness gate: re-checked on every dataset arrival, builds the
    /// session exactly once per day.
    fn try_build_day(&mut self) -> bool {
        if self.session.is_some() {
            return false;
        }
        let clues = match self.build_selection(self.infinite_enabled) {
            Some(clues) => clues,
            None => return false,
        };
        let answer = match self.answer.clone() {
            Some(answer) => answer,
            None => return false,
        };

        log::debug!(
            "day ready with {} clues in {:.02}s",
            clues.len(),
            self.started_at.elapsed().as_secs_f64(),
        );
        self.session = Some(GameSession::new(
            answer.name,
            answer.code,
            clues,
            self.infinite_enabled,
        ));
        self.flash = None;
        true
    }

    /// Retires the day: advance the simulated date (test mode), pick the new
    /// answer, drop the old session, and restart the countdown. The old
    /// interval is replaced, never left running alongside the new one.
    fn rollover(&mut self, ctx: &Context<Self>) {
        if TEST_MODE {
            self.virtual_now_ms += MS_PER_DAY;
        }
        self.session = None;
        self.flash = None;
        self.guess_value.clear();
        self.derive_answer(ctx);
        self.try_build_day();

        self.target_ms = next_target_ms();
        self.timer = Some(make_timer(ctx));
        self.countdown_text = format_countdown(self.target_ms - js_sys::Date::now(), !TEST_MODE);
    }

    fn submit_guess(&mut self) -> bool {
        if self.guess_value.trim().is_empty() {
            return false;
        }
        let raw = self.guess_value.clone();
        let session = match self.session.as_mut() {
            Some(session) if !session.is_over() => session,
            _ => return false,
        };

        match session.submit_guess(&raw, &self.name_index) {
            Ok(outcome) => {
                self.flash = None;
                self.guess_value.clear();
                if let Outcome::Won { .. } = outcome {
                    effects::fire_confetti();
                }
                true
            }
            Err(err @ (GuessErr::NotACountry(_) | GuessErr::AlreadyGuessed(_))) => {
                self.flash = Some(err.to_string());
                true
            }
            Err(GuessErr::RoundOver) => false,
        }
    }

    fn show_top_controls(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="top-left-controls">
                <button id="dark-mode-toggle" onclick={link.callback(|_| Msg::ToggleDarkMode)}>
                    {if self.dark_mode { "☀️ Light Mode" } else { "🌙 Dark Mode" }}
                </button>
                <button id="info-btn" title="Game Rules" onclick={link.callback(|_| Msg::SetRulesOpen(true))}>
                    {"ℹ️ How to Play"}
                </button>
                {
                    if TEST_MODE {
                        html! {
                            <button id="skip-country-btn"
                                title="Skip to next country (Test Mode Only)"
                                onclick={link.callback(|_| Msg::SkipDay)}>
                                {"⏭️ Skip Country"}
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }

    fn show_settings(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let checkbox = |id: &'static str,
                        label: &'static str,
                        hint: &'static str,
                        checked: bool,
                        msg: fn(bool) -> Msg| {
            html! {
                <div class="toggle-container">
                    <label class="toggle-label">
                        <span>{label}</span>
                        <span class="info-icon" title={hint}>{"ℹ️"}</span>
                        <input
                            type="checkbox"
                            id={id}
                            checked={checked}
                            onchange={link.callback(move |e: Event| {
                                msg(e.target_unchecked_into::<web_sys::HtmlInputElement>().checked())
                            })}
                        />
                        <span class="toggle-slider"></span>
                    </label>
                </div>
            }
        };

        html! {
            <div class="difficulty-settings">
                <h3>{"Difficulty Settings"}</h3>
                {checkbox(
                    "name-hint-toggle",
                    "Name Hint",
                    "Shows the first letter of the country name after 8 guesses",
                    self.name_hint_enabled,
                    Msg::SetNameHint,
                )}
                {checkbox(
                    "flag-hint-toggle",
                    "Flag Hint",
                    "Shows a blurred version of the country's flag",
                    self.flag_hint_enabled,
                    Msg::SetFlagHint,
                )}
                {
                    if TEST_MODE {
                        html! {
                            <>
                                {checkbox(
                                    "infinite-clues-toggle",
                                    "Infinite Clues",
                                    "Enables infinite clues, revealing all available clues.",
                                    self.infinite_enabled,
                                    Msg::SetInfiniteClues,
                                )}
                                {self.show_infinite_banner()}
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }

    fn show_infinite_banner(&self) -> Html {
        match &self.session {
            Some(session) if self.infinite_enabled && session.clue_count() > 0 => html! {
                <div class="infinite-banner">
                    {"📊 "}<strong>{"Infinite Mode Active:"}</strong>
                    {format!(" {} total clues available", session.clue_count())}
                </div>
            },
            _ => html! {},
        }
    }

    fn show_image(&self) -> Html {
        let game_over = self.session.as_ref().map(GameSession::is_over).unwrap_or(false);
        let reveal_flag = game_over || self.flag_hint_enabled;
        let src = match (&self.answer, reveal_flag) {
            (Some(answer), true) => flag_url(&answer.code),
            _ => QUESTION_MARK_IMG.to_string(),
        };
        let blurred = self.flag_hint_enabled && !game_over;
        let alt = match (&self.answer, game_over, blurred) {
            (Some(answer), true, _) => format!("{} Flag", answer.name),
            (Some(answer), false, true) => format!("{} Flag (Blurred)", answer.name),
            _ => "Country Flag or Question Mark".to_string(),
        };
        html! {
            <div id="image-container">
                <img id="country-image"
                    class={classes!(blurred.then(|| "blurred"))}
                    src={src}
                    alt={alt}
                />
            </div>
        }
    }

    fn show_clue_area(&self, ctx: &Context<Self>) -> Html {
        let session = match &self.session {
            Some(session) if !session.is_over() => session,
            Some(_) => return html! {},
            None => {
                return html! {
                    <div id="hint-container">
                        <div class="loading">{"🔄 Loading country data and generating clues..."}</div>
                    </div>
                }
            }
        };

        let link = ctx.link();
        let clue_text = session.current_clue().map(Clue::text).unwrap_or("");
        let image_link = session.current_clue().and_then(Clue::image_url);

        html! {
            <div id="hint-container">
                <span id="hint-label">{session.clue_label()}</span>
                <span id="hint">{clue_text}</span>
                {
                    if session.infinite() {
                        let more = session.clue_count().saturating_sub(session.hint_index() + 1);
                        html! {
                            <span class="clues-remaining">
                                {format!("({} more clues available)", more)}
                            </span>
                        }
                    } else {
                        html! {}
                    }
                }
                {
                    if session.hint_index() >= 1 {
                        html! {
                            <button id="show-hints-btn"
                                title="Show all previous clues"
                                onclick={link.callback(|_| Msg::SetHintsOpen(true))}>
                                {"Show Previous Clues"}
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
                {
                    if TEST_MODE {
                        html! {
                            <button id="skip-clue-btn"
                                title="Skip to next clue (Test Mode Only)"
                                onclick={link.callback(|_| Msg::SkipClue)}>
                                {"⏭️ Skip Clue"}
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
                {
                    match image_link {
                        Some(url) => html! {
                            <div id="country-photo-container">
                                <a href={url.to_string()} target="_blank" rel="noopener noreferrer">
                                    {"View an image from this country"}
                                </a>
                            </div>
                        },
                        None => html! {},
                    }
                }
                {
                    if self.name_hint_enabled {
                        html! {
                            <div id="name-hint">
                                <span>{"Country name: "}</span>
                                <span id="name-hint-text">{session.masked_name()}</span>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }

    fn show_guess_form(&self, ctx: &Context<Self>) -> Html {
        let game_over = self.session.as_ref().map(GameSession::is_over).unwrap_or(false);
        if game_over {
            return html! {};
        }

        let link = ctx.link();
        let oninput = link.callback(|e: InputEvent| {
            Msg::UpdateGuess(e.target_unchecked_into::<web_sys::HtmlInputElement>().value())
        });
        let onsubmit = link.callback(|e: FocusEvent| {
            e.prevent_default();
            Msg::SubmitGuess
        });

        // the suggestion list only kicks in once there's something to narrow
        let suggestions: &[String] = if self.guess_value.trim().len() >= 2 {
            self.name_index.names()
        } else {
            &[]
        };

        html! {
            <form id="guess-form" onsubmit={onsubmit}>
                <input
                    type="text"
                    id="guess-input"
                    name="guess"
                    placeholder="Enter your guess"
                    autocomplete="off"
                    required={true}
                    list="countries-list"
                    value={self.guess_value.clone()}
                    oninput={oninput}
                />
                <datalist id="countries-list">
                    { for suggestions.iter().map(|name| html! { <option value={name.clone()} /> }) }
                </datalist>
                <button type="submit" id="submit-btn">{"Submit"}</button>
            </form>
        }
    }

    fn show_result(&self) -> Html {
        let (message, tone) = match (&self.flash, &self.session) {
            (Some(flash), _) => (flash.as_str(), "wrong"),
            (None, Some(session)) => {
                let message = session.result_message();
                let tone = if message.starts_with("Correct!") {
                    "correct"
                } else if message.starts_with("Incorrect") {
                    "try"
                } else {
                    "wrong"
                };
                (message, tone)
            }
            (None, None) => ("", "try"),
        };
        let info = self
            .session
            .as_ref()
            .map(GameSession::guesses_info)
            .unwrap_or("");
        html! {
            <>
                <div id="result" class={classes!(tone)}>{message}</div>
                <div id="guesses-info">{info}</div>
            </>
        }
    }

    fn show_share_button(&self, ctx: &Context<Self>) -> Html {
        let game_over = self.session.as_ref().map(GameSession::is_over).unwrap_or(false);
        if !game_over {
            return html! {};
        }
        html! {
            <button id="share-btn" onclick={ctx.link().callback(|_| Msg::Share)}>
                {"Share your score with your friends! ➤"}
            </button>
        }
    }

    fn show_rules_modal(&self, ctx: &Context<Self>) -> Html {
        if !self.rules_open {
            return html! {};
        }
        let link = ctx.link();
        html! {
            <div id="rules-modal" class="modal" onclick={link.callback(|_| Msg::SetRulesOpen(false))}>
                <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                    <button class="close-modal" id="close-rules"
                        onclick={link.callback(|_| Msg::SetRulesOpen(false))}>
                        {"×"}
                    </button>
                    <h2>{"How to Play"}</h2>
                    <ul>
                        <li><b>{"The aim of this game is to guess the country in as few guesses as possible."}</b></li>
                        <li>{"Every day a new country is chosen and you get 10 clues (each clue getting more obvious), one at a time to guess it."}</li>
                        <li>{"e.g. if the country of the day is \"United Kingdom\", the first clue might be \"It is located in Europe\"."}</li>
                        <li>{"Enter your guess after each clue. You have one guess per clue."}</li>
                        <li>{"If you guess correctly, the flag is revealed and you win!"}</li>
                        <li>{"If you use all 10 clues, you lose and the answer and flag are revealed."}</li>
                        <li>{"Use the difficulty toggles if you want an easier experience."}</li>
                        <li>{"The game resets with a new country every day at 12:00 AM British time."}</li>
                        <li><b>{"Disclaimer:"}</b>{" This game only includes countries that are full members of the United Nations. Disputed territories or partially recognized states are not part of the game."}</li>
                    </ul>
                </div>
            </div>
        }
    }

    fn show_hints_modal(&self, ctx: &Context<Self>) -> Html {
        let session = match (self.hints_open, &self.session) {
            (true, Some(session)) => session,
            _ => return html! {},
        };
        let link = ctx.link();
        html! {
            <div id="hints-modal" class="modal" onclick={link.callback(|_| Msg::SetHintsOpen(false))}>
                <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                    <button class="close-modal" id="close-hints"
                        onclick={link.callback(|_| Msg::SetHintsOpen(false))}>
                        {"×"}
                    </button>
                    <h2>{"Previous Hints"}</h2>
                    <ul id="hints-list">
                        {
                            for session.shown_clues().iter().enumerate().map(|(i, clue)| html! {
                                <li key={i.to_string()}>{format!("Clue {}: {}", i + 1, clue.text())}</li>
                            })
                        }
                    </ul>
                </div>
            </div>
        }
    }
}

fn make_timer(ctx: &Context<App>) -> Interval {
    let link = ctx.link().clone();
    Interval::new(1000, move || link.send_message(Msg::Tick))
}

/// Next rollover instant: local midnight in production, a short fixed window
/// in test mode.
fn next_target_ms() -> f64 {
    if TEST_MODE {
        return js_sys::Date::now() + f64::from(TEST_ROLLOVER_SECONDS) * 1000.0;
    }
    let date = js_sys::Date::new_0();
    date.set_hours(24);
    date.set_minutes(0);
    date.set_seconds(0);
    date.set_milliseconds(0);
    date.get_time()
}
