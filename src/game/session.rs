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

use crate::game::clues::Clue;
use crate::game::data::NameIndex;
use crate::game::prelude::*;
use thiserror::Error;

///
/// One day's play: the answer, the selected clue sequence, and everything the
/// player has done against them. Created at rollover (or first load), mutated
/// only by guess submission and the debug clue-skip, replaced wholesale at the
/// next rollover. No ambient state; the UI owns exactly one of these at a
/// time.
///
#[derive(Clone, Debug)]
pub struct GameSession {
    answer_name: String,
    answer_code: String,
    clues: Vec<Clue>,
    infinite: bool,

    hint_index: usize,
    guesses_used: usize,
    previous_guesses: Vec<String>,
    outcome: Outcome,
    result_message: String,
    guesses_info: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Won { final_guess_count: usize },
    Lost,
}

/// Rejected guesses. The messages are user-facing; a rejection never changes
/// session state and never consumes a guess.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessErr {
    #[error("Please enter a valid guess")]
    NotACountry(String),
    #[error("This country has already been guessed.")]
    AlreadyGuessed(String),
    #[error("the round is already over")]
    RoundOver,
}

impl GameSession {
    pub fn new(answer_name: String, answer_code: String, clues: Vec<Clue>, infinite: bool) -> Self {
        Self {
            answer_name,
            answer_code,
            clues,
            infinite,
            hint_index: 0,
            guesses_used: 0,
            previous_guesses: Vec::new(),
            outcome: Outcome::Playing,
            result_message: String::new(),
            guesses_info: String::new(),
        }
    }

    ///
    /// Submits a guess. Unknown names and repeats are rejected without
    /// touching any state. A counted guess either wins the round, advances to
    /// the next clue, wraps back to the first clue (infinite mode), or — out
    /// of clues — loses the round.
    ///
    pub fn submit_guess(&mut self, raw: &str, names: &NameIndex) -> Result<Outcome, GuessErr> {
        if self.is_over() {
            return Err(GuessErr::RoundOver);
        }

        let guess = raw.trim();
        if !names.contains(guess) {
            return Err(GuessErr::NotACountry(guess.to_string()));
        }
        if self
            .previous_guesses
            .iter()
            .any(|prior| prior.eq_ignore_ascii_case(guess))
        {
            return Err(GuessErr::AlreadyGuessed(guess.to_string()));
        }

        self.previous_guesses.push(guess.to_string());
        self.guesses_used += 1;

        if normalize_guess(guess) == normalize_guess(&self.answer_name) {
            self.outcome = Outcome::Won { final_guess_count: self.guesses_used };
            self.result_message = format!("Correct! The country is {}!", self.answer_name);
            self.guesses_info =
                format!("You got it in {}!", count_noun(self.guesses_used, "guess"));
        } else if self.hint_index + 1 < self.clues.len() {
            self.hint_index += 1;
            let clues_left = self.clues.len() - self.hint_index;
            self.result_message =
                format!("Incorrect, you have {} remaining.", count_noun(clues_left, "clue"));
        } else if self.infinite {
            // never runs dry in infinite mode; start the clue list over
            self.hint_index = 0;
            self.result_message = "Incorrect, cycling back to the first clue.".to_string();
        } else {
            self.outcome = Outcome::Lost;
            self.result_message =
                format!("Out of guesses! The country was {}.", self.answer_name);
            self.guesses_info = format!("You used all {} guesses.", CLUES_PER_DAY);
        }

        log::debug!(
            "guess #{} '{}' -> {:?} (hint {}/{})",
            self.guesses_used,
            guess,
            self.outcome,
            self.hint_index + 1,
            self.clues.len(),
        );
        Ok(self.outcome)
    }

    /// Debug-only: advance to the next clue without consuming a guess. No-op
    /// past the end of the list.
    pub fn skip_clue(&mut self) {
        if self.is_over() {
            return;
        }
        if self.hint_index + 1 < self.clues.len() {
            self.hint_index += 1;
            self.result_message = format!("Skipped to clue {}.", self.hint_index + 1);
        } else {
            self.result_message = "No more clues to skip to.".to_string();
        }
    }

    /// Swaps in a re-selected clue sequence (the infinite-clues toggle flips
    /// mid-round). Guesses and outcome survive; the clue cursor restarts.
    pub fn set_clues(&mut self, clues: Vec<Clue>, infinite: bool) {
        self.clues = clues;
        self.infinite = infinite;
        self.hint_index = 0;
    }

    pub fn answer_name(&self) -> &str {
        &self.answer_name
    }

    pub fn answer_code(&self) -> &str {
        &self.answer_code
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        !matches!(self.outcome, Outcome::Playing)
    }

    pub fn hint_index(&self) -> usize {
        self.hint_index
    }

    pub fn guesses_used(&self) -> usize {
        self.guesses_used
    }

    pub fn previous_guesses(&self) -> &[String] {
        &self.previous_guesses
    }

    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    pub fn infinite(&self) -> bool {
        self.infinite
    }

    pub fn current_clue(&self) -> Option<&Clue> {
        self.clues.get(self.hint_index)
    }

    /// Every clue revealed so far, for the "previous clues" view.
    pub fn shown_clues(&self) -> &[Clue] {
        let end = (self.hint_index + 1).min(self.clues.len());
        &self.clues[..end]
    }

    /// "Clue 3: " or, in infinite mode, "Clue 3 of 27: ".
    pub fn clue_label(&self) -> String {
        if self.infinite {
            format!("Clue {} of {}: ", self.hint_index + 1, self.clues.len())
        } else {
            format!("Clue {}: ", self.hint_index + 1)
        }
    }

    pub fn result_message(&self) -> &str {
        &self.result_message
    }

    pub fn guesses_info(&self) -> &str {
        &self.guesses_info
    }

    ///
    /// The name-hint projection: the answer's name with every character
    /// masked, first character revealed once enough guesses have been burned.
    /// Pure function of `guesses_used`; recomputed on demand rather than
    /// stored.
    ///
    pub fn masked_name(&self) -> String {
        let mut chars = self.answer_name.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => {
                let rest = chars.count();
                if self.guesses_used >= NAME_REVEAL_GUESSES {
                    let mut out = String::with_capacity(rest + 1);
                    out.push(first);
                    out.extend(std::iter::repeat('_').take(rest));
                    out
                } else {
                    "_".repeat(rest + 1)
                }
            }
        }
    }

    /// The copy-paste brag (or lament) offered once the round is over.
    pub fn share_message(&self) -> Option<String> {
        match self.outcome {
            Outcome::Playing => None,
            Outcome::Won { final_guess_count } => Some(format!(
                "I bet you can't guess this country in less guesses than me! ({}) {}",
                count_noun(final_guess_count, "guess"),
                SITE_URL,
            )),
            Outcome::Lost => Some(format!(
                "This country is impossible to guess! {}",
                SITE_URL,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRONG: [&str; 10] = [
        "Germany", "Japan", "Spain", "Peru", "Kenya", "Norway", "Chile", "Egypt", "Fiji", "Nepal",
    ];

    fn names() -> NameIndex {
        let mut all: Vec<String> = WRONG.iter().map(|s| s.to_string()).collect();
        all.push("France".to_string());
        all.push("New Zealand".to_string());
        NameIndex::from_names(all)
    }

    fn clues(n: usize) -> Vec<Clue> {
        (0..n).map(|i| Clue::Text(format!("clue {}", i))).collect()
    }

    fn session(clue_count: usize) -> GameSession {
        GameSession::new("France".into(), "fr".into(), clues(clue_count), false)
    }

    #[test]
    fn correct_guess_wins_whatever_the_case() {
        let mut s = session(10);
        assert_eq!(
            s.submit_guess("fRaNcE", &names()),
            Ok(Outcome::Won { final_guess_count: 1 })
        );
        assert!(s.is_over());
        assert_eq!(s.result_message(), "Correct! The country is France!");
        assert_eq!(s.guesses_info(), "You got it in 1 guess!");
    }

    #[test]
    fn win_count_includes_the_winning_guess() {
        let mut s = session(10);
        s.submit_guess("Germany", &names()).unwrap();
        s.submit_guess("Japan", &names()).unwrap();
        assert_eq!(
            s.submit_guess("France", &names()),
            Ok(Outcome::Won { final_guess_count: 3 })
        );
        assert_eq!(s.guesses_info(), "You got it in 3 guesses!");
    }

    #[test]
    fn unknown_guess_is_rejected_without_side_effects() {
        let mut s = session(10);
        let err = s.submit_guess("Narnia", &names()).unwrap_err();
        assert_eq!(err, GuessErr::NotACountry("Narnia".into()));
        assert_eq!(err.to_string(), "Please enter a valid guess");
        assert_eq!(s.guesses_used(), 0);
        assert_eq!(s.hint_index(), 0);
        assert!(s.previous_guesses().is_empty());
    }

    #[test]
    fn duplicate_guess_is_rejected_case_insensitively() {
        let mut s = session(10);
        s.submit_guess("Germany", &names()).unwrap();
        let err = s.submit_guess("  gErMaNy ", &names()).unwrap_err();
        assert_eq!(err.to_string(), "This country has already been guessed.");
        assert_eq!(s.guesses_used(), 1);
        assert_eq!(s.hint_index(), 1);
    }

    #[test]
    fn stored_guesses_stay_unique_case_insensitively() {
        let mut s = session(10);
        for raw in ["Germany", "GERMANY", " germany", "Japan", "japan "] {
            let _ = s.submit_guess(raw, &names());
        }
        let lowered: Vec<String> = s
            .previous_guesses()
            .iter()
            .map(|g| g.to_lowercase())
            .collect();
        let mut deduped = lowered.clone();
        deduped.dedup();
        assert_eq!(lowered, deduped);
        assert_eq!(s.previous_guesses().len(), 2);
    }

    #[test]
    fn wrong_guess_advances_clue_and_reports_remaining() {
        let mut s = session(10);
        assert_eq!(s.submit_guess("Germany", &names()), Ok(Outcome::Playing));
        assert_eq!(s.hint_index(), 1);
        assert_eq!(s.result_message(), "Incorrect, you have 9 clues remaining.");
        assert_eq!(s.shown_clues().len(), 2);
    }

    #[test]
    fn ten_wrong_guesses_lose_the_round() {
        let mut s = session(10);
        for (i, guess) in WRONG.iter().enumerate() {
            let outcome = s.submit_guess(guess, &names()).unwrap();
            if i < 9 {
                assert_eq!(outcome, Outcome::Playing, "lost early at guess {}", i + 1);
            } else {
                assert_eq!(outcome, Outcome::Lost);
            }
        }
        assert_eq!(s.guesses_used(), 10);
        assert_eq!(s.result_message(), "Out of guesses! The country was France.");
        assert_eq!(s.guesses_info(), "You used all 10 guesses.");
    }

    #[test]
    fn guessing_after_the_round_is_rejected() {
        let mut s = session(10);
        s.submit_guess("France", &names()).unwrap();
        assert_eq!(
            s.submit_guess("Germany", &names()),
            Err(GuessErr::RoundOver)
        );
        assert_eq!(s.guesses_used(), 1);
    }

    #[test]
    fn infinite_mode_wraps_instead_of_losing() {
        let mut s = GameSession::new("France".into(), "fr".into(), clues(3), true);
        s.submit_guess("Germany", &names()).unwrap();
        s.submit_guess("Japan", &names()).unwrap();
        assert_eq!(s.hint_index(), 2);
        // out of clues: wrap, not loss
        assert_eq!(s.submit_guess("Spain", &names()), Ok(Outcome::Playing));
        assert_eq!(s.hint_index(), 0);
        assert_eq!(s.result_message(), "Incorrect, cycling back to the first clue.");
    }

    #[test]
    fn skip_clue_advances_without_a_guess() {
        let mut s = session(3);
        s.skip_clue();
        assert_eq!(s.hint_index(), 1);
        assert_eq!(s.guesses_used(), 0);
        assert_eq!(s.result_message(), "Skipped to clue 2.");

        s.skip_clue();
        s.skip_clue();
        assert_eq!(s.hint_index(), 2);
        assert_eq!(s.result_message(), "No more clues to skip to.");
    }

    #[test]
    fn empty_clue_list_degrades_to_a_loss() {
        let mut s = GameSession::new("France".into(), "fr".into(), Vec::new(), false);
        assert!(s.current_clue().is_none());
        assert_eq!(s.submit_guess("Germany", &names()), Ok(Outcome::Lost));
    }

    #[test]
    fn masked_name_hides_everything_until_late_game() {
        let mut s = session(10);
        assert_eq!(s.masked_name(), "______");
        for guess in WRONG.iter().take(8) {
            s.submit_guess(guess, &names()).unwrap();
        }
        assert_eq!(s.guesses_used(), 8);
        assert_eq!(s.masked_name(), "F_____");
    }

    #[test]
    fn masked_name_covers_spaces_too() {
        let s = GameSession::new("New Zealand".into(), "nz".into(), clues(10), false);
        assert_eq!(s.masked_name(), "___________");
        assert_eq!(s.masked_name().chars().count(), "New Zealand".chars().count());
    }

    #[test]
    fn share_message_matches_outcome() {
        let mut s = session(10);
        assert_eq!(s.share_message(), None);
        s.submit_guess("Germany", &names()).unwrap();
        s.submit_guess("France", &names()).unwrap();
        let message = s.share_message().unwrap();
        assert!(message.contains("(2 guesses)"));
        assert!(message.contains(SITE_URL));
    }

    #[test]
    fn clue_labels_mention_totals_only_in_infinite_mode() {
        let mut s = session(10);
        assert_eq!(s.clue_label(), "Clue 1: ");
        s.set_clues(clues(12), true);
        assert_eq!(s.clue_label(), "Clue 1 of 12: ");
    }

    #[test]
    fn swapping_clues_preserves_guesses() {
        let mut s = session(10);
        s.submit_guess("Germany", &names()).unwrap();
        s.set_clues(clues(20), true);
        assert_eq!(s.guesses_used(), 1);
        assert_eq!(s.hint_index(), 0);
        assert_eq!(s.clue_count(), 20);
    }
}
