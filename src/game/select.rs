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
use crate::game::prelude::*;
use crate::game::rng::SeededRng;

///
/// Assembles the day's ordered clue sequence from the three tier pools.
///
/// Each pool is Fisher–Yates shuffled with the shared seeded source, then the
/// quotas are taken in hard → medium → easy order (3 + 3 + 4). When a short
/// pool leaves the round under ten clues, the gap is backfilled from whatever
/// remains, in post-shuffle hard → medium → easy order — best effort, only
/// reachable with sparse source data. In infinite mode every remaining clue is
/// appended after the base round instead, with no cap.
///
/// Because each clue is moved out of its pool exactly once, nothing here can
/// select the same pool entry twice, even when two templates rendered
/// identical text.
///
/// For a fixed seed and fixed pools the result is identical on every call.
///
pub fn select_daily(
    mut hard: Vec<Clue>,
    mut medium: Vec<Clue>,
    mut easy: Vec<Clue>,
    rng: &mut SeededRng,
    infinite: bool,
) -> Vec<Clue> {
    shuffle(&mut hard, rng);
    shuffle(&mut medium, rng);
    shuffle(&mut easy, rng);

    let mut selected = Vec::with_capacity(CLUES_PER_DAY);
    let mut leftovers = Vec::new();
    for (pool, quota) in [(hard, HARD_PICKS), (medium, MEDIUM_PICKS), (easy, EASY_PICKS)] {
        let mut drain = pool.into_iter();
        selected.extend(drain.by_ref().take(quota));
        leftovers.extend(drain);
    }

    if infinite {
        selected.extend(leftovers);
    } else {
        let missing = CLUES_PER_DAY.saturating_sub(selected.len());
        selected.extend(leftovers.into_iter().take(missing));
    }
    selected
}

/// In-place Fisher–Yates driven by the seeded source.
fn shuffle(pool: &mut [Clue], rng: &mut SeededRng) {
    for i in (1..pool.len()).rev() {
        let j = rng.pick_index(i + 1);
        pool.swap(i, j);
    }
}
