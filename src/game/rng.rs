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

///
/// The deterministic random source behind everything "random" in a round:
/// which city/export/language a template mentions, and the order each tier's
/// pool is shuffled in.
///
/// Everyone who loads the site on the same calendar day must see the same
/// round, so the generator is seeded from the day's date string and the exact
/// bit transform is pinned here:
///
///   * seeding: a 32-bit FNV-1a pass over the `YYYY-MM-DD` string (the
///     multiply by the FNV prime is expressed as shift-adds)
///   * stepping: a mulberry32 round over the running state, yielding a float
///     in `[0, 1)`
///
/// Do not "improve" either transform; any change silently reshuffles every
/// day's clues for every player.
///
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

impl SeededRng {
    /// Seeds from the day's `YYYY-MM-DD` string (see `calendar::seed_string`).
    pub fn from_seed_str(seed: &str) -> Self {
        let mut h = FNV_OFFSET_BASIS;
        for &b in seed.as_bytes() {
            h ^= u32::from(b);
            // h *= 16777619, spelled out as shift-adds
            h = h.wrapping_add(
                (h << 1)
                    .wrapping_add(h << 4)
                    .wrapping_add(h << 7)
                    .wrapping_add(h << 8)
                    .wrapping_add(h << 24),
            );
        }
        Self { state: h }
    }

    /// Next float in `[0, 1)` (mulberry32 step).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let h = self.state;
        let mut t = (h ^ (h >> 15)).wrapping_mul(h | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Uniform index into a collection of `len` items.
    ///
    /// `len` must be non-zero; callers pick from slices they have already
    /// checked are non-empty.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.next_f64() * len as f64) as usize;
        // next_f64 < 1.0, but guard the boundary anyway
        idx.min(len - 1)
    }
}
