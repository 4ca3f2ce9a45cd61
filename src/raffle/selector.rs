//! Winner selection: uniform sampling without replacement

use rand::Rng;

/// Draw up to `max_winners` distinct entries using the thread-local RNG
pub fn draw_winners<T: Clone>(entries: &[T], max_winners: usize) -> Vec<T> {
    draw(entries, max_winners, &mut rand::thread_rng())
}

/// Draw `min(max_winners, entries.len())` entries without replacement
///
/// When everyone fits, all entries win in their original order. Otherwise a
/// uniformly random index is taken from a shrinking candidate pool and the
/// chosen entry is swap-removed, so each winner costs exactly one draw.
/// `entries` must not contain duplicates.
pub fn draw<T: Clone, R: Rng + ?Sized>(entries: &[T], max_winners: usize, rng: &mut R) -> Vec<T> {
    if max_winners >= entries.len() {
        return entries.to_vec();
    }

    let mut pool = entries.to_vec();
    let mut winners = Vec::with_capacity(max_winners);
    while winners.len() < max_winners {
        let index = rng.gen_range(0..pool.len());
        winners.push(pool.swap_remove(index));
    }
    winners
}
