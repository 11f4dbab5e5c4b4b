// Quartets – a word-grouping puzzle
// Copyright (C) 2025  Quartets contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use rand::Rng;

/// Fisher–Yates shuffle. Every permutation of the slice is equally
/// likely. The elements are swapped in place so anything stored
/// alongside a value, like a card's origin group, travels with it.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn preserves_the_multiset() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items = (0..16).collect::<Vec<u32>>();

        shuffle(&mut items, &mut rng);

        assert_eq!(items.len(), 16);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<u32>>());
    }

    #[test]
    fn keeps_values_with_their_tags() {
        let mut rng = StdRng::seed_from_u64(123);
        let mut items = (0..16).map(|n| (n, n / 4)).collect::<Vec<_>>();

        shuffle(&mut items, &mut rng);

        for (n, tag) in items {
            assert_eq!(tag, n / 4);
        }
    }

    #[test]
    fn every_position_can_move() {
        // With enough seeds each element should land somewhere other
        // than its starting position at least once
        let mut moved = [false; 8];

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut items = (0..8).collect::<Vec<usize>>();

            shuffle(&mut items, &mut rng);

            for (position, &value) in items.iter().enumerate() {
                if position != value {
                    moved[value] = true;
                }
            }
        }

        assert!(moved.iter().all(|&m| m));
    }

    #[test]
    fn degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(0);

        let mut empty: [u32; 0] = [];
        shuffle(&mut empty, &mut rng);

        let mut single = [7];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, [7]);
    }
}
