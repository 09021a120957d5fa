use std::ops::Range;

use rand::Rng;

use lotto_core::models::{MAX_NUMBER, PICK_COUNT, Strategy};

/// Taille du pool `stable` (meilleurs rangs).
pub const STABLE_POOL: usize = 10;
/// Taille du pool principal `balanced`.
pub const BALANCED_POOL: usize = 15;
/// Numéros de rêve imposés au plus en `balanced`.
pub const DREAM_PICKS: usize = 2;
/// Pools `challenge` : tête du classement, milieu, et queue (substitut des numéros froids).
pub const CHALLENGE_TOP: Range<usize> = 0..8;
pub const CHALLENGE_MID: Range<usize> = 15..30;
pub const CHALLENGE_COLD_FALLBACK: Range<usize> = 30..45;
pub const CHALLENGE_PICKS_PER_POOL: usize = 2;

/// Entrées de la sélection : classement (numéros par probabilité décroissante), numéros froids, pool de rêve.
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput<'a> {
    pub ranking: &'a [u8],
    pub cold_numbers: &'a [u8],
    pub dream_pool: &'a [u8],
}

fn ranks(ranking: &[u8], range: Range<usize>) -> Vec<u8> {
    ranking.iter().skip(range.start).take(range.len()).copied().collect()
}

/// Tirage uniforme sans remise.
fn draw<R: Rng + ?Sized>(pool: &mut Vec<u8>, rng: &mut R) -> Option<u8> {
    if pool.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..pool.len());
    Some(pool.remove(idx))
}

fn fill_from<R: Rng + ?Sized>(picked: &mut Vec<u8>, mut pool: Vec<u8>, rng: &mut R) {
    while picked.len() < PICK_COUNT {
        let Some(n) = draw(&mut pool, rng) else { break };
        if !picked.contains(&n) {
            picked.push(n);
        }
    }
}

fn pick_stable<R: Rng + ?Sized>(input: &SelectionInput, rng: &mut R) -> Vec<u8> {
    let mut picked = Vec::with_capacity(PICK_COUNT);
    fill_from(&mut picked, ranks(input.ranking, 0..STABLE_POOL), rng);
    picked
}

fn pick_challenge<R: Rng + ?Sized>(input: &SelectionInput, rng: &mut R) -> Vec<u8> {
    let top = ranks(input.ranking, CHALLENGE_TOP);
    let cold = if input.cold_numbers.is_empty() {
        ranks(input.ranking, CHALLENGE_COLD_FALLBACK)
    } else {
        input.cold_numbers.to_vec()
    };
    let mid = ranks(input.ranking, CHALLENGE_MID);

    // pas de dédoublonnage entre pools ici : fait à la finalisation
    let mut picked = Vec::with_capacity(PICK_COUNT);
    for mut pool in [top, cold, mid] {
        for _ in 0..CHALLENGE_PICKS_PER_POOL {
            match draw(&mut pool, rng) {
                Some(n) => picked.push(n),
                None => break,
            }
        }
    }
    picked
}

fn pick_balanced<R: Rng + ?Sized>(input: &SelectionInput, rng: &mut R) -> Vec<u8> {
    let mut picked = Vec::with_capacity(PICK_COUNT);

    if !input.dream_pool.is_empty() {
        let mut dream = input.dream_pool.to_vec();
        let count = DREAM_PICKS.min(dream.len());
        for _ in 0..count {
            if let Some(n) = draw(&mut dream, rng) {
                if !picked.contains(&n) {
                    picked.push(n);
                }
            }
        }
    }

    fill_from(&mut picked, ranks(input.ranking, 0..BALANCED_POOL), rng);
    picked
}

/// Dédoublonne (première occurrence), tronque à six, complète par tirage uniforme sur 1..=45, trie.
pub fn finalize<R: Rng + ?Sized>(picked: Vec<u8>, rng: &mut R) -> [u8; PICK_COUNT] {
    let mut numbers: Vec<u8> = Vec::with_capacity(PICK_COUNT);
    for n in picked {
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }
    numbers.truncate(PICK_COUNT);

    while numbers.len() < PICK_COUNT {
        let n = rng.random_range(1..=MAX_NUMBER);
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }
    numbers.sort();

    let mut grid = [0u8; PICK_COUNT];
    grid.copy_from_slice(&numbers);
    grid
}

pub fn select_numbers<R: Rng + ?Sized>(input: &SelectionInput, strategy: Strategy, rng: &mut R) -> [u8; PICK_COUNT] {
    let picked = match strategy {
        Strategy::Stable => pick_stable(input, rng),
        Strategy::Challenge => pick_challenge(input, rng),
        Strategy::Balanced => pick_balanced(input, rng),
    };
    finalize(picked, rng)
}

/// Six numéros uniformes : repli de l'appelant quand la prédiction échoue.
pub fn random_numbers<R: Rng + ?Sized>(rng: &mut R) -> [u8; PICK_COUNT] {
    finalize(Vec::new(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use lotto_core::models::validate_numbers;

    /// Classement arbitraire (permutation de 1..=45).
    fn shuffled_ranking() -> Vec<u8> {
        (0..45u16).map(|i| ((i * 7) % 45 + 1) as u8).collect()
    }

    fn assert_valid(grid: &[u8; PICK_COUNT]) {
        assert!(validate_numbers(grid).is_ok(), "grille invalide : {grid:?}");
        assert!(grid.windows(2).all(|w| w[0] < w[1]), "grille non triée : {grid:?}");
    }

    #[test]
    fn test_all_strategies_valid() {
        let ranking = shuffled_ranking();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[3, 9], dream_pool: &[8, 12, 45] };
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for strategy in [Strategy::Balanced, Strategy::Stable, Strategy::Challenge] {
                assert_valid(&select_numbers(&input, strategy, &mut rng));
            }
        }
    }

    #[test]
    fn test_stable_within_top_ten() {
        let ranking = shuffled_ranking();
        let top: Vec<u8> = ranking[..10].to_vec();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &[] };
        for seed in 0..100 {
            let grid = select_numbers(&input, Strategy::Stable, &mut StdRng::seed_from_u64(seed));
            assert!(grid.iter().all(|n| top.contains(n)), "{grid:?} hors du top 10 {top:?}");
        }
    }

    #[test]
    fn test_challenge_two_per_pool() {
        let ranking: Vec<u8> = (1..=45).collect();
        let cold = [40, 41, 42, 43];
        let input = SelectionInput { ranking: &ranking, cold_numbers: &cold, dream_pool: &[] };
        for seed in 0..100 {
            let grid = select_numbers(&input, Strategy::Challenge, &mut StdRng::seed_from_u64(seed));
            let from_top = grid.iter().filter(|&&n| (1..=8).contains(&n)).count();
            let from_cold = grid.iter().filter(|&&n| cold.contains(&n)).count();
            let from_mid = grid.iter().filter(|&&n| (16..=30).contains(&n)).count();
            assert_eq!((from_top, from_cold, from_mid), (2, 2, 2), "grille {grid:?}");
        }
    }

    #[test]
    fn test_challenge_cold_fallback_to_tail() {
        let ranking: Vec<u8> = (1..=45).collect();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &[] };
        for seed in 0..50 {
            let grid = select_numbers(&input, Strategy::Challenge, &mut StdRng::seed_from_u64(seed));
            let from_tail = grid.iter().filter(|&&n| n >= 31).count();
            assert_eq!(from_tail, 2, "grille {grid:?}");
        }
    }

    #[test]
    fn test_challenge_overlapping_pools_still_six() {
        // froids inclus dans le top 8 : collisions possibles, complétées par le repli
        let ranking: Vec<u8> = (1..=45).collect();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[1, 2], dream_pool: &[] };
        let mut collided = false;
        for seed in 0..100 {
            let grid = select_numbers(&input, Strategy::Challenge, &mut StdRng::seed_from_u64(seed));
            assert_valid(&grid);
            let outside = grid.iter().filter(|&&n| !(1..=8).contains(&n) && !(16..=30).contains(&n)).count();
            collided |= outside > 0;
        }
        assert!(collided, "au moins un tirage aurait dû passer par le repli");
    }

    #[test]
    fn test_balanced_includes_dream_numbers() {
        let ranking: Vec<u8> = (1..=45).collect();
        let dream = [44, 45];
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &dream };
        for seed in 0..50 {
            let grid = select_numbers(&input, Strategy::Balanced, &mut StdRng::seed_from_u64(seed));
            assert!(grid.contains(&44) && grid.contains(&45), "grille {grid:?}");
            assert!(grid.iter().filter(|&&n| n <= 15).count() == 4);
        }
    }

    #[test]
    fn test_balanced_large_dream_pool_takes_two() {
        let ranking: Vec<u8> = (1..=45).collect();
        let dream = [20, 25, 30, 35, 40];
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &dream };
        for seed in 0..50 {
            let grid = select_numbers(&input, Strategy::Balanced, &mut StdRng::seed_from_u64(seed));
            assert_eq!(grid.iter().filter(|&&n| dream.contains(&n)).count(), 2, "grille {grid:?}");
        }
    }

    #[test]
    fn test_balanced_single_dream_number() {
        let ranking: Vec<u8> = (1..=45).collect();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &[33] };
        let grid = select_numbers(&input, Strategy::Balanced, &mut StdRng::seed_from_u64(7));
        assert!(grid.contains(&33));
        assert_valid(&grid);
    }

    #[test]
    fn test_balanced_without_dream_within_top_fifteen() {
        let ranking = shuffled_ranking();
        let top: Vec<u8> = ranking[..15].to_vec();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &[] };
        for seed in 0..50 {
            let grid = select_numbers(&input, Strategy::Balanced, &mut StdRng::seed_from_u64(seed));
            assert!(grid.iter().all(|n| top.contains(n)));
        }
    }

    #[test]
    fn test_short_pool_filled_by_fallback() {
        let ranking = [5, 6, 7];
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[], dream_pool: &[] };
        let grid = select_numbers(&input, Strategy::Stable, &mut StdRng::seed_from_u64(1));
        assert_valid(&grid);
        assert!(grid.contains(&5) && grid.contains(&6) && grid.contains(&7));
    }

    #[test]
    fn test_finalize_dedup_and_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = finalize(vec![9, 3, 9, 1, 2, 4, 5, 6, 7], &mut rng);
        assert_eq!(grid, [1, 2, 3, 4, 5, 9]);
    }

    #[test]
    fn test_seed_determinism() {
        let ranking = shuffled_ranking();
        let input = SelectionInput { ranking: &ranking, cold_numbers: &[2], dream_pool: &[10, 11] };
        for strategy in [Strategy::Balanced, Strategy::Stable, Strategy::Challenge] {
            let a = select_numbers(&input, strategy, &mut StdRng::seed_from_u64(42));
            let b = select_numbers(&input, strategy, &mut StdRng::seed_from_u64(42));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_random_numbers_valid() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_valid(&random_numbers(&mut rng));
        }
    }
}
