//! Buyer feedback on sellers, fed to the contract's rating system after
//! an auction has settled.
use rand::{distributions::Uniform, Rng};
use rand_distr::Distribution;

use crate::population::Population;

pub const MIN_SCORE: u32 = 1;
pub const MAX_SCORE: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rating {
    pub buyer: u32,
    pub seller: u32,
    pub score: u32,
}

/// Every buyer scores one seller picked uniformly at random.
pub fn sample_ratings<R: Rng>(
    population: &Population,
    rng: &mut R,
) -> Vec<Rating> {
    if population.sellers.is_empty() {
        return Vec::new();
    }

    let seller = Uniform::new(0, population.sellers.len());
    let score = Uniform::new_inclusive(MIN_SCORE, MAX_SCORE);

    population
        .buyers
        .iter()
        .map(|buyer| Rating {
            buyer: buyer.id,
            seller: population.sellers[seller.sample(rng)].id,
            score: score.sample(rng),
        })
        .collect()
}

#[test]
fn one_rating_per_buyer() {
    use crate::{
        population::{generate_population, PopulationParams},
        rng::FixtureRng,
    };

    let mut rng = FixtureRng::new(0xFEED);
    let params = PopulationParams {
        buyers: 40,
        sellers: 7,
        ..Default::default()
    };
    let population = generate_population(&params, &mut rng).unwrap();
    let ratings = sample_ratings(&population, &mut rng);

    assert_eq!(ratings.len(), 40);
    for (rating, buyer) in ratings.iter().zip(&population.buyers) {
        assert_eq!(rating.buyer, buyer.id);
        assert!((1..=7).contains(&rating.seller));
        assert!((MIN_SCORE..=MAX_SCORE).contains(&rating.score));
    }
}

#[test]
fn no_sellers_no_ratings() {
    use crate::{
        population::{generate_population, PopulationParams},
        rng::FixtureRng,
    };

    let mut rng = FixtureRng::new(5);
    let params = PopulationParams {
        sellers: 0,
        ..Default::default()
    };
    let population = generate_population(&params, &mut rng).unwrap();
    assert!(sample_ratings(&population, &mut rng).is_empty());
}
