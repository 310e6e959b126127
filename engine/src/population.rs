use bid_fixtures_common::{
    participant::{Buyer, Role, Seller},
    resource::{
        round_cents, weighted_volume, Quantities, MAX_QUANTITY,
        PRICE_BANDS, RESOURCE_TYPES,
    },
    MAX_PARTICIPANTS,
};
use rand::{distributions::Uniform, Rng};
use rand_distr::{Distribution, Normal};

use crate::error::{FixtureError, FixtureResult};

pub const DEFAULT_PARTICIPANTS: usize = 100;
pub const DEFAULT_TIME_MEAN: f64 = 4.0;
pub const DEFAULT_TIME_STD_DEV: f64 = 1.0;

/// Shortest time a participant can ask for or offer
const MIN_TIME: u32 = 1;

#[derive(Clone, Debug)]
pub struct PopulationParams {
    pub buyers: usize,
    pub sellers: usize,
    pub time_mean: f64,
    pub time_std_dev: f64,
    /// Allow populations larger than the contract can hold
    pub uncapped: bool,
}

impl Default for PopulationParams {
    fn default() -> Self {
        PopulationParams {
            buyers: DEFAULT_PARTICIPANTS,
            sellers: DEFAULT_PARTICIPANTS,
            time_mean: DEFAULT_TIME_MEAN,
            time_std_dev: DEFAULT_TIME_STD_DEV,
            uncapped: false,
        }
    }
}

impl PopulationParams {
    pub fn validate(&self) -> FixtureResult {
        if self.uncapped {
            return Ok(());
        }

        for (role, count) in
            [(Role::Buyer, self.buyers), (Role::Seller, self.sellers)]
        {
            if count > MAX_PARTICIPANTS {
                return Err(FixtureError::TooManyParticipants {
                    role,
                    count,
                    max: MAX_PARTICIPANTS,
                });
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Population {
    pub buyers: Vec<Buyer>,
    pub sellers: Vec<Seller>,
}

/// Samples buyers and sellers.
///
/// Every draw comes from the caller's rng, so a seeded rng yields the
/// same population on every run.
pub struct PopulationGenerator {
    quantity: Uniform<u32>,
    time: Normal<f64>,
    unit_cost: [Uniform<f64>; RESOURCE_TYPES],
}

impl PopulationGenerator {
    pub fn new(time_mean: f64, time_std_dev: f64) -> FixtureResult<Self> {
        let invalid = || FixtureError::TimeDistribution {
            mean: time_mean,
            std_dev: time_std_dev,
        };

        // `Normal::new` lets a negative std-dev through
        if !(time_mean.is_finite()
            && time_std_dev.is_finite()
            && time_std_dev >= 0.0)
        {
            return Err(invalid());
        }

        Ok(PopulationGenerator {
            quantity: Uniform::new(0, MAX_QUANTITY),
            time: Normal::new(time_mean, time_std_dev)
                .map_err(|_| invalid())?,
            unit_cost: PRICE_BANDS
                .map(|band| Uniform::new(band.low, band.high)),
        })
    }

    pub fn generate<R: Rng>(
        &self,
        buyers: usize,
        sellers: usize,
        rng: &mut R,
    ) -> Population {
        let buyers = (1..=buyers as u32)
            .map(|id| self.buyer(id, rng))
            .collect();
        let sellers = (1..=sellers as u32)
            .map(|id| self.seller(id, rng))
            .collect();

        Population { buyers, sellers }
    }

    pub fn buyer<R: Rng>(&self, id: u32, rng: &mut R) -> Buyer {
        let quantities = self.quantities(rng);
        let time = self.sample_time(rng);

        // Bundle price scales with volume and duration
        let unit_cost = self.unit_cost[0].sample(rng);
        let price = round_cents(
            unit_cost * f64::from(weighted_volume(&quantities)) * time,
        );

        Buyer {
            id,
            quantities,
            price,
            time: whole_time(time),
        }
    }

    pub fn seller<R: Rng>(&self, id: u32, rng: &mut R) -> Seller {
        let quantities = self.quantities(rng);
        let times =
            core::array::from_fn(|_| whole_time(self.sample_time(rng)));
        let prices = core::array::from_fn(|resource| {
            round_cents(self.unit_cost[resource].sample(rng))
        });

        Seller {
            id,
            quantities,
            prices,
            times,
        }
    }

    fn quantities<R: Rng>(&self, rng: &mut R) -> Quantities {
        core::array::from_fn(|_| self.quantity.sample(rng))
    }

    /// Negative draws are replaced with one unit of time
    fn sample_time<R: Rng>(&self, rng: &mut R) -> f64 {
        let time = self.time.sample(rng);
        if time < 0.0 {
            f64::from(MIN_TIME)
        } else {
            time
        }
    }
}

#[inline(always)]
fn whole_time(time: f64) -> u32 {
    (time.trunc() as u32).max(MIN_TIME)
}

/// Validates `params` and samples a full population.
pub fn generate_population<R: Rng>(
    params: &PopulationParams,
    rng: &mut R,
) -> FixtureResult<Population> {
    params.validate()?;
    let generator =
        PopulationGenerator::new(params.time_mean, params.time_std_dev)?;
    let population =
        generator.generate(params.buyers, params.sellers, rng);

    log::debug!(
        "generated {} buyers and {} sellers",
        population.buyers.len(),
        population.sellers.len()
    );

    Ok(population)
}

#[cfg(test)]
fn is_cents(value: f64) -> bool {
    (value * 100.0 - (value * 100.0).round()).abs() < 1e-6
}

#[test]
fn buyers_hold_invariants() {
    use crate::rng::FixtureRng;

    let mut rng = FixtureRng::new(0xB1D);
    let population =
        generate_population(&PopulationParams::default(), &mut rng)
            .unwrap();

    assert_eq!(population.buyers.len(), DEFAULT_PARTICIPANTS);
    for (i, buyer) in population.buyers.iter().enumerate() {
        assert_eq!(buyer.id as usize, i + 1);
        assert_eq!(buyer.quantities.len(), RESOURCE_TYPES);
        assert!(buyer.quantities.iter().all(|q| *q < MAX_QUANTITY));
        assert!(buyer.time >= MIN_TIME);
        assert!(buyer.price >= 0.0);
        assert!(is_cents(buyer.price), "{}", buyer.price);
    }
}

#[test]
fn sellers_hold_invariants() {
    use crate::rng::FixtureRng;

    let mut rng = FixtureRng::new(0x5E11);
    let population =
        generate_population(&PopulationParams::default(), &mut rng)
            .unwrap();

    assert_eq!(population.sellers.len(), DEFAULT_PARTICIPANTS);
    for (i, seller) in population.sellers.iter().enumerate() {
        assert_eq!(seller.id as usize, i + 1);
        assert!(seller.quantities.iter().all(|q| *q < MAX_QUANTITY));
        assert!(seller.times.iter().all(|t| *t >= MIN_TIME));
        for (price, band) in seller.prices.iter().zip(PRICE_BANDS) {
            // Rounding can land exactly on the upper edge
            assert!(band.low <= *price && *price <= band.high);
            assert!(is_cents(*price), "{price}");
        }
    }
}

#[test]
fn wide_time_distribution_clamps() {
    use crate::rng::FixtureRng;

    // Mean 0 puts half the draws below zero
    let generator = PopulationGenerator::new(0.0, 3.0).unwrap();
    let mut rng = FixtureRng::new(42);
    let population = generator.generate(500, 500, &mut rng);

    assert!(population.buyers.iter().all(|b| b.time >= MIN_TIME));
    assert!(population.buyers.iter().all(|b| b.price >= 0.0));
    assert!(population
        .sellers
        .iter()
        .all(|s| s.times.iter().all(|t| *t >= MIN_TIME)));
}

#[test]
fn buyer_price_tracks_volume() {
    use crate::rng::FixtureRng;

    let generator = PopulationGenerator::new(4.0, 1.0).unwrap();
    let mut rng = FixtureRng::new(9);
    for id in 1..=200 {
        let buyer = generator.buyer(id, &mut rng);
        if weighted_volume(&buyer.quantities) == 0 {
            assert_eq!(buyer.price, 0.0);
        }
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    use crate::rng::FixtureRng;

    let params = PopulationParams::default();
    let a = generate_population(&params, &mut FixtureRng::new(77))
        .unwrap();
    let b = generate_population(&params, &mut FixtureRng::new(77))
        .unwrap();
    assert_eq!(a.buyers, b.buyers);
    assert_eq!(a.sellers, b.sellers);
}

#[test]
fn cap_is_enforced() {
    use crate::rng::FixtureRng;

    let mut rng = FixtureRng::new(1);
    let params = PopulationParams {
        buyers: MAX_PARTICIPANTS + 1,
        ..Default::default()
    };
    assert!(matches!(
        generate_population(&params, &mut rng),
        Err(FixtureError::TooManyParticipants {
            role: Role::Buyer,
            count: 101,
            max: MAX_PARTICIPANTS,
        })
    ));

    let params = PopulationParams {
        sellers: MAX_PARTICIPANTS + 1,
        ..Default::default()
    };
    assert!(matches!(
        generate_population(&params, &mut rng),
        Err(FixtureError::TooManyParticipants {
            role: Role::Seller,
            ..
        })
    ));

    let params = PopulationParams {
        buyers: MAX_PARTICIPANTS + 1,
        uncapped: true,
        ..Default::default()
    };
    let population = generate_population(&params, &mut rng).unwrap();
    assert_eq!(population.buyers.len(), MAX_PARTICIPANTS + 1);
}

#[test]
fn empty_population() {
    use crate::rng::FixtureRng;

    let params = PopulationParams {
        buyers: 0,
        sellers: 0,
        ..Default::default()
    };
    let population =
        generate_population(&params, &mut FixtureRng::new(3)).unwrap();
    assert!(population.buyers.is_empty());
    assert!(population.sellers.is_empty());
}

#[test]
fn negative_std_dev_rejected() {
    assert!(matches!(
        PopulationGenerator::new(4.0, -1.0),
        Err(FixtureError::TimeDistribution { std_dev, .. })
            if std_dev == -1.0
    ));
    assert!(matches!(
        PopulationGenerator::new(4.0, f64::INFINITY),
        Err(FixtureError::TimeDistribution { .. })
    ));
    assert!(PopulationGenerator::new(4.0, 0.0).is_ok());
}

#[test]
fn non_finite_mean_rejected() {
    use crate::rng::FixtureRng;

    for time_mean in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let params = PopulationParams {
            time_mean,
            ..Default::default()
        };
        assert!(matches!(
            generate_population(&params, &mut FixtureRng::new(8)),
            Err(FixtureError::TimeDistribution { .. })
        ));
    }
}

#[test]
fn zero_std_dev_times_are_exact() {
    use crate::rng::FixtureRng;

    let generator = PopulationGenerator::new(4.0, 0.0).unwrap();
    let population = generator.generate(20, 20, &mut FixtureRng::new(4));
    assert!(population.buyers.iter().all(|b| b.time == 4));
    assert!(population.buyers.iter().all(|b| b.price.is_finite()));
    assert!(population.sellers.iter().all(|s| s.times == [4, 4, 4]));
}
