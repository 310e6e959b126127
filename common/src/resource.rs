//! Resource types traded in the auction and their unit cost bands.
//!
//! The contract weighs each resource type by its relative size, so a
//! unit of type 2 counts four times a unit of type 0 when computing a
//! bid's volume.

pub const RESOURCE_TYPES: usize = 3;

pub const RESOURCE_WEIGHTS: [u32; RESOURCE_TYPES] = [1, 2, 4];

/// Quantities are sampled from `0..MAX_QUANTITY`
pub const MAX_QUANTITY: u32 = 10;

pub type Quantities = [u32; RESOURCE_TYPES];

/// Half-open unit cost range `[low, high)` for one resource type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub const fn new(low: f64, high: f64) -> PriceBand {
        PriceBand { low, high }
    }

    #[inline(always)]
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price < self.high
    }
}

const LOWER_UNIT_COST: f64 = 0.1;
const UPPER_UNIT_COST: f64 = 0.2;

/// Each band doubles the previous one.
pub const PRICE_BANDS: [PriceBand; RESOURCE_TYPES] = [
    PriceBand::new(LOWER_UNIT_COST, UPPER_UNIT_COST),
    PriceBand::new(UPPER_UNIT_COST, UPPER_UNIT_COST * 2.0),
    PriceBand::new(UPPER_UNIT_COST * 2.0, UPPER_UNIT_COST * 4.0),
];

/// Dot product of the quantities with [`RESOURCE_WEIGHTS`].
#[inline(always)]
pub fn weighted_volume(quantities: &Quantities) -> u32 {
    quantities
        .iter()
        .zip(RESOURCE_WEIGHTS)
        .map(|(q, w)| q * w)
        .sum()
}

/// Round to whole cents.
#[inline(always)]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[test]
fn volume_uses_weights() {
    assert_eq!(weighted_volume(&[0, 0, 0]), 0);
    assert_eq!(weighted_volume(&[1, 1, 1]), 7);
    assert_eq!(weighted_volume(&[3, 0, 2]), 11);
    assert_eq!(weighted_volume(&[9, 9, 9]), 63);
}

#[test]
fn bands_double() {
    for pair in PRICE_BANDS.windows(2) {
        assert_eq!(pair[0].high, pair[1].low);
        assert!(
            (pair[1].high - 2.0 * pair[0].high).abs() < 1e-12
        );
    }
    assert!(PRICE_BANDS[0].contains(0.1));
    assert!(!PRICE_BANDS[0].contains(0.2));
}

#[test]
fn rounding() {
    assert_eq!(round_cents(1.234), 1.23);
    assert_eq!(round_cents(1.236), 1.24);
    assert_eq!(round_cents(0.0), 0.0);
    assert_eq!(round_cents(42.0), 42.0);
}
