//! Deterministic fixture rng based on xxhash. Not cryptographically
//! secure; the output for a seed does not depend on the `rand` version.
use rand::{RngCore, SeedableRng};
use xxhash_rust::{
    const_xxh3::{self, const_custom_default_secret},
    xxh3::xxh3_64_with_secret,
};

const FIXTURE_SECRET_SEED: u64 = u64::from_le_bytes(*b"xFIXTURE");
const FIXTURE_SECRET: [u8; 192] =
    const_custom_default_secret(FIXTURE_SECRET_SEED);

#[derive(Clone, Debug)]
pub struct FixtureRng {
    state: u64,
}

impl FixtureRng {
    pub const fn new(seed: u64) -> FixtureRng {
        FixtureRng {
            state: const_xxh3::xxh3_64_with_secret(
                &seed.to_le_bytes(),
                &FIXTURE_SECRET,
            ),
        }
    }

    #[inline(always)]
    fn advance(&mut self) -> u64 {
        let old_state = self.state;
        self.state =
            xxh3_64_with_secret(&old_state.to_le_bytes(), &FIXTURE_SECRET);

        // Fixed point of the hash chain, step off it
        if old_state == self.state {
            log::warn!("fixture rng hit a cyclic state");
            self.state = self.state.rotate_right(32);
        }

        self.state
    }
}

impl RngCore for FixtureRng {
    fn next_u32(&mut self) -> u32 {
        // Take lower bits
        self.advance() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(
        &mut self,
        dest: &mut [u8],
    ) -> Result<(), rand::Error> {
        self.fill_bytes(dest);

        Ok(())
    }
}

impl SeedableRng for FixtureRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        FixtureRng::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        FixtureRng::new(state)
    }
}

#[test]
fn same_seed_same_stream() {
    let mut a = FixtureRng::new(0xABC);
    let mut b = FixtureRng::seed_from_u64(0xABC);
    for _ in 0..1_000 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn seeds_diverge() {
    let mut a = FixtureRng::new(1);
    let mut b = FixtureRng::new(2);
    let a: Vec<u64> = (0..16).map(|_| a.next_u64()).collect();
    let b: Vec<u64> = (0..16).map(|_| b.next_u64()).collect();
    assert_ne!(a, b);
}

#[test]
fn fill_partial_words() {
    let mut rng = FixtureRng::new(0x123);
    let mut expected = FixtureRng::new(0x123);

    let mut dest = [0u8; 13];
    rng.fill_bytes(&mut dest);

    let first = expected.next_u64().to_le_bytes();
    let second = expected.next_u64().to_le_bytes();
    assert_eq!(&dest[..8], &first);
    assert_eq!(&dest[8..], &second[..5]);
}

#[test]
fn from_seed_matches_new() {
    let mut a = FixtureRng::from_seed(7u64.to_le_bytes());
    let mut b = FixtureRng::new(7);
    assert_eq!(a.next_u32(), b.next_u32());
}
