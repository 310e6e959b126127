//! Renders a population into the shell scripts that drive the demo's
//! node clients.
use std::io::Write;

use bid_fixtures_common::participant::{Address, Participant, Role};

use crate::{error::FixtureResult, feedback::Rating, population::Population};

pub const DEFAULT_SCRIPT_DIR: &str = "..";
/// Left as a positional so one script can bid into any auction
pub const DEFAULT_AUCTION_ARG: &str = "$1";

/// Fixed parts of every emitted command.
#[derive(Clone, Debug)]
pub struct CommandTemplate {
    pub script_dir: String,
    pub auction: String,
}

impl Default for CommandTemplate {
    fn default() -> Self {
        CommandTemplate {
            script_dir: DEFAULT_SCRIPT_DIR.to_string(),
            auction: DEFAULT_AUCTION_ARG.to_string(),
        }
    }
}

impl CommandTemplate {
    pub fn enroll_user<P: Participant>(&self, participant: &P) -> String {
        self.node("registerEnrollUser.js", participant)
    }

    pub fn register_account<P: Participant>(
        &self,
        participant: &P,
    ) -> String {
        self.node("registerAccount.js", participant)
    }

    pub fn bid<P: Participant>(&self, participant: &P) -> String {
        format!(
            "{} {} {}",
            self.node("bid.js", participant),
            self.auction,
            participant.bid_args()
        )
    }

    pub fn withdraw<P: Participant>(&self, participant: &P) -> String {
        format!("{} {}", self.node("withdraw.js", participant), self.auction)
    }

    pub fn rating(&self, rating: &Rating) -> String {
        let buyer = Address {
            role: Role::Buyer,
            id: rating.buyer,
        };
        let seller = Address {
            role: Role::Seller,
            id: rating.seller,
        };
        format!(
            "node {}/updateRating.js {} {buyer} {} {seller}",
            self.script_dir,
            Role::Buyer.org(),
            rating.score,
        )
    }

    #[inline(always)]
    fn node<P: Participant>(&self, script: &str, participant: &P) -> String {
        format!(
            "node {}/{script} {} {}",
            self.script_dir,
            participant.org(),
            participant.address()
        )
    }
}

/// Line counts per emitted stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub registrations: usize,
    pub bids: usize,
}

/// Writes registrations to `accounts` and bids to `bids`, buyers first.
pub fn write_fixtures<A: Write, B: Write>(
    population: &Population,
    template: &CommandTemplate,
    accounts: &mut A,
    bids: &mut B,
) -> FixtureResult<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for buyer in &population.buyers {
        write_participant(buyer, template, accounts, bids, &mut summary)?;
    }
    for seller in &population.sellers {
        write_participant(seller, template, accounts, bids, &mut summary)?;
    }

    Ok(summary)
}

fn write_participant<P: Participant, A: Write, B: Write>(
    participant: &P,
    template: &CommandTemplate,
    accounts: &mut A,
    bids: &mut B,
    summary: &mut ScriptSummary,
) -> FixtureResult {
    writeln!(accounts, "{}", template.enroll_user(participant))?;
    writeln!(accounts, "{}", template.register_account(participant))?;
    writeln!(bids, "{}", template.bid(participant))?;
    summary.registrations += 2;
    summary.bids += 1;

    Ok(())
}

/// Only buyers withdraw; the contract resolves the caller among them.
pub fn write_withdrawals<W: Write>(
    population: &Population,
    template: &CommandTemplate,
    out: &mut W,
) -> FixtureResult<usize> {
    for buyer in &population.buyers {
        writeln!(out, "{}", template.withdraw(buyer))?;
    }

    Ok(population.buyers.len())
}

pub fn write_ratings<W: Write>(
    ratings: &[Rating],
    template: &CommandTemplate,
    out: &mut W,
) -> FixtureResult<usize> {
    for rating in ratings {
        writeln!(out, "{}", template.rating(rating))?;
    }

    Ok(ratings.len())
}

#[cfg(test)]
fn sample_population() -> Population {
    use bid_fixtures_common::participant::{Buyer, Seller};

    Population {
        buyers: vec![
            Buyer {
                id: 1,
                quantities: [3, 0, 9],
                price: 12.34,
                time: 4,
            },
            Buyer {
                id: 2,
                quantities: [0, 0, 0],
                price: 0.0,
                time: 1,
            },
        ],
        sellers: vec![Seller {
            id: 1,
            quantities: [5, 6, 7],
            prices: [0.15, 0.3, 0.8],
            times: [3, 4, 5],
        }],
    }
}

#[cfg(test)]
fn lines(bytes: &[u8]) -> Vec<&str> {
    std::str::from_utf8(bytes).unwrap().lines().collect()
}

#[test]
fn exact_lines() {
    let population = sample_population();
    let mut accounts = Vec::new();
    let mut bids = Vec::new();
    let summary = write_fixtures(
        &population,
        &CommandTemplate::default(),
        &mut accounts,
        &mut bids,
    )
    .unwrap();

    assert_eq!(
        summary,
        ScriptSummary {
            registrations: 6,
            bids: 3
        }
    );
    assert_eq!(
        lines(&accounts),
        [
            "node ../registerEnrollUser.js org1 buyer1",
            "node ../registerAccount.js org1 buyer1",
            "node ../registerEnrollUser.js org1 buyer2",
            "node ../registerAccount.js org1 buyer2",
            "node ../registerEnrollUser.js org2 seller1",
            "node ../registerAccount.js org2 seller1",
        ]
    );
    assert_eq!(
        lines(&bids),
        [
            "node ../bid.js org1 buyer1 $1 12.34 4 3,0,9",
            "node ../bid.js org1 buyer2 $1 0.0 1 0,0,0",
            "node ../bid.js org2 seller1 $1 0.15,0.3,0.8 3,4,5 5,6,7",
        ]
    );
}

#[test]
fn custom_template() {
    let template = CommandTemplate {
        script_dir: "/opt/auction".to_string(),
        auction: "auction42".to_string(),
    };
    let population = sample_population();

    assert_eq!(
        template.bid(&population.sellers[0]),
        "node /opt/auction/bid.js org2 seller1 auction42 0.15,0.3,0.8 3,4,5 5,6,7"
    );
    assert_eq!(
        template.withdraw(&population.buyers[1]),
        "node /opt/auction/withdraw.js org1 buyer2 auction42"
    );
}

#[test]
fn line_counts_match_population() {
    use crate::{
        population::{generate_population, PopulationParams},
        rng::FixtureRng,
    };

    let params = PopulationParams {
        buyers: 37,
        sellers: 58,
        ..Default::default()
    };
    let population =
        generate_population(&params, &mut FixtureRng::new(11)).unwrap();

    let mut accounts = Vec::new();
    let mut bids = Vec::new();
    let summary = write_fixtures(
        &population,
        &CommandTemplate::default(),
        &mut accounts,
        &mut bids,
    )
    .unwrap();

    assert_eq!(lines(&accounts).len(), 2 * (37 + 58));
    assert_eq!(lines(&bids).len(), 37 + 58);
    assert_eq!(summary.registrations, 2 * (37 + 58));
    assert_eq!(summary.bids, 37 + 58);
}

#[test]
fn seeded_scripts_are_identical() {
    use crate::{
        population::{generate_population, PopulationParams},
        rng::FixtureRng,
    };

    let render = |seed| {
        let population = generate_population(
            &PopulationParams::default(),
            &mut FixtureRng::new(seed),
        )
        .unwrap();
        let mut accounts = Vec::new();
        let mut bids = Vec::new();
        write_fixtures(
            &population,
            &CommandTemplate::default(),
            &mut accounts,
            &mut bids,
        )
        .unwrap();
        (accounts, bids)
    };

    assert_eq!(render(2024), render(2024));
    assert_ne!(render(2024).1, render(2025).1);
}

#[test]
fn withdrawals_and_ratings() {
    let population = sample_population();
    let template = CommandTemplate::default();

    let mut out = Vec::new();
    let written =
        write_withdrawals(&population, &template, &mut out).unwrap();
    assert_eq!(written, 2);
    assert_eq!(
        lines(&out),
        [
            "node ../withdraw.js org1 buyer1 $1",
            "node ../withdraw.js org1 buyer2 $1",
        ]
    );

    let ratings = [Rating {
        buyer: 2,
        seller: 1,
        score: 7,
    }];
    let mut out = Vec::new();
    let written = write_ratings(&ratings, &template, &mut out).unwrap();
    assert_eq!(written, 1);
    assert_eq!(
        lines(&out),
        ["node ../updateRating.js org1 buyer2 7 seller1"]
    );
}

#[test]
fn io_errors_surface() {
    use crate::error::FixtureError;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let result = write_fixtures(
        &sample_population(),
        &CommandTemplate::default(),
        &mut Broken,
        &mut Vec::new(),
    );
    assert!(matches!(result, Err(FixtureError::Io(_))));
}
