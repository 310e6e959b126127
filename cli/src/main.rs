use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use bid_fixtures_engine::{
    feedback::sample_ratings,
    population::{
        DEFAULT_PARTICIPANTS, DEFAULT_TIME_MEAN, DEFAULT_TIME_STD_DEV,
    },
    rng::FixtureRng,
    script::{
        write_fixtures, write_ratings, write_withdrawals,
        CommandTemplate, DEFAULT_AUCTION_ARG, DEFAULT_SCRIPT_DIR,
    },
    generate_population, PopulationParams,
};
use clap::Parser;
use color_eyre::{eyre::Context, Result};
use log::info;

/// Generate account registration and bid scripts for the auction demo
#[derive(Parser, Debug)]
pub struct Args {
    #[clap(long, default_value_t = DEFAULT_PARTICIPANTS)]
    buyers: usize,

    #[clap(long, default_value_t = DEFAULT_PARTICIPANTS)]
    sellers: usize,

    /// Seed for reproducible fixtures. Random when omitted.
    #[clap(long)]
    seed: Option<u64>,

    #[clap(long, default_value_t = DEFAULT_TIME_MEAN)]
    time_mean: f64,

    #[clap(long, default_value_t = DEFAULT_TIME_STD_DEV)]
    time_std_dev: f64,

    /// Allow more participants than the auction contract can hold
    #[clap(long, default_value_t = false)]
    uncapped: bool,

    #[clap(long, default_value = "accountReg.sh")]
    account_script: PathBuf,

    #[clap(long, default_value = "bidConfig.sh")]
    bid_script: PathBuf,

    #[clap(long)]
    withdraw_script: Option<PathBuf>,

    #[clap(long)]
    rating_script: Option<PathBuf>,

    /// Directory holding the node client scripts
    #[clap(long, default_value = DEFAULT_SCRIPT_DIR)]
    script_dir: String,

    #[clap(long, default_value = DEFAULT_AUCTION_ARG)]
    auction: String,
}

impl Args {
    fn params(&self) -> PopulationParams {
        PopulationParams {
            buyers: self.buyers,
            sellers: self.sellers,
            time_mean: self.time_mean,
            time_std_dev: self.time_std_dev,
            uncapped: self.uncapped,
        }
    }

    fn template(&self) -> CommandTemplate {
        CommandTemplate {
            script_dir: self.script_dir.clone(),
            auction: self.auction.clone(),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("generating fixtures with seed {seed}");
    let mut rng = FixtureRng::new(seed);

    let population = generate_population(&args.params(), &mut rng)
        .context("failed to generate population")?;
    let template = args.template();

    // Registrations and bids
    let mut accounts = create_script(&args.account_script)?;
    let mut bids = create_script(&args.bid_script)?;
    let summary =
        write_fixtures(&population, &template, &mut accounts, &mut bids)
            .context("failed to write fixtures")?;
    finish_script(accounts, &args.account_script)?;
    finish_script(bids, &args.bid_script)?;
    info!(
        "wrote {} registrations to {} and {} bids to {}",
        summary.registrations,
        args.account_script.display(),
        summary.bids,
        args.bid_script.display()
    );

    if let Some(path) = &args.withdraw_script {
        let mut out = create_script(path)?;
        let written = write_withdrawals(&population, &template, &mut out)
            .context("failed to write withdrawals")?;
        finish_script(out, path)?;
        info!("wrote {written} withdrawals to {}", path.display());
    }

    if let Some(path) = &args.rating_script {
        let ratings = sample_ratings(&population, &mut rng);
        let mut out = create_script(path)?;
        let written = write_ratings(&ratings, &template, &mut out)
            .context("failed to write ratings")?;
        finish_script(out, path)?;
        info!("wrote {written} ratings to {}", path.display());
    }

    Ok(())
}

fn create_script(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn finish_script(mut out: BufWriter<File>, path: &Path) -> Result<()> {
    out.flush()
        .wrap_err_with(|| format!("failed to flush {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::{fs::Permissions, os::unix::fs::PermissionsExt};

        std::fs::set_permissions(path, Permissions::from_mode(0o755))
            .wrap_err_with(|| {
                format!("failed to mark {} executable", path.display())
            })?;
    }

    Ok(())
}

#[test]
fn defaults_match_demo() {
    let args = Args::try_parse_from(["generate-bids"]).unwrap();
    assert_eq!(args.buyers, 100);
    assert_eq!(args.sellers, 100);
    assert_eq!(args.seed, None);
    assert_eq!(args.account_script, PathBuf::from("accountReg.sh"));
    assert_eq!(args.bid_script, PathBuf::from("bidConfig.sh"));
    assert_eq!(args.withdraw_script, None);
    assert_eq!(args.rating_script, None);
    assert_eq!(args.script_dir, "..");
    assert_eq!(args.auction, "$1");
    assert!(!args.params().uncapped);
}

#[test]
fn overrides() {
    let args = Args::try_parse_from([
        "generate-bids",
        "--buyers",
        "12",
        "--sellers",
        "3",
        "--seed",
        "99",
        "--uncapped",
        "--rating-script",
        "ratings.sh",
        "--auction",
        "auction1",
    ])
    .unwrap();

    let params = args.params();
    assert_eq!(params.buyers, 12);
    assert_eq!(params.sellers, 3);
    assert!(params.uncapped);
    assert_eq!(args.seed, Some(99));
    assert_eq!(args.rating_script, Some(PathBuf::from("ratings.sh")));
    assert_eq!(args.template().auction, "auction1");
}
