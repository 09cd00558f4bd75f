use {
    crate::{
        auction::entities::AuctionTiming,
        kernel::entities::{
            AccountId,
            Amount,
        },
    },
    anyhow::{
        anyhow,
        Result,
    },
    clap::{
        crate_authors,
        crate_description,
        crate_name,
        crate_version,
        Args,
        Parser,
    },
    serde::Deserialize,
    std::{
        collections::HashMap,
        fs,
        time::Duration,
    },
};

pub mod server;

// `Options` is a structup definition to provide clean command-line args for the auction server.
#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
pub enum Options {
    /// Run the auction server service.
    Run(RunOptions),
    /// Print the base64 commitment for a bid value and salt.
    Commit(CommitOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    /// Server Options
    #[command(flatten)]
    pub server: server::Options,

    #[command(flatten)]
    pub config: ConfigOptions,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Config Options")]
#[group(id = "Config")]
pub struct ConfigOptions {
    /// Path to a configuration file with the auction settings and the initial ledger balances.
    #[arg(long = "config")]
    #[arg(env = "AUCTION_CONFIG")]
    #[arg(default_value = "config.yaml")]
    pub config: String,
}

#[derive(Args, Clone, Debug)]
pub struct CommitOptions {
    /// Bid value to commit to.
    #[arg(long = "value")]
    pub value: Amount,

    /// Base64 encoded secret salt.
    #[arg(long = "salt")]
    pub salt: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Account allowed to delete any auction.
    pub admin: AccountId,

    #[serde(default)]
    pub auction: AuctionConfig,

    /// How often the deadline watcher looks for rounds to close.
    #[serde(with = "humantime_serde", default = "default_deadline_check_interval")]
    pub deadline_check_interval: Duration,

    #[serde(default = "default_event_channel_size")]
    pub event_channel_size: usize,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuctionConfig {
    #[serde(with = "humantime_serde")]
    pub hidden_round_duration: Duration,
    #[serde(with = "humantime_serde")]
    pub open_round_duration:   Duration,
    #[serde(with = "humantime_serde")]
    pub token_validity:        Duration,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            hidden_round_duration: Duration::from_secs(24 * 60 * 60),
            open_round_duration:   Duration::from_secs(24 * 60 * 60),
            token_validity:        Duration::from_secs(12 * 7 * 24 * 60 * 60),
        }
    }
}

impl AuctionConfig {
    pub fn timing(&self) -> Result<AuctionTiming> {
        if self.hidden_round_duration.is_zero() || self.open_round_duration.is_zero() {
            return Err(anyhow!("Round durations must be positive"));
        }
        let convert = |duration: Duration, name: &str| {
            time::Duration::try_from(duration)
                .map_err(|err| anyhow!("Invalid {}: {:?}", name, err))
        };
        Ok(AuctionTiming {
            hidden_round_duration: convert(self.hidden_round_duration, "hidden_round_duration")?,
            open_round_duration:   convert(self.open_round_duration, "open_round_duration")?,
            token_validity:        convert(self.token_validity, "token_validity")?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LedgerConfig {
    /// Funds participants start with.
    #[serde(default)]
    pub initial_balances: HashMap<AccountId, Amount>,
}

fn default_deadline_check_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_event_channel_size() -> usize {
    1000
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        // Open and read the YAML file
        let yaml_content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&yaml_content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.deadline_check_interval.is_zero() {
            return Err(anyhow!("deadline_check_interval must be positive"));
        }
        if self.event_channel_size == 0 {
            return Err(anyhow!("event_channel_size must be positive"));
        }
        self.auction.timing()?;
        Ok(())
    }
}
