use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "domovoy")]
#[command(bin_name = "domovoy")]
#[command(about = "Talk to your smart home from the terminal", long_about = None)]
pub struct DomovoyCli {
    /// Hub inventory (locations and devices) as JSON
    #[arg(long)]
    pub inventory: PathBuf,

    /// Command table as JSON; the built-in table is used when omitted
    #[arg(long)]
    pub commands: Option<PathBuf>,

    /// Fallback room for a sender, as SENDER=TITLE
    #[arg(long = "default-location", value_name = "SENDER=TITLE")]
    pub default_locations: Vec<DefaultLocation>,

    /// Name the console speaks as
    #[arg(long, default_value = "console")]
    pub sender: String,

    /// Seconds a resolution stays usable for follow-up phrases
    #[arg(long, default_value_t = 60)]
    pub context_ttl: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLocation {
    pub sender: String,
    pub title: String,
}

impl FromStr for DefaultLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((sender, title)) if !sender.is_empty() && !title.is_empty() => {
                Ok(DefaultLocation {
                    sender: sender.to_string(),
                    title: title.to_string(),
                })
            }
            _ => Err(format!("expected SENDER=TITLE, got '{s}'")),
        }
    }
}
