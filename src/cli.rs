use clap::{Args, Parser, Subcommand, ValueEnum};
use housing_comps::query::PriceRange;
use housing_comps::{CategoryFilter, Dataset};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "housing-comps")]
#[command(about = "Nearest comparable listings and valuations", version)]
pub struct Cli {
    /// JSON listing snapshot; falls back to HOUSING_COMPS_DATA
    #[arg(long)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the k closest matching listings to a point
    Nearest(NearestArgs),
    /// Estimate a property's value from nearby comparables
    Value(ValueArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DatasetArg {
    Rental,
    Sold,
}

impl From<DatasetArg> for Dataset {
    fn from(value: DatasetArg) -> Self {
        match value {
            DatasetArg::Rental => Dataset::Rental,
            DatasetArg::Sold => Dataset::Sold,
        }
    }
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub property_type: i32,
    #[arg(long)]
    pub bedrooms: u32,
    #[arg(long)]
    pub bathrooms: u32,
    #[arg(long, default_value_t = 0)]
    pub parking: u32,
}

impl FilterArgs {
    pub fn to_filter(&self) -> CategoryFilter {
        CategoryFilter::new(self.property_type, self.bedrooms, self.bathrooms, self.parking)
    }
}

#[derive(Debug, Args)]
pub struct NearestArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
    #[arg(long, default_value_t = 10)]
    pub k: usize,
    #[arg(long, value_enum, default_value_t = DatasetArg::Rental)]
    pub dataset: DatasetArg,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Price band around the median in percent; -1 disables it
    #[arg(long, default_value_t = PriceRange::NO_FILTER, allow_hyphen_values = true)]
    pub range: i32,
    /// Also write the ranked listings to this JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub area: String,
    #[command(flatten)]
    pub filter: FilterArgs,
}
