use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use goalcast::cache::ModelCache;
use goalcast::data;
use goalcast::file::FromJsonFile;
use goalcast::glm::FitOptions;
use goalcast::predict::{predict, PredictOptions, Prediction};
use goalcast::print;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fixture {
    home_team: String,
    away_team: String,
}

impl FromStr for Fixture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (home_team, away_team) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("fixture '{s}' must be of the form Home:Away"))?;
        let (home_team, away_team) = (home_team.trim(), away_team.trim());
        if home_team.is_empty() || away_team.is_empty() {
            bail!("fixture '{s}' must name both teams");
        }
        Ok(Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
        })
    }
}

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the season's results from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// fixture to predict, as Home:Away (may be repeated)
    #[clap(short = 'x', long = "fixture")]
    fixtures: Vec<Fixture>,

    /// largest goal count tabulated for either side
    #[clap(long)]
    max_goals: Option<u8>,

    /// JSON file to source the fitting options from
    #[clap(long)]
    config: Option<PathBuf>,

    /// print the fitted coefficients
    #[clap(long)]
    coefficients: bool,

    /// print the scoreline probability matrix of each fixture
    #[clap(long)]
    grid: bool,

    /// print the teams in the dataset
    #[clap(long)]
    teams: bool,

    /// write the predictions to stdout as JSON
    #[clap(long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.fixtures.is_empty() && !self.coefficients && !self.teams {
            bail!("at least one fixture must be specified with -x, unless printing --coefficients or --teams");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let fit_options = match &args.config {
        None => FitOptions::default(),
        Some(path) => FitOptions::from_json_file(path)?,
    };
    fit_options.validate()?;
    let predict_options = PredictOptions {
        max_goals: args.max_goals,
    };
    predict_options.validate()?;

    let matches = data::read_matches_file(&args.file)?;
    info!("read {} matches from {}", matches.len(), args.file.display());

    let mut cache = ModelCache::new(fit_options);
    let model = cache.get_or_fit(&matches)?;
    info!(
        "fitted {} teams in {} iterations, deviance: {:.3}, null deviance: {:.3}, residual df: {}",
        model.teams().len(),
        model.iterations(),
        model.deviance(),
        model.null_deviance(),
        model.residual_degrees_of_freedom()
    );

    if args.teams {
        info!("teams:\n{}", Console::default().render(&print::tabulate_teams(model)));
    }
    if args.coefficients {
        info!(
            "coefficients:\n{}",
            Console::default().render(&print::tabulate_coefficients(model))
        );
    }

    let predictions = args
        .fixtures
        .iter()
        .map(|fixture| predict(model, &fixture.home_team, &fixture.away_team, &predict_options))
        .collect::<Result<Vec<_>, _>>()?;

    if args.grid {
        for prediction in &predictions {
            print_scoregrid(prediction);
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
    } else if !predictions.is_empty() {
        println!(
            "{}",
            Console::default().render(&print::tabulate_predictions(&predictions))
        );
    }
    debug!("cache stats: {:?}", cache.stats());
    Ok(())
}

fn print_scoregrid(prediction: &Prediction) {
    info!(
        "{} vs {} scoreline probabilities:\n{}",
        prediction.home_team,
        prediction.away_team,
        Console::default().render(&print::tabulate_scoregrid(&prediction.scoreline_matrix))
    );
}
