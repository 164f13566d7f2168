use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nutritionist::app::{parse_ingredient_list, AppContext};
use nutritionist::config::{AppConfig, DEFAULT_TOP_N};
use nutritionist::localization::LocalizationManager;
use nutritionist::report::{render_forecast, render_menu, render_nutrition, render_similar};

/// Food and nutrition assistant
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Comma-separated list of ingredients (e.g. "milk,honey,jam")
    #[arg(required_unless_present = "menu", conflicts_with = "menu")]
    ingredients: Option<String>,

    /// Generate a sample daily menu instead of analyzing ingredients
    #[arg(long)]
    menu: bool,

    /// Number of similar recipes to show
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Directory holding the model, daily values and recipe corpus
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Location of the nutrient lookup cache
    #[arg(long, value_name = "FILE")]
    cache_file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let l10n = LocalizationManager::new()?;

    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(file) = cli.cache_file {
        config.cache_file = Some(file);
    }
    config.top_n = cli.top;

    let mut app = match AppContext::load(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", l10n.t_args("app-init-failed", &[("error", &format!("{e:#}"))]));
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.menu {
        info!("Generating daily menu");
        println!("{}", l10n.t("menu-header"));
        let menu = app.daily_menu(&mut rand::thread_rng());
        println!("{}", render_menu(&l10n, &menu));
        return Ok(ExitCode::SUCCESS);
    }

    let ingredients = parse_ingredient_list(cli.ingredients.as_deref().unwrap_or_default());
    if ingredients.is_empty() {
        eprintln!("{}", l10n.t("no-valid-ingredients"));
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "{}\n",
        l10n.t_args("analyzing", &[("ingredients", &ingredients.join(", "))])
    );

    let analysis = app.analyze(&ingredients, config.top_n);
    for ingredient in &analysis.vectorization.unresolved {
        eprintln!("{}", l10n.t_args("unrecognized-ingredient", &[("ingredient", ingredient)]));
    }

    println!("{}\n\n", render_forecast(&l10n, &analysis.rating));
    println!("{}\n\n", render_nutrition(&l10n, &analysis.nutrition));
    println!("{}", render_similar(&l10n, &analysis.similar, config.top_n));

    Ok(ExitCode::SUCCESS)
}
