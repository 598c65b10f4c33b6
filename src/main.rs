//! Point-spread prediction CLI
//!
//! Imports historical game logs, trains a ridge spread model, and
//! predicts spreads for upcoming schedules.

use clap::{Parser, Subcommand};
use hoops::{Config, Result};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "College basketball point-spread prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Train the spread model from the stored game log
    Train {
        /// Override ridge regularization strength
        #[arg(long)]
        alpha: Option<f64>,
        /// Override rolling window sizes (comma-separated, e.g. "5,10")
        #[arg(long)]
        windows: Option<String>,
    },
    /// Predict spreads for a schedule file or a single matchup
    Predict {
        /// Schedule CSV with Date, Away, Home columns
        #[arg(long)]
        schedule: Option<String>,
        /// Output CSV path for schedule predictions
        #[arg(long, default_value = "predictions.csv")]
        out: String,
        /// Home team name (single-matchup mode)
        #[arg(long)]
        home: Option<String>,
        /// Away team name (single-matchup mode)
        #[arg(long)]
        away: Option<String>,
        /// Matchup date (YYYY-MM-DD); defaults to the day after the last
        /// stored game
        #[arg(long)]
        date: Option<String>,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Import raw season CSV files into the database
    Import {
        /// Season CSV files (date, away, away points, home, home points)
        files: Vec<String>,
    },
    /// Show database status
    Status,
    /// Add a team-name mapping (raw source name -> canonical name)
    Map { from: String, to: String },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Import { files } => commands::data_import(&config, &files),
            DataCommands::Status => commands::data_status(&config),
            DataCommands::Map { from, to } => commands::data_map(&config, &from, &to),
        },
        Commands::Train { alpha, windows } => commands::train(&config, alpha, windows),
        Commands::Predict {
            schedule,
            out,
            home,
            away,
            date,
        } => commands::predict(&config, schedule, &out, home, away, date),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use chrono::NaiveDate;
    use hoops::data::{read_schedule_csv, read_season_csv, Database, TeamNameMap};
    use hoops::model::{load_feature_cols, save_feature_cols, ModelArtifact};
    use hoops::predict::{format_prediction, SpreadPredictor};
    use hoops::training::SpreadTrainer;
    use hoops::{GameRecord, HoopsError, MatchupRequest};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        std::fs::create_dir_all("models")?;
        println!("Created data/ and models/ directories");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'hoops data import <season.csv>...' to load game logs");
        println!("  3. Run 'hoops train' to fit the spread model");
        println!("  4. Run 'hoops predict --schedule games.csv' to predict spreads");

        Ok(())
    }

    pub fn data_import(config: &Config, files: &[String]) -> Result<()> {
        if files.is_empty() {
            println!("Usage: hoops data import <season.csv>...");
            return Ok(());
        }

        let db = Database::open(&config.data.database_path)?;
        let team_map = TeamNameMap::load(&config.data.team_map_path)?;

        let mut total = 0;
        let mut total_dropped = 0;
        for file in files {
            println!("Importing {}...", file);
            let import = read_season_csv(file)?;
            if import.dropped > 0 {
                log::warn!("{}: dropped {} unparsable rows", file, import.dropped);
            }

            let mut records = Vec::with_capacity(import.games.len());
            for raw in &import.games {
                let home = db.get_or_create_team(&team_map.normalize(&raw.home_team))?;
                let away = db.get_or_create_team(&team_map.normalize(&raw.away_team))?;
                records.push(GameRecord {
                    date: raw.date,
                    home_team: home.id,
                    away_team: away.id,
                    home_score: raw.home_score,
                    away_score: raw.away_score,
                });
            }

            let count = db.upsert_games(&records)?;
            println!("  {} games", count);
            total += count;
            total_dropped += import.dropped;
        }

        let stats = db.get_stats()?;
        println!(
            "\nImported {} games ({} rows dropped). Database now holds {} games across {} teams.",
            total, total_dropped, stats.game_count, stats.team_count
        );

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:   {}", config.data.database_path);
        println!("  Teams:  {}", stats.team_count);
        println!("  Games:  {}", stats.game_count);
        if let (Some(earliest), Some(latest)) = (stats.earliest_game, stats.latest_game) {
            println!("  Range:  {} to {}", earliest, latest);
        }

        Ok(())
    }

    pub fn data_map(config: &Config, from: &str, to: &str) -> Result<()> {
        TeamNameMap::append(&config.data.team_map_path, from, to)?;
        println!(
            "Added mapping '{}' -> '{}' in {}",
            from, to, config.data.team_map_path
        );
        Ok(())
    }

    pub fn train(config: &Config, alpha: Option<f64>, windows: Option<String>) -> Result<()> {
        let mut training_config = config.clone();
        if let Some(a) = alpha {
            training_config.training.ridge_alpha = a;
        }
        if let Some(list) = windows {
            training_config.features.windows = parse_windows(&list)?;
        }

        let db = Database::open(&config.data.database_path)?;
        let games = db.get_all_games()?;
        println!("Loaded {} games from database", games.len());

        let trainer = SpreadTrainer::new(&training_config);
        let trained = trainer.train(&games)?;

        if let Some(report) = &trained.validation {
            println!("Validation: {}", report);
            if !report.beats_baseline() {
                log::warn!("Model does not beat the mean-margin baseline");
            }
        }

        trained.artifact.save(&config.data.model_path)?;
        save_feature_cols(&config.data.feature_cols_path, &trained.artifact.feature_cols)?;

        println!("\nTraining complete!");
        println!("  Rows fitted:    {}", trained.rows);
        println!("  Features:       {}", trained.artifact.feature_cols.len());
        println!("  Saved model  -> {}", config.data.model_path);
        println!("  Saved columns-> {}", config.data.feature_cols_path);

        Ok(())
    }

    pub fn predict(
        config: &Config,
        schedule: Option<String>,
        out: &str,
        home: Option<String>,
        away: Option<String>,
        date: Option<String>,
    ) -> Result<()> {
        let artifact = ModelArtifact::load(&config.data.model_path)?;
        let trained_cols = load_feature_cols(&config.data.feature_cols_path)?;

        let db = Database::open(&config.data.database_path)?;
        let games = db.get_all_games()?;
        let team_map = TeamNameMap::load(&config.data.team_map_path)?;

        let predictor = SpreadPredictor::new(&artifact, trained_cols, config.features.clone());

        if let Some(schedule_path) = schedule {
            return predict_schedule(&db, &games, &team_map, &predictor, &schedule_path, out);
        }

        if let (Some(home_name), Some(away_name)) = (home, away) {
            let home_team = db
                .find_team_by_name(&team_map.normalize(&home_name))?
                .ok_or_else(|| HoopsError::UnknownTeam(home_name.clone()))?;
            let away_team = db
                .find_team_by_name(&team_map.normalize(&away_name))?
                .ok_or_else(|| HoopsError::UnknownTeam(away_name.clone()))?;

            let date = match date {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| HoopsError::Parse(format!("bad date '{}': {}", s, e)))?,
                None => games
                    .last()
                    .map(|g| g.date + chrono::Days::new(1))
                    .ok_or_else(|| {
                        HoopsError::Config(
                            "No games in database. Run `hoops data import` first.".to_string(),
                        )
                    })?,
            };

            let matchups = vec![MatchupRequest {
                date,
                home_team: home_team.id,
                away_team: away_team.id,
            }];
            let predictions = predictor.predict_matchups(&games, &matchups)?;
            print!(
                "{}",
                format_prediction(&predictions[0], &home_team.name, &away_team.name)
            );
            return Ok(());
        }

        println!("Usage: hoops predict --schedule <games.csv>");
        println!("   or: hoops predict --home <TEAM> --away <TEAM> [--date YYYY-MM-DD]");
        Ok(())
    }

    fn predict_schedule(
        db: &Database,
        games: &[GameRecord],
        team_map: &TeamNameMap,
        predictor: &SpreadPredictor,
        schedule_path: &str,
        out: &str,
    ) -> Result<()> {
        let import = read_schedule_csv(schedule_path)?;
        if import.dropped > 0 {
            log::warn!(
                "{}: dropped {} unparsable rows",
                schedule_path,
                import.dropped
            );
        }
        println!("Loaded {} matchups from {}", import.matchups.len(), schedule_path);

        // Teams new to the database get created here with empty history;
        // their predictions are damped below
        let mut matchups = Vec::with_capacity(import.matchups.len());
        for raw in &import.matchups {
            let home = db.get_or_create_team(&team_map.normalize(&raw.home_team))?;
            let away = db.get_or_create_team(&team_map.normalize(&raw.away_team))?;
            matchups.push(MatchupRequest {
                date: raw.date,
                home_team: home.id,
                away_team: away.id,
            });
        }

        let predictions = predictor.predict_matchups(games, &matchups)?;

        let mut writer = csv::Writer::from_path(out)?;
        writer.write_record(["Date", "Away", "Home", "pt_spread"])?;
        for pred in &predictions {
            let home = db.get_team(pred.home_team)?;
            let away = db.get_team(pred.away_team)?;
            writer.write_record([
                pred.date.format("%Y-%m-%d").to_string(),
                away.name,
                home.name,
                format!("{}", pred.spread),
            ])?;
        }
        writer.flush()?;
        println!("Wrote {} predictions to {}", predictions.len(), out);

        let damped: Vec<_> = predictions.iter().filter(|p| p.out_of_domain).collect();
        if !damped.is_empty() {
            println!(
                "\nDamped {} games with no history for at least one team:",
                damped.len()
            );
            for pred in damped {
                let home = db.get_team(pred.home_team)?;
                let away = db.get_team(pred.away_team)?;
                println!("  {} at {}: {:+.1}", away.name, home.name, pred.spread);
            }
        }

        Ok(())
    }

    fn parse_windows(list: &str) -> Result<Vec<usize>> {
        let windows = list
            .split(',')
            .map(|w| {
                w.trim()
                    .parse::<usize>()
                    .map_err(|_| HoopsError::Parse(format!("bad window size '{}'", w)))
            })
            .collect::<Result<Vec<usize>>>()?;

        if windows.is_empty() || windows.contains(&0) {
            return Err(HoopsError::Parse(
                "windows must be a comma-separated list of positive integers".to_string(),
            ));
        }
        Ok(windows)
    }
}
