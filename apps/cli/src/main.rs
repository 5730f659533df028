use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    fetch_insights, load_settings, FormController, HttpPredictionService, PredictionOutcome,
    PredictionService,
};
use shared::domain::{FieldEdit, FormationFlag, NumericField, PassLength, PassLocation};
use tracing::info;

mod prompt;

#[derive(Parser, Debug)]
#[command(
    name = "blitzwatch",
    about = "Ask the BlitzWatch prediction service whether the defense will blitz"
)]
struct Cli {
    /// Base URL of the prediction service; overrides config and environment.
    #[arg(long, global = true)]
    backend_url: Option<String>,
    /// Settings file (default: ./blitzwatch.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict from flags; unset fields keep their form defaults.
    Predict(PredictArgs),
    /// Enter the play situation interactively.
    Prompt {
        #[arg(long)]
        json: bool,
    },
    /// Download the three model insight images.
    Insights {
        #[arg(long, default_value = "insights")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long, allow_negative_numbers = true)]
    down: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    ydstogo: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    yardline_100: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    qtr: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    min_left: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    sec_left: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    posteam_score: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    defteam_score: Option<i64>,
    #[arg(long)]
    pass_location: Option<PassLocation>,
    #[arg(long)]
    pass_length: Option<PassLength>,
    #[arg(long)]
    shotgun: bool,
    #[arg(long)]
    no_huddle: bool,
    /// Generic field edit, applied after the named flags.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<FieldEdit>,
    #[arg(long)]
    json: bool,
}

impl PredictArgs {
    fn edits(&self) -> Vec<FieldEdit> {
        let numeric = [
            (NumericField::Down, self.down),
            (NumericField::YardsToGo, self.ydstogo),
            (NumericField::Yardline100, self.yardline_100),
            (NumericField::Quarter, self.qtr),
            (NumericField::MinutesLeft, self.min_left),
            (NumericField::SecondsLeft, self.sec_left),
            (NumericField::PossessionScore, self.posteam_score),
            (NumericField::DefenseScore, self.defteam_score),
        ];
        let mut edits: Vec<FieldEdit> = numeric
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| FieldEdit::Numeric(field, v)))
            .collect();
        if let Some(location) = self.pass_location {
            edits.push(FieldEdit::PassLocation(location));
        }
        if let Some(length) = self.pass_length {
            edits.push(FieldEdit::PassLength(length));
        }
        if self.shotgun {
            edits.push(FieldEdit::Flag(FormationFlag::Shotgun, true));
        }
        if self.no_huddle {
            edits.push(FieldEdit::Flag(FormationFlag::NoHuddle, true));
        }
        edits.extend(self.set.iter().copied());
        edits
    }
}

fn render_outcome(outcome: &PredictionOutcome, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(&outcome.report())?);
    }
    Ok(format!(
        "{}\n→ {}",
        outcome.headline(),
        outcome.verdict.label()
    ))
}

async fn run_submission(
    mut controller: FormController,
    service: &dyn PredictionService,
    json: bool,
) -> Result<()> {
    match controller.submit(service).await {
        Ok(outcome) => {
            println!("{}", render_outcome(&outcome, json)?);
            Ok(())
        }
        Err(notice) => {
            controller.acknowledge_notice();
            Err(anyhow!(notice.detail().to_string()).context(notice.message()))
        }
    }
}

async fn save_insights(service: &dyn PredictionService, out_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create '{}'", out_dir.display()))?;

    let mut failed = Vec::new();
    for (kind, result) in fetch_insights(service).await {
        match result {
            Ok(bytes) => {
                let path = out_dir.join(format!("{}.png", kind.slug()));
                tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("failed to write '{}'", path.display()))?;
                info!(insight = kind.slug(), bytes = bytes.len(), "insight saved");
                println!("{}: {}", kind.title(), path.display());
            }
            Err(err) => {
                eprintln!("{}: unavailable ({err})", kind.title());
                failed.push(kind.title());
            }
        }
    }

    if !failed.is_empty() {
        bail!("could not fetch: {}", failed.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings =
        load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = &cli.backend_url {
        settings = settings.with_backend_url(url)?;
    }
    let service =
        HttpPredictionService::from_settings(&settings).context("failed to build http client")?;
    info!(backend = %service.base_url(), "using prediction service");

    match cli.command {
        Command::Predict(args) => {
            let mut controller = FormController::new();
            for edit in args.edits() {
                controller.edit(edit);
            }
            run_submission(controller, &service, args.json).await
        }
        Command::Prompt { json } => {
            let record = {
                let stdin = std::io::stdin();
                let mut input = stdin.lock();
                let mut out = std::io::stdout();
                prompt::collect_play_situation(&mut input, &mut out)?
            };
            run_submission(FormController::with_record(record), &service, json).await
        }
        Command::Insights { out_dir } => save_insights(&service, &out_dir).await,
    }
}
