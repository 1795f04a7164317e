use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::Parser;
use eframe::egui;
use log::warn;

use fitness_advisor::app::FitnessApp;
use fitness_advisor::client::{HttpRecommendationService, RecommendationService};
use fitness_advisor::config::{ClientConfig, SERVICE_URL_ENV};
use fitness_advisor::models::{FieldEdit, Goal, Profile};
use fitness_advisor::report::render_text;
use fitness_advisor::session::{Outcome, Session};

#[derive(Parser)]
#[command(author, version, about = "Personalized workout and nutrition recommendations")]
struct Args {
    /// Load client settings from a TOML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Recommendation service base URL (overrides config and FITNESS_SERVICE_URL)
    #[arg(long)]
    service_url: Option<String>,
    /// Submit one profile without opening a window and print the recommendations
    #[arg(long, default_value_t = false)]
    check: bool,
    #[arg(long)]
    difficulty: Option<i32>,
    #[arg(long)]
    duration: Option<i32>,
    #[arg(long)]
    intensity: Option<i32>,
    /// 0: weight loss, 1: muscle gain, 2: flexibility & maintenance
    #[arg(long)]
    goal: Option<u8>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ClientConfig::resolve(
        args.config.as_deref(),
        env::var(SERVICE_URL_ENV).ok(),
        args.service_url.clone(),
    )?;
    let service: Arc<dyn RecommendationService> = Arc::new(HttpRecommendationService::new(&config)?);

    if args.check {
        return run_check(&args, service.as_ref());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "Personalized Fitness AI",
        options,
        Box::new(move |cc| Ok(Box::new(FitnessApp::new(cc, &config, service)))),
    )
    .map_err(|e| anyhow!("running the window: {e}"))
}

fn check_profile(args: &Args) -> anyhow::Result<Profile> {
    let mut profile = Profile::default();
    if let Some(value) = args.difficulty {
        profile.apply(FieldEdit::Difficulty(value));
    }
    if let Some(value) = args.duration {
        profile.apply(FieldEdit::Duration(value));
    }
    if let Some(value) = args.intensity {
        profile.apply(FieldEdit::Intensity(value));
    }
    if let Some(code) = args.goal {
        profile.apply(FieldEdit::Goal(Goal::try_from(code)?));
    }
    Ok(profile)
}

fn run_check(args: &Args, service: &dyn RecommendationService) -> anyhow::Result<()> {
    match service.health() {
        Ok(message) => println!("{message}"),
        Err(e) => warn!("health check failed: {e}"),
    }

    let mut session = Session::new(check_profile(args)?);
    let Some(ticket) = session.begin_submit() else {
        bail!("a request is already in flight");
    };
    let result = service.recommend(&ticket.profile);

    match session.complete(ticket.generation, result) {
        Outcome::Shown => {
            if let Some(results) = session.results() {
                print!("{}", render_text(session.profile(), results)?);
            }
            Ok(())
        }
        Outcome::Failed | Outcome::Stale => {
            bail!("{}", session.notice().unwrap_or("recommendation request failed"))
        }
    }
}
