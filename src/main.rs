use {
    anyhow::{Context, Result},
    clap::Parser,
    invest_ai::{
        AnalysisError, Cli, Command, ErrorResponse, LexiconScorer, LstmModel, ModelHandle,
        PredictRequest, RiskEngine, RiskScoreRequest, SentimentRequest, SentimentScorer,
        YahooProvider, read_articles, report,
    },
    serde::Serialize,
    std::{panic, path::Path, process::ExitCode, sync::Arc},
};

fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("invest_ai"), my_code_level)
        .parse_default_env()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_engine(cli: &Cli, model_path: &Path) -> Result<RiskEngine> {
    let model: ModelHandle = Arc::new(LstmModel::load(model_path)?);
    let provider = Arc::new(YahooProvider::new()?);
    let scorer: Arc<dyn SentimentScorer> = Arc::new(LexiconScorer::new());
    Ok(RiskEngine::new(provider, model, scorer)?.with_retry_settings(cli.retry_settings()))
}

/// Runs one subcommand. `Ok(Err(_))` is a request failure to report as `{error}`;
/// `Err(_)` is a setup failure (bad model file, unreadable articles).
async fn run(cli: Cli) -> Result<std::result::Result<(), AnalysisError>> {
    match &cli.command {
        Command::Predict {
            ticker,
            days,
            model,
            table,
        } => {
            let engine = build_engine(&cli, model)?;
            let req = PredictRequest {
                ticker: ticker.clone(),
                days: *days,
            };
            match engine.predict(req).await {
                Ok(resp) if *table => println!("{}", report::predictions_table(&resp)),
                Ok(resp) => print_json(&resp)?,
                Err(e) => return Ok(Err(e)),
            }
        }
        Command::Sentiment { texts, file, table } => {
            let mut articles = texts.clone();
            if let Some(path) = file {
                articles.extend(read_articles(path)?);
            }
            let scorer = LexiconScorer::new();
            let summary = invest_ai::analysis::average_sentiment(&scorer, &articles);
            if *table {
                println!("{}", report::sentiment_table(&summary));
            } else {
                print_json(&summary)?;
            }
        }
        Command::Risk {
            ticker,
            model,
            days,
            sentiment,
            articles,
            table,
        } => {
            let engine = build_engine(&cli, model)?;
            let average_sentiment = match (sentiment, articles) {
                (Some(s), _) => *s,
                (None, Some(path)) => {
                    let req = SentimentRequest {
                        articles: read_articles(path)?,
                    };
                    engine.analyze_sentiment(req).average_sentiment
                }
                (None, None) => 0.0,
            };
            let req = RiskScoreRequest {
                ticker: ticker.clone(),
                average_sentiment,
                days: *days,
            };
            match engine.risk_score(req).await {
                Ok(resp) if *table => println!("{}", report::risk_table(&resp)),
                Ok(resp) => print_json(&resp)?,
                Err(e) => return Ok(Err(e)),
            }
        }
    }
    Ok(Ok(()))
}

#[tokio::main]
async fn main() -> ExitCode {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    init_log();

    let cli = Cli::parse();
    match run(cli).await.context("Setup failed") {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            if let Ok(body) = serde_json::to_string(&ErrorResponse::from(&e)) {
                eprintln!("{body}");
            }
            match e.outcome() {
                invest_ai::Outcome::NotFound => ExitCode::from(3),
                invest_ai::Outcome::BadRequest => ExitCode::from(2),
                invest_ai::Outcome::Internal => ExitCode::FAILURE,
            }
        }
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
