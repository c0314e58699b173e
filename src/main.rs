//! Application entry point: a line-oriented lookup front end.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse command-line flags, load [`AppConfig`] (defaults on first run).
//! 3. Build the [`LexiconIndex`] from the CC-CEDICT file.
//! 4. Build the translator gateway (model server or disabled).
//! 5. Answer one query per stdin line with one JSON line on stdout.
//!    A leading `?` switches to English → Chinese lookup.
//! 6. Unload the translator when input ends or the loop fails.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use hanzi_lookup::{
    config::AppConfig,
    lexicon::{LexiconEntry, LexiconIndex},
    lookup::{LookupResult, LookupService},
    translate::{DisabledLoader, HttpModelLoader, ModelLoader, TranslatorGateway},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    dict: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config = Some(args.next().context("--config needs a path")?.into());
            }
            "--dict" => {
                parsed.dict = Some(args.next().context("--dict needs a path")?.into());
            }
            "-h" | "--help" => {
                println!("usage: hanzi-lookup [--config <settings.toml>] [--dict <cc-cedict.txt>]");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LookupLine<'a> {
    message: &'static str,
    #[serde(flatten)]
    result: &'a LookupResult,
}

#[derive(Serialize)]
struct ReverseLine<'a> {
    kind: &'static str,
    query: &'a str,
    entries: Vec<LexiconEntry>,
}

async fn answer(service: &LookupService, line: &str) -> Result<String> {
    let json = match line.strip_prefix('?') {
        Some(english) => {
            let english = english.trim();
            serde_json::to_string(&ReverseLine {
                kind: "reverse",
                query: english,
                entries: service.reverse_lookup(english),
            })?
        }
        None => {
            let result = service.lookup(line).await;
            serde_json::to_string(&LookupLine {
                message: result.message(),
                result: &result,
            })?
        }
    };
    Ok(json)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("hanzi-lookup starting up");

    // 2. Flags + configuration
    let args = parse_args(std::env::args().skip(1))?;
    let loaded = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if let Some(dict) = args.dict {
        config.dictionary.path = dict;
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    // 3. Lexicon
    let index = LexiconIndex::load(&config.dictionary.path).with_context(|| {
        format!(
            "cannot load lexicon from {}",
            config.dictionary.path.display()
        )
    })?;

    // 4. Translator
    let loader: Arc<dyn ModelLoader> = if config.translator.enabled {
        log::info!("fallback translator: {}", config.translator.base_url);
        Arc::new(HttpModelLoader::from_config(&config.translator))
    } else {
        log::info!("fallback translator disabled");
        Arc::new(DisabledLoader)
    };
    let gateway = TranslatorGateway::from_config(loader, &config.translator);

    let service = LookupService::new(Arc::new(index), Arc::new(gateway.clone()))
        .with_reverse_limit(config.dictionary.reverse_max_results);

    // 5. Query loop
    let served = serve(&service).await;

    // 6. Shutdown, whether or not the loop failed
    gateway.unload().await;
    log::info!("hanzi-lookup finished");
    served
}

async fn serve(service: &LookupService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!("{}", answer(service, line).await?);
    }
    Ok(())
}
