// Entry point for the txlens command line
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use serde_json::json;
use std::fs;
use std::io;
use std::path::Path;
use std::process;
use std::time::Duration;
use txlens::cli::output::{
    render_address, render_answer_feedback, render_chapter, render_chapter_list, render_glossary,
    render_graph, render_quiz_result, render_scenarios, render_segments, render_simulation,
    render_transaction,
};
use txlens::cli::quiz::run_quiz;
use txlens::core::monetary::conversions::sats_to_usd_string;
use txlens::{
    auto_link, build_graph, build_sim_tx, chapters, detect_input_type, find_chapter,
    find_scenario, glossary, grade_quiz, normalize_transaction, parse_answers, parse_limit,
    quiz_questions, scenarios, search_glossary, validate_address, validate_string_input,
    validate_txid, verify_fee, ApiServer, ApiState, Command, Config, ExplorerService, PriceFeed,
    SimTxParams, Tour, Utxo, GLOBAL_CONFIG, MAX_INPUT_LENGTH,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    // Info by default, RUST_LOG still wins
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = txlens::Opt::parse();

    let config = match opt.config.as_deref() {
        Some(path) => match Config::load(Some(path)) {
            Ok(config) => config,
            Err(e) => {
                error!("Error: {e}");
                process::exit(1);
            }
        },
        None => GLOBAL_CONFIG.clone(),
    };

    if let Err(e) = run_command(opt.command, &config) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command, config: &Config) -> CliResult {
    match command {
        Command::Tx {
            txid,
            graph,
            json,
            redact,
            usd,
        } => {
            let txid = validate_txid(&txid)?;
            let explorer = ExplorerService::from_config(config)?;
            let tx = explorer.transaction(&txid)?;

            if json {
                let normalized = normalize_transaction(&tx);
                let fee_check = verify_fee(&normalized, tx.fee_sats as i64);
                let mut body = json!({
                    "transaction": tx,
                    "normalized": normalized,
                    "feeCheck": fee_check,
                });
                if graph {
                    body["graph"] = serde_json::to_value(build_graph(&tx))?;
                }
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", render_transaction(&tx, redact));
                if usd {
                    // A price outage only degrades this line
                    let price = price_feed(config)?
                        .current_price()
                        .map_err(|e| warn!("{e}"))
                        .ok();
                    let fee = normalize_transaction(&tx).fee_sats;
                    println!("Fee in USD: {}", sats_to_usd_string(fee, price));
                }
                if graph {
                    println!("\n{}", render_graph(&build_graph(&tx)));
                }
            }
        }
        Command::Address { address, limit } => {
            let address = validate_address(&address)?;
            let limit = parse_limit(limit.as_deref())?;
            let explorer = ExplorerService::from_config(config)?;

            let summary = explorer.address(&address)?;
            let transactions = match explorer.address_transactions(&address, limit) {
                Ok(transactions) => transactions,
                Err(e) if e.is_not_found() => Vec::new(),
                Err(e) => return Err(e.into()),
            };
            println!("{}", render_address(&summary, &transactions));
        }
        Command::Classify { input } => {
            let input = validate_string_input(&input, MAX_INPUT_LENGTH)?;
            println!("{}", detect_input_type(&input));
        }
        Command::Simulate {
            scenario,
            utxos,
            amount,
            fee_rate,
            recipient,
            change,
            json,
        } => {
            let wallet = match (scenario, utxos) {
                (Some(id), _) => {
                    find_scenario(&id)
                        .ok_or_else(|| format!("Unknown scenario: {id}"))?
                        .utxos
                }
                (None, Some(path)) => load_utxos(&path)?,
                (None, None) => return Err("Either --scenario or --utxos is required".into()),
            };

            let sim = build_sim_tx(&SimTxParams {
                utxos: wallet,
                send_amount_sats: amount,
                recipient_address: recipient,
                change_address: change,
                fee_rate,
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&sim)?);
            } else {
                println!("{}", render_simulation(&sim));
            }
        }
        Command::Scenarios => {
            println!("{}", render_scenarios(&scenarios()));
        }
        Command::Glossary { query } => {
            let entries = match query {
                Some(query) => {
                    let query = validate_string_input(&query, MAX_INPUT_LENGTH)?;
                    search_glossary(&query)
                }
                None => glossary().iter().collect(),
            };
            println!("{}", render_glossary(&entries));
        }
        Command::Annotate { text } => {
            println!("{}", render_segments(&auto_link(&text)));
        }
        Command::Tour { chapter, all } => {
            let total = chapters().len();
            if all {
                let mut tour = Tour::new();
                while !tour.is_complete() {
                    println!(
                        "{}\n",
                        render_chapter(tour.current_index(), total, tour.current())
                    );
                    tour.next();
                }
            } else if let Some(key) = chapter {
                let (index, chapter) =
                    find_chapter(&key).ok_or_else(|| format!("Unknown chapter: {key}"))?;
                println!("{}", render_chapter(index, total, chapter));

                let mut tour = Tour::new();
                tour.go_to(index);
                if !tour.is_last() {
                    tour.next();
                    println!("\nNext: txlens tour {}", tour.current().id);
                }
            } else {
                println!("{}", render_chapter_list(chapters()));
            }
        }
        Command::Quiz { answers } => match answers {
            Some(answers) => {
                let answers = parse_answers(&answers)?;
                let result = grade_quiz(&answers)?;
                for (question, answer) in quiz_questions().iter().zip(&answers) {
                    println!(
                        "{}\n",
                        render_answer_feedback(question, question.check(*answer)?)
                    );
                }
                println!("{}", render_quiz_result(&result));
            }
            None => {
                let stdin = io::stdin();
                run_quiz(stdin.lock(), io::stdout())?;
            }
        },
        Command::Price => {
            let prices = price_feed(config)?;
            let price = prices.current_price()?;
            println!("BTC/USD: ${price:.2}");

            match prices.price_history() {
                Ok(history) => {
                    let low = history.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
                    let high = history
                        .iter()
                        .map(|p| p.price)
                        .fold(f64::NEG_INFINITY, f64::max);
                    println!("24h range: ${low:.2} - ${high:.2}");
                }
                Err(e) => warn!("Price history unavailable: {e}"),
            }
        }
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_address.clone());
            let state = ApiState::from_config(config)?;
            if config.use_mock_data {
                info!("Serving fixture data only");
            }
            ApiServer::new(state)
                .run(&addr)
                .map_err(|e| format!("Server error: {e}"))?
        }
    }
    Ok(())
}

fn price_feed(config: &Config) -> txlens::Result<PriceFeed> {
    PriceFeed::new(
        &config.price_api_url,
        Duration::from_secs(config.request_timeout_secs),
    )
}

fn load_utxos(path: &Path) -> Result<Vec<Utxo>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}
