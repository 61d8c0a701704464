use crate::core::fees::FeeRate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "txlens", about = "Educational Bitcoin transaction explorer")]
pub struct Opt {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "tx", about = "Look up a transaction and verify its fee")]
    Tx {
        #[arg(help = "64-character transaction id")]
        txid: String,
        #[arg(long, help = "Print the transaction graph as well")]
        graph: bool,
        #[arg(long, help = "Print JSON instead of tables")]
        json: bool,
        #[arg(long, help = "Replace addresses with role labels")]
        redact: bool,
        #[arg(long, help = "Also show the fee in USD at the current price")]
        usd: bool,
    },
    #[command(name = "address", about = "Show an address summary and recent transactions")]
    Address {
        #[arg(help = "Bitcoin address")]
        address: String,
        #[arg(long, help = "Number of transactions to list (1-100, default 25)")]
        limit: Option<String>,
    },
    #[command(name = "classify", about = "Detect whether input looks like a txid or an address")]
    Classify {
        #[arg(help = "Text to classify")]
        input: String,
    },
    #[command(name = "simulate", about = "Build a simulated transaction from a wallet")]
    Simulate {
        #[arg(
            long,
            conflicts_with = "utxos",
            required_unless_present = "utxos",
            help = "Built-in playground wallet (see `scenarios`)"
        )]
        scenario: Option<String>,
        #[arg(long, help = "JSON file holding a list of UTXOs")]
        utxos: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true, help = "Amount to send in satoshis")]
        amount: i64,
        #[arg(long = "fee-rate", help = "Fee rate in sat/vB")]
        fee_rate: FeeRate,
        #[arg(long, default_value = "bc1qrecipient", help = "Recipient address")]
        recipient: String,
        #[arg(long, default_value = "bc1qchange", help = "Change address")]
        change: String,
        #[arg(long, help = "Print JSON instead of tables")]
        json: bool,
    },
    #[command(name = "scenarios", about = "List the playground wallets")]
    Scenarios,
    #[command(name = "glossary", about = "Show glossary entries, optionally filtered")]
    Glossary {
        #[arg(help = "Search term")]
        query: Option<String>,
    },
    #[command(name = "annotate", about = "Mark glossary terms inside a piece of text")]
    Annotate {
        #[arg(help = "Text to scan")]
        text: String,
    },
    #[command(name = "tour", about = "Read the guided tour of a transaction")]
    Tour {
        #[arg(help = "Chapter id or number; lists the chapters when omitted")]
        chapter: Option<String>,
        #[arg(long, conflicts_with = "chapter", help = "Print every chapter in order")]
        all: bool,
    },
    #[command(name = "quiz", about = "Test yourself on the tour")]
    Quiz {
        #[arg(long, help = "Answers as letters or numbers, e.g. \"b,b,a\"; asks interactively when omitted")]
        answers: Option<String>,
    },
    #[command(name = "price", about = "Show the current BTC/USD price")]
    Price,
    #[command(name = "serve", about = "Start the JSON API server")]
    Serve {
        #[arg(long, help = "Address to listen on (overrides configuration)")]
        bind: Option<String>,
    },
}
