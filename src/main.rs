//! divvy CLI
//!
//! Split shared expenses and settle debts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compute who owes whom for a batch of transactions
//! divvy split --input transactions.json
//!
//! # Net opposing debts pair by pair
//! divvy net --input debts.json --format json
//!
//! # Plan the fewest transfers that square up the group
//! divvy settle --input debts.json
//!
//! # Generate a random group history for testing
//! divvy generate --users 5 --transactions 20
//! ```

use divvy_engine::config::EngineConfig;
use divvy_engine::core::debt::{DebtRelation, DebtSet};
use divvy_engine::core::transaction::Transaction;
use divvy_engine::core::user::UserId;
use divvy_engine::optimization::netting::{NetDebt, NettingEngine};
use divvy_engine::optimization::settlement::SettlementPlanner;
use divvy_engine::simulation::group_generator::{generate_random_group, GroupConfig};
use divvy_engine::split::SplitCalculator;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"divvy — expense splitting and debt settlement

USAGE:
    divvy <COMMAND> [OPTIONS]

COMMANDS:
    split       Compute debt relations for a list of transactions
    net         Net opposing debts between each pair of users
    settle      Plan the fewest transfers that settle a group
    generate    Generate a random group history (for testing)
    help        Show this message

OPTIONS (split, net, settle):
    --input <FILE>      Path to JSON input file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --users <N>         Number of users (default: 6)
    --transactions <N>  Number of transactions (default: 30)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    DIVVY_DECIMAL_PLACES   Round computed debts to N decimal places
    RUST_LOG               Log level (default: warn)

EXAMPLES:
    divvy split --input transactions.json --format json
    divvy net --input debts.json
    divvy generate --users 4 --transactions 10 --output group.json"#
    );
}

/// JSON schema for input debts.
#[derive(serde::Deserialize)]
struct DebtInput {
    from: String,
    to: String,
    amount: String,
}

#[derive(serde::Deserialize)]
struct DebtsFile {
    debts: Vec<DebtInput>,
}

#[derive(serde::Deserialize, Serialize)]
struct TransactionsFile {
    transactions: Vec<Transaction>,
}

#[derive(Serialize)]
struct DebtOutput {
    from: String,
    to: String,
    amount: String,
}

impl From<&DebtRelation> for DebtOutput {
    fn from(r: &DebtRelation) -> Self {
        Self {
            from: r.from().to_string(),
            to: r.to().to_string(),
            amount: r.amount().to_string(),
        }
    }
}

impl From<&NetDebt> for DebtOutput {
    fn from(d: &NetDebt) -> Self {
        Self {
            from: d.from.to_string(),
            to: d.to.to_string(),
            amount: d.amount.to_string(),
        }
    }
}

#[derive(Serialize)]
struct NettingOutput {
    gross_total: String,
    net_total: String,
    savings_percent: f64,
    debts: Vec<DebtOutput>,
}

#[derive(Serialize)]
struct SettlementOutput {
    gross_total: String,
    total_transferred: String,
    transfers: Vec<DebtOutput>,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)))
}

fn load_debts(path: &str) -> DebtSet {
    let file: DebtsFile = serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "debts": [
    {{ "from": "alice", "to": "bob", "amount": "12.50" }}
  ]
}}"#
        );
        fail(format!("parsing JSON: {}", e))
    });

    let mut set = DebtSet::new();
    for d in file.debts {
        let amount: Decimal = d
            .amount
            .parse()
            .unwrap_or_else(|e| fail(format!("invalid amount '{}': {}", d.amount, e)));
        let relation = DebtRelation::try_new(UserId::new(d.from), UserId::new(d.to), amount)
            .unwrap_or_else(|e| fail(e));
        set.add(relation);
    }
    set
}

fn load_transactions(path: &str) -> Vec<Transaction> {
    let file: TransactionsFile = serde_json::from_str(&read_file(path))
        .unwrap_or_else(|e| fail(format!("parsing JSON: {}", e)));
    file.transactions
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("serializing output: {}", e)),
    }
}

/// Parses `--input` and `--format`, shared by split, net and settle.
fn parse_io_args(args: &[String]) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--input requires a file path")),
                );
            }
            "--format" => {
                i += 1;
                format = args
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| fail("--format requires 'text' or 'json'"));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    (path, format)
}

fn cmd_split(args: &[String], config: &EngineConfig) {
    let (path, format) = parse_io_args(args);
    let transactions = load_transactions(&path);
    let calculator = SplitCalculator::new(config.split.clone());

    let mut debts = Vec::new();
    let mut skipped = 0usize;
    for tx in &transactions {
        match calculator.compute(tx) {
            Ok(relations) if relations.is_empty() => {
                log::info!("transaction {} produced no debts", tx.id());
            }
            Ok(relations) => debts.extend(relations),
            Err(e) => {
                eprintln!("Skipping transaction {}: {}", tx.id(), e);
                skipped += 1;
            }
        }
    }

    if format == "json" {
        let output: Vec<DebtOutput> = debts.iter().map(DebtOutput::from).collect();
        print_json(&output);
    } else {
        println!("=== Split Result ===");
        println!("Transactions:   {}", transactions.len());
        println!("Skipped:        {}", skipped);
        println!("Debts:          {}", debts.len());
        println!();
        for d in &debts {
            println!("  {} owes {} {}", d.from(), d.to(), d.amount());
        }
    }
}

fn cmd_net(args: &[String]) {
    let (path, format) = parse_io_args(args);
    let set = load_debts(&path);
    let result = NettingEngine::net(set.relations());

    if format == "json" {
        let output = NettingOutput {
            gross_total: result.gross_total().to_string(),
            net_total: result.net_total().to_string(),
            savings_percent: result.savings_percent(),
            debts: result.net_debts().iter().map(DebtOutput::from).collect(),
        };
        print_json(&output);
    } else {
        println!("{}", result);
    }
}

fn cmd_settle(args: &[String]) {
    let (path, format) = parse_io_args(args);
    let set = load_debts(&path);
    let plan = SettlementPlanner::plan(set.relations());

    if format == "json" {
        let output = SettlementOutput {
            gross_total: plan.gross_total().to_string(),
            total_transferred: plan.total_transferred().to_string(),
            transfers: plan.transfers().iter().map(DebtOutput::from).collect(),
        };
        print_json(&output);
    } else {
        println!("{}", plan);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--users" => {
                i += 1;
                config.user_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--users requires a number"));
            }
            "--transactions" => {
                i += 1;
                config.transaction_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--transactions requires a number"));
            }
            "--output" => {
                i += 1;
                output_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let output = TransactionsFile {
        transactions: generate_random_group(&config),
    };

    let json = serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| fail(format!("serializing output: {}", e)));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} transactions across {} users → {}",
            output.transactions.len(),
            config.user_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let config = EngineConfig::from_env().unwrap_or_else(|e| fail(e));
    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "split" => cmd_split(rest, &config),
        "net" => cmd_net(rest),
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
