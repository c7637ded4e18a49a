use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::{Arg, Command};
use log::LevelFilter;
use scam_scanner::{AnalysisInput, Report, RuleSource, Scanner, ScannerConfig, SenderTag};
use std::io::Read;
use std::path::Path;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let matches = Command::new("scam-scanner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-based scam message scanner")
        .long_about("Scores a pasted text message against weighted scam and safe patterns:\n\
                    • Credential, urgency, money-transfer and link indicators\n\
                    • Sender context (friend, family, unknown, groups, social media)\n\
                    • Kenyan mobile-money and Swahili vocabulary boosts\n\
                    • Low / medium / high risk verdict with safety tips")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("scam-scanner.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("MESSAGE")
                .help("Message text to analyze")
                .conflicts_with_all(["file", "screenshot"]),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Read the message from a file ('-' for stdin)")
                .conflicts_with("screenshot"),
        )
        .arg(
            Arg::new("screenshot")
                .long("screenshot")
                .value_name("IMAGE")
                .help("Screenshot of the message (accepted, not inspected)"),
        )
        .arg(
            Arg::new("sender")
                .short('s')
                .long("sender")
                .value_name("TAG")
                .help("Who the message claims to come from")
                .value_parser(PossibleValuesParser::new(
                    SenderTag::ALL.map(|tag| tag.as_str()),
                )),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .value_name("FILE")
                .help("Rule asset (JSON) to load instead of the configured source")
                .conflicts_with("rules-url"),
        )
        .arg(
            Arg::new("rules-url")
                .long("rules-url")
                .value_name("URL")
                .help("Fetch the rule asset from a URL"),
        )
        .arg(
            Arg::new("test-rules")
                .long("test-rules")
                .help("Load and compile the rule set, report skipped patterns, and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the report as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with score breakdowns")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("scam-scanner.yaml");

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let source = if let Some(path) = matches.get_one::<String>("rules") {
        RuleSource::File(path.clone())
    } else if let Some(url) = matches.get_one::<String>("rules-url") {
        RuleSource::Url {
            url: url.clone(),
            timeout: config.fetch_timeout(),
        }
    } else {
        config.rule_source()
    };

    let rules = match source.load().await {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("❌ Could not load rules from {source}: {e}");
            eprintln!("Please check the rule source and try again.");
            process::exit(1);
        }
    };
    let scanner = Scanner::new(rules);

    if matches.get_flag("test-rules") {
        test_rules(&scanner, &source);
        return;
    }

    let sender = matches
        .get_one::<String>("sender")
        .map(String::as_str)
        .unwrap_or("");

    let input = match read_input(&matches, sender) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    };

    if config.analysis.simulated_delay_ms > 0 {
        println!("🔍 Analyzing message...");
        tokio::time::sleep(Duration::from_millis(config.analysis.simulated_delay_ms)).await;
    }

    let result = scanner.analyze(&input.text, input.sender);
    let report = Report::new(
        &input.text,
        input.sender,
        result,
        config.analysis.long_message_chars,
    );

    if matches.get_flag("json") {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", report.render_text());
    }
}

fn read_input(matches: &clap::ArgMatches, sender: &str) -> anyhow::Result<AnalysisInput> {
    if let Some(image) = matches.get_one::<String>("screenshot") {
        return Ok(AnalysisInput::from_screenshot(Path::new(image), sender)?);
    }

    let text = if let Some(text) = matches.get_one::<String>("text") {
        text.clone()
    } else if let Some(file) = matches.get_one::<String>("file") {
        read_message_file(file)?
    } else {
        read_message_file("-")?
    };

    Ok(AnalysisInput::from_text(&text, sender)?)
}

fn read_message_file(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read message from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file: {path}"))
    }
}

fn load_config(path: &str) -> anyhow::Result<ScannerConfig> {
    if Path::new(path).exists() {
        ScannerConfig::from_file(path)
    } else {
        log::debug!("Configuration file '{path}' not found, using default configuration");
        Ok(ScannerConfig::default())
    }
}

fn generate_default_config(path: &str) {
    let config = ScannerConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e:#}");
            process::exit(1);
        }
    }
}

fn test_rules(scanner: &Scanner, source: &RuleSource) {
    let rules = scanner.rules();
    println!("🔍 Testing rules from {source}...");
    println!();
    println!("Version: {}", rules.version().unwrap_or("(unversioned)"));
    println!("Scam patterns: {}", rules.scam_patterns().len());
    println!("Safe patterns: {}", rules.safe_patterns().len());
    println!("Active patterns: {}", scanner.active_rules());

    let skipped = scanner.skipped_rules();
    if skipped.is_empty() {
        println!("✅ All regex patterns compiled successfully.");
    } else {
        println!("⚠️  {} pattern(s) skipped:", skipped.len());
        for err in skipped {
            println!("  • {err}");
        }
    }
}
