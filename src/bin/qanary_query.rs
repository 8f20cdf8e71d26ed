//! qanary-query: 向 QAnswer / RuBQ 发送单个问题并输出解析结果
//!
//! Usage:
//!   qanary-query ask <qanswer|rubq> [--config <path>] [--lang <xx>] [--kb <id>] <question...>
//!   qanary-query check-config [--config <path>]
//!   qanary-query version

use qanary_lib_rust::qanswer::QAnswerQueryBuilder;
use qanary_lib_rust::rubq::RuBQQueryBuilder;
use qanary_lib_rust::{ComponentConfig, QueryBuilder, QueryParams};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "ask" => cmd_ask(&args[2..]).await,
        "check-config" => cmd_check_config(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("qanary-query {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"qanary-query: query external QA services through the response cache

USAGE:
    qanary-query <COMMAND> [OPTIONS]

COMMANDS:
    ask <qanswer|rubq> [--config <path>] [--lang <xx>] [--kb <id>] [--user <id>] <question...>
                                Send one question and print the parsed result as JSON
    check-config [--config <path>]
                                Load and validate the configuration
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    QANARY_CONFIG               Configuration file (YAML)
    QANARY_*                    Overrides, e.g. QANARY_QANSWER_ENDPOINT, QANARY_CACHE_TTL_SECS
    RUST_LOG                    Log filter, e.g. qanary_lib_rust=debug"#
    );
}

/// Splits `--flag value` options from positional words.
struct Args {
    config: Option<PathBuf>,
    lang: Option<String>,
    kb: Option<String>,
    user: Option<String>,
    words: Vec<String>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args {
        config: None,
        lang: None,
        kb: None,
        user: None,
        words: Vec::new(),
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--lang" => parsed.lang = Some(value("--lang")?),
            "--kb" => parsed.kb = Some(value("--kb")?),
            "--user" => parsed.user = Some(value("--user")?),
            _ => parsed.words.push(arg.clone()),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ComponentConfig> {
    let path = path
        .cloned()
        .or_else(|| std::env::var("QANARY_CONFIG").ok().map(PathBuf::from));
    let mut config = match path {
        Some(p) => ComponentConfig::from_file(&p)
            .map_err(|e| anyhow::anyhow!("cannot load {}: {e}", p.display()))?,
        None => ComponentConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn cmd_check_config(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let config = load_config(args.config.as_ref())?;
    println!("{}", serde_yaml::to_string(&config)?);
    println!("Configuration OK");
    Ok(())
}

async fn cmd_ask(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let (service, question) = match args.words.split_first() {
        Some((service, rest)) if !rest.is_empty() => (service.as_str(), rest.join(" ")),
        _ => anyhow::bail!("usage: qanary-query ask <qanswer|rubq> <question...>"),
    };
    let config = load_config(args.config.as_ref())?;
    let client = Arc::new(config.cached_client()?);

    let builder: Box<dyn QueryBuilder> = match service {
        "qanswer" => Box::new(QAnswerQueryBuilder::new(config.qanswer_settings()?, client)?),
        "rubq" => Box::new(RuBQQueryBuilder::new(config.rubq_settings()?, client)?),
        other => anyhow::bail!("unknown service '{other}' (expected qanswer or rubq)"),
    };

    let mut params = QueryParams::new();
    params.knowledge_base = args.kb;
    params.user = args.user;
    let result = builder.query(&question, args.lang.as_deref(), &params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
