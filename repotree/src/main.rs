use colored::Colorize;
use repotree::ServerConfig;
use repotree::commands::command_argument_builder;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Build and validate the configuration before binding anything
    let config = match ServerConfig::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    if !quiet {
        print_banner(&config);
    }

    // Run until ctrl-c
    if let Err(e) = repotree::serve(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn print_banner(config: &ServerConfig) {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "  {} {}",
        "REPOTREE".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!("{} Listening: {}", "→".blue(), config.bind.to_string().bright_white());
    println!("{} Upstream:  {}", "→".blue(), config.api_base.bright_white());
    println!(
        "{} Token:     {}",
        "→".blue(),
        if config.token.is_some() {
            "configured".green()
        } else {
            "none (unauthenticated rate limits apply)".yellow()
        }
    );
    println!("{} Workers:   {}", "→".blue(), config.workers);
    if config.retries > 1 {
        println!("{} Retries:   {}", "→".blue(), config.retries);
    }
    println!();
}
