use clap::arg;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("repotree")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("repotree")
        .about("Serve the file list and file contents of hosted git repositories over HTTP")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-b --"bind" <ADDR>)
                .required(false)
                .help("Address to listen on")
                .env("REPOTREE_BIND")
                .value_parser(clap::value_parser!(std::net::SocketAddr))
                .default_value("127.0.0.1:8000"),
        )
        .arg(
            arg!(--"api-base" <URL>)
                .required(false)
                .help("Base URL of the repository hosting API")
                .env("REPOTREE_API_BASE")
                .default_value(repotree_scanner::client::DEFAULT_API_BASE),
        )
        .arg(
            arg!(--"token" <TOKEN>)
                .required(false)
                .help("Access token sent to the hosting API")
                .env("GITHUB_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            arg!(-w --"workers" <NUM_WORKERS>)
                .required(false)
                .help("Maximum concurrent directory listings per crawl level")
                .env("REPOTREE_WORKERS")
                .value_parser(clap::value_parser!(usize))
                .default_value("16"),
        )
        .arg(
            arg!(--"retries" <ATTEMPTS>)
                .required(false)
                .help("Attempts per upstream request; 1 disables retry")
                .env("REPOTREE_RETRIES")
                .value_parser(clap::value_parser!(u32))
                .default_value("1"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout in seconds (default: none)")
                .env("REPOTREE_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(--"cors-origin" <ORIGIN>)
                .required(false)
                .help("Browser origin allowed to call the API (repeatable)")
                .env("REPOTREE_CORS_ORIGINS")
                .value_delimiter(',')
                .action(clap::ArgAction::Append)
                .default_value("http://localhost:5173"),
        )
}
