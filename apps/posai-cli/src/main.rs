use clap::Parser;

use posai_cli::cli::Cli;

#[tokio::main]
async fn main() {
    posai_cli::init_tracing();

    let cli = Cli::parse();
    let code = posai_cli::run(
        cli,
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        std::io::stderr().lock(),
    )
    .await;

    std::process::exit(code);
}
