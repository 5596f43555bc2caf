use clap::Parser;

#[tokio::main]
async fn main() {
    use kagi::util::cli::*;

    dotenv::dotenv().ok();

    let opts = Options::parse();
    tracing_subscriber::fmt()
        .with_max_level(opts.service.log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_cli_action(opts) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    println!("OK!");
}
