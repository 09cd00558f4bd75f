use {
    anyhow::Result,
    base64::{
        engine::general_purpose::STANDARD,
        Engine,
    },
    clap::Parser,
    server::start_server,
    std::io::IsTerminal,
    tracing_subscriber::filter::LevelFilter,
};

mod api;
mod auction;
mod config;
mod kernel;
mod server;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize a Tracing Subscriber
    let fmt_builder = tracing_subscriber::fmt()
        .with_file(false)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stderr().is_terminal());

    // Use the compact formatter if we're in a terminal, otherwise use the JSON formatter.
    if std::io::stderr().is_terminal() {
        tracing::subscriber::set_global_default(fmt_builder.compact().finish())?;
    } else {
        tracing::subscriber::set_global_default(fmt_builder.json().finish())?;
    }

    // Parse the command line arguments with clap, will exit automatically on `--help` or
    // with invalid arguments.
    match config::Options::parse() {
        config::Options::Run(opts) => start_server(opts).await,
        config::Options::Commit(opts) => {
            let salt = STANDARD.decode(&opts.salt)?;
            let commitment = kernel::commitment::commit(opts.value, &salt);
            println!("{}", STANDARD.encode(commitment.0));
            Ok(())
        }
    }
}
