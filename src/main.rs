use msgvault::cli::Cli;

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Cli::init().execute()
}
