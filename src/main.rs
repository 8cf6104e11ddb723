use clap::{CommandFactory, Parser};
use nvision_m3u::{logging, Args, FetchError, Fetcher, Target};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("warning: {:#}", err);
    }

    let args = Args::parse();

    let explicit = args.explicit_url();
    let target = match Target::resolve(explicit, args.output, |key| std::env::var(key).ok()) {
        Ok(target) => target,
        Err(err) => {
            eprintln!("{}", Args::command().render_usage());
            exit_with(err);
        }
    };

    let result = match Fetcher::new() {
        Ok(fetcher) => fetcher.fetch(&target).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(download) => {
            println!("Saved {} bytes to {}", download.bytes, download.path.display());
        }
        Err(err) => exit_with(err),
    }
}

fn exit_with(err: FetchError) -> ! {
    tracing::debug!(error = ?err, "fetch failed");
    eprintln!("{}", err);
    process::exit(err.exit_code());
}
