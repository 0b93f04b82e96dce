use gcr_pruner::{Args, Logger, Runner};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();
    let output = Logger::new(args.verbose);

    let runner = match args.from_env().and_then(Runner::new) {
        Ok(runner) => runner,
        Err(e) => {
            output.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    match runner.run().await {
        // Per-image failures are part of the report, not a failed run.
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
