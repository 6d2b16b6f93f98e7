// src/main.rs

use buildgate::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("buildgate error: {err:?}");
            1
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.verbose)?;
    run(args).await
}
