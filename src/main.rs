use temporal_timeline::cli::{parse_args, USAGE};
use temporal_timeline::errors::CliError;
use timeline_service::TimelineConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let code = match execute() {
        Ok(out) => {
            println!("{out}");
            0
        }
        Err(e) => {
            if matches!(e, CliError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            eprintln!("[temporal-timeline] {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn execute() -> Result<String, CliError> {
    let command = parse_args(std::env::args().skip(1))?;
    let config = TimelineConfig::from_env()?;
    temporal_timeline::run(&command, config)
}
