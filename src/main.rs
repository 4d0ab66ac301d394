use clap::Parser;
use fsm_check::{check, CheckConfig, Error, ExitStatus, Report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "fsm-check",
    version,
    about = "Validate TAG transitions in generated code against an FSM policy"
)]
struct Cli {
    #[arg(long, help = "Path to FSM policy JSON")]
    policy: Option<PathBuf>,
    #[arg(long, help = "Path to generated assembly carrying TAG:<STATE> markers")]
    asm: Option<PathBuf>,
    #[arg(long, help = "Path to binary sideband trace (little-endian u32 state IDs)")]
    sideband: Option<PathBuf>,
    #[arg(long, help = "Output machine-readable JSON")]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("ERROR: {e}");
            e.exit_status().into()
        }
    }
}

fn run(cli: Cli) -> Result<ExitStatus, Error> {
    let mut builder = CheckConfig::builder();
    if let Some(policy) = cli.policy {
        builder = builder.policy(policy);
    }
    if let Some(asm) = cli.asm {
        builder = builder.asm(asm);
    }
    if let Some(sideband) = cli.sideband {
        builder = builder.sideband(sideband);
    }
    let config = builder.build()?;

    let outcome = check(&config)?;
    let report = Report::new(&outcome.trace, &outcome.verdict);

    let (mut stdout, mut stderr) = (std::io::stdout().lock(), std::io::stderr().lock());
    let written = if cli.json {
        report.write_json(&mut stdout)
    } else {
        report.write_text(&mut stdout, &mut stderr)
    };
    if let Err(e) = written {
        eprintln!("ERROR: failed to write report: {e}");
        return Ok(ExitStatus::Environment);
    }

    Ok(report.exit_status())
}
