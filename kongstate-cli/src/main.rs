// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  kongstate — resolve a Kong service from KongIngress + annotations
//
//  Input:   YAML/JSON document (service, kong_ingress, sources)
//  Output:  resolved service as JSON on stdout (logs on stderr)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::Parser;
use kongstate_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let failed = run(&cli)?;
    if failed {
        std::process::exit(2);
    }
    Ok(())
}
