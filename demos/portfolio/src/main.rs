//! `portfolio [config.json] [--script FILE] [--simulate]`
//!
//! Runs the demo tour (or a script file) against the site. Set `RUST_LOG=info`
//! to see the frame summaries.

use anyhow::Context;
use inkfolio_platform::{DEMO_SCRIPT, Pacing, load_config, parse_script, run_with};

struct Args {
    config: Option<String>,
    script: Option<String>,
    simulate: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        script: None,
        simulate: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--simulate" => args.simulate = true,
            "--script" => args.script = Some(it.next().context("--script needs a file")?),
            _ if arg.starts_with("--") => anyhow::bail!("unknown flag {arg}"),
            _ => args.config = Some(arg),
        }
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {path}"))?,
        None => Default::default(),
    };
    let source = match &args.script {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => DEMO_SCRIPT.to_string(),
    };
    let script = parse_script(&source)?;
    let pacing = if args.simulate {
        Pacing::Simulated
    } else {
        Pacing::Realtime
    };

    let report = run_with(config, &script, pacing)?;
    log::info!(
        "finished on {} after {:?} ({} click(s))",
        report.route,
        report.elapsed,
        report.actions.len()
    );
    if let Some(last) = report.summaries.last() {
        println!("{last}");
    }
    Ok(())
}
