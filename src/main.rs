//! Synthesizes the lookup network for a configuration, checks it against
//! every record of the domain, and optionally writes the model JSON.
//!
//! Usage:
//!   ferrite-synth [CONFIG.json] [-o|--out MODEL.json]
//!
//! Without a config the reference vocabulary {A,B,C ; 1,2,3} is used at the
//! minimal topology. `RUST_LOG=debug` prints every synthesized layer.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info, warn};

use ferrite_synth::{evaluate, Network, SynthesisConfig};

#[derive(Parser)]
#[command(name = "ferrite-synth", version, about = "Compile a two-entry key/value lookup into exact ReLU weights")]
struct Args {
    /// Synthesis config JSON (default: reference vocabulary, minimal topology)
    config: Option<PathBuf>,
    /// Write the synthesized model JSON here
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let Args { config, out } = Args::parse();

    let config = match &config {
        Some(path) => SynthesisConfig::load_json(&path.to_string_lossy())
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            info!("no config given, using the reference vocabulary");
            SynthesisConfig::default()
        }
    };

    let params = match config.synthesize() {
        Ok(params) => params,
        Err(e) if e.is_configuration_error() => {
            error!("configuration rejected: {e}");
            bail!(e);
        }
        Err(e) => return Err(e).context("synthesis failed"),
    };
    let spec = config.topology.network_spec(&config.vocabulary, "lookup");
    let mut network = Network::from_spec(&spec);
    network
        .load_parameters(params)
        .context("synthesized parameters do not fit the network")?;

    let report = evaluate(&network, &config.vocabulary).context("evaluation failed")?;
    info!(
        "exact on {}/{} fired records, {}/{} don't-care records on a value token",
        report.exact, report.fired, report.dont_care_on_value, report.dont_care
    );
    if !report.is_exact() {
        for failure in &report.failures {
            warn!("mismatch: {failure}");
        }
        bail!("synthesized network is not exact");
    }

    if let Some(path) = out {
        network
            .save_json(&path.to_string_lossy())
            .with_context(|| format!("failed to write model to {}", path.display()))?;
        info!("model written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn config_and_out_are_both_optional() {
        let args = Args::try_parse_from(["ferrite-synth"]).unwrap();
        assert!(args.config.is_none() && args.out.is_none());

        let args = Args::try_parse_from(["ferrite-synth", "lookup.json", "-o", "model.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("lookup.json")));
        assert_eq!(args.out, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn help_is_not_mistaken_for_a_config_path() {
        let err = Args::try_parse_from(["ferrite-synth", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn repeated_out_is_an_error() {
        assert!(Args::try_parse_from(["ferrite-synth", "--out", "a.json", "--out", "b.json"]).is_err());
        assert!(Args::try_parse_from(["ferrite-synth", "a.json", "b.json"]).is_err());
    }
}
