mod action;
mod config;
mod dispatch;
mod error;
mod log;
mod sink;
mod source;
mod table;

use anyhow::{Context, Result};

use config::Config;
use dispatch::Dispatcher;
use error::DispatchError;
use sink::ActionSink;
use source::EventSource;
use table::Preset;

const USAGE: &str = "\
Usage: gesture-dispatch [OPTIONS]

Options:
  -p, --preset <NAME>   Action table preset: decomposed (default) or compact
  -r, --reader <PATH>   Event reader executable (default: ./event-reader)
  -s, --sink <PATH>     Input synthesis executable, fed on stdin (default: xdotool)
  -h, --help            Print this help";

struct CliArgs {
    preset: Option<Preset>,
    reader: Option<String>,
    sink: Option<String>,
    help: bool,
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs {
        preset: None,
        reader: None,
        sink: None,
        help: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--preset" | "-p" | "--reader" | "-r" | "--sink" | "-s") => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Warning: {} requires an argument", flag);
                    i += 1;
                    continue;
                };
                match flag {
                    "--preset" | "-p" => match value.parse::<Preset>() {
                        Ok(preset) => cli.preset = Some(preset),
                        Err(e) => eprintln!("Warning: {}", e),
                    },
                    "--reader" | "-r" => cli.reader = Some(value.clone()),
                    _ => cli.sink = Some(value.clone()),
                }
                i += 2;
                continue;
            }
            "--help" | "-h" => cli.help = true,
            other => eprintln!("Warning: ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    cli
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args);
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    if let Ok(log_path) = log::init() {
        log::log(&format!("Log file: {}", log_path.display()));
    }

    let config = Config::load().with_overrides(cli.preset, cli.reader, cli.sink);
    let preset = config.preset();
    let table = preset.table();
    log::log(&format!(
        "Preset '{}' with {} events: {}",
        preset.name(),
        table.len(),
        table.events().join(", ")
    ));

    let reader = config.reader();
    let source = EventSource::spawn(&reader)
        .with_context(|| format!("starting event reader '{}'", reader.display()))?;
    let sink_spec = config.sink();
    let sink = ActionSink::spawn(&sink_spec)
        .with_context(|| format!("starting action sink '{}'", sink_spec.display()))?;

    let mut dispatcher = Dispatcher::new(source, sink, table, std::io::stdout());
    match dispatcher.run().await {
        DispatchError::EndOfStream => {
            eprintln!("Event source closed, exiting");
            std::process::exit(1);
        }
        e => Err(e).context("reading events"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("gesture-dispatch")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(&args(&["-p", "compact", "--reader", "/opt/reader", "-s", "ydotool"]));
        assert_eq!(cli.preset, Some(Preset::Compact));
        assert_eq!(cli.reader.as_deref(), Some("/opt/reader"));
        assert_eq!(cli.sink.as_deref(), Some("ydotool"));
        assert!(!cli.help);
    }

    #[test]
    fn test_parse_args_tolerates_bad_input() {
        let cli = parse_args(&args(&["--bogus", "--preset", "fancy", "--reader"]));
        assert!(cli.preset.is_none());
        assert!(cli.reader.is_none());
        assert!(parse_args(&args(&["-h"])).help);
    }
}
