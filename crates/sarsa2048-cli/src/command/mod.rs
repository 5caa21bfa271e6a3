use clap::{ArgAction, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*};

use self::{benchmark::BenchmarkArg, inspect::InspectArg, train::TrainArg};

mod benchmark;
mod inspect;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Learn weights with episodic semi-gradient Sarsa
    Train(#[clap(flatten)] TrainArg),
    /// Play greedy games with trained weights
    Benchmark(#[clap(flatten)] BenchmarkArg),
    /// Show the state id and feature vectors of a board
    Inspect(#[clap(flatten)] InspectArg),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(level)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Benchmark(arg) => benchmark::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sarsa2048_evaluator::policy::Policy;
    use sarsa2048_training::sarsa::WeightInit;

    use super::*;

    fn parse(args: &[&str]) -> CommandArgs {
        CommandArgs::try_parse_from(iter_args(args)).unwrap()
    }

    fn iter_args<'a>(args: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
        std::iter::once("sarsa2048").chain(args.iter().copied())
    }

    #[test]
    fn test_train_defaults() {
        let args = parse(&["train"]);
        assert_eq!(args.verbose, 0);
        let Mode::Train(arg) = args.mode else {
            panic!("expected train");
        };
        assert_eq!(
            arg.params(),
            sarsa2048_training::sarsa::SarsaParams::default()
        );
    }

    #[test]
    fn test_train_options() {
        let args = parse(&[
            "-vv",
            "train",
            "--features",
            "moments",
            "--policy",
            "epsilon-greedy",
            "--epsilon",
            "0.25",
            "--no-alpha-decay",
            "--max-episodes",
            "50",
            "--init-sigma",
            "0.01",
        ]);
        assert_eq!(args.verbose, 2);
        let Mode::Train(arg) = args.mode else {
            panic!("expected train");
        };
        let params = arg.params();
        assert_eq!(params.policy, Policy::EpsilonGreedy { epsilon: 0.25 });
        assert!(!params.alpha_decay);
        assert_eq!(params.max_episodes, Some(50));
        assert_eq!(params.weight_init, WeightInit::Gaussian { sigma: 0.01 });
    }

    #[test]
    fn test_benchmark_needs_weights() {
        assert!(CommandArgs::try_parse_from(iter_args(&["benchmark"])).is_err());
        assert!(
            CommandArgs::try_parse_from(iter_args(&[
                "benchmark",
                "--model",
                "a.json",
                "--weights",
                "w.txt"
            ]))
            .is_err()
        );
        let args = parse(&["benchmark", "--weights", "w.txt", "--games", "5"]);
        assert!(matches!(args.mode, Mode::Benchmark(_)));
    }

    #[test]
    fn test_inspect_board_list() {
        let args = parse(&["inspect", "--board", "2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,4"]);
        assert!(matches!(args.mode, Mode::Inspect(_)));
        assert!(CommandArgs::try_parse_from(iter_args(&["inspect"])).is_err());
    }
}
