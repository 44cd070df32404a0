use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use listset::workload::{self, SetKind, WorkloadConfig};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SetChoice {
    Coarse,
    Fine,
    Lockfree,
    All,
}

impl SetChoice {
    fn kinds(self) -> Vec<SetKind> {
        match self {
            SetChoice::Coarse => vec![SetKind::Coarse],
            SetChoice::Fine => vec![SetKind::Fine],
            SetChoice::Lockfree => vec![SetKind::LockFree],
            SetChoice::All => SetKind::ALL.to_vec(),
        }
    }
}

/// Measure linked-list set throughput as the number of threads grows.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum, env = "LISTBENCH_SET", default_value = "all")]
    set: SetChoice,

    #[arg(long, env = "LISTBENCH_ELEMS", default_value_t = 100, help = "Ids are drawn from 0..ELEMS")]
    elems: usize,

    #[arg(long, env = "LISTBENCH_ITERATIONS", default_value_t = 10_000_000, help = "Operations per run, split across threads")]
    iterations: usize,

    #[arg(long, env = "LISTBENCH_RATIO", default_value_t = 10_000, help = "One insert and one remove per RATIO operations")]
    ratio: u32,

    #[arg(long, env = "LISTBENCH_MAX_THREADS", default_value_t = 32)]
    max_threads: usize,

    #[arg(long, env = "LISTBENCH_SEED", default_value_t = 0)]
    seed: u64,

    #[arg(long, env = "LISTBENCH_INITIAL", help = "Ids seeded before the run [default: ELEMS / 2]")]
    initial: Option<usize>,
}

impl Args {
    fn config(&self) -> WorkloadConfig {
        WorkloadConfig {
            elems: self.elems,
            iterations: self.iterations,
            ratio: self.ratio,
            max_threads: self.max_threads,
            seed: self.seed,
            initial: self.initial.unwrap_or(self.elems / 2),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));
    let args = Args::parse();
    let config = args.config();
    config.validate()?;

    let mut failed = 0;
    for kind in args.set.kinds() {
        for report in workload::sweep(&config, kind)? {
            println!("{:<8} threads={:<3} elapsed={}ms ops/s={:.0}",
                     kind, report.threads, report.elapsed.as_millis(), report.ops_per_sec());
            if !report.is_consistent() {
                log::error!("{} set with {} threads: {} members, {} drained, {} expected",
                            kind, report.threads, report.members, report.drained, report.expected_members());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} run(s) failed verification", failed);
    }
    Ok(())
}
