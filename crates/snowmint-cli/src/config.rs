use anyhow::{bail, ensure};
use clap::Parser;
use snowmint::{DEFAULT_SEQUENCE_BITS, DEFAULT_WORKER_BITS, Layout};

/// Runtime configuration for the `snowmint` self-test binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowmint",
    version,
    about = "Issue IDs from one generator and check they are unique and strictly increasing"
)]
pub struct CliArgs {
    /// Worker ID encoded into every generated ID.
    ///
    /// Must fit in `worker_bits`. Assigning distinct worker IDs to
    /// processes is the operator's responsibility.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 1)]
    pub worker_id: u64,

    /// Width of the per-millisecond sequence counter.
    ///
    /// Environment variable: `SEQUENCE_BITS`
    #[arg(long, env = "SEQUENCE_BITS", default_value_t = DEFAULT_SEQUENCE_BITS)]
    pub sequence_bits: u8,

    /// Width of the worker ID field.
    ///
    /// `sequence_bits + worker_bits` must not exceed 28.
    ///
    /// Environment variable: `WORKER_BITS`
    #[arg(long, env = "WORKER_BITS", default_value_t = DEFAULT_WORKER_BITS)]
    pub worker_bits: u8,

    /// Number of IDs each thread requests.
    ///
    /// Environment variable: `ID_COUNT`
    #[arg(short = 'n', long, env = "ID_COUNT", default_value_t = 10)]
    pub count: usize,

    /// Number of threads sharing the generator.
    ///
    /// Environment variable: `THREADS`
    #[arg(short, long, env = "THREADS", default_value_t = 1)]
    pub threads: usize,

    /// Print every generated ID with its decoded components to stdout.
    #[arg(short, long, default_value_t = false)]
    pub print: bool,
}

#[derive(Debug, Clone)]
pub struct SelfTestConfig {
    pub layout: Layout,
    pub worker_id: u64,
    pub count: usize,
    pub threads: usize,
    pub print: bool,
}

impl TryFrom<CliArgs> for SelfTestConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let layout = Layout::new(args.sequence_bits, args.worker_bits)?;
        let worker_id = layout.check_worker_id(args.worker_id)?;

        if args.threads == 0 {
            bail!("THREADS must be greater than 0");
        }
        ensure!(args.count > 0, "ID_COUNT must be greater than 0");
        args.count
            .checked_mul(args.threads)
            .ok_or_else(|| anyhow::anyhow!("Overflow in total ID count"))?;

        Ok(Self {
            layout,
            worker_id,
            count: args.count,
            threads: args.threads,
            print: args.print,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<SelfTestConfig> {
        let args =
            CliArgs::try_parse_from(core::iter::once("snowmint").chain(args.iter().copied()))?;
        SelfTestConfig::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.layout, Layout::default());
        assert_eq!(config.worker_id, 1);
        assert_eq!(config.count, 10);
        assert_eq!(config.threads, 1);
        assert!(!config.print);
    }

    #[test]
    fn rejects_wide_layout() {
        let err = parse(&["--sequence-bits", "12", "--worker-bits", "17"]).unwrap_err();
        assert!(err.to_string().contains("cannot be greater than 28"));
    }

    #[test]
    fn rejects_worker_id_outside_layout() {
        assert!(parse(&["--worker-id", "1024"]).is_err());
        assert!(parse(&["--worker-id", "1023"]).is_ok());
        assert!(parse(&["--worker-bits", "4", "--worker-id", "16"]).is_err());
    }

    #[test]
    fn rejects_zero_threads_and_count() {
        assert!(parse(&["--threads", "0"]).is_err());
        assert!(parse(&["-n", "0"]).is_err());
    }
}
