//! # Configuration Logic
//!
//! ## Role
//! CLI argument parsing and validation.
//!
//! ## Options
//! - `--backend packed|bytes`: storage backend for every array (default: packed)
//! - `--nthreads N`: worker threads (default: all cores)
//! - `--format tsv|json`: report encoding (default: tsv)
//! - `-v` / `-vv`: log level (warn, info, debug; trace from `-vvv`)
//! - `--profile`: log span timings on close
//!
//! ## Validation
//! - Ensure `nthreads > 0`
//! - Ensure input files exist
//!
//! ## Example CLI
//! ```bash
//! genopack --backend bytes check --genotypes geno.txt --phase phase.txt --threshold 2
//! ```

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::data::{Backend, Bytes, Packed};
use crate::error::{GenopackError, Result};
use crate::io::OutputFormat;

/// Storage backend chosen on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Two bit planes per array
    #[default]
    Packed,
    /// One byte per call
    Bytes,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Packed => Packed::NAME,
            BackendKind::Bytes => Bytes::NAME,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "genopack",
    version,
    about = "Bit-packed genotype and haplotype encoding with vectorised comparison"
)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Storage backend for genotype and phase arrays
    #[arg(long, value_enum, default_value_t = BackendKind::Packed, global = true)]
    pub backend: BackendKind,

    /// Number of worker threads (default: all cores)
    #[arg(long, global = true)]
    pub nthreads: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv, global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log span timings when spans close
    #[arg(long, global = true)]
    pub profile: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Per-individual missing / heterozygous / homozygous counts
    Stats {
        /// Genotype file (`id c1 c2 ...` per line)
        #[arg(long)]
        genotypes: PathBuf,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check phased haplotype pairs against genotypes
    Check {
        /// Genotype file
        #[arg(long)]
        genotypes: PathBuf,

        /// Phase file (two rows per individual)
        #[arg(long)]
        phase: PathBuf,

        /// Conflicting homozygous loci tolerated per haplotype
        #[arg(long, default_value_t = 0)]
        threshold: usize,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compare two genotype files individual by individual
    Compare {
        /// First genotype file
        #[arg(long)]
        left: PathBuf,

        /// Second genotype file
        #[arg(long)]
        right: PathBuf,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Config {
    /// Parse command line arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate parsed arguments
    pub fn validate(&self) -> Result<()> {
        if self.nthreads == Some(0) {
            return Err(GenopackError::config("nthreads must be positive"));
        }
        for path in self.inputs() {
            if !path.exists() {
                return Err(GenopackError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Input files of the selected command
    pub fn inputs(&self) -> Vec<&Path> {
        match &self.command {
            Command::Stats { genotypes, .. } => vec![genotypes.as_path()],
            Command::Check {
                genotypes, phase, ..
            } => vec![genotypes.as_path(), phase.as_path()],
            Command::Compare { left, right, .. } => vec![left.as_path(), right.as_path()],
        }
    }

    /// Output file of the selected command (None = stdout)
    pub fn out(&self) -> Option<&Path> {
        match &self.command {
            Command::Stats { out, .. } | Command::Check { out, .. } | Command::Compare { out, .. } => {
                out.as_deref()
            }
        }
    }

    /// Get number of threads to use
    pub fn nthreads(&self) -> usize {
        self.nthreads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Maximum log level from the `-v` count
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            Config::try_parse_from(["genopack", "stats", "--genotypes", "g.txt"]).unwrap();
        assert_eq!(config.backend, BackendKind::Packed);
        assert_eq!(config.format, OutputFormat::Tsv);
        assert_eq!(config.log_level(), Level::WARN);
        assert!(config.out().is_none());
        assert!(config.nthreads() >= 1);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = Config::try_parse_from([
            "genopack",
            "check",
            "--genotypes",
            "g.txt",
            "--phase",
            "p.txt",
            "--threshold",
            "3",
            "--backend",
            "bytes",
            "--format",
            "json",
            "-vv",
            "--out",
            "report.jsonl",
        ])
        .unwrap();
        assert_eq!(config.backend, BackendKind::Bytes);
        assert_eq!(config.backend.name(), "bytes");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_level(), Level::DEBUG);
        assert_eq!(config.out(), Some(Path::new("report.jsonl")));
        assert!(matches!(config.command, Command::Check { threshold: 3, .. }));
    }

    #[test]
    fn test_validate() {
        let config = Config::try_parse_from([
            "genopack",
            "compare",
            "--left",
            "/nonexistent/a.txt",
            "--right",
            "/nonexistent/b.txt",
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(GenopackError::FileNotFound { .. })
        ));

        let config = Config::try_parse_from([
            "genopack",
            "--nthreads",
            "0",
            "stats",
            "--genotypes",
            "g.txt",
        ])
        .unwrap();
        assert!(matches!(config.validate(), Err(GenopackError::Config { .. })));
    }
}
