/*!
 * Configuration handling for idrive
 */

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::api::default_session_path;
use crate::cache::default_cache_path;
use crate::error::Result;
use crate::lookup::ApiUsage;

/// Command-line arguments for idrive
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "idrive",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse and manage iCloud Drive by path",
    long_about = "Resolves slash-separated paths against iCloud Drive, keeping a local cache of folder listings that is re-validated against the drive before it is trusted."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Session file with the account endpoints and cookies
    #[clap(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Cache file
    #[clap(long, global = true)]
    pub cache_file: Option<PathBuf>,

    /// Neither load nor save the cache file
    #[clap(long, global = true)]
    pub no_cache: bool,

    /// Which cached data may be trusted without asking the drive
    #[clap(long, value_enum, global = true, default_value_t = ApiUsage::default())]
    pub api_usage: ApiUsage,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Drive commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List folders and files
    Ls {
        /// Paths to list
        #[clap(default_value = "/")]
        paths: Vec<String>,

        /// Show type, size and modification date
        #[clap(short, long)]
        long: bool,

        /// Resolve paths inside the trash
        #[clap(short, long)]
        trash: bool,

        /// List descendants
        #[clap(short = 'R', long)]
        recursive: bool,

        /// Maximum depth for --recursive (unlimited by default)
        #[clap(short = 'D', long, requires = "recursive")]
        depth: Option<usize>,

        /// Treat the last path segment as a glob pattern
        #[clap(short, long)]
        glob: bool,
    },

    /// Create a folder
    Mkdir {
        path: String,

        /// Create missing parent folders
        #[clap(short, long)]
        parents: bool,
    },

    /// Move items to the trash or delete them
    Rm {
        #[clap(required = true)]
        paths: Vec<String>,

        /// Paths are inside the trash; removes them permanently
        #[clap(short, long)]
        trash: bool,

        /// Delete instead of moving to the trash
        #[clap(long)]
        permanent: bool,

        /// Do not ask for confirmation
        #[clap(short, long)]
        force: bool,
    },

    /// Move or rename an item
    Mv { source: String, destination: String },

    /// Suggest paths completing the input
    Autocomplete {
        #[clap(default_value = "")]
        path: String,

        #[clap(short, long)]
        trash: bool,

        /// Only suggest files
        #[clap(long, conflicts_with = "dir")]
        file: bool,

        /// Only suggest folders
        #[clap(long)]
        dir: bool,

        /// Only use the cache
        #[clap(long)]
        cached: bool,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Session file path
    pub session_file: PathBuf,

    /// Cache file path
    pub cache_file: PathBuf,

    /// Whether the cache file is skipped
    pub no_cache: bool,

    /// Cache trust policy
    pub api_usage: ApiUsage,

    /// Command to run
    pub command: Command,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let Some(command) = args.command else {
            crate::bail!(Config, "no command given; see --help");
        };

        Ok(Self {
            session_file: args.session_file.unwrap_or_else(default_session_path),
            cache_file: args.cache_file.unwrap_or_else(default_cache_path),
            no_cache: args.no_cache,
            api_usage: args.api_usage,
            command,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.session_file.exists(),
            Config,
            "session file not found: {}",
            self.session_file.display()
        );

        crate::ensure!(
            !self.cache_file.is_dir(),
            Config,
            "cache file is a directory: {}",
            self.cache_file.display()
        );

        if let Command::Mv {
            source,
            destination,
        } = &self.command
        {
            crate::ensure!(
                source != destination,
                InvalidArgument,
                "source and destination are the same: {}",
                source
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriveError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_ls_defaults() {
        let args = Args::parse_from(["idrive", "ls"]);
        assert_eq!(args.api_usage, ApiUsage::Validate);
        assert_eq!(
            args.command,
            Some(Command::Ls {
                paths: vec!["/".to_string()],
                long: false,
                trash: false,
                recursive: false,
                depth: None,
                glob: false,
            })
        );
    }

    #[test]
    fn test_parse_global_flags() {
        let args = Args::parse_from([
            "idrive",
            "mv",
            "/a",
            "/b",
            "--api-usage",
            "only-cache",
            "-vv",
            "--no-cache",
        ]);
        assert_eq!(args.api_usage, ApiUsage::OnlyCache);
        assert_eq!(args.verbose, 2);
        assert!(args.no_cache);
    }

    #[test]
    fn test_rm_requires_paths() {
        assert!(Args::try_parse_from(["idrive", "rm"]).is_err());
    }

    #[test]
    fn test_missing_command() {
        let args = Args::parse_from(["idrive"]);
        assert!(matches!(Config::from_args(args), Err(DriveError::Config(_))));
    }

    #[test]
    fn test_validate_session_file() {
        let dir = tempdir().unwrap();
        let args = Args::parse_from(["idrive", "ls"]);
        let mut config = Config::from_args(args).unwrap();
        config.session_file = dir.path().join("missing.json");
        config.cache_file = dir.path().join("cache.json");

        assert!(matches!(config.validate(), Err(DriveError::Config(_))));

        std::fs::write(&config.session_file, "{}").unwrap();
        assert!(config.validate().is_ok());

        config.command = Command::Mv {
            source: "/a".to_string(),
            destination: "/a".to_string(),
        };
        assert!(matches!(config.validate(), Err(DriveError::InvalidArgument(_))));
    }
}
