/*!
 * Process-wide context: session, cache and command dispatch
 */

use tracing::{debug, info, warn};

use crate::actions::{self, CompleteOptions, LsOptions, RmOptions};
use crate::api::{HttpDriveApi, Session};
use crate::cache::{CacheError, LookupCache};
use crate::config::{Command, Config};
use crate::error::Result;
use crate::lookup::Lookup;
use crate::path::NormalizedPath;
use crate::prompt::{Confirm, TerminalPrompt};
use crate::report::{ListingFormat, Reporter};

/// Everything a command needs, loaded once per process
pub struct App {
    config: Config,
    session: Session,
    cache: LookupCache,
}

impl App {
    /// Load the session and the cache
    pub fn new(config: Config) -> Result<Self> {
        let session = Session::load(&config.session_file)?;
        let cache = if config.no_cache {
            LookupCache::new()
        } else {
            load_cache(&config)
        };

        Ok(Self {
            config,
            session,
            cache,
        })
    }

    /// Run the configured command, then save the cache and the session
    ///
    /// Both are saved even when the command fails.
    pub fn run(self) -> Result<()> {
        let api = HttpDriveApi::new(self.session)?;
        let mut lookup = Lookup::new(&api, self.cache, self.config.api_usage);

        let result = execute(&mut lookup, &self.config.command, &TerminalPrompt);

        let cache = lookup.into_cache();
        if !self.config.no_cache {
            if let Err(e) = cache.save(&self.config.cache_file) {
                warn!("failed to save cache: {}", e);
            }
        }

        if let Err(e) = api.session().save(&self.config.session_file) {
            warn!("failed to save session: {}", e);
        }

        if let Some(output) = result? {
            if !output.is_empty() {
                println!("{}", output);
            }
        }

        Ok(())
    }
}

fn load_cache(config: &Config) -> LookupCache {
    match LookupCache::load(&config.cache_file) {
        Ok(cache) => cache,
        Err(CacheError::NotFound(path)) => {
            info!("no cache at {}, starting empty", path);
            LookupCache::new()
        }
        Err(e) => {
            warn!("failed to load cache: {}; starting empty", e);
            LookupCache::new()
        }
    }
}

/// Run one command against a lookup context; returns text to print
pub fn execute(
    lookup: &mut Lookup<'_>,
    command: &Command,
    prompt: &dyn Confirm,
) -> Result<Option<String>> {
    debug!("executing {:?} with {} policy", command, lookup.usage());

    match command {
        Command::Ls {
            paths,
            long,
            trash,
            recursive,
            depth,
            glob,
        } => {
            let options = LsOptions {
                trash: *trash,
                recursive: *recursive,
                depth: depth.unwrap_or(usize::MAX),
                glob: *glob,
            };
            let listings = actions::ls(lookup, paths, &options)?;

            let format = if *long {
                ListingFormat::Long
            } else {
                ListingFormat::Plain
            };
            Ok(Some(Reporter::new(format).render(&listings)))
        }
        Command::Mkdir { path, parents } => {
            let created = actions::mkdir(lookup, &NormalizedPath::new(path), *parents)?;
            info!("created {}", created.drivewsid());
            Ok(None)
        }
        Command::Rm {
            paths,
            trash,
            permanent,
            force,
        } => {
            let options = RmOptions {
                trash: *trash,
                permanent: *permanent,
                force: *force,
            };
            let removed = actions::rm(lookup, paths, &options, prompt)?;
            info!("removed {} items", removed.len());
            Ok(None)
        }
        Command::Mv {
            source,
            destination,
        } => {
            let outcome = actions::mv(
                lookup,
                &NormalizedPath::new(source),
                &NormalizedPath::new(destination),
            )?;
            info!("mv: {:?}", outcome);
            Ok(None)
        }
        Command::Autocomplete {
            path,
            trash,
            file,
            dir,
            cached,
        } => {
            let options = CompleteOptions {
                trash: *trash,
                file: *file,
                dir: *dir,
                cached: *cached,
            };
            let suggestions = actions::autocomplete(lookup, path, &options)?;
            Ok(Some(suggestions.join("\n")))
        }
    }
}
