//! The command-line application around the container format.
//!
//! A run takes a set of files or directories and replaces each eligible
//! file with its encrypted or decrypted counterpart: encryption appends
//! the container extension and deletes the plaintext, decryption strips
//! it and deletes the container. The core format layer never touches
//! paths it wasn't handed; everything here is the glue the format
//! deliberately leaves out.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use walkdir::WalkDir;

use crate::config::{APP_NAME, FILE_EXTENSION, PASSWORD_MIN_LENGTH};
use crate::error::FormatError;
use crate::file::{self, ExtensionMap};
use crate::format;
use crate::format::v1::{CostParams, HEADER_LEN};
use crate::secret::PasswordSet;
use crate::stats::Stats;
use crate::types::Mode;
use crate::ui::display;
use crate::ui::prompt::Prompt;

/// Named key-derivation cost profiles selectable with `--cost`.
#[derive(Clone, Copy, ValueEnum)]
enum CostPreset {
    Fast,
    Normal,
    Slow,
}

impl CostPreset {
    const fn params(self) -> CostParams {
        match self {
            Self::Fast => CostParams::FAST,
            Self::Normal => CostParams::NORMAL,
            Self::Slow => CostParams::SLOW,
        }
    }
}

/// Flags shared by the encrypt and decrypt subcommands.
#[derive(Args)]
struct RunArgs {
    /// Files or directories to process.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Recurse into directories, processing all files in all
    /// subdirectories.
    #[arg(short, long)]
    recurse: bool,

    /// Show what would have happened without changing anything.
    #[arg(long)]
    dry_run: bool,

    /// Password to use. With this flag no prompting happens and a failed
    /// decryption aborts the run. NOT recommended: the password becomes
    /// visible to process managers.
    #[arg(short, long)]
    password: Option<String>,

    /// File extension(s) marking encrypted files, comma-separated; the
    /// first one is appended on encryption. Don't change this unless you
    /// really need to.
    #[arg(long, default_value = FILE_EXTENSION)]
    ext: String,

    /// Key-derivation cost profile. The longer derivation takes, the
    /// longer a brute-force of your password takes. When in doubt, use
    /// the default.
    #[arg(long, value_enum)]
    cost: Option<CostPreset>,

    /// Key-derivation time cost, overriding the profile.
    #[arg(long)]
    cost_time: Option<u32>,

    /// Key-derivation memory cost in MiB, overriding the profile.
    #[arg(long)]
    cost_mem: Option<u32>,

    /// Key-derivation parallelism, overriding the profile.
    #[arg(long)]
    cost_threads: Option<u8>,
}

impl RunArgs {
    /// Resolves the preset and override flags into one cost triple.
    fn cost_params(&self) -> CostParams {
        let mut cost = self.cost.map_or(CostParams::NORMAL, CostPreset::params);

        if let Some(time) = self.cost_time {
            cost.time = time;
        }
        if let Some(mem) = self.cost_mem {
            cost.memory = mem * 1024;
        }
        if let Some(threads) = self.cost_threads {
            cost.threads = threads;
        }

        cost
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt files, replacing each with an encrypted counterpart.
    Encrypt(RunArgs),

    /// Decrypt encrypted files, restoring the plaintext counterpart.
    Decrypt(RunArgs),

    /// Print container metadata without decrypting anything.
    Inspect {
        /// Container files to inspect.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the raw trailing signature instead of the header.
        #[arg(long)]
        signature: bool,
    },
}

/// Top-level CLI parser.
#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Encrypts files into authenticated containers using Argon2id, AES-256-CTR and HMAC-SHA-512.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

impl App {
    /// Installs the tracing subscriber and parses the command line.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber is already installed.
    pub fn init() -> Result<Self> {
        let subscriber = tracing_subscriber::fmt().with_target(false).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Propagates any failure that aborted the run.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Encrypt(args) => Runner::new(Mode::Encrypt, &args)?.run(&args.paths),
            Commands::Decrypt(args) => Runner::new(Mode::Decrypt, &args)?.run(&args.paths),
            Commands::Inspect { paths, signature } => inspect(&paths, signature),
        }
    }
}

/// One encrypt or decrypt run over a set of paths.
struct Runner {
    mode: Mode,
    extensions: ExtensionMap,
    cost: CostParams,
    passwords: PasswordSet,
    password_from_flag: bool,
    prompt: Prompt,
    stats: Stats,
    recurse: bool,
    dry_run: bool,
}

impl Runner {
    fn new(mode: Mode, args: &RunArgs) -> Result<Self> {
        let prompt = Prompt::new(PASSWORD_MIN_LENGTH);
        let mut passwords = PasswordSet::new();

        if let Some(value) = &args.password {
            passwords.add(prompt.accept_flag_password(value)?);
        }

        Ok(Self {
            mode,
            extensions: ExtensionMap::parse(&args.ext)?,
            cost: args.cost_params(),
            password_from_flag: !passwords.is_empty(),
            passwords,
            prompt,
            stats: Stats::new(),
            recurse: args.recurse,
            dry_run: args.dry_run,
        })
    }

    fn run(mut self, paths: &[PathBuf]) -> Result<()> {
        if self.dry_run {
            tracing::warn!("doing a dry run, no changes will actually be made");
        }

        for path in paths {
            self.process(path)?;
        }

        display::show_report(&self.stats);
        Ok(())
    }

    /// Processes one argument: a file, a directory, or a symlink.
    fn process(&mut self, path: &Path) -> Result<()> {
        let meta = path.symlink_metadata().with_context(|| format!("cannot stat: {}", path.display()))?;

        if meta.file_type().is_symlink() {
            display::show_skipped(path, "symlink");
            self.stats.add_skipped(path);
            return Ok(());
        }

        if meta.is_dir() {
            if !self.recurse {
                display::show_skipped(path, "recursion flag not set");
                self.stats.add_skipped(path);
                return Ok(());
            }
            return self.process_dir(path);
        }

        self.process_file(path)
    }

    fn process_dir(&mut self, dir: &Path) -> Result<()> {
        for entry in WalkDir::new(dir).follow_links(false).min_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("cannot walk: {}", dir.display()))?;

            if entry.file_type().is_symlink() {
                display::show_skipped(entry.path(), "symlink");
                self.stats.add_skipped(entry.path());
                continue;
            }
            if entry.file_type().is_dir() {
                continue;
            }

            self.process_file(entry.path())?;
        }

        Ok(())
    }

    fn process_file(&mut self, path: &Path) -> Result<()> {
        display::show_processing(path);

        match self.mode {
            Mode::Encrypt => self.encrypt_file(path),
            Mode::Decrypt => self.decrypt_file(path),
        }
    }

    fn encrypt_file(&mut self, path: &Path) -> Result<()> {
        if self.extensions.matches(path) {
            display::show_skipped(path, "has encrypted file extension");
            self.stats.add_skipped(path);
            return Ok(());
        }

        let output = self.extensions.encrypted_path(path);
        if file::exists(&output) {
            self.stats.add_failed(path);
            bail!(
                "encrypted and unencrypted versions of the same file found: {} - something probably went wrong, inspect the files and delete the one you don't need",
                output.display()
            );
        }

        if !self.dry_run {
            if self.passwords.is_empty() {
                let entered = self.prompt.encryption_password()?;
                self.passwords.add(entered);
            }
            let password = self.passwords.first().expect("password collected above");

            format::encrypt_file(password.expose(), self.cost, path, &output).with_context(|| format!("encrypt failed: {}", path.display()))?;
        }

        self.finish_file(path, &output)
    }

    fn decrypt_file(&mut self, path: &Path) -> Result<()> {
        if !self.extensions.matches(path) {
            display::show_skipped(path, "doesn't have encrypted file extension");
            self.stats.add_skipped(path);
            return Ok(());
        }

        let output = self.extensions.decrypted_path(path);
        if file::exists(&output) {
            self.stats.add_failed(path);
            bail!(
                "encrypted and unencrypted versions of the same file found: {} - something probably went wrong, inspect the files and delete the one you don't need",
                output.display()
            );
        }

        if !self.dry_run {
            if self.passwords.is_empty() {
                let entered = self.prompt.decryption_password()?;
                self.passwords.add(entered);
            }

            if !self.try_decrypt(path, &output)? {
                // every password failed and the user chose to move on
                return Ok(());
            }
        }

        self.finish_file(path, &output)
    }

    /// Tries every known password against the container, prompting for
    /// more on mismatch. Returns false if the file was skipped.
    fn try_decrypt(&mut self, path: &Path, output: &Path) -> Result<bool> {
        loop {
            let mut outcome = None;

            for password in self.passwords.iter() {
                match format::decrypt_file(password.expose(), path, output) {
                    Err(FormatError::SignatureMismatch) => {
                        tracing::info!("password failed, trying other password");
                    }
                    other => {
                        outcome = Some(other);
                        break;
                    }
                }
            }

            match outcome {
                Some(Ok(())) => return Ok(true),
                Some(Err(error)) => {
                    self.stats.add_failed(path);
                    return Err(error).with_context(|| format!("decrypt failed: {}", path.display()));
                }
                // Every known password mismatched the signature.
                None => {
                    if self.password_from_flag {
                        self.stats.add_failed(path);
                        bail!("exiting because the --password flag was used");
                    }

                    display::show_signature_warning(path);
                    match self.prompt.retry_password()? {
                        Some(entered) => {
                            self.passwords.add(entered);
                        }
                        None => {
                            display::show_skipped(path, "wrong password");
                            self.stats.add_skipped(path);
                            return Ok(false);
                        }
                    }
                }
            }
        }
    }

    /// Records the new output and removes the source file.
    fn finish_file(&mut self, source: &Path, output: &Path) -> Result<()> {
        display::show_created(output);
        self.stats.add_created(output);

        if !self.dry_run {
            fs::remove_file(source).with_context(|| format!("cannot remove: {}", source.display()))?;
        }

        display::show_deleted(source);
        self.stats.add_deleted(source);

        Ok(())
    }
}

/// Prints the header or the trailing signature of each container.
fn inspect(paths: &[PathBuf], signature: bool) -> Result<()> {
    for path in paths {
        if signature {
            let mut source = fs::File::open(path).with_context(|| format!("cannot open: {}", path.display()))?;
            let sig = format::read_trailing_signature(&mut source)?;
            display::show_signature(path, &sig);
        } else {
            let mut source = fs::File::open(path).with_context(|| format!("cannot open: {}", path.display()))?;
            let size = source.metadata()?.len();
            let mut bytes = [0u8; HEADER_LEN];
            source.read_exact(&mut bytes).with_context(|| format!("cannot read header: {}", path.display()))?;
            let header = format::extract_header(&bytes)?;
            display::show_header(path, size, &header);
        }
    }

    Ok(())
}
