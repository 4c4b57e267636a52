// Command-line front end
// Generates key blobs and runs the four RSA operations on files and strings

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::RsaConfig;
use crate::crypto::{Decryptor, EasyRsa, Encryptor, HashAlgorithm, DEFAULT_KEY_BITS};
use crate::util::encoding::{from_base64, to_base64, TextEncoding};
use crate::util::file_ops::{read_file, read_key_file, write_key_material};

#[derive(Debug, Parser)]
#[command(name = "easy-rsa", version, about = "RSA key generation, encryption and signing")]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a key pair and write private.der / public.der
    Keygen {
        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Encrypt with a public key, printing base64 ciphertext
    Encrypt {
        #[arg(long)]
        key: PathBuf,
        #[command(flatten)]
        input: Input,
        /// Charset for --text; files are encrypted as raw bytes
        #[arg(long, default_value_t = TextEncoding::Utf8, conflicts_with = "input")]
        encoding: TextEncoding,
    },
    /// Decrypt base64 ciphertext with a private key
    Decrypt {
        #[arg(long)]
        key: PathBuf,
        /// Base64 ciphertext
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = TextEncoding::Utf8)]
        encoding: TextEncoding,
    },
    /// Sign with a private key, printing a base64 signature
    Sign {
        #[arg(long)]
        key: PathBuf,
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = HashAlgorithm::Sha256)]
        hash: HashAlgorithm,
    },
    /// Verify a base64 signature with a public key
    Verify {
        #[arg(long)]
        key: PathBuf,
        #[command(flatten)]
        input: Input,
        /// Base64 signature
        #[arg(long)]
        signature: String,
        #[arg(long, default_value_t = HashAlgorithm::Sha256)]
        hash: HashAlgorithm,
    },
    /// Show modulus size, max payload and fingerprint of a key file
    Inspect {
        #[arg(long)]
        key: PathBuf,
    },
}

/// Message source: inline text or a file read as raw bytes
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Input {
    #[arg(long)]
    pub text: Option<String>,
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl Input {
    fn read(&self, encoding: TextEncoding) -> Result<Vec<u8>> {
        match (&self.text, &self.input) {
            (Some(text), _) => Ok(encoding.encode(text)?),
            (None, Some(path)) => read_file(path).context("reading input"),
            (None, None) => anyhow::bail!("either --text or --input is required"),
        }
    }
}

/// How a command ended; `Rejected` maps to a non-zero exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Rejected,
}

fn load_encryptor(path: &Path) -> Result<Encryptor> {
    let blob = read_key_file(path)?;
    Encryptor::new(&blob).with_context(|| format!("loading public key {}", path.display()))
}

fn load_decryptor(path: &Path) -> Result<Decryptor> {
    let blob = read_key_file(path)?;
    Decryptor::new(&blob).with_context(|| format!("loading private key {}", path.display()))
}

/// Run one command, writing its result to `out`
pub fn run(cli: Cli, out: &mut impl Write) -> Result<Outcome> {
    match cli.command {
        Command::Keygen { bits, out: dir } => {
            let rsa = EasyRsa::new(RsaConfig::default().with_key_bits(bits));
            let material = rsa.generate_key()?;
            let (private_path, public_path) = write_key_material(&dir, &material)?;
            let fingerprint = rsa.encryptor(&material)?.fingerprint();

            info!(private = %private_path.display(), public = %public_path.display(), "Wrote key pair");
            writeln!(out, "private key: {}", private_path.display())?;
            writeln!(out, "public key:  {}", public_path.display())?;
            writeln!(out, "fingerprint: {}", fingerprint)?;
        }
        Command::Encrypt { key, input, encoding } => {
            let encryptor = load_encryptor(&key)?;
            let ciphertext = encryptor.encrypt(&input.read(encoding)?)?;
            writeln!(out, "{}", to_base64(&ciphertext))?;
        }
        Command::Decrypt { key, text, encoding } => {
            let decryptor = load_decryptor(&key)?;
            writeln!(out, "{}", decryptor.decrypt_text_with(&text, encoding)?)?;
        }
        Command::Sign { key, input, hash } => {
            let decryptor = load_decryptor(&key)?;
            let signature = decryptor.sign_with(&input.read(TextEncoding::Utf8)?, hash)?;
            writeln!(out, "{}", to_base64(&signature))?;
        }
        Command::Verify {
            key,
            input,
            signature,
            hash,
        } => {
            let encryptor = load_encryptor(&key)?;
            let signature = from_base64(&signature)?;
            let valid = encryptor.verify_with(&input.read(TextEncoding::Utf8)?, &signature, hash)?;
            writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
            if !valid {
                return Ok(Outcome::Rejected);
            }
        }
        Command::Inspect { key } => {
            let blob = read_key_file(&key)?;
            let (kind, encryptor) = match Encryptor::new(&blob) {
                Ok(encryptor) => ("public", encryptor),
                Err(_) => {
                    let decryptor = Decryptor::new(&blob)
                        .with_context(|| format!("{} is not an RSA key", key.display()))?;
                    ("private", decryptor.public_key()?)
                }
            };
            writeln!(out, "type:        {}", kind)?;
            writeln!(out, "bits:        {}", encryptor.modulus_bits())?;
            writeln!(out, "max payload: {}", encryptor.max_payload())?;
            writeln!(out, "fingerprint: {}", encryptor.fingerprint())?;
        }
    }
    Ok(Outcome::Done)
}
