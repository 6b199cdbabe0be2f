//! CLI command implementations.
//!
//! Everything here works offline: keys, addresses, call-data and signed
//! transaction records are produced locally and printed.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use lattice_abi::{Abi, ArgValue, Function};
use lattice_core::{CoreConfig, SignedTransactionRecord, TransactionCodec};
use lattice_crypto::provider;
use lattice_types::{Address, ChainHead, Curve, Hash, TransactionBuilder};
use num_bigint::BigUint;
use std::path::{Path, PathBuf};

/// Main CLI.
#[derive(Parser, Debug)]
#[command(name = "lattice")]
#[command(about = "Lattice offline toolkit: keys, addresses, call-data, signing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "LATTICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Chain ID, overrides the configuration file
    #[arg(long, global = true, env = "LATTICE_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Curve family (sm2p256v1 or secp256k1), overrides the configuration file
    #[arg(long, global = true, env = "LATTICE_CURVE")]
    pub curve: Option<Curve>,

    /// Log at the configured level instead of warnings only
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a random key pair
    Keygen,

    /// Show the key pair of a private key
    Inspect {
        /// Private key (hex)
        private_key: String,
    },

    /// Convert an address between zltc_ text and 0x hex
    Address {
        /// Address in either form
        address: String,
    },

    /// Encode contract call-data
    EncodeCall {
        /// JSON ABI file
        #[arg(long, conflicts_with = "signature")]
        abi: Option<PathBuf>,
        /// Method signature, e.g. "set(string[])"
        #[arg(long)]
        signature: Option<String>,
        /// Method name (with --abi)
        #[arg(long, required_unless_present = "signature")]
        method: Option<String>,
        /// Arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,
    },

    /// Encode constructor arguments
    EncodeConstructor {
        /// JSON ABI file
        #[arg(long)]
        abi: PathBuf,
        /// Arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,
    },

    /// Sign a transfer and print the submission record
    SignTransfer {
        /// Private key (hex)
        #[arg(long, env = "LATTICE_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount, decimal
        #[arg(long, default_value = "0")]
        amount: String,
        /// Height of the sender's latest accepted transaction
        #[arg(long)]
        height: u64,
        /// Hash of the sender's latest accepted transaction
        #[arg(long)]
        parent: String,
        /// Daemon block hash
        #[arg(long)]
        daemon: String,
        /// Resource budget; defaults to the configured value
        #[arg(long)]
        joule: Option<u64>,
        /// UNIX seconds; defaults to now
        #[arg(long)]
        timestamp: Option<u64>,
        /// Payload (hex)
        #[arg(long)]
        payload: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

/// Configuration file merged with command-line overrides.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoreConfig::default(),
    };
    if let Some(chain_id) = cli.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(curve) = cli.curve {
        config.curve = curve;
    }
    Ok(config)
}

pub fn execute(cmd: Commands, config: &CoreConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Keygen => {
            let pair = provider(config.curve).generate_key_pair()?;
            print_key_pair(&pair);
        }
        Commands::Inspect { private_key } => {
            let secret = decode_hex(&private_key).context("private key")?;
            let pair = provider(config.curve).key_pair_from_secret(&secret)?;
            print_key_pair(&pair);
        }
        Commands::Address { address } => {
            let address: Address = address.parse()?;
            println!("text: {}", address.to_text());
            println!("hex:  {}", address.to_hex());
        }
        Commands::EncodeCall {
            abi,
            signature,
            method,
            args,
        } => {
            let args = parse_args(&args)?;
            let data = match (abi, signature) {
                (_, Some(signature)) => Function::parse_signature(&signature)?.encode_call(&args)?,
                (Some(path), None) => {
                    let method = method.context("--method is required with --abi")?;
                    load_abi(&path)?.encode_call(&method, &args)?
                }
                (None, None) => bail!("either --abi or --signature is required"),
            };
            println!("0x{}", hex::encode(data));
        }
        Commands::EncodeConstructor { abi, args } => {
            let args = parse_args(&args)?;
            let encoded = load_abi(&abi)?.constructor()?.encode_args_hex(&args)?;
            println!("{}", encoded);
        }
        Commands::SignTransfer {
            private_key,
            to,
            amount,
            height,
            parent,
            daemon,
            joule,
            timestamp,
            payload,
        } => {
            let codec = TransactionCodec::new(config.chain_id, config.curve);
            let secret = decode_hex(&private_key).context("private key")?;
            let pair = codec.provider().key_pair_from_secret(&secret)?;

            let head = ChainHead::new(
                height,
                parent.parse::<Hash>().context("parent hash")?,
                daemon.parse::<Hash>().context("daemon hash")?,
            );
            let amount = BigUint::parse_bytes(amount.as_bytes(), 10)
                .with_context(|| format!("invalid amount: {}", amount))?;

            let mut builder = TransactionBuilder::transfer()
                .chain_head(head)
                .owner(pair.address())
                .linker(to.parse::<Address>().context("recipient")?)
                .amount(amount)
                .joule(joule.unwrap_or(config.default_joule));
            if let Some(ts) = timestamp {
                builder = builder.timestamp(ts);
            }
            if let Some(payload) = payload {
                builder = builder.payload(decode_hex(&payload).context("payload")?);
            }

            let signed = codec.sign(builder.build()?, &pair)?;
            let record = SignedTransactionRecord::new(&codec, &signed);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}

fn print_key_pair(pair: &lattice_crypto::KeyPair) {
    println!("curve:       {}", pair.curve());
    println!("address:     {}", pair.address().to_text());
    println!("hex address: {}", pair.address().to_hex());
    println!("public key:  {}", pair.public_key().to_hex());
    println!("private key: {}", pair.secret_key().to_hex());
}

fn parse_args(json: &str) -> anyhow::Result<Vec<ArgValue>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("arguments must be a JSON array")?;
    Ok(ArgValue::list_from_json(&value)?)
}

fn load_abi(path: &Path) -> anyhow::Result<Abi> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading ABI {}", path.display()))?;
    Ok(Abi::from_json(&json)?)
}

fn decode_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(digits)?)
}
