//! Cryptex CLI
//!
//! Command-line interface for the cryptex cipher toolkit.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cryptex_cipher::{
    n_graph, AffineCipher, Alphabet, Base, Cipher, CipherType, CrackingEngine, CryptexConfig,
    FrequencyAnalysis, KeyScheme, Morse, Strategy, VigenereCipher,
};

#[derive(Parser)]
#[command(name = "cryptex")]
#[command(about = "Cryptex - Classical ciphers and brute-force cryptanalysis")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/cryptex/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured alphabet
    #[arg(long, global = true)]
    alphabet: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt with a classic cipher
    Encrypt {
        /// Cipher: affine, caesar, atbash, vigenere
        cipher: String,

        /// Text to encrypt
        text: String,

        /// Key: "a,b" for affine, shift for caesar, keyword for vigenere
        #[arg(short, long, allow_hyphen_values = true)]
        key: Option<String>,
    },

    /// Decrypt with a classic cipher
    Decrypt {
        /// Cipher: affine, caesar, atbash, vigenere
        cipher: String,

        /// Text to decrypt
        text: String,

        /// Key: "a,b" for affine, shift for caesar, keyword for vigenere
        #[arg(short, long, allow_hyphen_values = true)]
        key: Option<String>,
    },

    /// Brute force every key and rank the candidates
    Crack {
        /// Cipher: affine, caesar, atbash
        cipher: String,

        /// Ciphertext
        text: String,

        /// Ranking: bruteforce, semantic, frequency, combined
        #[arg(short, long)]
        strategy: Option<String>,

        /// Number of candidates to show
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Encode text
    Encode {
        /// Encoding: morse, binary, hex, base<N>
        algo: String,

        /// Text to encode
        text: String,
    },

    /// Decode text
    Decode {
        /// Encoding: morse, binary, hex, base<N>
        algo: String,

        /// Text to decode
        text: String,
    },

    /// Frequency analysis
    Analyze {
        /// Text to analyze
        text: String,

        /// Also list n-graphs of this length
        #[arg(short, long)]
        ngraph: Option<usize>,

        /// Number of top symbols to list
        #[arg(short, long, default_value = "5")]
        top: usize,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

const DEFAULT_LOG: &str = "cryptex=info";

/// `RUST_LOG` directives when set and valid, otherwise `cryptex=info`
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = CryptexConfig::load_or_default(cli.config.as_deref())?;
    if let Some(symbols) = &cli.alphabet {
        config.alphabet = Alphabet::new(symbols)?;
    }
    debug!(alphabet = %config.alphabet, strategy = config.strategy.name(), "configuration ready");

    match cli.command {
        Commands::Encrypt { cipher, text, key } => cmd_encrypt(&config, cipher, text, key),
        Commands::Decrypt { cipher, text, key } => cmd_decrypt(&config, cipher, text, key),
        Commands::Crack { cipher, text, strategy, top } => cmd_crack(&config, cipher, text, strategy, top),
        Commands::Encode { algo, text } => cmd_encode(algo, text),
        Commands::Decode { algo, text } => cmd_decode(algo, text),
        Commands::Analyze { text, ngraph, top } => cmd_analyze(&config, text, ngraph, top),
        Commands::Config { init } => cmd_config(&config, cli.config, init),
    }
}

// ═══════════════════════════════════════════════════════════
// CIPHER SELECTION
// ═══════════════════════════════════════════════════════════

fn parse_cipher(name: &str) -> Result<CipherType> {
    CipherType::from_name(name).ok_or_else(|| {
        anyhow::anyhow!("Unknown cipher: {}. Use: affine, caesar, atbash, vigenere", name)
    })
}

fn require_key(kind: CipherType, key: Option<&str>) -> Result<&str> {
    match key {
        Some(key) => Ok(key),
        None => anyhow::bail!("{} needs a key (--key)", kind.name()),
    }
}

fn parse_affine_key(key: &str) -> Result<(i64, i64)> {
    let parts: Vec<&str> = key.split(',').collect();
    if parts.len() != 2 {
        anyhow::bail!("Affine key must be 'a,b' format");
    }
    let a: i64 = parts[0].trim().parse()?;
    let b: i64 = parts[1].trim().parse()?;
    Ok((a, b))
}

fn build_cipher(config: &CryptexConfig, kind: CipherType, key: Option<&str>) -> Result<Box<dyn Cipher>> {
    let alphabet = config.alphabet.clone();

    let cipher: Box<dyn Cipher> = match kind {
        CipherType::Affine => {
            let (a, b) = parse_affine_key(require_key(kind, key)?)?;
            Box::new(AffineCipher::with_alphabet(alphabet, a, b)?)
        }
        CipherType::Caesar => {
            let shift: i64 = require_key(kind, key)?.trim().parse()?;
            Box::new(AffineCipher::from_scheme(alphabet, KeyScheme::Caesar { shift }))
        }
        CipherType::Atbash => Box::new(AffineCipher::from_scheme(alphabet, KeyScheme::Atbash)),
        CipherType::Vigenere => {
            Box::new(VigenereCipher::with_alphabet(alphabet, require_key(kind, key)?))
        }
    };

    Ok(cipher)
}

fn parse_encoding(algo: &str) -> Result<Box<dyn Cipher>> {
    let algo = algo.to_lowercase();
    let codec: Box<dyn Cipher> = match algo.as_str() {
        "morse" => Box::new(Morse),
        "binary" | "bin" => Box::new(Base::binary()),
        "hex" | "hexadecimal" => Box::new(Base::hexadecimal()),
        other => match other.strip_prefix("base").map(str::parse::<u32>) {
            Some(Ok(radix)) => Box::new(Base::new(radix)?),
            _ => anyhow::bail!("Unknown encoding: {}. Use: morse, binary, hex, base<N>", algo),
        },
    };
    Ok(codec)
}

// ═══════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════

fn cmd_encrypt(config: &CryptexConfig, cipher: String, text: String, key: Option<String>) -> Result<()> {
    let kind = parse_cipher(&cipher)?;
    let result = build_cipher(config, kind, key.as_deref())?.encrypt(&text)?;

    println!("\n  ENCRYPT ({})", cipher.to_uppercase());
    if let Some(key) = &key {
        println!("  Key:    {}", key);
    }
    println!("  Input:  {}", text);
    println!("  Output: {}", result);
    Ok(())
}

fn cmd_decrypt(config: &CryptexConfig, cipher: String, text: String, key: Option<String>) -> Result<()> {
    let kind = parse_cipher(&cipher)?;
    let result = build_cipher(config, kind, key.as_deref())?.decrypt(&text)?;

    println!("\n  DECRYPT ({})", cipher.to_uppercase());
    if let Some(key) = &key {
        println!("  Key:    {}", key);
    }
    println!("  Input:  {}", text);
    println!("  Output: {}", result);
    Ok(())
}

fn cmd_crack(
    config: &CryptexConfig,
    cipher: String,
    text: String,
    strategy: Option<String>,
    top: usize,
) -> Result<()> {
    let kind = parse_cipher(&cipher)?;
    let Some(scheme) = kind.brute_force_scheme() else {
        anyhow::bail!("{} cannot be brute forced. Use: affine, caesar, atbash", kind.name());
    };
    let target = AffineCipher::from_scheme(config.alphabet.clone(), scheme);

    let mut engine = CrackingEngine::from_config(config);
    if let Some(name) = strategy {
        let strategy = Strategy::from_name(&name).ok_or_else(|| {
            anyhow::anyhow!("Unknown strategy: {}. Use: bruteforce, semantic, frequency, combined", name)
        })?;
        engine = engine.with_strategy(strategy);
    }

    let candidates = engine.rank(&target, &text)?;
    info!(cipher = kind.name(), candidates = candidates.len(), "brute force complete");

    println!("\n  CRACK ({}, {})", cipher.to_uppercase(), engine.strategy().name());
    println!("  ========================\n");
    println!("  Ciphertext: {}", text);
    println!("  Candidates: {}\n", candidates.len());

    for (rank, candidate) in candidates.iter().take(top).enumerate() {
        println!("  [{:3}] {}  ({} errors)", rank + 1, candidate.text(), candidate.errors());
    }
    Ok(())
}

fn cmd_encode(algo: String, text: String) -> Result<()> {
    let result = parse_encoding(&algo)?.encrypt(&text)?;

    println!("\n  ENCODE ({})", algo.to_uppercase());
    println!("  Input:  {}", text);
    println!("  Output: {}", result);
    Ok(())
}

fn cmd_decode(algo: String, text: String) -> Result<()> {
    let result = parse_encoding(&algo)?.decrypt(&text)?;

    println!("\n  DECODE ({})", algo.to_uppercase());
    println!("  Input:  {}", text);
    println!("  Output: {}", result);
    Ok(())
}

fn cmd_analyze(config: &CryptexConfig, text: String, ngraph: Option<usize>, top: usize) -> Result<()> {
    let analysis = FrequencyAnalysis::analyze(&text, &config.alphabet);

    println!();
    for line in analysis.render_ascii().lines() {
        println!("  {}", line);
    }

    println!("\n  TOP SYMBOLS:");
    for (symbol, count) in analysis.top_chars(top) {
        println!("  {:?}: {} ({:.2}%)", symbol, count, analysis.frequency_percent(symbol));
    }

    if let Some(n) = ngraph {
        let mut graphs: Vec<(String, usize)> = n_graph(&text, n)?.into_iter().collect();
        graphs.sort();

        println!("\n  {}-GRAPHS:", n);
        for (graph, rating) in graphs {
            println!("  {:?}: {}", graph, rating);
        }
    }
    Ok(())
}

fn cmd_config(config: &CryptexConfig, path: Option<PathBuf>, init: bool) -> Result<()> {
    let path = path.or_else(CryptexConfig::default_location);

    if init {
        let Some(path) = path else {
            anyhow::bail!("No config directory on this platform, pass --config");
        };
        config.save(&path)?;
        info!(path = %path.display(), "wrote config");
        println!("  Wrote {}", path.display());
        return Ok(());
    }

    println!("\n  CONFIG");
    match &path {
        Some(path) => println!("  File:     {}", path.display()),
        None => println!("  File:     (none)"),
    }
    println!("  Alphabet: {} (m = {})", config.alphabet, config.alphabet.len());
    println!("  Strategy: {}", config.strategy.name());
    println!("  Targets:  {}", config.frequency_targets);
    println!(
        "  Spelling: vowels {:?}, tolerance {}",
        config.spell_checker.vowels, config.spell_checker.consonant_tolerance
    );
    Ok(())
}
