#![forbid(unsafe_code)]
//! Inspect and verify GusCoin chain parameters

use chrono::DateTime;
use clap::{Parser, Subcommand};
use colored::*;
use guscoin::chainparams::{Base58Type, ChainParams, Network};
use guscoin::config::{load_config, DEFAULT_CONFIG_FILE};
use guscoin::consensus::DeploymentPos;
use guscoin::genesis::{default_genesis_block, mine_genesis_nonce};
use guscoin::params::{params, select_from_config};
use guscoin::transaction::COIN;
use guscoin::{create_chain_params, ChainError};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Network to select, overriding the configuration file
    #[arg(long)]
    network: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the active network profile
    Show {
        /// Emit the full profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuilds genesis blocks and checks them against the pinned hashes
    VerifyGenesis {
        /// Check every supported network instead of the selected one
        #[arg(long)]
        all: bool,
    },
    /// Lists the checkpoints of the active network
    Checkpoints,
    /// Searches a genesis nonce for new network parameters (offline)
    MineGenesis {
        #[arg(long, default_value_t = 1515315613)]
        time: u32,
        /// Compact target, hex
        #[arg(long, default_value = "1e0ffff0", value_parser = parse_bits)]
        bits: u32,
        #[arg(long, default_value_t = 0)]
        start_nonce: u32,
        #[arg(long, default_value_t = 1)]
        block_version: i32,
    },
}

fn parse_bits(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid compact bits {}: {}", s, e))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::MineGenesis {
            time,
            bits,
            start_nonce,
            block_version,
        } => mine(time, bits, start_nonce, block_version),
        command => {
            let mut config = load_config(&cli.config)?;
            if let Some(network) = cli.network {
                config.chain.network = network;
                config.validate()?;
            }
            select_from_config(&config)?;
            run(command, &params())
        }
    }
}

fn run(command: Commands, active: &ChainParams) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Show { json: true } => {
            println!("{}", serde_json::to_string_pretty(active)?);
        }
        Commands::Show { json: false } => show(active),
        Commands::VerifyGenesis { all } => {
            let networks = if all { Network::ALL.to_vec() } else { vec![active.network] };
            verify(&networks)?;
        }
        Commands::Checkpoints => {
            println!("{}", format!("Checkpoints ({})", active.network_id()).bright_cyan().bold());
            for (height, hash) in &active.checkpoints.checkpoints {
                println!("  {:>10}  {}", height.to_string().bright_white(), hash);
            }
        }
        Commands::MineGenesis { .. } => {
            return Err("genesis mining does not use the selected network".into());
        }
    }
    Ok(())
}

fn show(p: &ChainParams) {
    let c = &p.consensus;
    println!("{}", format!("GusCoin {} network", p.network_id()).bright_cyan().bold());
    println!("{}", "-".repeat(40).bright_cyan());
    println!("Genesis hash:        {}", c.hash_genesis_block.to_string().bright_yellow());
    println!("Genesis merkle root: {}", p.genesis.header.merkle_root);
    println!("Genesis time:        {}", format_time(p.genesis.header.time as i64));
    println!("Message start:       {}", hex::encode(p.message_start));
    println!("Default port:        {}", p.default_port);
    println!("Prune after height:  {}", p.prune_after_height);
    println!();

    println!("{}", "Consensus".bright_green().underline());
    println!("  Halving interval:    {}", c.subsidy_halving_interval);
    println!("  BIP34/65/66 heights: {}/{}/{}", c.bip34_height, c.bip65_height, c.bip66_height);
    println!("  Pow limit:           {}", c.pow_limit);
    println!(
        "  Retarget:            {}s every {} blocks{}",
        c.pow_target_spacing,
        c.difficulty_adjustment_interval(),
        if c.pow_no_retargeting { " (disabled)" } else { "" }
    );
    println!("  Min difficulty:      {}", c.pow_allow_min_difficulty_blocks);
    println!(
        "  Activation:          {} of {}",
        c.rule_change_activation_threshold, c.miner_confirmation_window
    );
    for pos in DeploymentPos::ALL {
        let d = c.deployment(pos);
        println!(
            "  {:<10} bit {:>2}  {} .. {}",
            pos.to_string(),
            d.bit,
            format_time(d.start_time),
            format_time(d.timeout)
        );
    }
    println!("  Min chain work:      {}", c.minimum_chain_work);
    println!("  Assume valid:        {}", c.default_assume_valid);
    println!();

    println!("{}", "Addresses".bright_green().underline());
    for kind in Base58Type::ALL {
        println!("  {:<16} {}", format!("{:?}", kind), hex::encode(p.base58_prefix(kind)));
    }
    println!();

    println!("{}", "Peers".bright_green().underline());
    println!("  Fixed seeds: {}", p.fixed_seeds.len());
    for seed in &p.dns_seeds {
        println!("  DNS seed:    {}", seed.host);
    }
    println!();

    println!("{}", "Policy".bright_green().underline());
    println!("  Require standard:     {}", p.require_standard);
    println!("  Mine on demand:       {}", p.mine_blocks_on_demand);
    println!("  Consistency checks:   {}", p.default_consistency_checks);
    println!(
        "  Tx data:              {} txs at {}, {:.2} tx/s",
        p.chain_tx_data.tx_count,
        format_time(p.chain_tx_data.time),
        p.chain_tx_data.tx_rate
    );
}

fn format_time(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn verify(networks: &[Network]) -> Result<(), ChainError> {
    let mut failed = None;
    for network in networks {
        match create_chain_params(network.as_str()) {
            Ok(p) => println!(
                "{} {:<8} {}",
                "✓".bright_green(),
                network.as_str(),
                p.consensus.hash_genesis_block
            ),
            Err(err) => {
                println!("{} {:<8} {}", "✗".bright_red(), network.as_str(), err);
                failed = Some(err);
            }
        }
    }
    failed.map_or(Ok(()), Err)
}

fn mine(time: u32, bits: u32, start_nonce: u32, version: i32) -> Result<(), Box<dyn std::error::Error>> {
    let mut block = default_genesis_block(time, start_nonce, bits, version, 50 * COIN);
    println!("{}", "Searching genesis nonce...".bright_cyan());

    let start = Instant::now();
    block.header.nonce = mine_genesis_nonce(&block, start_nonce)?;
    let elapsed = start.elapsed();

    println!("{}", "Genesis block found".bright_green().bold());
    println!("  Nonce:       {}", block.header.nonce);
    println!("  Hash:        {}", block.hash().to_string().bright_yellow());
    println!("  PoW hash:    {}", block.header.pow_hash()?);
    println!("  Merkle root: {}", block.header.merkle_root);
    println!("  Time:        {:.3} seconds", elapsed.as_secs_f64());
    Ok(())
}
