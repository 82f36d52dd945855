// Crypto Provider — CLI Command Handlers
//
// Each function handles one CLI subcommand. They build the registry from
// the built-in factories and open the wallet on the configured keyring.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::components::{
    BuildSource, ProviderMetadata, Sha256AddressFormatter, Signature, SignerOptions,
    VerifierOptions,
};
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::factory::FactoryRegistry;
use crate::providers::register_builtin_factories;
use crate::wallet::{KeyringWallet, Wallet};

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub fn execute(cli: Cli) -> Result<(), WalletError> {
    let config = cli.wallet_config();

    match cli.command {
        Commands::Factories => cmd_factories(&config),
        Commands::List => cmd_list(&config),
        Commands::Register {
            provider_type,
            name,
            json,
            metadata,
        } => {
            let source = match (name, json, metadata) {
                (Some(name), _, _) => BuildSource::new(name),
                (_, Some(path), _) => BuildSource::json(read_file(&path)?),
                (_, _, Some(path)) => {
                    let raw = read_file(&path)?;
                    BuildSource::metadata(ProviderMetadata::from_json_bytes(raw.as_bytes())?)
                }
                (None, None, None) => {
                    return Err(WalletError::Other(
                        "one of --name, --json or --metadata is required".to_string(),
                    ))
                }
            };
            cmd_register(&config, &provider_type, source)
        }
        Commands::Show { uid } => cmd_show(&config, &uid),
        Commands::Delete { uid } => cmd_delete(&config, &uid),
        Commands::Sign { uid, message } => cmd_sign(&config, &uid, &message),
        Commands::Verify {
            uid,
            message,
            signature,
        } => cmd_verify(&config, &uid, &message, &signature),
        Commands::Address { uid } => cmd_address(&config, &uid),
        Commands::Find { address } => cmd_find(&config, &address),
        Commands::Load { file } => cmd_load(&config, &file),
    }
}

// ─── Registry ────────────────────────────────────────────────────────────────

fn cmd_factories(config: &WalletConfig) -> Result<(), WalletError> {
    let registry = build_registry(config)?;

    let mut types = registry.registered_factories();
    types.sort();

    println!("Registered provider types ({}):", types.len());
    for provider_type in types {
        println!("  {}", provider_type);
    }

    Ok(())
}

// ─── Create ──────────────────────────────────────────────────────────────────

fn cmd_register(
    config: &WalletConfig,
    provider_type: &str,
    source: BuildSource,
) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;
    let provider = wallet.new_crypto_provider(provider_type, source)?;

    let metadata = provider.metadata();
    println!("✓ Provider stored");
    println!("  Name:       {}", metadata.name);
    println!("  Type:       {}", metadata.provider_type);
    println!("  Public key: {}", metadata.public_key);
    println!("  Address:    {}", wallet.address_of(&metadata.name)?);

    Ok(())
}

fn cmd_load(config: &WalletConfig, file: &Path) -> Result<(), WalletError> {
    let raw = read_file(file)?;
    let wallet = open_wallet(config)?;

    let provider = wallet.registry().load_crypto_provider(&raw)?;
    wallet.store_crypto_provider(provider.as_ref())?;

    println!("✓ Provider {} loaded and stored", provider.metadata().name);
    Ok(())
}

// ─── Read ────────────────────────────────────────────────────────────────────

fn cmd_list(config: &WalletConfig) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;

    let mut names = wallet.list_providers()?;
    names.sort();

    if names.is_empty() {
        println!("No providers stored yet.");
        println!("Create one with: crypto-provider register --name <name>");
        return Ok(());
    }

    println!("Stored providers ({}):\n", names.len());
    for name in &names {
        match wallet.get_provider_metadata(name) {
            Ok(metadata) => println!(
                "  {:20} │ {:8} │ {}",
                metadata.name, metadata.provider_type, metadata.version
            ),
            Err(e) => println!("  {:20} │ unreadable: {}", name, e),
        }
    }

    Ok(())
}

fn cmd_show(config: &WalletConfig, uid: &str) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;
    let metadata = wallet.get_provider_metadata(uid)?;

    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

fn cmd_address(config: &WalletConfig, uid: &str) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;
    println!("{}", wallet.address_of(uid)?);
    Ok(())
}

fn cmd_find(config: &WalletConfig, address: &str) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;
    let provider = wallet.retrieve_crypto_provider_by_address(address)?;

    println!("✓ Address {} belongs to {}", address, provider.metadata().name);
    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

fn cmd_delete(config: &WalletConfig, uid: &str) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;
    wallet.delete_provider(uid)?;

    println!("✓ Provider {} deleted", uid);
    Ok(())
}

// ─── Sign / Verify ───────────────────────────────────────────────────────────

fn cmd_sign(config: &WalletConfig, uid: &str, message: &str) -> Result<(), WalletError> {
    let wallet = open_wallet(config)?;
    let provider = wallet.get_crypto_provider(uid)?;

    let signature = provider
        .signer()
        .sign(message.as_bytes(), &SignerOptions::default())?;

    println!("{}", signature.to_hex());
    Ok(())
}

fn cmd_verify(
    config: &WalletConfig,
    uid: &str,
    message: &str,
    signature: &str,
) -> Result<(), WalletError> {
    let signature = Signature::from_hex(signature)?;
    let wallet = open_wallet(config)?;
    let provider = wallet.get_crypto_provider(uid)?;

    let valid = provider
        .verifier()
        .verify(&signature, message.as_bytes(), &VerifierOptions::default())?;

    if !valid {
        return Err(WalletError::Other("signature is not valid".to_string()));
    }

    println!("✓ Signature valid");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn build_registry(config: &WalletConfig) -> Result<Arc<FactoryRegistry>, WalletError> {
    let registry = Arc::new(FactoryRegistry::new(config.registration_policy));
    register_builtin_factories(&registry, &config.key_dir())?;
    Ok(registry)
}

/// Open the wallet on the configured keyring. Piped stdin answers the
/// passphrase prompt.
fn open_wallet(config: &WalletConfig) -> Result<KeyringWallet, WalletError> {
    let registry = build_registry(config)?;
    KeyringWallet::open(
        config,
        registry,
        Box::new(Sha256AddressFormatter::new()),
        io::stdin().lock(),
    )
}

fn read_file(path: &Path) -> Result<String, WalletError> {
    fs::read_to_string(path).map_err(|e| {
        WalletError::Other(format!("Failed to read {}: {}", path.display(), e))
    })
}
