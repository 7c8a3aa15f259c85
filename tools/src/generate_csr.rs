// Licensed under the Apache-2.0 license

use clap::Parser;
use crypto::{Crypto, RustCryptoImpl};
use csr::{build_csr, PublicKeyInput};
use log::info;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::PathBuf;

/// Generates a PKCS#10 certificate signing request for a P-256 key pair and
/// prints it to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subject CommonName.
    #[arg(long)]
    common_name: String,

    /// SubjectPublicKeyInfo of the key, PEM or DER.
    #[arg(long)]
    public_key: PathBuf,

    /// PKCS#8 or SEC1 PEM private key matching --public-key.
    #[arg(long)]
    private_key: PathBuf,

    /// DNS name for the subjectAltName extension. May be repeated.
    #[arg(long = "dns-name")]
    dns_names: Vec<String>,

    /// Print a PEM CERTIFICATE REQUEST instead of base64url DER.
    #[arg(long)]
    pem: bool,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let public_key = fs::read(&args.public_key)?;
    let private_key = fs::read_to_string(&args.private_key)?;

    let mut crypto = RustCryptoImpl::new();
    let private_key = crypto.import_private_key(&private_key).map_err(|err| {
        Error::new(
            ErrorKind::InvalidData,
            format!("{err} while reading {}", args.private_key.display()),
        )
    })?;

    let csr = build_csr(
        &mut crypto,
        &args.common_name,
        &PublicKeyInput::detect(&public_key),
        &private_key,
        &args.dns_names,
    )
    .map_err(|err| Error::new(ErrorKind::Other, err.to_string()))?;
    info!("generated {} byte CSR for {}", csr.as_der().len(), args.common_name);

    if args.pem {
        print!("{}", csr.to_pem());
    } else {
        println!("{}", csr.to_base64url());
    }

    Ok(())
}
