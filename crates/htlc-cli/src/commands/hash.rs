//! `htlc hash` — Print the hash lock for a secret.

use clap::Args;
use htlc_core::Commitment;

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Secret preimage (UTF-8).
    pub secret: String,
}

pub fn run(args: &HashArgs) -> anyhow::Result<()> {
    println!("{}", hash_lock(&args.secret));
    Ok(())
}

fn hash_lock(secret: &str) -> Commitment {
    Commitment::from_secret(secret.as_bytes())
}
