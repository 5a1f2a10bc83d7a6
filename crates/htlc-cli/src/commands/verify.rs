//! `htlc verify` — Check a secret against a published hash lock.

use clap::Args;
use htlc_core::Commitment;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Hash lock as 40 hex characters.
    #[arg(long)]
    pub commitment: String,

    /// Candidate secret preimage (UTF-8).
    pub secret: String,
}

pub fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let commitment = check(&args.commitment, &args.secret)?;
    println!("secret opens commitment {}", commitment);
    Ok(())
}

/// Parse `commitment` and confirm `secret` opens it.
fn check(commitment: &str, secret: &str) -> anyhow::Result<Commitment> {
    let commitment: Commitment = commitment.parse()?;

    if !commitment.matches(secret.as_bytes()) {
        anyhow::bail!("secret does not open commitment {}", commitment);
    }
    Ok(commitment)
}
