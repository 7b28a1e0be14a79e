//! `status`: gateway session health.

use anyhow::{Context, Result};
use clap::Args;
use options_tracker_core::{AuthStatus, TrackerConfig};

use super::connect;

#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Ask the gateway to re-establish the brokerage session first
    #[arg(long)]
    pub reauth: bool,
}

pub async fn run_status(args: StatusArgs, config: TrackerConfig) -> Result<()> {
    let gateway = connect(&config)?;

    if args.reauth {
        gateway
            .reauthenticate()
            .await
            .context("Reauthentication request failed")?;
        tracing::info!("Reauthentication requested");
    }

    gateway.tickle().await.context("Session keepalive failed")?;
    let status = gateway
        .auth_status()
        .await
        .context("Failed to read session status")?;
    println!("{}", describe(&status));

    if status.authenticated {
        let account_id = gateway
            .account_id()
            .await
            .context("Failed to resolve account")?;
        println!("Account: {account_id}");
    }
    Ok(())
}

fn describe(status: &AuthStatus) -> String {
    let session = match (status.connected, status.authenticated) {
        (false, _) => "disconnected",
        (true, false) => "connected, not authenticated",
        (true, true) => "authenticated",
    };
    if status.competing {
        format!("Session: {session} (competing session detected)")
    } else {
        format!("Session: {session}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_session_states() {
        assert_eq!(describe(&AuthStatus::default()), "Session: disconnected");
        assert_eq!(
            describe(&AuthStatus {
                authenticated: true,
                connected: true,
                competing: false,
            }),
            "Session: authenticated"
        );
        assert_eq!(
            describe(&AuthStatus {
                authenticated: false,
                connected: true,
                competing: true,
            }),
            "Session: connected, not authenticated (competing session detected)"
        );
    }
}
