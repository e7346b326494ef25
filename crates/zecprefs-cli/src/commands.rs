//! Command handlers. Each one renders its output as a string so it can be tested
//! without capturing stdout.

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use std::process::ExitCode;
use zecprefs_core::explorer::is_valid_txid;
use zecprefs_core::{
    DECIMAL_PLACES, PreferenceStore, Settings, TXID_STATUS_MESSAGE, parse_user_string,
};

use crate::{Command, ExplorerTarget};

/// Run a command, print its output and pick the exit code.
pub fn run<S: PreferenceStore>(settings: &mut Settings<S>, command: Command) -> Result<ExitCode> {
    let (output, ok) = render(settings, command)?;
    println!("{}", output);
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Returns the text to print and whether the command succeeded.
fn render<S: PreferenceStore>(
    settings: &mut Settings<S>,
    command: Command,
) -> Result<(String, bool)> {
    match command {
        Command::Validate { address } => {
            let kind = settings.classify_address(&address);
            Ok((
                format!("{} ({})", kind.label(), settings.network()),
                kind.is_valid(),
            ))
        }
        Command::ParseUri { uri } => {
            let parsed = settings
                .parse_payment_uri(&uri)
                .wrap_err("Could not parse payment URI")?;
            Ok((settings.payment_uri_pretty(&parsed), true))
        }
        Command::Format { amount } => Ok((settings.zec_usd_display(amount), true)),
        Command::ParseAmount { text } => {
            let zats = parse_user_string(&text, DECIMAL_PLACES)
                .wrap_err_with(|| format!("Could not parse amount '{}'", text))?;
            Ok((zats.to_string(), true))
        }
        Command::Server { set } => {
            if let Some(server) = set {
                settings.save_config(&server)?;
                tracing::info!(server = %settings.config().server, "Server updated");
            }
            Ok((settings.config().server.clone(), true))
        }
        Command::Options {
            check_updates,
            fetch_prices,
            theme,
        } => {
            if let Some(allow) = check_updates {
                settings.set_check_for_updates(allow)?;
            }
            if let Some(allow) = fetch_prices {
                settings.set_allow_fetch_prices(allow)?;
            }
            if let Some(theme) = theme {
                settings.set_theme_name(&theme)?;
            }
            Ok((options_summary(settings)?, true))
        }
        Command::Explorer { target } => match target {
            ExplorerTarget::Address { address } => {
                if !settings.is_valid_address(&address) {
                    tracing::warn!(%address, "Address does not look valid on this network");
                }
                Ok((settings.address_explorer_url(&address), true))
            }
            ExplorerTarget::Tx { txid } => {
                if !is_valid_txid(&txid) {
                    tracing::warn!(%txid, "Transaction id is not 64 hex characters");
                }
                Ok((settings.tx_explorer_url(&txid), true))
            }
        },
        Command::Info => Ok((info_summary(settings)?, true)),
    }
}

fn options_summary<S: PreferenceStore>(settings: &Settings<S>) -> Result<String> {
    Ok(format!(
        "check-updates: {}\nfetch-prices: {}\ntheme: {}",
        settings.check_for_updates()?,
        settings.allow_fetch_prices()?,
        settings.theme_name()?.as_deref().unwrap_or("(default)")
    ))
}

fn info_summary<S: PreferenceStore>(settings: &Settings<S>) -> Result<String> {
    let mut lines = vec![
        format!("network: {}", settings.network()),
        format!("token: {}", settings.token_name()),
        format!("server: {}", settings.config().server),
        format!("miner fee: {}", settings.zec_display(settings.miner_fee())),
        format!("donation address: {}", settings.donation_address()),
        format!(
            "sapling active: {} (height {})",
            settings.is_sapling_active(),
            settings.block_height()
        ),
    ];
    if let Some(usd) = settings.usd_display(100_000_000) {
        lines.push(format!("price: {}", usd));
    }
    lines.push(options_summary(settings)?);
    lines.push(format!("tx status prefix: {}", TXID_STATUS_MESSAGE));
    Ok(lines.join("\n"))
}
