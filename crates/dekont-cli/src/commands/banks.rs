//! Banks command - list the profiles in precedence order.

use clap::Args;
use console::style;
use serde::Serialize;

use dekont_core::receipt::report::label;
use dekont_core::receipt::rules::patterns::CURRENCY_MARKERS;
use dekont_core::receipt::rules::{BankProfile, PatternRegistry};
use dekont_core::{BankId, FieldKind};

/// Arguments for the banks command.
#[derive(Args)]
pub struct BanksArgs {
    /// Print the profile table as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ProfileRow {
    position: usize,
    bank: BankId,
    name: &'static str,
    labels: Vec<(FieldKind, &'static [&'static str])>,
}

pub async fn run(args: BanksArgs) -> anyhow::Result<()> {
    let registry = PatternRegistry::global();

    if args.json {
        let rows: Vec<ProfileRow> = registry
            .iter()
            .enumerate()
            .map(|(i, profile)| ProfileRow {
                position: i + 1,
                bank: profile.bank(),
                name: profile.bank().name(),
                labels: declared_labels(profile),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (i, profile) in registry.iter().enumerate() {
        println!(
            "{}. {} ({})",
            i + 1,
            style(profile.bank().name()).bold(),
            profile.bank().code()
        );
        for (kind, labels) in declared_labels(profile) {
            println!("   {:<14} {}", label(kind), labels.join(" | "));
        }
    }

    println!();
    println!(
        "{} Amounts without a label: first number followed by {}",
        style("ℹ").blue(),
        CURRENCY_MARKERS.join(" or ")
    );

    Ok(())
}

fn declared_labels(profile: &BankProfile) -> Vec<(FieldKind, &'static [&'static str])> {
    FieldKind::REPORT_ORDER
        .into_iter()
        .filter(|kind| profile.defines(*kind))
        .map(|kind| (kind, profile.labels(kind)))
        .collect()
}
