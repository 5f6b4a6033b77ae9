//! Plain-text rendering of polls and receipts for the terminal.

use std::fmt::Write;

use verdict_client::{leading_options, option_stats, SelectionState};
use verdict_types::{LedgerReceipt, Poll, ServiceHealth, WalletAddress};
use verdict_utils::format_created_date;

pub fn poll(poll: &Poll, selection: &SelectionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", poll.id, poll.question);

    let creator = WalletAddress::parse(&poll.creator_address)
        .map(|a| a.truncated())
        .unwrap_or_else(|_| "unknown".to_string());
    let _ = writeln!(
        out,
        "    {} by {}, {} vote{}",
        format_created_date(&poll.created_at),
        creator,
        poll.total_votes,
        if poll.total_votes == 1 { "" } else { "s" }
    );

    let leaders = leading_options(poll);
    for row in option_stats(poll) {
        let marker = if selection.is_selected(poll.id, row.index) {
            '>'
        } else if leaders.contains(&row.index) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, "  {marker} [{}] {}  {}", row.index, row.label, row.tally());
    }
    out
}

pub fn polls(polls: &[Poll], selection: &SelectionState) -> String {
    if polls.is_empty() {
        return "No polls yet.\n".to_string();
    }
    polls
        .iter()
        .map(|p| poll(p, selection))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn receipt(receipt: &LedgerReceipt) -> String {
    let mut out = String::new();
    if let Some(tx_id) = &receipt.tx_id {
        let _ = writeln!(out, "    tx: {tx_id}");
    }
    if let Some(address) = &receipt.address {
        let _ = writeln!(out, "    account: {address}");
    }
    if let Some(status) = receipt.status {
        let _ = writeln!(out, "    status: {status:?}");
    }
    if let Some(url) = &receipt.explorer_url {
        let _ = writeln!(out, "    explorer: {url}");
    }
    out
}

pub fn health(health: &ServiceHealth) -> String {
    let flag = |up: bool| if up { "up" } else { "down" };
    format!(
        "{}\n    database: {} ({})\n    blockchain: {} ({})\n    contract: {}\n",
        health.message,
        health.database,
        flag(health.database_connected()),
        health.blockchain,
        flag(health.blockchain_connected()),
        health.smart_contract,
    )
}
