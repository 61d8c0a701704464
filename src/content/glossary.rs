//! Glossary of Bitcoin terms
//!
//! The table is static. [`auto_link`] splits free text into plain runs and
//! recognized terms so that a front end (or the CLI) can decorate them.

use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlossaryEntry {
    pub key: &'static str,
    pub term: &'static str,
    pub definition: &'static str,
    pub category: &'static str,
}

const fn entry(
    key: &'static str,
    term: &'static str,
    category: &'static str,
    definition: &'static str,
) -> GlossaryEntry {
    GlossaryEntry {
        key,
        term,
        definition,
        category,
    }
}

static GLOSSARY: &[GlossaryEntry] = &[
    entry("bitcoin", "Bitcoin", "basics",
        "A decentralized digital currency whose ledger is maintained by a peer-to-peer network instead of a bank."),
    entry("blockchain", "Blockchain", "basics",
        "The append-only chain of blocks that records every confirmed Bitcoin transaction."),
    entry("block", "Block", "basics",
        "A batch of transactions added to the blockchain by a miner, roughly every ten minutes."),
    entry("satoshi", "Satoshi", "units",
        "The smallest unit of bitcoin. One bitcoin is 100,000,000 satoshis (sats)."),
    entry("address", "Address", "basics",
        "A string that identifies where bitcoin can be sent, derived from a locking script."),
    entry("wallet", "Wallet", "basics",
        "Software that keeps private keys and tracks the UTXOs those keys can spend."),
    entry("private-key", "Private Key", "security",
        "A secret number that proves ownership of coins by producing signatures. Never share it."),
    entry("transaction", "Transaction", "transactions",
        "A transfer of value that spends existing outputs and creates new ones."),
    entry("txid", "Transaction ID", "transactions",
        "A 64-character hexadecimal hash that uniquely identifies a transaction."),
    entry("utxo", "UTXO", "transactions",
        "Unspent Transaction Output: a chunk of bitcoin that has been received and not yet spent."),
    entry("input", "Input", "transactions",
        "A reference to a previous output that a transaction spends in full."),
    entry("output", "Output", "transactions",
        "A new amount of bitcoin locked to an address by a transaction."),
    entry("change", "Change Output", "transactions",
        "The output that sends leftover value back to the sender when the inputs exceed the payment plus fee."),
    entry("fee", "Fee", "fees",
        "The difference between a transaction's inputs and outputs, collected by the miner who confirms it."),
    entry("fee-rate", "Fee Rate", "fees",
        "The fee divided by the transaction size, usually quoted in satoshis per virtual byte (sat/vB)."),
    entry("vbyte", "Virtual Byte", "fees",
        "A unit of transaction size that discounts witness data. Fees are priced per vbyte."),
    entry("weight", "Weight", "fees",
        "A transaction size measure in weight units; one virtual byte equals four weight units."),
    entry("mempool", "Mempool", "network",
        "The waiting area of unconfirmed transactions that nodes hold until a miner includes them in a block."),
    entry("confirmation", "Confirmation", "network",
        "Each block mined on top of the block containing a transaction adds one confirmation."),
    entry("coinbase", "Coinbase Transaction", "mining",
        "The first transaction of a block, which creates new bitcoin for the miner and has no real inputs."),
    entry("coin-selection", "Coin Selection", "transactions",
        "The process of choosing which UTXOs a wallet spends to cover a payment and its fee."),
    entry("dust", "Dust", "fees",
        "An output so small that spending it would cost more in fees than it is worth."),
    entry("segwit", "SegWit", "technical",
        "Segregated Witness: an upgrade that moves signature data outside the legacy transaction structure."),
    entry("bech32", "Bech32", "technical",
        "The address format used by native SegWit addresses, starting with bc1."),
];

/// A run of text produced by [`auto_link`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { content: String },
    Term { key: String, content: String },
}

// Terms lowercased, longest first so "Fee Rate" wins over "Fee"
static TERMS_LONGEST_FIRST: Lazy<Vec<(&'static str, String)>> = Lazy::new(|| {
    let mut terms: Vec<(&'static str, String)> = GLOSSARY
        .iter()
        .map(|entry| (entry.key, entry.term.to_ascii_lowercase()))
        .collect();
    terms.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    terms
});

pub fn glossary() -> &'static [GlossaryEntry] {
    GLOSSARY
}

pub fn glossary_entry(key: &str) -> Option<&'static GlossaryEntry> {
    GLOSSARY
        .iter()
        .find(|entry| entry.key.eq_ignore_ascii_case(key))
}

/// Entries whose key, term or definition contains `query`, ignoring case
///
/// A blank query returns the whole glossary.
pub fn search_glossary(query: &str) -> Vec<&'static GlossaryEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return GLOSSARY.iter().collect();
    }
    GLOSSARY
        .iter()
        .filter(|entry| {
            entry.key.to_lowercase().contains(&query)
                || entry.term.to_lowercase().contains(&query)
                || entry.definition.to_lowercase().contains(&query)
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// Length in bytes of the term matching at `start`, if any
fn match_at(text: &str, start: usize) -> Option<(&'static str, usize)> {
    let preceded_by_word = text[..start].chars().next_back().is_some_and(is_word_char);
    if preceded_by_word {
        return None;
    }
    let rest = text[start..].as_bytes();
    TERMS_LONGEST_FIRST.iter().find_map(|(key, term)| {
        let len = term.len();
        if rest.len() < len || !rest[..len].eq_ignore_ascii_case(term.as_bytes()) {
            return None;
        }
        // Terms are ASCII, so start + len is a char boundary
        let followed_by_word = text[start + len..].chars().next().is_some_and(is_word_char);
        (!followed_by_word).then_some((*key, len))
    })
}

/// Split `text` into plain runs and glossary terms
///
/// Matches are case-insensitive, respect word boundaries and never overlap.
/// Scanning is left to right and the longest term wins at each position.
pub fn auto_link(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut resume_at = 0;

    for (index, _) in text.char_indices() {
        if index < resume_at {
            continue;
        }
        if let Some((key, len)) = match_at(text, index) {
            if index > plain_start {
                segments.push(Segment::Text {
                    content: text[plain_start..index].to_string(),
                });
            }
            segments.push(Segment::Term {
                key: key.to_string(),
                content: text[index..index + len].to_string(),
            });
            resume_at = index + len;
            plain_start = resume_at;
        }
    }

    if plain_start < text.len() || segments.is_empty() {
        segments.push(Segment::Text {
            content: text[plain_start..].to_string(),
        });
    }
    segments
}
