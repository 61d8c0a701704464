//! Plain-text rendering for the command line
//!
//! Every function here returns a `String` so the layouts can be tested
//! without capturing stdout.

use crate::content::tour::{Chapter, HighlightTable, QuizQuestion, QuizResult};
use crate::content::{GlossaryEntry, Scenario, Segment};
use crate::core::graph::{EdgeKind, GraphData, NodeKind};
use crate::core::monetary::conversions::{
    format_number, format_sats, format_timestamp, sats_to_btc_string,
};
use crate::core::normalize::{normalize_transaction, verify_fee, FeeCheck};
use crate::core::simulation::SimulatedTransaction;
use crate::core::transaction::{AddressSummary, Transaction, TxStatus};
use crate::utils::redact::{address_label, redact_address, AddressRole};
use std::collections::HashMap;

const UNKNOWN_ADDRESS: &str = "(unknown)";

/// Role labels for every address in a transaction
///
/// Distinct input addresses are lettered senders. An output paying back to a
/// sender is change; the remaining outputs are numbered recipients.
pub fn address_labels(tx: &Transaction) -> HashMap<String, String> {
    let mut labels = HashMap::new();

    let mut senders = 0;
    for address in tx.vin.iter().filter_map(|input| input.address()) {
        if !labels.contains_key(address) {
            labels.insert(
                address.to_string(),
                address_label(AddressRole::Sender, senders),
            );
            senders += 1;
        }
    }

    let mut recipients = 0;
    for address in tx.vout.iter().filter_map(|output| output.address()) {
        if labels.contains_key(address) {
            if tx.vin.iter().any(|input| input.address() == Some(address)) {
                labels.insert(address.to_string(), address_label(AddressRole::Change, 0));
            }
            continue;
        }
        labels.insert(
            address.to_string(),
            address_label(AddressRole::Recipient, recipients),
        );
        recipients += 1;
    }
    labels
}

fn display_address(
    address: Option<&str>,
    labels: &HashMap<String, String>,
    redact: bool,
) -> String {
    match address {
        Some(address) => redact_address(
            address,
            !redact,
            labels.get(address).map(String::as_str),
        ),
        None => UNKNOWN_ADDRESS.to_string(),
    }
}

fn status_line(status: &TxStatus) -> String {
    match status {
        TxStatus::Unconfirmed => "Unconfirmed (in mempool)".to_string(),
        TxStatus::Confirmed {
            block_height,
            block_time,
            ..
        } => format!(
            "Confirmed in block {} ({})",
            format_number(*block_height as i64),
            format_timestamp(*block_time)
        ),
    }
}

fn fee_check_line(check: &FeeCheck) -> String {
    match check {
        FeeCheck::Consistent => "Fee check: inputs - outputs matches the reported fee".to_string(),
        FeeCheck::Mismatch {
            calculated,
            reported,
        } => format!(
            "Fee check: MISMATCH, calculated {} but provider reported {}",
            format_sats(*calculated),
            format_sats(*reported)
        ),
        FeeCheck::Negative { calculated } => format!(
            "Fee check: outputs exceed inputs by {}",
            format_sats(calculated.saturating_neg())
        ),
    }
}

pub fn render_transaction(tx: &Transaction, redact: bool) -> String {
    let normalized = normalize_transaction(tx);
    let labels = address_labels(tx);

    let mut lines = vec![
        format!("Transaction {}", tx.txid),
        format!("Status: {}", status_line(&tx.status)),
    ];
    if let Some(size) = tx.size_vbytes {
        lines.push(format!("Size: {} vB", format_number(size as i64)));
    }

    lines.push(String::new());
    lines.push(format!("Inputs ({})", tx.get_vin().len()));
    lines.extend(tx.get_vin().iter().enumerate().map(|(index, input)| {
        format!(
            "  #{index:<3} {:<44} {:>24}",
            display_address(input.address(), &labels, redact),
            format_sats(input.value_sats() as i64)
        )
    }));

    lines.push(String::new());
    lines.push(format!("Outputs ({})", tx.get_vout().len()));
    lines.extend(tx.get_vout().iter().map(|output| {
        format!(
            "  #{:<3} {:<44} {:>24}",
            output.n,
            display_address(output.address(), &labels, redact),
            format_sats(output.value_sats as i64)
        )
    }));

    lines.push(String::new());
    lines.push(format!(
        "Total in:  {} ({})",
        format_sats(normalized.inputs_total_sats as i64),
        sats_to_btc_string(normalized.inputs_total_sats as i64)
    ));
    lines.push(format!(
        "Total out: {} ({})",
        format_sats(normalized.outputs_total_sats as i64),
        sats_to_btc_string(normalized.outputs_total_sats as i64)
    ));
    lines.push(format!("Fee:       {}", format_sats(normalized.fee_sats)));
    lines.push(fee_check_line(&verify_fee(&normalized, tx.fee_sats as i64)));
    lines.join("\n")
}

pub fn render_graph(graph: &GraphData) -> String {
    let mut lines = vec!["Graph".to_string()];
    for node in &graph.nodes {
        let detail = match &node.kind {
            NodeKind::Tx { fee_sats, .. } => format!("fee {}", format_sats(*fee_sats as i64)),
            NodeKind::Address {
                total_in,
                total_out,
                ..
            } => format!(
                "sent {}, received {}",
                format_sats(*total_out as i64),
                format_sats(*total_in as i64)
            ),
        };
        lines.push(format!("  [{}] {}: {detail}", node.id, node.label));
    }
    for edge in &graph.edges {
        let arrow = match edge.kind {
            EdgeKind::Input => "input",
            EdgeKind::Output => "output",
        };
        lines.push(format!(
            "  {} -> {} ({arrow}, {})",
            edge.source,
            edge.target,
            format_sats(edge.value_sats as i64)
        ));
    }
    lines.join("\n")
}

pub fn render_address(summary: &AddressSummary, transactions: &[Transaction]) -> String {
    let balance = summary
        .balance_sats
        .map(|sats| {
            format!(
                "{} ({})",
                format_sats(sats as i64),
                sats_to_btc_string(sats as i64)
            )
        })
        .unwrap_or_else(|| "unknown".to_string());
    let tx_count = summary
        .tx_count
        .map(|count| format_number(count as i64))
        .unwrap_or_else(|| "unknown".to_string());

    let mut lines = vec![
        format!("Address {}", summary.address),
        format!("Balance: {balance}"),
        format!("Transactions: {tx_count}"),
    ];
    if transactions.is_empty() {
        lines.push("No recent transactions".to_string());
    }
    for tx in transactions {
        let state = if tx.status.is_confirmed() {
            "confirmed"
        } else {
            "unconfirmed"
        };
        lines.push(format!(
            "  {} {:>11} fee {}",
            tx.txid,
            state,
            format_sats(tx.fee_sats as i64)
        ));
    }
    lines.join("\n")
}

pub fn render_simulation(sim: &SimulatedTransaction) -> String {
    if !sim.can_send {
        let reason = sim
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Transaction cannot be built".to_string());
        return format!("Cannot send: {reason}");
    }

    let mut lines = vec![format!("Selected {} UTXO(s)", sim.selected.len())];
    lines.extend(sim.selected.iter().map(|utxo| {
        format!(
            "  {}:{} {:>24}",
            utxo.txid,
            utxo.vout,
            format_sats(utxo.value_sats as i64)
        )
    }));
    lines.push(format!("Fee:    {}", format_sats(sim.fee_sats as i64)));
    lines.push(format!("Change: {}", format_sats(sim.change_sats as i64)));
    lines.push(String::new());
    lines.push(render_transaction(&sim.tx, false));
    lines.join("\n")
}

pub fn render_scenarios(scenarios: &[Scenario]) -> String {
    scenarios
        .iter()
        .map(|s| {
            format!(
                "{:<11} {:<17} {:>2} UTXOs {:>16}  {}",
                s.id,
                s.name,
                s.utxos.len(),
                sats_to_btc_string(s.total_sats() as i64),
                s.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_glossary(entries: &[&GlossaryEntry]) -> String {
    if entries.is_empty() {
        return "No matching glossary terms".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} [{}]\n  {}",
                entry.term, entry.category, entry.definition
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text with recognized terms wrapped in brackets, e.g. "a [UTXO] is..."
pub fn render_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { content } => content.clone(),
            Segment::Term { content, .. } => format!("[{content}]"),
        })
        .collect()
}

fn highlight_line(chapter: &Chapter) -> Option<String> {
    let highlight = chapter.highlight?;
    let mut parts = Vec::new();
    if let Some(table) = highlight.table {
        let table = match table {
            HighlightTable::Inputs => "inputs",
            HighlightTable::Outputs => "outputs",
        };
        let rows: Vec<String> = highlight.rows.iter().map(|row| format!("#{row}")).collect();
        parts.push(format!("{table} {}", rows.join(", ")));
    }
    if !highlight.graph_nodes.is_empty() {
        parts.push(format!("graph {}", highlight.graph_nodes.join(", ")));
    }
    Some(format!("Look at: {}", parts.join("; ")))
}

/// One chapter with its position, e.g. "Chapter 5/13: Transaction Fees"
pub fn render_chapter(index: usize, total: usize, chapter: &Chapter) -> String {
    let mut lines = vec![
        format!("Chapter {}/{total}: {}", index + 1, chapter.title),
        String::new(),
        chapter.body.to_string(),
    ];
    if let Some(line) = highlight_line(chapter) {
        lines.push(String::new());
        lines.push(line);
    }
    lines.join("\n")
}

pub fn render_chapter_list(chapters: &[Chapter]) -> String {
    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| format!("{:>2}. {:<16} {}", index + 1, chapter.id, chapter.title))
        .collect::<Vec<_>>()
        .join("\n")
}

fn option_letter(index: usize) -> char {
    char::from(b'a' + (index % 26) as u8)
}

pub fn render_question(number: usize, total: usize, question: &QuizQuestion) -> String {
    let mut lines = vec![format!("Question {number}/{total}: {}", question.question)];
    lines.extend(
        question
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| format!("  {}) {option}", option_letter(index))),
    );
    lines.join("\n")
}

pub fn render_answer_feedback(question: &QuizQuestion, correct: bool) -> String {
    let verdict = if correct {
        "Correct!".to_string()
    } else {
        format!(
            "Not quite. The answer is {}) {}",
            option_letter(question.correct_answer),
            question.options[question.correct_answer]
        )
    };
    format!("{verdict}\n  {}", question.explanation)
}

pub fn render_quiz_result(result: &QuizResult) -> String {
    format!(
        "Score: {}/{} ({}%)\n{}",
        result.score,
        result.total,
        result.percentage,
        result.verdict()
    )
}
