//! Node-link graph of a single transaction
//!
//! The graph is bipartite: one transaction node in the middle, address nodes
//! on either side. Input edges point address -> tx, output edges tx -> address.
//! An address that both funds and receives (typical change) is a single node
//! carrying both totals.

use crate::core::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ADDRESS_LABEL_MAX: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Tx {
        txid: String,
        fee_sats: u64,
    },
    Address {
        address: String,
        /// Value received by this address from the transaction
        total_in: u64,
        /// Value this address contributed to the transaction
        total_out: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub value_sats: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

pub fn tx_node_id(txid: &str) -> String {
    format!("tx:{txid}")
}

pub fn address_node_id(address: &str) -> String {
    format!("addr:{address}")
}

fn tx_label(txid: &str) -> String {
    let prefix: String = txid.chars().take(8).collect();
    format!("TX: {prefix}...")
}

fn address_label(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= ADDRESS_LABEL_MAX {
        return address.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{head}...{tail}")
}

// Insertion-ordered address nodes keyed by node id
struct AddressNodes {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
}

impl AddressNodes {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn get_or_create(&mut self, address: &str) -> &mut GraphNode {
        let id = address_node_id(address);
        let existing = self.index.get(&id).copied();
        let position = match existing {
            Some(position) => position,
            None => {
                self.nodes.push(GraphNode {
                    id: id.clone(),
                    label: address_label(address),
                    kind: NodeKind::Address {
                        address: address.to_string(),
                        total_in: 0,
                        total_out: 0,
                    },
                });
                self.index.insert(id, self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[position]
    }
}

/// Build the transaction graph
pub fn build_graph(tx: &Transaction) -> GraphData {
    let tx_id = tx_node_id(&tx.txid);
    let mut address_nodes = AddressNodes::new();
    let mut edges = Vec::with_capacity(tx.vin.len() + tx.vout.len());

    for (index, input) in tx.vin.iter().enumerate() {
        let address = input
            .address()
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown Input {index}"));
        let value = input.value_sats();

        let node = address_nodes.get_or_create(&address);
        if let NodeKind::Address { total_out, .. } = &mut node.kind {
            *total_out += value;
        }

        edges.push(GraphEdge {
            id: format!("edge-input-{index}"),
            source: node.id.clone(),
            target: tx_id.clone(),
            kind: EdgeKind::Input,
            value_sats: value,
        });
    }

    for (index, output) in tx.vout.iter().enumerate() {
        let address = output
            .address()
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown Output {index}"));

        let node = address_nodes.get_or_create(&address);
        if let NodeKind::Address { total_in, .. } = &mut node.kind {
            *total_in += output.value_sats;
        }

        edges.push(GraphEdge {
            id: format!("edge-output-{index}"),
            source: tx_id.clone(),
            target: node.id.clone(),
            kind: EdgeKind::Output,
            value_sats: output.value_sats,
        });
    }

    let mut nodes = Vec::with_capacity(address_nodes.nodes.len() + 1);
    nodes.push(GraphNode {
        id: tx_id,
        label: tx_label(&tx.txid),
        kind: NodeKind::Tx {
            txid: tx.txid.clone(),
            fee_sats: tx.fee_sats,
        },
    });
    nodes.extend(address_nodes.nodes);

    GraphData { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{simple_transaction, transaction_with, SAMPLE_TXID};
    use std::collections::HashSet;

    #[test]
    fn test_simple_graph_shape() {
        let graph = build_graph(&simple_transaction(100_000, 100_000));

        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.nodes.len(), 3);
        let tx_nodes = graph
            .nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Tx { .. }))
            .count();
        assert_eq!(tx_nodes, 1);

        let input = &graph.edges[0];
        assert_eq!(input.id, "edge-input-0");
        assert_eq!(input.source, "addr:bc1qsender");
        assert_eq!(input.target, format!("tx:{SAMPLE_TXID}"));
        assert_eq!(input.kind, EdgeKind::Input);

        let output = &graph.edges[1];
        assert_eq!(output.id, "edge-output-0");
        assert_eq!(output.source, format!("tx:{SAMPLE_TXID}"));
        assert_eq!(output.target, "addr:bc1qrecipient");
        assert_eq!(output.kind, EdgeKind::Output);
    }

    #[test]
    fn test_change_address_is_one_node_with_both_totals() {
        let tx = transaction_with(
            &[(Some("bc1qme"), 60_000), (Some("bc1qme"), 40_000)],
            &[(Some("bc1qshop"), 70_000), (Some("bc1qme"), 29_000)],
        );
        let graph = build_graph(&tx);

        assert_eq!(graph.edges.len(), 4);
        assert_eq!(graph.nodes.len(), 3);

        let ids: HashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len());

        match &graph.node("addr:bc1qme").unwrap().kind {
            NodeKind::Address {
                total_in,
                total_out,
                ..
            } => {
                assert_eq!(*total_out, 100_000);
                assert_eq!(*total_in, 29_000);
            }
            NodeKind::Tx { .. } => panic!("expected address node"),
        }
    }

    #[test]
    fn test_unknown_addresses_get_positional_fallbacks() {
        let tx = transaction_with(&[(None, 5_000)], &[(None, 1_000), (None, 3_000)]);
        let graph = build_graph(&tx);

        assert!(graph.node("addr:Unknown Input 0").is_some());
        assert!(graph.node("addr:Unknown Output 0").is_some());
        assert!(graph.node("addr:Unknown Output 1").is_some());
        assert_eq!(graph.nodes.len(), 4);
    }

    #[test]
    fn test_empty_addresses_fall_back_like_missing_ones() {
        let tx = transaction_with(&[(Some(""), 5_000)], &[(Some(""), 1_000), (Some(""), 3_000)]);
        let graph = build_graph(&tx);

        assert!(graph.node("addr:").is_none());
        assert!(graph.node("addr:Unknown Input 0").is_some());
        assert!(graph.node("addr:Unknown Output 0").is_some());
        assert!(graph.node("addr:Unknown Output 1").is_some());
        assert_eq!(graph.nodes.len(), 4);
    }

    #[test]
    fn test_tx_node_carries_fee_and_short_label() {
        let graph = build_graph(&simple_transaction(10_000, 9_000));
        let tx_node = &graph.nodes[0];

        assert_eq!(tx_node.label, "TX: 4a5e1e4b...");
        assert_eq!(
            tx_node.kind,
            NodeKind::Tx {
                txid: SAMPLE_TXID.to_string(),
                fee_sats: 1_000
            }
        );
    }

    #[test]
    fn test_long_address_labels_are_shortened() {
        assert_eq!(address_label("bc1qshort"), "bc1qshort");
        assert_eq!(
            address_label("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"),
            "bc1qar0srr...zzwf5mdq"
        );
    }
}
