use crate::core::transaction::Utxo;
use serde::Serialize;

/// A ready-made playground wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub utxos: Vec<Utxo>,
}

impl Scenario {
    pub fn total_sats(&self) -> u64 {
        self.utxos.iter().map(|u| u.value_sats).sum()
    }
}

fn wallet(address: &str, coins: &[(&str, u32, u64)]) -> Vec<Utxo> {
    coins
        .iter()
        .map(|(txid, vout, value)| Utxo::new(txid, *vout, address, *value))
        .collect()
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "small",
            name: "Small Wallet",
            description: "A wallet with a few small UTXOs. Good for learning basic transactions.",
            utxos: wallet(
                "bc1qwallet1",
                &[
                    ("abc123...", 0, 10_000_000),
                    ("def456...", 1, 5_000_000),
                    ("ghi789...", 0, 2_500_000),
                ],
            ),
        },
        Scenario {
            id: "medium",
            name: "Medium Wallet",
            description: "A wallet with medium-sized UTXOs. Common for regular users.",
            utxos: wallet(
                "bc1qwallet2",
                &[
                    ("jkl012...", 0, 50_000_000),
                    ("mno345...", 1, 25_000_000),
                    ("pqr678...", 0, 10_000_000),
                    ("stu901...", 2, 5_000_000),
                ],
            ),
        },
        Scenario {
            id: "large",
            name: "Large Wallet",
            description: "A wallet with larger UTXOs. Demonstrates how to handle bigger amounts.",
            utxos: wallet(
                "bc1qwallet3",
                &[("vwx234...", 0, 100_000_000), ("yza567...", 1, 50_000_000)],
            ),
        },
        Scenario {
            id: "many-small",
            name: "Many Small UTXOs",
            description: "A wallet with many small UTXOs. Shows the importance of UTXO consolidation.",
            utxos: (0..10)
                .map(|i| Utxo::new(&format!("many{i}..."), i, "bc1qwallet4", 1_000_000))
                .collect(),
        },
    ]
}

pub fn find_scenario(id: &str) -> Option<Scenario> {
    scenarios().into_iter().find(|s| s.id == id)
}
