//! Guided tour through a transaction, plus the closing quiz
//!
//! Chapters are static. [`Tour`] tracks where a reader is and which chapters
//! they have finished; [`grade_quiz`] scores a full set of answers.

use crate::error::{Result, TxLensError};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightTable {
    Inputs,
    Outputs,
}

/// Part of the transaction view a chapter points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterHighlight {
    pub table: Option<HighlightTable>,
    /// Zero-based rows of `table`
    pub rows: &'static [usize],
    pub graph_nodes: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub id: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub highlight: Option<ChapterHighlight>,
}

const fn rows(table: HighlightTable, rows: &'static [usize]) -> Option<ChapterHighlight> {
    Some(ChapterHighlight {
        table: Some(table),
        rows,
        graph_nodes: &[],
    })
}

const fn graph(nodes: &'static [&'static str]) -> Option<ChapterHighlight> {
    Some(ChapterHighlight {
        table: None,
        rows: &[],
        graph_nodes: nodes,
    })
}

static CHAPTERS: &[Chapter] = &[
    Chapter {
        id: "intro",
        title: "Introduction to Bitcoin Transactions",
        body: "A Bitcoin transaction moves value from one or more addresses to one or more other addresses. \
               It consumes inputs (UTXOs) and creates new outputs. Whatever the inputs hold beyond the outputs is the fee paid to miners.",
        highlight: None,
    },
    Chapter {
        id: "inputs",
        title: "Understanding Inputs",
        body: "Inputs point at outputs of earlier transactions (UTXOs) that are now being spent. \
               A UTXO is always consumed whole; it cannot be partially spent, which is why change outputs exist.",
        highlight: rows(HighlightTable::Inputs, &[0, 1]),
    },
    Chapter {
        id: "outputs",
        title: "Understanding Outputs",
        body: "Outputs are the new UTXOs a transaction creates. Each one carries an amount in satoshis and an address. \
               They become spendable once the transaction confirms, and one transaction can pay many recipients at once.",
        highlight: rows(HighlightTable::Outputs, &[0, 1, 2]),
    },
    Chapter {
        id: "change",
        title: "Change Outputs",
        body: "Because UTXOs are spent in full, sending less than the inputs hold means the difference comes back as a change output. \
               Change goes to an address the sender controls, usually a fresh one for privacy.",
        highlight: rows(HighlightTable::Outputs, &[2]),
    },
    Chapter {
        id: "fee",
        title: "Transaction Fees",
        body: "The fee is total inputs minus total outputs. Miners collect it for including the transaction in a block, \
               and higher fees usually confirm faster. Fee rates are quoted in satoshis per virtual byte (sat/vB).",
        highlight: graph(&["fee"]),
    },
    Chapter {
        id: "mempool",
        title: "The Mempool",
        body: "Unconfirmed transactions wait in the mempool until a miner puts them in a block. \
               Higher-fee transactions are usually picked first. Once mined, a transaction leaves the mempool.",
        highlight: graph(&["mempool"]),
    },
    Chapter {
        id: "confirmation",
        title: "Confirmations",
        body: "A transaction gets its first confirmation when it is included in a block, and one more with every block after that. \
               More confirmations mean more finality. Most services accept 1 to 6 depending on the amount.",
        highlight: None,
    },
    Chapter {
        id: "blockchain",
        title: "The Blockchain",
        body: "The blockchain is a distributed ledger of every Bitcoin transaction in order. Each block commits to the hash of the one before it, \
               so history cannot be rewritten quietly. Thousands of nodes keep their own copy.",
        highlight: None,
    },
    Chapter {
        id: "mining",
        title: "Mining and Block Creation",
        body: "Miners validate transactions and compete to solve a proof-of-work puzzle. The winner creates the next block and collects \
               the block reward plus fees. Difficulty adjusts every 2016 blocks to keep blocks about 10 minutes apart.",
        highlight: None,
    },
    Chapter {
        id: "mining-rewards",
        title: "Mining Rewards and Incentives",
        body: "Miners earn newly created bitcoin (the block reward) and transaction fees. The reward started at 50 BTC and halves roughly every four years, \
               so fees are expected to become the main incentive over time.",
        highlight: None,
    },
    Chapter {
        id: "bitcoin-history",
        title: "Bitcoin History",
        body: "Bitcoin was described in 2008 by the pseudonymous Satoshi Nakamoto and launched in 2009 with the genesis block. \
               In 2010 someone paid 10,000 BTC for two pizzas, the first well-known real-world purchase.",
        highlight: None,
    },
    Chapter {
        id: "supply-cap",
        title: "The 21 Million Supply Cap",
        body: "The protocol caps the supply at 21 million coins, and changing that would need network-wide consensus. \
               Around 19.7 million had been mined by 2024; the last fraction is expected around 2140.",
        highlight: None,
    },
    Chapter {
        id: "halving",
        title: "Halving Events",
        body: "Every 210,000 blocks (about four years) the block reward halves. \
               Past halvings: 2012 (50 to 25 BTC), 2016 (25 to 12.5), 2020 (12.5 to 6.25), 2024 (6.25 to 3.125).",
        highlight: None,
    },
];

pub fn chapters() -> &'static [Chapter] {
    CHAPTERS
}

/// Chapter by id (case-insensitive) or 1-based number, with its index
pub fn find_chapter(key: &str) -> Option<(usize, &'static Chapter)> {
    let key = key.trim();
    if let Ok(number) = key.parse::<usize>() {
        let index = number.checked_sub(1)?;
        return CHAPTERS.get(index).map(|chapter| (index, chapter));
    }
    CHAPTERS
        .iter()
        .enumerate()
        .find(|(_, chapter)| chapter.id.eq_ignore_ascii_case(key))
}

/// Reader position in the tour
#[derive(Debug, Clone, Default)]
pub struct Tour {
    current: usize,
    completed: HashSet<&'static str>,
}

impl Tour {
    pub fn new() -> Tour {
        Tour::default()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &'static Chapter {
        &CHAPTERS[self.current]
    }

    pub fn total(&self) -> usize {
        CHAPTERS.len()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == CHAPTERS.len()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Every chapter has been finished
    pub fn is_complete(&self) -> bool {
        self.completed.len() == CHAPTERS.len()
    }

    /// Mark the current chapter finished and move on; stays put on the last one
    pub fn next(&mut self) {
        self.completed.insert(self.current().id);
        if !self.is_last() {
            self.current += 1;
        }
    }

    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Jump to `index`. Out-of-range indices are ignored and return false.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= CHAPTERS.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.completed.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: &'static str,
    pub options: &'static [&'static str],
    /// Zero-based index into `options`
    pub correct_answer: usize,
    pub explanation: &'static str,
}

impl QuizQuestion {
    pub fn check(&self, answer: usize) -> Result<bool> {
        if answer >= self.options.len() {
            return Err(TxLensError::InvalidInput(format!(
                "Answer must be between 1 and {}",
                self.options.len()
            )));
        }
        Ok(answer == self.correct_answer)
    }
}

static QUIZ: &[QuizQuestion] = &[
    QuizQuestion {
        question: "What is a UTXO?",
        options: &[
            "A type of Bitcoin address",
            "An unspent transaction output, a discrete piece of bitcoin that can be spent",
            "A transaction fee",
            "A block in the blockchain",
        ],
        correct_answer: 1,
        explanation: "Receiving bitcoin gives you a UTXO. Spending consumes UTXOs and creates new ones.",
    },
    QuizQuestion {
        question: "Why does change happen in Bitcoin transactions?",
        options: &[
            "Change is a fee paid to miners",
            "UTXOs are spent in full, so anything above the payment and fee comes back as change",
            "Change is optional and only happens sometimes",
            "Change is lost bitcoin",
        ],
        correct_answer: 1,
        explanation: "A UTXO cannot be partially spent. The leftover goes back to an address the sender controls as a change output.",
    },
    QuizQuestion {
        question: "What are confirmations?",
        options: &[
            "The number of times a transaction is verified",
            "The block containing a transaction and each block after it, one confirmation apiece",
            "The number of addresses that approve a transaction",
            "A fee paid to confirm a transaction faster",
        ],
        correct_answer: 1,
        explanation: "Every block built on top of the one holding a transaction makes it harder to reverse.",
    },
    QuizQuestion {
        question: "How are Bitcoin transaction fees calculated?",
        options: &[
            "As a percentage of the amount being sent",
            "From the transaction size in virtual bytes, not the amount sent",
            "A fixed fee for all transactions",
            "From the number of addresses involved",
        ],
        correct_answer: 1,
        explanation: "Sending 0.001 BTC costs the same as sending 100 BTC when the transactions are the same size. Rates are quoted in sat/vB.",
    },
    QuizQuestion {
        question: "What is the mempool?",
        options: &[
            "A type of Bitcoin wallet",
            "The pool of unconfirmed transactions waiting for a block",
            "A storage location for bitcoin",
            "A type of transaction",
        ],
        correct_answer: 1,
        explanation: "Broadcast transactions enter the mempool and leave it once mined. Higher fees are usually mined first.",
    },
    QuizQuestion {
        question: "What is the blockchain?",
        options: &[
            "A type of cryptocurrency",
            "A distributed ledger recording every Bitcoin transaction in order",
            "A mining pool",
            "A Bitcoin wallet",
        ],
        correct_answer: 1,
        explanation: "Each block holds transactions and the hash of the previous block, which chains the history together.",
    },
    QuizQuestion {
        question: "What is mining?",
        options: &[
            "Creating new Bitcoin addresses",
            "Validating transactions and creating new blocks through proof-of-work",
            "Sending bitcoin to others",
            "Storing bitcoin in a wallet",
        ],
        correct_answer: 1,
        explanation: "Miners race to solve a proof-of-work puzzle. The winner earns the block reward and the fees, and the work secures the network.",
    },
];

pub fn quiz_questions() -> &'static [QuizQuestion] {
    QUIZ
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent
    pub percentage: u32,
}

impl QuizResult {
    pub fn new(score: usize, total: usize) -> QuizResult {
        let percentage = if total == 0 {
            0
        } else {
            (score as f64 / total as f64 * 100.0).round() as u32
        };
        QuizResult {
            score,
            total,
            percentage,
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.percentage >= 80 {
            "Excellent work! You understand Bitcoin transactions well."
        } else if self.percentage >= 60 {
            "Good job! Review the explanations to strengthen your understanding."
        } else {
            "Keep learning! Review the tour chapters and try again."
        }
    }
}

/// Score zero-based answers against the quiz, one per question in order
pub fn grade_quiz(answers: &[usize]) -> Result<QuizResult> {
    if answers.len() != QUIZ.len() {
        return Err(TxLensError::InvalidInput(format!(
            "Expected {} answers, got {}",
            QUIZ.len(),
            answers.len()
        )));
    }
    let mut score = 0;
    for (question, answer) in QUIZ.iter().zip(answers) {
        if question.check(*answer)? {
            score += 1;
        }
    }
    Ok(QuizResult::new(score, QUIZ.len()))
}

/// Parse answers like "2,2,1" or "b b a" into zero-based indices
pub fn parse_answers(text: &str) -> Result<Vec<usize>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(parse_answer)
        .collect()
}

/// One answer: a 1-based number or a letter (`a` is the first option)
pub fn parse_answer(text: &str) -> Result<usize> {
    let text = text.trim();
    let invalid = || TxLensError::InvalidInput(format!("Invalid answer: {text}"));

    if let Ok(number) = text.parse::<usize>() {
        return number.checked_sub(1).ok_or_else(invalid);
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Ok((letter.to_ascii_lowercase() as u8 - b'a') as usize)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_ids_are_unique() {
        let ids: HashSet<&str> = chapters().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), chapters().len());
        assert_eq!(chapters().len(), 13);
        assert_eq!(chapters()[0].id, "intro");
    }

    #[test]
    fn test_find_chapter_by_id_or_number() {
        assert_eq!(find_chapter("fee").map(|(i, _)| i), Some(4));
        assert_eq!(find_chapter("FEE").map(|(i, _)| i), Some(4));
        assert_eq!(find_chapter("1").map(|(_, c)| c.id), Some("intro"));
        assert_eq!(find_chapter("13").map(|(_, c)| c.id), Some("halving"));
        assert!(find_chapter("0").is_none());
        assert!(find_chapter("14").is_none());
        assert!(find_chapter("segwit").is_none());
    }

    #[test]
    fn test_highlights_point_at_tables_or_graph() {
        let (_, change) = find_chapter("change").unwrap();
        let highlight = change.highlight.unwrap();
        assert_eq!(highlight.table, Some(HighlightTable::Outputs));
        assert_eq!(highlight.rows, &[2]);

        let (_, fee) = find_chapter("fee").unwrap();
        assert_eq!(fee.highlight.unwrap().graph_nodes, &["fee"]);
    }

    #[test]
    fn test_tour_navigation() {
        let mut tour = Tour::new();
        assert!(tour.is_first());
        tour.prev();
        assert_eq!(tour.current_index(), 0);

        tour.next();
        assert_eq!(tour.current().id, "inputs");
        assert!(tour.is_completed("intro"));
        assert!(!tour.is_completed("inputs"));

        assert!(!tour.go_to(tour.total()));
        assert_eq!(tour.current_index(), 1);
        assert!(tour.go_to(3));
        assert_eq!(tour.current().id, "change");
        tour.prev();
        assert_eq!(tour.current().id, "outputs");
    }

    #[test]
    fn test_tour_completes_on_last_chapter() {
        let mut tour = Tour::new();
        for _ in 0..tour.total() - 1 {
            tour.next();
        }
        assert!(tour.is_last());
        assert!(!tour.is_complete());

        tour.next();
        assert!(tour.is_last());
        assert!(tour.is_complete());
        assert_eq!(tour.completed_count(), tour.total());

        tour.reset();
        assert!(tour.is_first());
        assert_eq!(tour.completed_count(), 0);
    }

    #[test]
    fn test_check_answer() {
        let question = &quiz_questions()[0];
        assert!(question.check(1).unwrap());
        assert!(!question.check(0).unwrap());
        assert!(matches!(question.check(4), Err(TxLensError::InvalidInput(_))));
    }

    #[test]
    fn test_grade_quiz() {
        let all_right: Vec<usize> = quiz_questions().iter().map(|q| q.correct_answer).collect();
        let result = grade_quiz(&all_right).unwrap();
        assert_eq!((result.score, result.total, result.percentage), (7, 7, 100));
        assert!(result.verdict().starts_with("Excellent"));

        let mut answers = all_right.clone();
        answers[0] = 0;
        answers[1] = 2;
        let result = grade_quiz(&answers).unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(result.percentage, 71);
        assert!(result.verdict().starts_with("Good job"));

        assert!(grade_quiz(&[1, 1]).is_err());
        assert!(grade_quiz(&[9; 7]).is_err());
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(QuizResult::new(4, 5).percentage, 80);
        assert!(QuizResult::new(4, 5).verdict().starts_with("Excellent"));
        assert!(QuizResult::new(3, 5).verdict().starts_with("Good job"));
        assert!(QuizResult::new(2, 5).verdict().starts_with("Keep learning"));
        assert_eq!(QuizResult::new(0, 0).percentage, 0);
    }

    #[test]
    fn test_parse_answers() {
        assert_eq!(parse_answers("2,2 1").unwrap(), vec![1, 1, 0]);
        assert_eq!(parse_answers("b, B ,a").unwrap(), vec![1, 1, 0]);
        assert!(parse_answers("0").is_err());
        assert!(parse_answers("bb").is_err());
        assert!(parse_answers("").unwrap().is_empty());
    }
}
