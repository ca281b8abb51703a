use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::amount;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Income
    Entrada,
    /// Expense. Unknown kinds from the server are shown as expenses.
    #[serde(other)]
    Saida,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Entrada => "entrada",
            TransactionKind::Saida => "saida",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionKind::Entrada => "Income",
            TransactionKind::Saida => "Expense",
        }
    }

    /// Sign shown in front of the amount
    pub fn sign(&self) -> char {
        match self {
            TransactionKind::Entrada => '+',
            TransactionKind::Saida => '-',
        }
    }

    /// Parse user input; accepts the wire names and English aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entrada" | "income" | "in" => Some(TransactionKind::Entrada),
            "saida" | "saída" | "expense" | "out" => Some(TransactionKind::Saida),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ledger entry as listed by `GET /transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "amount::lenient_id")]
    pub id: i64,
    #[serde(rename = "tipo", alias = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "valor", alias = "amount", default, deserialize_with = "amount::lenient")]
    pub amount: Option<f64>,
    #[serde(rename = "descricao", alias = "description", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Transaction {
    pub fn amount_value(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionsResponse {
    /// A `null` list is empty; records that fail to decode are skipped
    #[serde(default, deserialize_with = "decodable_entries")]
    pub transactions: Vec<Transaction>,
}

fn decodable_entries<'de, D>(deserializer: D) -> Result<Vec<Transaction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Transaction>(value) {
            Ok(transaction) => Some(transaction),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable transaction");
                None
            }
        })
        .collect())
}

/// `POST /transactions` may echo the entry bare or as `{"transaction": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransactionEnvelope {
    Wrapped { transaction: Transaction },
    Bare(Transaction),
}

impl TransactionEnvelope {
    pub(crate) fn into_transaction(self) -> Transaction {
        match self {
            TransactionEnvelope::Wrapped { transaction } | TransactionEnvelope::Bare(transaction) => {
                transaction
            }
        }
    }
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transactions_response() {
        let json = r#"{"transactions": [
            {"id": 3, "tipo": "entrada", "valor": "100.50", "descricao": "Salário", "created_at": "2024-01-15T10:30:00.000000Z"},
            {"id": 4, "tipo": "saida", "valor": 20, "descricao": "Mercado", "created_at": null}
        ]}"#;
        let resp: TransactionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.transactions.len(), 2);

        let first = &resp.transactions[0];
        assert_eq!(first.kind, TransactionKind::Entrada);
        assert_eq!(first.amount_value(), 100.5);
        assert_eq!(first.description_display(), "Salário");

        let second = &resp.transactions[1];
        assert_eq!(second.kind, TransactionKind::Saida);
        assert_eq!(second.amount_value(), 20.0);
        assert!(second.created_at.is_none());
    }

    #[test]
    fn test_missing_list_is_empty() {
        let resp: TransactionsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.transactions.is_empty());
    }

    #[test]
    fn test_null_list_is_empty() {
        let resp: TransactionsResponse = serde_json::from_str(r#"{"transactions": null}"#).unwrap();
        assert!(resp.transactions.is_empty());
    }

    #[test]
    fn test_string_ids_and_bad_records() {
        let json = r#"{"transactions": [
            {"id": 1, "tipo": "entrada", "valor": 10},
            {"id": "3", "tipo": "saida", "valor": "2.50"},
            {"tipo": "saida", "valor": 1},
            {"id": 4, "tipo": "saida", "valor": 7}
        ]}"#;
        let resp: TransactionsResponse = serde_json::from_str(json).unwrap();

        let ids: Vec<_> = resp.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(resp.transactions[1].amount_value(), 2.5);
    }

    #[test]
    fn test_english_field_names_and_unknown_kind() {
        let json = r#"{"id": 9, "type": "transfer", "amount": 5, "description": "Pix"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind, TransactionKind::Saida);
        assert_eq!(tx.amount_value(), 5.0);
        assert_eq!(tx.description_display(), "Pix");
    }

    #[test]
    fn test_new_transaction_wire_format() {
        let tx = NewTransaction {
            kind: TransactionKind::Entrada,
            amount: 100.5,
            description: "Salário".to_string(),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "entrada", "amount": 100.5, "description": "Salário"})
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(TransactionKind::parse("Entrada"), Some(TransactionKind::Entrada));
        assert_eq!(TransactionKind::parse("expense"), Some(TransactionKind::Saida));
        assert_eq!(TransactionKind::parse("saída"), Some(TransactionKind::Saida));
        assert_eq!(TransactionKind::parse(""), None);
        assert_eq!(TransactionKind::Entrada.sign(), '+');
        assert_eq!(TransactionKind::Saida.to_string(), "saida");
    }
}
