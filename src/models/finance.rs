// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// Lançamento financeiro. Ids negativos identificam transações sintéticas
/// derivadas de pedidos no relatório por categoria; essas nunca são
/// persistidas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Tags de categoria embutidas na descrição pela convenção `[Nome]`.
    /// O formato textual é o contrato de compatibilidade com dados já
    /// lançados à mão; aqui ele é interpretado uma única vez na leitura.
    pub fn category_tags(&self) -> Vec<&str> {
        category_tags(&self.description)
    }

    pub fn has_category_tag(&self, category: &str) -> bool {
        self.category_tags().contains(&category)
    }
}

/// Extrai toda sequência `[...]` da descrição. Varre cada '[' até o próximo
/// ']', o que equivale exatamente ao teste de substring `contains("[X]")`
/// para nomes de categoria sem colchetes.
pub fn category_tags(description: &str) -> Vec<&str> {
    let mut tags = Vec::new();
    let bytes = description.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'[' {
            if let Some(close) = description[i + 1..].find(']') {
                tags.push(&description[i + 1..i + 1 + close]);
            }
        }
    }
    tags
}

/// Prefixa a descrição de uma despesa com a tag da categoria,
/// preservando o formato `[Nome] texto` usado nos dados existentes.
pub fn tag_description(category: Option<&str>, description: &str) -> String {
    match category {
        Some(cat) if !cat.is_empty() && cat != "all" => format!("[{}] {}", cat, description),
        _ => description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrai_tag_no_prefixo() {
        assert_eq!(category_tags("[Gás] Compra de botijões"), vec!["Gás"]);
    }

    #[test]
    fn extrai_tag_no_meio_da_descricao() {
        assert_eq!(category_tags("Compra [Água 20L] urgente"), vec!["Água 20L"]);
    }

    #[test]
    fn descricao_sem_tag() {
        assert!(category_tags("Conta de luz").is_empty());
    }

    #[test]
    fn colchete_sem_fechamento_nao_vira_tag() {
        assert!(category_tags("Compra [Gás sem fim").is_empty());
    }

    #[test]
    fn colchetes_aninhados_equivalem_ao_teste_de_substring() {
        // "a[b[Gás]" contém a substring "[Gás]", então "Gás" precisa aparecer.
        let tags = category_tags("a[b[Gás]");
        assert!(tags.contains(&"Gás"));
    }

    #[test]
    fn prefixo_so_para_categoria_especifica() {
        assert_eq!(tag_description(Some("Gás"), "Compra"), "[Gás] Compra");
        assert_eq!(tag_description(Some("all"), "Compra"), "Compra");
        assert_eq!(tag_description(None, "Compra"), "Compra");
    }
}
