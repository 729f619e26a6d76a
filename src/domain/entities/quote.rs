use crate::domain::value_objects::QuoteId;
use crate::domain::value_objects::month_period::parse_quote_date;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Placeholder stored for optional form fields the operator left blank.
pub const NOT_INFORMED: &str = "Não Informado";

/// Descriptive fields of a freight quote as entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub responsavel_cotacao: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub transportadora: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub destino: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub numero_cotacao: String,
    #[serde(default, deserialize_with = "amount")]
    pub valor_frete: f64,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub vendedor: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub numero_documento: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub previsao_entrega: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub canal_comunicacao: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub codigo_coleta: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub responsavel_transportadora: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub data_cotacao: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub observacoes: String,
}

impl QuoteDraft {
    /// Applies the form defaults: blank optional fields become [`NOT_INFORMED`],
    /// surrounding whitespace is dropped everywhere.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.responsavel_cotacao,
            &mut self.transportadora,
            &mut self.destino,
            &mut self.data_cotacao,
            &mut self.observacoes,
        ] {
            *field = field.trim().to_string();
        }

        for field in [
            &mut self.numero_cotacao,
            &mut self.vendedor,
            &mut self.numero_documento,
            &mut self.previsao_entrega,
            &mut self.canal_comunicacao,
            &mut self.codigo_coleta,
            &mut self.responsavel_transportadora,
        ] {
            let trimmed = field.trim();
            *field = if trimmed.is_empty() {
                NOT_INFORMED.to_string()
            } else {
                trimmed.to_string()
            };
        }

        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.responsavel_cotacao.trim().is_empty() {
            return Err("Responsável pela cotação é obrigatório".to_string());
        }
        if self.transportadora.trim().is_empty() {
            return Err("Transportadora é obrigatória".to_string());
        }
        if !self.valor_frete.is_finite() || self.valor_frete < 0.0 {
            return Err(format!("Valor do frete inválido: {}", self.valor_frete));
        }
        if parse_quote_date(&self.data_cotacao).is_none() {
            return Err(format!("Data da cotação inválida: {}", self.data_cotacao));
        }
        Ok(())
    }
}

/// A freight quote as held by the record store and served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub negocio_fechado: bool,
    #[serde(flatten)]
    pub fields: QuoteDraft,
    /// Columns the backend sends that this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quote {
    /// Builds the placeholder inserted before the server has confirmed a create.
    pub fn provisional(fields: QuoteDraft) -> Self {
        Self {
            id: QuoteId::temporary(),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            negocio_fechado: false,
            fields,
            extra: Map::new(),
        }
    }

    /// Replaces the descriptive fields, keeping identity, creation time and status.
    pub fn apply_draft(&mut self, fields: QuoteDraft) {
        self.fields = fields;
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_temporary()
    }

    /// Display ordering instant: creation timestamp, falling back to the quote date.
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(parse_instant)
            .or_else(|| parse_instant(&self.fields.data_cotacao))
    }

    /// Case-insensitive match against the searchable text columns.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.fields.transportadora,
            &self.fields.numero_cotacao,
            &self.fields.vendedor,
            &self.fields.numero_documento,
            &self.fields.codigo_coleta,
            &self.fields.responsavel_transportadora,
            &self.fields.destino,
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Sorts newest first. Quotes without a usable date go last, keeping their relative order.
pub fn sort_for_display(quotes: &mut [Quote]) {
    quotes.sort_by(|a, b| match (a.sort_key(), b.sort_key()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    parse_quote_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(text)) => text,
        Some(RawText::Integer(number)) => number.to_string(),
        Some(RawText::Float(number)) => number.to_string(),
        None => String::new(),
    })
}

fn flag_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// NUMERIC columns come back from Postgres drivers as strings.
fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(number)) => Ok(number),
        Some(RawAmount::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0.0);
            }
            text.parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid valorFrete `{text}`")))
        }
        None => Ok(0.0),
    }
}
