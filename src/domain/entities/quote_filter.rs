use super::quote::{Quote, sort_for_display};
use crate::domain::value_objects::MonthPeriod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Closed,
    Open,
}

impl StatusFilter {
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Closed => quote.negocio_fechado,
            StatusFilter::Open => !quote.negocio_fechado,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "todos" | "all" => Ok(StatusFilter::All),
            "fechado" | "closed" => Ok(StatusFilter::Closed),
            "aberto" | "open" => Ok(StatusFilter::Open),
            other => Err(format!("Unknown status filter: {other}")),
        }
    }
}

/// Criteria of the quote list view: browsed month plus the optional filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteFilter {
    pub period: MonthPeriod,
    pub search: String,
    pub responsavel: Option<String>,
    pub transportadora: Option<String>,
    pub status: StatusFilter,
}

impl QuoteFilter {
    pub fn for_period(period: MonthPeriod) -> Self {
        Self {
            period,
            search: String::new(),
            responsavel: None,
            transportadora: None,
            status: StatusFilter::All,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_responsavel(mut self, responsavel: impl Into<String>) -> Self {
        self.responsavel = Some(responsavel.into());
        self
    }

    pub fn with_transportadora(mut self, transportadora: impl Into<String>) -> Self {
        self.transportadora = Some(transportadora.into());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        self.period.contains_date_str(&quote.fields.data_cotacao)
            && quote.matches_search(&self.search)
            && self
                .responsavel
                .as_deref()
                .is_none_or(|value| quote.fields.responsavel_cotacao == value)
            && self
                .transportadora
                .as_deref()
                .is_none_or(|value| quote.fields.transportadora == value)
            && self.status.matches(quote)
    }

    /// Returns the matching quotes in display order.
    pub fn apply(&self, quotes: &[Quote]) -> Vec<Quote> {
        let mut visible: Vec<Quote> = quotes
            .iter()
            .filter(|quote| self.matches(quote))
            .cloned()
            .collect();
        sort_for_display(&mut visible);
        visible
    }
}

impl Default for QuoteFilter {
    fn default() -> Self {
        Self::for_period(MonthPeriod::current())
    }
}
