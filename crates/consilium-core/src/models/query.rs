use serde::{Deserialize, Serialize};

/// Query complexity as labelled by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Complex,
    MultiDomain,
}

/// Advisory domain a query touches. Detected by keyword table, used to
/// pick multi-domain reasoning and to partition sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Vat,
    DirectTax,
    Payroll,
    Corporate,
    Accounting,
    International,
}

impl Domain {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vat => "VAT",
            Self::DirectTax => "direct taxation",
            Self::Payroll => "payroll",
            Self::Corporate => "corporate law",
            Self::Accounting => "accounting",
            Self::International => "cross-border",
        }
    }
}

/// Model pricing tier for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Economy,
    Premium,
}

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// The incoming request for one pipeline run.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub query: String,
    pub history: Vec<ConversationTurn>,
    /// Client/case identifier for optional personalization.
    pub client_id: Option<String>,
    /// Whether the caller attached documents to this turn.
    pub has_attachments: bool,
    /// Overall deadline for the whole pipeline, in milliseconds.
    pub deadline_ms: Option<u64>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: Vec::new(),
            client_id: None,
            has_attachments: false,
            deadline_ms: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }
}

/// Which retrieval method a variant targets. Fusion weights are keyed
/// on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Keyword/lexical search.
    Lexical,
    /// Dense vector search on the variant text itself.
    Semantic,
    /// Dense vector search seeded with a hypothetical answer document.
    HydeSeed,
}

/// One expanded query variant issued against the retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryVariant {
    pub text: String,
    pub kind: VariantKind,
}

impl QueryVariant {
    pub fn new(text: impl Into<String>, kind: VariantKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Output of the query expander.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpandedQuery {
    /// Variants to fan out, HyDE seed included when available.
    pub variants: Vec<QueryVariant>,
    /// Whether multi-variant mode fired (ambiguous query).
    pub multi_variant: bool,
    /// Distinct scenarios the hypothetical document covers, only filled
    /// in multi-variant mode.
    pub variants_covered: Vec<String>,
    /// Whether HyDE had to be skipped (expansion failure recovery).
    pub hyde_skipped: bool,
}
