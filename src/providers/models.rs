// Model choices, one enum per capability.
//
// Which hosted model serves a capability is a closed set picked at startup,
// not a free-form string looked up at call time.

use std::str::FromStr;

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingModel {
    /// 384-dimensional sentence embeddings.
    #[default]
    AllMiniLmL6V2,
}

impl EmbeddingModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            EmbeddingModel::AllMiniLmL6V2 => "sentence-transformers/all-MiniLM-L6-v2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummarizationModel {
    #[default]
    BartLargeCnn,
    /// Smaller, faster distilled BART.
    DistilBartCnn,
}

impl SummarizationModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            SummarizationModel::BartLargeCnn => "facebook/bart-large-cnn",
            SummarizationModel::DistilBartCnn => "sshleifer/distilbart-cnn-12-6",
        }
    }
}

impl FromStr for SummarizationModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bart-large-cnn" => Ok(SummarizationModel::BartLargeCnn),
            "distilbart-cnn" => Ok(SummarizationModel::DistilBartCnn),
            other => anyhow::bail!(
                "Unknown summarization model '{other}' (expected bart-large-cnn or distilbart-cnn)"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationModel {
    #[default]
    Nllb200Distilled600M,
}

impl TranslationModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            TranslationModel::Nllb200Distilled600M => "facebook/nllb-200-distilled-600M",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentModel {
    #[default]
    DistilBertSst2,
}

impl SentimentModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            SentimentModel::DistilBertSst2 => {
                "distilbert/distilbert-base-uncased-finetuned-sst-2-english"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityModel {
    #[default]
    DistilBertNer,
}

impl EntityModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            EntityModel::DistilBertNer => "dslim/distilbert-NER",
        }
    }
}

/// The full set of models the Hugging Face client talks to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSet {
    pub embedding: EmbeddingModel,
    pub summarization: SummarizationModel,
    pub translation: TranslationModel,
    pub sentiment: SentimentModel,
    pub entities: EntityModel,
}
