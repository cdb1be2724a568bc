//! Inline vs paste-service delivery of converted text

use super::types::TranscodeResult;
use crate::error::Result;
use std::future::Future;

/// External paste service that stores text and hands back a shareable reference
pub trait PasteSink: Send + Sync {
    fn submit(&self, text: &str) -> impl Future<Output = Result<String>> + Send;
}

/// How a converted result reaches the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Inline(String),
    /// Link returned by the paste service
    Reference(String),
    /// Paste service failed; send the full text as a file
    Attachment(String),
}

#[derive(Debug, Clone, Copy)]
pub struct RelayPolicy {
    inline_threshold: usize,
}

impl RelayPolicy {
    pub fn new(inline_threshold: usize) -> Self {
        Self { inline_threshold }
    }

    pub fn inline_threshold(&self) -> usize {
        self.inline_threshold
    }

    pub fn apply(&self, text: String) -> TranscodeResult {
        let too_long_for_inline = text.chars().count() >= self.inline_threshold;
        TranscodeResult {
            text,
            too_long_for_inline,
        }
    }

    /// Decide delivery for a result, consulting the paste service when it is too long.
    ///
    /// Paste failures never propagate; they turn into attachment delivery.
    pub async fn deliver(&self, sink: &impl PasteSink, result: TranscodeResult) -> Delivery {
        if !result.too_long_for_inline {
            return Delivery::Inline(result.text);
        }

        tracing::debug!(
            text_len = result.text.len(),
            threshold = self.inline_threshold,
            "Result too long for inline reply, submitting to paste service"
        );

        match sink.submit(&result.text).await {
            Ok(reference) => {
                tracing::info!(reference = %reference, "Result relayed to paste service");
                Delivery::Reference(reference)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Paste service unavailable, falling back to file upload"
                );
                Delivery::Attachment(result.text)
            }
        }
    }
}
