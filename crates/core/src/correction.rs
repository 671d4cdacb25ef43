//! Id auto-correction within one revision.
//!
//! When several ids in the same scope carry pixel-identical sprites, the
//! lowest one is treated as canonical and higher duplicates are corrected
//! down to it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::debug;

use crate::content_index::ContentHashIndex;
use crate::model::ItemId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    ContentHash,
}

impl CorrectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::ContentHash => "content_hash",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub original_id: ItemId,
    pub corrected_id: ItemId,
    pub method: CorrectionMethod,
}

pub struct IdCorrector<'a> {
    index: &'a ContentHashIndex,
    scope: String,
    history: Vec<Correction>,
}

impl<'a> IdCorrector<'a> {
    pub fn new(index: &'a ContentHashIndex, scope: impl Into<String>) -> Self {
        Self {
            index,
            scope: scope.into(),
            history: Vec::new(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns a correction when a lower id in the same scope shares the
    /// sprite of `id`. Unknown ids and ids that are already the lowest of
    /// their group yield `None`.
    pub fn correct(&mut self, id: ItemId) -> Option<Correction> {
        let lowest = self
            .index
            .equivalents_of(&self.scope, id)
            .into_iter()
            .filter(|key| key.scope == self.scope)
            .map(|key| key.asset_id)
            .min()?;
        if lowest > id {
            return None;
        }
        let correction = Correction {
            original_id: id,
            corrected_id: lowest,
            method: CorrectionMethod::ContentHash,
        };
        debug!(scope = %self.scope, from = id, to = lowest, "corrected item id");
        self.history.push(correction.clone());
        Some(correction)
    }

    /// Corrects every id, keeping only the ones that changed.
    pub fn correct_batch(&mut self, ids: &[ItemId]) -> BTreeMap<ItemId, Correction> {
        ids.iter()
            .filter_map(|id| self.correct(*id).map(|correction| (*id, correction)))
            .collect()
    }

    pub fn history(&self) -> &[Correction] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn report(&self) -> String {
        if self.history.is_empty() {
            return "No corrections have been made.".to_string();
        }
        let mut out = String::new();
        let _ = writeln!(out, "Id correction report ({})", self.scope);
        let _ = writeln!(out, "{}", "=".repeat(40));
        for (position, correction) in self.history.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} -> {} ({})",
                position + 1,
                correction.original_id,
                correction.corrected_id,
                correction.method.as_str()
            );
        }
        let _ = write!(out, "Total corrections: {}", self.history.len());
        out
    }
}

#[cfg(test)]
#[path = "tests/correction_tests.rs"]
mod tests;
