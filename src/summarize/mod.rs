//! Summarization reduction loop.
//!
//! Repeated rounds of "summarize each fragment, concatenate, check size"
//! until the result fits the chunk bound, plus question answering against
//! either the single stored fragment or the converged summary.

use anyhow::Result;
use tracing::{debug, warn};

use crate::chunk::partition;
use crate::domain::Fragment;
use crate::llm::Summarizer;
use crate::store::{FragmentKind, FragmentStore};

/// Per-fragment instruction for the first reduction round.
const SUMMARIZE_INSTRUCTION: &str = "summarize the code";

/// Per-fragment instruction for follow-up rounds; asking for detail limits
/// over-compression drift across rounds.
const DETAIL_INSTRUCTION: &str = "summarize in detail";

/// Question used for the automatic post-ingest overview.
pub const OVERVIEW_QUESTION: &str = "Can you summarize the code in less than 3 sentences?";

pub struct Reducer<'a> {
    store: &'a mut dyn FragmentStore,
    llm: &'a dyn Summarizer,
    max_chunk_size: usize,
}

impl<'a> Reducer<'a> {
    pub fn new(
        store: &'a mut dyn FragmentStore,
        llm: &'a dyn Summarizer,
        max_chunk_size: usize,
    ) -> Self {
        Self { store, llm, max_chunk_size }
    }

    /// Produce and persist the session summary from the stored code
    /// fragments. A single stored fragment is its own summary and costs
    /// zero LLM calls.
    pub fn summarize(&mut self) -> Result<String> {
        let fragments = self.store.read(FragmentKind::Code)?;
        let summary = if fragments.len() <= 1 {
            fragments.first().map(|f| f.text.clone()).unwrap_or_default()
        } else {
            self.reduce(&fragments)?
        };
        self.store.replace(FragmentKind::Summary, &[Fragment::new(0, summary.clone())])?;
        Ok(summary)
    }

    /// Answer a free-form question against the code, or against the
    /// converged summary when the code spans several fragments. The
    /// summarization work runs lazily, once per session: the first question
    /// after a multi-fragment ingest pays its latency.
    pub fn answer(&mut self, question: &str) -> Result<String> {
        if self.store.count(FragmentKind::Code)? == 1 {
            let code = self.store.read(FragmentKind::Code)?;
            return Ok(self.llm.complete(question, &code[0].text)?);
        }

        if self.store.count(FragmentKind::Summary)? == 0 {
            self.summarize()?;
        }
        let summary = self.store.read(FragmentKind::Summary)?;
        let context = summary.first().map(|f| f.text.as_str()).unwrap_or_default();
        Ok(self.llm.complete(question, context)?)
    }

    /// One LLM call per fragment, concatenated in fragment order, then
    /// re-partitioned and re-run while the result exceeds the chunk bound.
    ///
    /// There is no iteration cap: convergence relies on summaries being
    /// shorter than their inputs in aggregate. A round that fails to shrink
    /// the working text is logged, not aborted.
    fn reduce(&mut self, fragments: &[Fragment]) -> Result<String> {
        let mut summary = self.round(fragments, SUMMARIZE_INSTRUCTION)?;

        while summary.chars().count() > self.max_chunk_size {
            let previous_len = summary.chars().count();
            let parts = partition(&summary, self.max_chunk_size);
            self.store.replace(FragmentKind::Summary, &parts)?;
            let working = self.store.read(FragmentKind::Summary)?;
            summary = self.round(&working, DETAIL_INSTRUCTION)?;

            let new_len = summary.chars().count();
            debug!(previous_len, new_len, "reduction round complete");
            if new_len >= previous_len {
                warn!(
                    previous_len,
                    new_len,
                    "reduction round did not shrink the summary; convergence is not guaranteed"
                );
            }
        }

        Ok(summary)
    }

    fn round(&self, fragments: &[Fragment], instruction: &str) -> Result<String> {
        let mut responses = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            responses.push(self.llm.complete(instruction, &fragment.text)?);
        }
        Ok(responses.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::store::StoreError;
    use std::cell::Cell;

    #[derive(Default)]
    struct MemoryStore {
        code: Vec<Fragment>,
        summary: Vec<Fragment>,
    }

    impl FragmentStore for MemoryStore {
        fn replace(
            &mut self,
            kind: FragmentKind,
            fragments: &[Fragment],
        ) -> Result<(), StoreError> {
            match kind {
                FragmentKind::Code => self.code = fragments.to_vec(),
                FragmentKind::Summary => self.summary = fragments.to_vec(),
            }
            Ok(())
        }

        fn read(&self, kind: FragmentKind) -> Result<Vec<Fragment>, StoreError> {
            Ok(match kind {
                FragmentKind::Code => self.code.clone(),
                FragmentKind::Summary => self.summary.clone(),
            })
        }

        fn count(&self, kind: FragmentKind) -> Result<usize, StoreError> {
            Ok(match kind {
                FragmentKind::Code => self.code.len(),
                FragmentKind::Summary => self.summary.len(),
            })
        }
    }

    struct ScriptedLlm<F: Fn(&str, &str) -> String> {
        calls: Cell<usize>,
        reply: F,
    }

    impl<F: Fn(&str, &str) -> String> ScriptedLlm<F> {
        fn new(reply: F) -> Self {
            Self { calls: Cell::new(0), reply }
        }
    }

    impl<F: Fn(&str, &str) -> String> Summarizer for ScriptedLlm<F> {
        fn complete(&self, instruction: &str, text: &str) -> Result<String, LlmError> {
            self.calls.set(self.calls.get() + 1);
            Ok((self.reply)(instruction, text))
        }
    }

    fn code_store(texts: &[&str]) -> MemoryStore {
        MemoryStore {
            code: texts
                .iter()
                .enumerate()
                .map(|(seq, t)| Fragment::new(seq, t.to_string()))
                .collect(),
            summary: Vec::new(),
        }
    }

    #[test]
    fn single_fragment_summary_is_the_fragment_itself() {
        let mut store = code_store(&["print('hi')"]);
        let llm = ScriptedLlm::new(|_, _| panic!("summarize must not call the LLM here"));

        let summary =
            Reducer::new(&mut store, &llm, 10_000).summarize().expect("summarize");

        assert_eq!(summary, "print('hi')");
        assert_eq!(llm.calls.get(), 0);
        assert_eq!(store.summary.len(), 1);
        assert_eq!(store.summary[0].text, "print('hi')");
    }

    #[test]
    fn multi_fragment_round_concatenates_in_fragment_order() {
        let mut store = code_store(&["alpha body", "beta body"]);
        let llm = ScriptedLlm::new(|_, text| {
            format!("sum<{}>", text.split_whitespace().next().unwrap_or(""))
        });

        let summary =
            Reducer::new(&mut store, &llm, 10_000).summarize().expect("summarize");

        assert_eq!(summary, "sum<alpha> sum<beta>");
        assert_eq!(llm.calls.get(), 2);
        assert_eq!(store.summary.len(), 1);
        assert_eq!(store.summary[0].text, summary);
    }

    #[test]
    fn oversized_candidate_is_repartitioned_until_it_fits() {
        let mut store = code_store(&["first fragment text", "second fragment text"]);
        // First round inflates past the 40-char bound; detail rounds
        // compress hard, so the loop converges after one re-partition.
        let llm = ScriptedLlm::new(|instruction, _| {
            if instruction == SUMMARIZE_INSTRUCTION {
                "w".repeat(50)
            } else {
                "short".to_string()
            }
        });

        let summary = Reducer::new(&mut store, &llm, 40).summarize().expect("summarize");

        // Round one: 2 calls -> 101 chars. Re-partition at bound 40 gives
        // three 33/33/35-char pieces, each summarized again: 3 more calls.
        assert_eq!(llm.calls.get(), 5);
        assert_eq!(summary, "short short short");
        assert!(summary.chars().count() <= 40);
        assert_eq!(store.summary.len(), 1);
        assert_eq!(store.summary[0].text, summary);
    }

    #[test]
    fn each_round_shrinks_the_working_text_in_the_convergent_case() {
        let mut store = code_store(&["x".repeat(100).as_str(), "y".repeat(100).as_str()]);
        let llm = ScriptedLlm::new(|_, text| {
            // Halving compressor: every round's output is strictly shorter
            // than its input, the assumption the loop's liveness rests on.
            text.chars().take(text.chars().count() / 2).collect()
        });

        let summary = Reducer::new(&mut store, &llm, 30).summarize().expect("summarize");
        assert!(summary.chars().count() <= 30);
    }

    #[test]
    fn answer_queries_the_single_fragment_directly() {
        let mut store = code_store(&["print('hi')"]);
        let llm = ScriptedLlm::new(|instruction, text| format!("{instruction}|{text}"));

        let response = Reducer::new(&mut store, &llm, 10_000)
            .answer("What does it print?")
            .expect("answer");

        assert_eq!(response, "What does it print?|print('hi')");
        assert_eq!(llm.calls.get(), 1);
        // The single-fragment path never materializes a summary artifact.
        assert_eq!(store.summary.len(), 0);
    }

    #[test]
    fn answer_summarizes_lazily_and_only_once() {
        let mut store = code_store(&["first fragment", "second fragment"]);
        let llm = ScriptedLlm::new(|_, _| "tiny".to_string());

        {
            let mut reducer = Reducer::new(&mut store, &llm, 10_000);
            reducer.answer("first question").expect("first answer");
            // 2 summarize calls + 1 answer call.
            assert_eq!(llm.calls.get(), 3);

            reducer.answer("second question").expect("second answer");
            // Summary is cached: only the answer call is added.
            assert_eq!(llm.calls.get(), 4);
        }
        assert_eq!(store.summary.len(), 1);
    }
}
