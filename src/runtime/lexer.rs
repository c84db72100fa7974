//! The parallel lexer.
//!
//! Lexing runs in two phases. In the first phase every worker places the boundaries of its
//! chunk and tokenizes it on its own, assuming that the chunk starts at a token boundary. In
//! the second phase the results are collected in worker order. Where a chunk ended with the
//! head of an unfinished token, the following chunks are rescanned as its continuation and the
//! fragments are stitched together.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::time::Instant;

use log::{debug, trace};

use crate::common::{LexerAutomata, Match, Span};

use super::{
    cut_point::{find_cut_point, nominal_offset},
    scanner::{apply_action, ChunkScan, ChunkScanner, OpenToken},
    Action, LexError, LexMatch, LexOutput, WorkerTokens,
};

/// What a worker reports back after the first phase.
/// The scan result is only final if the chunk doesn't continue a token of its predecessor.
struct ChunkResult<S> {
    span: Span,
    scan: Result<ChunkScan<S>, LexError>,
}

/// A maximal-munch lexer that splits its input into chunks and tokenizes them in parallel.
/// Create it with a [`super::ParallelLexerBuilder`].
#[derive(Debug)]
pub struct ParallelLexer {
    automata: LexerAutomata,
    workers: usize,
    lookahead: usize,
    pool: rayon::ThreadPool,
}

impl ParallelLexer {
    pub(crate) fn new(
        automata: LexerAutomata,
        workers: usize,
        lookahead: usize,
        pool: rayon::ThreadPool,
    ) -> Self {
        ParallelLexer {
            automata,
            workers,
            lookahead,
            pool,
        }
    }

    /// The number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The length of the lookahead window.
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// The automata the lexer runs on.
    pub fn automata(&self) -> &LexerAutomata {
        &self.automata
    }

    /// Tokenize the input.
    ///
    /// The action is called for every matched text and decides whether a token is emitted.
    /// It is called concurrently from all workers and may be called for texts whose tokens are
    /// discarded later on, so it should be free of side effects.
    ///
    /// # Errors
    /// A chunk boundary without cut point is reported first. Otherwise the first scanning error
    /// in input order is returned. Tokens of all workers are dropped then.
    pub fn lex<S, F>(&self, input: &[u8], action: F) -> Result<LexOutput<S>, LexError>
    where
        S: Send,
        F: Fn(&LexMatch<'_>) -> Action<S> + Sync,
    {
        let now = Instant::now();
        let results = self.scan_chunks(input, &action);
        trace!(
            "Parallel scanning of {} bytes took {} milliseconds.",
            input.len(),
            now.elapsed().as_millis()
        );
        let output = self.stitch(input, &action, results)?;
        trace!(
            "Lexing of {} bytes took {} milliseconds.",
            input.len(),
            now.elapsed().as_millis()
        );
        Ok(output)
    }

    /// First phase: all workers scan their chunks in parallel.
    /// The results are ordered by worker index.
    fn scan_chunks<S, F>(
        &self,
        input: &[u8],
        action: &F,
    ) -> Vec<Option<Result<ChunkResult<S>, LexError>>>
    where
        S: Send,
        F: Fn(&LexMatch<'_>) -> Action<S> + Sync,
    {
        let (sender, receiver) = mpsc::channel();
        self.pool.scope(|scope| {
            for worker in 0..self.workers {
                let sender = sender.clone();
                scope.spawn(move |_| {
                    let result = self.scan_chunk(input, action, worker);
                    // The receiver lives until all workers are done.
                    let _ = sender.send((worker, result));
                });
            }
        });
        drop(sender);

        let mut results: Vec<Option<Result<ChunkResult<S>, LexError>>> =
            (0..self.workers).map(|_| None).collect();
        for (worker, result) in receiver {
            results[worker] = Some(result);
        }
        results
    }

    fn scan_chunk<S, F>(
        &self,
        input: &[u8],
        action: &F,
        worker: usize,
    ) -> Result<ChunkResult<S>, LexError>
    where
        F: Fn(&LexMatch<'_>) -> Action<S>,
    {
        let span = self.chunk_span(input, worker)?;
        debug!("Worker {}: chunk {}", worker, span);
        let scanner = ChunkScanner::new(&self.automata, input, action, worker, span);
        let scan = scanner.scan(span.start);
        match &scan {
            Ok(scan) => debug!("Worker {}: {} tokens", worker, scan.tokens.len()),
            Err(e) => debug!("Worker {}: {}", worker, e),
        }
        Ok(ChunkResult { span, scan })
    }

    /// The chunk of the given worker after moving both ends to cut points.
    fn chunk_span(&self, input: &[u8], worker: usize) -> Result<Span, LexError> {
        let cut = |boundary: usize| {
            let nominal = nominal_offset(input.len(), self.workers, boundary);
            find_cut_point(
                self.automata.cut_points(),
                input,
                nominal,
                self.lookahead,
            )
            .ok_or(LexError::BoundaryNotFound {
                worker,
                offset: nominal,
            })
        };
        let start = if worker == 0 { 0 } else { cut(worker)? };
        let end = if worker + 1 == self.workers {
            input.len()
        } else {
            cut(worker + 1)?
        };
        Ok(Span::new(start, end))
    }

    /// Second phase: collect the results in worker order and complete the tokens that cross
    /// chunk boundaries.
    ///
    /// The scan result of a chunk is only used if the chunk starts at a token boundary. After a
    /// token that ends inside a chunk the rest of that chunk is scanned again.
    fn stitch<S, F>(
        &self,
        input: &[u8],
        action: &F,
        results: Vec<Option<Result<ChunkResult<S>, LexError>>>,
    ) -> Result<LexOutput<S>, LexError>
    where
        F: Fn(&LexMatch<'_>) -> Action<S>,
    {
        let mut spans = Vec::with_capacity(results.len());
        let mut scans = Vec::with_capacity(results.len());
        for (worker, result) in results.into_iter().enumerate() {
            let ChunkResult { span, scan } = result.ok_or(LexError::WorkerLost(worker))??;
            spans.push(span);
            scans.push(Some(scan));
        }
        let mut workers: Vec<WorkerTokens<S>> = spans
            .iter()
            .enumerate()
            .map(|(worker, span)| WorkerTokens {
                worker,
                span: *span,
                tokens: Vec::new(),
            })
            .collect();

        let mut chunk = 0;
        let mut resume_at: Option<usize> = None;
        while chunk < spans.len() {
            let scan = match resume_at.take() {
                Some(pos) => {
                    ChunkScanner::new(&self.automata, input, action, chunk, spans[chunk])
                        .scan(pos)?
                }
                None => scans[chunk]
                    .take()
                    .ok_or(LexError::WorkerLost(chunk))??,
            };
            workers[chunk].tokens.extend(scan.tokens);
            let Some(token) = scan.open else {
                chunk += 1;
                continue;
            };
            let matched = self.close_token(input, action, &spans, &token)?;
            self.emit(input, action, &mut workers, token.owner, &matched)?;
            // The chunk that holds the last byte of the token.
            let last = spans.partition_point(|span| span.end < matched.end());
            if matched.end() == spans[last].end {
                chunk = last + 1;
            } else {
                trace!(
                    "Worker {}: rescanning from {} after a token of worker {}",
                    last,
                    matched.end(),
                    token.owner
                );
                chunk = last;
                resume_at = Some(matched.end());
            }
        }
        Ok(LexOutput::new(workers))
    }

    /// Find the longest token that starts with the open head fragment.
    ///
    /// Every candidate rule is followed through the subsequent chunks as long as they are
    /// middle fragments. The furthest tail of a rule bounds its token, which is then measured
    /// with the plain automaton on the stitched text. These tokens compete with the complete
    /// tokens that start at the head.
    fn close_token<F>(
        &self,
        input: &[u8],
        action: &F,
        spans: &[Span],
        token: &OpenToken,
    ) -> Result<Match, LexError> {
        let owner_span = spans[token.owner];
        let head = ChunkScanner::new(&self.automata, input, action, token.owner, owner_span);
        let finite = self
            .automata
            .finite()
            .and_then(|dfa| dfa.longest_match(input, token.start))
            .and_then(|(end, state)| {
                state
                    .winning_rule()
                    .map(|rule| Match::new(rule, Span::new(token.start, end)))
            });
        let mut best = head
            .best_whole(token.start, owner_span.end)
            .into_iter()
            .chain(finite)
            .max_by(Match::munch_cmp);

        let mut alive = token.rules.clone();
        let mut limits: BTreeMap<usize, usize> = BTreeMap::new();
        for (chunk, span) in spans.iter().enumerate().skip(token.owner + 1) {
            if alive.is_empty() {
                break;
            }
            if span.is_empty() {
                continue;
            }
            let scanner = ChunkScanner::new(&self.automata, input, action, chunk, *span);
            alive.retain(|rule| {
                let continuation = scanner.continue_token(*rule);
                if let Some(end) = continuation.tail {
                    limits.insert(*rule, end);
                }
                continuation.middle
            });
        }

        let mut unmatched = None;
        for (rule, limit) in limits {
            let stitched = self
                .automata
                .infinite_family(rule)
                .and_then(|family| family.plain().longest_match(&input[..limit], token.start));
            match stitched {
                Some((end, _)) => {
                    let candidate = Match::new(rule, Span::new(token.start, end));
                    if best.map_or(true, |b| candidate.munch_cmp(&b).is_gt()) {
                        best = Some(candidate);
                    }
                }
                None => {
                    unmatched.get_or_insert(rule);
                }
            }
        }
        match (best, unmatched) {
            (Some(matched), _) => {
                trace!(
                    "Worker {}: open token at {} completed as rule #{} up to {}",
                    token.owner,
                    token.start,
                    matched.rule(),
                    matched.end()
                );
                Ok(matched)
            }
            (None, Some(rule)) => Err(LexError::UnmatchedFragment {
                worker: token.owner,
                rule,
                offset: token.start,
            }),
            (None, None) => Err(LexError::UnterminatedToken {
                rule: token.rule(),
                offset: token.start,
            }),
        }
    }

    fn emit<S, F>(
        &self,
        input: &[u8],
        action: &F,
        workers: &mut [WorkerTokens<S>],
        owner: usize,
        matched: &Match,
    ) -> Result<(), LexError>
    where
        F: Fn(&LexMatch<'_>) -> Action<S>,
    {
        if let Some(token) = apply_action(action, input, owner, matched.rule(), matched.span())? {
            workers[owner].tokens.push(token);
        }
        Ok(())
    }
}
