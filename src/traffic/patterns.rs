use anyhow::{bail, ensure, Context};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sim::trace::{TraceError, TraceRecord, TraceSource};
use crate::traffic::config::{TrafficConfig, TrafficPatternSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOp {
    Read,
    Write,
}

impl PatternOp {
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    fn short(self) -> &'static str {
        match self {
            Self::Read => "r",
            Self::Write => "w",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Sequential { align: u64 },
    Strided { stride: u64 },
    Random { seed: u64, slots: u64, align: u64 },
}

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub op: PatternOp,
    pub count: u64,
    pub precursor: u64,
    base: u64,
    kind: PatternKind,
}

impl CompiledPattern {
    fn addr(&self, req_idx: u64, rng: &mut StdRng) -> u64 {
        let offset = match self.kind {
            PatternKind::Sequential { align } => req_idx.wrapping_mul(align),
            PatternKind::Strided { stride } => req_idx.wrapping_mul(stride),
            PatternKind::Random { slots, align, .. } => rng.gen_range(0..slots) * align,
        };
        self.base.wrapping_add(offset)
    }

    fn seed(&self) -> u64 {
        match self.kind {
            PatternKind::Random { seed, .. } => seed,
            _ => 0,
        }
    }
}

fn compile_pattern(spec: &TrafficPatternSpec, index: usize) -> anyhow::Result<CompiledPattern> {
    let op = parse_op(&spec.op).with_context(|| format!("in traffic pattern {}", index))?;
    let kind = match spec.kind.trim().to_ascii_lowercase().as_str() {
        "sequential" | "seq" => {
            ensure!(spec.align > 0, "pattern {}: align must be > 0", index);
            PatternKind::Sequential { align: spec.align }
        }
        "strided" => PatternKind::Strided {
            stride: spec.stride,
        },
        "random" => {
            ensure!(spec.align > 0, "pattern {}: align must be > 0", index);
            ensure!(
                spec.span >= spec.align,
                "pattern {}: span {} is smaller than align {}",
                index,
                spec.span,
                spec.align
            );
            PatternKind::Random {
                seed: spec.seed,
                slots: spec.span / spec.align,
                align: spec.align,
            }
        }
        other => bail!(
            "unsupported traffic pattern kind '{}' at index {} (expected sequential|strided|random)",
            other,
            index
        ),
    };

    let name = if spec.name.is_empty() {
        default_pattern_name(&kind, op)
    } else {
        spec.name.clone()
    };

    Ok(CompiledPattern {
        name,
        op,
        count: spec.count,
        precursor: spec.precursor,
        base: spec.base,
        kind,
    })
}

fn parse_op(op: &str) -> anyhow::Result<PatternOp> {
    match op.trim().to_ascii_lowercase().as_str() {
        "read" | "r" => Ok(PatternOp::Read),
        "write" | "w" => Ok(PatternOp::Write),
        other => bail!("unsupported traffic op '{}'; expected read/write", other),
    }
}

fn default_pattern_name(kind: &PatternKind, op: PatternOp) -> String {
    let base = match kind {
        PatternKind::Sequential { align } => format!("sequential@{}", align),
        PatternKind::Strided { stride } => format!("strided({})", stride),
        PatternKind::Random { seed, .. } => format!("random({})", seed),
    };
    format!("{}_{}", base, op.short())
}

/// Trace source generating records from compiled traffic patterns.
#[derive(Debug, Clone)]
pub struct TrafficSource {
    patterns: Vec<CompiledPattern>,
    pattern_idx: usize,
    req_idx: u64,
    // reseeded whenever a pattern starts
    rng: StdRng,
}

impl TrafficSource {
    pub fn new(config: &TrafficConfig) -> anyhow::Result<Self> {
        let patterns = config
            .patterns
            .iter()
            .enumerate()
            .map(|(idx, spec)| compile_pattern(spec, idx))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let seed = patterns.first().map_or(0, CompiledPattern::seed);
        for pattern in &patterns {
            info!(
                "traffic pattern {}: {} requests",
                pattern.name, pattern.count
            );
        }
        Ok(Self {
            patterns,
            pattern_idx: 0,
            req_idx: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn pattern(&self, idx: usize) -> Option<&CompiledPattern> {
        self.patterns.get(idx)
    }

    /// Total memory requests over all patterns.
    pub fn total_requests(&self) -> u64 {
        self.patterns.iter().map(|p| p.count).sum()
    }
}

impl TraceSource for TrafficSource {
    fn next_record(&mut self) -> Result<Option<TraceRecord>, TraceError> {
        loop {
            let Some(pattern) = self.patterns.get(self.pattern_idx) else {
                return Ok(None);
            };
            if self.req_idx < pattern.count {
                let addr = pattern.addr(self.req_idx, &mut self.rng);
                self.req_idx += 1;
                return Ok(Some(TraceRecord {
                    precursor: pattern.precursor,
                    addr,
                    is_write: pattern.op.is_write(),
                }));
            }
            self.pattern_idx += 1;
            self.req_idx = 0;
            if let Some(next) = self.patterns.get(self.pattern_idx) {
                self.rng = StdRng::seed_from_u64(next.seed());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: &str, op: &str, count: u64) -> TrafficPatternSpec {
        TrafficPatternSpec {
            kind: kind.to_string(),
            op: op.to_string(),
            count,
            ..Default::default()
        }
    }

    fn source(patterns: Vec<TrafficPatternSpec>) -> TrafficSource {
        TrafficSource::new(&TrafficConfig { patterns }).unwrap()
    }

    fn collect(mut source: TrafficSource) -> Vec<TraceRecord> {
        std::iter::from_fn(|| source.next_record().unwrap()).collect()
    }

    #[test]
    fn sequential_walks_cache_lines() {
        let mut p = spec("sequential", "read", 4);
        p.base = 0x1000;
        let records = collect(source(vec![p]));
        let addrs: Vec<u64> = records.iter().map(|r| r.addr).collect();
        assert_eq!(addrs, vec![0x1000, 0x1040, 0x1080, 0x10c0]);
        assert!(records.iter().all(|r| !r.is_write && r.precursor == 0));
    }

    #[test]
    fn strided_uses_stride_and_precursor() {
        let mut p = spec("strided", "w", 3);
        p.stride = 0x800;
        p.precursor = 2;
        let records = collect(source(vec![p]));
        assert_eq!(
            records,
            vec![
                TraceRecord::write(2, 0),
                TraceRecord::write(2, 0x800),
                TraceRecord::write(2, 0x1000),
            ]
        );
    }

    #[test]
    fn random_stays_aligned_inside_span() {
        let mut p = spec("random", "read", 500);
        p.base = 0x4000_0000;
        p.span = 1 << 16;
        p.seed = 7;
        for record in collect(source(vec![p])) {
            assert!(record.addr >= 0x4000_0000);
            assert!(record.addr < 0x4000_0000 + (1 << 16));
            assert_eq!(record.addr % 64, 0);
        }
    }

    #[test]
    fn patterns_run_back_to_back_deterministically() {
        let mut random = spec("random", "read", 16);
        random.seed = 3;
        let patterns = vec![spec("sequential", "write", 2), random.clone(), random];
        let src = source(patterns.clone());
        assert_eq!(src.total_requests(), 34);
        let first = collect(src);
        assert_eq!(first.len(), 34);
        assert_eq!(first, collect(source(patterns)));
        // same seed, same stream for every pattern
        assert_eq!(first[2..18], first[18..34]);
        assert!(first[..2].iter().all(|r| r.is_write));
    }

    #[test]
    fn empty_patterns_are_skipped() {
        let patterns = vec![
            spec("sequential", "read", 0),
            spec("sequential", "read", 1),
        ];
        assert_eq!(collect(source(patterns)).len(), 1);
        assert!(collect(source(Vec::new())).is_empty());
    }

    #[test]
    fn unknown_kind_or_op_is_an_error() {
        let bad_kind = TrafficConfig {
            patterns: vec![spec("tiled", "read", 1)],
        };
        assert!(TrafficSource::new(&bad_kind).is_err());
        let bad_op = TrafficConfig {
            patterns: vec![spec("sequential", "fetch", 1)],
        };
        assert!(TrafficSource::new(&bad_op).is_err());
        let mut tiny = spec("random", "read", 1);
        tiny.span = 8;
        assert!(TrafficSource::new(&TrafficConfig { patterns: vec![tiny] }).is_err());
    }

    #[test]
    fn default_names_describe_the_pattern() {
        let mut named = spec("strided", "read", 1);
        named.name = "walk".to_string();
        let src = source(vec![spec("random", "write", 1), named]);
        assert_eq!(src.pattern(0).unwrap().name, "random(0)_w");
        assert_eq!(src.pattern(1).unwrap().name, "walk");
    }
}
