use num::Float;

/// How raw values are turned into ratings. `Unknown` and `RankTry` are only
/// ever requested; construction resolves them to a concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformType {
    #[default]
    Unknown,
    RankTry,
    RankUpper,
    RankAll,
    MultiUpper,
    MultiAll,
    MinMaxUpper,
    MinMaxAll,
    Flat,
}

const UNKNOWN_ORDER: [TransformType; 6] = [
    TransformType::RankUpper,
    TransformType::MultiUpper,
    TransformType::MinMaxUpper,
    TransformType::RankAll,
    TransformType::MultiAll,
    TransformType::MinMaxAll,
];

const RANK_TRY_ORDER: [TransformType; 2] = [TransformType::RankUpper, TransformType::RankAll];

impl TransformType {
    pub fn is_concrete(self) -> bool {
        !matches!(self, TransformType::Unknown | TransformType::RankTry)
    }

    pub fn is_upper(self) -> bool {
        matches!(
            self,
            TransformType::RankUpper | TransformType::MultiUpper | TransformType::MinMaxUpper
        )
    }

    // (candidate, mid_is_avg) in priority order
    pub fn candidates(self) -> Vec<(TransformType, bool)> {
        match self {
            TransformType::Unknown => UNKNOWN_ORDER
                .iter()
                .map(|&t| (t, !matches!(t, TransformType::MinMaxUpper | TransformType::MinMaxAll)))
                .collect(),
            TransformType::RankTry => RANK_TRY_ORDER.iter().map(|&t| (t, false)).collect(),
            TransformType::Flat => vec![],
            pinned => std::iter::once(pinned)
                .chain(RANK_TRY_ORDER.iter().copied().filter(|&t| t != pinned))
                .map(|t| (t, false))
                .collect(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransformType::Unknown => "unknown",
            TransformType::RankTry => "rank-try",
            TransformType::RankUpper => "rank-upper",
            TransformType::RankAll => "rank-all",
            TransformType::MultiUpper => "multi-upper",
            TransformType::MultiAll => "multi-all",
            TransformType::MinMaxUpper => "minmax-upper",
            TransformType::MinMaxAll => "minmax-all",
            TransformType::Flat => "flat",
        }
    }
}

impl std::fmt::Display for TransformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TransformType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let t = match s {
            "unknown" => TransformType::Unknown,
            "rank-try" => TransformType::RankTry,
            "rank-upper" => TransformType::RankUpper,
            "rank-all" => TransformType::RankAll,
            "multi-upper" => TransformType::MultiUpper,
            "multi-all" => TransformType::MultiAll,
            "minmax-upper" => TransformType::MinMaxUpper,
            "minmax-all" => TransformType::MinMaxAll,
            "flat" => TransformType::Flat,
            other => return Err(anyhow::anyhow!("Unknown transform type: {:?}", other)),
        };
        Ok(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformStats<T> {
    pub average: T,
    pub median: T,
    pub min: T,
    pub max: T,
}

pub fn transform_valid<T>(ts: &TransformStats<T>, mid_is_avg: bool, tolerance: T) -> bool
where
    T: Float,
{
    let finite = [ts.average, ts.median, ts.min, ts.max].iter().all(|v| v.is_finite());
    if !finite || ts.max <= ts.min {
        return false;
    }
    !mid_is_avg || (ts.median - ts.average).abs() <= tolerance
}
