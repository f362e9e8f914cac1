/// Computed penalty at or below this many months allows a deferred
/// pronouncement of the judgment (HAGB).
pub const DEFERRAL_THRESHOLD_MONTHS: f64 = 24.0;

/// Bounds of the base sentence input, in months.
pub const BASE_MONTHS_MIN: u32 = 1;
pub const BASE_MONTHS_MAX: u32 = 240;
pub const DEFAULT_BASE_MONTHS: u32 = 24;

/// One statutory reduction. Only `active` changes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionRule {
    pub id: &'static str,
    pub label: &'static str,
    pub rate: f64,
    pub active: bool,
}

impl ReductionRule {
    fn new(id: &'static str, label: &'static str, rate: f64) -> Self {
        Self {
            id,
            label,
            rate,
            active: false,
        }
    }

    /// Rate as a whole percent for display: 0.166 -> 17.
    pub fn percent(&self) -> u32 {
        (self.rate * 100.0).round() as u32
    }
}

/// The fixed rule set, all inactive, in display order.
pub fn default_rules() -> Vec<ReductionRule> {
    vec![
        ReductionRule::new("tahrik", "Haksız Tahrik", 0.25),
        ReductionRule::new("iyihal", "İyi Hal (TCK 62)", 0.166),
        ReductionRule::new("etkin", "Etkin Pişmanlık", 0.5),
        ReductionRule::new("yas", "Yaş Küçüklüğü", 0.333),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyOutcome {
    pub months: f64,
    pub deferral_eligible: bool,
}

/// Apply every active reduction to `base` independently and round to one
/// decimal. Rules compound multiplicatively, they are not summed.
pub fn reduced_sentence(base: f64, rules: &[ReductionRule]) -> f64 {
    let months = rules
        .iter()
        .filter(|r| r.active)
        .fold(base, |acc, r| acc * (1.0 - r.rate));
    (months * 10.0).round() / 10.0
}

pub fn is_deferral_eligible(months: f64) -> bool {
    months <= DEFERRAL_THRESHOLD_MONTHS
}

pub fn evaluate(base: f64, rules: &[ReductionRule]) -> PenaltyOutcome {
    let months = reduced_sentence(base, rules);
    PenaltyOutcome {
        months,
        deferral_eligible: is_deferral_eligible(months),
    }
}
