/// Day-count basis. Leap years are not special-cased.
pub const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub days: u32,
}

impl Default for InterestInput {
    fn default() -> Self {
        Self {
            principal: 100_000.0,
            annual_rate_percent: 24.0,
            days: 180,
        }
    }
}

impl InterestInput {
    pub fn interest(&self) -> f64 {
        simple_interest(self.principal, self.annual_rate_percent, self.days)
    }

    pub fn total_due(&self) -> f64 {
        self.principal + self.interest()
    }
}

/// Non-compounding interest rounded to a whole amount, half-up.
pub fn simple_interest(principal: f64, annual_rate_percent: f64, days: u32) -> f64 {
    (principal * (annual_rate_percent / 100.0) * (f64::from(days) / DAYS_PER_YEAR)).round()
}
