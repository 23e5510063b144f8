//! Income allocator
//!
//! Splits the pool of shared money between the two earners in proportion
//! to their income. Shares are whole öre; the leftover öre from rounding
//! goes to the earner with the larger fractional part, so the residual is
//! zero unless the inputs themselves are degenerate.

use serde::{Deserialize, Serialize};

use crate::models::{Earner, Money};

/// Result of splitting a pool between two earners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub share_a: Money,
    pub share_b: Money,
    /// Fraction of total income earned by A, 0.0..=1.0
    pub percent_a: f64,
    pub percent_b: f64,
    /// `pool - share_a - share_b`
    pub residual: Money,
}

impl Allocation {
    pub fn is_balanced(&self) -> bool {
        self.residual.is_balanced()
    }
}

/// Split `pool` between two earners by income
pub fn allocate(earner_a: &Earner, earner_b: &Earner, pool: Money) -> Allocation {
    let income_a = earner_a.total_income().ore() as i128;
    let income_b = earner_b.total_income().ore() as i128;
    let total = income_a + income_b;

    if total == 0 {
        return Allocation {
            share_a: Money::zero(),
            share_b: Money::zero(),
            percent_a: 0.0,
            percent_b: 0.0,
            residual: pool,
        };
    }

    let pool_ore = pool.ore() as i128;
    let exact_a = pool_ore * income_a;
    let exact_b = pool_ore * income_b;

    let mut share_a = exact_a.div_euclid(total);
    let mut share_b = exact_b.div_euclid(total);
    let rest_a = exact_a.rem_euclid(total);
    let rest_b = exact_b.rem_euclid(total);

    // The two remainders sum to 0 or `total`; in the latter case one öre is
    // still unassigned.
    let unassigned = pool_ore - share_a - share_b;
    if unassigned > 0 {
        if rest_a >= rest_b {
            share_a += unassigned;
        } else {
            share_b += unassigned;
        }
    }

    let share_a = Money::from_ore(share_a as i64);
    let share_b = Money::from_ore(share_b as i64);

    Allocation {
        share_a,
        share_b,
        percent_a: income_a as f64 / total as f64,
        percent_b: income_b as f64 / total as f64,
        residual: pool - share_a - share_b,
    }
}
