use serde::{Deserialize, Serialize};
use ecocart_catalog::{ConditionTier, ExpiryTier, PersonaType};
use crate::error::PricingError;

/// One cell of the discount table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountRule {
    pub expiry_tier: ExpiryTier,
    pub condition_tier: ConditionTier,
    pub persona: PersonaType,
    pub discount_percent: u8,
}

// [expiry][condition][persona], persona order Student, Loyal, Strategic
type Grid = [[[u8; 3]; 3]; 4];

const STANDARD_GRID: Grid = [
    // Fresh
    [[0, 0, 0], [10, 10, 0], [15, 20, 0]],
    // Medium
    [[10, 15, 0], [15, 20, 5], [25, 30, 10]],
    // HighRisk
    [[20, 25, 5], [30, 35, 10], [40, 45, 15]],
    // Critical
    [[40, 50, 10], [50, 60, 15], [60, 70, 20]],
];

/// Exhaustive (expiry, condition, persona) → discount lookup.
///
/// Every combination has exactly one cell; there is no partial or
/// best-match resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountTable {
    grid: Grid,
}

impl DiscountTable {
    pub fn standard() -> Self {
        Self { grid: STANDARD_GRID }
    }

    /// Build a table from an explicit rule list.
    ///
    /// The list must cover all 36 combinations exactly once, with
    /// discounts that are multiples of 5 in `0..=100`.
    pub fn from_rules(rules: &[DiscountRule]) -> Result<Self, PricingError> {
        let mut grid: Grid = [[[0; 3]; 3]; 4];
        let mut seen = [[[false; 3]; 3]; 4];

        for rule in rules {
            if rule.discount_percent > 100 || rule.discount_percent % 5 != 0 {
                return Err(PricingError::InvalidRuleTable(format!(
                    "discount {}% for {:?}/{:?}/{:?} is not a multiple of 5 in 0..=100",
                    rule.discount_percent, rule.expiry_tier, rule.condition_tier, rule.persona
                )));
            }
            let (e, c, p) = index(rule.expiry_tier, rule.condition_tier, rule.persona);
            if seen[e][c][p] {
                return Err(PricingError::InvalidRuleTable(format!(
                    "duplicate rule for {:?}/{:?}/{:?}",
                    rule.expiry_tier, rule.condition_tier, rule.persona
                )));
            }
            seen[e][c][p] = true;
            grid[e][c][p] = rule.discount_percent;
        }

        let missing = seen.iter().flatten().flatten().filter(|s| !**s).count();
        if missing > 0 {
            return Err(PricingError::InvalidRuleTable(format!(
                "{} of 36 combinations have no rule",
                missing
            )));
        }

        Ok(Self { grid })
    }

    pub fn lookup(&self, expiry: ExpiryTier, condition: ConditionTier, persona: PersonaType) -> u8 {
        let (e, c, p) = index(expiry, condition, persona);
        self.grid[e][c][p]
    }

    /// All cells in expiry, condition, persona order
    pub fn rules(&self) -> Vec<DiscountRule> {
        let mut rules = Vec::with_capacity(36);
        for expiry_tier in ExpiryTier::ALL {
            for condition_tier in ConditionTier::ALL {
                for persona in PersonaType::ALL {
                    rules.push(DiscountRule {
                        expiry_tier,
                        condition_tier,
                        persona,
                        discount_percent: self.lookup(expiry_tier, condition_tier, persona),
                    });
                }
            }
        }
        rules
    }
}

impl Default for DiscountTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn index(expiry: ExpiryTier, condition: ConditionTier, persona: PersonaType) -> (usize, usize, usize) {
    let e = match expiry {
        ExpiryTier::Fresh => 0,
        ExpiryTier::Medium => 1,
        ExpiryTier::HighRisk => 2,
        ExpiryTier::Critical => 3,
    };
    let c = match condition {
        ConditionTier::Perfect => 0,
        ConditionTier::SlightlyBruised => 1,
        ConditionTier::DentedBox => 2,
    };
    let p = match persona {
        PersonaType::Student => 0,
        PersonaType::Loyal => 1,
        PersonaType::Strategic => 2,
    };
    (e, c, p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_perfect_is_never_discounted() {
        let table = DiscountTable::standard();
        for persona in PersonaType::ALL {
            assert_eq!(table.lookup(ExpiryTier::Fresh, ConditionTier::Perfect, persona), 0);
        }
    }

    #[test]
    fn test_generosity_ordering_holds_for_every_cell() {
        let table = DiscountTable::standard();
        for expiry in ExpiryTier::ALL {
            for condition in ConditionTier::ALL {
                let strategic = table.lookup(expiry, condition, PersonaType::Strategic);
                let student = table.lookup(expiry, condition, PersonaType::Student);
                let loyal = table.lookup(expiry, condition, PersonaType::Loyal);
                assert!(
                    strategic <= student && student <= loyal,
                    "{:?}/{:?}: {} {} {}",
                    expiry, condition, strategic, student, loyal
                );
            }
        }
    }

    #[test]
    fn test_selected_cells() {
        let table = DiscountTable::standard();
        assert_eq!(table.lookup(ExpiryTier::Critical, ConditionTier::DentedBox, PersonaType::Loyal), 70);
        assert_eq!(table.lookup(ExpiryTier::Medium, ConditionTier::SlightlyBruised, PersonaType::Strategic), 5);
        assert_eq!(table.lookup(ExpiryTier::HighRisk, ConditionTier::Perfect, PersonaType::Student), 20);
        assert_eq!(table.lookup(ExpiryTier::Fresh, ConditionTier::DentedBox, PersonaType::Loyal), 20);
    }

    #[test]
    fn test_rules_enumerate_full_table() {
        let table = DiscountTable::standard();
        let rules = table.rules();
        assert_eq!(rules.len(), 36);
        assert!(rules.iter().all(|r| r.discount_percent % 5 == 0 && r.discount_percent <= 70));

        let rebuilt = DiscountTable::from_rules(&rules).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_from_rules_rejects_incomplete_or_invalid_tables() {
        let mut rules = DiscountTable::standard().rules();

        let last = rules.pop().unwrap();
        assert!(matches!(DiscountTable::from_rules(&rules), Err(PricingError::InvalidRuleTable(_))));

        rules.push(last);
        rules.push(last);
        assert!(matches!(DiscountTable::from_rules(&rules), Err(PricingError::InvalidRuleTable(_))));

        rules.pop();
        rules[0].discount_percent = 12;
        assert!(matches!(DiscountTable::from_rules(&rules), Err(PricingError::InvalidRuleTable(_))));
    }
}
