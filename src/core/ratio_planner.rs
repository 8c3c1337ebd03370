use crate::core::numeric::{fib_sequence, golden_ratio};
use crate::domain::model::RatioPlan;
use crate::utils::error::{LoreError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Fibonacci terms normalised into the plan.
pub const PLAN_FIB_TERMS: usize = 12;

const PLAN_NOTES: &str =
    "Fibonacci-normalized proportions + golden ratio harmonics for architectural scaling.";

/// Builds proportional ratio plans and snaps values onto them.
#[derive(Debug, Clone, Copy)]
pub struct RatioPlanner {
    fib_terms: usize,
}

impl Default for RatioPlanner {
    fn default() -> Self {
        Self {
            fib_terms: PLAN_FIB_TERMS,
        }
    }
}

impl RatioPlanner {
    /// `fib_terms` must be between 1 and 93.
    pub fn with_fib_terms(fib_terms: usize) -> Result<Self> {
        if fib_terms == 0 {
            return Err(LoreError::InvalidLength {
                length: fib_terms,
                reason: "ratio plans need at least one Fibonacci term".to_string(),
            });
        }
        fib_sequence(fib_terms)?;
        Ok(Self { fib_terms })
    }

    pub fn fib_terms(&self) -> usize {
        self.fib_terms
    }

    /// Ratios are `fib[i] / fib[0]` followed by φ, φ² and 1/φ.
    pub fn build_plan(&self, base_unit: f64) -> Result<RatioPlan> {
        check_base_unit(base_unit)?;

        let fibs = fib_sequence(self.fib_terms)?;
        let anchor = fibs[0] as f64;
        let phi = golden_ratio();

        let mut ratios: Vec<f64> = fibs.iter().map(|&f| f as f64 / anchor).collect();
        ratios.extend([phi, phi * phi, 1.0 / phi]);

        Ok(RatioPlan {
            base_unit,
            ratios,
            notes: PLAN_NOTES.to_string(),
        })
    }

    pub fn snap(&self, base_unit: f64, query: f64) -> Result<f64> {
        check_query(query)?;
        self.build_plan(base_unit)?
            .snap(query)
            .ok_or(LoreError::InvalidQuery { value: query })
    }
}

fn check_base_unit(base_unit: f64) -> Result<()> {
    if !base_unit.is_finite() || base_unit <= 0.0 {
        return Err(LoreError::InvalidBaseUnit { value: base_unit });
    }
    Ok(())
}

fn check_query(query: f64) -> Result<()> {
    if !query.is_finite() {
        return Err(LoreError::InvalidQuery { value: query });
    }
    Ok(())
}

/// Memoises plans per base unit. Plans are pure functions of the base unit,
/// so two callers racing on the same miss both build the same value.
///
/// The cache is unbounded: it holds one plan per distinct `base_unit` bit
/// pattern until [`PlanCache::clear`] is called. Long-lived callers that snap
/// against arbitrary user-supplied units should clear it periodically.
#[derive(Debug, Default)]
pub struct PlanCache {
    planner: RatioPlanner,
    plans: RwLock<HashMap<u64, Arc<RatioPlan>>>,
}

impl PlanCache {
    pub fn new(planner: RatioPlanner) -> Self {
        Self {
            planner,
            plans: RwLock::new(HashMap::new()),
        }
    }

    pub fn plan(&self, base_unit: f64) -> Result<Arc<RatioPlan>> {
        check_base_unit(base_unit)?;
        let key = base_unit.to_bits();

        if let Some(plan) = self.read_cached(key) {
            return Ok(plan);
        }

        let built = Arc::new(self.planner.build_plan(base_unit)?);
        let mut plans = self.plans.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let plan = plans.entry(key).or_insert(built);
        tracing::debug!("Cached ratio plan for base unit {}", base_unit);
        Ok(Arc::clone(plan))
    }

    pub fn snap(&self, base_unit: f64, query: f64) -> Result<f64> {
        check_query(query)?;
        self.plan(base_unit)?
            .snap(query)
            .ok_or(LoreError::InvalidQuery { value: query })
    }

    pub fn len(&self) -> usize {
        self.plans
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached plan. Plans already handed out stay valid.
    pub fn clear(&self) {
        self.plans
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn read_cached(&self, key: u64) -> Option<Arc<RatioPlan>> {
        let plans = self.plans.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        plans.get(&key).cloned()
    }
}

/// Plan with the default 12 Fibonacci terms.
pub fn build_plan(base_unit: f64) -> Result<RatioPlan> {
    RatioPlanner::default().build_plan(base_unit)
}

/// Nearest element of `{base_unit * r}` to `query`.
pub fn snap(base_unit: f64, query: f64) -> Result<f64> {
    RatioPlanner::default().snap(base_unit, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_layout() {
        let plan = build_plan(1.0).unwrap();
        let phi = golden_ratio();
        assert_eq!(plan.ratios.len(), PLAN_FIB_TERMS + 3);
        assert_eq!(plan.ratios[0], 1.0);
        assert_eq!(plan.ratios[11], 144.0);
        assert_eq!(plan.ratios[12], phi);
        assert_eq!(plan.ratios[13], phi * phi);
        assert_eq!(plan.ratios[14], 1.0 / phi);
        assert!(plan.notes.contains("golden ratio"));
    }

    #[test]
    fn test_invalid_base_unit() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                build_plan(bad),
                Err(LoreError::InvalidBaseUnit { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_query() {
        assert!(matches!(
            snap(1.0, f64::NAN),
            Err(LoreError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_tie_goes_to_earlier_ratio() {
        // 4.0 is exactly 1.0 from both 3.0 and 5.0
        assert_eq!(snap(1.0, 4.0).unwrap(), 3.0);
    }

    #[test]
    fn test_planner_term_bounds() {
        assert!(RatioPlanner::with_fib_terms(0).is_err());
        assert!(RatioPlanner::with_fib_terms(94).is_err());
        let planner = RatioPlanner::with_fib_terms(5).unwrap();
        assert_eq!(planner.build_plan(1.0).unwrap().ratios.len(), 8);
    }

    #[test]
    fn test_cache_reuses_plans() {
        let cache = PlanCache::default();
        assert!(cache.is_empty());
        let first = cache.plan(2.5).unwrap();
        let second = cache.plan(2.5).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        cache.plan(3.0).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.plan(-1.0).is_err());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_clear_releases_plans() {
        let cache = PlanCache::default();
        let kept = cache.plan(1.5).unwrap();
        cache.plan(2.5).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(kept.base_unit, 1.5);

        let rebuilt = cache.plan(1.5).unwrap();
        assert!(!Arc::ptr_eq(&kept, &rebuilt));
        assert_eq!(*kept, *rebuilt);
        assert_eq!(cache.len(), 1);
    }
}
