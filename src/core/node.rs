use crate::config::toml_config::NodeConfig;
use crate::core::code_generator::CodeGenerator;
use crate::core::numeric::golden_ratio;
use crate::core::ratio_planner::{PlanCache, RatioPlanner};
use crate::core::usage::predict_usage;
use crate::domain::model::{NodeReport, PlanSummary, ProductSummary, SnapSummary};
use crate::domain::ports::{NativeCompute, QuantumBackend, StatusChecker};
use crate::domain::severity::{dns_severity_table, OctalAxes};
use crate::utils::error::Result;
use chrono::{Local, NaiveDateTime, Timelike};

/// Composes the code generator, the ratio planner and the best-effort
/// collaborators into one report.
pub struct LoreNode<S: StatusChecker, N: NativeCompute, Q: QuantumBackend> {
    config: NodeConfig,
    status: S,
    native: N,
    quantum: Q,
    generator: CodeGenerator,
    plans: PlanCache,
}

impl<S: StatusChecker, N: NativeCompute, Q: QuantumBackend> LoreNode<S, N, Q> {
    pub fn new(config: NodeConfig, status: S, native: N, quantum: Q) -> Result<Self> {
        let generator = CodeGenerator::new(config.digest_mode());
        let planner = RatioPlanner::with_fib_terms(config.ratios.fib_terms)?;
        Ok(Self {
            config,
            status,
            native,
            quantum,
            generator,
            plans: PlanCache::new(planner),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Seed for a given day: `"{product}-{YYYY-MM-DD}"`.
    pub fn seed_for(&self, now: NaiveDateTime) -> String {
        format!("{}-{}", self.config.product.name, now.date().format("%Y-%m-%d"))
    }

    pub async fn run(&self) -> Result<NodeReport> {
        self.run_at(Local::now().naive_local()).await
    }

    pub async fn run_at(&self, now: NaiveDateTime) -> Result<NodeReport> {
        let repo_access = self.status.check().await;
        tracing::info!("Repo OK: {}", repo_access);

        let hour = now.hour();
        let usage = predict_usage(i64::from(hour));
        tracing::info!("Predicted usage @{:02}: {}", hour, usage);

        let dns_labels = dns_severity_table();
        let (y_labels, x_labels) = OctalAxes::default().labels();
        tracing::info!("DNS severity spectrum: {:?}", dns_labels);
        tracing::info!("yOct labels: {:?}", y_labels);
        tracing::info!("xOct labels: {:?}", x_labels);

        let seed = self.seed_for(now);
        let barcode_seeded = self
            .generator
            .generate(&seed, self.config.product.code_length)?;
        tracing::info!("Seeded Fibonacci barcode: {}", barcode_seeded);
        tracing::info!("Golden-step barcode (fixed): {}", self.config.product.barcode_fixed);

        let plan = self.plans.plan(self.config.ratios.base_unit)?;
        tracing::info!("Ratio plan unit: {} | ratios: {:?}", plan.base_unit, plan.ratios);

        let query = self.config.ratios.snap_query;
        let snapped = self.plans.snap(plan.base_unit, query)?;
        tracing::info!("Snap {} -> nearest proportional length: {}", query, snapped);

        let native_result = if self.config.native.enabled {
            self.native
                .compute(self.config.native.cosmos_value, self.config.native.aeration)
        } else {
            tracing::info!("Native compute disabled");
            None
        };
        tracing::info!("C library result: {:?}", native_result);

        let quantum = if self.config.quantum.enabled {
            self.quantum.run_fib_pulse(self.config.quantum.fib_terms)
        } else {
            tracing::info!("Quantum pulse disabled");
            None
        };
        tracing::info!("Quantum result: {:?}", quantum);

        Ok(NodeReport {
            repo_access,
            hour,
            usage_window: usage.label().to_string(),
            dns_labels: dns_labels
                .into_iter()
                .map(|(level, label)| (level, label.to_string()))
                .collect(),
            y_oct_labels: y_labels.into_iter().map(String::from).collect(),
            x_oct_labels: x_labels.into_iter().map(String::from).collect(),
            product: ProductSummary {
                name: self.config.product.name.clone(),
                price_usd: self.config.product.price_usd,
                barcode_fixed: self.config.product.barcode_fixed.clone(),
                barcode_seeded,
                seed,
            },
            ratio_plan: PlanSummary {
                unit: plan.base_unit,
                ratios: plan.ratios.clone(),
                ratios_count: plan.ratios.len(),
                phi: golden_ratio(),
            },
            snap_example: SnapSummary { query, snapped },
            native_result,
            quantum,
        })
    }
}
