//! Admission controller
//!
//! Composes the structural validator, schema store, and expression analyzer
//! into one per-document pipeline: structural checks, then schema
//! validation, then (for policies) nested rule expression validation,
//! short-circuiting on the first failure. Metrics are recorded exactly once
//! per call regardless of which stage failed.
//!
//! Lifecycle is uninitialized → initialized → operating. Initialization
//! failure is fatal: the controller never enters operation with partially
//! loaded schemas, and every later call fails fast.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::expr::ExpressionAnalyzer;
use crate::model::{AutomationRule, Policy, Workload};
use crate::observability::Logger;
use crate::schema::{SchemaStore, POLICY_SCHEMA_NAME, WORKLOAD_SCHEMA_NAME};
use crate::structural::{FieldValidator, StructuralValidator};

use super::errors::{AdmissionError, AdmissionResult};
use super::metrics::{MetricsSnapshot, ValidationMetrics};

/// Orchestrates admission-time validation and owns the shared metrics.
pub struct AdmissionController {
    structural: Option<FieldValidator>,
    schemas: Option<SchemaStore>,
    expressions: Option<ExpressionAnalyzer>,
    metrics: RwLock<ValidationMetrics>,
}

impl AdmissionController {
    /// Creates an uninitialized controller. Every validation entry point
    /// fails with `NotInitialized` until [`Self::initialize`] succeeds.
    pub fn new() -> Self {
        Self {
            structural: None,
            schemas: None,
            expressions: None,
            metrics: RwLock::new(ValidationMetrics::default()),
        }
    }

    /// Constructs the three sub-validators and loads the built-in schemas.
    ///
    /// A schema compile failure is fatal to initialization; the controller
    /// stays uninitialized.
    pub fn initialize(&mut self) -> AdmissionResult<()> {
        let structural = FieldValidator::new()
            .map_err(|e| initialization(AdmissionError::Structural(e)))?;
        let schemas = SchemaStore::with_builtin()
            .map_err(|e| initialization(AdmissionError::Schema(e)))?;
        let expressions = ExpressionAnalyzer::new()
            .map_err(|e| initialization(AdmissionError::Expression(e)))?;

        let loaded = schemas.names().join(",");
        self.structural = Some(structural);
        self.schemas = Some(schemas);
        self.expressions = Some(expressions);

        Logger::info("VALIDATOR_INITIALIZED", &[("schemas", loaded.as_str())]);
        Ok(())
    }

    /// Validates a policy document: structural → schema → nested rule
    /// expressions.
    pub fn validate_policy(&self, policy: &Policy) -> AdmissionResult<()> {
        let (structural, schemas, expressions) = self.components()?;
        self.record(|| {
            structural.validate_policy(policy)?;

            let value = serde_json::to_value(policy).map_err(encode_error)?;
            schemas.validate_value(POLICY_SCHEMA_NAME, &value)?;

            for rule in &policy.spec.rules {
                expressions.validate_rule(rule)?;
            }
            Ok(())
        })?;

        Logger::info(
            "POLICY_ADMITTED",
            &[
                ("policy_name", policy.metadata.name.as_str()),
                ("policy_type", policy.metadata.policy_type.as_str()),
            ],
        );
        Ok(())
    }

    /// Validates a workload document: structural → schema.
    pub fn validate_workload(&self, workload: &Workload) -> AdmissionResult<()> {
        let (structural, schemas, _) = self.components()?;
        self.record(|| {
            structural.validate_workload(workload)?;

            let value = serde_json::to_value(workload).map_err(encode_error)?;
            schemas.validate_value(WORKLOAD_SCHEMA_NAME, &value)?;
            Ok(())
        })?;

        Logger::info(
            "WORKLOAD_ADMITTED",
            &[
                ("workload_id", workload.id.as_str()),
                ("workload_type", workload.workload_type.as_str()),
            ],
        );
        Ok(())
    }

    /// Validates an automation rule: structural → trigger/action taxonomy
    /// and guard conditions.
    pub fn validate_automation_rule(&self, rule: &AutomationRule) -> AdmissionResult<()> {
        let (structural, _, expressions) = self.components()?;
        self.record(|| {
            structural.validate_automation_rule(rule)?;
            expressions.validate_automation_rule(rule)?;
            Ok(())
        })?;

        Logger::info(
            "AUTOMATION_RULE_ADMITTED",
            &[("rule_trigger", rule.trigger.as_str())],
        );
        Ok(())
    }

    /// Validates a standalone expression string.
    pub fn validate_expression(&self, text: &str) -> AdmissionResult<()> {
        let (structural, _, expressions) = self.components()?;
        self.record(|| {
            structural.validate_expression(text)?;
            expressions.validate_expression(text)?;
            Ok(())
        })?;

        Logger::info("EXPRESSION_ADMITTED", &[]);
        Ok(())
    }

    /// Cheap liveness probe: fails when any sub-validator is absent, does
    /// not re-run validation logic.
    pub fn health(&self) -> AdmissionResult<()> {
        self.components().map(|_| ())
    }

    /// Returns a read-consistent metrics snapshot.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.read_metrics().snapshot()
    }

    /// Resets metrics to zero. Loaded schemas and compiled state are
    /// untouched.
    pub fn reset_metrics(&self) {
        *self.write_metrics() = ValidationMetrics::default();
    }

    /// Direct access to the schema store, for callers that need standalone
    /// schema checks.
    pub fn schema_store(&self) -> AdmissionResult<&SchemaStore> {
        self.schemas.as_ref().ok_or(AdmissionError::NotInitialized)
    }

    /// Direct access to the expression analyzer.
    pub fn expression_analyzer(&self) -> AdmissionResult<&ExpressionAnalyzer> {
        self.expressions
            .as_ref()
            .ok_or(AdmissionError::NotInitialized)
    }

    /// Direct access to the structural validator.
    pub fn structural_validator(&self) -> AdmissionResult<&FieldValidator> {
        self.structural
            .as_ref()
            .ok_or(AdmissionError::NotInitialized)
    }

    fn components(
        &self,
    ) -> AdmissionResult<(&FieldValidator, &SchemaStore, &ExpressionAnalyzer)> {
        match (&self.structural, &self.schemas, &self.expressions) {
            (Some(structural), Some(schemas), Some(expressions)) => {
                Ok((structural, schemas, expressions))
            }
            _ => Err(AdmissionError::NotInitialized),
        }
    }

    /// Runs one validation with full metrics accounting: `total` is
    /// incremented before work begins, the outcome counter and elapsed
    /// duration land exactly once on exit whichever stage failed.
    fn record<T>(&self, run: impl FnOnce() -> AdmissionResult<T>) -> AdmissionResult<T> {
        self.write_metrics().total += 1;

        let start = Instant::now();
        let result = run();
        let elapsed = start.elapsed();

        self.write_metrics().record(result.is_ok(), elapsed);
        result
    }

    // A poisoned metrics lock only means a panic interrupted another
    // thread's update; the counters remain usable.
    fn read_metrics(&self) -> RwLockReadGuard<'_, ValidationMetrics> {
        self.metrics.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_metrics(&self) -> RwLockWriteGuard<'_, ValidationMetrics> {
        self.metrics.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new()
    }
}

fn initialization(cause: AdmissionError) -> AdmissionError {
    AdmissionError::Initialization(Box::new(cause))
}

fn encode_error(e: serde_json::Error) -> AdmissionError {
    AdmissionError::Schema(crate::schema::SchemaError::PayloadParse {
        format: "JSON",
        reason: e.to_string(),
    })
}
