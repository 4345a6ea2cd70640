//! Per-stage planning session and harness lifecycle.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PlanError;
use crate::solver::{SolveOptions, StagePlan, plan_stage};
use crate::traits::{Field, Item, Move};

/// Result state the harness reports for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodOutcome {
    Delivered,
    Failed,
}

/// Result state the harness reports for a whole stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    Completed,
    Failed,
    TurnLimit,
}

/// One stage's planning state: the computed plan plus replay cursors.
///
/// Built once at stage start; the harness then drains the plan period by
/// period and turn by turn. Dropping the session discards all per-stage
/// state, so the next stage starts from scratch.
pub struct StageSession {
    plan: StagePlan,
    period: Option<usize>,
    turn: usize,
    period_reports: Vec<(PeriodOutcome, i32)>,
    stage_report: Option<(StageOutcome, i32)>,
}

impl StageSession {
    /// Runs the full planning pipeline for one stage and keeps the result.
    pub fn plan<F: Field, I: Item>(
        field: &F,
        items: &[I],
        options: &SolveOptions,
    ) -> Result<Self, PlanError> {
        let plan = plan_stage(field, items, options)?;
        Ok(Self {
            plan,
            period: None,
            turn: 0,
            period_reports: Vec::new(),
            stage_report: None,
        })
    }

    /// Starts the next delivery period and returns the item ids to load, in
    /// visiting order.
    ///
    /// Panics if called more often than the stage has periods.
    pub fn begin_period(&mut self) -> &[usize] {
        let next = self.period.map_or(0, |p| p + 1);
        self.period = Some(next);
        self.turn = 0;
        debug!(period = next, items = ?self.plan.period_items[next], "period started");
        &self.plan.period_items[next]
    }

    /// Pops the next primitive move of the current period. Returns `None`
    /// once the period's queue is drained, or before any period started.
    pub fn next_action(&mut self) -> Option<Move> {
        let period = self.period?;
        let action = self.plan.period_actions[period].get(self.turn).copied();
        if action.is_some() {
            self.turn += 1;
        }
        action
    }

    /// Observability hook for the end of a period. The report is recorded;
    /// the plan for the stage is fixed and is not revised.
    pub fn finish_period(&mut self, outcome: PeriodOutcome, cost: i32) {
        info!(period = ?self.period, ?outcome, cost, "period finished");
        self.period_reports.push((outcome, cost));
    }

    /// Observability hook for the end of the stage.
    pub fn finish_stage(&mut self, outcome: StageOutcome, score: i32) {
        info!(?outcome, score, "stage finished");
        self.stage_report = Some((outcome, score));
    }

    /// The plan computed for this stage.
    pub fn stage_plan(&self) -> &StagePlan {
        &self.plan
    }

    /// Per-period reports received so far, in call order.
    pub fn period_reports(&self) -> &[(PeriodOutcome, i32)] {
        &self.period_reports
    }

    /// The stage report, once received.
    pub fn stage_report(&self) -> Option<(StageOutcome, i32)> {
        self.stage_report
    }
}
