//! Autonomous state machine.
//!
//! One pass is `InitialShot -> Centering -> Seeking -> Repositioning ->
//! Shooting`; after the configured number of passes the sequencer is `Done`.
//! Every call to [`Sequencer::step`] issues at most one set of drive commands
//! and returns immediately.

use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::{SensorLimits, SequencerConfig};
use crate::context::AutoContext;
use crate::error::{SensorError, SequenceError};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoState {
    InitialShot,
    Centering,
    Seeking,
    Repositioning,
    Shooting,
    Done,
}

impl std::fmt::Display for AutoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AutoState::InitialShot => "initial shot",
            AutoState::Centering => "centering",
            AutoState::Seeking => "seeking",
            AutoState::Repositioning => "repositioning",
            AutoState::Shooting => "shooting",
            AutoState::Done => "done",
        })
    }
}

/// Result of one sequencer cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// Still working on the current state; call again next cycle.
    Pending,
    /// Moved to a new state this cycle.
    Advanced(AutoState),
    /// All passes completed.
    Finished,
}

/// Horizontal steering decision for a normalized target x position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Steer {
    Left,
    Right,
    Centered,
}

fn steer(x: f32, tolerance: f32) -> Steer {
    if x < 0.5 - tolerance {
        Steer::Left
    } else if x > 0.5 + tolerance {
        Steer::Right
    } else {
        Steer::Centered
    }
}

pub struct Sequencer {
    config: SequencerConfig,
    state: AutoState,
    passes_done: u32,
    cycles_in_state: u32,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            state: AutoState::InitialShot,
            passes_done: 0,
            cycles_in_state: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> AutoState {
        self.state
    }

    #[inline]
    pub fn passes_done(&self) -> u32 {
        self.passes_done
    }

    #[inline]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Run one cycle of the current state.
    ///
    /// Errors stop the drive and end the period: the sequencer is `Done`
    /// afterwards.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, ctx), fields(state = %self.state))
    )]
    pub fn step(&mut self, ctx: &mut AutoContext<'_>) -> Result<StepOutcome, SequenceError> {
        if self.state == AutoState::Done {
            ctx.drive.stop();
            return Ok(StepOutcome::Finished);
        }
        match self.poll(ctx) {
            Ok(Some(next)) => Ok(self.transition(next)),
            Ok(None) => {
                self.cycles_in_state += 1;
                let budget = self.budget();
                if self.cycles_in_state >= budget {
                    let err = SequenceError::BudgetExhausted {
                        state: self.state,
                        cycles: self.cycles_in_state,
                    };
                    self.abort(ctx, &err);
                    return Err(err);
                }
                Ok(StepOutcome::Pending)
            }
            Err(err) => {
                self.abort(ctx, &err);
                Err(err)
            }
        }
    }

    /// Step until `Finished`, an error, or `max_cycles` cycles.
    ///
    /// Returns `Some(cycles)` when the sequence finished within the limit and
    /// `None` when the limit ran out first.
    pub fn run(
        &mut self,
        ctx: &mut AutoContext<'_>,
        max_cycles: u32,
    ) -> Result<Option<u32>, SequenceError> {
        for cycle in 1..=max_cycles {
            if self.step(ctx)? == StepOutcome::Finished {
                return Ok(Some(cycle));
            }
        }
        Ok(None)
    }

    fn budget(&self) -> u32 {
        let b = &self.config.budgets;
        match self.state {
            AutoState::InitialShot => b.initial_shot,
            AutoState::Centering => b.centering,
            AutoState::Seeking => b.seeking,
            AutoState::Repositioning => b.repositioning,
            AutoState::Shooting | AutoState::Done => u32::MAX,
        }
    }

    fn transition(&mut self, next: AutoState) -> StepOutcome {
        log::info!(
            "autonomous: {} -> {next} ({}/{} passes done)",
            self.state,
            self.passes_done,
            self.config.passes
        );
        self.state = next;
        self.cycles_in_state = 0;
        if next == AutoState::Done {
            StepOutcome::Finished
        } else {
            StepOutcome::Advanced(next)
        }
    }

    fn abort(&mut self, ctx: &mut AutoContext<'_>, err: &SequenceError) {
        log::warn!("autonomous aborted in {}: {err}", self.state);
        ctx.drive.stop();
        self.state = AutoState::Done;
        self.cycles_in_state = 0;
    }

    /// One poll of the current state: `Some(next)` when it completes.
    fn poll(&mut self, ctx: &mut AutoContext<'_>) -> Result<Option<AutoState>, SequenceError> {
        let cfg = &self.config;
        match self.state {
            AutoState::InitialShot => {
                if self.cycles_in_state == 0 {
                    ctx.encoder.reset();
                }
                let count = check_count(ctx.encoder.count()?, &cfg.sensor_limits)?;
                if count >= cfg.initial_shot_counts {
                    ctx.drive.stop();
                    ctx.launcher.fire();
                    return Ok(Some(AutoState::Centering));
                }
                ctx.drive.set(cfg.drive_speed, cfg.drive_speed);
                Ok(None)
            }
            AutoState::Centering => match ctx.targets.acquire() {
                Some(fix) => match steer(fix.centroid.x, cfg.center_tolerance) {
                    Steer::Centered => {
                        ctx.drive.stop();
                        Ok(Some(AutoState::Seeking))
                    }
                    dir => {
                        self.turn_toward(ctx, dir);
                        Ok(None)
                    }
                },
                None => {
                    log::debug!("centering: no target in view");
                    self.turn_toward(ctx, Steer::Left);
                    Ok(None)
                }
            },
            AutoState::Seeking => {
                if ctx.capture.captured()? {
                    ctx.drive.stop();
                    return Ok(Some(AutoState::Repositioning));
                }
                match ctx.targets.acquire() {
                    Some(fix) => match steer(fix.centroid.x, cfg.center_tolerance) {
                        Steer::Centered => ctx.drive.set(cfg.seek_speed, cfg.seek_speed),
                        dir => self.turn_toward(ctx, dir),
                    },
                    None => {
                        log::debug!("seeking: target lost");
                        self.turn_toward(ctx, Steer::Left);
                    }
                }
                Ok(None)
            }
            AutoState::Repositioning => {
                let heading = check_heading(ctx.gyro.heading_deg()?, &cfg.sensor_limits)?;
                let error = heading - cfg.reference_heading_deg;
                if error.abs() <= cfg.heading_tolerance_deg {
                    ctx.drive.stop();
                    return Ok(Some(AutoState::Shooting));
                }
                let dir = if error > 0.0 { Steer::Left } else { Steer::Right };
                self.turn_toward(ctx, dir);
                Ok(None)
            }
            AutoState::Shooting => {
                ctx.drive.stop();
                ctx.launcher.fire();
                self.passes_done += 1;
                if self.passes_done >= cfg.passes {
                    Ok(Some(AutoState::Done))
                } else {
                    Ok(Some(AutoState::InitialShot))
                }
            }
            AutoState::Done => Ok(None),
        }
    }

    fn turn_toward(&self, ctx: &mut AutoContext<'_>, dir: Steer) {
        let s = self.config.turn_speed;
        match dir {
            Steer::Left => ctx.drive.set(-s, s),
            Steer::Right => ctx.drive.set(s, -s),
            Steer::Centered => ctx.drive.stop(),
        }
    }
}

fn check_heading(value: f64, limits: &SensorLimits) -> Result<f64, SensorError> {
    if !value.is_finite() || value.abs() > limits.max_abs_heading_deg {
        return Err(SensorError::Implausible {
            sensor: "gyro",
            value,
        });
    }
    Ok(value)
}

fn check_count(value: i64, limits: &SensorLimits) -> Result<i64, SensorError> {
    if !(0..=limits.max_encoder_count).contains(&value) {
        return Err(SensorError::Implausible {
            sensor: "encoder",
            value: value as f64,
        });
    }
    Ok(value)
}
