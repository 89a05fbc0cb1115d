use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use goal_targets_auto::{
    AutoContext, AutoState, CaptureSensor, DriveActuator, GoalClass, HeadingSensor, Launcher,
    PositionSensor, SensorError, SequenceError, Sequencer, SequencerConfig, StepOutcome, TankDrive,
    TargetFix, TargetSource,
};
use nalgebra::Point2;

#[derive(Clone)]
struct SpeedCell(Rc<Cell<f32>>);

impl DriveActuator for SpeedCell {
    fn set_speed(&mut self, speed: f32) {
        self.0.set(speed);
    }
}

/// Encoder that advances by `step` counts per read.
struct RampEncoder {
    value: i64,
    step: i64,
    resets: u32,
}

impl PositionSensor for RampEncoder {
    fn count(&mut self) -> Result<i64, SensorError> {
        self.value += self.step;
        Ok(self.value)
    }

    fn reset(&mut self) {
        self.value = 0;
        self.resets += 1;
    }
}

/// Gyro replaying a script, then holding its last value.
struct ScriptedGyro {
    script: VecDeque<f64>,
    last: f64,
}

impl ScriptedGyro {
    fn new(values: &[f64]) -> Self {
        Self {
            script: values.iter().copied().collect(),
            last: 0.0,
        }
    }
}

impl HeadingSensor for ScriptedGyro {
    fn heading_deg(&mut self) -> Result<f64, SensorError> {
        if let Some(v) = self.script.pop_front() {
            self.last = v;
        }
        Ok(self.last)
    }
}

/// Capture switch that closes after `open_reads` reads.
struct CountdownSwitch {
    open_reads: u32,
}

impl CaptureSensor for CountdownSwitch {
    fn captured(&mut self) -> Result<bool, SensorError> {
        if self.open_reads == 0 {
            return Ok(true);
        }
        self.open_reads -= 1;
        Ok(false)
    }
}

#[derive(Default)]
struct CountingLauncher {
    shots: u32,
}

impl Launcher for CountingLauncher {
    fn fire(&mut self) {
        self.shots += 1;
    }
}

fn fix_at(x: f32) -> TargetFix {
    TargetFix {
        class: GoalClass::HighGoal,
        centroid: Point2::new(x, 0.5),
        distance_ft: Some(12.0),
    }
}

struct Rig {
    left: Rc<Cell<f32>>,
    right: Rc<Cell<f32>>,
    drive: TankDrive,
    gyro: ScriptedGyro,
    encoder: RampEncoder,
    capture: CountdownSwitch,
    launcher: CountingLauncher,
}

impl Rig {
    fn new() -> Self {
        let left = Rc::new(Cell::new(0.0));
        let right = Rc::new(Cell::new(0.0));
        let drive = TankDrive::new()
            .with_left(SpeedCell(left.clone()))
            .with_left(SpeedCell(left.clone()))
            .with_right(SpeedCell(right.clone()))
            .with_right(SpeedCell(right.clone()));
        Self {
            left,
            right,
            drive,
            gyro: ScriptedGyro::new(&[]),
            encoder: RampEncoder {
                value: 0,
                step: 1000,
                resets: 0,
            },
            capture: CountdownSwitch { open_reads: 0 },
            launcher: CountingLauncher::default(),
        }
    }

    fn ctx<'a>(&'a mut self, targets: &'a mut dyn TargetSource) -> AutoContext<'a> {
        AutoContext {
            drive: &mut self.drive,
            gyro: &mut self.gyro,
            encoder: &mut self.encoder,
            capture: &mut self.capture,
            launcher: &mut self.launcher,
            targets,
        }
    }

    fn speeds(&self) -> (f32, f32) {
        (self.left.get(), self.right.get())
    }
}

#[test]
fn completes_exactly_two_passes_with_cooperative_oracles() {
    let mut rig = Rig::new();
    let mut targets = || Some(fix_at(0.5));
    let mut seq = Sequencer::new(SequencerConfig::default());

    let mut trace = Vec::new();
    for _ in 0..100 {
        let outcome = seq.step(&mut rig.ctx(&mut targets)).unwrap();
        match outcome {
            StepOutcome::Advanced(s) => trace.push(s),
            StepOutcome::Finished => {
                trace.push(AutoState::Done);
                break;
            }
            StepOutcome::Pending => panic!("oracles satisfy every state in one cycle"),
        }
    }

    let pass = [
        AutoState::Centering,
        AutoState::Seeking,
        AutoState::Repositioning,
        AutoState::Shooting,
    ];
    let mut expected = pass.to_vec();
    expected.push(AutoState::InitialShot);
    expected.extend_from_slice(&pass);
    expected.push(AutoState::Done);

    assert_eq!(trace, expected);
    assert_eq!(seq.passes_done(), 2);
    assert_eq!(seq.state(), AutoState::Done);
    // Initial shot plus the final shot of each pass.
    assert_eq!(rig.launcher.shots, 4);
    assert_eq!(rig.encoder.resets, 2);
    assert_eq!(rig.speeds(), (0.0, 0.0));

    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Finished));
    assert_eq!(rig.launcher.shots, 4);
}

#[test]
fn initial_shot_drives_until_encoder_target() {
    let mut rig = Rig::new();
    rig.encoder.step = 10;
    let mut targets = || -> Option<TargetFix> { None };
    let cfg = SequencerConfig {
        initial_shot_counts: 35,
        ..SequencerConfig::default()
    };
    let mut seq = Sequencer::new(cfg);

    for _ in 0..3 {
        assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
        assert_eq!(rig.speeds(), (1.0, 1.0));
    }
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Ok(StepOutcome::Advanced(AutoState::Centering))
    );
    assert_eq!(rig.launcher.shots, 1);
    assert_eq!(rig.speeds(), (0.0, 0.0));
}

#[test]
fn centering_turns_toward_target_then_stops() {
    let mut rig = Rig::new();
    let positions = RefCell::new(VecDeque::from(vec![0.2, 0.8, 0.52]));
    let mut targets = || positions.borrow_mut().pop_front().map(fix_at);
    let mut seq = Sequencer::new(SequencerConfig::default());

    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Ok(StepOutcome::Advanced(AutoState::Centering))
    );

    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    assert_eq!(rig.speeds(), (-0.5, 0.5));
    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    assert_eq!(rig.speeds(), (0.5, -0.5));
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Ok(StepOutcome::Advanced(AutoState::Seeking))
    );
    assert_eq!(rig.speeds(), (0.0, 0.0));
}

#[test]
fn seeking_drives_until_capture() {
    let mut rig = Rig::new();
    rig.capture.open_reads = 3;
    let mut targets = || Some(fix_at(0.5));
    let mut seq = Sequencer::new(SequencerConfig::default());

    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    assert_eq!(seq.state(), AutoState::Seeking);

    for _ in 0..3 {
        assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
        assert_eq!(rig.speeds(), (1.0, 1.0));
    }
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Ok(StepOutcome::Advanced(AutoState::Repositioning))
    );
}

#[test]
fn repositioning_turns_back_to_reference_heading() {
    let mut rig = Rig::new();
    rig.gyro = ScriptedGyro::new(&[30.0, -20.0, 1.5]);
    let mut targets = || Some(fix_at(0.5));
    let mut seq = Sequencer::new(SequencerConfig::default());

    for _ in 0..3 {
        seq.step(&mut rig.ctx(&mut targets)).unwrap();
    }
    assert_eq!(seq.state(), AutoState::Repositioning);

    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    assert_eq!(rig.speeds(), (-0.5, 0.5));
    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    assert_eq!(rig.speeds(), (0.5, -0.5));
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Ok(StepOutcome::Advanced(AutoState::Shooting))
    );
}

#[test]
fn missing_target_exhausts_centering_budget() {
    let mut rig = Rig::new();
    let mut targets = || -> Option<TargetFix> { None };
    let mut cfg = SequencerConfig::default();
    cfg.budgets.centering = 5;
    let mut seq = Sequencer::new(cfg);

    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    for _ in 0..4 {
        assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
        assert_eq!(rig.speeds(), (-0.5, 0.5));
    }
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Err(SequenceError::BudgetExhausted {
            state: AutoState::Centering,
            cycles: 5
        })
    );
    assert_eq!(seq.state(), AutoState::Done);
    assert_eq!(rig.speeds(), (0.0, 0.0));
}

#[test]
fn implausible_gyro_aborts_the_period() {
    let mut rig = Rig::new();
    rig.gyro = ScriptedGyro::new(&[f64::NAN]);
    let mut targets = || Some(fix_at(0.5));
    let mut seq = Sequencer::new(SequencerConfig::default());

    let err = seq.run(&mut rig.ctx(&mut targets), 50).unwrap_err();
    assert!(matches!(
        err,
        SequenceError::Sensor(SensorError::Implausible { sensor: "gyro", .. })
    ));
    assert_eq!(seq.state(), AutoState::Done);
    assert_eq!(rig.speeds(), (0.0, 0.0));
    assert_eq!(rig.launcher.shots, 1);
}

#[test]
fn negative_encoder_count_is_a_fault() {
    let mut rig = Rig::new();
    rig.encoder.step = -1;
    let mut targets = || -> Option<TargetFix> { None };
    let mut seq = Sequencer::new(SequencerConfig::default());

    assert!(matches!(
        seq.step(&mut rig.ctx(&mut targets)),
        Err(SequenceError::Sensor(SensorError::Implausible {
            sensor: "encoder",
            ..
        }))
    ));
}

struct FailingSwitch;

impl CaptureSensor for FailingSwitch {
    fn captured(&mut self) -> Result<bool, SensorError> {
        Err(SensorError::Fault {
            sensor: "limit switch",
            reason: "digital input unavailable".into(),
        })
    }
}

#[test]
fn capture_sensor_fault_is_escalated() {
    let mut rig = Rig::new();
    let mut switch = FailingSwitch;
    let mut targets = || Some(fix_at(0.5));
    let mut seq = Sequencer::new(SequencerConfig::default());

    let mut ctx = AutoContext {
        drive: &mut rig.drive,
        gyro: &mut rig.gyro,
        encoder: &mut rig.encoder,
        capture: &mut switch,
        launcher: &mut rig.launcher,
        targets: &mut targets,
    };
    let err = seq.run(&mut ctx, 10).unwrap_err();
    assert_eq!(err.to_string(), "limit switch read failed: digital input unavailable");
    assert_eq!(seq.state(), AutoState::Done);
}

#[test]
fn single_pass_configuration() {
    let mut rig = Rig::new();
    let mut targets = || Some(fix_at(0.5));
    let cfg = SequencerConfig {
        passes: 1,
        ..SequencerConfig::default()
    };
    let mut seq = Sequencer::new(cfg);
    let cycles = seq.run(&mut rig.ctx(&mut targets), 100).unwrap();
    assert_eq!(cycles, Some(5));
    assert_eq!(seq.passes_done(), 1);
    assert_eq!(rig.launcher.shots, 2);
}

#[test]
fn run_distinguishes_finishing_on_the_last_cycle_from_running_out() {
    let mut rig = Rig::new();
    let mut targets = || Some(fix_at(0.5));
    let cfg = SequencerConfig {
        passes: 1,
        ..SequencerConfig::default()
    };

    let mut seq = Sequencer::new(cfg.clone());
    assert_eq!(seq.run(&mut rig.ctx(&mut targets), 5), Ok(Some(5)));

    let mut seq = Sequencer::new(cfg);
    assert_eq!(seq.run(&mut rig.ctx(&mut targets), 4), Ok(None));
    assert_eq!(seq.state(), AutoState::Shooting);
}

#[test]
fn seeking_budget_exhausts_without_capture() {
    let mut rig = Rig::new();
    rig.capture = CountdownSwitch {
        open_reads: u32::MAX,
    };
    let mut targets = || Some(fix_at(0.5));
    let mut cfg = SequencerConfig::default();
    cfg.budgets.seeking = 4;
    let mut seq = Sequencer::new(cfg);

    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    assert_eq!(seq.state(), AutoState::Seeking);
    for _ in 0..3 {
        assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
        assert_eq!(rig.speeds(), (1.0, 1.0));
    }
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Err(SequenceError::BudgetExhausted {
            state: AutoState::Seeking,
            cycles: 4
        })
    );
    assert_eq!(seq.state(), AutoState::Done);
    assert_eq!(rig.speeds(), (0.0, 0.0));
    assert_eq!(rig.launcher.shots, 1);
}

#[test]
fn seeking_turns_in_place_when_target_is_lost() {
    let mut rig = Rig::new();
    rig.capture.open_reads = 5;
    let positions = RefCell::new(VecDeque::from(vec![0.5]));
    let mut targets = || positions.borrow_mut().pop_front().map(fix_at);
    let mut seq = Sequencer::new(SequencerConfig::default());

    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    seq.step(&mut rig.ctx(&mut targets)).unwrap();
    assert_eq!(seq.state(), AutoState::Seeking);

    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    assert_eq!(rig.speeds(), (-0.5, 0.5));
}

#[test]
fn stalled_encoder_exhausts_initial_shot_budget() {
    let mut rig = Rig::new();
    rig.encoder.step = 0;
    let mut targets = || -> Option<TargetFix> { None };
    let mut cfg = SequencerConfig::default();
    cfg.budgets.initial_shot = 3;
    let mut seq = Sequencer::new(cfg);

    for _ in 0..2 {
        assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    }
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Err(SequenceError::BudgetExhausted {
            state: AutoState::InitialShot,
            cycles: 3
        })
    );
    assert_eq!(rig.launcher.shots, 0);
    assert_eq!(rig.speeds(), (0.0, 0.0));
}

#[test]
fn stuck_heading_exhausts_repositioning_budget() {
    let mut rig = Rig::new();
    rig.gyro = ScriptedGyro::new(&[30.0]);
    let mut targets = || Some(fix_at(0.5));
    let mut cfg = SequencerConfig::default();
    cfg.budgets.repositioning = 2;
    let mut seq = Sequencer::new(cfg);

    for _ in 0..3 {
        seq.step(&mut rig.ctx(&mut targets)).unwrap();
    }
    assert_eq!(seq.state(), AutoState::Repositioning);
    assert_eq!(seq.step(&mut rig.ctx(&mut targets)), Ok(StepOutcome::Pending));
    assert_eq!(rig.speeds(), (-0.5, 0.5));
    assert_eq!(
        seq.step(&mut rig.ctx(&mut targets)),
        Err(SequenceError::BudgetExhausted {
            state: AutoState::Repositioning,
            cycles: 2
        })
    );
    assert_eq!(seq.state(), AutoState::Done);
}
