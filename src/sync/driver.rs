//! Sync loop driver
//!
//! One cycle runs to completion before the next tick is awaited, so commands
//! are applied strictly in arrival order. Transport failures end the cycle's
//! server exchange early; the next tick is the retry.

use crate::api::LocalApiState;
use crate::command::{CommandInterpreter, CommandResult};
use crate::config::RoverConfig;
use crate::connection::ControlLink;
use crate::hardware::{MotorController, RoverHardware};
use crate::navigation::Navigator;
use roverlink_shared::{Detection, PddState, StatusReport, WireCommand};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What happened during one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub pdd_state: PddState,
    /// Status push reached the server
    pub pushed: bool,
    /// Command poll reached the server
    pub polled: bool,
    /// Commands that changed rover state this cycle
    pub applied: usize,
}

/// Rover-side protocol driver
pub struct SyncLoop<L: ControlLink> {
    rover_id: String,
    advertise_addr: Option<String>,
    period: Duration,
    link: L,
    hardware: RoverHardware,
    navigator: Navigator,
    motors: MotorController,
    interpreter: CommandInterpreter,
    inbox: mpsc::UnboundedReceiver<WireCommand>,
    status_tx: watch::Sender<Option<StatusReport>>,
}

impl<L: ControlLink> SyncLoop<L> {
    /// Build the loop and the handles the local endpoint needs
    pub fn new(config: &RoverConfig, link: L, hardware: RoverHardware) -> (Self, LocalApiState) {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(None);

        let sync = Self {
            rover_id: config.rover_id.clone(),
            advertise_addr: config.advertise_addr.clone(),
            period: config.sync_period,
            link,
            hardware,
            navigator: Navigator::new(config.lane_tolerance_m),
            motors: MotorController::new(config.max_pwm),
            interpreter: CommandInterpreter::new(),
            inbox,
            status_tx,
        };
        let api = LocalApiState {
            status: status_rx,
            inbox: inbox_tx,
        };

        (sync, api)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn motors(&self) -> &MotorController {
        &self.motors
    }

    pub fn hardware_mut(&mut self) -> &mut RoverHardware {
        &mut self.hardware
    }

    /// Run forever; only process termination stops the loop
    pub async fn run(mut self) {
        info!(
            "Sync loop started for {} via {} (period {:?})",
            self.rover_id,
            self.link.name(),
            self.period
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.run_cycle().await;
            debug!(
                "Cycle: pdd={} pushed={} polled={} applied={}",
                report.pdd_state, report.pushed, report.polled, report.applied
            );
        }
    }

    /// Execute one full cycle
    pub async fn run_cycle(&mut self) -> CycleReport {
        // Signals
        let fix = self.hardware.gps.read_fix();
        let obstacle = self.hardware.sonar.read_distance();
        let by_camera: BTreeMap<String, Vec<Detection>> = self
            .hardware
            .cameras
            .camera_ids()
            .map(|id| (id.to_string(), self.hardware.vision.infer(id)))
            .collect();
        let vision = self.hardware.vision.summarize(by_camera);

        // Navigation
        let previous = self.navigator.pdd_state();
        let pdd_state = self.navigator.update_by_position(
            fix.lat,
            fix.lon,
            vision.must_stop,
            obstacle.is_blocked,
        );
        if pdd_state != previous {
            info!("PDD state: {} -> {}", previous, pdd_state);
        }

        if pdd_state == PddState::Stop {
            self.motors.emergency_stop();
        }

        let report = StatusReport {
            rover_id: self.rover_id.clone(),
            mode: self.navigator.mode,
            pdd_state,
            gps: fix,
            motors: self.motors.state(),
            streams: self.hardware.cameras.list_streams(),
            detections: vision.detections,
            route: self.navigator.route().waypoints.clone(),
            address: self.advertise_addr.clone(),
        };
        self.status_tx.send_replace(Some(report.clone()));

        // Exchange
        let pushed = match self.link.push_status(&report).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Status push failed: {:#}", e);
                false
            }
        };

        let mut applied = self.drain_inbox();
        let mut polled = false;
        if pushed {
            match self.link.poll_commands().await {
                Ok(commands) => {
                    polled = true;
                    for command in &commands {
                        applied += self.apply(command);
                    }
                    self.interpreter.mark_delivered(&commands);
                }
                Err(e) => warn!("Command poll failed: {:#}", e),
            }
        }

        CycleReport {
            pdd_state,
            pushed,
            polled,
            applied,
        }
    }

    /// Apply commands forwarded directly to the local endpoint
    fn drain_inbox(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.inbox.try_recv() {
            applied += self.apply(&command);
        }
        applied
    }

    fn apply(&mut self, command: &WireCommand) -> usize {
        let result = self
            .interpreter
            .apply(command, &mut self.navigator, &mut self.motors);
        usize::from(matches!(result, CommandResult::Applied { .. }))
    }
}
