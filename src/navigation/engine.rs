//! Navigation State Machine
//!
//! Turns position, obstacle and vision signals into a PDD state once per
//! cycle and walks the waypoint cursor along the active route.

use roverlink_shared::{protocol, PddState, RoverMode, Waypoint};

/// Active route and the index of the waypoint being approached
///
/// `current_idx` is a valid index into `waypoints`, or 0 when the route is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    pub waypoints: Vec<Waypoint>,
    pub current_idx: usize,
}

impl RouteState {
    /// Waypoint at the cursor, if any
    pub fn target(&self) -> Option<Waypoint> {
        self.waypoints.get(self.current_idx).copied()
    }

    fn is_at_last(&self) -> bool {
        self.current_idx + 1 >= self.waypoints.len()
    }
}

/// Rover-side navigation engine
#[derive(Debug, Clone)]
pub struct Navigator {
    pub mode: RoverMode,
    pdd_state: PddState,
    route: RouteState,
    lane_tolerance_m: f64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(protocol::DEFAULT_LANE_TOLERANCE_M)
    }
}

impl Navigator {
    /// Create a navigator in MANUAL/STOP with no route
    pub fn new(lane_tolerance_m: f64) -> Self {
        Self {
            mode: RoverMode::Manual,
            pdd_state: PddState::Stop,
            route: RouteState::default(),
            lane_tolerance_m,
        }
    }

    /// Get current PDD state
    pub fn pdd_state(&self) -> PddState {
        self.pdd_state
    }

    pub fn route(&self) -> &RouteState {
        &self.route
    }

    pub fn lane_tolerance_m(&self) -> f64 {
        self.lane_tolerance_m
    }

    /// Replace the active route and start following it from the first waypoint
    pub fn set_route(&mut self, waypoints: Vec<Waypoint>) {
        self.route = RouteState {
            waypoints,
            current_idx: 0,
        };
        self.mode = RoverMode::Auto;
        self.pdd_state = PddState::OnTrack;
    }

    /// Evaluate one cycle of signals and return the new PDD state
    ///
    /// Priority is fixed: a vision stop wins over an obstacle, which wins
    /// over route progress.
    pub fn update_by_position(
        &mut self,
        lat: f64,
        lon: f64,
        must_stop: bool,
        obstacle: bool,
    ) -> PddState {
        self.pdd_state = self.next_state(lat, lon, must_stop, obstacle);
        self.pdd_state
    }

    fn next_state(&mut self, lat: f64, lon: f64, must_stop: bool, obstacle: bool) -> PddState {
        if must_stop {
            return PddState::Stop;
        }
        if obstacle {
            return PddState::Returning;
        }

        let target = match self.route.target() {
            Some(wp) => wp,
            None => return PddState::Stop,
        };

        let distance = flat_distance_m(lat, lon, target.lat, target.lon);

        if distance < protocol::WAYPOINT_REACHED_M && !self.route.is_at_last() {
            self.route.current_idx += 1;
            PddState::OnTrack
        } else if distance > self.lane_tolerance_m {
            PddState::OffTrack
        } else {
            PddState::OnTrack
        }
    }
}

/// Planar distance between two coordinates, scaled from degrees to meters
///
/// Flat-earth approximation applied at every latitude; only meaningful over
/// short distances.
pub fn flat_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    ((lat1 - lat2).powi(2) + (lon1 - lon2).powi(2)).sqrt() * protocol::DEGREES_TO_METERS
}
