//! Dashboard overview: live environment readings plus fixture content.

use log::debug;
use serde::Serialize;

use crate::app::ports::SensorPort;
use crate::sensors::environment::EnvironmentSnapshot;
use crate::sensors::moisture::MoistureStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub action: &'static str,
    pub plant: &'static str,
    pub time: &'static str,
    pub status: &'static str,
}

pub const RECENT_ACTIVITIES: [Activity; 4] = [
    Activity {
        action: "Disease scan completed",
        plant: "Tomato Plant #1",
        time: "2 minutes ago",
        status: "Healthy",
    },
    Activity {
        action: "Auto-watering activated",
        plant: "Herb Garden",
        time: "1 hour ago",
        status: "Success",
    },
    Activity {
        action: "Moisture alert",
        plant: "Succulent Collection",
        time: "3 hours ago",
        status: "Warning",
    },
    Activity {
        action: "Disease detected",
        plant: "Rose Bush",
        time: "1 day ago",
        status: "Action Required",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        title: "Disease Detection",
        description: "Upload plant photos for AI analysis",
        route: "/detection",
    },
    QuickAction {
        title: "Auto-Watering",
        description: "Monitor and control irrigation",
        route: "/watering",
    },
    QuickAction {
        title: "Plant Assistant",
        description: "Chat with AI for plant care tips",
        route: "/chatbot",
    },
    QuickAction {
        title: "View History",
        description: "Track your plant care activities",
        route: "/history",
    },
];

/// Latest environment readings, refreshed on the dashboard timer.
pub struct Dashboard {
    snapshot: EnvironmentSnapshot,
    refreshes: u64,
}

impl Dashboard {
    pub fn new(initial: EnvironmentSnapshot) -> Self {
        Self {
            snapshot: initial,
            refreshes: 0,
        }
    }

    pub fn refresh(&mut self, sensors: &mut impl SensorPort) -> EnvironmentSnapshot {
        self.snapshot = sensors.read_environment();
        self.refreshes += 1;
        debug!("dashboard refresh #{}: {:?}", self.refreshes, self.snapshot);
        self.snapshot
    }

    pub fn snapshot(&self) -> EnvironmentSnapshot {
        self.snapshot
    }

    pub fn soil_status(&self) -> MoistureStatus {
        MoistureStatus::classify(self.snapshot.soil_moisture_percent)
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn recent_activities(&self) -> &'static [Activity] {
        &RECENT_ACTIVITIES
    }

    pub fn quick_actions(&self) -> &'static [QuickAction] {
        &QUICK_ACTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::environment::EnvironmentSensors;

    struct FixedEnv(EnvironmentSnapshot);

    impl SensorPort for FixedEnv {
        fn read_moisture(&mut self) -> f32 {
            self.0.soil_moisture_percent
        }
        fn read_environment(&mut self) -> EnvironmentSnapshot {
            self.0
        }
    }

    #[test]
    fn starts_from_initial_readings() {
        let d = Dashboard::new(EnvironmentSensors::new().snapshot());
        let s = d.snapshot();
        assert!((s.soil_moisture_percent - 65.0).abs() < f32::EPSILON);
        assert!((s.temperature_c - 22.0).abs() < f32::EPSILON);
        assert_eq!(d.soil_status(), MoistureStatus::Good);
        assert_eq!(d.refreshes(), 0);
    }

    #[test]
    fn refresh_pulls_from_sensor_port() {
        let mut d = Dashboard::new(EnvironmentSensors::new().snapshot());
        let mut env = FixedEnv(EnvironmentSnapshot {
            soil_moisture_percent: 25.0,
            temperature_c: 19.0,
            humidity_percent: 41.0,
            plant_health_percent: 81.0,
        });
        d.refresh(&mut env);
        assert_eq!(d.soil_status(), MoistureStatus::Low);
        assert_eq!(d.refreshes(), 1);
    }

    #[test]
    fn quick_actions_route_to_each_page() {
        let routes: Vec<_> = QUICK_ACTIONS.iter().map(|a| a.route).collect();
        assert_eq!(routes, ["/detection", "/watering", "/chatbot", "/history"]);
    }
}
