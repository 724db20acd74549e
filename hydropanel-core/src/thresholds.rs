use telemetry::ControllerConfig;

/// L1/L2 water levels (cm) separating the visual severity bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub l1: f64,
    pub l2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBand {
    Normal,
    Warning,
    Critical,
}

impl Thresholds {
    pub fn new(l1: f64, l2: f64) -> Self {
        Self { l1, l2 }
    }

    pub fn classify(&self, level: f64) -> LevelBand {
        if level >= self.l2 {
            LevelBand::Critical
        } else if level >= self.l1 {
            LevelBand::Warning
        } else {
            LevelBand::Normal
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { l1: 30.0, l2: 50.0 }
    }
}

impl From<&ControllerConfig> for Thresholds {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            l1: config.l1_threshold,
            l2: config.l2_threshold,
        }
    }
}
