// src/config/constants.rs
//! Rig-wide constants used as configuration defaults

/// Sample window constants
pub mod window {
    /// Slots per channel buffer
    pub const WINDOW_LEN: usize = 10;
}

/// Analog input channel assignments
pub mod channels {
    /// Axial whisker sensor
    pub const SENSOR1_AI_CHANNEL: u32 = 7;
    /// Radial whisker sensor
    pub const SENSOR2_AI_CHANNEL: u32 = 9;
    /// Lickport inputs (hardware channels 0 and 1)
    pub const LICKPORT_CHANNELS: [u32; 2] = [0, 1];
}

/// Voltage thresholds for touch and lick detection
pub mod thresholds {
    /// Channel 1 positive bound (inclusive)
    pub const SENSOR1_HIGH_V: f64 = 0.2;
    /// Channel 1 negative bound (inclusive)
    pub const SENSOR1_LOW_V: f64 = -0.2;

    /// Channel 2 positive bound (exclusive)
    pub const SENSOR2_HIGH_V: f64 = 0.021;
    /// Channel 2 low bound (exclusive)
    pub const SENSOR2_LOW_V: f64 = -0.21;

    /// Minimum absolute change of the channel-1 mean that counts as contact
    pub const MEAN_CHANGE_V: f64 = 0.0027;

    /// Lick detected at or above this voltage
    pub const LICKPORT_HIGH_V: f64 = 4.0;
    /// Lick released at or below this voltage
    pub const LICKPORT_LOW_V: f64 = 3.0;

    /// Injected touch threshold, upper
    pub const TOUCH_THRESH_HIGH_V: f64 = 0.2;
    /// Injected touch threshold, lower
    pub const TOUCH_THRESH_LOW_V: f64 = -0.2;
}

/// State machine ids the monitor reacts to
pub mod states {
    /// Pole moving up
    pub const POLE_UP: u32 = 43;
    /// Delay period; touching here aborts the trial
    pub const EARLY_TOUCH: u32 = 46;
    /// Response window
    pub const TOUCH_WINDOW: u32 = 47;
    /// Reward and next trial
    pub const NEXT_TRIAL: u32 = 48;
    /// Aborted trial
    pub const ABORTED_TRIAL: u32 = 54;

    /// Event id recorded in the state machine history for forced jumps
    pub const JUMP_EVENT_ID: i32 = 1;

    /// States in which touches drive transitions
    pub const TOUCH_RELEVANT: [u32; 2] = [EARLY_TOUCH, TOUCH_WINDOW];
}

/// Scheduled wave ids
pub mod waves {
    /// Touch onset
    pub const TOUCH_ONSET: u32 = 0;
    /// Pole up
    pub const POLE_UP: u32 = 1;
    /// Cue
    pub const CUE: u32 = 3;
    /// Go
    pub const GO: u32 = 4;
    /// Noise
    pub const NOISE: u32 = 5;
    /// Reward
    pub const REWARD: u32 = 6;
}

/// Names and values written to the experiment record
pub mod markers {
    /// Logged when a touch forces a jump
    pub const TOUCH_TRIGGER_NAME: &str = "touch_trig_pro_on";
    /// Value of the touch marker
    pub const TOUCH_TRIGGER_VALUE: f64 = 1.0;
    /// Logged at every trial start
    pub const TRIAL_START_NAME: &str = "entered_state_40";
    /// Value of the trial-start marker
    pub const TRIAL_START_VALUE: f64 = 1.0;
}

/// Configuration file discovery
pub mod paths {
    /// File read by `ConfigLoader::new`
    pub const DEFAULT_CONFIG_FILE: &str = "touch.toml";
    /// Prefix of override variables
    pub const ENV_PREFIX: &str = "TOUCH";
    /// Separator between prefix, section and key
    pub const ENV_SEPARATOR: &str = "__";
}
