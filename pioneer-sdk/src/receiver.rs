use pioneer_api::{ApiError, Command, PioneerClient, PowerState};
use pioneer_state::{DeviceState, StateManager};
use telnet_client::{Connect, TelnetConnector};
use tracing::{debug, info, warn};

use crate::{ReceiverConfig, SdkError, ValidatedConfig};

/// Controls a host can offer for a receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    TurnOn,
    TurnOff,
    VolumeSet,
    VolumeStep,
    VolumeMute,
    SelectSource,
    SelectSoundMode,
}

const SUPPORTED_FEATURES: &[Feature] = &[
    Feature::TurnOn,
    Feature::TurnOff,
    Feature::VolumeSet,
    Feature::VolumeStep,
    Feature::VolumeMute,
    Feature::SelectSource,
    Feature::SelectSoundMode,
];

/// One Pioneer receiver as seen by a host application
///
/// All getters read the last published snapshot and never block on the
/// network. [`update`](Receiver::update) polls the receiver; commands open
/// their own short-lived connection and report failures through the log
/// only, so a host can fire them without handling errors.
#[derive(Debug)]
pub struct Receiver<C = TelnetConnector> {
    name: String,
    manager: StateManager<C>,
}

impl Receiver<TelnetConnector> {
    /// Build a receiver from `config` without touching the network
    pub fn new(config: &ReceiverConfig) -> Result<Self, SdkError> {
        let validated = config.validate()?;
        let client = PioneerClient::new(config.host.clone(), config.port, validated.timeout);
        Ok(Self::build(config, validated, client))
    }

    /// Build a receiver and run the first refresh
    ///
    /// Fails with [`SdkError::Unreachable`] if the receiver cannot be reached,
    /// so a host can report it as not ready and retry later.
    pub fn connect(config: &ReceiverConfig) -> Result<Self, SdkError> {
        let receiver = Self::new(config)?;
        receiver.refresh()?;
        info!(
            "connected to {} at {}:{}",
            receiver.name, config.host, config.port
        );
        Ok(receiver)
    }
}

impl<C: Connect> Receiver<C> {
    /// Build a receiver over a custom connector
    pub fn with_connector(config: &ReceiverConfig, connector: C) -> Result<Self, SdkError> {
        let validated = config.validate()?;
        Ok(Self::build(config, validated, PioneerClient::with_connector(connector)))
    }

    fn build(config: &ReceiverConfig, validated: ValidatedConfig, client: PioneerClient<C>) -> Self {
        debug!(
            "{}: {} configured sources, {} sound modes",
            config.name,
            validated.sources.len(),
            validated.sound_modes.len()
        );
        Self {
            name: config.name.clone(),
            manager: StateManager::new(client, validated.sources, validated.sound_modes),
        }
    }

    pub fn state_manager(&self) -> &StateManager<C> {
        &self.manager
    }

    // ========================================================================
    // Polling
    // ========================================================================

    /// Poll the receiver and publish a new snapshot
    ///
    /// Returns `false` when the receiver was unreachable; the previous
    /// snapshot is kept in that case.
    pub fn update(&self) -> bool {
        self.refresh().is_ok()
    }

    /// Like [`update`](Receiver::update) but reports why the cycle was skipped
    pub fn refresh(&self) -> Result<(), SdkError> {
        self.manager.refresh().map_err(SdkError::from)
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> DeviceState {
        self.manager.snapshot()
    }

    pub fn power(&self) -> PowerState {
        self.manager.snapshot().power
    }

    pub fn is_on(&self) -> bool {
        self.power().is_on()
    }

    /// Volume in `0.0..=1.0`
    pub fn volume_level(&self) -> Option<f64> {
        self.manager.snapshot().volume
    }

    pub fn is_muted(&self) -> Option<bool> {
        self.manager.snapshot().muted
    }

    /// Name of the current input
    pub fn source(&self) -> Option<String> {
        self.manager.snapshot().source
    }

    pub fn sound_mode(&self) -> Option<String> {
        self.manager.snapshot().sound_mode
    }

    /// Receivers expose no track metadata; the current input stands in
    pub fn media_title(&self) -> Option<String> {
        self.source()
    }

    /// Source names in catalog order
    pub fn source_list(&self) -> Vec<String> {
        self.manager.store().source_names()
    }

    pub fn sound_mode_list(&self) -> Vec<String> {
        self.manager.store().sound_mode_names()
    }

    pub fn supported_features(&self) -> Vec<Feature> {
        SUPPORTED_FEATURES.to_vec()
    }

    pub fn source_code(&self, name: &str) -> Option<String> {
        self.manager.store().source_code(name)
    }

    pub fn sound_mode_code(&self, name: &str) -> Option<String> {
        self.manager.store().sound_mode_code(name).map(str::to_string)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn turn_on(&self) {
        self.issue(Command::PowerOn);
    }

    pub fn turn_off(&self) {
        self.issue(Command::PowerOff);
    }

    pub fn volume_up(&self) {
        self.issue(Command::VolumeUp);
    }

    pub fn volume_down(&self) {
        self.issue(Command::VolumeDown);
    }

    /// `level` is clamped to `0.0..=1.0`
    pub fn set_volume_level(&self, level: f64) {
        self.issue(Command::SetVolume(level));
    }

    pub fn mute_volume(&self, mute: bool) {
        self.issue(Command::Mute(mute));
    }

    /// Unknown names are logged and nothing is sent
    pub fn select_source(&self, name: &str) {
        match self.source_code(name) {
            Some(code) => self.issue(Command::SelectSource(code)),
            None => warn!("{}: unknown source '{}', not sent", self.name, name),
        }
    }

    /// Unknown names are logged and nothing is sent
    pub fn select_sound_mode(&self, name: &str) {
        match self.sound_mode_code(name) {
            Some(code) => self.issue(Command::SelectSoundMode(code)),
            None => warn!("{}: unknown sound mode '{}', not sent", self.name, name),
        }
    }

    /// Send `command` and report whether it left for the receiver
    ///
    /// The command methods above wrap this and only log failures. A refused
    /// connection surfaces as [`SdkError::Unreachable`].
    pub fn execute(&self, command: &Command) -> Result<(), SdkError> {
        self.manager.client().send(command).map_err(|e| match e {
            ApiError::NetworkError(msg) => SdkError::Unreachable(msg),
            other => SdkError::ApiError(other),
        })?;
        debug!("{}: sent {}", self.name, command);
        Ok(())
    }

    fn issue(&self, command: Command) {
        match self.execute(&command) {
            Ok(()) => {}
            Err(SdkError::ApiError(ApiError::Timeout)) => {
                debug!("{}: command {} timed out", self.name, command)
            }
            Err(SdkError::Unreachable(msg)) => {
                warn!("{}: refused connection for {}: {}", self.name, command, msg)
            }
            Err(e) => warn!("{}: command {} not sent: {}", self.name, command, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SoundModeConfig;
    use proptest::prelude::*;
    use rstest::rstest;
    use telnet_client::testing::ScriptedDevice;
    use telnet_client::TelnetError;

    fn config() -> ReceiverConfig {
        ReceiverConfig::new("127.0.0.1")
            .with_name("Den")
            .with_source("Apple TV", "05")
            .with_source("BD", "25")
            .with_sound_modes(SoundModeConfig::Names(vec![
                "STEREO".to_string(),
                "PURE DIRECT".to_string(),
            ]))
    }

    fn receiver(device: &ScriptedDevice) -> Receiver<ScriptedDevice> {
        Receiver::with_connector(&config(), device.clone()).unwrap()
    }

    #[test]
    fn test_update_reads_snapshot() {
        let device = ScriptedDevice::new();
        device.reply("?P", ["PWR0"]);
        device.reply("?V", ["VOL050"]);
        device.reply("?M", ["MUT1"]);
        device.reply("?S", ["SR0008"]);
        device.reply("?F", ["FN05"]);
        let receiver = receiver(&device);

        assert!(receiver.update());

        assert!(receiver.is_on());
        assert!((receiver.volume_level().unwrap() - 0.27).abs() < 0.01);
        assert_eq!(receiver.is_muted(), Some(false));
        assert_eq!(receiver.source().as_deref(), Some("Apple TV"));
        assert_eq!(receiver.media_title().as_deref(), Some("Apple TV"));
        assert_eq!(receiver.sound_mode().as_deref(), Some("PURE DIRECT"));
    }

    #[test]
    fn test_unknown_source_code() {
        let device = ScriptedDevice::new();
        device.reply("?F", ["FN99"]);
        let receiver = receiver(&device);

        assert!(receiver.update());
        assert_eq!(receiver.source(), None);
        assert_eq!(receiver.power(), PowerState::Unknown);
    }

    #[test]
    fn test_update_unreachable() {
        let device = ScriptedDevice::new();
        device.refuse(TelnetError::Connection("refused".to_string()));
        let receiver = receiver(&device);

        assert!(!receiver.update());
        assert!(matches!(receiver.refresh(), Err(SdkError::Unreachable(_))));
        assert_eq!(receiver.snapshot(), DeviceState::unknown());
    }

    #[rstest]
    #[case::on(|r: &Receiver<ScriptedDevice>| r.turn_on(), "PO")]
    #[case::off(|r: &Receiver<ScriptedDevice>| r.turn_off(), "PF")]
    #[case::up(|r: &Receiver<ScriptedDevice>| r.volume_up(), "VU")]
    #[case::down(|r: &Receiver<ScriptedDevice>| r.volume_down(), "VD")]
    #[case::volume(|r: &Receiver<ScriptedDevice>| r.set_volume_level(0.27), "050VL")]
    #[case::mute(|r: &Receiver<ScriptedDevice>| r.mute_volume(true), "MO")]
    #[case::unmute(|r: &Receiver<ScriptedDevice>| r.mute_volume(false), "MF")]
    #[case::source(|r: &Receiver<ScriptedDevice>| r.select_source("BD"), "25FN")]
    #[case::sound_mode(|r: &Receiver<ScriptedDevice>| r.select_sound_mode("STEREO"), "0001SR")]
    fn test_commands_on_the_wire(
        #[case] action: fn(&Receiver<ScriptedDevice>),
        #[case] expected: &str,
    ) {
        let device = ScriptedDevice::new();
        let receiver = receiver(&device);

        action(&receiver);

        assert_eq!(device.written(), vec![expected.to_string()]);
        assert_eq!(device.closed(), 1);
    }

    #[test]
    fn test_unknown_names_send_nothing() {
        let device = ScriptedDevice::new();
        let receiver = receiver(&device);

        receiver.select_source("Cassette");
        receiver.select_sound_mode("AUTO SURROUND");

        assert_eq!(device.connections(), 0);
    }

    #[test]
    fn test_command_failures_are_absorbed() {
        let device = ScriptedDevice::new();
        let receiver = receiver(&device);

        device.refuse(TelnetError::Connection("refused".to_string()));
        receiver.turn_on();

        device.accept();
        device.fail_writes(TelnetError::Timeout);
        receiver.turn_off();

        assert!(device.written().is_empty());
    }

    #[test]
    fn test_supported_features_do_not_depend_on_config() {
        let device = ScriptedDevice::new();
        assert!(receiver(&device)
            .supported_features()
            .contains(&Feature::SelectSoundMode));

        let bare = Receiver::with_connector(&ReceiverConfig::new("avr"), device).unwrap();
        let features = bare.supported_features();
        assert_eq!(features.len(), 7);
        assert!(features.contains(&Feature::SelectSoundMode));
        assert!(features.contains(&Feature::SelectSource));
    }

    #[test]
    fn test_execute_reports_failures() {
        let device = ScriptedDevice::new();
        let receiver = receiver(&device);

        assert!(receiver.execute(&Command::PowerOn).is_ok());
        assert_eq!(device.written(), vec!["PO".to_string()]);

        device.fail_writes(TelnetError::Timeout);
        assert!(matches!(
            receiver.execute(&Command::PowerOff),
            Err(SdkError::ApiError(ApiError::Timeout))
        ));

        device.refuse(TelnetError::Connection("refused".to_string()));
        assert!(matches!(
            receiver.execute(&Command::PowerOff),
            Err(SdkError::Unreachable(_))
        ));
    }

    #[test]
    fn test_code_lookups() {
        let device = ScriptedDevice::new();
        let receiver = receiver(&device);
        assert_eq!(receiver.source_code("BD").as_deref(), Some("25"));
        assert_eq!(receiver.source_code("Cassette"), None);
        assert_eq!(receiver.sound_mode_code("PURE DIRECT").as_deref(), Some("0008"));
        assert_eq!(receiver.sound_mode_code("SURROUND"), None);
    }

    #[rstest]
    #[case::too_large(1e20)]
    #[case::infinite(f64::INFINITY)]
    fn test_unrepresentable_timeout_fails_construction(#[case] timeout: f64) {
        let mut config = config();
        config.timeout = timeout;

        assert!(matches!(Receiver::new(&config), Err(SdkError::InvalidConfig(_))));
        assert!(matches!(
            Receiver::with_connector(&config, ScriptedDevice::new()),
            Err(SdkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_lists() {
        let device = ScriptedDevice::new();
        let receiver = receiver(&device);
        assert_eq!(receiver.source_list(), vec!["Apple TV", "BD"]);
        assert_eq!(receiver.sound_mode_list(), vec!["STEREO", "PURE DIRECT"]);
        assert_eq!(receiver.name(), "Den");
    }

    #[test]
    fn test_invalid_config_rejected_before_connecting() {
        let device = ScriptedDevice::new();
        let config = config().with_sound_modes(SoundModeConfig::Names(vec![
            "SURROUND".to_string(),
        ]));

        let result = Receiver::with_connector(&config, device.clone());
        assert!(matches!(result, Err(SdkError::InvalidConfig(_))));
        assert_eq!(device.connections(), 0);
    }

    proptest! {
        #[test]
        fn prop_set_volume_sends_three_digit_level(level in -1.0f64..2.0) {
            let device = ScriptedDevice::new();
            let receiver = receiver(&device);

            receiver.set_volume_level(level);

            let written = device.written();
            prop_assert_eq!(written.len(), 1);
            let command = &written[0];
            prop_assert_eq!(command.len(), 5);
            prop_assert!(command.ends_with("VL"));
            let raw: u32 = command[..3].parse().unwrap();
            prop_assert!(raw <= 185);
        }
    }
}
