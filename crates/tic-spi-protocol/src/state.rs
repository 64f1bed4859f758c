//! Interrupt classification and power/command validation.
//!
//! Everything here is a pure function of a decoded [`StatusRegister`]. The
//! interpreter never issues writes; it tells the caller whether a request
//! makes sense for the state the device last reported.

use core::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::TicResult;
use crate::regs::{CommandCode, InitState, InterruptType, PowerCommand, PowerState, StatusRegister};

/// What a pending interrupt asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterruptClass {
    /// Read micro-frames described by the frame characteristics register.
    DataAvailable,
    ResetOccurred,
    /// Read the error register.
    ErrorOccurred,
    VendorData,
    GetFeaturesAvailable,
    /// Interrupt type code 5 or above.
    Unrecognized(u8),
}

impl From<InterruptType> for InterruptClass {
    fn from(int_type: InterruptType) -> Self {
        match int_type {
            InterruptType::DataAvailable => Self::DataAvailable,
            InterruptType::ResetOccurred => Self::ResetOccurred,
            InterruptType::ErrorOccurred => Self::ErrorOccurred,
            InterruptType::VendorData => Self::VendorData,
            InterruptType::GetFeatures => Self::GetFeaturesAvailable,
            InterruptType::Unrecognized(code) => Self::Unrecognized(code),
        }
    }
}

impl fmt::Display for InterruptClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataAvailable => write!(f, "data available"),
            Self::ResetOccurred => write!(f, "reset occurred"),
            Self::ErrorOccurred => write!(f, "error occurred"),
            Self::VendorData => write!(f, "vendor data"),
            Self::GetFeaturesAvailable => write!(f, "get features available"),
            Self::Unrecognized(code) => write!(f, "unrecognized ({code})"),
        }
    }
}

/// Classify the interrupt a status read reports.
///
/// Returns `Ok(None)` when no interrupt is pending.
///
/// # Errors
///
/// [`TicError::SyncMismatch`](crate::TicError::SyncMismatch) when the status
/// word cannot be trusted.
pub fn classify_interrupt(status: &StatusRegister) -> TicResult<Option<InterruptClass>> {
    if let Err(err) = status.check_sync() {
        warn!(sync_byte = status.sync_byte, "discarding status read with bad sync byte");
        return Err(err);
    }
    if !status.int_status {
        return Ok(None);
    }
    let class = InterruptClass::from(status.int_type);
    debug!(%class, "interrupt pending");
    Ok(Some(class))
}

/// Device state derived from a status read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub power: PowerState,
    pub init: InitState,
    pub busy: bool,
    /// `false` when the sync byte did not match.
    pub trusted: bool,
}

impl DeviceState {
    pub fn from_status(status: &StatusRegister) -> Self {
        Self {
            power: status.power_state,
            init: status.init_state,
            busy: status.busy,
            trusted: !status.sync_mismatch(),
        }
    }

    /// Trusted, initialized and idle: the device accepts register writes.
    pub fn is_operational(&self) -> bool {
        self.trusted && !self.busy && self.init == InitState::ReadyForOp
    }

    /// Load the host must perform before the device becomes operational.
    pub fn pending_load(&self) -> Option<InitState> {
        match self.init {
            InitState::FwNeeded | InitState::DataNeeded => Some(self.init),
            InitState::ReadyForOp | InitState::InitError => None,
        }
    }

    fn check_operational(&self) -> Result<(), InvalidReason> {
        if !self.trusted {
            Err(InvalidReason::UntrustedStatus)
        } else if self.busy {
            Err(InvalidReason::DeviceBusy)
        } else if self.init != InitState::ReadyForOp {
            Err(InvalidReason::NotInitialized(self.init))
        } else {
            Ok(())
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvalidReason {
    /// Status sync byte mismatch; nothing it reports can be relied on.
    UntrustedStatus,
    DeviceBusy,
    NotInitialized(InitState),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UntrustedStatus => write!(f, "status read not trusted (sync mismatch)"),
            Self::DeviceBusy => write!(f, "device busy"),
            Self::NotInitialized(state) => write!(f, "device not initialized ({state:?})"),
        }
    }
}

/// Outcome of a validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict<T> {
    Accepted(T),
    Invalid(InvalidReason),
}

impl<T> Verdict<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Effect of an accepted power command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerTransition {
    /// NOP, an unrecognized code, or the state the device is already in.
    NoChange,
    Change { from: PowerState, to: PowerState },
}

/// Power state a power management command asks for.
pub fn target_power_state(command: PowerCommand) -> Option<PowerState> {
    match command {
        PowerCommand::Sleep => Some(PowerState::Sleep),
        PowerCommand::Doze => Some(PowerState::Doze),
        PowerCommand::Armed => Some(PowerState::Armed),
        PowerCommand::Sensing => Some(PowerState::Sensing),
        PowerCommand::Nop | PowerCommand::Unrecognized(_) => None,
    }
}

/// Validate a power management command against the last status read.
pub fn validate_power_transition(
    status: &StatusRegister,
    command: PowerCommand,
) -> Verdict<PowerTransition> {
    let Some(to) = target_power_state(command) else {
        return Verdict::Accepted(PowerTransition::NoChange);
    };
    let state = DeviceState::from_status(status);
    if let Err(reason) = state.check_operational() {
        debug!(?command, %reason, "power command refused");
        return Verdict::Invalid(reason);
    }
    if state.power == to {
        return Verdict::Accepted(PowerTransition::NoChange);
    }
    Verdict::Accepted(PowerTransition::Change {
        from: state.power,
        to,
    })
}

/// Effect of an accepted command register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandAction {
    NoOp,
    Issue(CommandCode),
}

/// Validate a command register write against the last status read.
///
/// Soft reset is the recovery path and is accepted in any state.
pub fn validate_command(status: &StatusRegister, command: CommandCode) -> Verdict<CommandAction> {
    match command {
        CommandCode::Nop | CommandCode::Unrecognized(_) => Verdict::Accepted(CommandAction::NoOp),
        CommandCode::SoftReset => Verdict::Accepted(CommandAction::Issue(command)),
        CommandCode::PrepareForRead | CommandCode::GenerateTestPackets => {
            match DeviceState::from_status(status).check_operational() {
                Ok(()) => Verdict::Accepted(CommandAction::Issue(command)),
                Err(reason) => Verdict::Invalid(reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TicError;
    use crate::regs::Register;

    fn status(raw: u32) -> StatusRegister {
        StatusRegister::decode(raw)
    }

    #[test]
    fn test_classify_data_available() -> Result<(), Box<dyn std::error::Error>> {
        let s = status(0x5A00_0001);
        assert_eq!(classify_interrupt(&s)?, Some(InterruptClass::DataAvailable));
        let state = DeviceState::from_status(&s);
        assert_eq!(state.power, PowerState::Sleep);
        assert_eq!(state.init, InitState::ReadyForOp);
        assert!(state.is_operational());
        Ok(())
    }

    #[test]
    fn test_classify_no_interrupt() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(classify_interrupt(&status(0x5A00_0008))?, None);
        Ok(())
    }

    #[test]
    fn test_classify_all_types() -> Result<(), Box<dyn std::error::Error>> {
        let expected = [
            InterruptClass::DataAvailable,
            InterruptClass::ResetOccurred,
            InterruptClass::ErrorOccurred,
            InterruptClass::VendorData,
            InterruptClass::GetFeaturesAvailable,
            InterruptClass::Unrecognized(5),
            InterruptClass::Unrecognized(15),
        ];
        for (code, class) in [0u32, 1, 2, 3, 4, 5, 15].into_iter().zip(expected) {
            let raw = 0x5A00_0001 | (code << 1);
            assert_eq!(classify_interrupt(&status(raw))?, Some(class));
        }
        Ok(())
    }

    #[test]
    fn test_classify_rejects_bad_sync() {
        assert_eq!(
            classify_interrupt(&status(0xA500_0001)),
            Err(TicError::SyncMismatch { found: 0xA5 })
        );
    }

    #[test]
    fn test_power_nop_and_unrecognized_are_no_change() {
        // Untrusted and busy, yet still a no-op.
        let s = status(0x0000_0200);
        for command in [PowerCommand::Nop, PowerCommand::Unrecognized(6)] {
            assert_eq!(
                validate_power_transition(&s, command),
                Verdict::Accepted(PowerTransition::NoChange)
            );
        }
    }

    #[test]
    fn test_power_change() {
        // Armed (2 << 5), ready.
        let s = status(0x5A00_0040);
        assert_eq!(
            validate_power_transition(&s, PowerCommand::Sensing),
            Verdict::Accepted(PowerTransition::Change {
                from: PowerState::Armed,
                to: PowerState::Sensing,
            })
        );
        assert_eq!(
            validate_power_transition(&s, PowerCommand::Armed),
            Verdict::Accepted(PowerTransition::NoChange)
        );
    }

    #[test]
    fn test_power_refused() {
        assert_eq!(
            validate_power_transition(&status(0x5A00_0200), PowerCommand::Sleep),
            Verdict::Invalid(InvalidReason::DeviceBusy)
        );
        assert_eq!(
            validate_power_transition(&status(0x0000_0000), PowerCommand::Sleep),
            Verdict::Invalid(InvalidReason::UntrustedStatus)
        );
        // FwNeeded (1 << 7).
        assert_eq!(
            validate_power_transition(&status(0x5A00_0080), PowerCommand::Doze),
            Verdict::Invalid(InvalidReason::NotInitialized(InitState::FwNeeded))
        );
    }

    #[test]
    fn test_command_validation() {
        let busy = status(0x5A00_0200);
        assert_eq!(
            validate_command(&busy, CommandCode::SoftReset),
            Verdict::Accepted(CommandAction::Issue(CommandCode::SoftReset))
        );
        assert_eq!(
            validate_command(&busy, CommandCode::PrepareForRead),
            Verdict::Invalid(InvalidReason::DeviceBusy)
        );
        assert_eq!(
            validate_command(&busy, CommandCode::Unrecognized(9)),
            Verdict::Accepted(CommandAction::NoOp)
        );
        assert!(validate_command(&status(0x5A00_0000), CommandCode::GenerateTestPackets).is_accepted());
    }

    #[test]
    fn test_pending_load() {
        assert_eq!(
            DeviceState::from_status(&status(0x5A00_0100)).pending_load(),
            Some(InitState::DataNeeded)
        );
        assert_eq!(DeviceState::from_status(&status(0x5A00_0180)).pending_load(), None);
    }
}
