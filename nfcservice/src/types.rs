// nfcservice/src/types.rs

use derive_more::Display;

/// Power state of the NFC controller.
#[repr(i32)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerState {
    /// Powered down; the initial state.
    #[default]
    Off = 1,
    /// Bring-up in flight.
    TurningOn = 2,
    /// Discovery running.
    On = 3,
    /// Teardown in flight.
    TurningOff = 4,
}

impl ControllerState {
    /// Value handed across the binding layer.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether `next` is a legal single step from `self`.
    ///
    /// Off -> TurningOn -> {On, Off}, On -> TurningOff -> {Off, On}.
    pub fn can_transition_to(self, next: ControllerState) -> bool {
        use ControllerState::*;
        matches!(
            (self, next),
            (Off, TurningOn)
                | (TurningOn, On)
                | (TurningOn, Off)
                | (On, TurningOff)
                | (TurningOff, Off)
                | (TurningOff, On)
        )
    }

    /// Transitional states only exist while a task is in flight.
    pub fn is_transitional(self) -> bool {
        matches!(self, ControllerState::TurningOn | ControllerState::TurningOff)
    }
}

/// A requested power transition.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NfcTask {
    /// Bring the controller up.
    TurnOn,
    /// Power the controller down.
    TurnOff,
}

impl NfcTask {
    /// State entered as soon as the task is accepted.
    pub fn transitional_state(self) -> ControllerState {
        match self {
            NfcTask::TurnOn => ControllerState::TurningOn,
            NfcTask::TurnOff => ControllerState::TurningOff,
        }
    }

    /// State committed when the hardware work succeeds.
    pub fn success_state(self) -> ControllerState {
        match self {
            NfcTask::TurnOn => ControllerState::On,
            NfcTask::TurnOff => ControllerState::Off,
        }
    }

    /// State committed when the hardware work fails or the wait times out.
    pub fn failure_state(self) -> ControllerState {
        match self {
            NfcTask::TurnOn => ControllerState::Off,
            NfcTask::TurnOff => ControllerState::On,
        }
    }

    /// The enabled flag persisted for this request.
    pub fn enables(self) -> bool {
        matches!(self, NfcTask::TurnOn)
    }
}

/// Screen state forwarded to the controller to tune discovery.
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScreenState {
    /// Not reported yet.
    #[default]
    Unknown = 0,
    /// Screen off, device unlocked.
    OffUnlocked = 1,
    /// Screen off, device locked.
    OffLocked = 2,
    /// Screen on, device unlocked.
    OnUnlocked = 4,
    /// Screen on, keyguard showing.
    OnLocked = 8,
}

impl ScreenState {
    /// Screen state for a raw platform value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::OffUnlocked),
            2 => Some(Self::OffLocked),
            4 => Some(Self::OnUnlocked),
            8 => Some(Self::OnLocked),
            _ => None,
        }
    }
}

/// Tag protocol family.
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagTechnology {
    /// ISO 14443-3A
    NfcA = 1,
    /// ISO 14443-3B
    NfcB = 2,
    /// ISO 14443-4
    IsoDep = 3,
    /// JIS 6319-4 (FeliCa)
    NfcF = 4,
    /// ISO 15693
    NfcV = 5,
    /// NDEF formatted
    Ndef = 6,
    /// Can be NDEF formatted
    NdefFormatable = 7,
    /// MIFARE Classic
    MifareClassic = 8,
    /// MIFARE Ultralight
    MifareUltralight = 9,
}

impl TagTechnology {
    /// Every technology, in ascending id order.
    pub const ALL: [TagTechnology; 9] = [
        Self::NfcA,
        Self::NfcB,
        Self::IsoDep,
        Self::NfcF,
        Self::NfcV,
        Self::Ndef,
        Self::NdefFormatable,
        Self::MifareClassic,
        Self::MifareUltralight,
    ];

    /// Technology for a raw id, `None` for unknown ids.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| *t as u8 == value)
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Bitmask of supported technologies - Newtype Pattern (u32)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechMask(u32);

impl TechMask {
    /// No technologies.
    pub const EMPTY: Self = Self(0);

    /// Raw mask as reported by the controller.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw mask bits.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether `tech` is set.
    pub fn contains(&self, tech: TagTechnology) -> bool {
        self.0 & tech.bit() != 0
    }

    /// Set `tech`.
    pub fn insert(&mut self, tech: TagTechnology) {
        self.0 |= tech.bit();
    }

    /// Builder form of [`TechMask::insert`].
    pub fn with(mut self, tech: TagTechnology) -> Self {
        self.insert(tech);
        self
    }

    /// True when no known technology is set.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Known technologies in the mask, in ascending id order. Unknown
    /// bits are ignored.
    pub fn iter(&self) -> impl Iterator<Item = TagTechnology> + '_ {
        TagTechnology::ALL
            .iter()
            .copied()
            .filter(move |t| self.contains(*t))
    }
}

impl FromIterator<TagTechnology> for TechMask {
    fn from_iter<I: IntoIterator<Item = TagTechnology>>(iter: I) -> Self {
        let mut mask = TechMask::EMPTY;
        for tech in iter {
            mask.insert(tech);
        }
        mask
    }
}

/// Opaque caller identity, compared by equality only.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallerToken(u32);

impl CallerToken {
    /// Wrap a platform caller id.
    pub const fn new(token: u32) -> Self {
        Self(token)
    }

    /// The wrapped caller id.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}
