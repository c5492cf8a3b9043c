//! Staff user domain types.

/// Staff permission level inside a care facility workspace.
///
/// Wire format: `u8` (0 = Caregiver, 1 = Nurse, 2 = Manager, 3 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Caregiver = 0,
    Nurse = 1,
    Manager = 2,
    Admin = 3,
}

impl StaffRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Caregiver),
            1 => Some(Self::Nurse),
            2 => Some(Self::Manager),
            3 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
