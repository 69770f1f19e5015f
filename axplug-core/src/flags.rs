//! Modifier-name to event-flag translation.
//!
//! Tool payloads carry modifier keys as human-readable strings
//! (`"Shift"`, `"cmd"`, ...).  The engine wants a bitmask.  Names are
//! case-insensitive, synonyms are folded, duplicates collapse via set
//! union, and unrecognized names are ignored without error.

use std::ops::{BitOr, BitOrAssign};

/// Bitmask of modifier keys held during a key press, using the engine's
/// event-flag bit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierFlags(pub u64);

impl ModifierFlags {
    pub const CAPS_LOCK: ModifierFlags = ModifierFlags(0x0001_0000);
    pub const SHIFT: ModifierFlags = ModifierFlags(0x0002_0000);
    pub const CONTROL: ModifierFlags = ModifierFlags(0x0004_0000);
    pub const OPTION: ModifierFlags = ModifierFlags(0x0008_0000);
    pub const COMMAND: ModifierFlags = ModifierFlags(0x0010_0000);
    pub const NUMERIC_PAD: ModifierFlags = ModifierFlags(0x0020_0000);
    pub const HELP: ModifierFlags = ModifierFlags(0x0040_0000);
    pub const FUNCTION: ModifierFlags = ModifierFlags(0x0080_0000);

    /// The empty flag set.
    pub const fn empty() -> Self {
        ModifierFlags(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: ModifierFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Translate an ordered list of modifier names into a flag set.
    ///
    /// Matching is case-insensitive and accepts common synonyms
    /// (`ctrl`, `alt`, `cmd`, ...).  Unrecognized names contribute
    /// nothing.  An empty list yields [`ModifierFlags::empty`].
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut flags = ModifierFlags::empty();
        for name in names {
            match name.as_ref().to_ascii_lowercase().as_str() {
                "capslock" | "caps" => flags |= Self::CAPS_LOCK,
                "shift" => flags |= Self::SHIFT,
                "control" | "ctrl" => flags |= Self::CONTROL,
                "option" | "opt" | "alt" => flags |= Self::OPTION,
                "command" | "cmd" => flags |= Self::COMMAND,
                "help" => flags |= Self::HELP,
                "function" | "fn" => flags |= Self::FUNCTION,
                "numericpad" | "numpad" => flags |= Self::NUMERIC_PAD,
                _ => {}
            }
        }
        flags
    }
}

impl BitOr for ModifierFlags {
    type Output = ModifierFlags;

    fn bitor(self, rhs: ModifierFlags) -> ModifierFlags {
        ModifierFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierFlags {
    fn bitor_assign(&mut self, rhs: ModifierFlags) {
        self.0 |= rhs.0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
