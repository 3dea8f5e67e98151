//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`BuffError`, `EventError`, `BattleError`) live next
//! to the types they guard. This module provides the classification shared by
//! all of them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each module has its own error enum with specific variants
//! - **No Retry Class**: The engine performs no I/O, so every error is either a
//!   contract violation by the caller or malformed input
//! - **Stable Codes**: Every variant maps to a static code for logs and tests

/// Classification of an error by what the caller did wrong.
///
/// - **Misuse**: The caller violated an engine contract (double apply, fighting
///   a finished battle, occupied slot). Indicates a bug in the caller.
/// - **Construction**: A value was assembled from invalid parts (dead fighter,
///   modifier without a slot).
/// - **Codec**: A resume blob could not be encoded or decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorClass {
    /// Contract violation by the caller.
    Misuse,

    /// Invalid parts supplied at construction time.
    Construction,

    /// Resume blob encoding or decoding failed.
    Codec,
}

impl ErrorClass {
    /// Returns a human-readable description of this class.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Misuse => "misuse",
            Self::Construction => "construction",
            Self::Codec => "codec",
        }
    }

    /// Returns true if this error indicates a caller bug.
    pub const fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Wrapping variants delegate to the wrapped error
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the class of this error.
    fn class(&self) -> ErrorClass;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
