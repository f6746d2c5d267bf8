//! Session Entity
//!
//! Client-side authentication state. Only `Authenticated` carries a
//! delegation; every other phase implies no principal.

use std::fmt;

use crate::domain::entity::delegation::Delegation;
use crate::domain::value_object::Principal;

/// Authentication lifecycle phase
///
/// `Uninitialized -> Initializing -> {Unauthenticated, Authenticated}`,
/// `Unauthenticated -> LoggingIn -> {Authenticated, Unauthenticated}`,
/// `Authenticated -> LoggingOut -> Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initializing,
    Unauthenticated,
    LoggingIn,
    Authenticated,
    LoggingOut,
}

impl SessionPhase {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Unauthenticated => "unauthenticated",
            Self::LoggingIn => "logging_in",
            Self::Authenticated => "authenticated",
            Self::LoggingOut => "logging_out",
        }
    }

    /// Transitional phases block every domain operation
    #[inline]
    pub const fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::Uninitialized | Self::Initializing | Self::LoggingIn | Self::LoggingOut
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: SessionPhase,
    delegation: Option<Delegation>,
    /// Bumped on every authenticate/clear
    generation: u64,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn delegation(&self) -> Option<&Delegation> {
        self.delegation.as_ref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.delegation.as_ref().map(|d| &d.principal)
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated && self.delegation.is_some()
    }

    /// Move to a transitional phase. Leaving `Authenticated` for anything but
    /// `LoggingOut` drops the delegation.
    pub fn enter(&mut self, phase: SessionPhase) {
        if phase != SessionPhase::Authenticated && phase != SessionPhase::LoggingOut {
            self.delegation = None;
        }
        self.phase = phase;
    }

    pub fn authenticate(&mut self, delegation: Delegation) -> u64 {
        self.delegation = Some(delegation);
        self.phase = SessionPhase::Authenticated;
        self.generation += 1;
        self.generation
    }

    pub fn clear(&mut self) -> u64 {
        self.delegation = None;
        self.phase = SessionPhase::Unauthenticated;
        self.generation += 1;
        self.generation
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let is_authenticated = self.is_authenticated();
        SessionSnapshot {
            phase: self.phase,
            is_authenticated,
            loading: self.phase.is_loading(),
            principal: self.principal().filter(|_| is_authenticated).cloned(),
        }
    }
}

/// Read-only view handed to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub is_authenticated: bool,
    pub loading: bool,
    pub principal: Option<Principal>,
}
