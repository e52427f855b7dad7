use crate::models::{CommitTier, LagTier, Severity, SyncState};

/// Barva badge podle závažnosti nodu / clusteru
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "#d63939", // červená
        Severity::Warning => "#f59f00",  // oranžová
        Severity::Healthy => "#2fb344",  // zelená
    }
}

/// Barva hrany topologie podle stavu synchronizace
pub fn sync_state_color(state: SyncState) -> &'static str {
    match state {
        SyncState::Lag(LagTier::Healthy) | SyncState::Commit(CommitTier::Synchronized) => "#2fb344",
        SyncState::Commit(CommitTier::Asynchronous) => "#206bc4", // modrá
        SyncState::Lag(LagTier::Delayed) | SyncState::Commit(CommitTier::Synchronizing) => "#f59f00",
        SyncState::Lag(LagTier::Critical) | SyncState::Commit(CommitTier::NotSynchronizing) => "#d63939",
        SyncState::Listener => "#ae3ec9", // fialová
        SyncState::Lag(LagTier::Unknown) => "#626976", // šedá pro neznámé stavy
    }
}
