//! Audio session registry.
//!
//! Polls a [`SessionSource`] once per tick, resolves labels and decides
//! whether the presented session list must be rebuilt. Rebuilding the UI on
//! every poll flickers, so a refresh that looks unchanged reports
//! [`RefreshOutcome::NoChange`] and the previous snapshot stays authoritative.
//!
//! With [`ChangeDetection::Cardinality`] only the number of sessions is
//! compared. A session replaced by another one keeps the same count and is
//! not noticed until the count moves; [`ChangeDetection::Identity`] compares
//! the ordered session ids instead.

use super::label::LabelResolver;
use super::session::{AudioError, AudioSession, RawSession, SessionId, SessionSnapshot};
use super::source::{ProcessNames, SessionSource};
use tracing::{debug, warn};

/// How the registry decides that the session list is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeDetection {
    /// Rebuild only when the number of sessions changes
    #[default]
    Cardinality,

    /// Rebuild when the ordered list of session ids changes
    Identity,
}

/// Result of one registry refresh.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The list changed; the presentation layer must rebuild from this snapshot
    Rebuilt(SessionSnapshot),

    /// Nothing changed; the previously emitted snapshot remains authoritative
    NoChange,

    /// The audio subsystem failed; carries a human-readable message
    Error(String),
}

impl RefreshOutcome {
    pub fn is_no_change(&self) -> bool {
        matches!(self, RefreshOutcome::NoChange)
    }
}

/// What the last accepted rebuild was made from.
struct Baseline {
    endpoint: Option<String>,
    sessions: Vec<SessionId>,
}

/// Polls the audio subsystem and emits session snapshots.
pub struct SessionRegistry<S: SessionSource> {
    source: S,
    labels: LabelResolver,
    detection: ChangeDetection,
    /// `None` before the first rebuild and after an error.
    baseline: Option<Baseline>,
}

impl<S: SessionSource> SessionRegistry<S> {
    /// Create a registry over an injected session source.
    pub fn new(source: S, process_names: Box<dyn ProcessNames>, detection: ChangeDetection) -> Self {
        Self {
            source,
            labels: LabelResolver::new(process_names),
            detection,
            baseline: None,
        }
    }

    /// Re-enumerate sessions and decide between rebuild and reuse.
    ///
    /// Never fails: subsystem errors become [`RefreshOutcome::Error`] so the
    /// polling loop keeps running.
    pub fn refresh(&mut self) -> RefreshOutcome {
        match self.try_refresh() {
            Ok(Some(snapshot)) => RefreshOutcome::Rebuilt(snapshot),
            Ok(None) => RefreshOutcome::NoChange,
            Err(e) => {
                warn!(error = %e, "failed to load audio sessions");
                // Force a rebuild once the subsystem recovers so the error text is replaced.
                self.baseline = None;
                RefreshOutcome::Error(e.to_string())
            }
        }
    }

    fn try_refresh(&mut self) -> Result<Option<SessionSnapshot>, AudioError> {
        let raw_sessions = self.source.enumerate()?;
        let endpoint = self.source.endpoint_id();

        if !self.is_stale(endpoint.as_deref(), &raw_sessions) {
            return Ok(None);
        }

        let mut sessions = Vec::with_capacity(raw_sessions.len());
        for raw in &raw_sessions {
            let label = self.labels.resolve(raw);
            let level = raw.volume.volume()?;
            sessions.push(AudioSession::new(
                raw.id.clone(),
                raw.kind(),
                label,
                level,
                raw.volume.clone(),
            ));
        }

        debug!(
            count = sessions.len(),
            previous = self.baseline_count(),
            endpoint = endpoint.as_deref().unwrap_or("default"),
            "rebuilding session list"
        );
        self.baseline = Some(Baseline {
            endpoint,
            sessions: raw_sessions.iter().map(|s| s.id.clone()).collect(),
        });

        Ok(Some(SessionSnapshot::new(sessions)))
    }

    fn is_stale(&self, endpoint: Option<&str>, fresh: &[RawSession]) -> bool {
        let Some(baseline) = &self.baseline else {
            return true;
        };
        // Rows bound to another device's sessions must go, whatever the count.
        if baseline.endpoint.as_deref() != endpoint {
            return true;
        }
        let known = &baseline.sessions;
        match self.detection {
            ChangeDetection::Cardinality => known.len() != fresh.len(),
            ChangeDetection::Identity => {
                known.len() != fresh.len()
                    || known.iter().zip(fresh).any(|(id, s)| id != &s.id)
            }
        }
    }

    /// Number of sessions in the last accepted rebuild.
    pub fn baseline_count(&self) -> Option<usize> {
        self.baseline.as_ref().map(|b| b.sessions.len())
    }

    pub fn detection(&self) -> ChangeDetection {
        self.detection
    }

    /// Get the injected session source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::session::VolumeControl;
    use crate::audio::source::fake::{no_process_names, raw, system_sounds, FakeSource, FakeVolume};

    fn registry(source: FakeSource) -> SessionRegistry<FakeSource> {
        SessionRegistry::new(source, Box::new(no_process_names()), ChangeDetection::Cardinality)
    }

    fn rebuilt(outcome: RefreshOutcome) -> SessionSnapshot {
        match outcome {
            RefreshOutcome::Rebuilt(snapshot) => snapshot,
            other => panic!("expected rebuild, got {other:?}"),
        }
    }

    #[test]
    fn first_refresh_always_rebuilds_even_when_empty() {
        let mut registry = registry(FakeSource::new().then_sessions(vec![]));
        let snapshot = rebuilt(registry.refresh());
        assert!(snapshot.is_empty());
        assert_eq!(registry.baseline_count(), Some(0));
    }

    #[test]
    fn unchanged_count_reports_no_change() {
        let mut registry = registry(
            FakeSource::new().then_sessions(vec![system_sounds(), raw("a", "Spotify", 10)]),
        );
        assert_eq!(rebuilt(registry.refresh()).len(), 2);
        for _ in 0..5 {
            assert!(registry.refresh().is_no_change());
        }
        assert_eq!(registry.source().calls.get(), 6);
    }

    #[test]
    fn count_change_rebuilds_with_exact_length() {
        let mut registry = registry(
            FakeSource::new()
                .then_sessions(vec![])
                .then_sessions(vec![raw("a", "Spotify", 10), raw("b", "", 11)])
                .then_sessions(vec![raw("a", "Spotify", 10)])
                .then_sessions(vec![]),
        );
        assert_eq!(rebuilt(registry.refresh()).len(), 0);
        assert_eq!(rebuilt(registry.refresh()).len(), 2);
        assert_eq!(rebuilt(registry.refresh()).len(), 1);
        assert_eq!(rebuilt(registry.refresh()).len(), 0);
        assert!(registry.refresh().is_no_change());
    }

    #[test]
    fn snapshot_carries_labels_and_live_levels_in_order() {
        let mut registry = registry(
            FakeSource::new().then_sessions(vec![system_sounds(), raw("a", "", 77)]),
        );
        let snapshot = rebuilt(registry.refresh());
        let labels: Vec<&str> = snapshot.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["System Sounds", "PID 77"]);
        assert_eq!(snapshot.sessions()[0].volume_percent(), 100);
        assert_eq!(snapshot.sessions()[1].volume_percent(), 50);
        assert_eq!(snapshot.sessions()[1].process_id(), Some(77));
    }

    #[test]
    fn cardinality_misses_same_count_replacement() {
        let mut registry = registry(
            FakeSource::new()
                .then_sessions(vec![raw("a", "Spotify", 10)])
                .then_sessions(vec![raw("b", "Discord", 20)]),
        );
        rebuilt(registry.refresh());
        assert!(registry.refresh().is_no_change());
    }

    #[test]
    fn identity_detects_same_count_replacement() {
        let source = FakeSource::new()
            .then_sessions(vec![raw("a", "Spotify", 10)])
            .then_sessions(vec![raw("b", "Discord", 20)])
            .then_sessions(vec![raw("b", "Discord", 20)]);
        let mut registry =
            SessionRegistry::new(source, Box::new(no_process_names()), ChangeDetection::Identity);
        rebuilt(registry.refresh());
        let snapshot = rebuilt(registry.refresh());
        assert_eq!(snapshot.sessions()[0].label(), "Discord");
        assert!(registry.refresh().is_no_change());
    }

    #[test]
    fn default_device_switch_rebuilds_at_same_count() {
        let old_device = FakeVolume::shared(0.2);
        let new_device = FakeVolume::shared(0.9);
        let on_new_device = RawSession {
            volume: new_device.clone(),
            ..raw("b", "Spotify", 10)
        };
        let mut registry = registry(
            FakeSource::new()
                .on_endpoint("speakers")
                .then_sessions(vec![RawSession {
                    volume: old_device.clone(),
                    ..raw("a", "Spotify", 10)
                }])
                .then_sessions(vec![on_new_device]),
        );
        assert_eq!(rebuilt(registry.refresh()).sessions()[0].volume_percent(), 20);

        registry.source().switch_endpoint("headphones");
        let snapshot = rebuilt(registry.refresh());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.sessions()[0].volume_percent(), 90);

        // Writes now reach the new device's session only.
        snapshot.sessions()[0].control().set_volume(0.5).unwrap();
        assert!((new_device.level() - 0.5).abs() < f32::EPSILON);
        assert!((old_device.level() - 0.2).abs() < f32::EPSILON);

        assert!(registry.refresh().is_no_change());
    }

    #[test]
    fn subsystem_failure_is_reported_then_recovers() {
        let mut registry = registry(
            FakeSource::new()
                .then_sessions(vec![raw("a", "Spotify", 10)])
                .then_error("device removed")
                .then_sessions(vec![raw("a", "Spotify", 10)]),
        );
        rebuilt(registry.refresh());

        match registry.refresh() {
            RefreshOutcome::Error(message) => assert!(message.contains("device removed")),
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(registry.baseline_count(), None);

        // Same count as before the failure, but the error text must be replaced.
        assert_eq!(rebuilt(registry.refresh()).len(), 1);
    }

    #[test]
    fn volume_read_failure_during_rebuild_is_an_error() {
        let failing = FakeVolume::shared(0.3);
        failing.fail();
        let session = RawSession {
            id: SessionId("b".into()),
            display_name: "Discord".into(),
            is_system_sounds: false,
            process_id: 11,
            volume: failing,
        };
        let mut registry = registry(FakeSource::new().then_sessions(vec![session]));

        assert!(matches!(registry.refresh(), RefreshOutcome::Error(_)));
        assert_eq!(registry.baseline_count(), None);
    }
}
