//! Session log loading
//!
//! Each session of each student lives in its own JSON file. The loader keeps
//! the raw entries per student, in load order, until preprocessing.

use crate::error::ComputeError;
use crate::schema::{EventValidator, RawSession};
use crate::session::SessionAssembler;
use crate::types::Session;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// In-memory store of raw sessions, keyed by student
#[derive(Debug, Clone, Default)]
pub struct SessionLoader {
    raw_sessions: BTreeMap<String, Vec<RawSession>>,
}

impl SessionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one session file and append it to the student's sessions
    pub fn load_session(&mut self, student_id: &str, path: &Path) -> Result<(), ComputeError> {
        let data = std::fs::read_to_string(path)?;
        let raw = EventValidator::parse_session(&data).map_err(|e| {
            ComputeError::ParseError(format!("{}: {}", path.display(), e))
        })?;
        debug!(student_id, path = %path.display(), entries = raw.len(), "session loaded");
        self.add_session(student_id, raw);
        Ok(())
    }

    /// Load every file of every student, students in key order
    pub fn load_multiple_sessions(
        &mut self,
        mapping: &BTreeMap<String, Vec<PathBuf>>,
    ) -> Result<(), ComputeError> {
        for (student_id, paths) in mapping {
            for path in paths {
                self.load_session(student_id, path)?;
            }
        }
        info!(
            students = self.raw_sessions.len(),
            sessions = self.session_count(),
            "session logs loaded"
        );
        Ok(())
    }

    /// Load a manifest file: a JSON object of student id -> session file paths.
    ///
    /// Relative paths are resolved against the manifest's directory.
    pub fn load_manifest(&mut self, manifest: &Path) -> Result<(), ComputeError> {
        let data = std::fs::read_to_string(manifest)?;
        let mapping: BTreeMap<String, Vec<PathBuf>> = serde_json::from_str(&data)
            .map_err(|e| ComputeError::ParseError(format!("Invalid manifest: {}", e)))?;

        let base = manifest.parent().unwrap_or_else(|| Path::new(""));
        let resolved: BTreeMap<String, Vec<PathBuf>> = mapping
            .into_iter()
            .map(|(student_id, paths)| {
                let paths = paths
                    .into_iter()
                    .map(|p| if p.is_relative() { base.join(p) } else { p })
                    .collect();
                (student_id, paths)
            })
            .collect();

        self.load_multiple_sessions(&resolved)
    }

    /// Add an already-parsed raw session
    pub fn add_session(&mut self, student_id: &str, raw: RawSession) {
        self.raw_sessions
            .entry(student_id.to_string())
            .or_default()
            .push(raw);
    }

    pub fn raw_sessions(&self) -> &BTreeMap<String, Vec<RawSession>> {
        &self.raw_sessions
    }

    /// Total number of raw sessions across students
    pub fn session_count(&self) -> usize {
        self.raw_sessions.values().map(Vec::len).sum()
    }

    /// Validate and assemble every loaded session; empty ones are dropped
    pub fn preprocess(&self) -> Vec<Session> {
        SessionAssembler::assemble_all(&self.raw_sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SESSION_A: &str = r#"[
        {"time": "2024-01-15T14:00:00", "action": "Hata", "totalchars": 0, "totallines": 0},
        {"time": "2024-01-15T14:00:30", "action": "Eylem: Çalıştır", "totalchars": 3, "totallines": 1}
    ]"#;

    const SESSION_EMPTY: &str = r#"[{"action": "Hata"}]"#;

    #[test]
    fn test_load_manifest_with_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a0.json"), SESSION_A).unwrap();
        fs::write(dir.path().join("a1.json"), SESSION_EMPTY).unwrap();
        fs::write(dir.path().join("b0.json"), SESSION_A).unwrap();
        fs::write(
            dir.path().join("manifest.json"),
            r#"{"ali": ["a0.json", "a1.json"], "beril": ["b0.json"]}"#,
        )
        .unwrap();

        let mut loader = SessionLoader::new();
        loader.load_manifest(&dir.path().join("manifest.json")).unwrap();

        assert_eq!(loader.session_count(), 3);
        let sessions = loader.preprocess();
        let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["ali_0", "beril_0"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut loader = SessionLoader::new();
        let result = loader.load_session("x", Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ComputeError::Io(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ nope").unwrap();

        let mut loader = SessionLoader::new();
        let result = loader.load_session("x", &path);
        assert!(matches!(result, Err(ComputeError::ParseError(_))));
        assert_eq!(loader.session_count(), 0);
    }

    #[test]
    fn test_add_session_appends_in_order() {
        let mut loader = SessionLoader::new();
        loader.add_session("s", EventValidator::parse_session(SESSION_EMPTY).unwrap());
        loader.add_session("s", EventValidator::parse_session(SESSION_A).unwrap());

        let sessions = loader.preprocess();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, "s_1");
    }
}
