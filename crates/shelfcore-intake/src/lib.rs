use std::path::{Path, PathBuf};

use tracing::debug;

/// Shelf bundles arrive as YAML files; everything else bounces.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Single file handed off to the create-from-file workflow. The workflow
/// owns it from the moment of the drop until its modal closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    Dragging,
}

/// Drag gesture tracker for the list surface. When the viewer has no edit
/// capability the whole channel is inert: no transitions, no overlay, drops
/// are swallowed without comment.
#[derive(Debug)]
pub struct DragIntake {
    enabled: bool,
    state: IntakeState,
}

impl DragIntake {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: IntakeState::Idle,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the drop-zone affordance should overlay the list.
    pub fn is_dragging(&self) -> bool {
        self.state == IntakeState::Dragging
    }

    /// File-bearing drag entered the surface.
    pub fn on_hover(&mut self) {
        if self.enabled {
            self.state = IntakeState::Dragging;
        }
    }

    /// Drag left the surface or was dropped outside.
    pub fn on_leave(&mut self) {
        self.state = IntakeState::Idle;
    }

    /// Drop landed. Returns at most one accepted file; the channel is back
    /// to idle afterwards regardless of the outcome.
    pub fn on_drop(&mut self, paths: &[PathBuf]) -> Option<DroppedFile> {
        self.state = IntakeState::Idle;
        if !self.enabled {
            return None;
        }

        let accepted = paths.iter().find(|path| has_accepted_extension(path));
        match accepted {
            Some(path) => {
                debug!(path = %path.display(), "drop accepted");
                Some(DroppedFile { path: path.clone() })
            }
            None => {
                debug!(offered = paths.len(), "drop had no accepted file type");
                None
            }
        }
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_then_leave_returns_to_idle() {
        let mut intake = DragIntake::new(true);
        intake.on_hover();
        assert!(intake.is_dragging());
        intake.on_leave();
        assert!(!intake.is_dragging());
    }

    #[test]
    fn disabled_channel_never_transitions() {
        let mut intake = DragIntake::new(false);
        intake.on_hover();
        assert!(!intake.is_dragging());
        assert_eq!(intake.on_drop(&[PathBuf::from("bundle.yml")]), None);
    }

    #[test]
    fn non_matching_drop_opens_nothing() {
        let mut intake = DragIntake::new(true);
        intake.on_hover();
        assert_eq!(intake.on_drop(&[PathBuf::from("photo.png")]), None);
        assert!(!intake.is_dragging());
    }

    #[test]
    fn only_the_first_accepted_file_counts() {
        let mut intake = DragIntake::new(true);
        intake.on_hover();

        let dropped = intake
            .on_drop(&[
                PathBuf::from("readme.md"),
                PathBuf::from("first.yaml"),
                PathBuf::from("second.yml"),
            ])
            .unwrap();

        assert_eq!(dropped.path, PathBuf::from("first.yaml"));
        assert!(!intake.is_dragging());
    }

    #[test]
    fn extension_match_ignores_case() {
        let mut intake = DragIntake::new(true);
        assert!(intake.on_drop(&[PathBuf::from("Bundle.YML")]).is_some());
    }
}
