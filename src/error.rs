use std::fmt;

/// Fatal errors raised while entering the play mode.
///
/// The mode cannot run with a partial skeleton, so there is no degraded
/// fallback: callers abort mode initialisation on any of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// A required transform is absent from the scene.
    MissingNode {
        role: &'static str,
        name: String,
    },
    /// The scene must carry exactly one camera.
    CameraCount(usize),
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::MissingNode { role, name } => {
                write!(f, "{role} not found (no transform named \"{name}\").")
            }
            ModeError::CameraCount(count) => write!(
                f,
                "Expecting scene to have exactly one camera, but it has {count}"
            ),
        }
    }
}

impl std::error::Error for ModeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let missing = ModeError::MissingNode { role: "Goal cube", name: "Cube".to_string() };
        assert_eq!(missing.to_string(), "Goal cube not found (no transform named \"Cube\").");

        let cams = ModeError::CameraCount(2);
        assert!(cams.to_string().ends_with("but it has 2"));
    }
}
