//! One-shot model load tracking

/// State of the asynchronously loaded model
///
/// The slot moves out of `Pending` exactly once. Only the transition that
/// reports `true` from [`ModelLoad::complete`] may insert the model into the
/// scene, so repeated completion notifications never insert it twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelLoad {
    #[default]
    Pending,
    Loaded,
    Failed(String),
}

impl ModelLoad {
    /// Mark the load as finished; true if the caller should insert the model
    pub fn complete(&mut self) -> bool {
        match self {
            Self::Pending => {
                *self = Self::Loaded;
                true
            }
            Self::Loaded | Self::Failed(_) => false,
        }
    }

    /// Mark the load as failed; true if this call recorded the failure
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        match self {
            Self::Pending => {
                *self = Self::Failed(reason.into());
                true
            }
            Self::Loaded | Self::Failed(_) => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_once() {
        let mut load = ModelLoad::default();
        assert!(load.is_pending());
        assert!(load.complete());
        assert!(!load.complete());
        assert!(load.is_loaded());
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut load = ModelLoad::Pending;
        assert!(load.fail("404"));
        assert!(!load.complete());
        assert!(!load.fail("again"));
        assert_eq!(load, ModelLoad::Failed("404".to_string()));
    }
}
