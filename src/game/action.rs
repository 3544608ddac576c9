use crate::error::{GameError, Result};

/// Uniform outcome of a controller operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult<T> {
    pub success: bool,
    pub payload: Option<T>,
    pub error: Option<GameError>,
}

impl<T> ActionResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn err(error: GameError) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&GameError> {
        self.error.as_ref()
    }

    pub fn into_result(self) -> Result<T> {
        match (self.payload, self.error) {
            (_, Some(error)) => Err(error),
            (Some(payload), None) => Ok(payload),
            (None, None) => Err(GameError::UnknownError(
                "operation returned neither a payload nor an error".to_string(),
            )),
        }
    }
}

impl<T> From<Result<T>> for ActionResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(error) => Self::err(error),
        }
    }
}
