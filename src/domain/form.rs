// Form domain model
use serde::Serialize;

/// A selectable form as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub id: u64,
    pub title: String,
}

impl Form {
    pub fn new(id: u64, title: String) -> Self {
        Self { id, title }
    }

    /// Display title used when the catalog cannot resolve one.
    pub fn fallback_title(id: u64) -> String {
        format!("Form {}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_title() {
        assert_eq!(Form::fallback_title(42), "Form 42");
    }
}
